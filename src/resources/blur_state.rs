use bevy::prelude::*;

/// The decision engine runs once every this many frames.
pub const DECISION_THROTTLE_FRAMES: u32 = 10;
/// Fraction of the remaining gap closed each frame.
pub const BLUR_EASE: f32 = 0.05;
/// Below this gap the intensity snaps to its target.
pub const SNAP_EPSILON: f32 = 0.001;
/// Intensity below which the mask pass may be switched off.
pub const DISABLE_THRESHOLD: f32 = 0.01;

/// Per-observer output of the decision engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisionSnapshot {
    pub observer: Entity,
    /// Clear vision means the observer's hole covers the whole viewport.
    pub has_clear_vision: bool,
}

/// Outcome of one decision tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisionDecision {
    /// Either 0.0 or 1.0.
    pub target_intensity: f32,
    pub observers: Vec<VisionSnapshot>,
}

impl VisionDecision {
    /// Decision used whenever nobody is looking: full visibility.
    pub fn full_visibility() -> Self {
        Self::default()
    }
}

/// What the compositor should do with the renderer's on/off switch this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskToggle {
    Enable,
    Disable,
    Unchanged,
}

/// Shared blur state between the decision engine and the frame compositor.
///
/// `target_intensity` and the observer list are written only through
/// [`BlurState::apply_decision`]; `current_intensity` only moves through
/// [`BlurState::ease`].
#[derive(Resource, Debug, Clone, Default)]
pub struct BlurState {
    current_intensity: f32,
    target_intensity: f32,
    frame_counter: u32,
    observers: Vec<VisionSnapshot>,
}

impl BlurState {
    pub fn current_intensity(&self) -> f32 {
        self.current_intensity
    }

    pub fn target_intensity(&self) -> f32 {
        self.target_intensity
    }

    pub fn observers(&self) -> &[VisionSnapshot] {
        &self.observers
    }

    /// Counts a frame. Returns true when the decision engine is due.
    pub fn throttle_tick(&mut self) -> bool {
        self.frame_counter += 1;
        if self.frame_counter >= DECISION_THROTTLE_FRAMES {
            self.frame_counter = 0;
            true
        } else {
            false
        }
    }

    /// Replaces the target and observer list with a fresh decision.
    /// Returns true if the target intensity flipped.
    pub fn apply_decision(&mut self, decision: VisionDecision) -> bool {
        let flipped = self.target_intensity != decision.target_intensity;
        self.target_intensity = decision.target_intensity;
        self.observers = decision.observers;
        flipped
    }

    /// Moves `current_intensity` one easing step toward the target.
    pub fn ease(&mut self) {
        let gap = self.target_intensity - self.current_intensity;
        if gap.abs() > SNAP_EPSILON {
            self.current_intensity += gap * BLUR_EASE;
        } else {
            self.current_intensity = self.target_intensity;
        }
    }

    /// True once blur has faded out far enough that the pass can be skipped.
    pub fn is_effectively_off(&self) -> bool {
        self.current_intensity < DISABLE_THRESHOLD && self.target_intensity == 0.0
    }

    /// Decides the renderer switch given its current state. Only reports a
    /// change when the switch actually needs to flip.
    pub fn resolve_toggle(&self, enabled: bool) -> MaskToggle {
        if self.is_effectively_off() {
            if enabled {
                MaskToggle::Disable
            } else {
                MaskToggle::Unchanged
            }
        } else if !enabled && self.current_intensity > DISABLE_THRESHOLD {
            MaskToggle::Enable
        } else {
            MaskToggle::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_targeting(target: f32) -> BlurState {
        let mut state = BlurState::default();
        state.apply_decision(VisionDecision {
            target_intensity: target,
            observers: Vec::new(),
        });
        state
    }

    #[test]
    fn test_throttle_fires_every_tenth_frame() {
        let mut state = BlurState::default();
        let fired: Vec<bool> = (0..25).map(|_| state.throttle_tick()).collect();
        let fire_frames: Vec<usize> = fired
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(fire_frames, vec![10, 20]);
    }

    #[test]
    fn test_ease_is_monotonic_without_overshoot() {
        let mut state = state_targeting(1.0);
        let mut previous = state.current_intensity();
        for _ in 0..500 {
            state.ease();
            let current = state.current_intensity();
            assert!(current >= previous, "intensity must not move backwards");
            assert!(current <= 1.0, "intensity must not overshoot");
            previous = current;
        }
        assert_eq!(state.current_intensity(), 1.0);
    }

    #[test]
    fn test_ease_down_is_monotonic() {
        let mut state = state_targeting(1.0);
        for _ in 0..500 {
            state.ease();
        }
        state.apply_decision(VisionDecision::full_visibility());
        let mut previous = state.current_intensity();
        for _ in 0..500 {
            state.ease();
            let current = state.current_intensity();
            assert!(current <= previous);
            assert!(current >= 0.0);
            previous = current;
        }
        assert_eq!(state.current_intensity(), 0.0);
    }

    #[test]
    fn test_first_step_is_five_percent() {
        let mut state = state_targeting(1.0);
        state.ease();
        assert!((state.current_intensity() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_snap_inside_epsilon() {
        let mut state = state_targeting(1.0);
        // Converge until the gap is tiny, then one more step must land exactly
        while (1.0 - state.current_intensity()) > SNAP_EPSILON {
            state.ease();
        }
        state.ease();
        assert_eq!(state.current_intensity(), 1.0);
    }

    #[test]
    fn test_toggle_enables_once_and_disables_once() {
        let mut state = state_targeting(1.0);
        let mut enabled = false;
        let mut enables = 0;
        let mut disables = 0;

        let mut run = |state: &mut BlurState, enabled: &mut bool, frames: usize| {
            for _ in 0..frames {
                state.ease();
                match state.resolve_toggle(*enabled) {
                    MaskToggle::Enable => {
                        *enabled = true;
                        enables += 1;
                    }
                    MaskToggle::Disable => {
                        *enabled = false;
                        disables += 1;
                    }
                    MaskToggle::Unchanged => {}
                }
            }
        };

        run(&mut state, &mut enabled, 300);
        assert!(enabled);
        state.apply_decision(VisionDecision::full_visibility());
        run(&mut state, &mut enabled, 300);
        assert!(!enabled);

        assert_eq!(enables, 1);
        assert_eq!(disables, 1);
    }

    #[test]
    fn test_idle_state_stays_disabled() {
        let state = BlurState::default();
        assert!(state.is_effectively_off());
        assert_eq!(state.resolve_toggle(false), MaskToggle::Unchanged);
        assert_eq!(state.resolve_toggle(true), MaskToggle::Disable);
    }

    #[test]
    fn test_apply_decision_reports_flip() {
        let mut state = BlurState::default();
        assert!(state.apply_decision(VisionDecision {
            target_intensity: 1.0,
            observers: vec![],
        }));
        assert!(!state.apply_decision(VisionDecision {
            target_intensity: 1.0,
            observers: vec![],
        }));
    }
}
