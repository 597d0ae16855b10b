//! Visibility decision engine.
//!
//! Runs once every `DECISION_THROTTLE_FRAMES` frames. Works out which tokens
//! act as observers, whether lighting gives each of them clear vision, and
//! whether blur should be on at all. The result replaces the shared
//! `BlurState` target and observer list; nothing here touches the renderer.

use bevy::prelude::*;

use crate::components::light::LightSource;
use crate::components::token::{AssignedCharacter, Controlled, PlayerOwned, Token, VisionMode};
use crate::components::vision_mask::MAX_OBSERVERS;
use crate::resources::{
    ActingUser, BlurState, GatingRule, SceneLighting, VisionBlurSettings, VisionDecision,
    VisionSnapshot,
};

/// Candidate pools gathered from the scene, each in enumeration order.
#[derive(Debug, Default)]
pub struct CandidatePools {
    /// Tokens currently selected by the user.
    pub controlled: Vec<Entity>,
    /// Active tokens of the user's assigned character.
    pub assigned: Vec<Entity>,
    /// Any token the user owns.
    pub owned: Vec<Entity>,
}

/// Picks the observer set with strict priority: selection first, then (for
/// players only) the assigned character, then any owned token. A GM without
/// GM blur never gets observers. At most `MAX_OBSERVERS` are kept.
pub fn resolve_candidates(
    user: &ActingUser,
    gm_blur_enabled: bool,
    pools: &CandidatePools,
) -> Vec<Entity> {
    if user.is_gm() && !gm_blur_enabled {
        return Vec::new();
    }

    let chosen: &[Entity] = if !pools.controlled.is_empty() {
        &pools.controlled
    } else if user.is_gm() {
        &[]
    } else if !pools.assigned.is_empty() {
        &pools.assigned
    } else {
        &pools.owned
    };

    chosen.iter().copied().take(MAX_OBSERVERS).collect()
}

/// A light source paired with its world-space origin.
#[derive(Clone, Copy, Debug)]
pub struct LightSample<'a> {
    pub origin: Vec2,
    pub source: &'a LightSource,
}

/// Everything needed to answer "is this point lit?".
#[derive(Clone, Debug, Default)]
pub struct Illumination<'a> {
    pub sources: Vec<LightSample<'a>>,
    pub global_light: bool,
}

impl<'a> Illumination<'a> {
    pub fn new(
        lights: impl IntoIterator<Item = (&'a LightSource, &'a GlobalTransform)>,
        global_light: bool,
    ) -> Self {
        let sources = lights
            .into_iter()
            .map(|(source, transform)| LightSample {
                origin: transform.translation().truncate(),
                source,
            })
            .collect();
        Self {
            sources,
            global_light,
        }
    }

    /// True if `point` sits inside an active light, or under global
    /// illumination that no active darkness source suppresses.
    pub fn is_lit(&self, point: Vec2) -> bool {
        let in_light = self.sources.iter().any(|sample| {
            sample.source.active
                && sample.source.is_illuminating()
                && sample.source.shape.contains(sample.origin, point)
        });
        if in_light {
            return true;
        }

        self.global_light
            && !self.sources.iter().any(|sample| {
                sample.source.active
                    && sample.source.is_darkness()
                    && sample.source.shape.contains(sample.origin, point)
            })
    }
}

/// Observer data the engine needs, read fresh from the scene each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverSample {
    pub entity: Entity,
    pub position: Vec2,
    pub vision_mode: VisionMode,
}

/// Whether lighting gives this observer an unlimited view.
/// Without conditional blur every observer is vision-limited.
pub fn has_clear_vision(
    observer: &ObserverSample,
    settings: &VisionBlurSettings,
    illumination: &Illumination,
) -> bool {
    if !settings.conditional_blur_only {
        return false;
    }

    match settings.gating_rule {
        GatingRule::Darkvision => {
            observer.vision_mode != VisionMode::Darkvision
                || illumination.is_lit(observer.position)
        }
        GatingRule::AmbientLight => illumination.is_lit(observer.position),
    }
}

/// Resolves the observers into one decision.
///
/// If any observer is vision-limited, blur is on for everyone. If all have
/// clear vision, blur fades out, but observers keep their normal radius so
/// the fade stays smooth. Either way no observer is reported as clear.
pub fn decide(
    observers: &[ObserverSample],
    settings: &VisionBlurSettings,
    illumination: &Illumination,
) -> VisionDecision {
    if observers.is_empty() {
        return VisionDecision::full_visibility();
    }

    let any_limited = observers
        .iter()
        .any(|observer| !has_clear_vision(observer, settings, illumination));

    VisionDecision {
        target_intensity: if any_limited { 1.0 } else { 0.0 },
        observers: observers
            .iter()
            .map(|observer| VisionSnapshot {
                observer: observer.entity,
                has_clear_vision: false,
            })
            .collect(),
    }
}

/// Throttled system that re-runs the decision engine.
pub fn update_vision_logic(
    mut state: ResMut<BlurState>,
    settings: Res<VisionBlurSettings>,
    user: Res<ActingUser>,
    lighting: Res<SceneLighting>,
    tokens: Query<(
        Entity,
        &Token,
        &GlobalTransform,
        Option<&Controlled>,
        Has<AssignedCharacter>,
        Has<PlayerOwned>,
    )>,
    lights: Query<(&LightSource, &GlobalTransform)>,
) {
    if !state.throttle_tick() {
        return;
    }

    let mut controlled: Vec<(u32, Entity)> = Vec::new();
    let mut pools = CandidatePools::default();
    for (entity, _, _, selection, assigned, owned) in &tokens {
        if let Some(selection) = selection {
            controlled.push((selection.sequence, entity));
        }
        if assigned {
            pools.assigned.push(entity);
        }
        if owned {
            pools.owned.push(entity);
        }
    }
    controlled.sort_unstable();
    pools.controlled = controlled.into_iter().map(|(_, entity)| entity).collect();
    pools.assigned.sort_unstable();
    pools.owned.sort_unstable();

    let candidates = resolve_candidates(&user, settings.gm_blur_enabled, &pools);
    let samples: Vec<ObserverSample> = candidates
        .iter()
        .filter_map(|entity| tokens.get(*entity).ok())
        .map(|(entity, token, transform, ..)| ObserverSample {
            entity,
            position: transform.translation().truncate(),
            vision_mode: token.vision_mode,
        })
        .collect();

    // Light queries only matter when blur is conditional
    let illumination = if settings.conditional_blur_only {
        Illumination::new(&lights, lighting.global_light)
    } else {
        Illumination::default()
    };

    let decision = decide(&samples, &settings, &illumination);
    let observer_count = decision.observers.len();
    let target = decision.target_intensity;
    if state.apply_decision(decision) {
        debug!(
            "Vision blur target -> {:.0} ({} observer(s))",
            target, observer_count
        );
    }
}
