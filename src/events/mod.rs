use bevy::prelude::*;

/// Event emitted when the compositor flips the blur mask pass on or off.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskToggledEvent {
    /// Camera whose mask was toggled.
    pub camera: Entity,
    /// New state of the mask pass.
    pub enabled: bool,
}

/// Event emitted once the mask shader has finished loading (or failed to).
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ShaderLoadedEvent {
    /// False if loading failed and the effect is off for this session.
    pub success: bool,
}
