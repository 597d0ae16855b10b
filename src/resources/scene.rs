//! Scene-wide facts the vision blur reads but never owns.

use bevy::prelude::*;

/// Role of the acting (local) user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect)]
pub enum UserRole {
    #[default]
    Player,
    /// Privileged role that sees everything unless GM blur is enabled.
    GameMaster,
}

/// The user whose view is being blurred.
#[derive(Resource, Clone, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct ActingUser {
    pub role: UserRole,
}

impl ActingUser {
    pub fn game_master() -> Self {
        Self {
            role: UserRole::GameMaster,
        }
    }

    pub fn is_gm(&self) -> bool {
        self.role == UserRole::GameMaster
    }
}

/// Environment lighting flags for the current scene.
#[derive(Resource, Clone, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct SceneLighting {
    /// Global illumination lights every point not covered by a darkness source.
    pub global_light: bool,
}

/// Grid geometry of the current scene.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct SceneGrid {
    /// World units (pixels at zoom 1) per grid square.
    pub size: f32,
}

impl Default for SceneGrid {
    fn default() -> Self {
        Self { size: 100.0 }
    }
}
