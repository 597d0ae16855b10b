//! Core plugin: wires the decision engine and frame compositor into the
//! schedule once the mask shader has loaded.

use bevy::prelude::*;
use bevy::render::camera::CameraUpdateSystem;
use bevy::render::view::VisibilitySystems;
use bevy::transform::TransformSystem;

use crate::components::light::{LightShape, LightSource};
use crate::components::token::{AssignedCharacter, Controlled, PlayerOwned, Token, VisionMode};
use crate::components::vision_mask::VisionMask;
use crate::events::{MaskToggledEvent, ShaderLoadedEvent};
use crate::plugins::mask_pass::MaskPassPlugin;
use crate::resources::{
    ActingUser, BlurState, GatingRule, SceneGrid, SceneLighting, UserRole, VisionBlurSettings,
};
use crate::systems::compositor::composite_vision_mask;
use crate::systems::decision::update_vision_logic;
use crate::systems::lifecycle::{attach_vision_masks, poll_shader_load, start_shader_load};

/// Asset path of the mask shader.
pub const VISION_BLUR_SHADER_PATH: &str = "shaders/vision_blur.wgsl";

/// Lifecycle of the effect for the current session.
#[derive(States, Default, Clone, Eq, PartialEq, Debug, Hash)]
pub enum VisionBlurPhase {
    /// Waiting for the shader to load.
    #[default]
    Loading,
    /// Shader ready; decision engine and compositor run.
    Active,
    /// Shader failed to load; the effect stays off.
    Failed,
}

/// Ordering of the per-frame work.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisionBlurSet {
    /// Throttled decision engine.
    Decide,
    /// Every-frame intensity easing and mask upload.
    Composite,
}

/// Plugin that adds the vision blur effect to every 2D camera.
///
/// Insert `VisionBlurSettings`, `ActingUser`, `SceneLighting` and `SceneGrid`
/// before adding the plugin to override their defaults.
pub struct VisionBlurPlugin;

impl Plugin for VisionBlurPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<VisionBlurPhase>()
            .init_resource::<BlurState>()
            .init_resource::<VisionBlurSettings>()
            .init_resource::<ActingUser>()
            .init_resource::<SceneLighting>()
            .init_resource::<SceneGrid>()
            .add_event::<MaskToggledEvent>()
            .add_event::<ShaderLoadedEvent>()
            .add_plugins(MaskPassPlugin);

        register_vision_types(app);

        app.add_systems(OnEnter(VisionBlurPhase::Loading), start_shader_load)
            .add_systems(
                Update,
                (
                    poll_shader_load.run_if(in_state(VisionBlurPhase::Loading)),
                    attach_vision_masks.run_if(in_state(VisionBlurPhase::Active)),
                ),
            )
            .configure_sets(
                PostUpdate,
                (VisionBlurSet::Decide, VisionBlurSet::Composite)
                    .chain()
                    .after(TransformSystem::TransformPropagate)
                    .after(VisibilitySystems::VisibilityPropagate)
                    .after(CameraUpdateSystem)
                    .run_if(in_state(VisionBlurPhase::Active)),
            )
            .add_systems(
                PostUpdate,
                (
                    update_vision_logic.in_set(VisionBlurSet::Decide),
                    composite_vision_mask.in_set(VisionBlurSet::Composite),
                ),
            )
            .add_systems(OnEnter(VisionBlurPhase::Failed), log_effect_disabled);
    }
}

/// Registers the effect's types with the reflection registry (inspectors, scenes).
fn register_vision_types(app: &mut App) {
    app.register_type::<Token>()
        .register_type::<VisionMode>()
        .register_type::<Controlled>()
        .register_type::<PlayerOwned>()
        .register_type::<AssignedCharacter>()
        .register_type::<LightSource>()
        .register_type::<LightShape>()
        .register_type::<VisionMask>()
        .register_type::<VisionBlurSettings>()
        .register_type::<GatingRule>()
        .register_type::<ActingUser>()
        .register_type::<UserRole>()
        .register_type::<SceneLighting>()
        .register_type::<SceneGrid>();
}

fn log_effect_disabled() {
    warn!("Vision blur is disabled for this session");
}
