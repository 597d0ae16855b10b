//! Effect start-up: shader loading, mask attachment and settings persistence.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::components::vision_mask::VisionMask;
use crate::events::ShaderLoadedEvent;
use crate::plugins::vision_blur::{VisionBlurPhase, VISION_BLUR_SHADER_PATH};
use crate::resources::{SettingsStore, VisionBlurSettings};

/// Handle to the mask shader, kept alive for the whole session.
#[derive(Resource, Debug, Clone)]
pub struct VisionBlurShader(pub Handle<Shader>);

/// Kicks off the one-time shader load when the effect enters `Loading`.
pub fn start_shader_load(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("Vision blur: loading shader '{}'", VISION_BLUR_SHADER_PATH);
    let handle = asset_server.load::<Shader>(VISION_BLUR_SHADER_PATH);
    commands.insert_resource(VisionBlurShader(handle));
}

/// Waits for the shader to resolve. Success activates the effect; failure
/// parks it in `Failed` for the rest of the session.
pub fn poll_shader_load(
    shader: Option<Res<VisionBlurShader>>,
    asset_server: Res<AssetServer>,
    mut next_phase: ResMut<NextState<VisionBlurPhase>>,
    mut loaded: EventWriter<ShaderLoadedEvent>,
) {
    let Some(shader) = shader else {
        return;
    };

    match asset_server.get_load_state(&shader.0) {
        Some(LoadState::Loaded) => {
            info!("Vision blur: shader ready, effect active");
            next_phase.set(VisionBlurPhase::Active);
            loaded.send(ShaderLoadedEvent { success: true });
        }
        Some(LoadState::Failed(err)) => {
            error!("Vision blur: failed to load shader, effect disabled: {}", err);
            next_phase.set(VisionBlurPhase::Failed);
            loaded.send(ShaderLoadedEvent { success: false });
        }
        _ => {}
    }
}

/// Gives every 2D camera a (disabled) vision mask, including cameras spawned later.
pub fn attach_vision_masks(
    mut commands: Commands,
    cameras: Query<Entity, (With<Camera2d>, Without<VisionMask>)>,
) {
    for camera in &cameras {
        debug!("Vision blur: attaching mask to camera {:?}", camera);
        commands.entity(camera).insert(VisionMask::default());
    }
}

/// Writes settings back to disk whenever the operator changes them.
pub fn persist_settings(settings: Res<VisionBlurSettings>, store: Option<Res<SettingsStore>>) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    let Some(store) = store else {
        return;
    };

    match store.save(&settings) {
        Ok(()) => debug!("Vision blur settings saved to {}", store.path().display()),
        Err(e) => warn!("Failed to save vision blur settings: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_attached_once() {
        let mut app = App::new();
        app.add_systems(Update, attach_vision_masks);
        let camera = app.world_mut().spawn(Camera2d).id();
        let plain = app.world_mut().spawn(Transform::default()).id();

        app.update();
        app.update();

        assert!(app.world().get::<VisionMask>(camera).is_some());
        assert!(app.world().get::<VisionMask>(plain).is_none());
        let mask = app.world().get::<VisionMask>(camera).copied();
        assert_eq!(mask.map(|m| m.is_enabled()), Some(false));
    }

    #[test]
    fn test_settings_saved_on_change_only() {
        let path = std::env::temp_dir().join(format!(
            "vision_blur_persist_{}/settings.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut app = App::new();
        app.init_resource::<VisionBlurSettings>()
            .insert_resource(SettingsStore::new(path.clone()))
            .add_systems(Update, persist_settings);

        app.update();
        assert!(!path.exists(), "initial settings must not be written");

        app.world_mut().resource_mut::<VisionBlurSettings>().vision_range = 30.0;
        app.update();

        let saved = SettingsStore::new(path.clone()).load().unwrap();
        assert_eq!(saved.vision_range, 30.0);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
