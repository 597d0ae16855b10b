use bevy::prelude::*;

use crate::resources::{CliArgs, SettingsStore};
use crate::systems::lifecycle::persist_settings;

/// Loads `VisionBlurSettings` from disk at startup and saves them on change.
///
/// Uses the `--settings` path from `CliArgs` if present, otherwise the
/// platform config directory. Without either, settings live in memory only.
pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        let cli_path = app
            .world()
            .get_resource::<CliArgs>()
            .and_then(|args| args.settings_path.clone());

        let store = match cli_path {
            Some(path) => Some(SettingsStore::new(path)),
            None => match SettingsStore::platform_default() {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!("Vision blur settings will not be persisted: {}", e);
                    None
                }
            },
        };

        if let Some(store) = store {
            app.insert_resource(store.load_or_default());
            app.insert_resource(store);
        }

        app.add_systems(Update, persist_settings);
    }
}
