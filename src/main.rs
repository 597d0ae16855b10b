use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use vision_blur::plugins::input::InputPlugin;
use vision_blur::plugins::persistence::PersistencePlugin;
use vision_blur::plugins::settings_ui::SettingsUiPlugin;
use vision_blur::plugins::tabletop::TabletopPlugin;
use vision_blur::plugins::vision_blur::VisionBlurPlugin;
use vision_blur::resources::{report_cli_args, ActingUser, CliArgs};

fn main() {
    let cli = CliArgs::parse();
    let user = if cli.game_master {
        ActingUser::game_master()
    } else {
        ActingUser::default()
    };

    App::new()
        .insert_resource(cli)
        .insert_resource(user)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Vision Blur".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(PersistencePlugin)
        .add_plugins(VisionBlurPlugin)
        .add_plugins(TabletopPlugin)
        .add_plugins(SettingsUiPlugin)
        .add_systems(Startup, report_cli_args)
        .run();
}
