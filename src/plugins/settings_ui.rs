use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use leafwing_input_manager::prelude::*;

use crate::components::vision_mask::VisionMask;
use crate::plugins::input::TableAction;
use crate::plugins::vision_blur::VisionBlurPhase;
use crate::resources::{ActingUser, BlurState, GatingRule, SceneLighting, VisionBlurSettings};

/// Whether the settings window is shown.
#[derive(Resource, Debug)]
pub struct SettingsWindow {
    pub open: bool,
}

impl Default for SettingsWindow {
    fn default() -> Self {
        Self { open: true }
    }
}

/// egui window where the operator edits `VisionBlurSettings`.
pub struct SettingsUiPlugin;

impl Plugin for SettingsUiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        }

        app.init_resource::<SettingsWindow>()
            .add_systems(Update, (toggle_settings_window, settings_panel).chain());
    }
}

fn toggle_settings_window(
    actions: Query<&ActionState<TableAction>, With<Camera2d>>,
    mut window: ResMut<SettingsWindow>,
) {
    let Ok(action_state) = actions.get_single() else {
        return;
    };
    if action_state.just_pressed(&TableAction::ToggleSettings) {
        window.open = !window.open;
    }
}

#[allow(clippy::too_many_arguments)]
fn settings_panel(
    mut contexts: EguiContexts,
    window: Res<SettingsWindow>,
    mut settings: ResMut<VisionBlurSettings>,
    state: Res<BlurState>,
    phase: Res<State<VisionBlurPhase>>,
    user: Res<ActingUser>,
    lighting: Res<SceneLighting>,
    diagnostics: Res<DiagnosticsStore>,
    masks: Query<&VisionMask>,
) {
    if !window.open {
        return;
    }

    // Edit a copy so change detection only fires on real edits
    let mut edited = settings.clone();

    egui::Window::new("Vision Blur").show(contexts.ctx_mut(), |ui| {
        ui.label(format!("Effect: {:?}", phase.get()));
        ui.label(format!("Acting as: {:?}", user.role));
        ui.label(format!("Global light: {}", lighting.global_light));
        ui.label(format!(
            "Intensity: {:.2} -> {:.0} ({} observer(s))",
            state.current_intensity(),
            state.target_intensity(),
            state.observers().len()
        ));

        for mask in masks.iter().filter(|mask| mask.is_enabled()) {
            let radii: Vec<String> = mask
                .holes()
                .map(|(_, radius)| format!("{:.2}", radius))
                .collect();
            ui.label(format!(
                "Mask: strength {:.2}, holes [{}]",
                mask.blur_strength,
                radii.join(", ")
            ));
        }

        if let Some(fps) = diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|diag| diag.smoothed())
        {
            ui.label(format!("FPS: {:.1}", fps));
        }

        ui.separator();
        ui.heading("Settings");

        ui.add(
            egui::Slider::new(&mut edited.vision_range, 1.0..=60.0).text("Vision range (grid units)"),
        );
        ui.add(egui::Slider::new(&mut edited.blur_strength, 0.5..=10.0).text("Blur strength"));
        ui.checkbox(&mut edited.gm_blur_enabled, "Enable blur for GM");
        ui.checkbox(&mut edited.conditional_blur_only, "Only blur under lighting rule");

        ui.add_enabled_ui(edited.conditional_blur_only, |ui| {
            egui::ComboBox::from_label("Lighting rule")
                .selected_text(edited.gating_rule.label())
                .show_ui(ui, |ui| {
                    for rule in [GatingRule::Darkvision, GatingRule::AmbientLight] {
                        ui.selectable_value(&mut edited.gating_rule, rule, rule.label());
                    }
                });
        });

        ui.separator();
        ui.label("Tab/E select, Esc clear, WASD move, V darkvision, L light, G role, F1 hide");
    });

    settings.set_if_neq(edited);
}
