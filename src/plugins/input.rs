use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum TableAction {
    /// Select the next token, dropping the current selection.
    CycleSelection,
    /// Add the next unselected token to the selection.
    ExtendSelection,
    ClearSelection,
    /// Switch between player and game master.
    ToggleRole,
    /// Flip selected tokens between basic sight and darkvision.
    ToggleDarkvision,
    ToggleGlobalLight,
    ToggleSettings,
    #[actionlike(DualAxis)]
    MoveToken,
    #[actionlike(DualAxis)]
    CameraMove,
    #[actionlike(Axis)]
    CameraZoom,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<TableAction>::default());
    }
}

pub fn get_default_input_map() -> InputMap<TableAction> {
    let mut input_map = InputMap::default();

    // Selection
    input_map.insert(TableAction::CycleSelection, KeyCode::Tab);
    input_map.insert(TableAction::ExtendSelection, KeyCode::KeyE);
    input_map.insert(TableAction::ClearSelection, KeyCode::Escape);

    // Scene toggles
    input_map.insert(TableAction::ToggleRole, KeyCode::KeyG);
    input_map.insert(TableAction::ToggleDarkvision, KeyCode::KeyV);
    input_map.insert(TableAction::ToggleGlobalLight, KeyCode::KeyL);
    input_map.insert(TableAction::ToggleSettings, KeyCode::F1);

    // Tokens move with WASD, camera pans with arrows and zooms with the wheel
    input_map.insert_dual_axis(TableAction::MoveToken, VirtualDPad::wasd());
    input_map.insert_dual_axis(TableAction::CameraMove, VirtualDPad::arrow_keys());
    input_map.insert_axis(TableAction::CameraZoom, MouseScrollAxis::Y);

    input_map
}
