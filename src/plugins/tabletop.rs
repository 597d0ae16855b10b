//! Demo tabletop: a camera, a checkered map, a handful of tokens and lights,
//! plus keyboard controls to drive the vision blur by hand.

use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::components::light::LightSource;
use crate::components::token::{AssignedCharacter, Controlled, PlayerOwned, Token, VisionMode};
use crate::plugins::input::{get_default_input_map, TableAction};
use crate::resources::{ActingUser, SceneGrid, SceneLighting, UserRole};

const MAP_COLUMNS: i32 = 24;
const MAP_ROWS: i32 = 16;
const TOKEN_SIZE: f32 = 70.0;
const SELECTED_TOKEN_SIZE: f32 = 90.0;
const TOKEN_SPEED: f32 = 400.0;

pub struct TabletopPlugin;

impl Plugin for TabletopPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_map, spawn_tokens, spawn_lights))
            .add_systems(
                Update,
                (
                    camera_control,
                    selection_control,
                    scene_toggles,
                    move_selected_tokens,
                    highlight_selection.after(selection_control),
                ),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            near: -1000.0,
            far: 1000.0,
            scale: 1.0,
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(0.0, 0.0, 100.0),
        InputManagerBundle::with_map(get_default_input_map()),
    ));
}

fn spawn_map(mut commands: Commands, grid: Res<SceneGrid>) {
    let light = Color::srgb(0.78, 0.72, 0.58);
    let dark = Color::srgb(0.62, 0.56, 0.44);
    let origin = Vec2::new(
        -(MAP_COLUMNS as f32 * grid.size) / 2.0,
        -(MAP_ROWS as f32 * grid.size) / 2.0,
    );

    for x in 0..MAP_COLUMNS {
        for y in 0..MAP_ROWS {
            let color = if (x + y) % 2 == 0 { light } else { dark };
            let center = origin + (Vec2::new(x as f32, y as f32) + 0.5) * grid.size;
            commands.spawn((
                Sprite::from_color(color, Vec2::splat(grid.size)),
                Transform::from_translation(center.extend(0.0)),
            ));
        }
    }
}

fn spawn_tokens(mut commands: Commands) {
    let tokens = [
        (Token::new("Ranger"), Vec2::new(-400.0, 100.0), Color::srgb(0.2, 0.5, 0.2), true, false),
        (
            Token::new("Dwarf").with_vision(VisionMode::Darkvision),
            Vec2::new(300.0, -200.0),
            Color::srgb(0.6, 0.3, 0.1),
            true,
            true,
        ),
        (Token::new("Goblin"), Vec2::new(700.0, 400.0), Color::srgb(0.5, 0.1, 0.1), false, false),
    ];

    for (token, position, color, owned, assigned) in tokens {
        let mut entity = commands.spawn((
            token,
            Sprite::from_color(color, Vec2::splat(TOKEN_SIZE)),
            Transform::from_translation(position.extend(10.0)),
        ));
        if owned {
            entity.insert(PlayerOwned);
        }
        if assigned {
            entity.insert(AssignedCharacter);
        }
    }
}

fn spawn_lights(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let lights = [
        (LightSource::radial(300.0, 150.0), Vec2::new(-400.0, 0.0), Color::srgba(1.0, 0.9, 0.5, 0.25)),
        (LightSource::radial(200.0, 100.0), Vec2::new(600.0, 300.0), Color::srgba(1.0, 0.9, 0.5, 0.25)),
        (LightSource::darkness(350.0), Vec2::new(300.0, -200.0), Color::srgba(0.0, 0.0, 0.1, 0.35)),
    ];

    for (source, position, color) in lights {
        let radius = source.dim.max(source.bright);
        commands.spawn((
            source,
            Mesh2d(meshes.add(Circle::new(radius))),
            MeshMaterial2d(materials.add(color)),
            Transform::from_translation(position.extend(5.0)),
        ));
    }
}

fn camera_control(
    mut query: Query<
        (&ActionState<TableAction>, &mut Transform, &mut OrthographicProjection),
        With<Camera2d>,
    >,
    time: Res<Time>,
) {
    let Ok((action_state, mut transform, mut projection)) = query.get_single_mut() else {
        return;
    };

    // Pan
    let axis_pair = action_state.axis_pair(&TableAction::CameraMove);
    if axis_pair != Vec2::ZERO {
        let move_speed = 500.0 * projection.scale;
        transform.translation.x += axis_pair.x * move_speed * time.delta_secs();
        transform.translation.y += axis_pair.y * move_speed * time.delta_secs();
    }

    // Zoom
    let zoom_delta = action_state.value(&TableAction::CameraZoom);
    if zoom_delta != 0.0 {
        let zoom_speed = 1.5;
        projection.scale *= 1.0 - zoom_delta * zoom_speed * time.delta_secs();
        projection.scale = projection.scale.clamp(0.1, 5.0);
    }
}

/// Returns the token after `current` in `all`, wrapping around.
/// `all` must be sorted; with no current selection the first token is picked.
pub fn next_in_cycle(all: &[Entity], current: Option<Entity>) -> Option<Entity> {
    let Some(current) = current else {
        return all.first().copied();
    };
    match all.iter().position(|entity| *entity == current) {
        Some(index) => all.get((index + 1) % all.len()).copied(),
        None => all.first().copied(),
    }
}

fn selection_control(
    mut commands: Commands,
    actions: Query<&ActionState<TableAction>, With<Camera2d>>,
    tokens: Query<(Entity, Option<&Controlled>), With<Token>>,
    mut next_sequence: Local<u32>,
) {
    let Ok(action_state) = actions.get_single() else {
        return;
    };

    let mut all: Vec<Entity> = tokens.iter().map(|(entity, _)| entity).collect();
    all.sort_unstable();
    let newest = tokens
        .iter()
        .filter_map(|(entity, selection)| selection.map(|s| (s.sequence, entity)))
        .max()
        .map(|(_, entity)| entity);

    if action_state.just_pressed(&TableAction::ClearSelection) {
        for (entity, selection) in &tokens {
            if selection.is_some() {
                commands.entity(entity).remove::<Controlled>();
            }
        }
        info!("Selection cleared");
    } else if action_state.just_pressed(&TableAction::CycleSelection) {
        let Some(next) = next_in_cycle(&all, newest) else {
            return;
        };
        for (entity, selection) in &tokens {
            if selection.is_some() && entity != next {
                commands.entity(entity).remove::<Controlled>();
            }
        }
        *next_sequence += 1;
        commands.entity(next).insert(Controlled {
            sequence: *next_sequence,
        });
        info!("Selected token {:?}", next);
    } else if action_state.just_pressed(&TableAction::ExtendSelection) {
        let unselected: Vec<Entity> = tokens
            .iter()
            .filter(|(_, selection)| selection.is_none())
            .map(|(entity, _)| entity)
            .collect();
        let Some(next) = unselected.iter().min().copied() else {
            return;
        };
        *next_sequence += 1;
        commands.entity(next).insert(Controlled {
            sequence: *next_sequence,
        });
        info!("Added token {:?} to selection", next);
    }
}

fn scene_toggles(
    actions: Query<&ActionState<TableAction>, With<Camera2d>>,
    mut user: ResMut<ActingUser>,
    mut lighting: ResMut<SceneLighting>,
    mut tokens: Query<&mut Token, With<Controlled>>,
) {
    let Ok(action_state) = actions.get_single() else {
        return;
    };

    if action_state.just_pressed(&TableAction::ToggleRole) {
        user.role = match user.role {
            UserRole::Player => UserRole::GameMaster,
            UserRole::GameMaster => UserRole::Player,
        };
        info!("Acting as {:?}", user.role);
    }

    if action_state.just_pressed(&TableAction::ToggleGlobalLight) {
        lighting.global_light = !lighting.global_light;
        info!("Global illumination: {}", lighting.global_light);
    }

    if action_state.just_pressed(&TableAction::ToggleDarkvision) {
        for mut token in &mut tokens {
            token.vision_mode = match token.vision_mode {
                VisionMode::Basic => VisionMode::Darkvision,
                VisionMode::Darkvision => VisionMode::Basic,
            };
            info!("{} now uses {}", token.name, token.vision_mode.id());
        }
    }
}

fn move_selected_tokens(
    actions: Query<&ActionState<TableAction>, With<Camera2d>>,
    mut tokens: Query<&mut Transform, (With<Token>, With<Controlled>)>,
    time: Res<Time>,
) {
    let Ok(action_state) = actions.get_single() else {
        return;
    };

    let axis_pair = action_state.axis_pair(&TableAction::MoveToken);
    if axis_pair == Vec2::ZERO {
        return;
    }
    let step = axis_pair * TOKEN_SPEED * time.delta_secs();
    for mut transform in &mut tokens {
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }
}

fn highlight_selection(mut tokens: Query<(&mut Sprite, Has<Controlled>), With<Token>>) {
    for (mut sprite, selected) in &mut tokens {
        let size = if selected { SELECTED_TOKEN_SIZE } else { TOKEN_SIZE };
        if sprite.custom_size != Some(Vec2::splat(size)) {
            sprite.custom_size = Some(Vec2::splat(size));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_starts_at_first() {
        let all = [Entity::from_raw(1), Entity::from_raw(2)];
        assert_eq!(next_in_cycle(&all, None), Some(Entity::from_raw(1)));
    }

    #[test]
    fn test_cycle_wraps() {
        let all = [Entity::from_raw(1), Entity::from_raw(2), Entity::from_raw(3)];
        assert_eq!(next_in_cycle(&all, Some(Entity::from_raw(2))), Some(Entity::from_raw(3)));
        assert_eq!(next_in_cycle(&all, Some(Entity::from_raw(3))), Some(Entity::from_raw(1)));
    }

    #[test]
    fn test_cycle_empty() {
        assert_eq!(next_in_cycle(&[], Some(Entity::from_raw(1))), None);
        assert_eq!(next_in_cycle(&[], None), None);
    }
}
