//! Frame compositor: runs every frame, eases the blur intensity toward the
//! decision engine's target and refreshes each camera's `VisionMask`.

use bevy::prelude::*;

use crate::components::token::Token;
use crate::components::vision_mask::{VisionMask, CLEAR_VISION_RADIUS};
use crate::events::MaskToggledEvent;
use crate::resources::{BlurState, MaskToggle, SceneGrid, VisionBlurSettings, VisionSnapshot};

/// Camera geometry needed to place and size holes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewGeometry {
    /// Viewport size in logical pixels.
    pub viewport: Vec2,
    /// Logical pixels per world unit.
    pub view_scale: f32,
}

impl ViewGeometry {
    /// Derives the view scale from the visible world area of an orthographic camera.
    /// Returns `None` while the camera has no usable size yet.
    pub fn from_projection(viewport: Vec2, projection: &OrthographicProjection) -> Option<Self> {
        let world_width = projection.area.width();
        if viewport.min_element() <= 0.0 || world_width <= 0.0 {
            return None;
        }
        Some(Self {
            viewport,
            view_scale: viewport.x / world_width,
        })
    }

    /// Hole radius for a vision-limited observer, in units of the viewport's
    /// smaller dimension (matching how the shader measures distance).
    pub fn limited_radius(&self, range_units: f32, grid_size: f32) -> f32 {
        range_units * grid_size * self.view_scale / self.viewport.min_element()
    }

    /// Converts a viewport position (logical pixels, top-left origin) to UV.
    pub fn to_uv(&self, viewport_position: Vec2) -> Vec2 {
        viewport_position / self.viewport
    }
}

/// Builds the (position, radius) list for the shader from the latest decision.
/// `locate` yields an observer's UV position, or `None` if it is hidden or gone.
pub fn assemble_holes(
    observers: &[VisionSnapshot],
    limited_radius: f32,
    mut locate: impl FnMut(Entity) -> Option<Vec2>,
) -> Vec<(Vec2, f32)> {
    observers
        .iter()
        .filter_map(|snapshot| {
            let uv = locate(snapshot.observer)?;
            let radius = if snapshot.has_clear_vision {
                CLEAR_VISION_RADIUS
            } else {
                limited_radius
            };
            Some((uv, radius))
        })
        .collect()
}

/// Payload for a live mask: the located holes plus the blur strength scaled
/// by the eased intensity.
pub fn mask_payload(
    state: &BlurState,
    settings: &VisionBlurSettings,
    geometry: &ViewGeometry,
    holes: impl IntoIterator<Item = (Vec2, f32)>,
) -> VisionMask {
    let mut mask = VisionMask::default();
    mask.set_enabled(true);
    mask.set_holes(holes);
    mask.blur_strength = settings.blur_strength * state.current_intensity();
    mask.resolution = geometry.viewport;
    mask
}

/// Per-frame system that animates intensity and pushes the mask payload to
/// every masked camera.
pub fn composite_vision_mask(
    mut state: ResMut<BlurState>,
    settings: Res<VisionBlurSettings>,
    grid: Res<SceneGrid>,
    mut cameras: Query<(
        Entity,
        &Camera,
        &GlobalTransform,
        &OrthographicProjection,
        &mut VisionMask,
    )>,
    observers: Query<(&GlobalTransform, &InheritedVisibility), With<Token>>,
    mut toggled: EventWriter<MaskToggledEvent>,
) {
    // No masked camera yet: not ready, try again next frame
    if cameras.is_empty() {
        return;
    }

    state.ease();

    for (camera_entity, camera, camera_transform, projection, mut mask) in &mut cameras {
        let toggle = state.resolve_toggle(mask.is_enabled());
        if toggle == MaskToggle::Disable {
            mask.set_enabled(false);
            debug!("Vision blur mask disabled on {:?}", camera_entity);
            toggled.send(MaskToggledEvent {
                camera: camera_entity,
                enabled: false,
            });
            continue;
        }
        if toggle == MaskToggle::Unchanged && !mask.is_enabled() {
            continue;
        }

        // A mask only goes live once its camera can place holes
        let Some(geometry) = camera
            .logical_viewport_size()
            .and_then(|viewport| ViewGeometry::from_projection(viewport, projection))
        else {
            continue;
        };

        let limited_radius = geometry.limited_radius(settings.vision_range, grid.size);
        let holes = assemble_holes(state.observers(), limited_radius, |entity| {
            let (transform, visibility) = observers.get(entity).ok()?;
            if !visibility.get() {
                return None;
            }
            let viewport_position = camera
                .world_to_viewport(camera_transform, transform.translation())
                .ok()?;
            Some(geometry.to_uv(viewport_position))
        });

        mask.set_if_neq(mask_payload(&state, &settings, &geometry, holes));

        if toggle == MaskToggle::Enable {
            debug!("Vision blur mask enabled on {:?}", camera_entity);
            toggled.send(MaskToggledEvent {
                camera: camera_entity,
                enabled: true,
            });
        }
    }
}
