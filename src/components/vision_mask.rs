//! Per-camera blur mask parameters, uploaded to the mask shader as a uniform.

use bevy::prelude::*;
use bevy::render::{extract_component::ExtractComponent, render_resource::ShaderType};

/// Maximum number of observer holes the shader accepts.
pub const MAX_OBSERVERS: usize = 10;

/// Radius (in min-dimension UV units) large enough to clear the whole viewport.
pub const CLEAR_VISION_RADIUS: f32 = 10.0;

/// Camera component carrying the blur mask payload.
///
/// Each hole packs `xy` = screen UV position (top-left origin) and `z` = radius,
/// measured in units of the viewport's smaller dimension. `enabled` is the
/// renderer's on/off switch: the mask pass is skipped entirely while it is 0.
#[derive(Component, Clone, Copy, Debug, PartialEq, ExtractComponent, ShaderType, Reflect)]
#[derive(bytemuck::Pod, bytemuck::Zeroable)]
#[reflect(Component)]
#[repr(C)]
pub struct VisionMask {
    pub holes: [Vec4; MAX_OBSERVERS],
    /// Viewport size in logical pixels.
    pub resolution: Vec2,
    pub count: u32,
    /// Overall blur strength, already scaled by the eased intensity.
    pub blur_strength: f32,
    pub enabled: u32,
    /// Padding for alignment
    pub _padding0: u32,
    pub _padding1: u32,
    pub _padding2: u32,
}

impl Default for VisionMask {
    fn default() -> Self {
        // Starts disabled; the compositor switches it on once blur fades in
        bytemuck::Zeroable::zeroed()
    }
}

impl VisionMask {
    pub fn is_enabled(&self) -> bool {
        self.enabled != 0
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled as u32;
    }

    /// Replaces the hole list, keeping at most `MAX_OBSERVERS` entries in order.
    pub fn set_holes(&mut self, holes: impl IntoIterator<Item = (Vec2, f32)>) {
        self.holes = [Vec4::ZERO; MAX_OBSERVERS];
        self.count = 0;
        for (slot, (position, radius)) in self.holes.iter_mut().zip(holes) {
            *slot = Vec4::new(position.x, position.y, radius, 0.0);
            self.count += 1;
        }
    }

    /// Returns the active holes as (position, radius) pairs.
    pub fn holes(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.holes[..self.count as usize]
            .iter()
            .map(|hole| (hole.truncate().truncate(), hole.z))
    }
}
