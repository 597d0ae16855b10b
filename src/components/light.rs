//! Light and darkness sources placed in the scene.
//!
//! A source with non-negative luminosity illuminates whatever its shape
//! contains (as long as it has a dim or bright radius). A source with
//! negative luminosity is a darkness source: it suppresses global
//! illumination inside its shape.

use bevy::prelude::*;

use crate::utils::geometry::polygon_contains;

/// Area covered by a light source, relative to the source's origin.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub enum LightShape {
    /// Disc centred on the source.
    Circle { radius: f32 },
    /// Closed polygon, points relative to the source origin (e.g. clipped by walls).
    Polygon { points: Vec<Vec2> },
}

impl Default for LightShape {
    fn default() -> Self {
        LightShape::Circle { radius: 0.0 }
    }
}

impl LightShape {
    /// Returns true if `point` (world space) lies inside the shape anchored at `origin`.
    pub fn contains(&self, origin: Vec2, point: Vec2) -> bool {
        match self {
            LightShape::Circle { radius } => origin.distance_squared(point) <= radius * radius,
            LightShape::Polygon { points } => polygon_contains(points, point - origin),
        }
    }
}

/// A light (or darkness) source in the scene.
#[derive(Component, Clone, Debug, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, Visibility)]
pub struct LightSource {
    /// Inactive sources are ignored entirely.
    pub active: bool,
    /// Dim light radius in world units.
    pub dim: f32,
    /// Bright light radius in world units.
    pub bright: f32,
    /// Negative values mark a darkness source.
    pub luminosity: f32,
    pub shape: LightShape,
}

impl LightSource {
    /// Radial light whose shape covers its dim radius (or bright, if larger).
    pub fn radial(dim: f32, bright: f32) -> Self {
        Self {
            active: true,
            dim,
            bright,
            luminosity: 0.5,
            shape: LightShape::Circle { radius: dim.max(bright) },
        }
    }

    /// Darkness source covering a disc of the given radius.
    pub fn darkness(radius: f32) -> Self {
        Self {
            active: true,
            dim: radius,
            bright: 0.0,
            luminosity: -0.5,
            shape: LightShape::Circle { radius },
        }
    }

    /// True if this source adds light (has a radius and non-negative luminosity).
    pub fn is_illuminating(&self) -> bool {
        self.luminosity >= 0.0 && (self.dim > 0.0 || self.bright > 0.0)
    }

    /// True if this source is a darkness source.
    pub fn is_darkness(&self) -> bool {
        self.luminosity < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_contains() {
        let shape = LightShape::Circle { radius: 10.0 };
        let origin = Vec2::new(100.0, 100.0);
        assert!(shape.contains(origin, Vec2::new(105.0, 100.0)));
        assert!(shape.contains(origin, Vec2::new(110.0, 100.0)));
        assert!(!shape.contains(origin, Vec2::new(111.0, 100.0)));
    }

    #[test]
    fn test_polygon_is_relative_to_origin() {
        let shape = LightShape::Polygon {
            points: vec![
                Vec2::new(-5.0, -5.0),
                Vec2::new(5.0, -5.0),
                Vec2::new(5.0, 5.0),
                Vec2::new(-5.0, 5.0),
            ],
        };
        let origin = Vec2::new(50.0, 0.0);
        assert!(shape.contains(origin, Vec2::new(52.0, 1.0)));
        assert!(!shape.contains(origin, Vec2::new(2.0, 1.0)));
    }

    #[test]
    fn test_source_classification() {
        assert!(LightSource::radial(20.0, 10.0).is_illuminating());
        assert!(!LightSource::radial(0.0, 0.0).is_illuminating());

        let dark = LightSource::darkness(30.0);
        assert!(dark.is_darkness());
        assert!(!dark.is_illuminating());
    }
}
