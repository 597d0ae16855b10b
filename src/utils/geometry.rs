//! Geometry helpers for light-shape containment tests.

use bevy::prelude::*;

/// Even-odd ray cast: true if `point` lies inside the closed polygon.
/// Polygons with fewer than three points contain nothing.
pub fn polygon_contains(points: &[Vec2], point: Vec2) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        // Edge straddles the horizontal line through `point`
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_square_contains_center() {
        assert!(polygon_contains(&unit_square(), Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_square_excludes_outside() {
        assert!(!polygon_contains(&unit_square(), Vec2::new(1.5, 0.5)));
        assert!(!polygon_contains(&unit_square(), Vec2::new(0.5, -0.1)));
    }

    #[test]
    fn test_concave_notch() {
        // U shape: the notch between the arms is outside
        let u = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(2.0, 3.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ];
        assert!(polygon_contains(&u, Vec2::new(0.5, 2.0)));
        assert!(!polygon_contains(&u, Vec2::new(1.5, 2.0)));
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(!polygon_contains(&[Vec2::ZERO, Vec2::ONE], Vec2::new(0.5, 0.5)));
    }
}
