//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in game screen coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(min, size, color, color)
}

/// Rectangle with a vertical color gradient
pub fn gradient_rect(min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Rectangle rotated by `angle` radians around its center
pub fn rotated_rect(center: Vec2, half: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| {
        let p = center + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, color)
    };
    vec![
        corner(-half.x, -half.y),
        corner(half.x, -half.y),
        corner(-half.x, half.y),
        corner(-half.x, half.y),
        corner(half.x, -half.y),
        corner(half.x, half.y),
    ]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Upper half of a circle resting on `base_y` (a hill)
pub fn dome(
    center_x: f32,
    base_y: f32,
    radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let center = Vec2::new(center_x, base_y);

    for i in 0..segments {
        let theta1 = PI + (i as f32 / segments as f32) * PI;
        let theta2 = PI + ((i + 1) as f32 / segments as f32) * PI;
        let p1 = center + Vec2::new(theta1.cos(), theta1.sin()) * radius;
        let p2 = center + Vec2::new(theta2.cos(), theta2.sin()) * radius;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_dome_stays_above_base() {
        let v = dome(100.0, 500.0, 80.0, [1.0; 4], 12);
        assert_eq!(v.len(), 36);
        assert!(v.iter().all(|v| v.position[1] <= 500.0 + 1e-3));
        assert!(v.iter().any(|v| (v.position[1] - 420.0).abs() < 1e-3));
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let v = rotated_rect(Vec2::ZERO, Vec2::new(10.0, 2.0), PI / 2.0, [1.0; 4]);
        let max_y = v.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 10.0).abs() < 1e-4);
    }
}
