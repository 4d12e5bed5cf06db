//! Axis-aligned box geometry for bodies, platforms and blocks
//!
//! Boxes are stored center + half extents in game pixels, y growing downward:
//! - top: center.y - half.y
//! - bottom: center.y + half.y

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Center position
    pub center: Vec2,
    /// Half of width/height
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontal-only overlap (used for landing checks)
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Return a copy moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            center: self.center + delta,
            half: self.half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let b = Aabb::from_xywh(100.0, 50.0, 40.0, 20.0);
        assert_eq!(b.left(), 80.0);
        assert_eq!(b.right(), 120.0);
        assert_eq!(b.top(), 40.0);
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.size(), Vec2::new(40.0, 20.0));
        assert_eq!(b.min(), Vec2::new(80.0, 40.0));
    }

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        let overlapping = Aabb::from_xywh(9.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn test_contains_point() {
        let b = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains_point(Vec2::new(5.0, -5.0)));
        assert!(!b.contains_point(Vec2::new(5.1, 0.0)));
    }
}
