//! Side-scrolling camera and parallax offsets

use crate::consts::{PARALLAX_FAR, PARALLAX_NEAR, PARALLAX_PATH, SCREEN_WIDTH};

/// Horizontal follow camera clamped to the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Left edge of the view in world x
    pub scroll_x: f32,
    /// World width the camera may show
    pub bounds_width: f32,
}

impl Camera {
    pub fn new(bounds_width: f32) -> Self {
        Self {
            scroll_x: 0.0,
            bounds_width,
        }
    }

    pub fn set_bounds(&mut self, width: f32) {
        self.bounds_width = width;
        self.scroll_x = self.clamp(self.scroll_x);
    }

    /// Center the view on `target_x`, staying inside the bounds
    pub fn follow(&mut self, target_x: f32) {
        self.scroll_x = self.clamp(target_x - SCREEN_WIDTH / 2.0);
    }

    fn clamp(&self, scroll_x: f32) -> f32 {
        let max = (self.bounds_width - SCREEN_WIDTH).max(0.0);
        scroll_x.clamp(0.0, max)
    }

    /// Convert a world x to screen x
    pub fn to_screen_x(&self, world_x: f32) -> f32 {
        world_x - self.scroll_x
    }
}

/// Texture scroll offsets of the three background layers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Parallax {
    /// Distant hills
    pub far: f32,
    /// Near hills
    pub near: f32,
    /// Brick path (moves with the world)
    pub path: f32,
}

impl Parallax {
    pub fn from_scroll(scroll_x: f32) -> Self {
        Self {
            far: scroll_x * PARALLAX_FAR,
            near: scroll_x * PARALLAX_NEAR,
            path: scroll_x * PARALLAX_PATH,
        }
    }
}
