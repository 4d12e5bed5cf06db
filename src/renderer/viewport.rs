//! Letterboxed mapping between the 800x600 game screen and the canvas

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Fits the game screen inside a canvas, centered, keeping aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub canvas: Vec2,
    /// Canvas units per game pixel
    pub scale: f32,
    /// Canvas position of the game screen's top-left corner
    pub offset: Vec2,
}

impl Viewport {
    pub fn fit(canvas_width: f32, canvas_height: f32) -> Self {
        let canvas = Vec2::new(canvas_width.max(1.0), canvas_height.max(1.0));
        let scale = (canvas.x / SCREEN_WIDTH).min(canvas.y / SCREEN_HEIGHT);
        let offset = (canvas - Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) * scale) * 0.5;
        Self {
            canvas,
            scale,
            offset,
        }
    }

    /// Game screen point to canvas units
    pub fn to_canvas(&self, game: Vec2) -> Vec2 {
        self.offset + game * self.scale
    }

    /// Canvas point (e.g. a pointer position) to game screen coordinates
    pub fn to_game(&self, canvas: Vec2) -> Vec2 {
        (canvas - self.offset) / self.scale
    }

    /// Game screen point to normalized device coordinates (y up)
    pub fn to_ndc(&self, game: Vec2) -> Vec2 {
        let c = self.to_canvas(game);
        Vec2::new(c.x / self.canvas.x * 2.0 - 1.0, 1.0 - c.y / self.canvas.y * 2.0)
    }
}
