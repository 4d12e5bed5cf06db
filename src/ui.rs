//! HUD text and word-label layout
//!
//! The HUD and the word labels are DOM text drawn over the canvas. This
//! module only decides what they say and where they go; `main.rs` applies it.

use crate::consts::{SCREEN_WIDTH, WORD_BLOCK_WIDTH};
use crate::sim::GameState;

/// "Level: N", 1-based
pub fn hud_level_text(level_index: u32) -> String {
    format!("Level: {}", level_index + 1)
}

/// "Coins: N"
pub fn hud_score_text(score: u32) -> String {
    format!("Coins: {}", score)
}

/// The music button names the action it performs
pub fn music_button_text(music_enabled: bool) -> &'static str {
    if music_enabled { "Music Off" } else { "Music On" }
}

/// Where and how to draw one word label, in game coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub block_id: u32,
    pub text: String,
    /// Label center on screen
    pub x: f32,
    pub y: f32,
    pub visible: bool,
    pub opacity: f32,
}

/// Labels for every block still in the world, centered on their blocks.
/// Labels scrolled fully out of view are hidden.
pub fn label_layouts(state: &GameState) -> Vec<LabelLayout> {
    let margin = WORD_BLOCK_WIDTH;
    state
        .blocks
        .iter()
        .map(|block| {
            let x = state.camera.to_screen_x(block.aabb.center.x);
            let on_screen = x > -margin && x < SCREEN_WIDTH + margin;
            LabelLayout {
                block_id: block.id,
                text: block.label.text.clone(),
                x,
                y: block.aabb.center.y,
                visible: block.label.visible && on_screen,
                opacity: block.alpha(),
            }
        })
        .collect()
}
