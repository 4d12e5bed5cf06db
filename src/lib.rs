//! Word Hop - a side-scrolling reading platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level layout, arcade physics, gameplay events)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input abstraction
//! - `audio` / `speech`: Web Audio tones and Text-to-Speech adapters
//! - `words`: Level word table (built-in or loaded from JSON)
//! - `ui`: HUD text and word-label layout

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod speech;
pub mod ui;
pub mod words;

pub use settings::Settings;
pub use words::{LevelDescriptor, WordList, WordListError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for stable platform contacts)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Reference frame time for effects tuned per rendered frame
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Logical screen size (game pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 600.0;
    /// Bounced speeds below this settle to rest
    pub const REST_SPEED: f32 = 60.0;

    /// Player body
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 455.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_RUN_SPEED: f32 = 160.0;
    pub const PLAYER_JUMP_SPEED: f32 = 440.0;
    pub const PLAYER_BOUNCE: f32 = 0.1;

    /// Level segment geometry
    pub const LEVEL_WIDTH: f32 = 2400.0;
    pub const FLOOR_CENTER_OFFSET: f32 = 1500.0;
    pub const FLOOR_WIDTH: f32 = 3000.0;
    pub const FLOOR_HEIGHT: f32 = 50.0;

    /// Platforms (all one-way, landing from above only)
    pub const PLATFORM_THICKNESS: f32 = 40.0;
    pub const HOP_PLATFORM_WIDTH: f32 = 120.0;
    pub const STEP_PLATFORM_WIDTH: f32 = 200.0;
    pub const SUMMIT_PLATFORM_WIDTH: f32 = 600.0;
    pub const MAX_STEP_PLATFORMS: u32 = 4;

    /// Coins
    pub const COIN_RADIUS: f32 = 14.0;
    /// Out of a roll in 0..=100
    pub const COIN_SPAWN_CHANCE: u32 = 80;
    pub const COIN_FLEE_RADIUS: f32 = 200.0;
    pub const COIN_FLEE_SPEED: f32 = 75.0;
    pub const COIN_DRAG: f32 = 100.0;
    pub const COIN_BOUNCE_X: f32 = 0.5;
    pub const COIN_BOUNCE_Y: f32 = 0.4;
    /// Radians of roll per (px/s) of horizontal speed per rendered frame
    pub const COIN_ROLL_FACTOR: f32 = 0.0035;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 48.0;
    pub const ENEMY_HEIGHT: f32 = 56.0;
    pub const ENEMY_SPEED: f32 = 30.0;
    pub const ENEMY_SPACING: f32 = 400.0;
    pub const ENEMY_PATROL_RANGE: f32 = 200.0;
    pub const ENEMY_RESPAWN_BEHIND: f32 = 100.0;
    pub const ENEMY_RESPAWN_AHEAD: f32 = 100.0;
    pub const ENEMY_MIN_SEPARATION: f32 = 400.0;
    pub const ENEMY_RESPAWN_STEP: f32 = 150.0;
    pub const ENEMY_RESPAWN_ATTEMPTS: u32 = 50;

    /// Word blocks
    pub const WORD_BLOCK_WIDTH: f32 = 96.0;
    pub const WORD_BLOCK_HEIGHT: f32 = 64.0;
    pub const WORD_BLOCK_SPACING: f32 = 200.0;

    /// Delays (seconds)
    pub const SPEAK_TARGET_DELAY: f32 = 0.1;
    pub const SMASHED_LINGER: f32 = 2.0;
    pub const BLOCK_FADE_DURATION: f32 = 0.5;
    pub const RESTART_DELAY: f32 = 1.0;

    /// Debris burst from a smashed block
    pub const DEBRIS_BURST: usize = 15;
    pub const DEBRIS_CAPACITY: usize = 64;

    /// Parallax scroll factors (far hills, near hills, brick path)
    pub const PARALLAX_FAR: f32 = 0.3;
    pub const PARALLAX_NEAR: f32 = 0.7;
    pub const PARALLAX_PATH: f32 = 1.0;

    /// On-screen touch controls (screen space)
    pub const JUMP_BUTTON_X: f32 = SCREEN_WIDTH - 220.0;
    pub const LEFT_BUTTON_X: f32 = SCREEN_WIDTH - 140.0;
    pub const RIGHT_BUTTON_X: f32 = SCREEN_WIDTH - 60.0;
    pub const TOUCH_BUTTON_Y: f32 = SCREEN_HEIGHT - 70.0;
    pub const JUMP_BUTTON_RADIUS: f32 = 35.0;
    pub const ARROW_BUTTON_SIZE: f32 = 50.0;
}
