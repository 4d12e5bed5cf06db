//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, multi-touch buttons)
//! - Startup failures (missing DOM pieces, no GPU)

pub mod input;

pub use input::{InputState, Key, TouchButton, button_at};

/// Why the game could not start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// No `window` or `document`
    NoWindow,
    /// Required element missing from the page
    MissingElement(&'static str),
    /// Rendering surface could not be created
    Surface(String),
    /// No compatible GPU adapter
    NoAdapter,
    /// Device request rejected
    Device(String),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::NoWindow => write!(f, "no browser window available"),
            StartupError::MissingElement(id) => write!(f, "page element #{} not found", id),
            StartupError::Surface(e) => write!(f, "failed to create surface: {}", e),
            StartupError::NoAdapter => write!(f, "no compatible GPU adapter"),
            StartupError::Device(e) => write!(f, "failed to create device: {}", e),
        }
    }
}

impl std::error::Error for StartupError {}
