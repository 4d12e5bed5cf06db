//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Side effects (speech, sound, HUD) leave as [`GameEvent`]s
//! - No rendering or platform dependencies

pub mod anim;
pub mod camera;
pub mod collision;
pub mod effects;
pub mod events;
pub mod geom;
pub mod level;
pub mod state;
pub mod tick;
pub mod timer;

pub use anim::{AnimKey, Animator};
pub use camera::{Camera, Parallax};
pub use collision::{Side, Solid, SolidKind, SolidTag, Touching, WorldBounds};
pub use effects::{DebrisConfig, DebrisEmitter, DebrisParticle};
pub use events::{Contact, LEVEL_COMPLETE_PHRASE, handle_contact};
pub use geom::Aabb;
pub use level::{LevelLayout, enemy_count, level_start_x, plan_level, spawn_level};
pub use state::{
    BlockState, Coin, Enemy, Facing, GameEvent, GamePhase, GameState, Platform, PlatformKind,
    Player, PlayerTint, SoundCue, TextLabel, WordBlock,
};
pub use tick::{TickInput, relocation_x, tick};
pub use timer::{TimerAction, TimerQueue};
