//! Game state and core simulation types
//!
//! Everything a play session mutates lives in [`GameState`]: the level index,
//! score, entities, pending timers, the shared debris emitter and the outbound
//! event queue. Nothing is global.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::anim::{AnimKey, Animator};
use super::camera::{Camera, Parallax};
use super::collision::{Touching, WorldBounds};
use super::effects::{DebrisConfig, DebrisEmitter};
use super::geom::Aabb;
use super::timer::TimerQueue;
use crate::consts::*;
use crate::words::WordList;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Normal play
    Playing,
    /// Player touched an enemy; motion frozen until the restart timer fires
    Defeated,
}

/// Horizontal facing of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn from_velocity(vx: f32, current: Facing) -> Facing {
        if vx < 0.0 {
            Facing::Left
        } else if vx > 0.0 {
            Facing::Right
        } else {
            current
        }
    }
}

/// Sound cues requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    CoinPickup,
    Jump,
    BlockSmash,
}

/// Outbound notifications drained by the platform layer each frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A level segment was generated (index is 0-based)
    LevelStarted { index: u32 },
    /// Say something out loud (most recent wins)
    Speak(String),
    /// Play a sound effect
    Sound(SoundCue),
    /// Coin counter changed
    ScoreChanged(u32),
    /// The correct word block was struck
    BlockSolved { block_id: u32 },
    /// A decoy word block was struck and broke
    BlockSmashed { block_id: u32 },
    /// A smashed block finished fading and was removed with its label
    BlockRemoved { block_id: u32 },
    /// Player touched an enemy
    PlayerDefeated,
    /// Session was rebuilt from level 0
    SessionRestarted,
}

/// Player tint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTint {
    Normal,
    /// Caught by an enemy
    Hurt,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Aabb,
    pub vel: Vec2,
    /// Contacts from the last physics step (solids and world bounds)
    pub touching: Touching,
    pub facing: Facing,
    pub anim: Animator,
    pub tint: PlayerTint,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            body: Aabb::new(spawn, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            vel: Vec2::ZERO,
            touching: Touching::default(),
            facing: Facing::Right,
            anim: Animator::new(AnimKey::Idle),
            tint: PlayerTint::Normal,
        }
    }

    /// Standing on something (a solid, a platform, or the world floor)
    pub fn grounded(&self) -> bool {
        self.touching.down
    }
}

/// Platform role within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Short platform near the level start for hopping over enemies
    Hop,
    /// Ascending step toward the word blocks
    Step,
    /// Last, wide step the word blocks hover over
    Summit,
}

/// A one-way platform
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    pub aabb: Aabb,
}

/// A patrolling enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Aabb,
    pub vel: Vec2,
    /// Patrol anchor x
    pub anchor_x: f32,
    pub facing: Facing,
    pub anim: Animator,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            body: Aabb::new(pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT)),
            vel: Vec2::new(-ENEMY_SPEED, 0.0),
            anchor_x: pos.x,
            facing: Facing::Left,
            anim: Animator::new(AnimKey::Walk),
        }
    }

    pub fn x(&self) -> f32 {
        self.body.center.x
    }
}

/// A rolling bonus coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u32,
    pub body: Aabb,
    pub vel: Vec2,
    /// Visual roll angle (radians)
    pub rotation: f32,
}

impl Coin {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            body: Aabb::new(pos, Vec2::splat(COIN_RADIUS * 2.0)),
            vel: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

/// Text overlay drawn on top of a word block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLabel {
    pub text: String,
    pub visible: bool,
}

/// Per-block outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockState {
    /// Not struck yet
    Untouched,
    /// Correct word struck (green tint)
    Solved,
    /// Decoy struck; waiting for the fade timer
    Smashed,
    /// Fading out (seconds into the fade)
    Fading { elapsed: f32 },
}

/// A word-choice block
#[derive(Debug, Clone)]
pub struct WordBlock {
    pub id: u32,
    /// Level that spawned this block
    pub level: u32,
    pub aabb: Aabb,
    pub word: String,
    pub label: TextLabel,
    /// Collides with the player
    pub enabled: bool,
    pub state: BlockState,
}

impl WordBlock {
    /// Opacity for rendering
    pub fn alpha(&self) -> f32 {
        match self.state {
            BlockState::Fading { elapsed } => {
                (1.0 - elapsed / BLOCK_FADE_DURATION).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this session was built from
    pub seed: u64,
    pub rng: Pcg32,
    /// Word table (kept across restarts)
    pub words: WordList,
    /// Current level index (0-based)
    pub current_level: u32,
    /// Coins collected
    pub score: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// World rectangle; grows as levels are appended
    pub bounds: WorldBounds,
    pub camera: Camera,
    pub parallax: Parallax,
    pub player: Player,
    pub floors: Vec<Aabb>,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub blocks: Vec<WordBlock>,
    /// Shared, pre-allocated debris emitter
    pub debris: DebrisEmitter,
    pub timers: TimerQueue,
    /// Outbound events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session with the built-in words and generate level 0
    pub fn new(seed: u64) -> Self {
        Self::with_words(seed, WordList::builtin())
    }

    /// Create a session with a custom word table and generate level 0
    pub fn with_words(seed: u64, words: WordList) -> Self {
        let mut state = Self::empty(seed, words);
        super::level::spawn_level(&mut state, 0);
        state
    }

    /// Session with no level generated yet
    pub fn empty(seed: u64, words: WordList) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            words,
            current_level: 0,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            bounds: WorldBounds {
                min_x: 0.0,
                max_x: LEVEL_WIDTH,
                min_y: 0.0,
                max_y: SCREEN_HEIGHT,
            },
            camera: Camera::new(LEVEL_WIDTH),
            parallax: Parallax::default(),
            player: Player::new(Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y)),
            floors: Vec::new(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            coins: Vec::new(),
            blocks: Vec::new(),
            debris: DebrisEmitter::new(DEBRIS_CAPACITY, DebrisConfig::default()),
            timers: TimerQueue::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rebuild the whole session from level 0 with a fresh score.
    ///
    /// Pending timers, entities and effects belong to the old session and are
    /// dropped with it.
    pub fn restart(&mut self) {
        let seed = self.rng.next_u64();
        let words = std::mem::take(&mut self.words);
        let mut events = std::mem::take(&mut self.events);
        *self = Self::with_words(seed, words);
        events.push(GameEvent::SessionRestarted);
        events.append(&mut self.events);
        self.events = events;
        log::info!("Session restarted (seed {})", seed);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending outbound events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn block(&self, id: u32) -> Option<&WordBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: u32) -> Option<&mut WordBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Blocks spawned by a given level
    pub fn level_blocks(&self, level: u32) -> impl Iterator<Item = &WordBlock> {
        self.blocks.iter().filter(move |b| b.level == level)
    }
}
