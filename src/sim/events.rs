//! Gameplay reactions to contacts
//!
//! Physics only reports what touched what; [`handle_contact`] decides what it
//! means. Contacts are collected during a tick and processed afterwards so the
//! entity lists are never mutated while being iterated.

use super::anim::AnimKey;
use super::level::spawn_level;
use super::state::{BlockState, GameEvent, GamePhase, GameState, PlayerTint, SoundCue};
use super::timer::TimerAction;
use crate::consts::{DEBRIS_BURST, RESTART_DELAY, SMASHED_LINGER};

/// Phrase spoken when the correct word is struck
pub const LEVEL_COMPLETE_PHRASE: &str = "Level Complete";

/// Something the player touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player's head struck the underside of a word block
    BlockStruck(u32),
    /// Player overlapped an enemy
    EnemyTouched(u32),
    /// Player overlapped a coin
    CoinTouched(u32),
}

pub fn handle_contact(state: &mut GameState, contact: Contact) {
    match contact {
        Contact::BlockStruck(id) => hit_block(state, id),
        Contact::EnemyTouched(id) => hit_enemy(state, id),
        Contact::CoinTouched(id) => collect_coin(state, id),
    }
}

/// Judge a struck word block against the current level's target.
///
/// Disabled blocks (already solved or smashed) are ignored.
pub fn hit_block(state: &mut GameState, block_id: u32) {
    let Some(block) = state.block(block_id) else {
        return;
    };
    if !block.enabled {
        return;
    }
    let level = block.level;
    let correct = block.word == state.words.descriptor(level).target;
    let center = block.aabb.center;

    if correct {
        if let Some(block) = state.block_mut(block_id) {
            block.enabled = false;
            block.state = BlockState::Solved;
        }
        state.push_event(GameEvent::Speak(LEVEL_COMPLETE_PHRASE.to_string()));
        state.push_event(GameEvent::BlockSolved { block_id });
        log::info!("Level {} complete", level + 1);
        spawn_level(state, level + 1);
    } else {
        if let Some(block) = state.block_mut(block_id) {
            block.enabled = false;
            block.label.visible = false;
            block.state = BlockState::Smashed;
        }
        state.debris.explode(DEBRIS_BURST, center, &mut state.rng);
        state.push_event(GameEvent::Sound(SoundCue::BlockSmash));
        state.push_event(GameEvent::BlockSmashed { block_id });
        state
            .timers
            .schedule(SMASHED_LINGER, TimerAction::FadeBlock(block_id));
        log::debug!("Wrong block {} smashed", block_id);
    }
}

/// Defeat the player; the session restarts after a short pause
pub fn hit_enemy(state: &mut GameState, enemy_id: u32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Defeated;

    let player = &mut state.player;
    player.tint = PlayerTint::Hurt;
    player.anim.play(AnimKey::Idle, false);
    player.vel = glam::Vec2::ZERO;
    for enemy in &mut state.enemies {
        enemy.vel = glam::Vec2::ZERO;
    }
    for coin in &mut state.coins {
        coin.vel = glam::Vec2::ZERO;
    }

    state.push_event(GameEvent::PlayerDefeated);
    state.timers.schedule(RESTART_DELAY, TimerAction::Restart);
    log::info!("Player caught by enemy {}", enemy_id);
}

/// Remove a coin and bump the score; a coin can only be counted once
pub fn collect_coin(state: &mut GameState, coin_id: u32) {
    let Some(index) = state.coins.iter().position(|c| c.id == coin_id) else {
        return;
    };
    state.coins.remove(index);
    state.score += 1;
    state.push_event(GameEvent::Sound(SoundCue::CoinPickup));
    state.push_event(GameEvent::ScoreChanged(state.score));
}
