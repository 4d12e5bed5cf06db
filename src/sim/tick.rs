//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::anim::AnimKey;
use super::camera::Parallax;
use super::collision::{
    BoundsMask, Side, Solid, SolidKind, SolidTag, clamp_to_bounds, move_and_collide,
};
use super::events::{Contact, handle_contact};
use super::state::{BlockState, Facing, GameEvent, GamePhase, GameState, SoundCue};
use super::timer::TimerAction;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Run left (arrow key or touch arrow held)
    pub left: bool,
    /// Run right
    pub right: bool,
    /// Jump key held; jumps whenever the player is grounded
    pub jump: bool,
    /// Jump button pressed this frame (touch); one-shot
    pub jump_pressed: bool,
}

/// Enemies only clamp to the left and bottom world edges. The right edge
/// stays open so respawns ahead of the camera keep their spacing.
const ENEMY_BOUNDS: BoundsMask = BoundsMask {
    left: true,
    right: false,
    top: false,
    bottom: true,
};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if state.phase == GamePhase::Playing {
        control_player(state, input);
        let contacts = step_physics(state, dt);
        for contact in contacts {
            handle_contact(state, contact);
        }
    }

    state.camera.follow(state.player.body.center.x);
    state.parallax = Parallax::from_scroll(state.camera.scroll_x);

    if state.phase == GamePhase::Playing {
        patrol_enemies(state);
        flee_coins(state, dt);
    }

    for action in state.timers.advance(dt) {
        match action {
            TimerAction::SpeakWord(word) => state.push_event(GameEvent::Speak(word)),
            TimerAction::FadeBlock(id) => {
                if let Some(block) = state.block_mut(id) {
                    block.state = BlockState::Fading { elapsed: 0.0 };
                }
            }
            TimerAction::Restart => {
                // The old session, its timers included, is gone after this
                state.restart();
                return;
            }
        }
    }

    update_fading_blocks(state, dt);
    state.debris.update(dt);

    state.player.anim.advance(dt);
    for enemy in &mut state.enemies {
        enemy.anim.advance(dt);
    }
}

fn control_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    if input.left {
        player.vel.x = -PLAYER_RUN_SPEED;
        player.anim.play(AnimKey::Run, true);
        player.facing = Facing::Left;
    } else if input.right {
        player.vel.x = PLAYER_RUN_SPEED;
        player.anim.play(AnimKey::Run, true);
        player.facing = Facing::Right;
    } else {
        player.vel.x = 0.0;
        player.anim.play(AnimKey::Idle, true);
    }

    if (input.jump || input.jump_pressed) && player.grounded() {
        player.vel.y = -PLAYER_JUMP_SPEED;
        player.touching.down = false;
        state.push_event(GameEvent::Sound(SoundCue::Jump));
    }
}

/// Static obstacles in collision order
fn static_solids(state: &GameState) -> (Vec<Solid>, Vec<Solid>, Vec<Solid>) {
    let floors: Vec<Solid> = state
        .floors
        .iter()
        .map(|aabb| Solid {
            aabb: *aabb,
            kind: SolidKind::Solid,
            tag: SolidTag::Floor,
        })
        .collect();
    let platforms: Vec<Solid> = state
        .platforms
        .iter()
        .map(|p| Solid {
            aabb: p.aabb,
            kind: SolidKind::OneWay,
            tag: SolidTag::Platform(p.id),
        })
        .collect();
    let blocks: Vec<Solid> = state
        .blocks
        .iter()
        .filter(|b| b.enabled)
        .map(|b| Solid {
            aabb: b.aabb,
            kind: SolidKind::Solid,
            tag: SolidTag::Block(b.id),
        })
        .collect();
    (floors, platforms, blocks)
}

/// Move every dynamic body and collect player contacts
fn step_physics(state: &mut GameState, dt: f32) -> Vec<Contact> {
    let (floors, platforms, blocks) = static_solids(state);
    let mut contacts = Vec::new();

    // Player: floors, platforms and live word blocks
    let player_solids: Vec<Solid> = floors
        .iter()
        .chain(platforms.iter())
        .chain(blocks.iter())
        .copied()
        .collect();
    {
        let bounds = state.bounds;
        let player = &mut state.player;
        player.vel.y += GRAVITY * dt;
        let bounce = Vec2::splat(PLAYER_BOUNCE);
        let result =
            move_and_collide(&mut player.body, &mut player.vel, bounce, dt, &player_solids);
        let mut touching = result.touching;
        touching.merge(clamp_to_bounds(
            &mut player.body,
            &mut player.vel,
            bounce,
            &bounds,
            BoundsMask::ALL,
        ));
        player.touching = touching;

        for hit in &result.hits {
            if let (SolidTag::Block(id), Side::Top) = (hit.tag, hit.side) {
                let contact = Contact::BlockStruck(id);
                if !contacts.contains(&contact) {
                    contacts.push(contact);
                }
            }
        }
    }

    // Enemies: floors only
    for enemy in &mut state.enemies {
        enemy.vel.y += GRAVITY * dt;
        move_and_collide(&mut enemy.body, &mut enemy.vel, Vec2::ZERO, dt, &floors);
        let blocked = clamp_to_bounds(
            &mut enemy.body,
            &mut enemy.vel,
            Vec2::ZERO,
            &state.bounds,
            ENEMY_BOUNDS,
        );
        if blocked.left {
            enemy.vel.x = ENEMY_SPEED;
            enemy.facing = Facing::Right;
        }
    }

    // Coins: floors and platforms, no world bounds
    let coin_solids: Vec<Solid> = floors.iter().chain(platforms.iter()).copied().collect();
    let coin_bounce = Vec2::new(COIN_BOUNCE_X, COIN_BOUNCE_Y);
    for coin in &mut state.coins {
        coin.vel.y += GRAVITY * dt;
        coin.vel.x = apply_drag(coin.vel.x, COIN_DRAG, dt);
        move_and_collide(&mut coin.body, &mut coin.vel, coin_bounce, dt, &coin_solids);
    }
    let max_y = state.bounds.max_y;
    state.coins.retain(|c| c.body.top() <= max_y);

    let player_body = state.player.body;
    for enemy in &state.enemies {
        if player_body.overlaps(&enemy.body) {
            contacts.push(Contact::EnemyTouched(enemy.id));
        }
    }
    for coin in &state.coins {
        if player_body.overlaps(&coin.body) {
            contacts.push(Contact::CoinTouched(coin.id));
        }
    }

    contacts
}

/// Slow a speed toward zero by `drag * dt` without overshooting
fn apply_drag(speed: f32, drag: f32, dt: f32) -> f32 {
    let step = drag * dt;
    if speed.abs() <= step {
        0.0
    } else {
        speed - speed.signum() * step
    }
}

/// Where to place an enemy that fell behind the camera: just past the right
/// edge of the view, pushed further right until it clears every other enemy
pub fn relocation_x(scroll_x: f32, others: &[f32]) -> f32 {
    let mut x = scroll_x + SCREEN_WIDTH + ENEMY_RESPAWN_AHEAD;
    for _ in 0..ENEMY_RESPAWN_ATTEMPTS {
        if others.iter().any(|o| (o - x).abs() < ENEMY_MIN_SEPARATION) {
            x += ENEMY_RESPAWN_STEP;
        } else {
            break;
        }
    }
    x
}

fn patrol_enemies(state: &mut GameState) {
    let scroll_x = state.camera.scroll_x;

    for i in 0..state.enemies.len() {
        if state.enemies[i].x() < scroll_x - ENEMY_RESPAWN_BEHIND {
            let others: Vec<f32> = state
                .enemies
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, e)| e.x())
                .collect();
            let x = relocation_x(scroll_x, &others);

            let enemy = &mut state.enemies[i];
            enemy.body.center.x = x;
            enemy.anchor_x = x;
            enemy.vel.x = -ENEMY_SPEED;
            enemy.facing = Facing::Left;
            log::debug!("Enemy {} relocated to x={}", enemy.id, x);
            continue;
        }

        let enemy = &mut state.enemies[i];
        if enemy.vel.x < 0.0 && enemy.x() < enemy.anchor_x - ENEMY_PATROL_RANGE {
            enemy.vel.x = ENEMY_SPEED;
            enemy.facing = Facing::Right;
        } else if enemy.vel.x > 0.0 && enemy.x() > enemy.anchor_x + ENEMY_PATROL_RANGE {
            enemy.vel.x = -ENEMY_SPEED;
            enemy.facing = Facing::Left;
        }
    }
}

fn flee_coins(state: &mut GameState, dt: f32) {
    let player_pos = state.player.body.center;
    let frames = dt / FRAME_DT;

    for coin in &mut state.coins {
        if player_pos.distance(coin.body.center) < COIN_FLEE_RADIUS {
            coin.vel.x = if player_pos.x < coin.body.center.x {
                COIN_FLEE_SPEED
            } else {
                -COIN_FLEE_SPEED
            };
        }
        coin.rotation += coin.vel.x * COIN_ROLL_FACTOR * frames;
    }
}

fn update_fading_blocks(state: &mut GameState, dt: f32) {
    let mut removed = Vec::new();
    for block in &mut state.blocks {
        if let BlockState::Fading { elapsed } = &mut block.state {
            *elapsed += dt;
            if *elapsed >= BLOCK_FADE_DURATION {
                removed.push(block.id);
            }
        }
    }
    if removed.is_empty() {
        return;
    }
    state.blocks.retain(|b| !removed.contains(&b.id));
    for block_id in removed {
        state.push_event(GameEvent::BlockRemoved { block_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::hit_block;
    use crate::sim::state::PlayerTint;
    use proptest::prelude::*;

    fn run(state: &mut GameState, input: &TickInput, seconds: f32) {
        let steps = (seconds / SIM_DT).round() as usize;
        for _ in 0..steps {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_player_lands_on_floor() {
        let mut state = GameState::new(12345);
        run(&mut state, &TickInput::default(), 0.5);

        assert!(state.player.grounded());
        assert!((state.player.body.bottom() - 550.0).abs() < 0.01);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_running_and_facing() {
        let mut state = GameState::new(12345);
        run(&mut state, &TickInput::default(), 0.5);
        let start_x = state.player.body.center.x;

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, SIM_DT);
        assert_eq!(state.player.vel.x, -PLAYER_RUN_SPEED);
        assert_eq!(state.player.facing, Facing::Left);
        assert_eq!(state.player.anim.key(), AnimKey::Run);
        assert!(state.player.body.center.x < start_x);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.anim.key(), AnimKey::Idle);
        assert_eq!(state.player.facing, Facing::Left);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut state = GameState::new(12345);
        run(&mut state, &TickInput::default(), 0.5);
        state.drain_events();

        let jump = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT);
        assert!(state.player.vel.y < -400.0);
        assert!(!state.player.grounded());
        assert!(state.drain_events().contains(&GameEvent::Sound(SoundCue::Jump)));

        // Mid-air: no second jump
        let vy = state.player.vel.y;
        tick(&mut state, &jump, SIM_DT);
        assert!(state.player.vel.y > vy);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_head_strike_solves_level() {
        let mut state = GameState::new(12345);
        let cat = state
            .level_blocks(0)
            .find(|b| b.word == "CAT")
            .map(|b| (b.id, b.aabb))
            .unwrap();
        let (id, aabb) = cat;

        state.player.body.center =
            Vec2::new(aabb.center.x, aabb.bottom() + PLAYER_HEIGHT / 2.0 + 2.0);
        state.player.vel = Vec2::new(0.0, -PLAYER_JUMP_SPEED);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.current_level, 1);
        assert!(!state.block(id).unwrap().enabled);
        assert!(state.player.vel.y >= 0.0);
    }

    #[test]
    fn test_smashed_block_lingers_then_fades() {
        let mut state = GameState::new(12345);
        let bat = state
            .level_blocks(0)
            .find(|b| b.word == "BAT")
            .map(|b| b.id)
            .unwrap();
        hit_block(&mut state, bat);
        state.drain_events();

        run(&mut state, &TickInput::default(), 2.25);
        assert!(matches!(state.block(bat).unwrap().state, BlockState::Fading { .. }));
        assert!(state.block(bat).unwrap().alpha() > 0.0);

        run(&mut state, &TickInput::default(), 0.3);
        assert!(state.block(bat).is_none());
        assert!(state.drain_events().contains(&GameEvent::BlockRemoved { block_id: bat }));
        // The level is not advanced by a wrong answer
        assert_eq!(state.current_level, 0);
        assert_eq!(state.level_blocks(0).count(), 2);
    }

    #[test]
    fn test_correct_hit_advances_while_wrong_block_still_smashed() {
        let mut state = GameState::new(12345);
        let word_id = |state: &GameState, word: &str| {
            state
                .level_blocks(0)
                .find(|b| b.word == word)
                .map(|b| b.id)
                .unwrap()
        };
        let bat = word_id(&state, "BAT");
        let cat = word_id(&state, "CAT");

        hit_block(&mut state, bat);
        hit_block(&mut state, cat);

        assert_eq!(state.current_level, 1);
        assert_eq!(state.block(bat).unwrap().state, BlockState::Smashed);
        assert!(state.timers.is_pending(&TimerAction::FadeBlock(bat)));
        state.enemies.clear();
        state.drain_events();

        run(&mut state, &TickInput::default(), 2.6);
        assert!(state.block(bat).is_none());
        assert!(state.drain_events().contains(&GameEvent::BlockRemoved { block_id: bat }));
        assert_eq!(state.current_level, 1);
    }

    #[test]
    fn test_target_word_spoken_after_delay() {
        let mut state = GameState::new(12345);
        state.drain_events();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.drain_events().is_empty());

        run(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.drain_events(), vec![GameEvent::Speak("CAT".into())]);
    }

    #[test]
    fn test_enemy_contact_freezes_then_restarts() {
        let mut state = GameState::new(12345);
        run(&mut state, &TickInput::default(), 0.5);
        state.score = 4;

        let enemy = state.enemies[0].body.center;
        state.player.body.center = Vec2::new(enemy.x, state.player.body.center.y);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Defeated);
        assert_eq!(state.player.tint, PlayerTint::Hurt);

        // Frozen: input is ignored
        let frozen_at = state.player.body.center;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, &right, 0.5);
        assert_eq!(state.player.body.center, frozen_at);

        run(&mut state, &TickInput::default(), 0.6);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.current_level, 0);
        assert_eq!(state.player.tint, PlayerTint::Normal);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::SessionRestarted));
        assert!(events.contains(&GameEvent::LevelStarted { index: 0 }));
    }

    #[test]
    fn test_enemy_relocates_ahead_of_camera() {
        let mut state = GameState::new(12345);
        state.player.body.center = Vec2::new(1500.0, PLAYER_SPAWN_Y);
        tick(&mut state, &TickInput::default(), SIM_DT);

        let scroll = state.camera.scroll_x;
        assert_eq!(scroll, 1100.0);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.x(), scroll + SCREEN_WIDTH + ENEMY_RESPAWN_AHEAD);
        assert_eq!(enemy.anchor_x, enemy.x());
        assert_eq!(enemy.vel.x, -ENEMY_SPEED);
        assert_eq!(enemy.facing, Facing::Left);
    }

    #[test]
    fn test_enemy_turns_at_patrol_edge() {
        let mut state = GameState::new(12345);
        let anchor = state.enemies[0].anchor_x;
        state.enemies[0].body.center.x = anchor - ENEMY_PATROL_RANGE - 1.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.enemies[0].vel.x, ENEMY_SPEED);
        assert_eq!(state.enemies[0].facing, Facing::Right);
    }

    #[test]
    fn test_coin_rolls_away_from_player() {
        let mut state = GameState::new(12345);
        let player = state.player.body.center;
        state.coins[0].body.center = player + Vec2::new(100.0, 0.0);
        state.coins[0].vel = Vec2::ZERO;

        tick(&mut state, &TickInput::default(), SIM_DT);
        let coin = &state.coins[0];
        assert_eq!(coin.vel.x, COIN_FLEE_SPEED);
        assert!(coin.rotation > 0.0);
    }

    #[test]
    fn test_coin_collected_on_overlap() {
        let mut state = GameState::new(12345);
        let id = state.coins[0].id;
        state.coins[0].body.center = state.player.body.center;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 1);
        assert!(state.coins.iter().all(|c| c.id != id));
    }

    #[test]
    fn test_coin_lost_below_world_is_culled() {
        let mut state = GameState::new(12345);
        let count = state.coins.len();
        state.coins[0].body.center = Vec2::new(3000.0, SCREEN_HEIGHT + 40.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.coins.len(), count - 1);
    }

    #[test]
    fn test_drag_stops_without_overshoot() {
        assert_eq!(apply_drag(0.5, 100.0, SIM_DT), 0.0);
        assert!((apply_drag(75.0, 100.0, 0.5) - 25.0).abs() < 1e-4);
        assert!((apply_drag(-75.0, 100.0, 0.5) + 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in inputs.iter().cycle().take(400) {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.body, state2.player.body);
        assert_eq!(state1.coins.len(), state2.coins.len());
        assert_eq!(state1.enemies[0].body, state2.enemies[0].body);
    }

    proptest! {
        #[test]
        fn prop_relocation_clears_other_enemies(
            scroll in 0.0f32..20_000.0,
            others in proptest::collection::vec(0.0f32..25_000.0, 0..3),
        ) {
            let x = relocation_x(scroll, &others);
            prop_assert!(x >= scroll + SCREEN_WIDTH + ENEMY_RESPAWN_AHEAD);
            for other in &others {
                prop_assert!((other - x).abs() >= ENEMY_MIN_SEPARATION);
            }
        }
    }
}
