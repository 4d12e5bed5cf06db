//! Builds the frame's triangle list from the game state
//!
//! Output is in game screen coordinates (800x600, y down, camera applied).
//! Draw order is back to front: sky, parallax hills, brick path, platforms,
//! word blocks, coins, enemies, player, debris, touch buttons.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::*;
use crate::platform::{InputState, TouchButton};
use crate::sim::{
    Aabb, BlockState, Camera, Coin, Enemy, Facing, GameState, Player, PlayerTint, WordBlock,
};

/// What to include beyond the world itself
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub touch_controls: bool,
    pub particles: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            touch_controls: true,
            particles: true,
        }
    }
}

const BRICK_WIDTH: f32 = 40.0;
const BRICK_HEIGHT: f32 = 16.0;

/// Screen-space box of a world box, or `None` if it is out of view
fn on_screen(camera: &Camera, aabb: &Aabb) -> Option<Aabb> {
    let x = camera.to_screen_x(aabb.center.x);
    if x + aabb.half.x < 0.0 || x - aabb.half.x > SCREEN_WIDTH {
        return None;
    }
    Some(Aabb {
        center: Vec2::new(x, aabb.center.y),
        half: aabb.half,
    })
}

pub fn build_scene(state: &GameState, input: &InputState, options: SceneOptions) -> Vec<Vertex> {
    let mut v = Vec::with_capacity(4096);

    background(&mut v, state);

    for floor in &state.floors {
        if let Some(b) = on_screen(&state.camera, floor) {
            bricks(&mut v, &b, state.parallax.path);
        }
    }
    for platform in &state.platforms {
        if let Some(b) = on_screen(&state.camera, &platform.aabb) {
            v.extend(shapes::rect(b.min(), b.size(), colors::PLATFORM));
            v.extend(shapes::rect(b.min(), Vec2::new(b.size().x, 8.0), colors::PLATFORM_TOP));
        }
    }
    for block in &state.blocks {
        if let Some(b) = on_screen(&state.camera, &block.aabb) {
            word_block(&mut v, block, &b);
        }
    }
    for coin in &state.coins {
        if let Some(b) = on_screen(&state.camera, &coin.body) {
            coin_sprite(&mut v, coin, &b);
        }
    }
    for enemy in &state.enemies {
        if let Some(b) = on_screen(&state.camera, &enemy.body) {
            enemy_sprite(&mut v, enemy, &b);
        }
    }
    if let Some(b) = on_screen(&state.camera, &state.player.body) {
        player_sprite(&mut v, &state.player, &b);
    }

    if options.particles {
        let size = state.debris.config.size;
        for p in state.debris.live() {
            let scale = state.debris.scale_of(p);
            let half = Vec2::splat(size * scale * 0.5);
            let center = Vec2::new(state.camera.to_screen_x(p.pos.x), p.pos.y);
            v.extend(shapes::rect(center - half, half * 2.0, colors::DEBRIS));
        }
    }

    if options.touch_controls {
        touch_buttons(&mut v, input);
    }

    v
}

fn background(v: &mut Vec<Vertex>, state: &GameState) {
    v.extend(shapes::gradient_rect(
        Vec2::ZERO,
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));
    hills(v, state.parallax.far, 420.0, 180.0, 360.0, colors::HILL_FAR);
    hills(v, state.parallax.near, 260.0, 110.0, 450.0, colors::HILL_NEAR);
}

/// A repeating row of domes scrolled by `offset`
fn hills(v: &mut Vec<Vertex>, offset: f32, period: f32, radius: f32, base_y: f32, color: [f32; 4]) {
    let shift = offset.rem_euclid(period);
    let mut x = -shift - radius;
    while x < SCREEN_WIDTH + radius + period {
        v.extend(shapes::dome(x, base_y, radius, color, 16));
        x += period;
    }
    v.extend(shapes::rect(
        Vec2::new(0.0, base_y),
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT - base_y),
        color,
    ));
}

/// Brick path filling a floor, mortar lines aligned to the path scroll
fn bricks(v: &mut Vec<Vertex>, b: &Aabb, scroll: f32) {
    let min = b.min();
    v.extend(shapes::rect(min, b.size(), colors::BRICK));

    let rows = (b.size().y / BRICK_HEIGHT).ceil() as usize;
    for row in 0..rows {
        let y = min.y + row as f32 * BRICK_HEIGHT;
        v.extend(shapes::rect(Vec2::new(min.x, y), Vec2::new(b.size().x, 2.0), colors::MORTAR));

        // Stagger every other row by half a brick
        let stagger = if row % 2 == 0 { 0.0 } else { BRICK_WIDTH / 2.0 };
        let mut x = (stagger - scroll).rem_euclid(BRICK_WIDTH) - BRICK_WIDTH;
        if x < min.x {
            x += ((min.x - x) / BRICK_WIDTH).ceil() * BRICK_WIDTH;
        }
        let height = BRICK_HEIGHT.min(min.y + b.size().y - y);
        while x < (min.x + b.size().x).min(SCREEN_WIDTH) {
            v.extend(shapes::rect(Vec2::new(x, y), Vec2::new(2.0, height), colors::MORTAR));
            x += BRICK_WIDTH;
        }
    }
}

fn word_block(v: &mut Vec<Vertex>, block: &WordBlock, b: &Aabb) {
    let alpha = block.alpha();
    let fill = match block.state {
        BlockState::Untouched => colors::BLOCK,
        BlockState::Solved => colors::BLOCK_SOLVED,
        BlockState::Smashed | BlockState::Fading { .. } => colors::BLOCK_SMASHED,
    };

    v.extend(shapes::rect(b.min(), b.size(), with_alpha(colors::BLOCK_EDGE, alpha)));
    v.extend(shapes::rect(
        b.min() + Vec2::splat(4.0),
        b.size() - Vec2::splat(8.0),
        with_alpha(fill, alpha),
    ));

    if matches!(block.state, BlockState::Smashed | BlockState::Fading { .. }) {
        let crack = with_alpha(colors::CRACK, alpha);
        v.extend(shapes::rotated_rect(b.center, Vec2::new(b.half.x * 0.8, 2.0), 0.6, crack));
        v.extend(shapes::rotated_rect(b.center, Vec2::new(b.half.x * 0.6, 2.0), -0.9, crack));
    }
}

fn coin_sprite(v: &mut Vec<Vertex>, coin: &Coin, b: &Aabb) {
    v.extend(shapes::circle(b.center, COIN_RADIUS, colors::COIN_RIM, 16));
    v.extend(shapes::circle(b.center, COIN_RADIUS - 3.0, colors::COIN, 16));
    // Roll marker
    v.extend(shapes::rotated_rect(
        b.center,
        Vec2::new(COIN_RADIUS - 5.0, 1.5),
        coin.rotation,
        colors::COIN_RIM,
    ));
}

/// Leg offsets per animation frame
fn stride(frame: u8) -> f32 {
    match frame {
        1 => -6.0,
        2 => 0.0,
        3 => 6.0,
        _ => 0.0,
    }
}

fn eye_x(b: &Aabb, facing: Facing) -> f32 {
    match facing {
        Facing::Left => b.center.x - b.half.x * 0.45,
        Facing::Right => b.center.x + b.half.x * 0.45,
    }
}

fn enemy_sprite(v: &mut Vec<Vertex>, enemy: &Enemy, b: &Aabb) {
    let leg = stride(enemy.anim.frame() + 1);
    let body_h = b.size().y - 10.0;
    v.extend(shapes::rect(b.min(), Vec2::new(b.size().x, body_h), colors::ENEMY));
    let feet_y = b.top() + body_h;
    let foot = Vec2::new(12.0, 10.0);
    v.extend(shapes::rect(Vec2::new(b.left() + 6.0 + leg, feet_y), foot, colors::EYE));
    v.extend(shapes::rect(Vec2::new(b.right() - 18.0 - leg, feet_y), foot, colors::EYE));
    v.extend(shapes::circle(
        Vec2::new(eye_x(b, enemy.facing), b.top() + 14.0),
        4.0,
        colors::EYE,
        8,
    ));
}

fn player_sprite(v: &mut Vec<Vertex>, player: &Player, b: &Aabb) {
    let body = match player.tint {
        PlayerTint::Normal => colors::PLAYER,
        PlayerTint::Hurt => colors::PLAYER_HURT,
    };
    let leg = stride(player.anim.frame());
    let head = 20.0;
    let legs = 14.0;

    // Head
    v.extend(shapes::rect(
        Vec2::new(b.left() + 8.0, b.top()),
        Vec2::new(b.size().x - 16.0, head),
        colors::SKIN,
    ));
    v.extend(shapes::circle(
        Vec2::new(eye_x(b, player.facing), b.top() + 9.0),
        3.0,
        colors::EYE,
        8,
    ));
    // Torso
    v.extend(shapes::rect(
        Vec2::new(b.left(), b.top() + head),
        Vec2::new(b.size().x, b.size().y - head - legs),
        body,
    ));
    // Legs
    let leg_y = b.bottom() - legs;
    v.extend(shapes::rect(Vec2::new(b.left() + 6.0 + leg, leg_y), Vec2::new(12.0, legs), body));
    v.extend(shapes::rect(Vec2::new(b.right() - 18.0 - leg, leg_y), Vec2::new(12.0, legs), body));
}

fn touch_buttons(v: &mut Vec<Vertex>, input: &InputState) {
    for button in TouchButton::ALL {
        let fill = if input.is_held(button) {
            colors::BUTTON_PRESSED
        } else {
            colors::BUTTON
        };
        let c = button.center();
        match button {
            TouchButton::Jump => {
                v.extend(shapes::circle(c, JUMP_BUTTON_RADIUS, fill, 24));
                v.extend(shapes::ring(
                    c,
                    JUMP_BUTTON_RADIUS - 3.0,
                    JUMP_BUTTON_RADIUS,
                    colors::BUTTON_ICON,
                    24,
                ));
                v.extend(shapes::triangle(
                    c + Vec2::new(0.0, -14.0),
                    c + Vec2::new(12.0, 8.0),
                    c + Vec2::new(-12.0, 8.0),
                    colors::BUTTON_ICON,
                ));
            }
            TouchButton::Left | TouchButton::Right => {
                let half = Vec2::splat(ARROW_BUTTON_SIZE / 2.0);
                v.extend(shapes::rect(c - half, half * 2.0, fill));
                let dir = if button == TouchButton::Left { -1.0 } else { 1.0 };
                v.extend(shapes::triangle(
                    c + Vec2::new(12.0 * dir, 0.0),
                    c + Vec2::new(-8.0 * dir, -12.0),
                    c + Vec2::new(-8.0 * dir, 12.0),
                    colors::BUTTON_ICON,
                ));
            }
        }
    }
}
