//! Arcade collision detection and response for axis-aligned bodies
//!
//! Bodies move one axis at a time: horizontal first (only fully solid
//! obstacles stop them), then vertical (solid obstacles plus one-way
//! platforms, which only catch a body falling onto their top edge).

use glam::Vec2;

use super::geom::Aabb;
use crate::consts::REST_SPEED;

/// Slack allowed when deciding a body was above a platform before moving
const LANDING_TOLERANCE: f32 = 1.0;

/// Which side of the moving body made contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Head hit the underside of something
    Top,
    /// Feet landed on something
    Bottom,
    Left,
    Right,
}

/// Contact flags for the last physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Touching {
    pub fn set(&mut self, side: Side) {
        match side {
            Side::Top => self.up = true,
            Side::Bottom => self.down = true,
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    pub fn merge(&mut self, other: Touching) {
        self.up |= other.up;
        self.down |= other.down;
        self.left |= other.left;
        self.right |= other.right;
    }
}

/// How an obstacle blocks bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidKind {
    /// Blocks from every side
    Solid,
    /// Only blocks bodies landing from above
    OneWay,
}

/// Identifies the obstacle a body collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidTag {
    Floor,
    Platform(u32),
    Block(u32),
}

/// A static obstacle
#[derive(Debug, Clone, Copy)]
pub struct Solid {
    pub aabb: Aabb,
    pub kind: SolidKind,
    pub tag: SolidTag,
}

/// One contact produced by [`move_and_collide`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub tag: SolidTag,
    /// Side of the moving body
    pub side: Side,
}

/// Result of a body moving through the static world
#[derive(Debug, Clone, Default)]
pub struct MoveResult {
    pub touching: Touching,
    pub hits: Vec<Hit>,
}

/// World rectangle bodies may be clamped to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Which world edges clamp a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsMask {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl BoundsMask {
    pub const ALL: Self = Self {
        left: true,
        right: true,
        top: true,
        bottom: true,
    };
}

/// Reflect a speed off a surface, settling small bounces to rest
#[inline]
pub fn bounce_off(speed: f32, factor: f32) -> f32 {
    let bounced = -speed * factor;
    if bounced.abs() < REST_SPEED { 0.0 } else { bounced }
}

/// Integrate a body by `vel * dt` and separate it from `solids`
pub fn move_and_collide(
    body: &mut Aabb,
    vel: &mut Vec2,
    bounce: Vec2,
    dt: f32,
    solids: &[Solid],
) -> MoveResult {
    let mut result = MoveResult::default();
    let prev = *body;

    // Horizontal pass: only fully solid obstacles
    body.center.x += vel.x * dt;
    if vel.x != 0.0 {
        for solid in solids.iter().filter(|s| s.kind == SolidKind::Solid) {
            if !body.overlaps(&solid.aabb) {
                continue;
            }
            let side = if vel.x > 0.0 {
                body.center.x = solid.aabb.left() - body.half.x;
                Side::Right
            } else {
                body.center.x = solid.aabb.right() + body.half.x;
                Side::Left
            };
            vel.x = bounce_off(vel.x, bounce.x);
            result.touching.set(side);
            result.hits.push(Hit {
                tag: solid.tag,
                side,
            });
            if vel.x == 0.0 {
                break;
            }
        }
    }

    // Vertical pass
    body.center.y += vel.y * dt;
    for solid in solids {
        if !body.overlaps(&solid.aabb) {
            continue;
        }
        let falling = vel.y >= 0.0;
        if falling && prev.bottom() <= solid.aabb.top() + LANDING_TOLERANCE {
            body.center.y = solid.aabb.top() - body.half.y;
            vel.y = bounce_off(vel.y, bounce.y);
            result.touching.set(Side::Bottom);
            result.hits.push(Hit {
                tag: solid.tag,
                side: Side::Bottom,
            });
        } else if !falling
            && solid.kind == SolidKind::Solid
            && prev.top() >= solid.aabb.bottom() - LANDING_TOLERANCE
        {
            body.center.y = solid.aabb.bottom() + body.half.y;
            vel.y = bounce_off(vel.y, bounce.y);
            result.touching.set(Side::Top);
            result.hits.push(Hit {
                tag: solid.tag,
                side: Side::Top,
            });
        }
    }

    result
}

/// Keep a body inside the world on the masked edges; returns blocked flags
pub fn clamp_to_bounds(
    body: &mut Aabb,
    vel: &mut Vec2,
    bounce: Vec2,
    bounds: &WorldBounds,
    mask: BoundsMask,
) -> Touching {
    let mut blocked = Touching::default();

    if mask.left && body.left() < bounds.min_x {
        body.center.x = bounds.min_x + body.half.x;
        if vel.x < 0.0 {
            vel.x = bounce_off(vel.x, bounce.x);
        }
        blocked.left = true;
    }
    if mask.right && body.right() > bounds.max_x {
        body.center.x = bounds.max_x - body.half.x;
        if vel.x > 0.0 {
            vel.x = bounce_off(vel.x, bounce.x);
        }
        blocked.right = true;
    }
    if mask.top && body.top() < bounds.min_y {
        body.center.y = bounds.min_y + body.half.y;
        if vel.y < 0.0 {
            vel.y = bounce_off(vel.y, bounce.y);
        }
        blocked.up = true;
    }
    if mask.bottom && body.bottom() >= bounds.max_y {
        body.center.y = bounds.max_y - body.half.y;
        if vel.y > 0.0 {
            vel.y = bounce_off(vel.y, bounce.y);
        }
        blocked.down = true;
    }

    blocked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Solid {
        Solid {
            aabb: Aabb::from_xywh(0.0, 575.0, 1000.0, 50.0),
            kind: SolidKind::Solid,
            tag: SolidTag::Floor,
        }
    }

    #[test]
    fn test_lands_on_floor() {
        // Feet 2px above the floor top (550), falling fast
        let mut body = Aabb::from_xywh(0.0, 518.0, 50.0, 60.0);
        let mut vel = Vec2::new(0.0, 400.0);

        let result = move_and_collide(&mut body, &mut vel, Vec2::splat(0.1), 0.02, &[floor()]);
        assert!(result.touching.down);
        assert_eq!(body.bottom(), 550.0);
        // 400 * 0.1 = 40 < REST_SPEED, so the bounce settles
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_one_way_platform_passes_from_below() {
        let platform = Solid {
            aabb: Aabb::from_xywh(0.0, 400.0, 120.0, 40.0),
            kind: SolidKind::OneWay,
            tag: SolidTag::Platform(1),
        };
        // Head just below the platform underside, jumping up
        let mut body = Aabb::from_xywh(0.0, 455.0, 50.0, 60.0);
        let mut vel = Vec2::new(0.0, -400.0);

        let result = move_and_collide(&mut body, &mut vel, Vec2::ZERO, 0.05, &[platform]);
        assert!(result.hits.is_empty());
        assert_eq!(vel.y, -400.0);
    }

    #[test]
    fn test_one_way_platform_catches_from_above() {
        let platform = Solid {
            aabb: Aabb::from_xywh(0.0, 400.0, 120.0, 40.0),
            kind: SolidKind::OneWay,
            tag: SolidTag::Platform(7),
        };
        let mut body = Aabb::from_xywh(0.0, 349.0, 50.0, 60.0);
        let mut vel = Vec2::new(0.0, 200.0);

        let result = move_and_collide(&mut body, &mut vel, Vec2::ZERO, 0.02, &[platform]);
        assert_eq!(
            result.hits,
            vec![Hit {
                tag: SolidTag::Platform(7),
                side: Side::Bottom
            }]
        );
        assert_eq!(body.bottom(), 380.0);
    }

    #[test]
    fn test_head_bump_reports_top_side() {
        let block = Solid {
            aabb: Aabb::from_xywh(0.0, 350.0, 96.0, 64.0),
            kind: SolidKind::Solid,
            tag: SolidTag::Block(3),
        };
        // Head 1px below the block underside (382)
        let mut body = Aabb::from_xywh(0.0, 413.0, 50.0, 60.0);
        let mut vel = Vec2::new(0.0, -300.0);

        let result = move_and_collide(&mut body, &mut vel, Vec2::splat(0.1), 0.02, &[block]);
        assert!(result.touching.up);
        assert_eq!(result.hits[0].tag, SolidTag::Block(3));
        assert_eq!(body.top(), 382.0);
        assert!(vel.y >= 0.0);
    }

    #[test]
    fn test_side_push_out() {
        let wall = Solid {
            aabb: Aabb::from_xywh(100.0, 0.0, 20.0, 200.0),
            kind: SolidKind::Solid,
            tag: SolidTag::Block(1),
        };
        let mut body = Aabb::from_xywh(60.0, 0.0, 50.0, 60.0);
        let mut vel = Vec2::new(160.0, 0.0);

        let result = move_and_collide(&mut body, &mut vel, Vec2::ZERO, 0.1, &[wall]);
        assert!(result.touching.right);
        assert_eq!(body.right(), 90.0);
        assert_eq!(vel.x, 0.0);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = WorldBounds {
            min_x: 0.0,
            max_x: 2400.0,
            min_y: 0.0,
            max_y: 600.0,
        };
        let mut body = Aabb::from_xywh(-5.0, 590.0, 50.0, 60.0);
        let mut vel = Vec2::new(-160.0, 100.0);

        let blocked = clamp_to_bounds(&mut body, &mut vel, Vec2::ZERO, &bounds, BoundsMask::ALL);
        assert!(blocked.left && blocked.down);
        assert_eq!(body.left(), 0.0);
        assert_eq!(body.bottom(), 600.0);
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_bounce_off_keeps_large_bounces() {
        assert_eq!(bounce_off(300.0, 0.5), -150.0);
        assert_eq!(bounce_off(100.0, 0.5), 0.0);
    }
}
