//! Procedural level segments
//!
//! Level `n` occupies world x in `[n * 2400, (n + 1) * 2400)`. Generation is
//! split in two: [`plan_level`] draws every random number and returns plain
//! geometry, [`spawn_level`] turns that layout into entities. Levels append to
//! the world; earlier segments stay where they are.

use glam::Vec2;
use rand::Rng;

use super::geom::Aabb;
use super::state::{
    BlockState, Coin, Enemy, GameEvent, GameState, Platform, PlatformKind, TextLabel, WordBlock,
};
use super::timer::TimerAction;
use crate::consts::*;
use crate::words::OPTIONS_PER_LEVEL;

/// Fixed y of the word blocks when a level has no step platforms
const GROUND_BLOCK_Y: f32 = 350.0;
/// Block x offset from the level start when there are no step platforms
const GROUND_BLOCK_OFFSET: f32 = 1800.0;
/// Word blocks hover this far above the summit platform
const BLOCK_HOVER: f32 = 220.0;
/// Coins float this far above the platform they belong to
const COIN_LIFT: f32 = 50.0;

/// Geometry of one level segment
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub index: u32,
    pub start_x: f32,
    pub floor: Aabb,
    pub platforms: Vec<(PlatformKind, Aabb)>,
    pub coins: Vec<Vec2>,
    pub enemies: Vec<Vec2>,
    /// Centers of the word blocks, in option order
    pub blocks: [Vec2; OPTIONS_PER_LEVEL],
}

/// World x where a level segment begins
pub fn level_start_x(index: u32) -> f32 {
    index as f32 * LEVEL_WIDTH
}

/// Enemies per level: one, two from index 4, three from index 7
pub fn enemy_count(index: u32) -> usize {
    match index {
        0..=3 => 1,
        4..=6 => 2,
        _ => 3,
    }
}

/// Ascending platforms leading up to the word blocks
pub fn step_platform_count(index: u32) -> u32 {
    index.min(MAX_STEP_PLATFORMS)
}

fn coin_roll<R: Rng>(rng: &mut R) -> bool {
    rng.random_range(0..=100u32) < COIN_SPAWN_CHANCE
}

/// Lay out a level segment
pub fn plan_level<R: Rng>(index: u32, rng: &mut R) -> LevelLayout {
    let start_x = level_start_x(index);
    let floor = Aabb::from_xywh(
        start_x + FLOOR_CENTER_OFFSET,
        SCREEN_HEIGHT - FLOOR_HEIGHT / 2.0,
        FLOOR_WIDTH,
        FLOOR_HEIGHT,
    );

    let mut platforms = Vec::new();
    let mut coins = Vec::new();

    // Three short platforms near the start for hopping over enemies
    let mut hop_x = start_x + 250.0;
    for i in 0..3 {
        // The first must be reachable from the floor
        let hop_y = if i == 0 {
            rng.random_range(450..=480u32)
        } else {
            rng.random_range(350..=480u32)
        } as f32;
        platforms.push((
            PlatformKind::Hop,
            Aabb::from_xywh(hop_x, hop_y, HOP_PLATFORM_WIDTH, PLATFORM_THICKNESS),
        ));
        if coin_roll(rng) {
            coins.push(Vec2::new(hop_x, hop_y - COIN_LIFT));
        }
        hop_x += rng.random_range(120..=160u32) as f32;
    }

    // Ascending steps; the last one is wide and carries the word blocks
    let steps = step_platform_count(index);
    let mut block_y = GROUND_BLOCK_Y;
    let mut block_x = start_x + GROUND_BLOCK_OFFSET;
    let mut step_x = start_x + 1000.0;
    let mut step_y = 500.0;
    for i in 0..steps {
        let summit = i == steps - 1;
        let (kind, width, center_x) = if summit {
            (PlatformKind::Summit, SUMMIT_PLATFORM_WIDTH, step_x + 200.0)
        } else {
            (PlatformKind::Step, STEP_PLATFORM_WIDTH, step_x)
        };
        platforms.push((
            kind,
            Aabb::from_xywh(center_x, step_y, width, PLATFORM_THICKNESS),
        ));
        if coin_roll(rng) {
            coins.push(Vec2::new(center_x, step_y - COIN_LIFT));
        }
        if summit {
            block_y = step_y - BLOCK_HOVER;
            block_x = step_x;
        }
        step_x += 250.0;
        step_y -= 90.0;
    }

    // Ground coins in the open stretch after the start
    for i in 0..3 {
        coins.push(Vec2::new(start_x + 400.0 + i as f32 * 150.0, 450.0));
    }

    let enemies = (0..enemy_count(index))
        .map(|i| Vec2::new(start_x + 600.0 + i as f32 * ENEMY_SPACING, 500.0))
        .collect();

    let blocks =
        std::array::from_fn(|i| Vec2::new(block_x + i as f32 * WORD_BLOCK_SPACING, block_y));

    LevelLayout {
        index,
        start_x,
        floor,
        platforms,
        coins,
        enemies,
        blocks,
    }
}

/// Generate level `index` into the session and make it the current level.
///
/// Re-entrant: a solved level calls this again for `index + 1`, appending the
/// next segment to the live world.
pub fn spawn_level(state: &mut GameState, index: u32) {
    state.current_level = index;

    let layout = plan_level(index, &mut state.rng);

    // Extend the world and camera to include the new segment
    let max_x = layout.start_x + LEVEL_WIDTH;
    state.bounds.max_x = state.bounds.max_x.max(max_x);
    state.camera.set_bounds(state.bounds.max_x);

    state.floors.push(layout.floor);

    for (kind, aabb) in &layout.platforms {
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            kind: *kind,
            aabb: *aabb,
        });
    }

    for pos in &layout.coins {
        let id = state.next_entity_id();
        state.coins.push(Coin::new(id, *pos));
    }

    for pos in &layout.enemies {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, *pos));
    }

    let descriptor = state.words.descriptor(index).clone();
    state
        .timers
        .schedule(SPEAK_TARGET_DELAY, TimerAction::SpeakWord(descriptor.target.clone()));

    for (pos, word) in layout.blocks.iter().zip(descriptor.options.iter()) {
        let id = state.next_entity_id();
        state.blocks.push(WordBlock {
            id,
            level: index,
            aabb: Aabb::new(*pos, Vec2::new(WORD_BLOCK_WIDTH, WORD_BLOCK_HEIGHT)),
            word: word.clone(),
            label: TextLabel {
                text: word.clone(),
                visible: true,
            },
            enabled: true,
            state: BlockState::Untouched,
        });
    }

    state.push_event(GameEvent::LevelStarted { index });
    log::info!(
        "Level {} spawned at x={} (target {}, {} enemies, {} coins)",
        index + 1,
        layout.start_x,
        descriptor.target,
        layout.enemies.len(),
        layout.coins.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_zero_scenario() {
        let state = GameState::new(42);
        assert_eq!(state.current_level, 0);
        assert_eq!(level_start_x(0), 0.0);
        assert_eq!(state.floors[0].center.x, 1500.0);
        assert_eq!(state.floors[0].top(), 550.0);

        let words: Vec<_> = state.level_blocks(0).map(|b| b.word.as_str()).collect();
        assert_eq!(words, vec!["BAT", "CAT", "RAT"]);

        let cat = state.level_blocks(0).find(|b| b.word == "CAT").unwrap();
        assert_eq!(cat.aabb.center, Vec2::new(2000.0, 350.0));
        assert_eq!(cat.label.text, "CAT");
    }

    #[test]
    fn test_enemy_count_thresholds() {
        let counts: Vec<_> = (0..10).map(enemy_count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(enemy_count(250), 3);
    }

    #[test]
    fn test_hop_platform_heights() {
        let mut rng = Pcg32::seed_from_u64(7);
        for index in 0..50 {
            let layout = plan_level(index, &mut rng);
            let hops: Vec<_> = layout
                .platforms
                .iter()
                .filter(|(k, _)| *k == PlatformKind::Hop)
                .map(|(_, a)| *a)
                .collect();
            assert_eq!(hops.len(), 3);
            assert!((450.0..=480.0).contains(&hops[0].center.y));
            for hop in &hops[1..] {
                assert!((350.0..=480.0).contains(&hop.center.y));
            }
            for pair in hops.windows(2) {
                let gap = pair[1].center.x - pair[0].center.x;
                assert!((120.0..=160.0).contains(&gap));
            }
        }
    }

    #[test]
    fn test_summit_anchors_blocks() {
        let mut rng = Pcg32::seed_from_u64(3);
        let layout = plan_level(6, &mut rng);
        let start = level_start_x(6);

        let steps: Vec<_> = layout
            .platforms
            .iter()
            .filter(|(k, _)| *k != PlatformKind::Hop)
            .collect();
        assert_eq!(steps.len(), 4);
        let (kind, summit) = steps[3];
        assert_eq!(*kind, PlatformKind::Summit);
        assert_eq!(summit.size().x, SUMMIT_PLATFORM_WIDTH);
        // Fourth step: x = start + 1000 + 3*250, shifted +200; y = 500 - 3*90
        assert_eq!(summit.center, Vec2::new(start + 1950.0, 230.0));
        assert_eq!(layout.blocks[0], Vec2::new(start + 1750.0, 10.0));
        assert_eq!(layout.blocks[2].x - layout.blocks[0].x, 400.0);
    }

    #[test]
    fn test_ground_coins_always_present() {
        let mut rng = Pcg32::seed_from_u64(11);
        let layout = plan_level(2, &mut rng);
        let start = level_start_x(2);
        for i in 0..3 {
            let spot = Vec2::new(start + 400.0 + i as f32 * 150.0, 450.0);
            assert!(layout.coins.contains(&spot));
        }
        // 3 hop + 2 step platforms may add up to 5 more
        assert!(layout.coins.len() >= 3 && layout.coins.len() <= 8);
    }

    #[test]
    fn test_spawn_is_reentrant() {
        let mut state = GameState::new(5);
        let blocks_before = state.blocks.len();
        spawn_level(&mut state, 1);

        assert_eq!(state.current_level, 1);
        assert_eq!(state.blocks.len(), blocks_before + 3);
        assert_eq!(state.floors.len(), 2);
        assert_eq!(state.bounds.max_x, 4800.0);
        assert_eq!(state.camera.bounds_width, 4800.0);
        // Level 0 blocks are still in the world
        assert_eq!(state.level_blocks(0).count(), 3);
    }

    #[test]
    fn test_spawn_schedules_target_speech() {
        let mut state = GameState::new(5);
        assert!(state.timers.is_pending(&TimerAction::SpeakWord("CAT".into())));
        assert!(state.events.contains(&GameEvent::LevelStarted { index: 0 }));
        spawn_level(&mut state, 1);
        assert!(state.timers.is_pending(&TimerAction::SpeakWord("DOG".into())));
    }

    proptest! {
        #[test]
        fn prop_exactly_one_block_matches_target(index in 0u32..200, seed in any::<u64>()) {
            let mut state = GameState::empty(seed, crate::words::WordList::builtin());
            spawn_level(&mut state, index);
            let target = state.words.descriptor(index).target.clone();
            let blocks: Vec<_> = state.level_blocks(index).collect();
            prop_assert_eq!(blocks.len(), 3);
            prop_assert_eq!(blocks.iter().filter(|b| b.word == target).count(), 1);
            for block in &blocks {
                prop_assert_eq!(&block.label.text, &block.word);
            }
        }

        #[test]
        fn prop_level_fits_its_segment(index in 0u32..100, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let layout = plan_level(index, &mut rng);
            let start = level_start_x(index);
            prop_assert_eq!(layout.enemies.len(), enemy_count(index));
            for block in &layout.blocks {
                prop_assert!(block.x >= start && block.x < start + LEVEL_WIDTH);
            }
            let steps = layout.platforms.iter().filter(|(k, _)| *k != PlatformKind::Hop).count();
            prop_assert_eq!(steps as u32, step_platform_count(index));
        }
    }
}
