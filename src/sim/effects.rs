//! Debris particles for smashed word blocks
//!
//! One emitter is allocated with the session and reused for every burst;
//! `explode` recycles dead slots (or the oldest live one) and never grows the pool.

use glam::Vec2;
use rand::Rng;

/// A debris chip (visual only, no collisions)
#[derive(Debug, Clone, Copy)]
pub struct DebrisParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub alive: bool,
}

impl DebrisParticle {
    const DEAD: Self = Self {
        pos: Vec2::ZERO,
        vel: Vec2::ZERO,
        age: 0.0,
        alive: false,
    };
}

/// Emission parameters
#[derive(Debug, Clone, Copy)]
pub struct DebrisConfig {
    /// Launch speed range (px/s)
    pub speed: (f32, f32),
    /// Launch angle range in degrees (0 = right, 90 = down)
    pub angle: (f32, f32),
    /// Lifetime in seconds
    pub lifespan: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Edge length of a chip at full scale
    pub size: f32,
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            speed: (50.0, 200.0),
            angle: (45.0, 135.0),
            lifespan: 0.8,
            gravity: 300.0,
            size: 8.0,
        }
    }
}

/// Fixed-capacity particle pool
#[derive(Debug, Clone)]
pub struct DebrisEmitter {
    pub config: DebrisConfig,
    particles: Vec<DebrisParticle>,
    /// Next slot to recycle when no dead slot is free
    cursor: usize,
}

impl DebrisEmitter {
    pub fn new(capacity: usize, config: DebrisConfig) -> Self {
        Self {
            config,
            particles: vec![DebrisParticle::DEAD; capacity.max(1)],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Emit `count` chips from `at` in one burst
    pub fn explode<R: Rng>(&mut self, count: usize, at: Vec2, rng: &mut R) {
        let config = self.config;
        for _ in 0..count {
            let slot = self.free_slot();
            let angle = rng.random_range(config.angle.0..=config.angle.1).to_radians();
            let speed = rng.random_range(config.speed.0..=config.speed.1);
            self.particles[slot] = DebrisParticle {
                pos: at,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                alive: true,
            };
        }
    }

    fn free_slot(&mut self) -> usize {
        if let Some(i) = self.particles.iter().position(|p| !p.alive) {
            return i;
        }
        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.particles.len();
        slot
    }

    pub fn update(&mut self, dt: f32) {
        let config = self.config;
        for p in self.particles.iter_mut().filter(|p| p.alive) {
            p.age += dt;
            if p.age >= config.lifespan {
                p.alive = false;
                continue;
            }
            p.vel.y += config.gravity * dt;
            p.pos += p.vel * dt;
        }
    }

    pub fn live(&self) -> impl Iterator<Item = &DebrisParticle> {
        self.particles.iter().filter(|p| p.alive)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Render scale of a particle: 1 at birth shrinking to 0
    pub fn scale_of(&self, particle: &DebrisParticle) -> f32 {
        (1.0 - particle.age / self.config.lifespan).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_spawns_requested_count() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut emitter = DebrisEmitter::new(64, DebrisConfig::default());
        emitter.explode(15, Vec2::new(100.0, 200.0), &mut rng);
        assert_eq!(emitter.live_count(), 15);
        // Angles 45..135 degrees all point downward
        assert!(emitter.live().all(|p| p.vel.y > 0.0));
    }

    #[test]
    fn test_pool_never_grows() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut emitter = DebrisEmitter::new(20, DebrisConfig::default());
        for _ in 0..5 {
            emitter.explode(15, Vec2::ZERO, &mut rng);
        }
        assert_eq!(emitter.capacity(), 20);
        assert_eq!(emitter.live_count(), 20);
    }

    #[test]
    fn test_particles_expire_after_lifespan() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut emitter = DebrisEmitter::new(16, DebrisConfig::default());
        emitter.explode(10, Vec2::ZERO, &mut rng);
        emitter.update(0.5);
        assert_eq!(emitter.live_count(), 10);
        let p = *emitter.live().next().unwrap();
        assert!(emitter.scale_of(&p) < 0.5);
        emitter.update(0.31);
        assert_eq!(emitter.live_count(), 0);
    }
}
