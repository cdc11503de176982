//! Particle emitters (explosions, hit sparks, pickup sparkles)
//!
//! Purely additive: emitters only ever push onto the particle list.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;

/// Fire palette for explosions
const FIRE_COLORS: [u32; 5] = [0xff4400, 0xff8800, 0xffcc00, 0xff2200, 0xffaa00];
const SMOKE_COLOR: u32 = 0x555555;
const SPARK_COLOR: u32 = 0xffffff;
const SPARKLE_COLOR: u32 = 0xffdd44;

/// Particles in one pickup sparkle burst
pub const SPARKLE_COUNT: usize = 10;

fn radial(rng: &mut impl Rng, min_speed: f32, max_speed: f32) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = rng.random_range(min_speed..max_speed);
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Burst of `count` fire particles plus `ceil(count / 2)` smoke puffs at `at`
///
/// `big` widens speed, lifetime and size ranges.
pub fn spawn_explosion(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    at: Vec2,
    count: usize,
    big: bool,
) {
    let (min_speed, max_speed) = if big { (1.0, 5.0) } else { (0.5, 3.0) };
    let max_life = if big { 60.0 } else { 40.0 };
    let (min_size, max_size) = if big { (3.0, 8.0) } else { (2.0, 5.0) };

    particles.reserve(count + count.div_ceil(2));

    for _ in 0..count {
        let vel = radial(rng, min_speed, max_speed);
        let life = rng.random_range(20.0..max_life);
        let color = FIRE_COLORS[rng.random_range(0..FIRE_COLORS.len())];
        let size = rng.random_range(min_size..max_size);
        particles.push(Particle {
            pos: at,
            vel,
            life,
            max_life: 60.0,
            color,
            size,
        });
    }

    // Smoke: slower, longer lived, larger
    let max_smoke = if big { 10.0 } else { 6.0 };
    for _ in 0..count.div_ceil(2) {
        let vel = radial(rng, 0.3, 1.5);
        let life = rng.random_range(30.0..70.0);
        let size = rng.random_range(3.0..max_smoke);
        particles.push(Particle {
            pos: at,
            vel,
            life,
            max_life: 70.0,
            color: SMOKE_COLOR,
            size,
        });
    }
}

/// Single white spark where a player bullet connects
pub fn spawn_hit_spark(particles: &mut Vec<Particle>, rng: &mut impl Rng, at: Vec2) {
    particles.push(Particle {
        pos: at,
        vel: Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
        life: 10.0,
        max_life: 10.0,
        color: SPARK_COLOR,
        size: 2.0,
    });
}

/// Gold sparkle burst when a power-up is collected
pub fn spawn_sparkles(particles: &mut Vec<Particle>, rng: &mut impl Rng, at: Vec2) {
    for _ in 0..SPARKLE_COUNT {
        particles.push(Particle {
            pos: at,
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
            life: 20.0,
            max_life: 20.0,
            color: SPARKLE_COLOR,
            size: 3.0,
        });
    }
}
