//! Wave generation
//!
//! Every fifth wave is a lone boss; the rest are a staggered column of
//! regular craft whose count, toughness and speed grow with the wave number.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, MovePattern};
use crate::consts::PLAYFIELD_WIDTH;

/// Most regular enemies a single wave may contain
pub const MAX_WAVE_SIZE: u32 = 12;

/// Vertical gap between successive spawns in a regular wave
const SPAWN_STAGGER: f32 = 60.0;

/// Horizontal margin kept clear on both sides at spawn
const SPAWN_MARGIN: f32 = 20.0;

/// Boss waves are the positive multiples of five
pub fn wave_is_boss(wave: u32) -> bool {
    wave > 0 && wave.is_multiple_of(5)
}

/// Number of regular enemies in a non-boss wave
pub fn wave_size(wave: u32) -> u32 {
    (3 + wave / 2).min(MAX_WAVE_SIZE)
}

/// Generate the enemies for `wave`
pub fn spawn_wave(wave: u32, rng: &mut impl Rng) -> Vec<Enemy> {
    if wave_is_boss(wave) {
        log::info!("Wave {}: boss incoming", wave);
        return vec![spawn_boss(wave)];
    }

    let count = wave_size(wave);
    log::info!("Wave {}: {} enemies", wave, count);
    (0..count).map(|i| spawn_regular(wave, i, rng)).collect()
}

fn spawn_boss(wave: u32) -> Enemy {
    let kind = EnemyKind::Boss;
    let size = kind.size();
    let health = kind.base_health() + wave as f32 * 5.0;
    let x = PLAYFIELD_WIDTH / 2.0 - size.x / 2.0;
    Enemy {
        pos: Vec2::new(x, -120.0),
        size,
        speed: kind.speed_range().0,
        health,
        max_health: health,
        kind,
        shoot_timer: 0.0,
        shoot_interval: kind.shoot_interval(),
        move_pattern: MovePattern::Straight,
        move_timer: 0,
        start_x: x,
        score_value: kind.score_value(),
    }
}

fn spawn_regular(wave: u32, index: u32, rng: &mut impl Rng) -> Enemy {
    let kind = roll_kind(wave, rng);
    let size = kind.size();
    let (lo, hi) = kind.speed_range();
    let speed = rng.random_range(lo..hi) + wave as f32 * 0.05;
    let health = kind.base_health() + (wave / 3) as f32;
    let x = rng.random_range(SPAWN_MARGIN..PLAYFIELD_WIDTH - SPAWN_MARGIN - size.x);
    let shoot_timer = rng.random_range(60.0..180.0);
    let move_pattern = MovePattern::from_index(rng.random_range(0..=2u8));

    Enemy {
        pos: Vec2::new(x, -size.y - index as f32 * SPAWN_STAGGER),
        size,
        speed,
        health,
        max_health: health,
        kind,
        shoot_timer,
        shoot_interval: kind.shoot_interval(),
        move_pattern,
        move_timer: 0,
        start_x: x,
        score_value: kind.score_value(),
    }
}

/// Weighted class roll: early waves are all small craft, medium craft
/// appear from wave 3 and large ones after wave 5
fn roll_kind(wave: u32, rng: &mut impl Rng) -> EnemyKind {
    if wave < 3 {
        return EnemyKind::Small;
    }
    if rng.random_bool(0.3) {
        return EnemyKind::Medium;
    }
    if rng.random_bool(0.1) && wave > 5 {
        return EnemyKind::Large;
    }
    EnemyKind::Small
}
