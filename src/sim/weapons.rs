//! Shot patterns for the player and for enemies

use glam::Vec2;

use super::collision::Hitbox;
use super::state::{Bullet, Enemy, EnemyKind};

/// Frames between player volleys at a firepower tier
pub fn shot_cooldown(firepower: u8) -> u32 {
    12u32.saturating_sub(firepower as u32).max(5)
}

/// One player volley fired from `muzzle` (top centre of the craft)
///
/// Each entry is (x offset, y offset, vx, vy, damage); bullets are 4x12 so
/// an x offset of -2 centres a shot on the muzzle.
pub fn player_volley(firepower: u8, muzzle: Vec2) -> Vec<Bullet> {
    const TIER_1: &[(f32, f32, f32, f32, f32)] = &[(-2.0, -5.0, 0.0, -10.0, 1.0)];
    const TIER_2: &[(f32, f32, f32, f32, f32)] = &[
        (-8.0, -5.0, 0.0, -10.0, 1.0),
        (4.0, -5.0, 0.0, -10.0, 1.0),
    ];
    const TIER_3: &[(f32, f32, f32, f32, f32)] = &[
        (-2.0, -5.0, 0.0, -10.0, 1.0),
        (-15.0, 0.0, -1.5, -9.0, 1.0),
        (11.0, 0.0, 1.5, -9.0, 1.0),
    ];
    const TIER_4: &[(f32, f32, f32, f32, f32)] = &[
        (-8.0, -5.0, 0.0, -10.0, 1.0),
        (4.0, -5.0, 0.0, -10.0, 1.0),
        (-18.0, 0.0, -1.0, -9.0, 1.0),
        (14.0, 0.0, 1.0, -9.0, 1.0),
    ];
    const TIER_5: &[(f32, f32, f32, f32, f32)] = &[
        (-2.0, -5.0, 0.0, -10.0, 2.0),
        (-15.0, 0.0, -1.0, -9.0, 1.0),
        (11.0, 0.0, 1.0, -9.0, 1.0),
        (-25.0, 5.0, -2.0, -8.0, 1.0),
        (21.0, 5.0, 2.0, -8.0, 1.0),
    ];

    let pattern = match firepower {
        0 | 1 => TIER_1,
        2 => TIER_2,
        3 => TIER_3,
        4 => TIER_4,
        _ => TIER_5,
    };

    pattern
        .iter()
        .map(|&(dx, dy, vx, vy, damage)| {
            Bullet::player(muzzle + Vec2::new(dx, dy), Vec2::new(vx, vy), damage)
        })
        .collect()
}

/// Velocity of `speed` pointing from `from` toward `to`
fn aim(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// The volley an enemy fires when its timer expires
///
/// `target` is the player's top-centre point. Small craft return nothing.
pub fn enemy_volley(enemy: &Enemy, target: Vec2) -> Vec<Bullet> {
    if !enemy.kind.fires() {
        return Vec::new();
    }
    let center_x = enemy.center().x;
    let bottom = enemy.pos.y + enemy.size.y;

    match enemy.kind {
        EnemyKind::Small | EnemyKind::Medium | EnemyKind::Large => {
            let vel = aim(Vec2::new(center_x, enemy.pos.y), target, 3.5);
            vec![Bullet::enemy(Vec2::new(center_x - 3.0, bottom), 6.0, vel)]
        }
        EnemyKind::Boss => match boss_pattern(enemy.move_timer) {
            BossPattern::Spread => (-2..=2)
                .map(|i| {
                    Bullet::enemy(
                        Vec2::new(center_x - 4.0, bottom),
                        8.0,
                        Vec2::new(i as f32 * 1.5, 4.0),
                    )
                })
                .collect(),
            BossPattern::Aimed => {
                let vel = aim(Vec2::new(center_x, bottom), target, 5.0);
                vec![Bullet::enemy(Vec2::new(center_x - 4.0, bottom), 8.0, vel)]
            }
            BossPattern::Dual => vec![
                Bullet::enemy(
                    Vec2::new(enemy.pos.x + 10.0, bottom),
                    6.0,
                    Vec2::new(-1.0, 5.0),
                ),
                Bullet::enemy(
                    Vec2::new(enemy.pos.x + enemy.size.x - 16.0, bottom),
                    6.0,
                    Vec2::new(1.0, 5.0),
                ),
            ],
        },
    }
}

/// Boss attack phases, rotating every 120 frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPattern {
    Spread,
    Aimed,
    Dual,
}

pub fn boss_pattern(move_timer: u32) -> BossPattern {
    match (move_timer / 120) % 3 {
        0 => BossPattern::Spread,
        1 => BossPattern::Aimed,
        _ => BossPattern::Dual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Faction;
    use crate::sim::wave::spawn_wave;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cooldown_by_tier() {
        assert_eq!(shot_cooldown(1), 11);
        assert_eq!(shot_cooldown(3), 9);
        assert_eq!(shot_cooldown(5), 7);
        assert_eq!(shot_cooldown(9), 5);
    }

    #[test]
    fn test_volley_sizes() {
        let muzzle = Vec2::new(210.0, 580.0);
        for (tier, expected) in [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)] {
            let volley = player_volley(tier, muzzle);
            assert_eq!(volley.len(), expected, "tier {}", tier);
            assert!(volley.iter().all(|b| b.owner == Faction::Player));
            assert!(volley.iter().all(|b| b.vel.y < 0.0));
        }
    }

    #[test]
    fn test_tier_one_is_centred() {
        let volley = player_volley(1, Vec2::new(210.0, 580.0));
        assert_eq!(volley[0].pos, Vec2::new(208.0, 575.0));
        assert_eq!(volley[0].vel, Vec2::new(0.0, -10.0));
        assert_eq!(volley[0].damage, 1.0);
    }

    #[test]
    fn test_tier_five_core_shot_hits_harder() {
        let volley = player_volley(5, Vec2::new(210.0, 580.0));
        assert_eq!(volley[0].damage, 2.0);
        assert!(volley[1..].iter().all(|b| b.damage == 1.0));
    }

    #[test]
    fn test_small_enemies_never_fire() {
        let mut rng = Pcg32::seed_from_u64(2);
        let enemy = spawn_wave(1, &mut rng).remove(0);
        assert!(enemy_volley(&enemy, Vec2::new(210.0, 580.0)).is_empty());
    }

    #[test]
    fn test_boss_pattern_cycle() {
        assert_eq!(boss_pattern(0), BossPattern::Spread);
        assert_eq!(boss_pattern(119), BossPattern::Spread);
        assert_eq!(boss_pattern(120), BossPattern::Aimed);
        assert_eq!(boss_pattern(240), BossPattern::Dual);
        assert_eq!(boss_pattern(360), BossPattern::Spread);
    }

    #[test]
    fn test_boss_volleys() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut boss = spawn_wave(5, &mut rng).remove(0);
        boss.pos.y = 50.0;
        let target = Vec2::new(210.0, 580.0);

        boss.move_timer = 10;
        let spread = enemy_volley(&boss, target);
        assert_eq!(spread.len(), 5);
        assert_eq!(spread[0].vel, Vec2::new(-3.0, 4.0));
        assert_eq!(spread[4].vel, Vec2::new(3.0, 4.0));

        boss.move_timer = 130;
        let aimed = enemy_volley(&boss, target);
        assert_eq!(aimed.len(), 1);
        assert!((aimed[0].vel.length() - 5.0).abs() < 1e-4);
        assert!(aimed[0].vel.y > 0.0);

        boss.move_timer = 250;
        let dual = enemy_volley(&boss, target);
        assert_eq!(dual.len(), 2);
        assert_eq!(dual[0].size, Vec2::splat(6.0));
        assert!(dual.iter().all(|b| b.is_enemy()));
    }

    #[test]
    fn test_aimed_shot_points_at_player() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut enemy = spawn_wave(5, &mut rng).remove(0);
        enemy.kind = EnemyKind::Medium;
        enemy.size = EnemyKind::Medium.size();
        enemy.pos = Vec2::new(100.0, 100.0);
        // Directly below the enemy centre
        let shot = enemy_volley(&enemy, Vec2::new(120.0, 400.0)).remove(0);
        assert!(shot.vel.x.abs() < 1e-4);
        assert!((shot.vel.y - 3.5).abs() < 1e-4);
    }
}
