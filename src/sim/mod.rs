//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` is one frame)
//! - Seeded RNG only, owned by `SimContext`
//! - Stable iteration order (insertion order of the entity lists)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapons;

pub use autopilot::steer;
pub use collision::{Hitbox, Rect, collides};
pub use effects::{spawn_explosion, spawn_hit_spark, spawn_sparkles};
pub use state::{
    BgElement, BgKind, Bullet, Enemy, EnemyKind, Faction, GameData, GameEvent, GamePhase,
    MovePattern, Particle, Player, PowerUp, PowerUpKind, SimContext,
};
pub use tick::{TickInput, TouchDrag, tick};
pub use wave::{spawn_wave, wave_is_boss, wave_size};
pub use weapons::{BossPattern, boss_pattern, enemy_volley, player_volley, shot_cooldown};
