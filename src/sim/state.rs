//! Game state and core simulation types
//!
//! `GameData` is the single root aggregate: it exclusively owns every entity
//! collection, and entities carry no identity beyond membership.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Hitbox, Rect};
use crate::Settings;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    #[default]
    Menu,
    /// Active gameplay (the only phase that advances the simulation)
    Playing,
    /// Game is paused
    Paused,
    /// Lives exhausted, waiting for restart
    GameOver,
}

/// The player's craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub lives: u8,
    pub bombs: u8,
    /// Shot pattern tier (1..=5)
    pub firepower: u8,
    /// Frames of immunity remaining
    pub invincible: u32,
    pub score: u64,
    /// Frames until the next volley is allowed
    pub shoot_cooldown: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                PLAYFIELD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
                PLAYFIELD_HEIGHT - 100.0,
            ),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            lives: PLAYER_START_LIVES,
            bombs: PLAYER_START_BOMBS,
            firepower: 1,
            invincible: INVINCIBILITY_FRAMES,
            score: 0,
            shoot_cooldown: 0,
        }
    }
}

impl Player {
    /// The shrunk box enemy fire and rams are tested against
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(PLAYER_HITBOX_INSET)
    }

    /// Where player volleys originate (top centre of the craft)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Keep the craft inside the playfield, below the HUD band
    pub fn clamp_to_playfield(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, PLAYFIELD_WIDTH - self.size.x);
        self.pos.y = self.pos.y.clamp(HUD_HEIGHT, PLAYFIELD_HEIGHT - self.size.y);
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible > 0
    }
}

impl Hitbox for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Enemy classes (discriminants match the classic numeric tags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Small = 0,
    Medium = 1,
    Large = 2,
    Boss = 3,
}

impl EnemyKind {
    /// Bounding box edge length (boss is not square)
    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Small => Vec2::splat(30.0),
            EnemyKind::Medium => Vec2::splat(40.0),
            EnemyKind::Large => Vec2::splat(50.0),
            EnemyKind::Boss => Vec2::new(100.0, 80.0),
        }
    }

    /// Health before wave scaling (boss health is wave-derived)
    pub fn base_health(self) -> f32 {
        match self {
            EnemyKind::Small => 1.0,
            EnemyKind::Medium => 3.0,
            EnemyKind::Large => 6.0,
            EnemyKind::Boss => 30.0,
        }
    }

    /// Half-open range the base speed is drawn from
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            EnemyKind::Small => (1.5, 3.0),
            EnemyKind::Medium => (1.0, 2.0),
            EnemyKind::Large => (0.5, 1.2),
            EnemyKind::Boss => (0.8, 0.8),
        }
    }

    pub fn score_value(self) -> u64 {
        match self {
            EnemyKind::Small => 100,
            EnemyKind::Medium => 300,
            EnemyKind::Large => 500,
            EnemyKind::Boss => 3000,
        }
    }

    /// Frames between volleys
    pub fn shoot_interval(self) -> f32 {
        match self {
            EnemyKind::Small => 200.0,
            EnemyKind::Medium => 120.0,
            EnemyKind::Large => 80.0,
            EnemyKind::Boss => 30.0,
        }
    }

    /// Small craft never shoot back
    pub fn fires(self) -> bool {
        self != EnemyKind::Small
    }

    /// Probability a kill drops a power-up
    pub fn drop_chance(self) -> f64 {
        match self {
            EnemyKind::Small => 0.15,
            EnemyKind::Medium | EnemyKind::Large => 0.4,
            EnemyKind::Boss => 1.0,
        }
    }

    /// Particle count and size class when shot down
    pub fn death_explosion(self) -> (usize, bool) {
        match self {
            EnemyKind::Small => (12, false),
            EnemyKind::Medium => (25, false),
            EnemyKind::Large => (25, true),
            EnemyKind::Boss => (50, true),
        }
    }

    /// Particle count and size class when wiped out by a bomb
    pub fn bomb_explosion(self) -> (usize, bool) {
        match self {
            EnemyKind::Boss => (40, true),
            _ => (15, false),
        }
    }
}

/// Movement pattern for regular enemies (boss has its own)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovePattern {
    #[default]
    Straight,
    Sine,
    Zigzag,
}

impl MovePattern {
    pub fn from_index(i: u8) -> Self {
        match i {
            0 => MovePattern::Straight,
            1 => MovePattern::Sine,
            _ => MovePattern::Zigzag,
        }
    }
}

/// An enemy craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub kind: EnemyKind,
    /// Countdown to the next volley
    pub shoot_timer: f32,
    pub shoot_interval: f32,
    pub move_pattern: MovePattern,
    /// Frames alive; drives the periodic motion functions
    pub move_timer: u32,
    /// Anchor for oscillating patterns
    pub start_x: f32,
    pub score_value: u64,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Health bar fill, never negative
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

impl Hitbox for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Which side fired a bullet (decides what it can damage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub owner: Faction,
    pub damage: f32,
}

impl Bullet {
    pub fn player(pos: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(4.0, 12.0),
            vel,
            owner: Faction::Player,
            damage,
        }
    }

    pub fn enemy(pos: Vec2, edge: f32, vel: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(edge),
            vel,
            owner: Faction::Enemy,
            damage: 1.0,
        }
    }

    pub fn is_enemy(&self) -> bool {
        self.owner == Faction::Enemy
    }
}

impl Hitbox for Bullet {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames remaining
    pub life: f32,
    pub max_life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Firepower = 0,
    Bomb = 1,
    Life = 2,
}

impl PowerUpKind {
    pub fn from_index(i: u8) -> Self {
        match i {
            0 => PowerUpKind::Firepower,
            1 => PowerUpKind::Bomb,
            _ => PowerUpKind::Life,
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    /// Fall speed
    pub vy: f32,
}

impl PowerUp {
    /// Drop a pickup centred on `at`
    pub fn dropped_at(at: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos: at - Vec2::splat(12.0),
            size: Vec2::splat(24.0),
            kind,
            vy: 1.5,
        }
    }
}

impl Hitbox for PowerUp {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Background decoration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BgKind {
    Cloud,
    Island,
    Islet,
}

/// Scrolling scenery (outside every gameplay invariant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgElement {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub opacity: f32,
    pub kind: BgKind,
}

impl BgElement {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..PLAYFIELD_WIDTH),
                rng.random_range(-PLAYFIELD_HEIGHT..PLAYFIELD_HEIGHT),
            ),
            size: Vec2::new(rng.random_range(20.0..60.0), rng.random_range(10.0..30.0)),
            speed: rng.random_range(0.3..1.0),
            opacity: rng.random_range(0.1..0.3),
            kind: match rng.random_range(0..=2u8) {
                0 => BgKind::Cloud,
                1 => BgKind::Island,
                _ => BgKind::Islet,
            },
        }
    }
}

/// Things that happened during one step, for audio/render hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveSpawned { wave: u32, boss: bool },
    EnemyDestroyed { kind: EnemyKind, points: u64, pos: Vec2 },
    PlayerHit { lives: u8 },
    PowerUpCollected { kind: PowerUpKind },
    BombDetonated,
    GameOver { score: u64, wave: u32 },
    /// High score improved this frame; the host should persist it
    NewHighScore { score: u64 },
}

/// Complete session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub state: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub bg_elements: Vec<BgElement>,
    /// Waves spawned so far
    pub wave: u32,
    /// Countdown to the next wave once the field is clear
    pub wave_timer: u32,
    pub wave_delay: u32,
    pub bg_offset: f32,
    pub high_score: u64,
    pub shake_timer: u32,
    pub flash_timer: u32,
    /// Bomb frames remaining
    pub bomb_active: u32,
    pub combo: u32,
    pub combo_timer: u32,
}

impl GameData {
    /// Fresh session sitting on the title screen
    pub fn new(high_score: u64, rng: &mut impl Rng) -> Self {
        Self {
            state: GamePhase::Menu,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            bg_elements: (0..BG_ELEMENT_COUNT).map(|_| BgElement::random(rng)).collect(),
            wave: 0,
            wave_timer: 0,
            wave_delay: WAVE_DELAY,
            bg_offset: 0.0,
            high_score,
            shake_timer: 0,
            flash_timer: 0,
            bomb_active: 0,
            combo: 0,
            combo_timer: 0,
        }
    }

    /// Full reset straight into play, keeping the high score
    pub fn restart(&mut self, rng: &mut impl Rng) {
        *self = Self::new(self.high_score, rng);
        self.state = GamePhase::Playing;
    }

    /// Spend a bomb if one is available
    pub fn detonate_bomb(&mut self) -> bool {
        if self.player.bombs == 0 {
            return false;
        }
        self.player.bombs -= 1;
        self.bomb_active = BOMB_DURATION;
        self.shake_timer = 10;
        true
    }

    pub fn enemy_bullet_count(&self) -> usize {
        self.bullets.iter().filter(|b| b.is_enemy()).count()
    }
}

/// Per-session context threaded through every step
///
/// Owns the only random source the simulation may draw from, so a seed plus
/// an input sequence fully determines a run.
#[derive(Debug, Clone)]
pub struct SimContext {
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
}

impl SimContext {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
        }
    }

    /// Build the opening state for this session
    pub fn new_game(&mut self, high_score: u64) -> GameData {
        GameData::new(high_score, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let mut ctx = SimContext::new(7, Settings::default());
        let game = ctx.new_game(1234);
        assert_eq!(game.state, GamePhase::Menu);
        assert_eq!(game.high_score, 1234);
        assert_eq!(game.wave, 0);
        assert_eq!(game.wave_delay, WAVE_DELAY);
        assert_eq!(game.bg_elements.len(), BG_ELEMENT_COUNT);
        assert!(game.enemies.is_empty());
        assert!(game.bullets.is_empty());

        let p = &game.player;
        assert_eq!(p.pos, Vec2::new(190.0, 580.0));
        assert_eq!(p.lives, 3);
        assert_eq!(p.bombs, 3);
        assert_eq!(p.firepower, 1);
        assert_eq!(p.invincible, 120);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut ctx = SimContext::new(7, Settings::default());
        let mut game = ctx.new_game(0);
        game.player.score = 900;
        game.high_score = 900;
        game.wave = 4;
        game.state = GamePhase::GameOver;

        game.restart(&mut ctx.rng);
        assert_eq!(game.state, GamePhase::Playing);
        assert_eq!(game.high_score, 900);
        assert_eq!(game.player.score, 0);
        assert_eq!(game.wave, 0);
    }

    #[test]
    fn test_detonate_bomb_needs_stock() {
        let mut ctx = SimContext::new(1, Settings::default());
        let mut game = ctx.new_game(0);
        game.player.bombs = 1;
        assert!(game.detonate_bomb());
        assert_eq!(game.bomb_active, BOMB_DURATION);
        assert_eq!(game.player.bombs, 0);

        game.bomb_active = 0;
        assert!(!game.detonate_bomb());
        assert_eq!(game.bomb_active, 0);
    }

    #[test]
    fn test_player_hitbox_is_inset() {
        let p = Player::default();
        let hb = p.hitbox();
        assert_eq!(hb.x, p.pos.x + 8.0);
        assert_eq!(hb.w, 24.0);
    }

    #[test]
    fn test_clamp_reserves_hud() {
        let mut p = Player::default();
        p.pos = Vec2::new(-50.0, 0.0);
        p.clamp_to_playfield();
        assert_eq!(p.pos, Vec2::new(0.0, HUD_HEIGHT));

        p.pos = Vec2::new(1000.0, 1000.0);
        p.clamp_to_playfield();
        assert_eq!(p.pos, Vec2::new(380.0, 640.0));
    }

    #[test]
    fn test_health_fraction_never_negative() {
        let mut ctx = SimContext::new(3, Settings::default());
        let mut enemy = crate::sim::spawn_wave(1, &mut ctx.rng).remove(0);
        enemy.health = -2.5;
        assert_eq!(enemy.health_fraction(), 0.0);
    }

    #[test]
    fn test_same_seed_same_scenery() {
        let a = SimContext::new(42, Settings::default()).new_game(0);
        let b = SimContext::new(42, Settings::default()).new_game(0);
        assert_eq!(a, b);
    }
}
