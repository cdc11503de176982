//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame. Stages run in a fixed
//! order and later stages observe earlier mutations; removals are compacting
//! filter passes, never index splices.

use glam::Vec2;
use rand::Rng;

use super::collision::{Hitbox, collides};
use super::effects::{spawn_explosion, spawn_hit_spark, spawn_sparkles};
use super::state::{
    Enemy, EnemyKind, GameData, GameEvent, GamePhase, MovePattern, Player, PowerUp, PowerUpKind,
    SimContext,
};
use super::wave::{spawn_wave, wave_is_boss};
use super::weapons::{enemy_volley, player_volley, shot_cooldown};
use crate::consts::*;

/// Touch drag gesture: where the finger went down (the anchor) and where it is now
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchDrag {
    pub start: Vec2,
    pub current: Vec2,
}

/// Input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Active touch drag (also counts as holding fire)
    pub touch_drag: Option<TouchDrag>,
    pub shoot_held: bool,
    /// Edge: bomb key pressed this frame
    pub bomb_triggered: bool,
    /// Edge: pause key pressed this frame
    pub pause_toggled: bool,
    /// Edge: start from the title screen (also resumes from pause)
    pub menu_confirm: bool,
    /// Edge: start over after game over
    pub restart_confirm: bool,
}

/// Touch drags shorter than this are treated as holding still
const DRAG_DEADZONE: f32 = 5.0;
/// Fraction of the drag the anchor catches up each frame
const DRAG_CATCH_UP: f32 = 0.3;
/// Lowest y the boss descends to before strafing
const BOSS_CRUISE_Y: f32 = 50.0;

/// Advance the session by one frame
///
/// Phase transitions driven by edge inputs are applied first; the
/// simulation proper only runs while `Playing`. The touch anchor in `input`
/// is relaxed toward the current touch point in place, so the caller should
/// keep feeding the same snapshot back.
pub fn tick(state: &mut GameData, input: &mut TickInput, ctx: &mut SimContext) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let SimContext { rng, settings, .. } = ctx;

    apply_transitions(state, input, rng, &mut events);
    if state.state != GamePhase::Playing {
        return events;
    }

    move_player(&mut state.player, input);
    state.player.invincible = state.player.invincible.saturating_sub(1);

    let shooting = input.shoot_held || settings.auto_shoot || input.touch_drag.is_some();
    fire_player(state, shooting);

    let bomb_frame = update_bomb(state, rng, &mut events);
    scroll_background(state, rng);
    update_waves(state, rng, &mut events);
    update_enemies(state, bomb_frame);

    cull_enemies(state);
    update_bullets(state);
    resolve_player_fire(state, rng, &mut events);

    if state.combo_timer > 0 {
        state.combo_timer -= 1;
        if state.combo_timer == 0 {
            state.combo = 0;
        }
    }

    resolve_player_collisions(state, rng, &mut events);
    // A fatal hit ends the run; pickups on that frame are forfeit
    if state.state == GamePhase::Playing {
        update_power_ups(state, rng, &mut events);
    }
    update_particles(state, settings.max_particles());

    state.shake_timer = state.shake_timer.saturating_sub(1);
    state.flash_timer = state.flash_timer.saturating_sub(1);

    if state.player.score > state.high_score {
        state.high_score = state.player.score;
        events.push(GameEvent::NewHighScore {
            score: state.high_score,
        });
    }

    events
}

/// Menu/pause/bomb/restart edges
fn apply_transitions(
    state: &mut GameData,
    input: &TickInput,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    match state.state {
        GamePhase::Menu => {
            if input.menu_confirm {
                log::info!("Game started");
                state.state = GamePhase::Playing;
            }
        }
        GamePhase::Playing => {
            if input.pause_toggled {
                state.state = GamePhase::Paused;
                return;
            }
            if input.bomb_triggered && state.detonate_bomb() {
                log::debug!("Bomb away ({} left)", state.player.bombs);
                events.push(GameEvent::BombDetonated);
            }
        }
        GamePhase::Paused => {
            if input.pause_toggled || input.menu_confirm {
                state.state = GamePhase::Playing;
            }
        }
        GamePhase::GameOver => {
            if input.restart_confirm {
                log::info!("Restarting (high score {})", state.high_score);
                state.restart(rng);
            }
        }
    }
}

/// Keyboard direction plus drag-style touch steering
fn move_player(player: &mut Player, input: &mut TickInput) {
    let mut dir = Vec2::ZERO;
    if input.move_left {
        dir.x -= 1.0;
    }
    if input.move_right {
        dir.x += 1.0;
    }
    if input.move_up {
        dir.y -= 1.0;
    }
    if input.move_down {
        dir.y += 1.0;
    }

    if let Some(drag) = input.touch_drag.as_mut() {
        let delta = drag.current - drag.start;
        let dist = delta.length();
        if dist > DRAG_DEADZONE {
            dir += delta / dist;
            drag.start += delta * DRAG_CATCH_UP;
        }
    }

    if dir != Vec2::ZERO {
        player.pos += dir.normalize() * player.speed;
    }
    player.clamp_to_playfield();
}

fn fire_player(state: &mut GameData, shooting: bool) {
    let player = &mut state.player;
    player.shoot_cooldown = player.shoot_cooldown.saturating_sub(1);
    if shooting && player.shoot_cooldown == 0 {
        state
            .bullets
            .extend(player_volley(player.firepower, player.muzzle()));
        player.shoot_cooldown = shot_cooldown(player.firepower);
    }
}

/// Screen-wide bomb damage; returns true if the bomb was active this frame
fn update_bomb(state: &mut GameData, rng: &mut impl Rng, events: &mut Vec<GameEvent>) -> bool {
    if state.bomb_active == 0 {
        return false;
    }
    state.bomb_active -= 1;

    for enemy in state.enemies.iter_mut() {
        enemy.health -= BOMB_DAMAGE;
        if !enemy.is_alive() {
            let (count, big) = enemy.kind.bomb_explosion();
            let center = enemy.center();
            spawn_explosion(&mut state.particles, rng, center, count, big);
            state.player.score += enemy.score_value;
            events.push(GameEvent::EnemyDestroyed {
                kind: enemy.kind,
                points: enemy.score_value,
                pos: center,
            });
        }
    }
    state.enemies.retain(Enemy::is_alive);
    state.bullets.retain(|b| !b.is_enemy());
    true
}

fn scroll_background(state: &mut GameData, rng: &mut impl Rng) {
    state.bg_offset += 1.0;
    for el in state.bg_elements.iter_mut() {
        el.pos.y += el.speed;
        if el.pos.y > PLAYFIELD_HEIGHT + 50.0 {
            el.pos.y = -50.0;
            el.pos.x = rng.random_range(0.0..PLAYFIELD_WIDTH);
        }
    }
}

/// Start the inter-wave countdown once the field is clear; spawn when it ends
fn update_waves(state: &mut GameData, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    if state.enemies.is_empty() && state.wave_timer == 0 {
        state.wave_timer = state.wave_delay.max(1);
    }
    if state.wave_timer > 0 {
        state.wave_timer -= 1;
        if state.wave_timer == 0 {
            state.wave += 1;
            state.enemies.extend(spawn_wave(state.wave, rng));
            events.push(GameEvent::WaveSpawned {
                wave: state.wave,
                boss: wave_is_boss(state.wave),
            });
        }
    }
}

/// Movement and firing; enemies hold fire while a bomb is going off
fn update_enemies(state: &mut GameData, bomb_frame: bool) {
    let target = state.player.muzzle();

    for enemy in state.enemies.iter_mut() {
        enemy.move_timer += 1;
        steer_enemy(enemy);

        enemy.shoot_timer -= 1.0;
        if enemy.shoot_timer <= 0.0 && enemy.pos.y > 0.0 && !bomb_frame {
            enemy.shoot_timer = enemy.shoot_interval;
            state.bullets.extend(enemy_volley(enemy, target));
        }
    }
}

fn steer_enemy(enemy: &mut Enemy) {
    let t = enemy.move_timer as f32;
    match (enemy.kind, enemy.move_pattern) {
        (EnemyKind::Boss, _) => {
            enemy.pos.y = (enemy.pos.y + enemy.speed).min(BOSS_CRUISE_Y);
            let home = PLAYFIELD_WIDTH / 2.0 - enemy.size.x / 2.0;
            enemy.pos.x = home + (t * 0.02).sin() * (home - 20.0);
        }
        (_, MovePattern::Straight) => {
            enemy.pos.y += enemy.speed;
        }
        (_, MovePattern::Sine) => {
            enemy.pos.y += enemy.speed;
            enemy.pos.x = enemy.start_x + (t * 0.03).sin() * 60.0;
        }
        (_, MovePattern::Zigzag) => {
            enemy.pos.y += enemy.speed;
            enemy.pos.x = enemy.start_x + (t * 0.05).sin() * 40.0;
        }
    }
    enemy.pos.x = enemy.pos.x.clamp(0.0, PLAYFIELD_WIDTH - enemy.size.x);
}

/// Drop enemies that fell past the bottom or never made it on screen
fn cull_enemies(state: &mut GameData) {
    state
        .enemies
        .retain(|e| e.pos.y < PLAYFIELD_HEIGHT + 50.0 && e.pos.y > -200.0);
}

fn update_bullets(state: &mut GameData) {
    for bullet in state.bullets.iter_mut() {
        bullet.pos += bullet.vel;
    }
    state.bullets.retain(|b| {
        b.pos.x > -20.0
            && b.pos.x < PLAYFIELD_WIDTH + 20.0
            && b.pos.y > -20.0
            && b.pos.y < PLAYFIELD_HEIGHT + 20.0
    });
}

/// Player bullets against enemies: each bullet damages at most one enemy
fn resolve_player_fire(state: &mut GameData, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut kept = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        if bullet.is_enemy() {
            kept.push(bullet);
            continue;
        }
        let Some(i) = state
            .enemies
            .iter()
            .position(|e| e.is_alive() && collides(&bullet, e))
        else {
            kept.push(bullet);
            continue;
        };

        let enemy = &mut state.enemies[i];
        enemy.health -= bullet.damage;
        spawn_hit_spark(&mut state.particles, rng, bullet.pos);
        if !enemy.is_alive() {
            let enemy = enemy.clone();
            shoot_down(state, &enemy, rng, events);
        }
    }

    state.bullets = kept;
    state.enemies.retain(Enemy::is_alive);
}

/// Kill rewards: explosion, combo-scaled score, shake, power-up roll
fn shoot_down(state: &mut GameData, enemy: &Enemy, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let center = enemy.center();
    let (count, big) = enemy.kind.death_explosion();
    spawn_explosion(&mut state.particles, rng, center, count, big);

    let points = enemy.score_value * (1 + u64::from(state.combo / 3));
    state.player.score += points;
    state.combo += 1;
    state.combo_timer = COMBO_WINDOW;
    state.shake_timer = if enemy.is_boss() { 20 } else { 5 };
    events.push(GameEvent::EnemyDestroyed {
        kind: enemy.kind,
        points,
        pos: center,
    });

    if enemy.is_boss() {
        log::info!("Boss destroyed on wave {}", state.wave);
    }

    if rng.random_bool(enemy.kind.drop_chance()) {
        let kind = roll_power_up(enemy.kind, rng);
        state.power_ups.push(PowerUp::dropped_at(center, kind));
    }
}

/// Bosses drop any kind uniformly; others favour firepower 60/20/20
fn roll_power_up(kind: EnemyKind, rng: &mut impl Rng) -> PowerUpKind {
    if kind == EnemyKind::Boss {
        return PowerUpKind::from_index(rng.random_range(0..=2u8));
    }
    if rng.random_bool(0.6) {
        PowerUpKind::Firepower
    } else if rng.random_bool(0.5) {
        PowerUpKind::Bomb
    } else {
        PowerUpKind::Life
    }
}

/// Enemy bullets and rams against the shrunk player hitbox
fn resolve_player_collisions(
    state: &mut GameData,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    if state.player.is_invincible() {
        return;
    }
    let hitbox = state.player.hitbox();

    let mut struck = false;
    state.bullets.retain(|b| {
        if !struck && b.is_enemy() && collides(b, &hitbox) {
            struck = true;
            return false;
        }
        true
    });
    if struck {
        player_hit(state, rng, events);
    }

    if let Some(i) = state.enemies.iter().position(|e| collides(e, &hitbox)) {
        player_hit(state, rng, events);

        let enemy = &mut state.enemies[i];
        enemy.health -= RAM_DAMAGE;
        if !enemy.is_alive() {
            let center = enemy.center();
            let kind = enemy.kind;
            spawn_explosion(&mut state.particles, rng, center, 20, true);
            events.push(GameEvent::EnemyDestroyed {
                kind,
                points: 0,
                pos: center,
            });
        }
        state.enemies.retain(Enemy::is_alive);
    }
}

fn player_hit(state: &mut GameData, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.invincible = INVINCIBILITY_FRAMES;
    player.firepower = player.firepower.saturating_sub(1).max(1);
    state.shake_timer = 15;
    state.flash_timer = 10;

    let center = state.player.center();
    let lives = state.player.lives;
    spawn_explosion(&mut state.particles, rng, center, 20, false);
    events.push(GameEvent::PlayerHit { lives });
    log::debug!("Player hit, {} lives left", lives);

    if lives == 0 && state.state != GamePhase::GameOver {
        state.state = GamePhase::GameOver;
        spawn_explosion(&mut state.particles, rng, center, 40, true);
        log::info!(
            "Game over: score {} on wave {}",
            state.player.score,
            state.wave
        );
        events.push(GameEvent::GameOver {
            score: state.player.score,
            wave: state.wave,
        });
    }
}

fn update_power_ups(state: &mut GameData, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    for pu in state.power_ups.iter_mut() {
        pu.pos.y += pu.vy;
    }

    let player_box = state.player.rect();
    let power_ups = std::mem::take(&mut state.power_ups);
    for pu in power_ups {
        if pu.pos.y > PLAYFIELD_HEIGHT + 30.0 {
            continue;
        }
        if !collides(&pu, &player_box) {
            state.power_ups.push(pu);
            continue;
        }

        let player = &mut state.player;
        match pu.kind {
            PowerUpKind::Firepower => player.firepower = (player.firepower + 1).min(MAX_FIREPOWER),
            PowerUpKind::Bomb => player.bombs = (player.bombs + 1).min(MAX_BOMBS),
            PowerUpKind::Life => player.lives = (player.lives + 1).min(MAX_LIVES),
        }
        spawn_sparkles(&mut state.particles, rng, pu.center());
        log::debug!("Collected {:?}", pu.kind);
        events.push(GameEvent::PowerUpCollected { kind: pu.kind });
    }
}

fn update_particles(state: &mut GameData, max_particles: usize) {
    for pt in state.particles.iter_mut() {
        pt.pos += pt.vel;
        pt.life -= 1.0;
        pt.vel *= PARTICLE_DAMPING;
    }
    state.particles.retain(|p| p.life > 0.0);

    // Oldest particles go first when over budget
    if state.particles.len() > max_particles {
        let excess = state.particles.len() - max_particles;
        state.particles.drain(..excess);
    }
}
