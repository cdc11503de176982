//! Demo pilot
//!
//! Produces a `TickInput` from the current state so the game can play itself
//! (attract mode and the headless runner). Dodges incoming fire first, then
//! picks up power-ups, otherwise lines up under the nearest enemy.

use glam::Vec2;

use super::collision::{Hitbox, Rect};
use super::state::{GameData, GamePhase};
use super::tick::TickInput;
use crate::consts::*;

/// How far ahead (in pixels above the hitbox) incoming fire is considered
const THREAT_LOOKAHEAD: f32 = 120.0;
/// Horizontal slack around the hitbox when judging a bullet dangerous
const THREAT_MARGIN: f32 = 14.0;
/// Enemy bullets in the danger zone that justify spending a bomb
const PANIC_BULLETS: usize = 4;
/// Distance from the target below which the pilot stops adjusting
const DEADBAND: f32 = 3.0;
/// Preferred cruising height (top edge of the craft)
const CRUISE_Y: f32 = PLAYFIELD_HEIGHT - 110.0;

/// Decide this frame's input for `state`
pub fn steer(state: &GameData) -> TickInput {
    let mut input = TickInput::default();
    match state.state {
        GamePhase::Menu => {
            input.menu_confirm = true;
            return input;
        }
        GamePhase::Paused => {
            input.pause_toggled = true;
            return input;
        }
        GamePhase::GameOver => {
            input.restart_confirm = true;
            return input;
        }
        GamePhase::Playing => {}
    }

    input.shoot_held = true;

    let player = &state.player;
    let hitbox = player.hitbox();
    let danger = danger_zone(&hitbox);
    let threats: Vec<Vec2> = state
        .bullets
        .iter()
        .filter(|b| b.is_enemy() && b.vel.y > 0.0 && b.rect().overlaps(&danger))
        .map(|b| b.center())
        .collect();

    if threats.len() >= PANIC_BULLETS && player.bombs > 0 && state.bomb_active == 0 {
        input.bomb_triggered = true;
    }

    let center = player.center();
    let target_x = if let Some(nearest) = threats.iter().max_by(|a, b| a.y.total_cmp(&b.y)) {
        // Sidestep away from the closest shot, toward open space
        let away = if nearest.x > center.x { -1.0 } else { 1.0 };
        let away = if would_leave_field(center.x + away * player.size.x, player.size.x) {
            -away
        } else {
            away
        };
        center.x + away * player.size.x
    } else if let Some(pu) = state
        .power_ups
        .iter()
        .filter(|p| p.pos.y > 0.0)
        .min_by(|a, b| a.center().distance(center).total_cmp(&b.center().distance(center)))
    {
        pu.center().x
    } else if let Some(enemy) = state
        .enemies
        .iter()
        .filter(|e| e.pos.y + e.size.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    {
        enemy.center().x
    } else {
        PLAYFIELD_WIDTH / 2.0
    };

    let dx = target_x - center.x;
    input.move_left = dx < -DEADBAND;
    input.move_right = dx > DEADBAND;

    let dy = CRUISE_Y - player.pos.y;
    input.move_up = dy < -DEADBAND;
    input.move_down = dy > DEADBAND;

    input
}

/// Strip of airspace directly above (and slightly around) the hitbox
fn danger_zone(hitbox: &Rect) -> Rect {
    Rect::new(
        hitbox.x - THREAT_MARGIN,
        hitbox.y - THREAT_LOOKAHEAD,
        hitbox.w + THREAT_MARGIN * 2.0,
        hitbox.h + THREAT_LOOKAHEAD,
    )
}

fn would_leave_field(center_x: f32, width: f32) -> bool {
    center_x - width / 2.0 < 0.0 || center_x + width / 2.0 > PLAYFIELD_WIDTH
}
