//! Raw device events to per-frame input intents
//!
//! Key and touch callbacks arrive at arbitrary times; the frame loop calls
//! `snapshot` once per tick. Held keys persist across snapshots, edge inputs
//! (bomb, pause, confirm) are consumed by the snapshot that sees them.

use glam::Vec2;

use crate::sim::{GamePhase, TickInput, TouchDrag};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Space: fire, and start/restart on the title and game over screens
    Fire,
    Bomb,
    Pause,
    Confirm,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Fire),
            "b" | "B" => Some(Key::Bomb),
            "p" | "P" | "Escape" => Some(Key::Pause),
            "Enter" => Some(Key::Confirm),
            _ => None,
        }
    }
}

/// Accumulates device events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputReducer {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire: bool,

    fire_pressed: bool,
    bomb_pressed: bool,
    pause_pressed: bool,
    confirm_pressed: bool,
    touch_started: bool,

    touch: Option<TouchDrag>,
}

impl InputReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Fire => {
                // Ignore key repeat for the edge
                if !self.fire {
                    self.fire_pressed = true;
                }
                self.fire = true;
            }
            Key::Bomb => self.bomb_pressed = true,
            Key::Pause => self.pause_pressed = true,
            Key::Confirm => self.confirm_pressed = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.up = false,
            Key::Down => self.down = false,
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Fire => self.fire = false,
            Key::Bomb | Key::Pause | Key::Confirm => {}
        }
    }

    /// Finger down at `pos` (playfield coordinates)
    pub fn touch_start(&mut self, pos: Vec2) {
        self.touch_started = true;
        self.touch = Some(TouchDrag {
            start: pos,
            current: pos,
        });
    }

    pub fn touch_move(&mut self, pos: Vec2) {
        if let Some(drag) = self.touch.as_mut() {
            drag.current = pos;
        }
    }

    pub fn touch_end(&mut self) {
        self.touch = None;
    }

    /// Drop every held input (window blur, visibility change)
    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
        self.fire = false;
        self.touch = None;
    }

    /// Input for the next tick, given the phase the game is currently in
    ///
    /// A tap on the title, pause or game over screen only confirms; it does
    /// not begin a drag.
    pub fn snapshot(&mut self, phase: GamePhase) -> TickInput {
        let confirm = self.confirm_pressed || self.fire_pressed;
        let tapped = self.touch_started && phase != GamePhase::Playing;
        if tapped {
            self.touch = None;
        }

        let input = TickInput {
            move_up: self.up,
            move_down: self.down,
            move_left: self.left,
            move_right: self.right,
            touch_drag: self.touch,
            shoot_held: self.fire,
            bomb_triggered: self.bomb_pressed,
            pause_toggled: self.pause_pressed,
            menu_confirm: match phase {
                GamePhase::Menu => confirm || tapped,
                GamePhase::Paused => tapped,
                _ => false,
            },
            restart_confirm: phase == GamePhase::GameOver && (confirm || tapped),
        };

        self.fire_pressed = false;
        self.bomb_pressed = false;
        self.pause_pressed = false;
        self.confirm_pressed = false;
        self.touch_started = false;

        input
    }

    /// Carry the tick's relaxed touch anchor back into the live gesture
    pub fn absorb(&mut self, input: &TickInput) {
        if let (Some(live), Some(ticked)) = (self.touch.as_mut(), input.touch_drag) {
            live.start = ticked.start;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_key_name("w"), Some(Key::Up));
        assert_eq!(Key::from_key_name(" "), Some(Key::Fire));
        assert_eq!(Key::from_key_name("P"), Some(Key::Pause));
        assert_eq!(Key::from_key_name("Enter"), Some(Key::Confirm));
        assert_eq!(Key::from_key_name("x"), None);
    }

    #[test]
    fn test_held_keys_persist() {
        let mut r = InputReducer::new();
        r.key_down(Key::Left);
        assert!(r.snapshot(GamePhase::Playing).move_left);
        assert!(r.snapshot(GamePhase::Playing).move_left);
        r.key_up(Key::Left);
        assert!(!r.snapshot(GamePhase::Playing).move_left);
    }

    #[test]
    fn test_edges_clear_after_snapshot() {
        let mut r = InputReducer::new();
        r.key_down(Key::Bomb);
        r.key_down(Key::Pause);
        let first = r.snapshot(GamePhase::Playing);
        assert!(first.bomb_triggered);
        assert!(first.pause_toggled);
        let second = r.snapshot(GamePhase::Playing);
        assert!(!second.bomb_triggered);
        assert!(!second.pause_toggled);
    }

    #[test]
    fn test_space_confirms_on_menus() {
        let mut r = InputReducer::new();
        r.key_down(Key::Fire);
        let input = r.snapshot(GamePhase::Menu);
        assert!(input.menu_confirm);
        assert!(input.shoot_held);

        // Held space does not re-trigger
        r.key_down(Key::Fire);
        assert!(!r.snapshot(GamePhase::GameOver).restart_confirm);

        r.key_up(Key::Fire);
        r.key_down(Key::Confirm);
        assert!(r.snapshot(GamePhase::GameOver).restart_confirm);
    }

    #[test]
    fn test_enter_does_not_unpause() {
        let mut r = InputReducer::new();
        r.key_down(Key::Confirm);
        assert!(!r.snapshot(GamePhase::Paused).menu_confirm);
    }

    #[test]
    fn test_tap_confirms_without_drag() {
        let mut r = InputReducer::new();
        r.touch_start(Vec2::new(100.0, 100.0));
        let input = r.snapshot(GamePhase::Paused);
        assert!(input.menu_confirm);
        assert_eq!(input.touch_drag, None);

        r.touch_start(Vec2::new(100.0, 100.0));
        let input = r.snapshot(GamePhase::GameOver);
        assert!(input.restart_confirm);
    }

    #[test]
    fn test_drag_and_absorb() {
        let mut r = InputReducer::new();
        r.touch_start(Vec2::new(100.0, 100.0));
        r.touch_move(Vec2::new(150.0, 80.0));
        let mut input = r.snapshot(GamePhase::Playing);
        assert_eq!(
            input.touch_drag,
            Some(TouchDrag {
                start: Vec2::new(100.0, 100.0),
                current: Vec2::new(150.0, 80.0),
            })
        );
        assert!(!input.menu_confirm);

        if let Some(drag) = input.touch_drag.as_mut() {
            drag.start = Vec2::new(115.0, 94.0);
        }
        r.absorb(&input);
        let next = r.snapshot(GamePhase::Playing);
        assert_eq!(next.touch_drag.map(|d| d.start), Some(Vec2::new(115.0, 94.0)));

        r.touch_end();
        assert_eq!(r.snapshot(GamePhase::Playing).touch_drag, None);
    }

    #[test]
    fn test_release_all() {
        let mut r = InputReducer::new();
        r.key_down(Key::Up);
        r.key_down(Key::Fire);
        r.touch_start(Vec2::ZERO);
        r.release_all();
        let input = r.snapshot(GamePhase::Playing);
        assert!(!input.move_up);
        assert!(!input.shoot_held);
        assert_eq!(input.touch_drag, None);
    }
}
