//! Sky Ace - A vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, AI, collisions, waves, scoring)
//! - `platform`: Raw device events reduced to per-frame input intents
//! - `persistence`: Key/value storage backends (file, LocalStorage, memory)
//! - `highscores`: Persisted best score
//! - `settings`: Player preferences

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical units; scaling to the display is external)
    pub const PLAYFIELD_WIDTH: f32 = 420.0;
    pub const PLAYFIELD_HEIGHT: f32 = 680.0;
    /// Top band reserved for the HUD; the player may not enter it
    pub const HUD_HEIGHT: f32 = 36.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_START_LIVES: u8 = 3;
    pub const PLAYER_START_BOMBS: u8 = 3;
    /// Hitbox shrink on each side when testing hits against the player
    pub const PLAYER_HITBOX_INSET: f32 = 8.0;

    /// Frames of immunity after spawning or being hit
    pub const INVINCIBILITY_FRAMES: u32 = 120;

    /// Upper bounds for pickup-driven stats
    pub const MAX_LIVES: u8 = 5;
    pub const MAX_BOMBS: u8 = 5;
    pub const MAX_FIREPOWER: u8 = 5;

    /// Frames between a cleared wave and the next one
    pub const WAVE_DELAY: u32 = 180;

    /// Bomb effect duration (frames) and damage dealt to every enemy per frame
    pub const BOMB_DURATION: u32 = 60;
    pub const BOMB_DAMAGE: f32 = 0.5;

    /// Frames a combo survives without another kill
    pub const COMBO_WINDOW: u32 = 90;

    /// Damage an enemy takes when it rams the player
    pub const RAM_DAMAGE: f32 = 3.0;

    /// Per-frame particle velocity damping
    pub const PARTICLE_DAMPING: f32 = 0.98;

    /// Decorative background elements
    pub const BG_ELEMENT_COUNT: usize = 15;
}

/// Install the platform logger.
///
/// Native builds use `env_logger` (filter from `RUST_LOG`, default `info`);
/// wasm builds log to the browser console. Calling it twice is harmless.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
