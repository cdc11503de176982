//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (reduced to per-frame `TickInput` snapshots)
//! - Wall-clock seeding

pub mod input;

pub use input::{InputReducer, Key};

/// Seed derived from the wall clock (milliseconds since the epoch)
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed derived from the wall clock (milliseconds since the epoch)
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
