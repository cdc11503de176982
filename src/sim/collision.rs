//! Axis-aligned rectangle overlap
//!
//! Every gameplay collision in Sky Ace is a box test: bullets, enemies,
//! pickups and the (shrunk) player hitbox are all rectangles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Shrink by `d` on every side
    pub fn inset(&self, d: f32) -> Self {
        Self::new(self.x + d, self.y + d, self.w - 2.0 * d, self.h - 2.0 * d)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Anything that occupies a box on the playfield
pub trait Hitbox {
    fn pos(&self) -> Vec2;
    fn size(&self) -> Vec2;

    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos(), self.size())
    }

    fn center(&self) -> Vec2 {
        self.pos() + self.size() / 2.0
    }
}

impl Hitbox for Rect {
    fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    fn rect(&self) -> Rect {
        *self
    }
}

/// Overlap test between two hitboxes
#[inline]
pub fn collides(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    a.rect().overlaps(&b.rect())
}
