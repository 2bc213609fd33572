//! Axis-aligned rectangle geometry
//!
//! World space matches the canvas convention: origin top-left, y grows
//! downward. Every entity and every hitbox is one of these.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
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

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Bottom-center point - where the player's feet touch surfaces
    #[inline]
    pub fn foot(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h)
    }

    /// Standard AABB overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Shrink the rectangle by per-side margins. Collision hitboxes are
    /// inset from the visual sprite so grazing misses feel fair.
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }

    /// Uniform inset on all four sides
    #[inline]
    pub fn inset_uniform(&self, margin: f32) -> Rect {
        self.inset(margin, margin, margin, margin)
    }

    /// A rectangle with zero area cannot collide with anything
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_inset_asymmetric() {
        // The runner's slide hitbox: narrow sides, low profile
        let sprite = Rect::new(100.0, 200.0, 130.0, 92.0);
        let hit = sprite.inset(30.0, 20.0, 30.0, 0.0);
        assert_eq!(hit.x, 130.0);
        assert_eq!(hit.w, 70.0);
        assert_eq!(hit.y, 220.0);
        assert_eq!(hit.h, 72.0);
    }

    #[test]
    fn test_inset_never_inverts() {
        let small = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hit = small.inset_uniform(20.0);
        assert!(hit.is_degenerate());
        assert!(!hit.overlaps(&Rect::new(-100.0, -100.0, 500.0, 500.0)) || hit.w == 0.0);
    }

    #[test]
    fn test_foot_point() {
        let r = Rect::new(10.0, 20.0, 40.0, 40.0);
        assert_eq!(r.foot(), Vec2::new(30.0, 60.0));
    }
}
