//! Overlay geometry.
//!
//! Everything here is in physical backbuffer pixels with the origin at the
//! top-left and +Y pointing down. Overlay shaders map to NDC with the
//! [`Viewport`] size.

use std::ops::{Add, Sub};

mod rect;

pub use rect::Rect;

/// Point or extent in overlay pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Size of the surface the overlay is drawn into.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport covering a `width` x `height` backbuffer.
    #[inline]
    pub fn from_backbuffer(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Non-empty and finite.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_arithmetic() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 6.0);
        assert_eq!(a + b, Vec2::new(4.0, 10.0));
        assert_eq!(a - b, Vec2::new(2.0, -2.0));
        assert_eq!(a.max(b), Vec2::new(3.0, 6.0));
    }

    #[test]
    fn degenerate_viewports_are_invalid() {
        assert!(Viewport::from_backbuffer(1280, 720).is_valid());
        assert!(!Viewport::from_backbuffer(0, 720).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 1.0).is_valid());
    }
}
