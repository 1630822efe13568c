//! Minimal geometry for transition endpoints.

use std::ops::Neg;

/// A 2D pixel offset from a container's resting origin.
///
/// Panel transitions move between offsets: a pushed panel starts at its
/// entry offset (off-screen) and animates to `Offset::ZERO` (at rest).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
}

impl Offset {
    /// The resting position.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create an offset from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale a unit direction vector by container dimensions.
    ///
    /// This is how entry offsets are derived: the direction says which
    /// screen edge (or corner) a panel comes from, the container size says
    /// how far off-screen that is.
    pub fn scaled(vector: (f32, f32), width: f32, height: f32) -> Self {
        Self {
            x: vector.0 * width,
            y: vector.1 * height,
        }
    }
}

impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}
