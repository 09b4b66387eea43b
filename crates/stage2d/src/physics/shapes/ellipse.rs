//! Ellipse shape

use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;

/// Ellipse defined by its center and independent per-axis radii.
///
/// A circle is the `rx == ry` case; the narrow phase normalizes the
/// per-axis radii into unit-circle space, so a circular ellipse behaves
/// exactly like a true circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center of the ellipse
    pub pos: Vec2,
    /// Per-axis radii (rx, ry)
    pub radius: Vec2,
}

impl Ellipse {
    /// Create an ellipse centered at (x, y) with the given full extents
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Create a circle centered at (x, y)
    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius: Vec2::new(radius, radius),
        }
    }

    /// Returns true when both radii are equal
    pub fn is_circle(&self) -> bool {
        self.radius.x == self.radius.y
    }

    /// Axis-aligned bounds of the ellipse
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(
            self.pos.x - self.radius.x,
            self.pos.y - self.radius.y,
            self.radius.x * 2.0,
            self.radius.y * 2.0,
        )
    }

    /// Point containment via the normalized quadratic form
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let nx = (x - self.pos.x) / self.radius.x;
        let ny = (y - self.pos.y) / self.radius.y;
        nx * nx + ny * ny <= 1.0
    }

    /// Translate the ellipse by the given delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
    }

    /// Move the ellipse center to the given position
    pub fn shift(&mut self, x: f32, y: f32) {
        self.pos.x = x;
        self.pos.y = y;
    }
}
