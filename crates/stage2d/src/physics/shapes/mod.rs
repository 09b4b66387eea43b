//! Collision shape primitives
//!
//! Three concrete shapes (`Rect`, `Polygon`, `Ellipse`) behind a tagged
//! `Shape` enum. The enum keeps narrow-phase dispatch exhaustive: every
//! shape pair is matched at compile time, so an unsupported combination
//! cannot reach the solver.

mod ellipse;
mod polygon;
mod rectangle;

pub use ellipse::Ellipse;
pub use polygon::Polygon;
pub use rectangle::Rect;

use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;

/// A collision shape in local body space
#[derive(Debug, Clone)]
pub enum Shape {
    /// Axis-aligned rectangle
    Rect(Rect),
    /// Convex polygon (clockwise winding)
    Polygon(Polygon),
    /// Ellipse with independent per-axis radii
    Ellipse(Ellipse),
}

impl Shape {
    /// Position of the shape (top-left for rects and polygons, center
    /// for ellipses)
    pub fn pos(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => r.pos,
            Shape::Polygon(p) => p.pos,
            Shape::Ellipse(e) => e.pos,
        }
    }

    /// Axis-aligned bounds of the shape
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Rect(r) => r.bounds(),
            Shape::Polygon(p) => p.bounds(),
            Shape::Ellipse(e) => e.bounds(),
        }
    }

    /// Point containment test in the shape's coordinate space
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self {
            Shape::Rect(r) => r.contains(x, y),
            Shape::Polygon(p) => p.contains(x, y),
            Shape::Ellipse(e) => e.contains(x, y),
        }
    }

    /// Translate the shape by the given delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            Shape::Rect(r) => r.translate(dx, dy),
            Shape::Polygon(p) => p.translate(dx, dy),
            Shape::Ellipse(e) => e.translate(dx, dy),
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<Ellipse> for Shape {
    fn from(ellipse: Ellipse) -> Self {
        Shape::Ellipse(ellipse)
    }
}
