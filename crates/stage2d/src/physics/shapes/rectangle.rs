//! Axis-aligned rectangle shape

use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;

/// Axis-aligned rectangle defined by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from position and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Width of the rectangle
    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Height of the rectangle
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Left edge coordinate
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    /// Right edge coordinate
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Top edge coordinate
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Bottom edge coordinate
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Axis-aligned bounds (identical to the rectangle itself)
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Point containment, inclusive on all four edges.
    ///
    /// A point exactly on the right or bottom edge is inside; adjacent
    /// tiles therefore share their boundary points.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    /// Returns true if the other rectangle lies entirely within this one
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if the two rectangles intersect
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// World-space corner points in clockwise order (y-down), for the
    /// generic polygon narrow phase
    pub fn corner_points(&self) -> [Vec2; 4] {
        [
            self.pos,
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left(), self.bottom()),
        ]
    }

    /// Translate the rectangle by the given delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
    }

    /// Move the rectangle to the given position
    pub fn shift(&mut self, x: f32, y: f32) {
        self.pos.x = x;
        self.pos.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_boundary_is_inclusive() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(100.0, 100.0));
        assert!(rect.contains(100.0, 0.0));
        assert!(!rect.contains(100.001, 50.0));
        assert!(!rect.contains(-0.001, 50.0));
    }

    #[test]
    fn test_corner_points_clockwise() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let corners = rect.corner_points();
        assert_eq!(corners[0], Vec2::new(10.0, 20.0));
        assert_eq!(corners[1], Vec2::new(40.0, 20.0));
        assert_eq!(corners[2], Vec2::new(40.0, 60.0));
        assert_eq!(corners[3], Vec2::new(10.0, 60.0));
    }

    #[test]
    fn test_overlaps_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
    }
}
