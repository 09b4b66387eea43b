//! Axis-aligned bounding boxes
//!
//! `Bounds` is the AABB type shared by shapes, bodies and the spatial
//! hash. An empty bounds uses `+inf/-inf` sentinels so that adding the
//! first vertex always tightens both corners.

use crate::foundation::math::Vec2;

/// Axis-aligned bounding box
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y` unless the bounds
/// has been cleared (empty state). Bounds are always derived from a
/// vertex set or unioned from other bounds; they are never authoritative
/// on their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner of the bounding box
    pub min: Vec2,
    /// Maximum corner of the bounding box
    pub max: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Create an empty bounds (infinite sentinels, grows on first add)
    pub fn new() -> Self {
        Self {
            min: Vec2::new(f32::INFINITY, f32::INFINITY),
            max: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Create a bounds from a vertex set
    pub fn from_points(vertices: &[Vec2]) -> Self {
        let mut bounds = Self::new();
        bounds.update(vertices);
        bounds
    }

    /// Create a bounds from a position and size
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        self.set_min_max(f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
    }

    /// Set the bounds to the given min and max values
    pub fn set_min_max(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        self.min.x = min_x;
        self.min.y = min_y;
        self.max.x = max_x;
        self.max.y = max_y;
    }

    /// Recompute the bounds from the given vertices, discarding the
    /// previous extent. O(n) in vertex count.
    pub fn update(&mut self, vertices: &[Vec2]) {
        self.add(vertices, true);
    }

    /// Grow the bounds to include the given vertices
    ///
    /// When `clear` is true the bounds is reset first.
    pub fn add(&mut self, vertices: &[Vec2], clear: bool) {
        if clear {
            self.clear();
        }
        for vertex in vertices {
            if vertex.x > self.max.x {
                self.max.x = vertex.x;
            }
            if vertex.x < self.min.x {
                self.min.x = vertex.x;
            }
            if vertex.y > self.max.y {
                self.max.y = vertex.y;
            }
            if vertex.y < self.min.y {
                self.min.y = vertex.y;
            }
        }
    }

    /// Grow the bounds to include another bounds (union in place)
    pub fn add_bounds(&mut self, other: &Bounds) {
        if other.max.x > self.max.x {
            self.max.x = other.max.x;
        }
        if other.min.x < self.min.x {
            self.min.x = other.min.x;
        }
        if other.max.y > self.max.y {
            self.max.y = other.max.y;
        }
        if other.min.y < self.min.y {
            self.min.y = other.min.y;
        }
    }

    /// Return the union of this bounds with another
    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut result = *self;
        result.add_bounds(other);
        result
    }

    /// x position (left edge)
    pub fn x(&self) -> f32 {
        self.min.x
    }

    /// y position (top edge)
    pub fn y(&self) -> f32 {
        self.min.y
    }

    /// Width of the bounds
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the bounds
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Left edge coordinate
    pub fn left(&self) -> f32 {
        self.min.x
    }

    /// Right edge coordinate
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Top edge coordinate
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Bottom edge coordinate
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Center point of the bounds
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() / 2.0,
            self.min.y + self.height() / 2.0,
        )
    }

    /// Returns true if the bounds contains the given point.
    ///
    /// Containment is inclusive on all four edges: a point lying exactly
    /// on the min or max edge is inside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }

    /// Returns true if the given bounds lies entirely within this one
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Returns true if the two bounds intersect (closed intervals on
    /// both axes, so touching edges overlap)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    /// Determines whether all coordinates of this bounds are finite.
    ///
    /// The spatial hash refuses to index non-finite bounds; cell-key
    /// computation would otherwise overflow.
    pub fn is_finite(&self) -> bool {
        self.min.x.is_finite()
            && self.max.x.is_finite()
            && self.min.y.is_finite()
            && self.max.y.is_finite()
    }

    /// Translate the bounds by the given delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.min.x += dx;
        self.max.x += dx;
        self.min.y += dy;
        self.max.y += dy;
    }

    /// Move the bounds to the given position, preserving its size
    pub fn shift(&mut self, x: f32, y: f32) {
        let width = self.max.x - self.min.x;
        let height = self.max.y - self.min.y;
        self.min.x = x;
        self.max.x = x + width;
        self.min.y = y;
        self.max.y = y + height;
    }
}
