//! Physics body attached to a scene node
//!
//! A body is the collision data side of a node: one or more shapes in
//! local space, a cached merged world-space bounds, and the type/mask
//! pair the solver filters on. Movement itself belongs to node
//! behaviors; the solver only reads bodies.

use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;
use crate::physics::collision_layers::CollisionType;
use crate::physics::shapes::Shape;

/// Collision body: shapes plus filtering data
#[derive(Debug, Clone)]
pub struct Body {
    pos: Vec2,
    shapes: Vec<Shape>,
    bounds: Bounds,
    /// What this body is, for other bodies' masks
    pub collision_type: CollisionType,
    /// What this body collides with
    pub collision_mask: CollisionType,
    /// Static bodies never test against each other
    pub is_static: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Body {
    /// Create an empty body with permissive filtering
    pub fn new() -> Self {
        Self {
            pos: Vec2::zeros(),
            shapes: Vec::new(),
            bounds: Bounds::new(),
            collision_type: CollisionType::ALL,
            collision_mask: CollisionType::ALL,
            is_static: false,
        }
    }

    /// Create a body holding a single shape
    pub fn from_shape(shape: impl Into<Shape>) -> Self {
        let mut body = Self::new();
        body.add_shape(shape);
        body
    }

    /// Add a shape, returning its index
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> usize {
        self.shapes.push(shape.into());
        self.recalc_bounds();
        self.shapes.len() - 1
    }

    /// Remove and return the shape at the given index, if present
    pub fn remove_shape(&mut self, index: usize) -> Option<Shape> {
        if index >= self.shapes.len() {
            return None;
        }
        let shape = self.shapes.remove(index);
        self.recalc_bounds();
        Some(shape)
    }

    /// Shapes in local space
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// World position of the body (the owning node's absolute position)
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Reposition the body in world space, shifting the cached bounds
    pub fn set_pos(&mut self, x: f32, y: f32) {
        let dx = x - self.pos.x;
        let dy = y - self.pos.y;
        self.pos.x = x;
        self.pos.y = y;
        self.bounds.translate(dx, dy);
    }

    /// Merged world-space bounds of all shapes
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Shape at the given index translated into world space, for the
    /// narrow phase
    pub fn world_shape(&self, index: usize) -> Option<Shape> {
        self.shapes.get(index).map(|shape| {
            let mut world = shape.clone();
            world.translate(self.pos.x, self.pos.y);
            world
        })
    }

    /// Number of shapes attached to the body
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    fn recalc_bounds(&mut self) {
        self.bounds.clear();
        for shape in &self.shapes {
            self.bounds.add_bounds(&shape.bounds());
        }
        if !self.shapes.is_empty() {
            self.bounds.translate(self.pos.x, self.pos.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shapes::{Ellipse, Rect};
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_merge_all_shapes() {
        let mut body = Body::new();
        body.add_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        body.add_shape(Ellipse::circle(20.0, 0.0, 5.0));
        let bounds = body.bounds();
        assert_relative_eq!(bounds.left(), 0.0);
        assert_relative_eq!(bounds.right(), 25.0);
        assert_relative_eq!(bounds.top(), -5.0);
        assert_relative_eq!(bounds.bottom(), 10.0);
    }

    #[test]
    fn test_set_pos_shifts_bounds() {
        let mut body = Body::from_shape(Rect::new(0.0, 0.0, 40.0, 40.0));
        body.set_pos(100.0, 50.0);
        let bounds = body.bounds();
        assert_relative_eq!(bounds.left(), 100.0);
        assert_relative_eq!(bounds.top(), 50.0);
        assert_relative_eq!(bounds.width(), 40.0);
    }

    #[test]
    fn test_remove_shape_shrinks_bounds() {
        let mut body = Body::new();
        body.add_shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        let index = body.add_shape(Rect::new(50.0, 50.0, 10.0, 10.0));
        assert!(body.remove_shape(index).is_some());
        assert_relative_eq!(body.bounds().right(), 10.0);
        assert!(body.remove_shape(5).is_none());
    }

    #[test]
    fn test_world_shape_is_translated() {
        let mut body = Body::from_shape(Rect::new(5.0, 5.0, 10.0, 10.0));
        body.set_pos(100.0, 100.0);
        let world = body.world_shape(0).unwrap();
        assert_relative_eq!(world.pos().x, 105.0);
        assert_relative_eq!(world.pos().y, 105.0);
        assert!(body.world_shape(1).is_none());
    }
}
