//! Collision response data
//!
//! Populated by the narrow phase and handed to `on_collision` handlers.
//! The solver reuses one response per test, clearing it between shape
//! pairs.

use crate::foundation::math::Vec2;
use crate::physics::collision_layers::CollisionType;
use crate::scene::NodeKey;

/// Result of a narrow-phase test between two overlapping shapes
#[derive(Debug, Clone)]
pub struct CollisionResponse {
    /// Translation that moves the querying shape out of the collision
    pub overlap_v: Vec2,
    /// Magnitude of the smallest overlap along the separating axis
    pub overlap: f32,
    /// Unit axis of smallest overlap, pointing from the other shape
    /// toward the querying shape's exit direction
    pub normal: Vec2,
    /// The node the querying body collided with
    pub other: Option<NodeKey>,
    /// Collision category of the other body
    pub collision_type: CollisionType,
    /// True when shape A lies entirely inside shape B
    pub a_in_b: bool,
    /// True when shape B lies entirely inside shape A
    pub b_in_a: bool,
}

impl Default for CollisionResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResponse {
    /// Create an empty response
    pub fn new() -> Self {
        Self {
            overlap_v: Vec2::zeros(),
            overlap: f32::MAX,
            normal: Vec2::zeros(),
            other: None,
            collision_type: CollisionType::empty(),
            a_in_b: true,
            b_in_a: true,
        }
    }

    /// Reset for reuse on the next shape pair
    pub fn clear(&mut self) {
        self.overlap_v = Vec2::zeros();
        self.overlap = f32::MAX;
        self.normal = Vec2::zeros();
        self.other = None;
        self.collision_type = CollisionType::empty();
        self.a_in_b = true;
        self.b_in_a = true;
    }

    /// The same collision from the other shape's point of view: exit
    /// translation and normal negated, containment flags swapped.
    /// `other` and `collision_type` are left for the caller to fill.
    pub fn flipped(&self) -> Self {
        Self {
            overlap_v: -self.overlap_v,
            overlap: self.overlap,
            normal: -self.normal,
            other: None,
            collision_type: CollisionType::empty(),
            a_in_b: self.b_in_a,
            b_in_a: self.a_in_b,
        }
    }

    /// x component of the exit translation
    pub fn x(&self) -> f32 {
        self.overlap_v.x
    }

    /// y component of the exit translation
    pub fn y(&self) -> f32 {
        self.overlap_v.y
    }
}
