//! Collision type and mask filtering
//!
//! Bodies carry a collision type (what they are) and a collision mask
//! (what they collide with). Two bodies interact only when each one's
//! type is present in the other's mask.

use bitflags::bitflags;

bitflags! {
    /// Collision categories usable as both type and mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CollisionType: u32 {
        /// Static world geometry (platforms, walls)
        const WORLD_SHAPE = 1 << 0;
        /// Player-controlled objects
        const PLAYER_OBJECT = 1 << 1;
        /// Non-player characters
        const NPC_OBJECT = 1 << 2;
        /// Enemy objects
        const ENEMY_OBJECT = 1 << 3;
        /// Collectable items
        const COLLECTABLE_OBJECT = 1 << 4;
        /// Level transition triggers
        const ACTION_OBJECT = 1 << 5;
        /// Projectiles
        const PROJECTILE_OBJECT = 1 << 6;
        /// World boundary shapes
        const WORLD_BOUNDARY = 1 << 7;
        /// First user-defined category
        const USER = 1 << 8;
        /// Matches every category
        const ALL = u32::MAX;
    }
}

impl Default for CollisionType {
    fn default() -> Self {
        CollisionType::ALL
    }
}

/// Returns true when the two bodies' type/mask pairs permit a collision.
///
/// Symmetric: each body's type must appear in the other body's mask.
pub fn should_collide(
    type_a: CollisionType,
    mask_a: CollisionType,
    type_b: CollisionType,
    mask_b: CollisionType,
) -> bool {
    mask_a.intersects(type_b) && mask_b.intersects(type_a)
}
