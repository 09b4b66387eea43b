//! Math utilities and types
//!
//! Provides the fundamental 2D math types used across the engine.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type (2D affine transforms)
pub type Mat3 = Matrix3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Extension trait for [`Vec2`] with 2D-specific convenience methods
pub trait Vec2Ext {
    /// The perpendicular vector, rotated 90 degrees clockwise in a
    /// y-down coordinate system: `(x, y) -> (y, -x)`.
    ///
    /// For a clockwise-wound polygon edge this yields the outward
    /// normal. Named to avoid nalgebra's two-argument `perp` (the 2D
    /// cross product).
    fn perp_cw(&self) -> Vec2;

    /// This vector rotated by `angle` (radians) around the origin
    fn rotated(&self, angle: f32) -> Vec2;

    /// Component-wise finiteness check
    fn is_finite(&self) -> bool;
}

impl Vec2Ext for Vec2 {
    fn perp_cw(&self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }

    fn rotated(&self, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Math utility functions
pub mod utils {
    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perp_is_orthogonal() {
        let v = Vec2::new(3.0, 4.0);
        assert_relative_eq!(v.dot(&v.perp_cw()), 0.0);
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let v = Vec2::new(1.0, 0.0);
        let r = v.rotated(constants::PI / 2.0);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_is_finite_rejects_nan() {
        assert!(Vec2::new(1.0, 2.0).is_finite());
        assert!(!Vec2::new(f32::NAN, 2.0).is_finite());
        assert!(!Vec2::new(1.0, f32::INFINITY).is_finite());
    }
}
