//! Camera viewport

use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;

/// Camera window onto the world, used for visibility culling and to
/// offset drawing
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    bounds: Bounds,
}

impl Viewport {
    /// Create a viewport at the given world position and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Bounds::from_rect(x, y, width, height),
        }
    }

    /// World-space bounds of the camera window
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// World position of the top-left corner
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.bounds.left(), self.bounds.top())
    }

    /// Viewport width
    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    /// Viewport height
    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// True when the given bounds intersects the camera window
    pub fn is_visible(&self, bounds: &Bounds) -> bool {
        self.bounds.overlaps(bounds)
    }

    /// Move the camera by a delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.bounds.translate(dx, dy);
    }

    /// Move the camera to an absolute position
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.bounds.shift(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let mut viewport = Viewport::new(0.0, 0.0, 640.0, 480.0);
        assert!(viewport.is_visible(&Bounds::from_rect(100.0, 100.0, 50.0, 50.0)));
        assert!(!viewport.is_visible(&Bounds::from_rect(700.0, 0.0, 50.0, 50.0)));
        viewport.move_to(680.0, 0.0);
        assert!(viewport.is_visible(&Bounds::from_rect(700.0, 0.0, 50.0, 50.0)));
    }
}
