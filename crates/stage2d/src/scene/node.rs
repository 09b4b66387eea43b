//! Scene node and its behavior traits

use crate::foundation::math::Vec2;
use crate::physics::body::Body;
use crate::physics::bounds::Bounds;
use crate::physics::response::CollisionResponse;
use crate::scene::graph::UpdateContext;
use crate::scene::{NodeKey, Viewport};

/// Drawing backend seam. The engine core never draws pixels itself;
/// draw paths emit primitive calls through this trait.
pub trait Renderer {
    /// Push the current transform/color state
    fn save(&mut self);
    /// Pop the transform/color state
    fn restore(&mut self);
    /// Translate subsequent drawing by a delta
    fn translate(&mut self, dx: f32, dy: f32);
    /// Set the current RGBA draw color
    fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    /// Outline an axis-aligned rectangle
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// Per-node behavior, attached by composition.
///
/// All hooks have default no-op implementations so a behavior only
/// implements what it needs.
pub trait Renderable {
    /// Advance the behavior by one frame. Returns true when the node
    /// changed visibly and a redraw is needed.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) -> bool {
        false
    }

    /// Draw the node. Only called when the node is visible.
    fn draw(&self, _renderer: &mut dyn Renderer, _viewport: &Viewport) {}

    /// Collision notification, fired synchronously by the solver when
    /// another body's query hits this node. Returns true when the
    /// collision should be treated as solid by the caller.
    fn on_collision(&mut self, _response: &CollisionResponse) -> bool {
        false
    }
}

/// A node in the scene graph
pub struct Node {
    /// Position relative to the parent (screen space when floating)
    pub pos: Vec2,
    /// Extent used for visibility culling
    pub size: Vec2,
    /// Anchor as a fraction of size; (0, 0) means pos is the top-left
    pub anchor: Vec2,
    /// Draw-order layer; higher z draws on top
    pub z: f32,
    /// Insertion sequence, tie-breaks equal z. Assigned on attach.
    pub(crate) seq: u64,
    /// Floating nodes use screen coordinates and are always visible
    pub floating: bool,
    /// Update even when outside the viewport
    pub always_update: bool,
    /// Visibility as of the last graph update
    pub in_viewport: bool,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    /// Optional collision body
    pub body: Option<Body>,
    /// Optional attached behavior
    pub behavior: Option<Box<dyn Renderable>>,
    /// Free-form label used in logs
    pub name: String,
}

impl Node {
    /// Create a node at the given position and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            anchor: Vec2::zeros(),
            z: 0.0,
            seq: 0,
            floating: false,
            always_update: false,
            in_viewport: false,
            parent: None,
            children: Vec::new(),
            body: None,
            behavior: None,
            name: String::new(),
        }
    }

    /// Create a zero-sized grouping node. Grouping nodes are never
    /// culled, so their subtrees always update.
    pub fn group() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Set the draw-order layer
    #[must_use]
    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    /// Attach a collision body
    #[must_use]
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a behavior
    #[must_use]
    pub fn with_behavior(mut self, behavior: impl Renderable + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Set the log label
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark the node as floating (screen space, never culled)
    #[must_use]
    pub fn with_floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    /// Mark the node to update regardless of visibility
    #[must_use]
    pub fn with_always_update(mut self, always_update: bool) -> Self {
        self.always_update = always_update;
        self
    }

    /// Parent key, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Direct children in draw order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// True for zero-sized grouping nodes, which are exempt from
    /// viewport culling
    pub fn is_group(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Culling bounds from a given absolute position
    pub fn bounds_at(&self, abs: Vec2) -> Bounds {
        Bounds::from_rect(
            abs.x - self.anchor.x * self.size.x,
            abs.y - self.anchor.y * self.size.y,
            self.size.x,
            self.size.y,
        )
    }
}
