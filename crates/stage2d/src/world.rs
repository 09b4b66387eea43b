//! The world: explicit top-level context object
//!
//! Owns the scene graph, broad phase, solver, viewport and frame timer.
//! There are no module-level globals; everything is passed down
//! explicitly from here.

use crate::config::EngineConfig;
use crate::foundation::time::Timer;
use crate::physics::collision_layers::CollisionType;
use crate::physics::response::CollisionResponse;
use crate::physics::solver::Solver;
use crate::scene::{NodeKey, Renderer, SceneGraph, Viewport};
use crate::spatial::SpatialHash;

/// Engine-core context: scene, physics and timing under one owner
pub struct World {
    /// The scene tree
    pub graph: SceneGraph,
    /// The camera window
    pub viewport: Viewport,
    broadphase: SpatialHash,
    solver: Solver,
    timer: Timer,
    config: EngineConfig,
    needs_redraw: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl World {
    /// Build a world from a configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            graph: SceneGraph::new(),
            viewport: Viewport::new(0.0, 0.0, config.viewport.width, config.viewport.height),
            broadphase: SpatialHash::new(config.broadphase),
            solver: Solver::new(),
            timer: Timer::new(),
            config,
            needs_redraw: true,
        }
    }

    /// Advance one frame: update the scene tree, re-derive body
    /// positions from the tree, and rebuild the broad phase. Returns
    /// true when anything reported a visible change.
    pub fn update(&mut self, dt: f32) -> bool {
        self.timer.update();
        self.solver.begin_frame();
        let dirty = self.graph.update(dt, &self.viewport);
        self.sync_bodies();
        self.rebuild_broadphase();
        self.needs_redraw |= dirty;
        dirty
    }

    /// Draw the scene in z order. Skipped entirely while no update has
    /// reported a change since the last draw.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        if !self.needs_redraw {
            return;
        }
        self.graph.draw(renderer, &self.viewport);
        self.needs_redraw = false;
    }

    /// Force the next `draw` call to run
    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Collision query for one node; see [`Solver::collide_type`]
    pub fn collide(&mut self, key: NodeKey, multiple: bool) -> Vec<CollisionResponse> {
        self.solver
            .collide(&mut self.graph, &self.broadphase, key, multiple)
    }

    /// Collision query restricted to a collision type
    pub fn collide_type(
        &mut self,
        key: NodeKey,
        type_filter: CollisionType,
        multiple: bool,
    ) -> Vec<CollisionResponse> {
        self.solver
            .collide_type(&mut self.graph, &self.broadphase, key, type_filter, multiple)
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Broad-phase index, rebuilt by `update`
    pub fn broadphase(&self) -> &SpatialHash {
        &self.broadphase
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Copy each body's world position from its owning node's absolute
    /// position
    fn sync_bodies(&mut self) {
        let keys: Vec<NodeKey> = self
            .graph
            .iter()
            .filter(|(_, node)| node.body.is_some())
            .map(|(key, _)| key)
            .collect();
        for key in keys {
            let abs = self.graph.absolute_pos(key);
            if let Some(body) = self.graph.node_mut(key).and_then(|n| n.body.as_mut()) {
                body.set_pos(abs.x, abs.y);
            }
        }
    }

    /// Per-frame broad-phase rebuild: clear, then reinsert every body
    fn rebuild_broadphase(&mut self) {
        self.broadphase.clear();
        for (key, node) in self.graph.iter() {
            if let Some(body) = &node.body {
                self.broadphase.insert(key, &body.bounds());
            }
        }
    }
}
