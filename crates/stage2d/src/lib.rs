//! # stage2d
//!
//! A 2D scene-graph and collision engine core.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed node tree with z-ordered traversal
//!   and structural edits that are safe mid-update
//! - **Broad Phase**: Power-of-two spatial hash, rebuilt per frame
//! - **Narrow Phase**: Separating-axis tests over rects, convex
//!   polygons and ellipses
//! - **Solver**: Candidate filtering, pair dedupe and synchronous
//!   collision callbacks
//! - **Headless**: Drawing goes through a `Renderer` trait; the core
//!   never touches a backend
//!
//! ## Quick Start
//!
//! ```rust
//! use stage2d::prelude::*;
//!
//! let mut world = World::new(EngineConfig::default());
//! let root = world.graph.root();
//!
//! let player = world.graph.spawn(
//!     Node::new(10.0, 10.0, 40.0, 40.0)
//!         .with_body(Body::from_shape(Rect::new(0.0, 0.0, 40.0, 40.0))),
//! );
//! world.graph.add_child(root, player).unwrap();
//!
//! world.update(1.0 / 60.0);
//! for response in world.collide(player, true) {
//!     // push the player out of whatever it hit
//!     let node = world.graph.node_mut(player).unwrap();
//!     node.pos.x += response.x();
//!     node.pos.y += response.y();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod spatial;

mod world;

pub use world::World;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig},
        foundation::{
            math::{Vec2, Vec2Ext},
            time::Timer,
        },
        physics::{
            should_collide, Body, Bounds, CollisionResponse, CollisionType, Ellipse, Polygon,
            Rect, Shape,
        },
        scene::{Node, NodeKey, Renderable, Renderer, SceneError, SceneGraph, UpdateContext,
            Viewport},
        spatial::{BroadphaseConfig, SpatialHash},
        World,
    };
}
