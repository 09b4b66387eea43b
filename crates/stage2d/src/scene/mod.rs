//! Scene graph: arena-backed node tree with deferred structural edits
//!
//! Nodes live in a slotmap arena and reference each other by key, so
//! behaviors can (indirectly) mutate the graph while it is being
//! traversed: structural edits requested mid-traversal are queued and
//! applied when the traversal finishes.

mod graph;
mod node;
mod viewport;

pub use graph::{SceneGraph, UpdateContext};
pub use node::{Node, Renderable, Renderer};
pub use viewport::Viewport;

use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Stable handle to a scene node
    pub struct NodeKey;
}

/// Scene-graph usage errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced node is not in the arena (stale key)
    #[error("no such node: {0:?}")]
    NoSuchNode(NodeKey),
    /// The node is not a child of the given parent
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The node that was expected to be a child
        child: NodeKey,
        /// The parent it was looked up under
        parent: NodeKey,
    },
    /// A positional child access past the end of the child list
    #[error("child index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current child count
        len: usize,
    },
}
