//! Broad-phase spatial indexing

mod spatial_hash;

pub use spatial_hash::{BroadphaseConfig, SpatialHash};
