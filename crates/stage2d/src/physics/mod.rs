//! Collision primitives and the narrow phase
//!
//! Bounds and shapes feed the separating-axis tests in [`sat`]; the
//! [`solver`] drives them from broad-phase candidates and dispatches
//! responses to node behaviors.

pub mod body;
pub mod bounds;
pub mod collision_layers;
pub mod response;
pub mod sat;
pub mod shapes;
pub mod solver;

pub use body::Body;
pub use bounds::Bounds;
pub use collision_layers::{should_collide, CollisionType};
pub use response::CollisionResponse;
pub use shapes::{Ellipse, Polygon, Rect, Shape};
