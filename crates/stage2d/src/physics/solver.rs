//! Collision solver
//!
//! Drives the narrow phase from broad-phase candidates: AABB prefilter,
//! type/mask filter, SAT dispatch, then a synchronous `on_collision`
//! callback on the other body's owner. A generation stamp per node pair
//! guarantees at most one callback per pair per frame, even when the
//! spatial hash returns a candidate several times or both parties query
//! in the same frame.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::physics::body::Body;
use crate::physics::collision_layers::{should_collide, CollisionType};
use crate::physics::response::CollisionResponse;
use crate::physics::sat;
use crate::scene::{NodeKey, SceneGraph};
use crate::spatial::SpatialHash;

/// Narrow-phase driver with per-frame pair dedupe
#[derive(Debug, Default)]
pub struct Solver {
    generation: u64,
    fired: HashMap<(NodeKey, NodeKey), u64>,
}

impl Solver {
    /// Create a solver
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: previous pair stamps expire
    pub fn begin_frame(&mut self) {
        self.generation += 1;
        // stale stamps accumulate across despawns; prune occasionally
        if self.fired.len() > 4096 {
            let current = self.generation;
            self.fired.retain(|_, g| *g + 1 >= current);
        }
    }

    /// Test one node's body against everything its collision mask
    /// allows. See [`Solver::collide_type`].
    pub fn collide(
        &mut self,
        graph: &mut SceneGraph,
        broadphase: &SpatialHash,
        key: NodeKey,
        multiple: bool,
    ) -> Vec<CollisionResponse> {
        self.collide_type(graph, broadphase, key, CollisionType::ALL, multiple)
    }

    /// Test one node's body against candidates of the given collision
    /// type.
    ///
    /// Candidates come from the spatial hash; when the hash is empty
    /// (broad phase not built this frame) every body in the graph is
    /// scanned instead. Responses are returned in scan order: with
    /// `multiple` false the first hit in scan order is returned, not
    /// the nearest. Each hit fires `on_collision` on the other node's
    /// behavior before this function returns, at most once per node
    /// pair per frame.
    pub fn collide_type(
        &mut self,
        graph: &mut SceneGraph,
        broadphase: &SpatialHash,
        key: NodeKey,
        type_filter: CollisionType,
        multiple: bool,
    ) -> Vec<CollisionResponse> {
        let mut results = Vec::new();
        let Some(a_body) = graph.node(key).and_then(|n| n.body.clone()) else {
            return results;
        };
        let a_bounds = a_body.bounds();
        if !a_bounds.is_finite() {
            return results;
        }

        let candidates = if broadphase.bucket_count() > 0 {
            broadphase.retrieve(&a_bounds)
        } else {
            graph
                .iter()
                .filter(|(_, node)| node.body.is_some())
                .map(|(k, _)| k)
                .collect()
        };

        let mut seen: HashSet<NodeKey> = HashSet::new();
        for other_key in candidates {
            if other_key == key || !seen.insert(other_key) {
                continue;
            }
            let Some(other_body) = graph.node(other_key).and_then(|n| n.body.clone()) else {
                continue;
            };
            if !other_body.collision_type.intersects(type_filter) {
                continue;
            }
            if a_body.is_static && other_body.is_static {
                continue;
            }
            if !should_collide(
                a_body.collision_type,
                a_body.collision_mask,
                other_body.collision_type,
                other_body.collision_mask,
            ) {
                continue;
            }
            if !a_bounds.overlaps(&other_body.bounds()) {
                continue;
            }

            let mut response = CollisionResponse::new();
            if !test_bodies(&a_body, &other_body, &mut response) {
                continue;
            }
            response.other = Some(other_key);
            response.collision_type = other_body.collision_type;
            debug!(
                "collision {key:?} -> {other_key:?} overlap {:.3} along ({:.2}, {:.2})",
                response.overlap, response.normal.x, response.normal.y
            );

            if self.stamp(key, other_key) {
                // notify the other party, from its own point of view
                let mut notification = response.flipped();
                notification.other = Some(key);
                notification.collision_type = a_body.collision_type;
                if let Some(mut behavior) =
                    graph.node_mut(other_key).and_then(|n| n.behavior.take())
                {
                    behavior.on_collision(&notification);
                    if let Some(node) = graph.node_mut(other_key) {
                        node.behavior = Some(behavior);
                    }
                }
            }

            results.push(response);
            if !multiple {
                break;
            }
        }
        results
    }

    /// Stamp a pair for this frame; true when it was not yet stamped
    fn stamp(&mut self, a: NodeKey, b: NodeKey) -> bool {
        let pair = if a < b { (a, b) } else { (b, a) };
        self.fired.insert(pair, self.generation) != Some(self.generation)
    }
}

/// Narrow-phase test across two bodies' shape lists, first hit in scan
/// order wins
fn test_bodies(a: &Body, b: &Body, response: &mut CollisionResponse) -> bool {
    for i in 0..a.shape_count() {
        let Some(shape_a) = a.world_shape(i) else { continue };
        for j in 0..b.shape_count() {
            let Some(shape_b) = b.world_shape(j) else { continue };
            if sat::test(&shape_a, &shape_b, response) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shapes::Rect;
    use crate::scene::{Node, Renderable};
    use crate::spatial::BroadphaseConfig;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct HitCounter {
        hits: Rc<RefCell<Vec<CollisionResponse>>>,
    }

    impl Renderable for HitCounter {
        fn on_collision(&mut self, response: &CollisionResponse) -> bool {
            self.hits.borrow_mut().push(response.clone());
            true
        }
    }

    fn body_at(x: f32, y: f32, w: f32, h: f32) -> Body {
        let mut body = Body::from_shape(Rect::new(0.0, 0.0, w, h));
        body.set_pos(x, y);
        body
    }

    fn build_hash(graph: &SceneGraph) -> SpatialHash {
        let mut hash = SpatialHash::new(BroadphaseConfig::default());
        for (key, node) in graph.iter() {
            if let Some(body) = &node.body {
                hash.insert(key, &body.bounds());
            }
        }
        hash
    }

    #[test]
    fn test_collide_returns_first_hit_and_fires_callback() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mover = graph.spawn(
            Node::new(0.0, 0.0, 100.0, 100.0).with_body(body_at(0.0, 0.0, 100.0, 100.0)),
        );
        let wall = graph.spawn(
            Node::new(50.0, 50.0, 100.0, 100.0)
                .with_body(body_at(50.0, 50.0, 100.0, 100.0))
                .with_behavior(HitCounter {
                    hits: Rc::clone(&hits),
                }),
        );
        graph.add_child(root, mover).unwrap();
        graph.add_child(root, wall).unwrap();

        let hash = build_hash(&graph);
        let mut solver = Solver::new();
        solver.begin_frame();
        let responses = solver.collide(&mut graph, &hash, mover, false);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].other, Some(wall));
        assert_relative_eq!(responses[0].x(), -50.0);
        assert_relative_eq!(responses[0].y(), 0.0);

        // the wall was notified, from its own point of view
        let hits = hits.borrow();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, Some(mover));
        assert_relative_eq!(hits[0].x(), 50.0);
    }

    #[test]
    fn test_duplicate_candidates_fire_one_callback_per_frame() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let hits = Rc::new(RefCell::new(Vec::new()));
        // 40x40 bodies span four hash cells each, so retrieval yields
        // the partner several times
        let a = graph.spawn(
            Node::new(0.0, 0.0, 40.0, 40.0).with_body(body_at(0.0, 0.0, 40.0, 40.0)),
        );
        let b = graph.spawn(
            Node::new(20.0, 20.0, 40.0, 40.0)
                .with_body(body_at(20.0, 20.0, 40.0, 40.0))
                .with_behavior(HitCounter {
                    hits: Rc::clone(&hits),
                }),
        );
        graph.add_child(root, a).unwrap();
        graph.add_child(root, b).unwrap();

        let hash = build_hash(&graph);
        let mut solver = Solver::new();
        solver.begin_frame();
        let responses = solver.collide(&mut graph, &hash, a, true);
        assert_eq!(responses.len(), 1);
        assert_eq!(hits.borrow().len(), 1);

        // same frame, reverse query: pair already stamped
        solver.collide(&mut graph, &hash, b, true);
        assert_eq!(hits.borrow().len(), 1);

        // next frame fires again
        solver.begin_frame();
        solver.collide(&mut graph, &hash, a, true);
        assert_eq!(hits.borrow().len(), 2);
    }

    #[test]
    fn test_multiple_returns_all_hits_in_scan_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let mover = graph.spawn(
            Node::new(0.0, 0.0, 100.0, 100.0).with_body(body_at(0.0, 0.0, 100.0, 100.0)),
        );
        let near = graph.spawn(
            Node::new(50.0, 0.0, 100.0, 100.0).with_body(body_at(50.0, 0.0, 100.0, 100.0)),
        );
        let far = graph.spawn(
            Node::new(0.0, 80.0, 100.0, 100.0).with_body(body_at(0.0, 80.0, 100.0, 100.0)),
        );
        graph.add_child(root, mover).unwrap();
        graph.add_child(root, near).unwrap();
        graph.add_child(root, far).unwrap();

        let hash = build_hash(&graph);
        let mut solver = Solver::new();
        solver.begin_frame();
        let all = solver.collide(&mut graph, &hash, mover, true);
        assert_eq!(all.len(), 2);
        let single = solver.collide(&mut graph, &hash, mover, false);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_type_filter_and_mask() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let mut player = body_at(0.0, 0.0, 50.0, 50.0);
        player.collision_type = CollisionType::PLAYER_OBJECT;
        player.collision_mask = CollisionType::WORLD_SHAPE;
        let mut world_body = body_at(25.0, 0.0, 50.0, 50.0);
        world_body.collision_type = CollisionType::WORLD_SHAPE;
        let mut loot = body_at(0.0, 25.0, 50.0, 50.0);
        loot.collision_type = CollisionType::COLLECTABLE_OBJECT;

        let p = graph.spawn(Node::new(0.0, 0.0, 50.0, 50.0).with_body(player));
        let w = graph.spawn(Node::new(25.0, 0.0, 50.0, 50.0).with_body(world_body));
        let l = graph.spawn(Node::new(0.0, 25.0, 50.0, 50.0).with_body(loot));
        for key in [p, w, l] {
            graph.add_child(root, key).unwrap();
        }

        let hash = build_hash(&graph);
        let mut solver = Solver::new();
        solver.begin_frame();
        // the mask already excludes the collectable
        let hits = solver.collide(&mut graph, &hash, p, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, Some(w));
        // an explicit filter narrows further
        solver.begin_frame();
        let none = solver.collide_type(
            &mut graph,
            &hash,
            p,
            CollisionType::ENEMY_OBJECT,
            true,
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_static_pairs_are_skipped() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let mut a_body = body_at(0.0, 0.0, 50.0, 50.0);
        a_body.is_static = true;
        let mut b_body = body_at(25.0, 0.0, 50.0, 50.0);
        b_body.is_static = true;
        let a = graph.spawn(Node::new(0.0, 0.0, 50.0, 50.0).with_body(a_body));
        let b = graph.spawn(Node::new(25.0, 0.0, 50.0, 50.0).with_body(b_body));
        graph.add_child(root, a).unwrap();
        graph.add_child(root, b).unwrap();

        let hash = build_hash(&graph);
        let mut solver = Solver::new();
        solver.begin_frame();
        assert!(solver.collide(&mut graph, &hash, a, true).is_empty());
    }

    #[test]
    fn test_empty_broadphase_falls_back_to_full_scan() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.spawn(
            Node::new(0.0, 0.0, 100.0, 100.0).with_body(body_at(0.0, 0.0, 100.0, 100.0)),
        );
        let b = graph.spawn(
            Node::new(50.0, 50.0, 100.0, 100.0).with_body(body_at(50.0, 50.0, 100.0, 100.0)),
        );
        graph.add_child(root, a).unwrap();
        graph.add_child(root, b).unwrap();

        let empty = SpatialHash::new(BroadphaseConfig::default());
        let mut solver = Solver::new();
        solver.begin_frame();
        let hits = solver.collide(&mut graph, &empty, a, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, Some(b));
    }
}
