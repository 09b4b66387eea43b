//! Uniform-grid spatial hash
//!
//! The grid uses power-of-two cells so world coordinates map to cell
//! coordinates with an arithmetic shift. The hash is rebuilt every
//! frame: `clear()` once, then reinsert every collidable body. A bounds
//! spanning k×m cells is registered in all k×m buckets, so `retrieve`
//! may return the same key more than once; callers dedupe with a
//! per-frame generation stamp.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::physics::bounds::Bounds;
use crate::scene::NodeKey;

/// Broad-phase tuning knobs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BroadphaseConfig {
    /// Cell size as a power of two: cell edge = `1 << cell_shift`
    pub cell_shift: u32,
}

impl Default for BroadphaseConfig {
    fn default() -> Self {
        // 32-unit cells
        Self { cell_shift: 5 }
    }
}

/// Spatial hash over node keys
#[derive(Debug)]
pub struct SpatialHash {
    shift: u32,
    cells: HashMap<(i32, i32), Vec<NodeKey>>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(BroadphaseConfig::default())
    }
}

impl SpatialHash {
    /// Create an empty hash with the configured cell size
    pub fn new(config: BroadphaseConfig) -> Self {
        Self {
            shift: config.cell_shift,
            cells: HashMap::new(),
        }
    }

    /// Cell edge length in world units
    pub fn cell_size(&self) -> f32 {
        (1u32 << self.shift) as f32
    }

    /// Cell coordinate of a world coordinate (floor division by the
    /// cell size, correct for negatives)
    fn cell_coord(&self, v: f32) -> i32 {
        (v.floor() as i32) >> self.shift
    }

    /// Inclusive cell range covered by a bounds on both axes
    fn cell_range(&self, bounds: &Bounds) -> (i32, i32, i32, i32) {
        (
            self.cell_coord(bounds.left()),
            self.cell_coord(bounds.top()),
            self.cell_coord(bounds.right()),
            self.cell_coord(bounds.bottom()),
        )
    }

    /// Register a key in every cell its bounds touches.
    ///
    /// Non-finite bounds cannot be mapped to cells; they are skipped
    /// with a warning and the key is simply absent from this frame's
    /// broad phase.
    pub fn insert(&mut self, key: NodeKey, bounds: &Bounds) {
        if !bounds.is_finite() {
            warn!("skipping spatial insert of {key:?}: non-finite bounds {bounds:?}");
            return;
        }
        let (sx, sy, ex, ey) = self.cell_range(bounds);
        for cy in sy..=ey {
            for cx in sx..=ex {
                self.cells.entry((cx, cy)).or_default().push(key);
            }
        }
    }

    /// All keys whose cells intersect the given bounds. Duplicates are
    /// possible when a key spans several of the queried cells.
    pub fn retrieve(&self, bounds: &Bounds) -> Vec<NodeKey> {
        if !bounds.is_finite() {
            return Vec::new();
        }
        let (sx, sy, ex, ey) = self.cell_range(bounds);
        let mut result = Vec::new();
        for cy in sy..=ey {
            for cx in sx..=ex {
                if let Some(keys) = self.cells.get(&(cx, cy)) {
                    result.extend_from_slice(keys);
                }
            }
        }
        result
    }

    /// Every key currently registered, with duplicates
    pub fn retrieve_all(&self) -> Vec<NodeKey> {
        let mut result = Vec::new();
        for keys in self.cells.values() {
            result.extend_from_slice(keys);
        }
        result
    }

    /// Drop all registrations; called once per frame before reinsert
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of occupied buckets, for diagnostics
    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<NodeKey> {
        let mut map: SlotMap<NodeKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_40x40_body_spans_four_cells() {
        let mut hash = SpatialHash::default();
        let key = keys(1)[0];
        hash.insert(key, &Bounds::from_rect(0.0, 0.0, 40.0, 40.0));
        // 32-unit cells: the body covers (0,0), (1,0), (0,1), (1,1)
        assert_eq!(hash.bucket_count(), 4);
        for (cx, cy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let probe = Bounds::from_rect(cx as f32 * 32.0 + 1.0, cy as f32 * 32.0 + 1.0, 1.0, 1.0);
            assert_eq!(hash.retrieve(&probe), vec![key]);
        }
    }

    #[test]
    fn test_retrieve_has_no_false_negatives() {
        let mut hash = SpatialHash::default();
        let ks = keys(3);
        hash.insert(ks[0], &Bounds::from_rect(0.0, 0.0, 10.0, 10.0));
        hash.insert(ks[1], &Bounds::from_rect(100.0, 100.0, 10.0, 10.0));
        hash.insert(ks[2], &Bounds::from_rect(-50.0, -50.0, 10.0, 10.0));
        let hits = hash.retrieve(&Bounds::from_rect(-60.0, -60.0, 80.0, 80.0));
        assert!(hits.contains(&ks[0]));
        assert!(hits.contains(&ks[2]));
        assert!(!hits.contains(&ks[1]));
    }

    #[test]
    fn test_spanning_key_retrieved_multiple_times() {
        let mut hash = SpatialHash::default();
        let key = keys(1)[0];
        hash.insert(key, &Bounds::from_rect(0.0, 0.0, 40.0, 40.0));
        let hits = hash.retrieve(&Bounds::from_rect(0.0, 0.0, 40.0, 40.0));
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|k| *k == key));
    }

    #[test]
    fn test_negative_coordinates() {
        let mut hash = SpatialHash::default();
        let key = keys(1)[0];
        hash.insert(key, &Bounds::from_rect(-10.0, -10.0, 5.0, 5.0));
        let hits = hash.retrieve(&Bounds::from_rect(-20.0, -20.0, 15.0, 15.0));
        assert!(hits.contains(&key));
        let miss = hash.retrieve(&Bounds::from_rect(50.0, 50.0, 10.0, 10.0));
        assert!(miss.is_empty());
    }

    #[test]
    fn test_non_finite_bounds_are_skipped() {
        let mut hash = SpatialHash::default();
        let key = keys(1)[0];
        hash.insert(key, &Bounds::new());
        assert_eq!(hash.bucket_count(), 0);
        assert!(hash.retrieve_all().is_empty());
    }

    #[test]
    fn test_clear_empties_all_buckets() {
        let mut hash = SpatialHash::default();
        let key = keys(1)[0];
        hash.insert(key, &Bounds::from_rect(0.0, 0.0, 100.0, 100.0));
        assert!(hash.bucket_count() > 0);
        hash.clear();
        assert_eq!(hash.bucket_count(), 0);
    }
}
