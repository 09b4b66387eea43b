//! Convex polygon shape
//!
//! Points are stored relative to `pos`. Edges and unit normals are
//! derived data, recomputed by `recalc()` after every mutation of the
//! point set. Clockwise winding (y-down) and convexity are documented
//! preconditions of the narrow phase; they are checkable via
//! `is_convex()` but not enforced at runtime.

use log::warn;
use nalgebra::Vector3;

use crate::foundation::math::{Mat3, Vec2, Vec2Ext};
use crate::physics::bounds::Bounds;

/// Convex polygon defined by an ordered point list
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Origin of the polygon; points are relative to this
    pub pos: Vec2,
    points: Vec<Vec2>,
    edges: Vec<Vec2>,
    normals: Vec<Vec2>,
    local_bounds: Bounds,
}

impl Polygon {
    /// Create a polygon at the given position from relative points
    pub fn new(x: f32, y: f32, points: Vec<Vec2>) -> Self {
        if points.len() < 3 {
            warn!("polygon created with {} points, need at least 3", points.len());
        }
        let mut polygon = Self {
            pos: Vec2::new(x, y),
            points,
            edges: Vec::new(),
            normals: Vec::new(),
            local_bounds: Bounds::new(),
        };
        polygon.recalc();
        polygon
    }

    /// Points relative to `pos`
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Edge vectors, one per point (edge i runs from point i to point i+1)
    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    /// Unit outward normals, one per edge
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Replace the point set and recompute derived data
    pub fn set_points(&mut self, points: Vec<Vec2>) {
        self.points = points;
        self.recalc();
    }

    /// Recompute edges, normals and the cached local bounds from the
    /// current point set. Called by every mutator.
    fn recalc(&mut self) {
        let len = self.points.len();
        self.edges.clear();
        self.normals.clear();
        for i in 0..len {
            let edge = self.points[(i + 1) % len] - self.points[i];
            self.edges.push(edge);
            let normal = edge.perp_cw();
            let length = normal.norm();
            if length > 0.0 {
                self.normals.push(normal / length);
            } else {
                self.normals.push(normal);
            }
        }
        self.local_bounds.update(&self.points);
    }

    /// Axis-aligned bounds in world space
    pub fn bounds(&self) -> Bounds {
        let mut bounds = self.local_bounds;
        bounds.translate(self.pos.x, self.pos.y);
        bounds
    }

    /// World-space points (each local point offset by `pos`)
    pub fn world_points(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p + self.pos).collect()
    }

    /// Point containment via ray crossing (odd-even rule)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let lx = x - self.pos.x;
        let ly = y - self.pos.y;
        let mut inside = false;
        let len = self.points.len();
        let mut j = len.wrapping_sub(1);
        for i in 0..len {
            let pi = self.points[i];
            let pj = self.points[j];
            if ((pi.y > ly) != (pj.y > ly))
                && (lx < (pj.x - pi.x) * (ly - pi.y) / (pj.y - pi.y) + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Returns true if the point set forms a convex polygon.
    ///
    /// Checks that all cross products between consecutive edges share a
    /// sign. Useful as a debug assertion before handing a polygon to the
    /// narrow phase.
    pub fn is_convex(&self) -> bool {
        let len = self.points.len();
        if len < 3 {
            return false;
        }
        let mut sign = 0.0_f32;
        for i in 0..len {
            let a = self.edges[i];
            let b = self.edges[(i + 1) % len];
            let cross = a.x * b.y - a.y * b.x;
            if cross != 0.0 {
                if sign != 0.0 && (cross > 0.0) != (sign > 0.0) {
                    return false;
                }
                sign = cross;
            }
        }
        true
    }

    /// Rotate the points around the local origin (or a given pivot)
    pub fn rotate(&mut self, angle: f32, pivot: Option<Vec2>) {
        let pivot = pivot.unwrap_or_else(Vec2::zeros);
        for point in &mut self.points {
            let rel = *point - pivot;
            *point = rel.rotated(angle) + pivot;
        }
        self.recalc();
    }

    /// Scale the points relative to the local origin
    pub fn scale(&mut self, sx: f32, sy: f32) {
        for point in &mut self.points {
            point.x *= sx;
            point.y *= sy;
        }
        self.recalc();
    }

    /// Apply an affine transform to every point and recompute derived data
    pub fn transform(&mut self, matrix: &Mat3) {
        for point in &mut self.points {
            let mapped = matrix * Vector3::new(point.x, point.y, 1.0);
            *point = Vec2::new(mapped.x, mapped.y);
        }
        self.recalc();
    }

    /// Translate the polygon by the given delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
    }

    /// Move the polygon to the given position
    pub fn shift(&mut self, x: f32, y: f32) {
        self.pos.x = x;
        self.pos.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Ten-point star used across the reference test suites
    fn star() -> Polygon {
        Polygon::new(
            0.0,
            0.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(28.0, 60.0),
                Vec2::new(94.0, 70.0),
                Vec2::new(46.0, 114.0),
                Vec2::new(88.0, 180.0),
                Vec2::new(0.0, 125.0),
                Vec2::new(-88.0, 180.0),
                Vec2::new(-46.0, 114.0),
                Vec2::new(-94.0, 70.0),
                Vec2::new(-28.0, 60.0),
            ],
        )
    }

    #[test]
    fn test_star_bounds() {
        let bounds = star().bounds();
        assert_relative_eq!(bounds.x(), -94.0);
        assert_relative_eq!(bounds.y(), 0.0);
        assert_relative_eq!(bounds.width(), 188.0);
        assert_relative_eq!(bounds.height(), 180.0);
    }

    #[test]
    fn test_star_bounds_follow_translation() {
        let mut poly = star();
        poly.translate(100.0, 200.0);
        let bounds = poly.bounds();
        assert_relative_eq!(bounds.x(), 6.0);
        assert_relative_eq!(bounds.y(), 200.0);
        assert_relative_eq!(bounds.width(), 188.0);
        assert_relative_eq!(bounds.height(), 180.0);
    }

    #[test]
    fn test_contains() {
        let poly = star();
        assert!(poly.contains(0.0, 100.0));
        assert!(!poly.contains(0.0, -10.0));
        assert!(!poly.contains(93.0, 180.0));
    }

    #[test]
    fn test_star_is_not_convex() {
        assert!(!star().is_convex());
    }

    #[test]
    fn test_triangle_is_convex() {
        let tri = Polygon::new(
            0.0,
            0.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(5.0, 10.0),
            ],
        );
        assert!(tri.is_convex());
    }

    #[test]
    fn test_normals_are_unit_length() {
        let tri = Polygon::new(
            0.0,
            0.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(5.0, 10.0),
            ],
        );
        for normal in tri.normals() {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_transform_recomputes_bounds() {
        let mut tri = Polygon::new(
            0.0,
            0.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(5.0, 10.0),
            ],
        );
        // Quarter turn plus a (3, 4) translation.
        let matrix = Mat3::new(
            0.0, -1.0, 3.0, //
            1.0, 0.0, 4.0, //
            0.0, 0.0, 1.0,
        );
        tri.transform(&matrix);
        let bounds = tri.bounds();
        assert_relative_eq!(bounds.x(), -7.0);
        assert_relative_eq!(bounds.y(), 4.0);
        assert_relative_eq!(bounds.width(), 10.0);
        assert_relative_eq!(bounds.height(), 10.0);
    }

    #[test]
    fn test_scale_recomputes_bounds() {
        let mut poly = star();
        poly.scale(2.0, 0.5);
        let bounds = poly.bounds();
        assert_relative_eq!(bounds.width(), 376.0);
        assert_relative_eq!(bounds.height(), 90.0);
    }
}
