//! Separating-axis narrow phase
//!
//! Pairwise shape tests producing a `CollisionResponse`. The dispatch
//! over shape pairs is an exhaustive match, so every combination of
//! `{Rect, Polygon, Ellipse}` is handled at compile time.
//!
//! Sign convention: on a hit, `response.overlap_v` is the translation
//! that moves the FIRST shape out of the collision when added to its
//! position. Swapping the arguments negates the vector.
//!
//! Ellipses are handled by scaling the test into unit-circle space
//! per-axis and mapping the translation back. For circles (`rx == ry`)
//! this is exact; for true ellipses the translation is a close
//! approximation along the scaled axis.

use crate::foundation::math::{Vec2, Vec2Ext};
use crate::physics::response::CollisionResponse;
use crate::physics::shapes::{Ellipse, Polygon, Rect, Shape};

/// Overlaps at or below this magnitude count as touching, not colliding
pub const COLLISION_EPSILON: f32 = 1e-6;

/// Project a point set onto an axis, returning the (min, max) interval
pub fn project_onto_axis(points: &[Vec2], axis: &Vec2) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for point in points {
        let dot = point.dot(axis);
        if dot < min {
            min = dot;
        }
        if dot > max {
            max = dot;
        }
    }
    (min, max)
}

/// Test one candidate axis. Returns true when the axis separates the
/// two point sets; otherwise records overlap and containment data in
/// the response.
///
/// Overlap tracking is strictly `<`, so on equal penetration the first
/// axis enumerated wins. Axes are enumerated in a fixed order (all of
/// A's normals, then all of B's), which makes tie-breaking
/// deterministic.
fn is_separating_axis(
    a_points: &[Vec2],
    b_points: &[Vec2],
    axis: &Vec2,
    response: &mut CollisionResponse,
) -> bool {
    let (a_min, a_max) = project_onto_axis(a_points, axis);
    let (b_min, b_max) = project_onto_axis(b_points, axis);
    if a_max < b_min || b_max < a_min {
        return true;
    }
    let overlap;
    if a_min < b_min {
        response.a_in_b = false;
        if a_max < b_max {
            overlap = a_max - b_min;
            response.b_in_a = false;
        } else {
            let option1 = a_max - b_min;
            let option2 = b_max - a_min;
            overlap = if option1 < option2 { option1 } else { -option2 };
        }
    } else {
        response.b_in_a = false;
        if a_max > b_max {
            overlap = a_min - b_max;
            response.a_in_b = false;
        } else {
            let option1 = a_max - b_min;
            let option2 = b_max - a_min;
            overlap = if option1 < option2 { option1 } else { -option2 };
        }
    }
    let abs_overlap = overlap.abs();
    if abs_overlap < response.overlap {
        response.overlap = abs_overlap;
        response.normal = if overlap < 0.0 { -*axis } else { *axis };
    }
    false
}

/// Unit outward normals of a world-space point loop
fn axes_of(points: &[Vec2]) -> Vec<Vec2> {
    let len = points.len();
    (0..len)
        .map(|i| {
            let edge = points[(i + 1) % len] - points[i];
            let normal = edge.perp_cw();
            let length = normal.norm();
            if length > 0.0 {
                normal / length
            } else {
                normal
            }
        })
        .collect()
}

/// Generic SAT test over two world-space point loops
fn test_points(
    a_points: &[Vec2],
    a_normals: &[Vec2],
    b_points: &[Vec2],
    b_normals: &[Vec2],
    response: &mut CollisionResponse,
) -> bool {
    for axis in a_normals {
        if is_separating_axis(a_points, b_points, axis, response) {
            return false;
        }
    }
    for axis in b_normals {
        if is_separating_axis(a_points, b_points, axis, response) {
            return false;
        }
    }
    // tracked normal points into the collision; flip it into the
    // exit-translation convention for the first shape
    response.normal = -response.normal;
    response.overlap_v = response.normal * response.overlap;
    true
}

/// Polygon vs polygon
pub fn test_polygon_polygon(a: &Polygon, b: &Polygon, response: &mut CollisionResponse) -> bool {
    test_points(
        &a.world_points(),
        a.normals(),
        &b.world_points(),
        b.normals(),
        response,
    )
}

/// Axis-aligned fast path for rect vs rect.
///
/// On equal penetration depth the x-axis is preferred, so symmetrical
/// corner overlaps always resolve horizontally.
pub fn test_rect_rect(a: &Rect, b: &Rect, response: &mut CollisionResponse) -> bool {
    let overlap_x = a.right().min(b.right()) - a.left().max(b.left());
    let overlap_y = a.bottom().min(b.bottom()) - a.top().max(b.top());
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return false;
    }
    response.a_in_b = b.contains_rect(a);
    response.b_in_a = a.contains_rect(b);
    if overlap_x <= overlap_y {
        let sign = if a.center().x < b.center().x { -1.0 } else { 1.0 };
        response.overlap = overlap_x;
        response.normal = Vec2::new(sign, 0.0);
    } else {
        let sign = if a.center().y < b.center().y { -1.0 } else { 1.0 };
        response.overlap = overlap_y;
        response.normal = Vec2::new(0.0, sign);
    }
    response.overlap_v = response.normal * response.overlap;
    true
}

#[derive(Debug, PartialEq, Eq)]
enum VoronoiRegion {
    Left,
    Middle,
    Right,
}

/// Classify which Voronoi region of a line segment a point falls in
fn voronoi_region(line: Vec2, point: Vec2) -> VoronoiRegion {
    let dp = point.dot(&line);
    if dp < 0.0 {
        VoronoiRegion::Left
    } else if dp > line.norm_squared() {
        VoronoiRegion::Right
    } else {
        VoronoiRegion::Middle
    }
}

/// Circle vs point loop, walking the Voronoi regions of each edge.
/// The result moves the point loop (the first operand) out of the
/// circle. `a_in_b` means "loop inside circle".
fn test_circle_points(
    points: &[Vec2],
    circle_pos: Vec2,
    radius: f32,
    response: &mut CollisionResponse,
) -> bool {
    let radius2 = radius * radius;
    let len = points.len();
    for i in 0..len {
        let next = (i + 1) % len;
        let prev = (i + len - 1) % len;
        let edge = points[next] - points[i];
        let point = circle_pos - points[i];
        if point.norm_squared() > radius2 {
            response.a_in_b = false;
        }
        let mut candidate: Option<(f32, Vec2)> = None;
        match voronoi_region(edge, point) {
            VoronoiRegion::Left => {
                // closest feature may be the previous vertex
                let prev_edge = points[i] - points[prev];
                let point2 = circle_pos - points[prev];
                if voronoi_region(prev_edge, point2) == VoronoiRegion::Right {
                    let dist = point.norm();
                    if dist > radius {
                        return false;
                    }
                    response.b_in_a = false;
                    let normal = if dist > 0.0 {
                        point / dist
                    } else {
                        Vec2::new(0.0, -1.0)
                    };
                    candidate = Some((radius - dist, normal));
                }
            }
            VoronoiRegion::Right => {
                // closest feature may be the next vertex
                let next_edge = points[(next + 1) % len] - points[next];
                let point2 = circle_pos - points[next];
                if voronoi_region(next_edge, point2) == VoronoiRegion::Left {
                    let dist = point2.norm();
                    if dist > radius {
                        return false;
                    }
                    response.b_in_a = false;
                    let normal = if dist > 0.0 {
                        point2 / dist
                    } else {
                        Vec2::new(0.0, -1.0)
                    };
                    candidate = Some((radius - dist, normal));
                }
            }
            VoronoiRegion::Middle => {
                let normal = edge.perp_cw();
                let length = normal.norm();
                let normal = if length > 0.0 { normal / length } else { normal };
                let dist = point.dot(&normal);
                if dist > 0.0 && dist.abs() > radius {
                    return false;
                }
                let overlap = radius - dist;
                if dist >= 0.0 || overlap < 2.0 * radius {
                    response.b_in_a = false;
                }
                candidate = Some((overlap, normal));
            }
        }
        if let Some((overlap, normal)) = candidate {
            if overlap.abs() < response.overlap.abs() {
                response.overlap = overlap;
                response.normal = normal;
            }
        }
    }
    if response.overlap == f32::MAX {
        return false;
    }
    response.normal = -response.normal;
    response.overlap_v = response.normal * response.overlap;
    true
}

/// Point loop vs ellipse, in unit-circle space.
///
/// The translation moves the point loop out of the ellipse.
pub fn test_points_ellipse(
    points: &[Vec2],
    ellipse: &Ellipse,
    response: &mut CollisionResponse,
) -> bool {
    let rx = ellipse.radius.x;
    let ry = ellipse.radius.y;
    let scaled: Vec<Vec2> = points.iter().map(|p| Vec2::new(p.x / rx, p.y / ry)).collect();
    let center = Vec2::new(ellipse.pos.x / rx, ellipse.pos.y / ry);
    if !test_circle_points(&scaled, center, 1.0, response) {
        return false;
    }
    // map the unit-space translation back into world space
    let v = Vec2::new(response.overlap_v.x * rx, response.overlap_v.y * ry);
    response.overlap = v.norm();
    response.normal = if response.overlap > 0.0 {
        v / response.overlap
    } else {
        Vec2::zeros()
    };
    response.overlap_v = v;
    true
}

/// Ellipse vs ellipse, scaled per-axis by the radius sums so the test
/// reduces to a point-in-unit-circle check. Exact for circle pairs.
pub fn test_ellipse_ellipse(a: &Ellipse, b: &Ellipse, response: &mut CollisionResponse) -> bool {
    let sx = a.radius.x + b.radius.x;
    let sy = a.radius.y + b.radius.y;
    let d = Vec2::new((b.pos.x - a.pos.x) / sx, (b.pos.y - a.pos.y) / sy);
    let dist = d.norm();
    if dist >= 1.0 {
        return false;
    }
    let dir = if dist > 0.0 { d / dist } else { Vec2::new(0.0, 1.0) };
    let depth = 1.0 - dist;
    let v = Vec2::new(-dir.x * depth * sx, -dir.y * depth * sy);
    response.overlap = v.norm();
    response.overlap_v = v;
    response.normal = if response.overlap > 0.0 {
        v / response.overlap
    } else {
        Vec2::zeros()
    };
    // conservative containment from the world-space center distance
    let world_dist = (b.pos - a.pos).norm();
    response.a_in_b = world_dist + a.radius.x.max(a.radius.y) <= b.radius.x.min(b.radius.y);
    response.b_in_a = world_dist + b.radius.x.max(b.radius.y) <= a.radius.x.min(a.radius.y);
    true
}

/// Flip a response to the other operand's point of view
fn swap_sides(response: &mut CollisionResponse) {
    *response = response.flipped();
}

/// Test two shapes, filling `response` on a hit.
///
/// Returns false for separated shapes and for overlaps at or below
/// `COLLISION_EPSILON` (touching). The response contents are undefined
/// when false is returned.
pub fn test(a: &Shape, b: &Shape, response: &mut CollisionResponse) -> bool {
    response.clear();
    let hit = match (a, b) {
        (Shape::Rect(ra), Shape::Rect(rb)) => test_rect_rect(ra, rb, response),
        (Shape::Rect(ra), Shape::Polygon(pb)) => {
            let a_points = ra.corner_points();
            test_points(
                &a_points,
                &axes_of(&a_points),
                &pb.world_points(),
                pb.normals(),
                response,
            )
        }
        (Shape::Polygon(pa), Shape::Rect(rb)) => {
            let b_points = rb.corner_points();
            test_points(
                &pa.world_points(),
                pa.normals(),
                &b_points,
                &axes_of(&b_points),
                response,
            )
        }
        (Shape::Polygon(pa), Shape::Polygon(pb)) => test_polygon_polygon(pa, pb, response),
        (Shape::Rect(ra), Shape::Ellipse(eb)) => {
            test_points_ellipse(&ra.corner_points(), eb, response)
        }
        (Shape::Polygon(pa), Shape::Ellipse(eb)) => {
            test_points_ellipse(&pa.world_points(), eb, response)
        }
        (Shape::Ellipse(ea), Shape::Rect(rb)) => {
            let hit = test_points_ellipse(&rb.corner_points(), ea, response);
            if hit {
                swap_sides(response);
            }
            hit
        }
        (Shape::Ellipse(ea), Shape::Polygon(pb)) => {
            let hit = test_points_ellipse(&pb.world_points(), ea, response);
            if hit {
                swap_sides(response);
            }
            hit
        }
        (Shape::Ellipse(ea), Shape::Ellipse(eb)) => test_ellipse_ellipse(ea, eb, response),
    };
    hit && response.overlap > COLLISION_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_offset_rects_resolve_along_x() {
        // symmetrical corner overlap prefers the x axis
        let a = Shape::Rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = Shape::Rect(Rect::new(50.0, 50.0, 100.0, 100.0));
        let mut response = CollisionResponse::new();
        assert!(test(&a, &b, &mut response));
        assert_relative_eq!(response.overlap, 50.0);
        assert_relative_eq!(response.x(), -50.0);
        assert_relative_eq!(response.y(), 0.0);
        assert!(!response.a_in_b);
        assert!(!response.b_in_a);
    }

    #[test]
    fn test_swapped_arguments_negate_the_response() {
        let a = Shape::Rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = Shape::Rect(Rect::new(50.0, 50.0, 100.0, 100.0));
        let mut ab = CollisionResponse::new();
        let mut ba = CollisionResponse::new();
        assert!(test(&a, &b, &mut ab));
        assert!(test(&b, &a, &mut ba));
        assert_relative_eq!(ab.x(), -ba.x());
        assert_relative_eq!(ab.y(), -ba.y());
    }

    #[test]
    fn test_polygon_symmetry() {
        let tri_a = Shape::Polygon(Polygon::new(
            0.0,
            0.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(40.0, 10.0),
                Vec2::new(10.0, 40.0),
            ],
        ));
        let tri_b = Shape::Polygon(Polygon::new(
            25.0,
            5.0,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(40.0, 10.0),
                Vec2::new(10.0, 40.0),
            ],
        ));
        let mut ab = CollisionResponse::new();
        let mut ba = CollisionResponse::new();
        assert!(test(&tri_a, &tri_b, &mut ab));
        assert!(test(&tri_b, &tri_a, &mut ba));
        assert_relative_eq!(ab.x(), -ba.x(), epsilon = 1e-4);
        assert_relative_eq!(ab.y(), -ba.y(), epsilon = 1e-4);
        assert_relative_eq!(ab.overlap, ba.overlap, epsilon = 1e-4);
    }

    #[test]
    fn test_touching_rects_do_not_collide() {
        let a = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Rect(Rect::new(10.0, 0.0, 10.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(!test(&a, &b, &mut response));
    }

    #[test]
    fn test_sub_epsilon_overlap_is_touching() {
        let a = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Rect(Rect::new(10.0 - 1e-7, 0.0, 10.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(!test(&a, &b, &mut response));
    }

    #[test]
    fn test_separated_rects() {
        let a = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::Rect(Rect::new(50.0, 50.0, 10.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(!test(&a, &b, &mut response));
    }

    #[test]
    fn test_contained_rect_sets_containment_flag() {
        let inner = Shape::Rect(Rect::new(40.0, 40.0, 20.0, 20.0));
        let outer = Shape::Rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut response = CollisionResponse::new();
        assert!(test(&inner, &outer, &mut response));
        assert!(response.a_in_b);
        assert!(!response.b_in_a);
    }

    #[test]
    fn test_rect_vs_circle_edge_overlap() {
        // circle above the square, overlapping its top edge by 5
        let square = Shape::Rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let circle = Shape::Ellipse(Ellipse::circle(10.0, -5.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(test(&square, &circle, &mut response));
        assert_relative_eq!(response.overlap, 5.0, epsilon = 1e-4);
        assert_relative_eq!(response.x(), 0.0, epsilon = 1e-4);
        assert_relative_eq!(response.y(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_circle_vs_rect_is_negated() {
        let square = Shape::Rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let circle = Shape::Ellipse(Ellipse::circle(10.0, -5.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(test(&circle, &square, &mut response));
        assert_relative_eq!(response.y(), -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_circle_outside_corner_region() {
        // near the corner but farther than the radius along the diagonal
        let square = Shape::Rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let circle = Shape::Ellipse(Ellipse::circle(-8.0, -8.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(!test(&square, &circle, &mut response));
    }

    #[test]
    fn test_circle_circle_overlap() {
        let a = Shape::Ellipse(Ellipse::circle(0.0, 0.0, 10.0));
        let b = Shape::Ellipse(Ellipse::circle(15.0, 0.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(test(&a, &b, &mut response));
        assert_relative_eq!(response.overlap, 5.0, epsilon = 1e-4);
        assert_relative_eq!(response.x(), -5.0, epsilon = 1e-4);
        assert_relative_eq!(response.y(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_separated_circles() {
        let a = Shape::Ellipse(Ellipse::circle(0.0, 0.0, 10.0));
        let b = Shape::Ellipse(Ellipse::circle(25.0, 0.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(!test(&a, &b, &mut response));
    }

    #[test]
    fn test_ellipse_uses_both_radii() {
        // wide, flat ellipse centered above the square: clears it
        // vertically even though the x extents overlap
        let square = Shape::Rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let flat = Shape::Ellipse(Ellipse::new(10.0, -8.0, 60.0, 10.0));
        let mut response = CollisionResponse::new();
        assert!(!test(&square, &flat, &mut response));

        // a circle with the same x radius would overlap
        let round = Shape::Ellipse(Ellipse::circle(10.0, -8.0, 30.0));
        assert!(test(&square, &round, &mut response));
    }
}
