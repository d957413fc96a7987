//! Exact triangle / axis-aligned box overlap test
//!
//! Full separating-axis implementation: the three box face normals, the
//! triangle face normal, and the nine cross products of triangle edges with
//! the box axes. Bounding-box rejection alone under-rejects and would drop
//! triangles at octant boundaries.
//!
//! Zero separation counts as overlapping: a triangle touching a box face or
//! corner is inside both neighboring octants, so subdivision never opens a
//! gap in coverage.

use crate::aabb::Aabb;
use glam::Vec3;

/// True iff the triangle and the closed box share at least one point.
pub fn triangle_box_overlap(aabb: &Aabb, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    tri_box_overlap(aabb.center(), aabb.half_size(), [v0, v1, v2])
}

/// Separating-axis test against a box given as center and half extents.
fn tri_box_overlap(center: Vec3, half: Vec3, triangle: [Vec3; 3]) -> bool {
    // Work in box-local coordinates.
    let v0 = triangle[0] - center;
    let v1 = triangle[1] - center;
    let v2 = triangle[2] - center;

    // Box face normals: compare the triangle's extent per axis.
    let tri_min = v0.min(v1).min(v2);
    let tri_max = v0.max(v1).max(v2);
    if tri_min.cmpgt(half).any() || tri_max.cmplt(-half).any() {
        return false;
    }

    // Nine cross-product axes (box axis x triangle edge). A degenerate
    // cross projects everything to zero and rejects nothing.
    let edges = [v1 - v0, v2 - v1, v0 - v2];
    for edge in edges {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            if separates(axis.cross(edge), half, v0, v1, v2) {
                return false;
            }
        }
    }

    // Triangle plane vs. box.
    let normal = edges[0].cross(edges[1]);
    plane_box_overlap(normal, v0, half)
}

/// True when `axis` strictly separates the triangle from the box.
#[inline]
fn separates(axis: Vec3, half: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let p0 = axis.dot(v0);
    let p1 = axis.dot(v1);
    let p2 = axis.dot(v2);
    let radius = half.dot(axis.abs());
    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}

/// True when the plane with `normal` through `point` cuts the origin-centered
/// box with the given half extents.
fn plane_box_overlap(normal: Vec3, point: Vec3, half: Vec3) -> bool {
    // Box diagonal endpoints most and least aligned with the normal.
    let signed = Vec3::new(
        half.x.copysign(normal.x),
        half.y.copysign(normal.y),
        half.z.copysign(normal.z),
    );
    let vmin = -signed - point;
    let vmax = signed - point;

    if normal.dot(vmin) > 0.0 {
        return false;
    }
    normal.dot(vmax) >= 0.0
}
