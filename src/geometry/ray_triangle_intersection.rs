use super::{
    BARYCENTRIC_EPSILON, BarycentricCoordinates, DEGENERATE_EPSILON, FloatType, HIT_EPSILON,
    PARALLEL_EPSILON, Ray, Triangle, WorldPoint, WorldVector,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray
    pub t: FloatType,
    pub uv: BarycentricCoordinates,
}

/// Intersects the ray with a triangle whose unit normal is precomputed.
///
/// First finds where the ray crosses the triangle's plane, then solves for the
/// barycentric coordinates of that point.
/// Rays parallel to the plane, hits closer than `HIT_EPSILON` and triangles without
/// area never intersect.
pub fn intersect_triangle(
    triangle: &Triangle<WorldPoint>,
    normal: &WorldVector,
    ray: &Ray,
) -> Option<TriangleHit> {
    let n_dot_d = normal.dot(&ray.direction);
    if n_dot_d.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = normal.dot(&(triangle[0] - ray.origin)) / n_dot_d;
    // Also rejects NaN
    if !(t >= HIT_EPSILON) {
        return None;
    }

    let [u, v] = triangle.edges();
    let w = ray.point_at(t) - triangle[0];

    let uu = u.dot(&u);
    let uv = u.dot(&v);
    let vv = v.dot(&v);
    let wu = w.dot(&u);
    let wv = w.dot(&v);

    let denominator = uv * uv - uu * vv;
    if !(denominator.abs() > DEGENERATE_EPSILON * uu * vv) {
        return None;
    }

    let s = (uv * wv - vv * wu) / denominator;
    let t_coord = (uv * wu - uu * wv) / denominator;

    if s >= -BARYCENTRIC_EPSILON
        && t_coord >= -BARYCENTRIC_EPSILON
        && s + t_coord <= 1.0 + BARYCENTRIC_EPSILON
    {
        Some(TriangleHit {
            t,
            uv: BarycentricCoordinates { s, t: t_coord },
        })
    } else {
        None
    }
}

impl Triangle<WorldPoint> {
    /// Ray intersection without a precomputed normal.
    pub fn intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        intersect_triangle(self, &self.unit_normal(), ray)
    }
}
