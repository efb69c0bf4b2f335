mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

pub use aabb::AABB;
pub use ray_box_intersection::RayIntersectionExt;
pub use ray_triangle_intersection::{TriangleHit, intersect_triangle};
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f64;

pub type ScreenPoint = nalgebra::Point2<u32>;
pub type ScreenSize = nalgebra::Vector2<u32>;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

/// `|n·d|` below this counts as a ray parallel to the triangle plane.
pub const PARALLEL_EPSILON: FloatType = 16.0 * FloatType::EPSILON;

/// Hits closer than this to the ray origin are rejected, so that secondary rays
/// don't re-hit the surface they start on.
pub const HIT_EPSILON: FloatType = 1e-7;

/// Slack on the barycentric coordinates, keeps rays through shared edges from slipping
/// between neighboring triangles.
pub const BARYCENTRIC_EPSILON: FloatType = 1e-9;

/// Relative threshold for the zero-area test, compared against `uu * vv`.
pub const DEGENERATE_EPSILON: FloatType = 16.0 * FloatType::EPSILON;

/// Slack on the ray-box overlap test.
pub const BOX_EPSILON: FloatType = 1e-9;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    /// Creates a ray, normalizing the direction.
    /// A zero direction produces a ray that never hits anything.
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let direction = direction
            .try_normalize(FloatType::MIN_POSITIVE)
            .unwrap_or_else(WorldVector::zeros);
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }
}
