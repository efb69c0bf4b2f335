use std::ops::{Index, IndexMut};

use super::{FloatType, WorldPoint, WorldVector};

/// Three things, one per corner of a triangle.
/// Used both for vertex indices and for vertex positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.0.iter()
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> IndexMut<usize> for Triangle<Point> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Triangle<WorldPoint> {
    pub fn centroid(&self) -> WorldPoint {
        WorldPoint::from((self[0].coords + self[1].coords + self[2].coords) / 3.0)
    }

    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [WorldVector; 2] {
        [self[1] - self[0], self[2] - self[0]]
    }

    /// Returns a normal vector of the triangle, not normalized.
    /// Counter-clockwise winding seen from the side the normal points to.
    pub fn normal(&self) -> WorldVector {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }

    /// Unit normal, or a zero vector for triangles with no area.
    pub fn unit_normal(&self) -> WorldVector {
        self.normal()
            .try_normalize(FloatType::MIN_POSITIVE)
            .unwrap_or_else(WorldVector::zeros)
    }
}

/// Position within a triangle, relative to the two edges coming from the first vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates {
    pub s: FloatType,
    pub t: FloatType,
}

impl BarycentricCoordinates {
    pub fn interpolate(&self, triangle: &Triangle<WorldPoint>) -> WorldPoint {
        let [e1, e2] = triangle.edges();
        triangle[0] + e1 * self.s + e2 * self.t
    }
}
