use std::ops::Sub;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Scalar};
use num_traits::One;

use super::{FloatType, WorldBox, WorldPoint};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> AABB<Point2> {
        AABB {
            min: f(&self.min),
            max: f(&self.max),
        }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl WorldBox {
    /// Smallest box containing all the points, `None` if there are no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(WorldBox::new(first, first), |b, p| WorldBox {
            min: b.min.inf(p),
            max: b.max.sup(p),
        }))
    }

    /// Sub-box in the octant given by `octant` bits (bit 0 = x, bit 1 = y, bit 2 = z),
    /// when the box is split at `split`.
    /// A set bit selects the part above the split point.
    pub fn octant(&self, split: &WorldPoint, octant: usize) -> WorldBox {
        let mut ret = self.clone();
        for axis in 0..3 {
            if octant & (1 << axis) != 0 {
                ret.min[axis] = split[axis];
            } else {
                ret.max[axis] = split[axis];
            }
        }
        ret
    }

    /// Returns the point clamped into the box.
    pub fn clamp(&self, p: &WorldPoint) -> WorldPoint {
        p.sup(&self.min).inf(&self.max)
    }

    pub fn contains(&self, p: &WorldPoint) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    pub fn largest_extent(&self) -> FloatType {
        self.size().max()
    }
}

impl<Point> From<[Point; 2]> for AABB<Point> {
    fn from(value: [Point; 2]) -> Self {
        let [min, max] = value;
        AABB { min, max }
    }
}
