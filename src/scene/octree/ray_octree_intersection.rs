use std::cmp::Reverse;

use arrayvec::ArrayVec;
use assert2::debug_assert;
use ordered_float::OrderedFloat;

use crate::{
    geometry::{BarycentricCoordinates, FloatType, Ray, RayIntersectionExt as _},
    scene::FaceIdx,
};

use super::{NodeIdx, Octree};

/// Traversal stack, kept around between queries to avoid reallocating.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
pub struct StackCache {
    stack: Vec<(NodeIdx, FloatType)>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OctreeHit {
    pub face: FaceIdx,
    /// Distance along the ray
    pub t: FloatType,
    pub uv: BarycentricCoordinates,
}

impl Octree<'_> {
    /// Closest face hit by the ray.
    pub fn nearest_intersect(&self, ray: &Ray) -> Option<OctreeHit> {
        self.nearest_intersect_within(ray, FloatType::INFINITY, &mut StackCache::default())
    }

    /// Closest face hit by the ray strictly closer than `max_t`.
    pub fn nearest_intersect_within(
        &self,
        ray: &Ray,
        max_t: FloatType,
        cache: &mut StackCache,
    ) -> Option<OctreeHit> {
        debug_assert!(cache.stack.is_empty());

        let mut best: Option<OctreeHit> = None;
        let mut best_t = max_t;

        let root = self.root();
        if let Some(t) = self.nodes[root].bounds.penetration(ray, best_t) {
            cache.stack.push((root, t));
        }

        while let Some((index, entry_t)) = cache.stack.pop() {
            if entry_t > best_t {
                // The whole node is further away than the best hit found so far
                continue;
            }

            let node = &self.nodes[index];

            for &face in &node.faces {
                if let Some(hit) = self
                    .scene
                    .intersect_face(face, ray)
                    .filter(|hit| hit.t < best_t)
                {
                    best_t = hit.t;
                    best = Some(OctreeHit {
                        face,
                        t: hit.t,
                        uv: hit.uv,
                    });
                }
            }

            if let Some(split) = &node.split {
                let mut children: ArrayVec<(NodeIdx, FloatType), 8> = split
                    .children
                    .iter()
                    .filter(|child| !self.nodes[**child].is_empty_leaf())
                    .filter_map(|child| {
                        self.nodes[*child]
                            .bounds
                            .penetration(ray, best_t)
                            .map(|t| (*child, t))
                    })
                    .collect();
                // Nearest child goes last, to be popped first
                children.sort_unstable_by_key(|(_, t)| Reverse(OrderedFloat(*t)));
                cache.stack.extend(children);
            }
        }

        best
    }
}
