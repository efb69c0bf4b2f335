//! Spatial index over the faces of a scene.
//!
//! Every node splits its box into eight octants at a dividing center. Faces that fit
//! strictly into a single octant are pushed down to the matching child, faces crossing
//! any of the three dividing planes stay at the node itself. Interior nodes therefore
//! hold faces too, and every face is stored in exactly one node.

mod building;
mod printing;
mod ray_octree_intersection;

pub use printing::OctreeStatistics;
pub use ray_octree_intersection::{OctreeHit, StackCache};

use index_vec::IndexVec;

use crate::geometry::{WorldBox, WorldPoint};

use super::{FaceIdx, Scene};

/// Nodes with fewer faces than this are never split.
pub const LEAF_CAPACITY: usize = 16;

/// Splitting stops at this depth, whatever the face count.
pub const MAX_TREE_DEPTH: usize = 24;

index_vec::define_index_type! {
    pub struct NodeIdx = u32;
}

#[derive(Clone, Debug)]
pub struct Octree<'s> {
    scene: &'s Scene,
    nodes: IndexVec<NodeIdx, Node>,
}

#[derive(Clone, Debug)]
pub struct Node {
    faces: Vec<FaceIdx>,
    bounds: WorldBox,
    split: Option<Split>,
    parent: Option<NodeIdx>,
    /// Position within the parent, bit 0 = +x, bit 1 = +y, bit 2 = +z
    octant: Option<usize>,
    depth: usize,
}

#[derive(Clone, Debug)]
struct Split {
    center: WorldPoint,
    children: [NodeIdx; 8],
}

impl<'s> Octree<'s> {
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    pub fn root(&self) -> NodeIdx {
        NodeIdx::new(0)
    }

    pub fn node(&self, index: NodeIdx) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIdx, &Node)> {
        self.nodes.iter_enumerated()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finds the node storing the given face, by descending from the root.
    pub fn find(&self, face: FaceIdx) -> Option<NodeIdx> {
        let triangle = self.scene.triangle(face);
        let mut index = self.root();
        loop {
            let node = &self.nodes[index];
            if node.faces.contains(&face) {
                return Some(index);
            }
            let split = node.split.as_ref()?;
            index = split.children[building::octant_of(&triangle, &split.center)?];
        }
    }

    /// The node itself followed by all its ancestors up to the root.
    pub fn ancestors(&self, index: NodeIdx) -> impl Iterator<Item = NodeIdx> {
        std::iter::successors(Some(index), |i| self.nodes[*i].parent)
    }
}

impl Node {
    pub fn faces(&self) -> &[FaceIdx] {
        &self.faces
    }

    pub fn bounds(&self) -> &WorldBox {
        &self.bounds
    }

    pub fn dividing_center(&self) -> Option<&WorldPoint> {
        self.split.as_ref().map(|split| &split.center)
    }

    pub fn children(&self) -> Option<&[NodeIdx; 8]> {
        self.split.as_ref().map(|split| &split.children)
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn octant(&self) -> Option<usize> {
        self.octant
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Leaf without any faces, nothing to find there.
    pub fn is_empty_leaf(&self) -> bool {
        self.is_leaf() && self.faces.is_empty()
    }
}
