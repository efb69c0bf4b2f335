use std::{array, mem};

use index_vec::IndexVec;
use itertools::Itertools as _;

use crate::{
    geometry::{FloatType, Triangle, WorldBox, WorldPoint, WorldVector},
    scene::{FaceIdx, Scene},
};

use super::{LEAF_CAPACITY, MAX_TREE_DEPTH, Node, NodeIdx, Octree, Split};

impl<'s> Octree<'s> {
    /// Builds the tree over all faces of the scene.
    pub fn build(scene: &'s Scene) -> Octree<'s> {
        let faces = scene.faces().indices().collect_vec();
        let bounds = scene.bounding_box().unwrap_or_default();

        let mut octree = Octree {
            scene,
            nodes: IndexVec::new(),
        };
        octree.build_recursive(faces, bounds, None, None, 0);

        log::debug!(
            "Built octree with {} nodes over {} faces",
            octree.nodes.len(),
            scene.faces().len()
        );

        octree
    }

    fn build_recursive(
        &mut self,
        faces: Vec<FaceIdx>,
        bounds: WorldBox,
        parent: Option<NodeIdx>,
        octant: Option<usize>,
        depth: usize,
    ) -> NodeIdx {
        // Create placeholder node that will be filled in later
        let node_index = self.nodes.push(Node {
            faces: Vec::new(),
            bounds: bounds.clone(),
            split: None,
            parent,
            octant,
            depth,
        });

        if faces.len() < LEAF_CAPACITY || depth >= MAX_TREE_DEPTH {
            self.nodes[node_index].faces = faces;
            return node_index;
        }

        let center = bounds.clamp(&self.dividing_center(&faces));

        let mut retained = Vec::new();
        let mut child_faces: [Vec<FaceIdx>; 8] = Default::default();
        for face in faces {
            match octant_of(&self.scene.triangle(face), &center) {
                Some(i) => child_faces[i].push(face),
                None => retained.push(face),
            }
        }

        if child_faces.iter().all(Vec::is_empty) {
            // Everything straddles the center, splitting would not help
            self.nodes[node_index].faces = retained;
            return node_index;
        }

        let children = array::from_fn(|i| {
            let faces = mem::take(&mut child_faces[i]);
            self.build_recursive(
                faces,
                bounds.octant(&center, i),
                Some(node_index),
                Some(i),
                depth + 1,
            )
        });

        let node = &mut self.nodes[node_index];
        node.faces = retained;
        node.split = Some(Split { center, children });

        node_index
    }

    /// Per axis median of face centroids.
    fn dividing_center(&self, faces: &[FaceIdx]) -> WorldPoint {
        let centroids = faces
            .iter()
            .map(|face| self.scene.triangle(*face).centroid())
            .collect_vec();

        WorldPoint::from(WorldVector::from_fn(|axis, _| {
            let mut coords = centroids.iter().map(|c| c[axis]).collect_vec();
            let middle = coords.len() / 2;
            *coords.select_nth_unstable_by(middle, FloatType::total_cmp).1
        }))
    }
}

/// Octant of the center that contains the whole triangle, or `None` if the triangle touches
/// or crosses any of the three planes going through the center.
pub(super) fn octant_of(triangle: &Triangle<WorldPoint>, center: &WorldPoint) -> Option<usize> {
    let mut octant = 0;
    for axis in 0..3 {
        if triangle.iter().all(|v| v[axis] > center[axis]) {
            octant |= 1 << axis;
        } else if !triangle.iter().all(|v| v[axis] < center[axis]) {
            return None;
        }
    }
    Some(octant)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scene::{
        Mesh,
        octree::test::{sphere_on_floor, triangle_soup},
        test::gray,
    };
    use assert2::{assert, let_assert};
    use nalgebra::Matrix4;
    use proptest::prelude::ProptestConfig;
    use test_case::test_case;
    use test_strategy::proptest;

    /// Every face of the scene is stored in exactly one node.
    fn assert_partition(octree: &Octree) {
        let mut stored = octree
            .nodes()
            .flat_map(|(_, node)| node.faces().iter().copied())
            .collect_vec();
        stored.sort();
        let expected = octree.scene().faces().indices().collect_vec();
        assert!(stored == expected);
    }

    /// Faces pushed down to a child really lie strictly inside its octant,
    /// and leaves are either small or could not be split.
    fn assert_structure(octree: &Octree) {
        for (index, node) in octree.nodes() {
            for face in node.faces() {
                let triangle = octree.scene().triangle(*face);
                for v in triangle.iter() {
                    assert!(node.bounds().contains(v));
                }
                if let Some(center) = node.dividing_center() {
                    assert!(octant_of(&triangle, center) == None);
                }
            }

            if let Some(children) = node.children() {
                for (i, child) in children.iter().enumerate() {
                    let child = octree.node(*child);
                    assert!(child.parent() == Some(index));
                    assert!(child.octant() == Some(i));
                    assert!(child.depth() == node.depth() + 1);
                }
            }
        }
    }

    #[proptest(ProptestConfig { cases: 64, ..ProptestConfig::default() })]
    fn random_soup_is_partitioned(#[strategy(triangle_soup(400))] scene: Scene) {
        let octree = Octree::build(&scene);
        assert_partition(&octree);
        assert_structure(&octree);
    }

    #[test]
    fn sphere_on_floor_is_partitioned() {
        let scene = sphere_on_floor();
        let octree = Octree::build(&scene);
        assert!(octree.node_count() > 1);
        assert_partition(&octree);
        assert_structure(&octree);
    }

    #[test]
    fn empty_scene_is_a_single_leaf() {
        let scene = Scene::new();
        let octree = Octree::build(&scene);
        assert!(octree.node_count() == 1);
        assert!(octree.node(octree.root()).is_empty_leaf());
        assert!(octree.node(octree.root()).is_root());
    }

    #[test]
    fn small_scene_is_a_single_leaf() {
        let mut scene = Scene::new();
        scene.add_mesh(&Mesh::cube(), gray(), &Matrix4::identity());
        let octree = Octree::build(&scene);
        assert!(octree.node_count() == 1);
        assert!(octree.node(octree.root()).faces().len() == 12);
    }

    #[test]
    fn overlapping_straddlers_stay_in_a_leaf() {
        let mut scene = Scene::new();
        for _ in 0..(2 * LEAF_CAPACITY) {
            scene.add_mesh(&Mesh::triangle(), gray(), &Matrix4::identity());
        }
        let octree = Octree::build(&scene);
        assert!(octree.node_count() == 1);
        assert_partition(&octree);
    }

    #[test]
    fn large_face_stays_at_the_root() {
        let mut scene = Scene::new();
        let large = scene.add_mesh(&Mesh::square(), gray(), &Matrix4::new_scaling(100.0));
        let small = Mesh::sphere(16, 8);
        for x in [-20.0, 20.0] {
            for z in [-20.0, 20.0] {
                let transform = Matrix4::new_translation(&WorldVector::new(x, 5.0, z));
                scene.add_mesh(&small, gray(), &transform);
            }
        }

        let octree = Octree::build(&scene);
        let root = octree.node(octree.root());
        assert!(!root.is_leaf());
        for face in large.start.index()..large.end.index() {
            let face = FaceIdx::new(face);
            assert!(root.faces().contains(&face));
            assert!(octree.find(face) == Some(octree.root()));
        }
        assert_partition(&octree);
        assert_structure(&octree);
    }

    #[test]
    fn find_and_ancestors() {
        let scene = sphere_on_floor();
        let octree = Octree::build(&scene);
        for face in scene.faces().indices() {
            let_assert!(Some(node) = octree.find(face));
            assert!(octree.node(node).faces().contains(&face));

            let ancestors = octree.ancestors(node).collect_vec();
            assert!(ancestors.first() == Some(&node));
            assert!(ancestors.last() == Some(&octree.root()));
            assert!(ancestors.len() == octree.node(node).depth() + 1);
        }
    }

    #[test_case([0.5, 0.5, 0.5], Some(7) ; "all_positive")]
    #[test_case([-0.5, 0.5, -0.5], Some(2) ; "positive_y")]
    #[test_case([-0.5, -0.5, 0.5], Some(4) ; "positive_z")]
    #[test_case([0.0, 0.5, 0.5], None ; "touching_plane")]
    #[test_case([0.05, 0.5, 0.5], None ; "crossing_plane")]
    fn octant_classification(offset: [FloatType; 3], expected: Option<usize>) {
        let offset = WorldVector::from(offset);
        let triangle = Triangle::new(
            WorldPoint::from(offset) + WorldVector::new(-0.1, 0.0, 0.0),
            WorldPoint::from(offset) + WorldVector::new(0.1, 0.0, 0.0),
            WorldPoint::from(offset) + WorldVector::new(0.0, 0.1, 0.0),
        );
        assert!(octant_of(&triangle, &WorldPoint::origin()) == expected);
    }
}
