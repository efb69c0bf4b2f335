use std::fmt::Display;

use crate::util::Stats;

use super::{NodeIdx, Octree};

#[derive(Clone, Debug, PartialEq)]
pub struct OctreeStatistics {
    pub node_count: usize,
    pub leaf_depth: Stats,
    pub leaf_faces: Stats,
    /// Faces kept at interior nodes because they cross a dividing plane
    pub interior_faces: Stats,
}

impl Display for OctreeStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Nodes: {}", self.node_count)?;
        writeln!(f, "Leaf depth: {}", self.leaf_depth)?;
        writeln!(f, "Leaf faces: {}", self.leaf_faces)?;
        write!(f, "Interior faces: {}", self.interior_faces)
    }
}

impl Octree<'_> {
    pub fn statistics(&self) -> OctreeStatistics {
        let (leaves, interior): (Vec<_>, Vec<_>) =
            self.nodes.iter().partition(|node| node.is_leaf());

        OctreeStatistics {
            node_count: self.nodes.len(),
            leaf_depth: leaves.iter().map(|node| node.depth).collect(),
            leaf_faces: leaves.iter().map(|node| node.faces.len()).collect(),
            interior_faces: interior.iter().map(|node| node.faces.len()).collect(),
        }
    }

    pub fn log_statistics(&self) {
        for line in self.statistics().to_string().lines() {
            log::info!("{line}");
        }
    }

    /// Dumps the whole tree at trace level.
    pub fn log_tree(&self) {
        if log::log_enabled!(log::Level::Trace) {
            self.log_recursive(self.root());
        }
    }

    fn log_recursive(&self, index: NodeIdx) {
        let node = &self.nodes[index];
        log::trace!(
            "{}- {}{}: {:?}-{:?}, {} faces",
            "  ".repeat(node.depth),
            if node.is_leaf() { "L" } else { "I" },
            index.index(),
            node.bounds.min,
            node.bounds.max,
            node.faces.len(),
        );

        for child in node.children().into_iter().flatten() {
            self.log_recursive(*child);
        }
    }
}
