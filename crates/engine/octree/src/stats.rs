//! Tree introspection for tuning build parameters
//!
//! A read-only side traversal, fully separate from the build path. The walk
//! returns a structured report instead of mutating shared accumulators, and
//! visits exactly the nodes the compactor emits, so the numbers describe the
//! buffers the renderer will actually traverse.

use crate::build::{Octree, OctreeNode};

/// Samples collected from every emitted node at one depth level.
#[derive(Debug, Clone, Default)]
pub struct LevelStats {
    /// Retained triangle count of each node at this level
    pub triangle_counts: Vec<usize>,
    /// Emitted-child count of each internal node at this level
    pub child_counts: Vec<usize>,
}

/// Report of one diagnostic walk over the tree.
#[derive(Debug, Clone, Default)]
pub struct TreeStats {
    /// One entry per depth level, root first
    pub levels: Vec<LevelStats>,
    /// Depth of every emitted leaf
    pub leaf_depths: Vec<usize>,
}

impl TreeStats {
    /// Deepest level holding at least one emitted node.
    pub fn max_depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Emitted node total across all levels.
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(|level| level.triangle_counts.len()).sum()
    }

    /// Triangle references held across the tree, duplication included.
    pub fn stored_triangles(&self) -> usize {
        self.levels
            .iter()
            .map(|level| level.triangle_counts.iter().sum::<usize>())
            .sum()
    }

    /// Mean emitted-child count over internal nodes.
    pub fn mean_branching(&self) -> f64 {
        let mut total = 0usize;
        let mut samples = 0usize;
        for level in &self.levels {
            total += level.child_counts.iter().sum::<usize>();
            samples += level.child_counts.len();
        }
        if samples == 0 {
            0.0
        } else {
            total as f64 / samples as f64
        }
    }

    /// Leaf count per depth level.
    pub fn leaf_depth_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.levels.len()];
        for &depth in &self.leaf_depths {
            histogram[depth] += 1;
        }
        histogram
    }
}

impl Octree {
    /// Collect per-level statistics. Purely informational; the tree and the
    /// compacted output are unaffected.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        collect(&self.root, 0, &mut stats);
        stats
    }
}

fn collect(node: &OctreeNode, depth: usize, stats: &mut TreeStats) {
    if stats.levels.len() <= depth {
        stats.levels.resize_with(depth + 1, LevelStats::default);
    }
    stats.levels[depth].triangle_counts.push(node.triangles.len());

    match &node.children {
        None => stats.leaf_depths.push(depth),
        Some(children) => {
            let emitted = children.iter().filter(|child| child.is_emitted());
            stats.levels[depth].child_counts.push(emitted.clone().count());
            for child in emitted {
                collect(child, depth + 1, stats);
            }
        }
    }
}
