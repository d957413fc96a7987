//! Recursive octree construction over a triangle soup
//!
//! Subdivision is budget-driven rather than SAH-based: a triangle straddling
//! few octants is duplicated into each of them, while a triangle touching
//! many octants is promoted to the parent's own list, bounded by a per-node
//! retention budget. Promotion keeps duplication from blowing up around the
//! scene's structural joints while keeping per-node list sizes predictable
//! for the traversal pass.

use crate::aabb::Aabb;
use crate::error::Result;
use crate::mesh::{SceneGeometry, Triangle, TriangleMesh};
use crate::overlap::triangle_box_overlap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Build-time parameters, immutable for the lifetime of one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParams {
    /// Inclusive maximum subdivision depth; the root sits at depth 0
    pub depth_limit: usize,
    /// Retention budget: promoted triangles kept at an internal node.
    /// Must stay below 65536 so the count fits the compacted header.
    pub max_triangles_per_node: usize,
    /// A node holding at most this many triangles stays a leaf. A leaf at
    /// the depth limit may exceed it.
    pub max_triangles_per_leaf: usize,
    /// A triangle overlapping at least this many children is promoted to
    /// the node instead of being copied into every child
    pub overlap_promotion_threshold: usize,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            depth_limit: 8,
            max_triangles_per_node: 64,
            max_triangles_per_leaf: 32,
            overlap_promotion_threshold: 4,
        }
    }
}

/// One node of the in-memory tree.
///
/// `children` is `None` for leaves; a split node owns all eight children
/// exclusively, one per octant of its bounds. A node that has been split
/// never becomes a leaf again and retains only its promoted triangles.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub bounds: Aabb,
    pub triangles: Vec<Triangle>,
    pub children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    fn leaf(bounds: Aabb) -> Self {
        Self {
            bounds,
            triangles: Vec::new(),
            children: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// True when this node appears in the compacted buffer: internal nodes
    /// always, leaves only when they hold triangles. The compactor applies
    /// this single rule to both the children mask and the recursion.
    #[inline]
    pub fn is_emitted(&self) -> bool {
        !self.is_leaf() || !self.triangles.is_empty()
    }
}

/// The built tree together with the aggregated geometry it indexes.
#[derive(Debug, Clone)]
pub struct Octree {
    pub geometry: SceneGeometry,
    pub root: OctreeNode,
    pub params: BuildParams,
    max_depth: usize,
}

impl Octree {
    /// Aggregate `meshes` into one index space and subdivide the result.
    pub fn build(meshes: &[TriangleMesh], params: BuildParams) -> Result<Self> {
        let geometry = SceneGeometry::aggregate(meshes)?;
        Ok(Self::from_geometry(geometry, params))
    }

    /// Subdivide already-aggregated geometry.
    pub fn from_geometry(geometry: SceneGeometry, params: BuildParams) -> Self {
        let mut root = OctreeNode {
            bounds: geometry.bounds,
            triangles: geometry.triangles.clone(),
            children: None,
        };

        let mut max_depth = 0;
        subdivide(&mut root, &geometry, &params, 0, &mut max_depth);

        debug!(
            triangles = geometry.triangles.len(),
            max_depth, "octree subdivision finished"
        );

        Self {
            geometry,
            root,
            params,
            max_depth,
        }
    }

    /// Deepest node depth reached during construction (root = 0).
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

fn subdivide(
    node: &mut OctreeNode,
    geometry: &SceneGeometry,
    params: &BuildParams,
    depth: usize,
    max_depth: &mut usize,
) {
    *max_depth = (*max_depth).max(depth);

    if depth >= params.depth_limit {
        if node.triangles.len() > params.max_triangles_per_leaf {
            debug!(
                depth,
                triangles = node.triangles.len(),
                "depth limit reached, leaving an oversized leaf"
            );
        }
        return;
    }
    if node.triangles.len() <= params.max_triangles_per_leaf {
        return;
    }

    let mut children: Box<[OctreeNode; 8]> =
        Box::new(std::array::from_fn(|index| OctreeNode::leaf(node.bounds.octant(index))));

    // Classify every triangle by the set of children it overlaps. Few
    // overlaps: copy into each overlapping child. Many: promotion candidate.
    let mut candidates: Vec<(Vec<usize>, Triangle)> = Vec::new();
    for triangle in node.triangles.drain(..) {
        let [v0, v1, v2] = geometry.corners(&triangle);

        let mut overlapping = Vec::new();
        for (index, child) in children.iter().enumerate() {
            if triangle_box_overlap(&child.bounds, v0, v1, v2) {
                overlapping.push(index);
            }
        }
        // The octants tile the node and boundary contact counts as overlap.
        debug_assert!(!overlapping.is_empty(), "triangle escaped its node's octants");

        if overlapping.len() < params.overlap_promotion_threshold {
            for &index in &overlapping {
                children[index].triangles.push(triangle);
            }
        } else {
            candidates.push((overlapping, triangle));
        }
    }

    // Retention budget: keep the candidates touching the most children (the
    // worst to duplicate), push the rest down into every child they overlap.
    // The sort is stable, so equal counts keep scan order and rebuilds are
    // byte-identical.
    if candidates.len() > params.max_triangles_per_node {
        candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        for (overlapping, triangle) in candidates.drain(params.max_triangles_per_node..) {
            for index in overlapping {
                children[index].triangles.push(triangle);
            }
        }
    }
    node.triangles = candidates.into_iter().map(|(_, triangle)| triangle).collect();

    for child in children.iter_mut() {
        if !child.triangles.is_empty() {
            subdivide(child, geometry, params, depth + 1, max_depth);
        }
    }

    node.children = Some(children);
}
