//! Flat buffer layout tests: header packing, forward-only offsets, and
//! reconstruction of the tree by walking the compacted words.

use glam::Vec3;
use octree::{pack_header, unpack_header, BuildParams, CompactScene, Octree, Triangle, TriangleMesh};

/// Helper: axis-aligned cube as one mesh - 8 vertices, 12 triangles.
fn cube_mesh(min: Vec3, max: Vec3) -> TriangleMesh {
    let corners: Vec<Vec3> = (0..8)
        .map(|index| {
            Vec3::new(
                if index & 1 != 0 { max.x } else { min.x },
                if index & 2 != 0 { max.y } else { min.y },
                if index & 4 != 0 { max.z } else { min.z },
            )
        })
        .collect();

    let quads = [
        [0, 1, 3, 2],
        [4, 6, 7, 5],
        [0, 4, 5, 1],
        [2, 3, 7, 6],
        [0, 2, 6, 4],
        [1, 5, 7, 3],
    ];

    let mut triangles = Vec::with_capacity(12);
    for quad in quads {
        triangles.push(Triangle::new(quad[0], quad[1], quad[2], 0));
        triangles.push(Triangle::new(quad[0], quad[2], quad[3], 0));
    }

    TriangleMesh {
        normals: vec![Vec3::Y; corners.len()],
        vertices: corners,
        triangles,
    }
}

fn cube_scene(params: BuildParams) -> CompactScene {
    let mesh = cube_mesh(Vec3::ZERO, Vec3::splat(2.0));
    Octree::build(std::slice::from_ref(&mesh), params)
        .unwrap()
        .compact()
        .unwrap()
}

/// Helper: walk the compacted node buffer the way the traversal shader
/// would, checking structural invariants and visiting every node.
fn walk(
    buffer: &[u32],
    offset: usize,
    visit: &mut impl FnMut(usize, u16, u8, u8, u32),
) -> usize {
    let (triangle_count, children_mask, children_count) = unpack_header(buffer[offset]);
    assert_eq!(
        children_mask.count_ones(),
        children_count as u32,
        "mask population must equal the child count at offset {offset}"
    );

    let triangle_start = buffer[offset + 1];
    visit(offset, triangle_count, children_mask, children_count, triangle_start);

    let mut visited = 2 + children_count as usize;
    for slot in 0..children_count as usize {
        let child_offset = buffer[offset + 2 + slot] as usize;
        assert_ne!(child_offset, 0, "unpatched child pointer at node offset {offset}");
        assert!(
            child_offset > offset,
            "child offset {child_offset} must lie past its parent header {offset}"
        );
        visited += walk(buffer, child_offset, visit);
    }
    visited
}

#[test]
fn test_header_roundtrip() {
    for triangle_count in [0u16, 1, 2, 255, 256, 4095, u16::MAX] {
        for children_mask in [0u8, 0x01, 0x0F, 0x55, 0xAA, 0xFF] {
            let children_count = children_mask.count_ones() as u8;
            let word = pack_header(triangle_count, children_mask, children_count);
            assert_eq!(
                unpack_header(word),
                (triangle_count, children_mask, children_count)
            );
        }
    }
}

#[test]
fn test_cube_buffer_layout() {
    // depth_limit 1 / leaf threshold 4: the root splits once into eight
    // non-empty leaf octants.
    let scene = cube_scene(BuildParams {
        depth_limit: 1,
        max_triangles_per_node: 100,
        max_triangles_per_leaf: 4,
        overlap_promotion_threshold: 8,
    });

    // Root: header + triangle_start + 8 pointers; each leaf child: header +
    // triangle_start.
    assert_eq!(scene.node_buffer.len(), 2 + 8 + 8 * 2);

    let (root_triangles, root_mask, root_children) = unpack_header(scene.node_buffer[0]);
    assert_eq!(root_triangles, 0, "no cube triangle overlaps all eight octants");
    assert_eq!(root_mask, 0xFF);
    assert_eq!(root_children, 8);
    assert_eq!(scene.node_buffer[1], 0, "root triangle range starts the buffer");

    // Pointers resolve in ascending octant order to consecutive leaf records.
    for slot in 0..8 {
        let offset = scene.node_buffer[2 + slot] as usize;
        assert_eq!(offset, 10 + slot * 2);

        let (leaf_triangles, leaf_mask, leaf_children) = unpack_header(scene.node_buffer[offset]);
        assert!(leaf_triangles > 0, "empty leaves must not be emitted");
        assert_eq!(leaf_mask, 0);
        assert_eq!(leaf_children, 0);
    }

    // The triangle buffer is exactly the concatenation of per-node ranges.
    let mut total = 0usize;
    walk(&scene.node_buffer, 0, &mut |_, triangle_count, _, _, triangle_start| {
        assert_eq!(triangle_start as usize, total, "ranges must be contiguous in visit order");
        total += triangle_count as usize;
    });
    assert_eq!(total, scene.triangle_buffer.len());
}

#[test]
fn test_offsets_are_forward_only() {
    let scene = cube_scene(BuildParams {
        depth_limit: 4,
        max_triangles_per_node: 2,
        max_triangles_per_leaf: 1,
        overlap_promotion_threshold: 2,
    });

    // `walk` asserts child_offset > parent_offset and != 0 at every edge;
    // the word total confirms the buffer has no gaps or orphan records.
    let words = walk(&scene.node_buffer, 0, &mut |_, _, _, _, _| {});
    assert_eq!(words, scene.node_buffer.len());
}

#[test]
fn test_promoted_root_with_empty_children_compacts_to_two_words() {
    // A single triangle through the scene center is promoted to the root;
    // all eight children are empty leaves and contribute nothing.
    let mesh = TriangleMesh {
        vertices: vec![Vec3::ZERO, Vec3::splat(2.0), Vec3::new(2.0, 0.0, 0.0)],
        normals: vec![Vec3::Y; 3],
        triangles: vec![Triangle::new(0, 1, 2, 7)],
    };
    let scene = Octree::build(
        std::slice::from_ref(&mesh),
        BuildParams {
            depth_limit: 2,
            max_triangles_per_node: 10,
            max_triangles_per_leaf: 0,
            overlap_promotion_threshold: 3,
        },
    )
    .unwrap()
    .compact()
    .unwrap();

    assert_eq!(scene.node_buffer.len(), 2);
    assert_eq!(unpack_header(scene.node_buffer[0]), (1, 0, 0));
    assert_eq!(scene.node_buffer[1], 0);

    assert_eq!(scene.triangle_buffer.len(), 1);
    assert_eq!(scene.triangle_buffer[0].indices, [0, 1, 2]);
    assert_eq!(scene.triangle_buffer[0].material, 7);
}

#[test]
fn test_companion_arrays_handed_over_verbatim() {
    let mesh = cube_mesh(Vec3::new(-1.0, -2.0, -3.0), Vec3::splat(2.0));
    let tree = Octree::build(std::slice::from_ref(&mesh), BuildParams::default()).unwrap();
    let scene = tree.compact().unwrap();

    assert_eq!(scene.vertices, tree.geometry.vertices);
    assert_eq!(scene.normals, tree.geometry.normals);
    assert!(scene.vertices.iter().all(|v| v.w == 1.0));
    assert!(scene.normals.iter().all(|n| n.w == 0.0));

    assert_eq!(scene.min_bounds, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(scene.max_bounds, Vec3::splat(2.0));

    // Byte views expose the exact Pod layout for GPU upload.
    assert_eq!(scene.node_bytes().len(), scene.node_buffer.len() * 4);
    assert_eq!(scene.triangle_bytes().len(), scene.triangle_buffer.len() * 16);
    assert_eq!(scene.vertex_bytes().len(), scene.vertices.len() * 16);
}

#[test]
fn test_stats_walk_matches_compacted_buffer() {
    let mesh = cube_mesh(Vec3::ZERO, Vec3::splat(2.0));
    let tree = Octree::build(
        std::slice::from_ref(&mesh),
        BuildParams {
            depth_limit: 3,
            max_triangles_per_node: 4,
            max_triangles_per_leaf: 2,
            overlap_promotion_threshold: 4,
        },
    )
    .unwrap();

    let stats = tree.stats();
    let scene = tree.compact().unwrap();

    // The diagnostics walk and the compactor must agree on which nodes
    // exist: same node count, same total stored triangles.
    let mut compacted_nodes = 0usize;
    let mut compacted_triangles = 0usize;
    walk(&scene.node_buffer, 0, &mut |_, triangle_count, _, _, _| {
        compacted_nodes += 1;
        compacted_triangles += triangle_count as usize;
    });

    assert_eq!(stats.node_count(), compacted_nodes);
    assert_eq!(stats.stored_triangles(), compacted_triangles);
    assert_eq!(stats.stored_triangles(), scene.triangle_buffer.len());
    assert_eq!(stats.max_depth(), tree.max_depth());

    // Leaf histogram covers every leaf exactly once.
    let histogram = stats.leaf_depth_histogram();
    assert_eq!(histogram.iter().sum::<usize>(), stats.leaf_depths.len());
}

#[test]
fn test_walk_reconstructs_octant_masks() {
    let scene = cube_scene(BuildParams {
        depth_limit: 2,
        max_triangles_per_node: 100,
        max_triangles_per_leaf: 4,
        overlap_promotion_threshold: 8,
    });

    walk(&scene.node_buffer, 0, &mut |_, _, mask, count, _| {
        // Every set mask bit corresponds to one stored pointer; pointers are
        // stored in ascending octant order, so sorting is never needed on
        // the consuming side.
        if count > 0 {
            assert!(mask != 0);
        }
    });
}
