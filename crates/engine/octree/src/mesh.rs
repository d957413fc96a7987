//! Input meshes and geometry aggregation
//!
//! Aggregation merges independently-indexed meshes into one global index
//! space: a combined vertex array, a combined normal array, a combined
//! triangle array with re-based indices, and the scene bounding box. The
//! combined arrays are padded to four components so the renderer can bind
//! them as std430 storage buffers without repacking.

use crate::aabb::Aabb;
use crate::error::{Error, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// One triangle: three vertex indices plus a material id.
///
/// Lays out as four consecutive u32 words, which is exactly one record of
/// the compacted triangle buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub material: u32,
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32, material: u32) -> Self {
        Self {
            indices: [a, b, c],
            material,
        }
    }
}

/// A single input mesh with its own vertex index space.
///
/// Invariant: `vertices` and `normals` have equal length; every triangle
/// index is in range. [`SceneGeometry::aggregate`] checks both.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
}

/// Combined scene geometry in one global index space.
///
/// Positions carry w = 1.0 and normals w = 0.0; the padding component is
/// never read by the consumer.
#[derive(Debug, Clone)]
pub struct SceneGeometry {
    pub vertices: Vec<Vec4>,
    pub normals: Vec<Vec4>,
    pub triangles: Vec<Triangle>,
    /// Bounding box of every vertex referenced by a triangle
    pub bounds: Aabb,
}

impl SceneGeometry {
    /// Merge `meshes` into one vertex/normal/triangle soup.
    ///
    /// Triangle indices are re-based by the number of vertices already
    /// appended, so they index the combined arrays. Fails fast on
    /// mismatched vertex/normal lengths, out-of-range indices, and empty
    /// input rather than producing corrupt buffers.
    pub fn aggregate(meshes: &[TriangleMesh]) -> Result<Self> {
        let vertex_total: usize = meshes.iter().map(|m| m.vertices.len()).sum();
        let triangle_total: usize = meshes.iter().map(|m| m.triangles.len()).sum();

        let mut vertices = Vec::with_capacity(vertex_total);
        let mut normals = Vec::with_capacity(vertex_total);
        let mut triangles = Vec::with_capacity(triangle_total);
        let mut bounds = Aabb::EMPTY;

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            if mesh.vertices.len() != mesh.normals.len() {
                return Err(Error::MismatchedNormals {
                    mesh: mesh_index,
                    vertices: mesh.vertices.len(),
                    normals: mesh.normals.len(),
                });
            }

            let base = vertices.len() as u32;
            for (&vertex, &normal) in mesh.vertices.iter().zip(mesh.normals.iter()) {
                vertices.push(vertex.extend(1.0));
                normals.push(normal.extend(0.0));
            }

            for triangle in &mesh.triangles {
                for &index in &triangle.indices {
                    if index as usize >= mesh.vertices.len() {
                        return Err(Error::IndexOutOfRange {
                            mesh: mesh_index,
                            index,
                            vertices: mesh.vertices.len(),
                        });
                    }
                    bounds.grow(mesh.vertices[index as usize]);
                }
                triangles.push(Triangle {
                    indices: triangle.indices.map(|index| index + base),
                    material: triangle.material,
                });
            }
        }

        if triangles.is_empty() {
            return Err(Error::EmptyGeometry);
        }

        Ok(Self {
            vertices,
            normals,
            triangles,
            bounds,
        })
    }

    /// Corner positions of `triangle`, without the padding component.
    #[inline]
    pub fn corners(&self, triangle: &Triangle) -> [Vec3; 3] {
        triangle
            .indices
            .map(|index| self.vertices[index as usize].truncate())
    }
}
