//! OBJ mesh ingestion
//!
//! Loads Wavefront OBJ files through `tobj` with GPU-style single indexing,
//! so position and normal arrays share one index space. Faces are
//! triangulated on load; polygons never reach the octree.

use crate::error::{Error, Result};
use crate::mesh::{Triangle, TriangleMesh};
use glam::Vec3;
use std::path::Path;
use tracing::{debug, warn};

/// Load every shape of an OBJ file as one [`TriangleMesh`] each.
///
/// The per-triangle material id is the shape's OBJ material index, falling
/// back to the shape's position in the file when no material is assigned.
/// Normals are taken from the file when present; otherwise smooth vertex
/// normals are computed by area-weighted accumulation of face normals.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<TriangleMesh>> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;

    let mut meshes = Vec::with_capacity(models.len());
    for (shape_index, model) in models.into_iter().enumerate() {
        let mesh = model.mesh;

        let mut vertices = Vec::with_capacity(mesh.positions.len() / 3);
        for position in mesh.positions.chunks_exact(3) {
            let vertex = Vec3::new(position[0], position[1], position[2]);
            if !vertex.is_finite() {
                return Err(Error::InvalidObj(format!(
                    "non-finite vertex in shape '{}'",
                    model.name
                )));
            }
            vertices.push(vertex);
        }

        let material = mesh.material_id.unwrap_or(shape_index) as u32;
        let mut triangles = Vec::with_capacity(mesh.indices.len() / 3);
        for face in mesh.indices.chunks_exact(3) {
            for &index in face {
                if index as usize >= vertices.len() {
                    return Err(Error::InvalidObj(format!(
                        "face index {} out of range in shape '{}'",
                        index, model.name
                    )));
                }
            }
            triangles.push(Triangle::new(face[0], face[1], face[2], material));
        }

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|normal| Vec3::new(normal[0], normal[1], normal[2]))
                .collect()
        } else {
            if !mesh.normals.is_empty() {
                warn!(
                    shape = %model.name,
                    "normal count does not match vertex count, recomputing"
                );
            }
            smooth_normals(&vertices, &triangles)
        };

        debug!(
            shape = %model.name,
            vertices = vertices.len(),
            triangles = triangles.len(),
            "loaded OBJ shape"
        );

        meshes.push(TriangleMesh {
            vertices,
            normals,
            triangles,
        });
    }

    if meshes.is_empty() {
        return Err(Error::InvalidObj(format!(
            "{} contains no shapes",
            path.display()
        )));
    }
    Ok(meshes)
}

/// Smooth vertex normals: the unnormalized face cross product carries the
/// face's area as its length, so accumulation is area-weighted for free.
fn smooth_normals(vertices: &[Vec3], triangles: &[Triangle]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];
    for triangle in triangles {
        let [a, b, c] = triangle.indices.map(|index| vertices[index as usize]);
        let face = (b - a).cross(c - a);
        for index in triangle.indices {
            normals[index as usize] += face;
        }
    }
    normals
        .into_iter()
        .map(|normal| normal.normalize_or(Vec3::Y))
        .collect()
}
