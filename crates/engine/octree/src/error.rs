//! Error types for geometry aggregation and octree construction

use thiserror::Error;

/// Result type alias for octree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ingesting geometry or building the tree
#[derive(Debug, Error)]
pub enum Error {
    /// Vertex and normal arrays of an input mesh differ in length
    #[error("mesh {mesh}: vertex count {vertices} does not match normal count {normals}")]
    MismatchedNormals {
        mesh: usize,
        vertices: usize,
        normals: usize,
    },

    /// A triangle references a vertex outside its mesh's index space
    #[error("mesh {mesh}: vertex index {index} out of range ({vertices} vertices)")]
    IndexOutOfRange {
        mesh: usize,
        index: u32,
        vertices: usize,
    },

    /// No triangles were supplied, so no scene bounds exist
    #[error("cannot build an octree from empty geometry")]
    EmptyGeometry,

    /// A node retained more triangles than the 16-bit header field can hold
    #[error("node holds {count} triangles, exceeding the {max} the header format can encode")]
    TriangleCountOverflow { count: usize, max: usize },

    /// OBJ file could not be read or parsed
    #[error("failed to load OBJ: {0}")]
    ObjLoad(#[from] tobj::LoadError),

    /// OBJ file parsed but contains unusable geometry
    #[error("invalid OBJ data: {0}")]
    InvalidObj(String),
}
