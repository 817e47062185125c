use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a mesh into a footprint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    #[error("Malformed vertex buffer: length {0} is not a multiple of 3")]
    MalformedVertexBuffer(usize),

    #[error("Malformed index buffer: length {0} is not a multiple of 3")]
    MalformedIndexBuffer(usize),

    #[error("Face index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),

    #[error("No usable triangles: all {0} faces are vertical or degenerate")]
    NoUsableTriangles(usize),

    #[error("Footprint union produced no polygons")]
    EmptyFootprint,
}
