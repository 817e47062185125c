//! IFC-Linkset Geometry Processing
//!
//! Turns world-coordinate element meshes into exact 2D footprints and
//! vertical extents, using i_overlay for polygon booleans and nalgebra points.

pub mod bool2d;
pub mod error;
pub mod extent;
pub mod footprint;
pub mod mesh;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3};

pub use error::{Error, Result};
pub use extent::VerticalExtent;
pub use footprint::{
    extract_geometry, ElementGeometry, Footprint, FootprintPolygon, FootprintSettings,
    DEFAULT_MIN_TRIANGLE_AREA, OVERLAP_AREA_EPSILON,
};
pub use mesh::DecodedMesh;
