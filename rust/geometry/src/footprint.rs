// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exact 2D footprints of triangulated elements
//!
//! The footprint is the union of every face projected onto the XY plane, so it
//! keeps L-shapes, U-shapes and courtyards that a convex hull would fill in.
//! Faces that project to (almost) nothing are vertical walls of the mesh and
//! are dropped before the union.

use crate::bool2d::{
    bounds_overlap, compute_signed_area, contour_bounds, contour_to_path, ensure_ccw, ensure_cw,
    intersect_shapes, path_to_contour, shapes_area, union_triangles, Shape,
};
use crate::error::{Error, Result};
use crate::extent::VerticalExtent;
use crate::mesh::DecodedMesh;
use ifc_linkset_model::RawMesh;
use nalgebra::Point2;

/// Projected triangles at or below this area are treated as vertical faces
pub const DEFAULT_MIN_TRIANGLE_AREA: f64 = 1e-6;

/// Slack applied when comparing an overlap against a minimum area, so that
/// an overlap of exactly the threshold still counts after boolean round-off
pub const OVERLAP_AREA_EPSILON: f64 = 1e-7;

/// Settings for footprint extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintSettings {
    /// Minimum projected triangle area (model units squared)
    pub min_triangle_area: f64,
}

impl Default for FootprintSettings {
    fn default() -> Self {
        Self {
            min_triangle_area: DEFAULT_MIN_TRIANGLE_AREA,
        }
    }
}

/// One connected part of a footprint
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintPolygon {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl FootprintPolygon {
    pub fn area(&self) -> f64 {
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        compute_signed_area(&self.outer).abs() - holes
    }

    fn to_shape(&self) -> Shape {
        let mut shape = Vec::with_capacity(1 + self.holes.len());
        shape.push(contour_to_path(&self.outer));
        shape.extend(self.holes.iter().map(|h| contour_to_path(h)));
        shape
    }
}

/// A planar, possibly multi-part polygon with holes
#[derive(Debug, Clone)]
pub struct Footprint {
    polygons: Vec<FootprintPolygon>,
    min: Point2<f64>,
    max: Point2<f64>,
    area: f64,
}

impl Footprint {
    /// Union of the given triangles. `None` if the union is empty.
    pub fn from_triangles(triangles: &[[Point2<f64>; 3]]) -> Option<Self> {
        Self::from_shapes(union_triangles(triangles))
    }

    /// Footprint of a single simple contour. `None` if it has no area.
    pub fn from_contour(contour: &[Point2<f64>]) -> Option<Self> {
        if contour.len() < 3 || compute_signed_area(contour) == 0.0 {
            return None;
        }
        let polygon = FootprintPolygon {
            outer: ensure_ccw(contour),
            holes: Vec::new(),
        };
        Self::from_polygons(vec![polygon])
    }

    fn from_shapes(shapes: Vec<Shape>) -> Option<Self> {
        let polygons = shapes
            .into_iter()
            .filter_map(|shape| {
                let mut contours = shape.into_iter();
                let outer = path_to_contour(&contours.next()?);
                let holes = contours.map(|h| ensure_cw(&path_to_contour(&h))).collect();
                Some(FootprintPolygon {
                    outer: ensure_ccw(&outer),
                    holes,
                })
            })
            .collect();
        Self::from_polygons(polygons)
    }

    fn from_polygons(polygons: Vec<FootprintPolygon>) -> Option<Self> {
        let mut bounds: Option<(Point2<f64>, Point2<f64>)> = None;
        for polygon in &polygons {
            if let Some((lo, hi)) = contour_bounds(&polygon.outer) {
                bounds = Some(match bounds {
                    Some((min, max)) => (
                        Point2::new(min.x.min(lo.x), min.y.min(lo.y)),
                        Point2::new(max.x.max(hi.x), max.y.max(hi.y)),
                    ),
                    None => (lo, hi),
                });
            }
        }
        let (min, max) = bounds?;
        let area = polygons.iter().map(FootprintPolygon::area).sum();
        Some(Self {
            polygons,
            min,
            max,
            area,
        })
    }

    pub fn polygons(&self) -> &[FootprintPolygon] {
        &self.polygons
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Axis-aligned bounding box `(min, max)`
    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        (self.min, self.max)
    }

    /// Area shared by two footprints. Zero when they are disjoint or only touch.
    pub fn intersection_area(&self, other: &Footprint) -> f64 {
        if !bounds_overlap(&self.min, &self.max, &other.min, &other.max) {
            return 0.0;
        }
        let a: Vec<Shape> = self.polygons.iter().map(FootprintPolygon::to_shape).collect();
        let b: Vec<Shape> = other.polygons.iter().map(FootprintPolygon::to_shape).collect();
        shapes_area(&intersect_shapes(&a, &b)).max(0.0)
    }

    /// Whether the footprints share at least `min_area`.
    pub fn overlaps(&self, other: &Footprint, min_area: f64) -> bool {
        let area = self.intersection_area(other);
        area > 0.0 && area > min_area - OVERLAP_AREA_EPSILON
    }
}

/// Footprint and vertical band of one element
#[derive(Debug, Clone)]
pub struct ElementGeometry {
    pub footprint: Footprint,
    pub extent: VerticalExtent,
}

/// Extract the exact footprint and vertical extent of a world-coordinate mesh.
///
/// The vertical extent covers every vertex, including those that belong only
/// to discarded vertical faces.
pub fn extract_geometry(raw: &RawMesh, settings: &FootprintSettings) -> Result<ElementGeometry> {
    let mesh = DecodedMesh::decode(raw)?;
    let (min_z, max_z) = mesh.z_range();

    let triangles: Vec<[Point2<f64>; 3]> = mesh
        .triangles
        .iter()
        .map(|t| mesh.projected_triangle(t))
        .filter(|t| compute_signed_area(t).abs() > settings.min_triangle_area)
        .collect();

    if triangles.is_empty() {
        return Err(Error::NoUsableTriangles(mesh.triangles.len()));
    }

    let footprint = Footprint::from_triangles(&triangles).ok_or(Error::EmptyFootprint)?;

    Ok(ElementGeometry {
        footprint,
        extent: VerticalExtent::new(min_z, max_z),
    })
}
