// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh decoding

use crate::error::{Error, Result};
use ifc_linkset_model::RawMesh;
use nalgebra::{Point2, Point3};

/// A validated triangle mesh in world coordinates
#[derive(Debug, Clone)]
pub struct DecodedMesh {
    /// Vertex positions
    pub points: Vec<Point3<f64>>,
    /// Triangle vertex indices, all in range
    pub triangles: Vec<[usize; 3]>,
}

impl DecodedMesh {
    /// Decode flat vertex and index buffers.
    ///
    /// Every index is bounds-checked here so later stages can index freely.
    pub fn decode(raw: &RawMesh) -> Result<Self> {
        if raw.verts.is_empty() {
            return Err(Error::EmptyMesh("no vertices".to_string()));
        }
        if raw.verts.len() % 3 != 0 {
            return Err(Error::MalformedVertexBuffer(raw.verts.len()));
        }
        if raw.faces.len() % 3 != 0 {
            return Err(Error::MalformedIndexBuffer(raw.faces.len()));
        }

        let points: Vec<Point3<f64>> = raw
            .verts
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        if let Some(bad) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(Error::NonFiniteVertex(bad));
        }

        let vertex_count = points.len();
        let mut triangles = Vec::with_capacity(raw.faces.len() / 3);
        for face in raw.faces.chunks_exact(3) {
            let mut tri = [0usize; 3];
            for (slot, &index) in tri.iter_mut().zip(face) {
                if index as usize >= vertex_count {
                    return Err(Error::IndexOutOfRange {
                        index,
                        vertex_count,
                    });
                }
                *slot = index as usize;
            }
            triangles.push(tri);
        }

        Ok(Self { points, triangles })
    }

    /// Project a triangle onto the horizontal plane
    #[inline]
    pub fn projected_triangle(&self, tri: &[usize; 3]) -> [Point2<f64>; 3] {
        tri.map(|i| Point2::new(self.points[i].x, self.points[i].y))
    }

    /// Minimum and maximum z over all vertices
    pub fn z_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_groups_vertices() {
        let raw = RawMesh::new(
            vec![0.0, 0.0, 1.0, 2.0, 0.0, 3.0, 0.0, 2.0, -1.0],
            vec![0, 1, 2],
        );
        let mesh = DecodedMesh::decode(&raw).unwrap();
        assert_eq!(mesh.points.len(), 3);
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
        assert_eq!(mesh.z_range(), (-1.0, 3.0));
    }

    #[test]
    fn decode_rejects_out_of_range_index() {
        let raw = RawMesh::new(vec![0.0; 9], vec![0, 1, 3]);
        assert_eq!(
            DecodedMesh::decode(&raw).unwrap_err(),
            Error::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn decode_rejects_ragged_buffers() {
        let raw = RawMesh::new(vec![0.0; 8], vec![0, 1, 2]);
        assert_eq!(
            DecodedMesh::decode(&raw).unwrap_err(),
            Error::MalformedVertexBuffer(8)
        );

        let raw = RawMesh::new(vec![0.0; 9], vec![0, 1]);
        assert_eq!(
            DecodedMesh::decode(&raw).unwrap_err(),
            Error::MalformedIndexBuffer(2)
        );
    }

    #[test]
    fn decode_rejects_nan() {
        let raw = RawMesh::new(vec![0.0, 0.0, 0.0, f64::NAN, 0.0, 0.0], vec![]);
        assert_eq!(
            DecodedMesh::decode(&raw).unwrap_err(),
            Error::NonFiniteVertex(1)
        );
    }

    #[test]
    fn decode_rejects_empty() {
        assert!(matches!(
            DecodedMesh::decode(&RawMesh::default()),
            Err(Error::EmptyMesh(_))
        ));
    }
}
