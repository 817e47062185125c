// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building elements, their raw meshes, and building storeys.

use serde::{Deserialize, Serialize};

/// Raw triangulated geometry in world coordinates.
///
/// Layout matches what tessellators emit: a flat vertex buffer
/// `[x0, y0, z0, x1, y1, z1, ...]` and a flat index buffer where every three
/// consecutive indices form one triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMesh {
    /// Vertex positions (x, y, z)
    #[serde(default)]
    pub verts: Vec<f64>,
    /// Triangle indices (i0, i1, i2)
    #[serde(default)]
    pub faces: Vec<u32>,
}

impl RawMesh {
    /// Create a mesh from flat buffers
    pub fn new(verts: Vec<f64>, faces: Vec<u32>) -> Self {
        Self { verts, faces }
    }

    /// Number of complete vertices in the buffer
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.verts.len() / 3
    }

    /// Number of complete triangles in the index buffer
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }

    /// Check if mesh carries no geometry at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty() || self.faces.is_empty()
    }
}

/// A building element as exported from the source model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// IFC GlobalId, shared with the element's node in the graph documents.
    pub global_id: String,
    /// IFC entity type, e.g. `IfcSpace` or `IfcFlowTerminal`.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Supertypes of `type_tag`, most specific first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<String>,
    /// IFC `Name` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub mesh: RawMesh,
}

impl Element {
    pub fn new(global_id: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            global_id: global_id.into(),
            type_tag: type_tag.into(),
            ancestors: Vec::new(),
            name: None,
            mesh: RawMesh::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mesh(mut self, mesh: RawMesh) -> Self {
        self.mesh = mesh;
        self
    }

    /// Subtype-aware type test. IFC type names compare case-insensitively,
    /// so `IFCSPACE` and `IfcSpace` are the same type.
    pub fn is_a(&self, type_tag: &str) -> bool {
        self.type_tag.eq_ignore_ascii_case(type_tag)
            || self
                .ancestors
                .iter()
                .any(|a| a.eq_ignore_ascii_case(type_tag))
    }
}

/// A building storey and the elements it claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Reference elevation in model length units.
    pub elevation: f64,
    /// GlobalIds related through spatial containment.
    #[serde(default)]
    pub contains: Vec<String>,
    /// GlobalIds related through aggregation (spaces, zones).
    #[serde(default)]
    pub aggregates: Vec<String>,
}

impl Level {
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
            contains: Vec::new(),
            aggregates: Vec::new(),
        }
    }
}
