// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON model documents.
//!
//! A model document is the exchange format between the tessellating export
//! step and the linker:
//!
//! ```json
//! {
//!   "elements": [
//!     { "global_id": "2O2Fr$t4X7Zf8NOew3FLOH", "type": "IfcSpace", "name": "A101",
//!       "mesh": { "verts": [0, 0, 0, ...], "faces": [0, 1, 2, ...] } }
//!   ],
//!   "levels": [
//!     { "name": "Level 1", "elevation": 3000.0, "contains": [], "aggregates": ["2O2Fr$t4X7Zf8NOew3FLOH"] }
//!   ],
//!   "systems": [
//!     { "global_id": "3Ax9...", "local_id": 812, "name": "Supply air" }
//!   ],
//!   "group_assignments": [
//!     { "group": "3Ax9...", "members": ["1kTvXnbbzCWw8lcMd1dR4o"] }
//!   ]
//! }
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::element::{Element, Level};
use crate::error::{Error, Result};
use crate::source::ModelSource;
use crate::system::{GroupAssignment, System};

/// A fully loaded model document with a GlobalId index over its elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub systems: Vec<System>,
    #[serde(default)]
    pub group_assignments: Vec<GroupAssignment>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl ModelDocument {
    /// Builds a document from parts, indexing elements by GlobalId.
    pub fn new(
        elements: Vec<Element>,
        levels: Vec<Level>,
        systems: Vec<System>,
        group_assignments: Vec<GroupAssignment>,
    ) -> Result<Self> {
        let mut doc = Self {
            elements,
            levels,
            systems,
            group_assignments,
            index: FxHashMap::default(),
        };
        doc.rebuild_index()?;
        Ok(doc)
    }

    /// Parses a document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut doc: ModelDocument = serde_json::from_str(json)?;
        doc.rebuild_index()?;
        Ok(doc)
    }

    /// Reads and parses a document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn rebuild_index(&mut self) -> Result<()> {
        self.index.clear();
        self.index.reserve(self.elements.len());
        for (i, element) in self.elements.iter().enumerate() {
            if self.index.insert(element.global_id.clone(), i).is_some() {
                return Err(Error::DuplicateGlobalId(element.global_id.clone()));
            }
        }
        Ok(())
    }
}

impl ModelSource for ModelDocument {
    fn element(&self, global_id: &str) -> Option<&Element> {
        self.index.get(global_id).map(|&i| &self.elements[i])
    }

    fn elements_of_type(&self, type_tags: &[String]) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| type_tags.iter().any(|t| e.is_a(t)))
            .collect()
    }

    fn levels(&self) -> &[Level] {
        &self.levels
    }

    fn systems(&self) -> &[System] {
        &self.systems
    }

    fn group_assignments(&self) -> &[GroupAssignment] {
        &self.group_assignments
    }
}
