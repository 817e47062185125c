// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recoverable problems reported next to linking results.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// One recoverable problem. The affected element, edge or document pair is
/// skipped and the run continues.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("no usable geometry for element {element}: {reason}")]
    GeometryExtraction { element: String, reason: String },

    #[error("no target storey at elevation {elevation} (source storey {storey:?})")]
    ElevationMismatch { storey: String, elevation: i64 },

    #[error("system {system} has no node in the output graph")]
    UnresolvedSystem { system: String },

    #[error("member {member} of system {system} has no node in its graph")]
    UnresolvedMember { system: String, member: String },

    #[error("target {target} has no node in the target graph")]
    UnresolvedTarget { target: String },

    #[error("element {element} matched to {target} has no node in its graph")]
    UnresolvedSource { element: String, target: String },

    #[error("model document {} has no graph document", .path.display())]
    MissingGraphDocument { stem: String, path: PathBuf },

    #[error("graph document {} has no model document", .path.display())]
    MissingModelDocument { stem: String, path: PathBuf },

    #[error("failed to load {}: {reason}", .path.display())]
    DocumentLoad { path: PathBuf, reason: String },
}

impl Diagnostic {
    /// Per-element problems are expected in bulk and logged at debug level.
    fn is_verbose(&self) -> bool {
        matches!(
            self,
            Diagnostic::GeometryExtraction { .. } | Diagnostic::UnresolvedMember { .. }
        )
    }
}

/// Ordered collection of diagnostics. Every pushed diagnostic is logged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_verbose() {
            tracing::debug!(%diagnostic, "diagnostic");
        } else {
            tracing::warn!(%diagnostic, "diagnostic");
        }
        self.0.push(diagnostic);
    }

    /// Appends already-logged diagnostics.
    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Number of diagnostics matching `pred`.
    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.0.iter().filter(|d| pred(d)).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
