// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for loading model documents.

use std::path::PathBuf;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a model document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document could not be read from disk.
    #[error("failed to read model document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid model JSON.
    #[error("invalid model document: {0}")]
    Json(#[from] serde_json::Error),

    /// Two elements share the same GlobalId.
    #[error("duplicate GlobalId in model document: {0}")]
    DuplicateGlobalId(String),

    /// A GlobalId is not a 22-character IFC compressed identifier.
    #[error("invalid GlobalId {id:?}: {reason}")]
    InvalidGlobalId { id: String, reason: &'static str },
}
