// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for graph documents.

use std::path::PathBuf;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing graph documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document could not be read or written.
    #[error("I/O error on graph document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Syntax error in a Turtle document.
    #[error("Turtle syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A prefixed name uses a prefix that was never declared.
    #[error("undeclared prefix '{prefix}:' at line {line}")]
    UndeclaredPrefix { prefix: String, line: usize },
}
