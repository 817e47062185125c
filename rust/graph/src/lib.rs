// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Linkset Graph
//!
//! A small, set-backed RDF graph tuned for one job: finding the node that
//! carries a given identifier literal and appending new edges next to it.
//!
//! Terms are interned into a slot map, triples are stored once (inserting an
//! existing triple is a no-op), and a `(predicate, object) → subjects` index
//! makes "first subject whose property equals this literal" an O(1) lookup.
//! Graph documents are read from Turtle (the subset emitted by IFC-to-LBD
//! converters, which includes N-Triples) and written back as Turtle.

pub mod error;
pub mod graph;
pub mod namespace;
pub mod term;
pub mod turtle;
pub mod writer;

pub use error::{Error, Result};
pub use graph::{Graph, TermKey};
pub use namespace::{Namespaces, Vocabulary};
pub use term::{Literal, Term};
