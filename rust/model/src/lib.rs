// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Linkset Model
//!
//! In-memory view of a building model as the linker consumes it: elements
//! with world-coordinate triangle meshes, building storeys with their
//! containment and aggregation lists, systems, and group assignments.
//!
//! The native STEP parser and tessellator are not part of this crate. Models
//! arrive as JSON documents (see [`ModelDocument`]) produced by an export step,
//! and every consumer works against the [`ModelSource`] trait so other
//! back-ends can be plugged in.

pub mod document;
pub mod element;
pub mod error;
pub mod guid;
pub mod source;
pub mod system;

pub use document::ModelDocument;
pub use element::{Element, Level, RawMesh};
pub use error::{Error, Result};
pub use guid::{expand_global_id, GLOBAL_ID_LEN};
pub use source::ModelSource;
pub use system::{GroupAssignment, System};
