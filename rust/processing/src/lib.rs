// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Linkset Processing
//!
//! The linking pipeline shared by the CLI and by library users:
//!
//! 1. [`storey`] groups elements of one model by building storey, keyed by
//!    rounded elevation.
//! 2. [`matcher`] pairs source elements (MEP terminals, devices) with target
//!    elements (spaces) on the same elevation by vertical band and exact
//!    footprint overlap.
//! 3. [`linker`] resolves both ends in their own graphs and writes
//!    `brick:hasPart` / `bot:hasElement` edges into the accumulating output
//!    graph.
//! 4. [`batch`] pairs model and graph documents by file stem and drives the
//!    whole run.
//!
//! Recoverable problems never abort a run. They are collected as
//! [`Diagnostic`]s and returned next to every result.

pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod linker;
pub mod matcher;
pub mod storey;

pub use batch::{
    pair_documents, BatchCoordinator, BatchInputs, BatchReport, DocumentPair, DocumentPairing,
    LoadedPair, PairReport,
};
pub use config::LinkConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, Result};
pub use linker::{system_uuid, GraphLinker, LinkOutcome};
pub use matcher::{GeometryCache, MatchOutcome, MatchTable, SpatialMatcher, TargetFilter};
pub use storey::{map_elements_to_storeys, round_elevation, StoreyGroup, StoreyKey};
