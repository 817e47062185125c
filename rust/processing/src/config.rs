// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linking configuration loaded from environment variables.

use ifc_linkset_geometry::{FootprintSettings, DEFAULT_MIN_TRIANGLE_AREA};

/// MEP element types linked to spaces when nothing else is configured.
pub const DEFAULT_SOURCE_TYPES: &[&str] = &[
    "IfcFlowTerminal",
    "IfcFlowController",
    "IfcDistributionControlElement",
    "IfcEnergyConversionDevice",
    "IfcFlowMovingDevice",
    "IfcFlowStorageDevice",
    "IfcFlowTreatmentDevice",
];

pub const DEFAULT_TARGET_TYPE: &str = "IfcSpace";

/// Minimum shared footprint area, in square model units (100 cm²).
pub const DEFAULT_MIN_OVERLAP_AREA: f64 = 0.01;

/// Linking configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkConfig {
    /// Vertical tolerance in millimetres.
    pub tolerance_mm: f64,
    /// Minimum shared footprint area for a match.
    pub min_overlap_area: f64,
    /// Projected triangles at or below this area are dropped.
    pub min_triangle_area: f64,
    /// Element types matched against targets.
    pub source_types: Vec<String>,
    /// Element types that receive `bot:hasElement` edges.
    pub target_types: Vec<String>,
    /// Accepted first characters of target names (case-insensitive). Empty
    /// accepts every target.
    pub target_prefixes: Vec<char>,
    /// Target GlobalIds that are never matched.
    pub excluded_targets: Vec<String>,
    /// Extension of model documents in the model directory.
    pub model_extension: String,
    /// Extension of graph documents in the graph directory.
    pub graph_extension: String,
}

impl LinkConfig {
    /// Load configuration from `LINKSET_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            tolerance_mm: std::env::var("LINKSET_TOLERANCE_MM")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .unwrap_or(0.0),
            min_overlap_area: std::env::var("LINKSET_MIN_OVERLAP_AREA")
                .unwrap_or_else(|_| DEFAULT_MIN_OVERLAP_AREA.to_string())
                .parse()
                .unwrap_or(DEFAULT_MIN_OVERLAP_AREA),
            min_triangle_area: std::env::var("LINKSET_MIN_TRIANGLE_AREA")
                .unwrap_or_else(|_| DEFAULT_MIN_TRIANGLE_AREA.to_string())
                .parse()
                .unwrap_or(DEFAULT_MIN_TRIANGLE_AREA),
            source_types: std::env::var("LINKSET_SOURCE_TYPES")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| DEFAULT_SOURCE_TYPES.iter().map(|s| s.to_string()).collect()),
            target_types: std::env::var("LINKSET_TARGET_TYPES")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec![DEFAULT_TARGET_TYPE.to_string()]),
            target_prefixes: std::env::var("LINKSET_TARGET_PREFIXES")
                .map(|v| parse_prefixes(&v))
                .unwrap_or_default(),
            excluded_targets: std::env::var("LINKSET_EXCLUDED_TARGETS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            model_extension: std::env::var("LINKSET_MODEL_EXTENSION")
                .unwrap_or_else(|_| "json".into()),
            graph_extension: std::env::var("LINKSET_GRAPH_EXTENSION")
                .unwrap_or_else(|_| "ttl".into()),
        }
    }

    /// Vertical tolerance in model units (metres).
    pub fn tolerance(&self) -> f64 {
        self.tolerance_mm / 1000.0
    }

    pub fn footprint_settings(&self) -> FootprintSettings {
        FootprintSettings {
            min_triangle_area: self.min_triangle_area,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            tolerance_mm: 0.0,
            min_overlap_area: DEFAULT_MIN_OVERLAP_AREA,
            min_triangle_area: DEFAULT_MIN_TRIANGLE_AREA,
            source_types: DEFAULT_SOURCE_TYPES.iter().map(|s| s.to_string()).collect(),
            target_types: vec![DEFAULT_TARGET_TYPE.to_string()],
            target_prefixes: Vec::new(),
            excluded_targets: Vec::new(),
            model_extension: "json".into(),
            graph_extension: "ttl".into(),
        }
    }
}

/// Comma-separated list, trimmed, empty entries dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Every non-separator character of `value`, lowercased (`"abcd"`, `"a,b"`).
pub fn parse_prefixes(value: &str) -> Vec<char> {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .flat_map(char::to_lowercase)
        .collect()
}
