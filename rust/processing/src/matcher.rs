// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storey-by-storey spatial matching of source elements to targets.
//!
//! Storeys are paired on rounded elevation. Within a storey every source
//! element is tested against every accepted target: first the vertical
//! bands must touch (or the source must sit at most `tolerance` above the
//! target), then the exact footprints must share at least
//! `min_overlap_area`.

use std::collections::{BTreeMap, BTreeSet};

use ifc_linkset_geometry::{extract_geometry, ElementGeometry, FootprintSettings};
use ifc_linkset_model::{Element, ModelSource};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::config::LinkConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::storey::{map_elements_to_storeys, StoreyGroup};

/// Which target elements take part in matching.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    prefixes: Vec<char>,
    excluded: FxHashSet<String>,
}

impl TargetFilter {
    /// `prefixes` are compared case-insensitively against the first
    /// character of the target name; empty accepts every name.
    pub fn new<I, S>(prefixes: &[char], excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.iter().flat_map(|c| c.to_lowercase()).collect(),
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, element: &Element) -> bool {
        if self.excluded.contains(&element.global_id) {
            return false;
        }
        if self.prefixes.is_empty() {
            return true;
        }
        element
            .name
            .as_deref()
            .and_then(|name| name.chars().next())
            .is_some_and(|first| first.to_lowercase().all(|c| self.prefixes.contains(&c)))
    }
}

/// Resolved geometry per element identifier, shared across storeys and
/// document pairs. Failed extractions are remembered so they are reported
/// once.
#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: FxHashMap<String, Option<ElementGeometry>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, global_id: &str) -> Option<&ElementGeometry> {
        self.entries.get(global_id).and_then(Option::as_ref)
    }

    /// Extracts every element not seen before, in parallel.
    pub fn warm(
        &mut self,
        elements: &[&Element],
        settings: &FootprintSettings,
        diagnostics: &mut Diagnostics,
    ) {
        let mut seen = FxHashSet::default();
        let mut missing = Vec::new();
        for &element in elements {
            let id = element.global_id.as_str();
            if !self.entries.contains_key(id) && seen.insert(id) {
                missing.push(element);
            }
        }

        let extracted = extract_all(&missing, settings, diagnostics);
        self.entries.extend(extracted);
    }
}

/// Extracts geometry for `elements` on the rayon pool. Failures are recorded
/// as diagnostics and yield `None`.
fn extract_all(
    elements: &[&Element],
    settings: &FootprintSettings,
    diagnostics: &mut Diagnostics,
) -> Vec<(String, Option<ElementGeometry>)> {
    let results: Vec<_> = elements
        .par_iter()
        .map(|element| (element, extract_geometry(&element.mesh, settings)))
        .collect();

    results
        .into_iter()
        .map(|(element, result)| {
            let geometry = match result {
                Ok(geometry) => Some(geometry),
                Err(err) => {
                    diagnostics.push(Diagnostic::GeometryExtraction {
                        element: element.global_id.clone(),
                        reason: err.to_string(),
                    });
                    None
                }
            };
            (element.global_id.clone(), geometry)
        })
        .collect()
}

/// Target identifier → matched source identifiers.
///
/// A pair found twice (through containment and aggregation, or on two
/// storeys) is stored once. Iteration is ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchTable(BTreeMap<String, BTreeSet<String>>);

impl MatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a match. `false` if the pair was already present.
    pub fn insert(&mut self, target: impl Into<String>, source: impl Into<String>) -> bool {
        self.0.entry(target.into()).or_default().insert(source.into())
    }

    /// Targets with at least one match, in order.
    pub fn targets(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Sources matched to `target`.
    pub fn sources(&self, target: &str) -> impl Iterator<Item = &str> + '_ {
        self.0.get(target).into_iter().flatten().map(String::as_str)
    }

    pub fn contains(&self, target: &str, source: &str) -> bool {
        self.0.get(target).is_some_and(|s| s.contains(source))
    }

    /// Number of targets with at least one match.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of (target, source) pairs.
    pub fn pair_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// All `(target, source)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0
            .iter()
            .flat_map(|(t, sources)| sources.iter().map(move |s| (t.as_str(), s.as_str())))
    }
}

/// Result of matching one source model against the targets.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub table: MatchTable,
    pub diagnostics: Diagnostics,
}

/// Matches source storeys against target storeys.
#[derive(Debug, Clone)]
pub struct SpatialMatcher {
    settings: FootprintSettings,
    tolerance: f64,
    min_overlap_area: f64,
    filter: TargetFilter,
}

impl SpatialMatcher {
    /// `tolerance` is in model units.
    pub fn new(settings: FootprintSettings, tolerance: f64, min_overlap_area: f64) -> Self {
        Self {
            settings,
            tolerance,
            min_overlap_area,
            filter: TargetFilter::default(),
        }
    }

    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(
            config.footprint_settings(),
            config.tolerance(),
            config.min_overlap_area,
        )
        .with_filter(TargetFilter::new(
            &config.target_prefixes,
            config.excluded_targets.iter().cloned(),
        ))
    }

    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Groups both models by storey and matches them.
    pub fn match_models<S, T>(
        &self,
        source: &S,
        source_types: &[String],
        target: &T,
        target_types: &[String],
        cache: &mut GeometryCache,
    ) -> MatchOutcome
    where
        S: ModelSource + ?Sized,
        T: ModelSource + ?Sized,
    {
        let source_groups = map_elements_to_storeys(source, source_types);
        let target_groups = map_elements_to_storeys(target, target_types);
        self.match_storeys(&source_groups, &target_groups, cache)
    }

    /// Matches every source storey against the target storeys at the same
    /// rounded elevation.
    pub fn match_storeys(
        &self,
        sources: &[StoreyGroup<'_>],
        targets: &[StoreyGroup<'_>],
        cache: &mut GeometryCache,
    ) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();

        // Storeys sharing an elevation are merged.
        let mut by_elevation: FxHashMap<i64, Vec<&Element>> = FxHashMap::default();
        let mut indexed: FxHashSet<(i64, &str)> = FxHashSet::default();
        for group in targets {
            let elevation = group.key.elevation;
            let candidates = by_elevation.entry(elevation).or_default();
            for &element in &group.elements {
                if self.filter.accepts(element)
                    && indexed.insert((elevation, element.global_id.as_str()))
                {
                    candidates.push(element);
                }
            }
        }

        for group in sources {
            let Some(candidates) = by_elevation.get(&group.key.elevation) else {
                outcome.diagnostics.push(Diagnostic::ElevationMismatch {
                    storey: group.key.name.clone(),
                    elevation: group.key.elevation,
                });
                continue;
            };

            cache.warm(candidates, &self.settings, &mut outcome.diagnostics);

            let mut seen = FxHashSet::default();
            let mut unique = Vec::with_capacity(group.elements.len());
            for &element in &group.elements {
                if seen.insert(element.global_id.as_str()) {
                    unique.push(element);
                }
            }
            let extracted = extract_all(&unique, &self.settings, &mut outcome.diagnostics);

            let before = outcome.table.pair_count();
            for (source_id, geometry) in &extracted {
                let Some(source) = geometry else { continue };
                for candidate in candidates {
                    let Some(target) = cache.get(&candidate.global_id) else {
                        continue;
                    };
                    if self.is_match(source, target) {
                        outcome.table.insert(&candidate.global_id, source_id);
                    }
                }
            }

            tracing::debug!(
                storey = %group.key.name,
                elevation = group.key.elevation,
                sources = unique.len(),
                candidates = candidates.len(),
                matches = outcome.table.pair_count() - before,
                "Matched storey"
            );
        }

        tracing::info!(
            source_storeys = sources.len(),
            target_storeys = targets.len(),
            targets_matched = outcome.table.len(),
            pairs = outcome.table.pair_count(),
            diagnostics = outcome.diagnostics.len(),
            "Spatial matching complete"
        );

        outcome
    }

    /// Vertical band first, then footprint overlap.
    pub fn is_match(&self, source: &ElementGeometry, target: &ElementGeometry) -> bool {
        source.extent.is_aligned_with(&target.extent, self.tolerance)
            && source
                .footprint
                .overlaps(&target.footprint, self.min_overlap_area)
    }
}
