// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch runs over directories of model and graph documents.
//!
//! A run pairs documents by file stem, links every system to its members
//! across all pairs, then matches each pair's elements against one shared
//! target model and links them to the target graph's spaces. All edges go
//! into a single output graph which is saved at the end.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ifc_linkset_graph::{Graph, Namespaces, Vocabulary};
use ifc_linkset_model::ModelDocument;
use serde::Serialize;

use crate::config::LinkConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::linker::{GraphLinker, LinkOutcome};
use crate::matcher::{GeometryCache, SpatialMatcher};

/// A model document and the graph document describing the same elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    pub stem: String,
    pub model: PathBuf,
    pub graph: PathBuf,
}

/// Result of pairing two directories by file stem. Every list is sorted by
/// stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPairing {
    pub pairs: Vec<DocumentPair>,
    /// Model documents without a graph document.
    pub missing_graph: Vec<PathBuf>,
    /// Graph documents without a model document.
    pub missing_model: Vec<PathBuf>,
}

impl DocumentPairing {
    /// One diagnostic per unpaired document.
    pub fn diagnostics(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for path in &self.missing_graph {
            diagnostics.push(Diagnostic::MissingGraphDocument {
                stem: file_stem(path),
                path: path.clone(),
            });
        }
        for path in &self.missing_model {
            diagnostics.push(Diagnostic::MissingModelDocument {
                stem: file_stem(path),
                path: path.clone(),
            });
        }
        diagnostics
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Files in `dir` with extension `ext` (case-insensitive), keyed by stem.
fn documents_by_stem(dir: &Path, ext: &str) -> Result<BTreeMap<String, PathBuf>> {
    let read_dir = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut documents = BTreeMap::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir)? {
        let path = entry.map_err(read_dir)?.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if path.is_file() && matches_ext {
            documents.insert(file_stem(&path), path);
        }
    }
    Ok(documents)
}

/// Pairs model and graph documents that share a file stem.
pub fn pair_documents(
    model_dir: impl AsRef<Path>,
    graph_dir: impl AsRef<Path>,
    model_ext: &str,
    graph_ext: &str,
) -> Result<DocumentPairing> {
    let models = documents_by_stem(model_dir.as_ref(), model_ext)?;
    let mut graphs = documents_by_stem(graph_dir.as_ref(), graph_ext)?;

    let mut pairing = DocumentPairing::default();
    for (stem, model) in models {
        match graphs.remove(&stem) {
            Some(graph) => pairing.pairs.push(DocumentPair { stem, model, graph }),
            None => pairing.missing_graph.push(model),
        }
    }
    pairing.missing_model = graphs.into_values().collect();

    tracing::info!(
        pairs = pairing.pairs.len(),
        missing_graph = pairing.missing_graph.len(),
        missing_model = pairing.missing_model.len(),
        "Paired documents"
    );
    Ok(pairing)
}

/// A document pair loaded into memory.
#[derive(Debug)]
pub struct LoadedPair {
    pub stem: String,
    pub model: ModelDocument,
    pub graph: Graph,
}

/// Per-pair numbers of the spatial phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairReport {
    pub stem: String,
    pub matches: usize,
    pub linked: usize,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub pairs_processed: usize,
    pub missing_graph: usize,
    pub missing_model: usize,
    /// `brick:System` nodes in the output graph.
    pub systems: usize,
    pub members_linked: usize,
    pub spaces_linked: usize,
    /// Triples that were already present when inserted.
    pub already_present: usize,
    pub triples: usize,
    pub pairs: Vec<PairReport>,
    pub diagnostics: Diagnostics,
}

impl BatchReport {
    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| Error::Report {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where a batch run reads and writes.
#[derive(Debug, Clone)]
pub struct BatchInputs {
    pub model_dir: PathBuf,
    pub graph_dir: PathBuf,
    pub target_model: PathBuf,
    pub target_graph: PathBuf,
    pub output: PathBuf,
}

/// Drives a batch run and owns the accumulating output graph.
pub struct BatchCoordinator {
    config: LinkConfig,
    linker: GraphLinker,
    matcher: SpatialMatcher,
    cache: GeometryCache,
    output: Graph,
    report: BatchReport,
}

impl BatchCoordinator {
    pub fn new(config: LinkConfig, namespaces: Namespaces) -> Self {
        let output = namespaces.new_graph();
        Self {
            matcher: SpatialMatcher::from_config(&config),
            linker: GraphLinker::new(Vocabulary::new(namespaces)),
            cache: GeometryCache::new(),
            output,
            report: BatchReport::default(),
            config,
        }
    }

    pub fn output(&self) -> &Graph {
        &self.output
    }

    pub fn into_output(self) -> Graph {
        self.output
    }

    pub fn report(&self) -> &BatchReport {
        &self.report
    }

    /// Loads every pair. A pair whose model or graph fails to load is
    /// reported and left out.
    pub fn load_pairs(&mut self, pairing: &DocumentPairing) -> Vec<LoadedPair> {
        let mut loaded = Vec::with_capacity(pairing.pairs.len());
        for pair in &pairing.pairs {
            let model = ModelDocument::load(&pair.model).map_err(|e| (&pair.model, e.to_string()));
            let graph = model
                .and_then(|model| {
                    Graph::load(&pair.graph)
                        .map(|graph| (model, graph))
                        .map_err(|e| (&pair.graph, e.to_string()))
                });
            match graph {
                Ok((model, graph)) => loaded.push(LoadedPair {
                    stem: pair.stem.clone(),
                    model,
                    graph,
                }),
                Err((path, reason)) => self.report.diagnostics.push(Diagnostic::DocumentLoad {
                    path: path.clone(),
                    reason,
                }),
            }
        }
        loaded
    }

    /// Adds system nodes and `brick:hasPart` edges for every pair.
    pub fn link_systems(&mut self, pairs: &[LoadedPair]) -> LinkOutcome {
        let mut total = LinkOutcome::default();
        for pair in pairs {
            tracing::info!(stem = %pair.stem, "Linking systems");
            total.merge(self.linker.add_system_instances(&mut self.output, &pair.model));

            let members =
                self.linker
                    .link_system_members(&mut self.output, &pair.model, &pair.graph);
            self.report.members_linked += members.added;
            total.merge(members);
        }

        let vocab = self.linker.vocabulary();
        self.report.systems = self
            .output
            .subjects_with(&vocab.rdf_type, &vocab.system_class)
            .count();
        self.report.already_present += total.already_present;
        self.report.diagnostics.append(total.diagnostics.clone());
        total
    }

    /// Matches every pair against the target model and adds
    /// `bot:hasElement` edges from target spaces to matched elements.
    pub fn link_spaces(
        &mut self,
        pairs: &[LoadedPair],
        target_model: &ModelDocument,
        target_graph: &Graph,
    ) -> LinkOutcome {
        let mut total = LinkOutcome::default();
        for pair in pairs {
            tracing::info!(stem = %pair.stem, "Matching elements to spaces");
            let matched = self.matcher.match_models(
                &pair.model,
                &self.config.source_types,
                target_model,
                &self.config.target_types,
                &mut self.cache,
            );
            let linked =
                self.linker
                    .link_spaces(&mut self.output, &matched.table, target_graph, &pair.graph);

            self.report.pairs.push(PairReport {
                stem: pair.stem.clone(),
                matches: matched.table.pair_count(),
                linked: linked.added,
            });
            self.report.pairs_processed += 1;
            self.report.spaces_linked += linked.added;

            total.diagnostics.append(matched.diagnostics);
            total.merge(linked);
        }

        self.report.already_present += total.already_present;
        self.report.diagnostics.append(total.diagnostics.clone());
        total
    }

    /// Load the shared target model and graph, or record why not.
    fn load_targets(&mut self, inputs: &BatchInputs) -> Option<(ModelDocument, Graph)> {
        let model = ModelDocument::load(&inputs.target_model)
            .map_err(|e| (&inputs.target_model, e.to_string()));
        let graph = Graph::load(&inputs.target_graph).map_err(|e| (&inputs.target_graph, e.to_string()));
        let mut failed = |(path, reason): (&PathBuf, String)| {
            self.report.diagnostics.push(Diagnostic::DocumentLoad {
                path: path.clone(),
                reason,
            });
        };
        match (model, graph) {
            (Ok(model), Ok(graph)) => Some((model, graph)),
            (Err(m), Err(g)) => {
                failed(m);
                failed(g);
                None
            }
            (Err(e), _) | (_, Err(e)) => {
                failed(e);
                None
            }
        }
    }

    /// Full run: pair, load, link systems, link spaces, save.
    ///
    /// Only listing the input directories and saving the output are fatal.
    /// An unreadable pair or target is a diagnostic; a missing target only
    /// disables spatial linking.
    pub fn run(&mut self, inputs: &BatchInputs) -> Result<BatchReport> {
        let start = std::time::Instant::now();

        let pairing = pair_documents(
            &inputs.model_dir,
            &inputs.graph_dir,
            &self.config.model_extension,
            &self.config.graph_extension,
        )?;
        self.report.missing_graph = pairing.missing_graph.len();
        self.report.missing_model = pairing.missing_model.len();
        self.report.diagnostics.append(pairing.diagnostics());

        let targets = self.load_targets(inputs);

        let pairs = self.load_pairs(&pairing);
        self.link_systems(&pairs);
        match &targets {
            Some((target_model, target_graph)) => {
                self.link_spaces(&pairs, target_model, target_graph);
            }
            None => tracing::warn!("Target documents unavailable, skipping spatial linking"),
        }

        self.output.save(&inputs.output).map_err(Error::Save)?;
        self.report.triples = self.output.len();

        tracing::info!(
            pairs = self.report.pairs_processed,
            systems = self.report.systems,
            members_linked = self.report.members_linked,
            spaces_linked = self.report.spaces_linked,
            triples = self.report.triples,
            diagnostics = self.report.diagnostics.len(),
            total_time_ms = start.elapsed().as_millis(),
            output = %inputs.output.display(),
            "Batch complete"
        );
        Ok(self.report.clone())
    }
}
