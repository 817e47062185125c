// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing system, membership and spatial edges into the output graph.
//!
//! Elements are found in a graph through their GlobalId literal, one graph
//! at a time. Graphs are never merged; the only thing that crosses between
//! them is the edge written into the output graph.

use ifc_linkset_graph::{Graph, Term, Vocabulary};
use ifc_linkset_model::{expand_global_id, ModelSource};
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::matcher::MatchTable;

/// UUID used in a system IRI: the expanded GlobalId, or a name-based UUID of
/// the raw identifier when it is not a compressed GlobalId.
pub fn system_uuid(global_id: &str) -> Uuid {
    expand_global_id(global_id)
        .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, global_id.as_bytes()))
}

/// Triple counts and diagnostics of one linking step.
#[derive(Debug, Clone, Default)]
pub struct LinkOutcome {
    /// Triples newly inserted.
    pub added: usize,
    /// Triples that were already in the output graph.
    pub already_present: usize,
    pub diagnostics: Diagnostics,
}

impl LinkOutcome {
    fn record(&mut self, inserted: bool) {
        if inserted {
            self.added += 1;
        } else {
            self.already_present += 1;
        }
    }

    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: LinkOutcome) {
        self.added += other.added;
        self.already_present += other.already_present;
        self.diagnostics.append(other.diagnostics);
    }
}

/// Writes linkset edges using a fixed vocabulary.
#[derive(Debug, Clone, Default)]
pub struct GraphLinker {
    vocab: Vocabulary,
}

impl GraphLinker {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// First node in `graph` whose GlobalId property is `global_id`.
    pub fn resolve<'g>(&self, graph: &'g Graph, global_id: &str) -> Option<&'g Term> {
        graph.first_subject_with(&self.vocab.global_id, &Term::literal(global_id))
    }

    /// Adds one `brick:System` node per model system, reusing a node that
    /// already carries the system's GlobalId.
    pub fn add_system_instances<M>(&self, output: &mut Graph, model: &M) -> LinkOutcome
    where
        M: ModelSource + ?Sized,
    {
        let v = &self.vocab;
        let mut outcome = LinkOutcome::default();

        for system in model.systems() {
            let node = match self.resolve(output, &system.global_id) {
                Some(existing) => existing.clone(),
                None => v
                    .namespaces
                    .inst(&format!("system_{}", system_uuid(&system.global_id))),
            };

            let mut add = |p: &Term, o: Term| {
                let inserted = output.insert(node.clone(), p.clone(), o);
                outcome.record(inserted);
            };
            add(&v.rdf_type, v.system_class.clone());
            if let Some(name) = &system.name {
                add(&v.label, Term::literal(name));
            }
            if let Some(description) = &system.description {
                add(&v.description, Term::literal(description));
            }
            add(&v.global_id, Term::literal(&system.global_id));
            add(
                &v.same_as,
                v.namespaces.inst(&format!("ifcSystem_{}", system.local_id)),
            );
        }

        tracing::info!(
            systems = model.systems().len(),
            added = outcome.added,
            already_present = outcome.already_present,
            "Added system instances"
        );
        outcome
    }

    /// Links each system to its members with `brick:hasPart`.
    ///
    /// Systems are resolved in `output`, members in `member_graph`.
    /// Assignments whose group is not a system of `model` are ignored.
    pub fn link_system_members<M>(
        &self,
        output: &mut Graph,
        model: &M,
        member_graph: &Graph,
    ) -> LinkOutcome
    where
        M: ModelSource + ?Sized,
    {
        let mut outcome = LinkOutcome::default();

        for assignment in model.group_assignments() {
            if model.system(&assignment.group).is_none() {
                continue;
            }
            let Some(system) = self.resolve(output, &assignment.group).cloned() else {
                outcome.diagnostics.push(Diagnostic::UnresolvedSystem {
                    system: assignment.group.clone(),
                });
                continue;
            };

            for member in &assignment.members {
                let Some(node) = self.resolve(member_graph, member) else {
                    outcome.diagnostics.push(Diagnostic::UnresolvedMember {
                        system: assignment.group.clone(),
                        member: member.clone(),
                    });
                    continue;
                };
                let inserted = output.insert(system.clone(), self.vocab.has_part.clone(), node.clone());
                outcome.record(inserted);
            }
        }

        tracing::info!(
            linked = outcome.added,
            already_present = outcome.already_present,
            unresolved = outcome.diagnostics.len(),
            "Linked system members"
        );
        outcome
    }

    /// Links each matched target to its sources with `bot:hasElement`.
    ///
    /// Targets are resolved in `space_graph`, sources in `element_graph`.
    pub fn link_spaces(
        &self,
        output: &mut Graph,
        table: &MatchTable,
        space_graph: &Graph,
        element_graph: &Graph,
    ) -> LinkOutcome {
        let mut outcome = LinkOutcome::default();

        for target in table.targets() {
            let Some(space) = self.resolve(space_graph, target) else {
                outcome.diagnostics.push(Diagnostic::UnresolvedTarget {
                    target: target.to_string(),
                });
                continue;
            };

            for source in table.sources(target) {
                let Some(element) = self.resolve(element_graph, source) else {
                    outcome.diagnostics.push(Diagnostic::UnresolvedSource {
                        element: source.to_string(),
                        target: target.to_string(),
                    });
                    continue;
                };
                let inserted = output.insert(
                    space.clone(),
                    self.vocab.has_element.clone(),
                    element.clone(),
                );
                outcome.record(inserted);
            }
        }

        tracing::info!(
            linked = outcome.added,
            already_present = outcome.already_present,
            unresolved = outcome.diagnostics.len(),
            "Linked elements to spaces"
        );
        outcome
    }
}
