// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Namespace configuration and the predicates the linker writes.

use crate::graph::Graph;
use crate::term::Term;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// The namespaces a linking run works with.
///
/// `inst` is where new system nodes are minted; `props` is where the
/// identifier and description properties of the input graphs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    pub brick: String,
    pub bot: String,
    pub inst: String,
    pub props: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            brick: "https://brickschema.org/schema/Brick#".to_string(),
            bot: "https://w3id.org/bot#".to_string(),
            inst: "https://lbd.example.com/".to_string(),
            props: "http://lbd.arch.rwth-aachen.de/props#".to_string(),
        }
    }
}

impl Namespaces {
    /// Defaults overridden by `LINKSET_BRICK_NS`, `LINKSET_BOT_NS`,
    /// `LINKSET_INST_NS` and `LINKSET_PROPS_NS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Namespaces::from_env`], reading variables through `lookup`.
    /// Empty values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        let defaults = Self::default();
        Self {
            brick: get("LINKSET_BRICK_NS", defaults.brick),
            bot: get("LINKSET_BOT_NS", defaults.bot),
            inst: get("LINKSET_INST_NS", defaults.inst),
            props: get("LINKSET_PROPS_NS", defaults.props),
        }
    }

    /// Prefix bindings written to output documents.
    pub fn bindings(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("brick", self.brick.as_str()),
            ("bot", self.bot.as_str()),
            ("inst", self.inst.as_str()),
            ("rdf", RDF),
            ("rdfs", RDFS),
            ("owl", OWL),
            ("props", self.props.as_str()),
            ("xsd", XSD),
        ]
    }

    /// An empty graph with these namespaces bound.
    pub fn new_graph(&self) -> Graph {
        let mut graph = Graph::new();
        for (prefix, ns) in self.bindings() {
            graph.bind_prefix(prefix, ns);
        }
        graph
    }

    /// IRI in the instance namespace
    pub fn inst(&self, local: &str) -> Term {
        Term::Iri(format!("{}{}", self.inst, local))
    }
}

/// Predicate and class terms, resolved once against a [`Namespaces`].
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub namespaces: Namespaces,
    pub rdf_type: Term,
    pub label: Term,
    pub same_as: Term,
    pub system_class: Term,
    pub has_part: Term,
    pub has_element: Term,
    /// Property carrying the IFC GlobalId literal.
    pub global_id: Term,
    pub description: Term,
}

impl Vocabulary {
    pub fn new(namespaces: Namespaces) -> Self {
        let brick = |local: &str| Term::Iri(format!("{}{}", namespaces.brick, local));
        let props = |local: &str| Term::Iri(format!("{}{}", namespaces.props, local));
        Self {
            rdf_type: Term::Iri(format!("{RDF}type")),
            label: Term::Iri(format!("{RDFS}label")),
            same_as: Term::Iri(format!("{OWL}sameAs")),
            system_class: brick("System"),
            has_part: brick("hasPart"),
            has_element: Term::Iri(format!("{}hasElement", namespaces.bot)),
            global_id: props("globalIdIfcRoot_attribute_simple"),
            description: props("descriptionIfcRoot_attribute_simple"),
            namespaces,
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(Namespaces::default())
    }
}
