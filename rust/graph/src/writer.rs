// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turtle and N-Triples output.

use std::fmt::Write as _;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::namespace::RDF;
use crate::term::{escape_literal, Term};

impl Graph {
    /// Serializes as Turtle: bound prefixes first, then one block per
    /// subject in first-appearance order.
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        for (prefix, ns) in self.prefixes() {
            let _ = writeln!(out, "@prefix {prefix}: <{ns}> .");
        }
        if !self.prefixes().is_empty() {
            out.push('\n');
        }

        let mut order: Vec<&Term> = Vec::new();
        let mut blocks: FxHashMap<&Term, Vec<(&Term, &Term)>> = FxHashMap::default();
        for (s, p, o) in self.triples() {
            blocks
                .entry(s)
                .or_insert_with(|| {
                    order.push(s);
                    Vec::new()
                })
                .push((p, o));
        }

        let rdf_type = Term::Iri(format!("{RDF}type"));
        for subject in order {
            out.push_str(&self.compact(subject));
            let pairs = &blocks[subject];
            for (i, (p, o)) in pairs.iter().enumerate() {
                let sep = if i == 0 { " " } else { " ;\n    " };
                let predicate = if **p == rdf_type {
                    "a".to_string()
                } else {
                    self.compact(p)
                };
                let _ = write!(out, "{sep}{predicate} {}", self.compact(o));
            }
            out.push_str(" .\n\n");
        }
        out
    }

    /// Serializes as N-Triples, one triple per line in insertion order.
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for (s, p, o) in self.triples() {
            let _ = writeln!(out, "{s} {p} {o} .");
        }
        out
    }

    /// Writes the graph to `path`: N-Triples for `.nt`, Turtle otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("nt") => self.to_ntriples(),
            _ => self.to_turtle(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Turtle rendering of a term, using a bound prefix when the local part
    /// is safe to write unescaped.
    fn compact(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.compact_iri(iri),
            Term::Literal(lit) => {
                let mut s = format!("\"{}\"", escape_literal(&lit.value));
                if let Some(lang) = &lit.language {
                    let _ = write!(s, "@{lang}");
                } else if let Some(dt) = &lit.datatype {
                    let _ = write!(s, "^^{}", self.compact_iri(dt));
                }
                s
            }
            Term::Blank(_) => term.to_string(),
        }
    }

    fn compact_iri(&self, iri: &str) -> String {
        self.prefixes()
            .iter()
            .filter_map(|(prefix, ns)| {
                let local = iri.strip_prefix(ns.as_str())?;
                is_safe_local(local).then(|| format!("{prefix}:{local}"))
            })
            .next()
            .unwrap_or_else(|| format!("<{iri}>"))
    }
}

fn is_safe_local(local: &str) -> bool {
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !local.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Namespaces;
    use crate::term::Literal;

    fn sample() -> Graph {
        let ns = Namespaces::default();
        let mut g = ns.new_graph();
        let system = ns.inst("system_0f3a");
        g.insert(
            system.clone(),
            Term::iri(format!("{RDF}type")),
            Term::iri(format!("{}System", ns.brick)),
        );
        g.insert(
            system.clone(),
            Term::iri("http://www.w3.org/2000/01/rdf-schema#label"),
            Term::literal("Supply \"A\""),
        );
        g.insert(
            system,
            Term::iri(format!("{}hasPart", ns.brick)),
            ns.inst("duct$1"),
        );
        g.insert(
            ns.inst("space_1"),
            Term::iri(format!("{}area", ns.props)),
            Term::Literal(Literal::typed("12.5", "http://www.w3.org/2001/XMLSchema#decimal")),
        );
        g
    }

    #[test]
    fn turtle_groups_by_subject_and_compacts() {
        let ttl = sample().to_turtle();

        assert!(ttl.contains("@prefix brick: <https://brickschema.org/schema/Brick#> ."));
        assert!(ttl.contains(
            "inst:system_0f3a a brick:System ;\n    rdfs:label \"Supply \\\"A\\\"\" ;\n    brick:hasPart <https://lbd.example.com/duct$1> .\n"
        ));
        assert!(ttl.contains("inst:space_1 props:area \"12.5\"^^xsd:decimal ."));
    }

    #[test]
    fn turtle_output_reads_back() {
        let original = sample();
        let reread = Graph::parse_turtle(&original.to_turtle()).unwrap();

        assert_eq!(reread.len(), original.len());
        for (s, p, o) in original.triples() {
            assert!(reread.contains(s, p, o), "missing {s} {p} {o}");
        }
    }

    #[test]
    fn ntriples_output() {
        let nt = sample().to_ntriples();
        assert_eq!(nt.lines().count(), 4);
        assert!(nt.starts_with(
            "<https://lbd.example.com/system_0f3a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://brickschema.org/schema/Brick#System> .\n"
        ));
    }

    #[test]
    fn save_picks_format_by_extension() {
        let dir = std::env::temp_dir().join(format!("linkset-writer-{}", std::process::id()));
        let ttl = dir.join("out.ttl");
        let nt = dir.join("nested/out.nt");

        let g = sample();
        g.save(&ttl).unwrap();
        g.save(&nt).unwrap();

        assert!(std::fs::read_to_string(&ttl).unwrap().starts_with("@prefix"));
        assert!(std::fs::read_to_string(&nt).unwrap().starts_with('<'));
        assert_eq!(Graph::load(&nt).unwrap().len(), 4);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
