// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interned, set-backed triple storage.
//!
//! Every distinct term is stored once in a slot map and referenced by
//! [`TermKey`]. Triples are kept in insertion order for stable output and
//! mirrored in a hash set so that re-inserting an existing triple is detected
//! and ignored. The `(predicate, object)` index answers identifier lookups
//! without scanning the document.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::term::Term;

new_key_type! {
    /// Key for an interned term. Only meaningful within the graph that issued it.
    pub struct TermKey;
}

type TripleKeys = [TermKey; 3];

/// An RDF graph with prefix bindings.
#[derive(Debug, Default)]
pub struct Graph {
    terms: SlotMap<TermKey, Term>,
    interned: FxHashMap<Term, TermKey>,
    triples: Vec<TripleKeys>,
    triple_set: FxHashSet<TripleKeys>,
    // (predicate, object) → subjects, in insertion order
    by_predicate_object: FxHashMap<(TermKey, TermKey), SmallVec<[TermKey; 1]>>,
    prefixes: Vec<(String, String)>,
}

impl Graph {
    /// Creates an empty graph with no prefix bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `namespace` for serialization. Rebinding a prefix
    /// replaces its namespace.
    pub fn bind_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = namespace,
            None => self.prefixes.push((prefix, namespace)),
        }
    }

    /// Prefix bindings in binding order.
    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns the key of `term`, interning it if needed.
    pub fn intern(&mut self, term: Term) -> TermKey {
        if let Some(&key) = self.interned.get(&term) {
            return key;
        }
        let key = self.terms.insert(term.clone());
        self.interned.insert(term, key);
        key
    }

    /// Returns the key of `term` if the graph has seen it.
    pub fn key_of(&self, term: &Term) -> Option<TermKey> {
        self.interned.get(term).copied()
    }

    /// Resolves a key issued by this graph.
    pub fn term(&self, key: TermKey) -> Option<&Term> {
        self.terms.get(key)
    }

    /// Adds a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, subject: Term, predicate: Term, object: Term) -> bool {
        let s = self.intern(subject);
        let p = self.intern(predicate);
        let o = self.intern(object);
        self.insert_keys(s, p, o)
    }

    fn insert_keys(&mut self, s: TermKey, p: TermKey, o: TermKey) -> bool {
        let triple = [s, p, o];
        if !self.triple_set.insert(triple) {
            return false;
        }
        self.triples.push(triple);
        self.by_predicate_object.entry((p, o)).or_default().push(s);
        true
    }

    pub fn contains(&self, subject: &Term, predicate: &Term, object: &Term) -> bool {
        match (self.key_of(subject), self.key_of(predicate), self.key_of(object)) {
            (Some(s), Some(p), Some(o)) => self.triple_set.contains(&[s, p, o]),
            _ => false,
        }
    }

    /// All subjects with `predicate` = `object`, in insertion order.
    pub fn subjects_with<'a>(
        &'a self,
        predicate: &Term,
        object: &Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        let subjects = match (self.key_of(predicate), self.key_of(object)) {
            (Some(p), Some(o)) => self.by_predicate_object.get(&(p, o)),
            _ => None,
        };
        subjects
            .into_iter()
            .flatten()
            .filter_map(move |&s| self.terms.get(s))
    }

    /// The first subject inserted with `predicate` = `object`.
    pub fn first_subject_with(&self, predicate: &Term, object: &Term) -> Option<&Term> {
        self.subjects_with(predicate, object).next()
    }

    /// Objects of `subject` via `predicate`, in insertion order. Linear scan.
    pub fn objects_of<'a>(
        &'a self,
        subject: &Term,
        predicate: &Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        let keys = self.key_of(subject).zip(self.key_of(predicate));
        self.triples
            .iter()
            .filter(move |t| keys.map_or(false, |(s, p)| t[0] == s && t[1] == p))
            .filter_map(move |t| self.terms.get(t[2]))
    }

    /// Number of triples using `predicate`.
    pub fn count_with_predicate(&self, predicate: &Term) -> usize {
        match self.key_of(predicate) {
            Some(p) => self.triples.iter().filter(|t| t[1] == p).count(),
            None => 0,
        }
    }

    /// Iterates all triples in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = (&Term, &Term, &Term)> + '_ {
        self.triples.iter().filter_map(move |[s, p, o]| {
            Some((self.terms.get(*s)?, self.terms.get(*p)?, self.terms.get(*o)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GID: &str = "http://lbd.arch.rwth-aachen.de/props#globalIdIfcRoot_attribute_simple";

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut g = Graph::new();
        assert!(g.insert(Term::iri("s"), Term::iri("p"), Term::iri("o")));
        assert!(!g.insert(Term::iri("s"), Term::iri("p"), Term::iri("o")));
        assert_eq!(g.len(), 1);
        assert!(g.contains(&Term::iri("s"), &Term::iri("p"), &Term::iri("o")));
        assert!(!g.contains(&Term::iri("o"), &Term::iri("p"), &Term::iri("s")));
    }

    #[test]
    fn first_subject_follows_insertion_order() {
        let mut g = Graph::new();
        g.insert(Term::iri("b"), Term::iri(GID), Term::literal("guid-1"));
        g.insert(Term::iri("a"), Term::iri(GID), Term::literal("guid-1"));
        g.insert(Term::iri("c"), Term::iri(GID), Term::literal("guid-2"));

        let first = g.first_subject_with(&Term::iri(GID), &Term::literal("guid-1"));
        assert_eq!(first, Some(&Term::iri("b")));
        assert_eq!(
            g.subjects_with(&Term::iri(GID), &Term::literal("guid-1")).count(),
            2
        );
        assert!(g
            .first_subject_with(&Term::iri(GID), &Term::literal("missing"))
            .is_none());
    }

    #[test]
    fn objects_and_predicate_counts() {
        let mut g = Graph::new();
        g.insert(Term::iri("s"), Term::iri("p"), Term::iri("o1"));
        g.insert(Term::iri("s"), Term::iri("p"), Term::iri("o2"));
        g.insert(Term::iri("s"), Term::iri("q"), Term::iri("o3"));

        let objects: Vec<_> = g.objects_of(&Term::iri("s"), &Term::iri("p")).collect();
        assert_eq!(objects, vec![&Term::iri("o1"), &Term::iri("o2")]);
        assert_eq!(g.count_with_predicate(&Term::iri("p")), 2);
        assert_eq!(g.count_with_predicate(&Term::iri("missing")), 0);
    }

    #[test]
    fn intern_is_stable() {
        let mut g = Graph::new();
        let k1 = g.intern(Term::literal("x"));
        let k2 = g.intern(Term::literal("x"));
        assert_eq!(k1, k2);
        assert_eq!(g.term(k1), Some(&Term::literal("x")));
        assert!(g.is_empty());
    }

    #[test]
    fn rebinding_prefix_replaces_namespace() {
        let mut g = Graph::new();
        g.bind_prefix("inst", "https://a.example/");
        g.bind_prefix("inst", "https://b.example/");
        assert_eq!(
            g.prefixes(),
            &[("inst".to_string(), "https://b.example/".to_string())]
        );
    }
}
