//! Graph port: the minimal triple-store contract the engine consumes.
//!
//! The engine never owns triples; it borrows them through [`GraphPort`].
//! Any store that can add/remove a triple, test containment, and answer
//! wildcard pattern queries can back a model. [`MemGraph`] is the bundled
//! in-memory reference implementation (DashMap-sharded subject index).
//!
//! Thread model: single writer, multiple readers per underlying graph.
//! A port is not required to be thread-safe beyond that; callers wanting
//! full concurrency wrap the port in a read/write-lock adapter.

pub mod union;

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::error::GraphError;
use crate::term::{Term, Triple};

/// Size report of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSize {
    /// The graph holds exactly this many triples.
    Bounded(usize),
    /// The graph cannot (cheaply) report a triple count.
    Unbounded,
}

/// The minimal contract a triple store must satisfy to back a model.
///
/// `find` is a wildcard pattern match: `None` in a position means "any".
/// Implementations materialize results; the engine deduplicates across
/// composed graphs itself and never assumes a live cursor.
pub trait GraphPort: Send + Sync {
    /// All triples matching the pattern.
    fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<Triple>;

    /// Whether the exact triple is present.
    fn contains(&self, triple: &Triple) -> bool;

    /// Add a triple. Returns `true` if the graph changed.
    fn add(&self, triple: Triple) -> Result<bool, GraphError>;

    /// Remove a triple. Returns `true` if the graph changed.
    fn remove(&self, triple: &Triple) -> Result<bool, GraphError>;

    /// Triple count, if the store can report one.
    fn size(&self) -> GraphSize;

    /// Whether `find` results are duplicate-free.
    fn is_distinct(&self) -> bool {
        true
    }

    /// Whether [`GraphPort::size`] is exact.
    fn is_sized(&self) -> bool {
        true
    }

    /// Human-readable name for diagnostics (import-tree rendering).
    fn name(&self) -> String {
        "graph".to_string()
    }
}

/// In-memory triple store with a sharded subject index.
///
/// Duplicate-free by construction; wildcard-subject queries scan all
/// shards and are O(n). Good enough for models of ontology scale; larger
/// corpora plug in their own [`GraphPort`].
#[derive(Debug)]
pub struct MemGraph {
    /// Subject → set of triples with that subject.
    by_subject: DashMap<Term, Vec<Triple>>,
    /// Triple count across all shards.
    count: AtomicUsize,
    /// Diagnostic name.
    name: String,
}

impl MemGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::named("mem")
    }

    /// Create an empty graph with a diagnostic name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            by_subject: DashMap::new(),
            count: AtomicUsize::new(0),
            name: name.into(),
        }
    }

    /// Snapshot of every triple in the graph.
    pub fn triples(&self) -> Vec<Triple> {
        self.by_subject
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for MemGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphPort for MemGraph {
    fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<Triple> {
        match s {
            Some(subject) => self
                .by_subject
                .get(subject)
                .map(|entry| {
                    entry
                        .value()
                        .iter()
                        .filter(|t| t.matches(None, p, o))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            None => self
                .by_subject
                .iter()
                .flat_map(|entry| {
                    entry
                        .value()
                        .iter()
                        .filter(|t| t.matches(None, p, o))
                        .cloned()
                        .collect::<Vec<_>>()
                })
                .collect(),
        }
    }

    fn contains(&self, triple: &Triple) -> bool {
        self.by_subject
            .get(&triple.subject)
            .is_some_and(|entry| entry.value().contains(triple))
    }

    fn add(&self, triple: Triple) -> Result<bool, GraphError> {
        let mut entry = self.by_subject.entry(triple.subject.clone()).or_default();
        if entry.value().contains(&triple) {
            return Ok(false);
        }
        entry.value_mut().push(triple);
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(true)
    }

    fn remove(&self, triple: &Triple) -> Result<bool, GraphError> {
        let Some(mut entry) = self.by_subject.get_mut(&triple.subject) else {
            return Ok(false);
        };
        let before = entry.value().len();
        entry.value_mut().retain(|t| t != triple);
        let removed = before - entry.value().len();
        if removed > 0 {
            self.count.fetch_sub(removed, Ordering::Relaxed);
            return Ok(true);
        }
        Ok(false)
    }

    fn size(&self) -> GraphSize {
        GraphSize::Bounded(self.count.load(Ordering::Relaxed))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(Term::iri(s), Term::iri(p), Term::iri(o))
    }

    #[test]
    fn add_contains_remove() {
        let g = MemGraph::new();
        let triple = t("urn:s", "urn:p", "urn:o");
        assert!(g.add(triple.clone()).unwrap());
        assert!(g.contains(&triple));
        assert_eq!(g.size(), GraphSize::Bounded(1));
        assert!(g.remove(&triple).unwrap());
        assert!(!g.contains(&triple));
        assert_eq!(g.size(), GraphSize::Bounded(0));
    }

    #[test]
    fn duplicate_add_is_noop() {
        let g = MemGraph::new();
        let triple = t("urn:s", "urn:p", "urn:o");
        assert!(g.add(triple.clone()).unwrap());
        assert!(!g.add(triple).unwrap());
        assert_eq!(g.size(), GraphSize::Bounded(1));
    }

    #[test]
    fn wildcard_find() {
        let g = MemGraph::new();
        g.add(t("urn:s", "urn:p", "urn:a")).unwrap();
        g.add(t("urn:s", "urn:p", "urn:b")).unwrap();
        g.add(t("urn:x", "urn:q", "urn:a")).unwrap();

        assert_eq!(g.find(Some(&Term::iri("urn:s")), None, None).len(), 2);
        assert_eq!(g.find(None, Some(&Term::iri("urn:q")), None).len(), 1);
        assert_eq!(g.find(None, None, Some(&Term::iri("urn:a"))).len(), 2);
        assert_eq!(g.find(None, None, None).len(), 3);
    }
}
