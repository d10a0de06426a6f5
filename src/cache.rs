//! Node cache and recursion guard for typed-view resolution.
//!
//! The cache memoizes which views a term has already resolved to, scoped
//! to one model; every mutation entry point invalidates the terms the
//! mutated triple touches. The recursion guard is an explicit value
//! threaded through a single resolution call chain — never a hidden
//! static — so re-entrant resolution of the same term fails fast instead
//! of looping.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::error::ViewError;
use crate::term::Term;
use crate::view::ViewKind;

/// Per-model memo of term → views it is known to hold.
///
/// Positive entries only: absence means "not resolved yet", never "not
/// eligible". Safe for concurrent reads; callers serialize cache-affecting
/// mutation with graph mutation.
#[derive(Debug, Default)]
pub struct NodeCache {
    resolved: DashMap<Term, HashSet<ViewKind>>,
}

impl NodeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `term` is cached as holding `kind`.
    pub fn hit(&self, term: &Term, kind: ViewKind) -> bool {
        self.resolved
            .get(term)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// All views `term` is cached as holding.
    pub fn kinds(&self, term: &Term) -> Vec<ViewKind> {
        self.resolved
            .get(term)
            .map(|kinds| kinds.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Record a successful resolution.
    pub fn insert(&self, term: Term, kind: ViewKind) {
        self.resolved.entry(term).or_default().insert(kind);
    }

    /// Drop everything cached about `term`.
    ///
    /// Called from every mutation entry point for each term incident to
    /// the mutated triple.
    pub fn invalidate(&self, term: &Term) {
        if self.resolved.remove(term).is_some() {
            tracing::trace!(%term, "cache invalidated");
        }
    }

    /// Drop the whole cache (imports changed: anything may re-resolve).
    pub fn clear(&self) {
        self.resolved.clear();
    }

    /// Number of cached terms.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Set of terms currently being resolved on this call chain.
///
/// One guard is created per top-level resolution and passed `&mut` down;
/// entries are removed on scope exit even when resolution fails, so no
/// state leaks across unrelated top-level calls.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    in_flight: HashSet<Term>,
}

impl RecursionGuard {
    /// Create an empty guard for a fresh top-level resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `term` is already being resolved on this chain.
    pub fn is_active(&self, term: &Term) -> bool {
        self.in_flight.contains(term)
    }

    /// Run `f` with `term` marked in-flight.
    ///
    /// Fails with [`ViewError::Recursion`] if `term` is already in flight.
    /// The mark is removed after `f` returns, on both success and error.
    pub fn scoped<T>(
        &mut self,
        term: &Term,
        f: impl FnOnce(&mut RecursionGuard) -> Result<T, ViewError>,
    ) -> Result<T, ViewError> {
        if !self.in_flight.insert(term.clone()) {
            return Err(ViewError::Recursion { term: term.clone() });
        }
        let result = f(self);
        self.in_flight.remove(term);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_insert_hit_invalidate() {
        let cache = NodeCache::new();
        let term = Term::iri("urn:a");
        assert!(!cache.hit(&term, ViewKind::Class));
        cache.insert(term.clone(), ViewKind::Class);
        cache.insert(term.clone(), ViewKind::NamedIndividual);
        assert!(cache.hit(&term, ViewKind::Class));
        assert_eq!(cache.kinds(&term).len(), 2);
        cache.invalidate(&term);
        assert!(!cache.hit(&term, ViewKind::Class));
    }

    #[test]
    fn guard_rejects_reentry_and_cleans_up() {
        let mut guard = RecursionGuard::new();
        let term = Term::blank("r");

        let result = guard.scoped(&term, |inner| {
            assert!(inner.is_active(&term));
            // Re-entry on the same chain fails fast.
            let nested = inner.scoped(&term, |_| Ok(()));
            assert!(matches!(nested, Err(ViewError::Recursion { .. })));
            Ok(())
        });
        assert!(result.is_ok());
        // Cleaned up after exit.
        assert!(!guard.is_active(&term));
    }

    #[test]
    fn guard_cleans_up_on_error() {
        let mut guard = RecursionGuard::new();
        let term = Term::blank("r");
        let result: Result<(), _> = guard.scoped(&term, |_| {
            Err(ViewError::Conversion {
                term: Term::blank("r"),
                kind: ViewKind::Class,
            })
        });
        assert!(result.is_err());
        assert!(!guard.is_active(&term));
    }
}
