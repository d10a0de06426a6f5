//! View factories: locate candidates, test eligibility, instantiate.
//!
//! A factory is composed from three independently testable strategies.
//! The [`Locator`] cheaply over-approximates the set of candidate nodes;
//! eligibility (routed through the structural classifier) is the exact
//! test and is always re-checked, so a locator may return junk without
//! affecting correctness. Instantiation is the only committing step and
//! the only one allowed to fail.
//!
//! Composite factories delegate to a prioritized list of child kinds,
//! first eligible child wins; this is how "this node is *some*
//! restriction" resolves to a concrete kind without re-testing shared
//! prefixes twice.

use std::collections::HashSet;

use crate::cache::RecursionGuard;
use crate::error::ViewError;
use crate::graph::union::UnionView;
use crate::term::Term;
use crate::view::personality::Personality;
use crate::view::{TypedView, ViewKind, classify};
use crate::vocab::rdf;

/// Candidate-enumeration strategy: a cheap superset of eligible nodes.
#[derive(Debug, Clone)]
pub enum Locator {
    /// All resource subjects declared with `rdf:type <marker>`.
    TypedResources { marker: &'static str },
    /// All subjects of any triple with this predicate.
    PredicateSubjects { predicate: &'static str },
    /// All list cells (subjects of `rdf:first`) plus the nil sentinel.
    ListCells,
    /// Union of child locators.
    Union(Vec<Locator>),
}

impl Locator {
    /// Enumerate candidates. May over-approximate; never under-approximates
    /// currently eligible nodes.
    pub fn locate(&self, g: &UnionView<'_>) -> Vec<Term> {
        let mut out = Vec::new();
        self.collect(g, &mut out);
        let mut seen = HashSet::new();
        out.retain(|t| seen.insert(t.clone()));
        out
    }

    fn collect(&self, g: &UnionView<'_>, out: &mut Vec<Term>) {
        match self {
            Locator::TypedResources { marker } => {
                out.extend(
                    g.subjects(&Term::iri(rdf::TYPE), &Term::iri(*marker))
                        .into_iter()
                        .filter(Term::is_resource),
                );
            }
            Locator::PredicateSubjects { predicate } => {
                out.extend(
                    g.find(None, Some(&Term::iri(*predicate)), None)
                        .into_iter()
                        .map(|t| t.subject),
                );
            }
            Locator::ListCells => {
                out.push(Term::iri(rdf::NIL));
                out.extend(
                    g.find(None, Some(&Term::iri(rdf::FIRST)), None)
                        .into_iter()
                        .map(|t| t.subject),
                );
            }
            Locator::Union(children) => {
                for child in children {
                    child.collect(g, out);
                }
            }
        }
    }
}

/// A view factory: either a leaf bound to one concrete kind, or a
/// composite delegating to prioritized children.
#[derive(Debug, Clone)]
pub enum Factory {
    /// Concrete kind with its candidate locator.
    Leaf { kind: ViewKind, locator: Locator },
    /// Prioritized children; first eligible wins.
    Composite { children: Vec<ViewKind> },
}

impl Factory {
    /// Enumerate candidate nodes for this view.
    pub fn locate(&self, g: &UnionView<'_>, personality: &Personality) -> Vec<Term> {
        match self {
            Factory::Leaf { locator, .. } => locator.locate(g),
            Factory::Composite { children } => {
                let mut out = Vec::new();
                for child in children {
                    if let Ok(factory) = personality.factory(*child) {
                        out.extend(factory.locate(g, personality));
                    }
                }
                let mut seen = HashSet::new();
                out.retain(|t| seen.insert(t.clone()));
                out
            }
        }
    }

    /// Exact structural test. Side-effect-free; never errors except for
    /// re-entrant resolution.
    pub fn eligible(
        &self,
        term: &Term,
        g: &UnionView<'_>,
        personality: &Personality,
        guard: &mut RecursionGuard,
    ) -> Result<bool, ViewError> {
        match self {
            Factory::Leaf { kind, .. } => classify::eligible(*kind, term, g, guard),
            Factory::Composite { children } => {
                for child in children {
                    if personality
                        .factory(*child)?
                        .eligible(term, g, personality, guard)?
                    {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Build the typed view, or fail with a conversion error naming the
    /// node. `eligible == true` implies this succeeds.
    pub fn instantiate(
        &self,
        term: &Term,
        g: &UnionView<'_>,
        personality: &Personality,
        guard: &mut RecursionGuard,
    ) -> Result<TypedView, ViewError> {
        match self {
            Factory::Leaf { kind, .. } => {
                if classify::eligible(*kind, term, g, guard)? {
                    Ok(TypedView::new(term.clone(), *kind))
                } else {
                    Err(ViewError::Conversion {
                        term: term.clone(),
                        kind: *kind,
                    })
                }
            }
            Factory::Composite { children } => {
                for child in children {
                    let factory = personality.factory(*child)?;
                    if factory.eligible(term, g, personality, guard)? {
                        return factory.instantiate(term, g, personality, guard);
                    }
                }
                Err(ViewError::Conversion {
                    term: term.clone(),
                    kind: self.kind_hint(),
                })
            }
        }
    }

    fn kind_hint(&self) -> ViewKind {
        match self {
            Factory::Leaf { kind, .. } => *kind,
            Factory::Composite { .. } => ViewKind::AnyRestriction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemGraph;
    use crate::graph::union::GraphArena;
    use crate::term::Triple;
    use crate::vocab::owl;

    #[test]
    fn locator_over_approximates() {
        let arena = GraphArena::new();
        let root = arena.insert(Box::new(MemGraph::new()));
        let g = UnionView::new(&arena, root);

        // A literal-free declaration plus a nonsense "restriction" on a
        // named node. The locator returns both; eligibility rejects the
        // named one later.
        g.add(Triple::new(
            Term::blank("r"),
            Term::iri(rdf::TYPE),
            Term::iri(owl::RESTRICTION),
        ))
        .unwrap();
        g.add(Triple::new(
            Term::iri("urn:named"),
            Term::iri(rdf::TYPE),
            Term::iri(owl::RESTRICTION),
        ))
        .unwrap();

        let locator = Locator::TypedResources {
            marker: owl::RESTRICTION,
        };
        let candidates = locator.locate(&g);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn predicate_subjects_locator_backs_dialect_factories() {
        use crate::vocab::rdfs;

        let arena = GraphArena::new();
        let root = arena.insert(Box::new(MemGraph::new()));
        let g = UnionView::new(&arena, root);

        // A dialect that finds annotation-property candidates by usage
        // (subjects of rdfs:seeAlso) instead of by declaration.
        let personality = Personality::owl2().with_factory(
            ViewKind::AnnotationProperty,
            Factory::Leaf {
                kind: ViewKind::AnnotationProperty,
                locator: Locator::PredicateSubjects {
                    predicate: rdfs::SEE_ALSO,
                },
            },
        );

        let see_also = Term::iri(rdfs::SEE_ALSO);
        g.add(Triple::new(
            Term::iri("urn:a"),
            see_also.clone(),
            Term::iri("urn:doc1"),
        ))
        .unwrap();
        g.add(Triple::new(
            Term::iri("urn:a"),
            see_also.clone(),
            Term::iri("urn:doc2"),
        ))
        .unwrap();
        g.add(Triple::new(Term::iri("urn:b"), see_also, Term::iri("urn:doc1")))
            .unwrap();

        // Subjects are enumerated once each, duplicates collapsed.
        let factory = personality.factory(ViewKind::AnnotationProperty).unwrap();
        let mut candidates = factory.locate(&g, &personality);
        candidates.sort();
        assert_eq!(candidates, vec![Term::iri("urn:a"), Term::iri("urn:b")]);
    }

    #[test]
    fn list_cells_locator_includes_nil() {
        let arena = GraphArena::new();
        let root = arena.insert(Box::new(MemGraph::new()));
        let g = UnionView::new(&arena, root);
        let candidates = Locator::ListCells.locate(&g);
        assert_eq!(candidates, vec![Term::iri(rdf::NIL)]);
    }
}
