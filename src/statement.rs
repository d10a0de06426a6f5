//! First-class statements and their annotations.
//!
//! Any (subject, predicate, object) can be viewed as an [`OntStatement`].
//! A *root* statement structurally declares a typed view's existence; its
//! plain annotations live directly on the subject. Every other statement
//! is annotated through a *bulk* wrapper: an anonymous node reifying the
//! statement (`owl:annotatedSource/Property/Target`), itself typed
//! `owl:Axiom` at the top level or `owl:Annotation` when nested, and
//! recursively annotatable.
//!
//! Wrappers are created lazily on first bulk annotation and deleted as a
//! whole once empty; their core triples are never removed piecemeal.

use std::collections::HashSet;

use crate::error::{SeshatResult, StatementError};
use crate::graph::union::UnionView;
use crate::model::OntModel;
use crate::term::{Term, Triple};
use crate::view::classify;
use crate::vocab::{owl, rdf};

fn iri(s: &str) -> Term {
    Term::iri(s)
}

/// Whether `term` is a reified-annotation wrapper node.
pub(crate) fn is_wrapper_node(g: &UnionView<'_>, term: &Term) -> bool {
    let ty = iri(rdf::TYPE);
    (g.has(term, &ty, &iri(owl::AXIOM)) || g.has(term, &ty, &iri(owl::ANNOTATION)))
        && !g.objects(term, &iri(owl::ANNOTATED_SOURCE)).is_empty()
        && !g.objects(term, &iri(owl::ANNOTATED_PROPERTY)).is_empty()
        && !g.objects(term, &iri(owl::ANNOTATED_TARGET)).is_empty()
}

/// Whether removing `triple` would strip a core triple from a wrapper
/// that still carries annotation assertions.
pub(crate) fn is_live_wrapper_core(g: &UnionView<'_>, triple: &Triple) -> bool {
    let core_predicate = match triple.predicate.as_iri() {
        Some(owl::ANNOTATED_SOURCE | owl::ANNOTATED_PROPERTY | owl::ANNOTATED_TARGET) => true,
        Some(rdf::TYPE) => matches!(
            triple.object.as_iri(),
            Some(owl::AXIOM | owl::ANNOTATION)
        ),
        _ => false,
    };
    if !core_predicate || !is_wrapper_node(g, &triple.subject) {
        return false;
    }
    // Any non-core outgoing triple is a live annotation assertion.
    g.find(Some(&triple.subject), None, None)
        .iter()
        .any(|t| !is_core_predicate(t))
}

fn is_core_predicate(triple: &Triple) -> bool {
    matches!(
        triple.predicate.as_iri(),
        Some(
            owl::ANNOTATED_SOURCE
                | owl::ANNOTATED_PROPERTY
                | owl::ANNOTATED_TARGET
        )
    ) || (triple.predicate.as_iri() == Some(rdf::TYPE)
        && matches!(triple.object.as_iri(), Some(owl::AXIOM | owl::ANNOTATION)))
}

/// A triple viewed as a first-class, annotatable statement.
#[derive(Debug, Clone)]
pub struct OntStatement<'m> {
    model: &'m OntModel,
    triple: Triple,
}

impl<'m> OntStatement<'m> {
    pub(crate) fn new(model: &'m OntModel, triple: Triple) -> Self {
        Self { model, triple }
    }

    /// The underlying triple.
    pub fn triple(&self) -> &Triple {
        &self.triple
    }

    fn g(&self) -> UnionView<'m> {
        self.model.graph_view()
    }

    /// Whether the triple is currently asserted (anywhere in the union).
    pub fn is_asserted(&self) -> bool {
        self.g().contains(&self.triple)
    }

    /// Whether the triple is asserted in the base graph (not imported).
    pub fn is_local(&self) -> bool {
        self.model.is_local(&self.triple).unwrap_or(false)
    }

    /// Whether this statement structurally declares a typed view: its
    /// predicate is `rdf:type` and its object is the declaring marker of
    /// a view the subject currently qualifies for.
    pub fn is_root(&self) -> bool {
        if self.triple.predicate.as_iri() != Some(rdf::TYPE) {
            return false;
        }
        let Some(marker) = self.triple.object.as_iri() else {
            return false;
        };
        // Wrapper declarations are the root statements of reified
        // annotation nodes.
        if marker == owl::AXIOM || marker == owl::ANNOTATION {
            return is_wrapper_node(&self.g(), &self.triple.subject);
        }
        self.model
            .kinds_declared_by(marker)
            .into_iter()
            .any(|kind| self.model.is_quietly_eligible(&self.triple.subject, kind))
    }

    /// Whether this is the declaration triple of a reified wrapper.
    pub fn is_wrapper_declaration(&self) -> bool {
        self.triple.predicate.as_iri() == Some(rdf::TYPE)
            && matches!(
                self.triple.object.as_iri(),
                Some(owl::AXIOM | owl::ANNOTATION)
            )
            && is_wrapper_node(&self.g(), &self.triple.subject)
    }

    /// Wrapper nodes currently reifying this statement, sorted for
    /// deterministic reuse.
    fn wrappers(&self) -> Vec<Term> {
        let g = self.g();
        let mut wrappers: Vec<Term> = g
            .subjects(&iri(owl::ANNOTATED_SOURCE), &self.triple.subject)
            .into_iter()
            .filter(|w| {
                g.has(w, &iri(owl::ANNOTATED_PROPERTY), &self.triple.predicate)
                    && g.has(w, &iri(owl::ANNOTATED_TARGET), &self.triple.object)
                    && is_wrapper_node(&g, w)
            })
            .collect();
        wrappers.sort();
        wrappers.dedup();
        wrappers
    }

    /// All (property, value) annotations of this statement.
    ///
    /// For a root statement, direct annotation-property assertions on the
    /// subject are folded in; bulk annotations are always included.
    pub fn annotations(&self) -> Vec<(Term, Term)> {
        let g = self.g();
        let mut out = Vec::new();
        if self.is_root() {
            for t in g.find(Some(&self.triple.subject), None, None) {
                if classify::is_annotation_property(&g, &t.predicate) {
                    out.push((t.predicate, t.object));
                }
            }
        }
        for wrapper in self.wrappers() {
            for t in g.find(Some(&wrapper), None, None) {
                if classify::is_annotation_property(&g, &t.predicate) {
                    out.push((t.predicate, t.object));
                }
            }
        }
        out
    }

    /// Annotate this statement.
    ///
    /// Root statements take a direct assertion on the subject; everything
    /// else goes through a bulk wrapper, reused if present, materialized
    /// otherwise.
    pub fn add_annotation(&self, property: &Term, value: &Term) -> SeshatResult<()> {
        let g = self.g();
        if !classify::is_annotation_property(&g, property) {
            return Err(StatementError::NotAnnotationProperty {
                term: property.clone(),
            }
            .into());
        }
        if !self.is_asserted() {
            return Err(StatementError::Absent {
                statement: self.triple.to_string(),
            }
            .into());
        }
        if self.is_root() {
            self.model.insert_raw(Triple::new(
                self.triple.subject.clone(),
                property.clone(),
                value.clone(),
            ))?;
            return Ok(());
        }
        let wrapper = self.ensure_wrapper()?;
        self.model
            .insert_raw(Triple::new(wrapper, property.clone(), value.clone()))?;
        Ok(())
    }

    /// Reuse or materialize the bulk wrapper for this statement.
    fn ensure_wrapper(&self) -> SeshatResult<Term> {
        if let Some(existing) = self.wrappers().into_iter().next() {
            return Ok(existing);
        }
        // A statement on a wrapper node is itself nested; its wrapper is
        // typed owl:Annotation instead of owl:Axiom.
        let nested = is_wrapper_node(&self.g(), &self.triple.subject);
        let marker = if nested { owl::ANNOTATION } else { owl::AXIOM };
        let wrapper = Term::Blank(self.model.fresh_blank());
        tracing::debug!(statement = %self.triple, %wrapper, nested, "materializing annotation wrapper");
        for triple in [
            Triple::new(wrapper.clone(), iri(rdf::TYPE), iri(marker)),
            Triple::new(
                wrapper.clone(),
                iri(owl::ANNOTATED_SOURCE),
                self.triple.subject.clone(),
            ),
            Triple::new(
                wrapper.clone(),
                iri(owl::ANNOTATED_PROPERTY),
                self.triple.predicate.clone(),
            ),
            Triple::new(
                wrapper.clone(),
                iri(owl::ANNOTATED_TARGET),
                self.triple.object.clone(),
            ),
        ] {
            self.model.insert_raw(triple)?;
        }
        Ok(wrapper)
    }

    /// Remove all plain and bulk annotations, transitively, pruning
    /// emptied wrappers. The statement's own triple survives.
    pub fn clear_annotations(&self) -> SeshatResult<()> {
        let mut visited = HashSet::new();
        self.clear_annotations_inner(&mut visited)
    }

    fn clear_annotations_inner(&self, visited: &mut HashSet<Term>) -> SeshatResult<()> {
        let g = self.g();
        if self.is_root() {
            for t in g.find(Some(&self.triple.subject), None, None) {
                if classify::is_annotation_property(&g, &t.predicate) {
                    // Annotations on annotations are bulk; clear them first.
                    OntStatement::new(self.model, t.clone()).clear_bulk(visited)?;
                    self.model.delete_raw(&t)?;
                }
            }
        }
        self.clear_bulk(visited)
    }

    fn clear_bulk(&self, visited: &mut HashSet<Term>) -> SeshatResult<()> {
        for wrapper in self.wrappers() {
            self.delete_wrapper(&wrapper, visited)?;
        }
        Ok(())
    }

    /// Delete a wrapper and everything hanging off it.
    fn delete_wrapper(&self, wrapper: &Term, visited: &mut HashSet<Term>) -> SeshatResult<()> {
        if !visited.insert(wrapper.clone()) {
            return Ok(());
        }
        let g = self.g();
        for t in g.find(Some(wrapper), None, None) {
            if !is_core_predicate(&t) {
                // The assertion may itself be annotated, arbitrarily deep.
                OntStatement::new(self.model, t.clone()).clear_bulk(visited)?;
            }
            self.model.delete_raw(&t)?;
        }
        Ok(())
    }

    /// Delete one (property, value) annotation.
    ///
    /// Refuses when the matching annotation itself carries annotations
    /// (clear those first), or when this statement is a wrapper
    /// declaration (its annotations belong to the reified statement).
    /// Wrappers emptied by the deletion are removed whole.
    pub fn delete_annotation(&self, property: &Term, value: &Term) -> SeshatResult<()> {
        if self.is_wrapper_declaration() {
            return Err(StatementError::WrapperCore {
                wrapper: self.triple.subject.clone(),
            }
            .into());
        }
        let g = self.g();
        let mut candidates: Vec<Triple> = Vec::new();
        if self.is_root() {
            let direct = Triple::new(
                self.triple.subject.clone(),
                property.clone(),
                value.clone(),
            );
            if g.contains(&direct) {
                candidates.push(direct);
            }
        }
        for wrapper in self.wrappers() {
            let bulk = Triple::new(wrapper, property.clone(), value.clone());
            if g.contains(&bulk) {
                candidates.push(bulk);
            }
        }
        if candidates.is_empty() {
            return Err(StatementError::AnnotationNotFound {
                property: property.clone(),
                value: value.clone(),
            }
            .into());
        }
        for candidate in &candidates {
            if !OntStatement::new(self.model, candidate.clone())
                .wrappers()
                .is_empty()
            {
                return Err(StatementError::NestedAnnotations {
                    property: property.clone(),
                    value: value.clone(),
                }
                .into());
            }
        }
        for candidate in candidates {
            self.model.delete_raw(&candidate)?;
            self.prune_if_empty(&candidate.subject)?;
        }
        Ok(())
    }

    /// Delete a wrapper whose last annotation assertion just went away.
    fn prune_if_empty(&self, node: &Term) -> SeshatResult<()> {
        let g = self.g();
        if !is_wrapper_node(&g, node) {
            return Ok(());
        }
        let has_assertions = g
            .find(Some(node), None, None)
            .iter()
            .any(|t| !is_core_predicate(t));
        if has_assertions {
            return Ok(());
        }
        tracing::debug!(wrapper = %node, "pruning empty annotation wrapper");
        for t in g.find(Some(node), None, None) {
            self.model.delete_raw(&t)?;
        }
        Ok(())
    }
}
