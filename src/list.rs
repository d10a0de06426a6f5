//! Ordered-list abstraction over the two-predicate linked-cell convention.
//!
//! A list is a chain of anonymous cells, each carrying one `rdf:first`
//! (the element) and one `rdf:rest` (the next cell), terminating at the
//! `rdf:nil` sentinel. [`OntList`] is a typed, mutable view over such a
//! chain, anchored at the subject/predicate that points at the head cell.
//!
//! Handles do not pin graph structure. Every operation re-walks the chain
//! from the anchor; a sub-list handle whose cell is no longer reachable
//! (an ancestor was cleared or replaced) fails with
//! [`ListError::Expired`] instead of silently operating on stale cells.

use std::collections::HashSet;

use crate::error::{ListError, SeshatResult};
use crate::graph::union::UnionView;
use crate::model::OntModel;
use crate::statement::OntStatement;
use crate::term::{Term, Triple};
use crate::view::ViewKind;
use crate::vocab::{owl, rdf};

fn iri(s: &str) -> Term {
    Term::iri(s)
}

fn nil() -> Term {
    Term::iri(rdf::NIL)
}

/// Walk a cell chain, returning the cells (nil excluded) when the chain is
/// well-formed: exactly one `rdf:first` and `rdf:rest` per cell, acyclic,
/// nil-terminated. `None` for anything else. Used by the classifier to
/// test list-valued predicates without committing to a handle.
pub(crate) fn well_formed_cells(g: &UnionView<'_>, head: &Term) -> Option<Vec<Term>> {
    walk(g, head).ok()
}

/// Strict chain walk with diagnostic failures.
fn walk(g: &UnionView<'_>, head: &Term) -> Result<Vec<Term>, ListError> {
    let mut cells = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = head.clone();
    loop {
        if cursor.as_iri() == Some(rdf::NIL) {
            return Ok(cells);
        }
        if !cursor.is_resource() {
            return Err(ListError::Malformed { cell: cursor });
        }
        if !visited.insert(cursor.clone()) {
            return Err(ListError::Cyclic { head: head.clone() });
        }
        let firsts = g.objects(&cursor, &iri(rdf::FIRST));
        let mut rests = g.objects(&cursor, &iri(rdf::REST));
        if firsts.len() != 1 || rests.len() != 1 {
            return Err(ListError::Malformed { cell: cursor });
        }
        cells.push(cursor);
        cursor = rests.pop().expect("checked non-empty");
    }
}

/// Where a handle sits in its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
    /// The whole list: the current head is re-read through the anchor on
    /// every operation, so the handle survives head replacement.
    Root,
    /// A sub-list pinned to a concrete cell; expires when the cell
    /// becomes unreachable from the anchor.
    Cell(Term),
}

/// Typed, ordered, mutable view over a linked-cell list.
#[derive(Debug, Clone)]
pub struct OntList<'m> {
    model: &'m OntModel,
    anchor: Term,
    link: Term,
    at: Position,
    element_kind: ViewKind,
}

impl<'m> OntList<'m> {
    pub(crate) fn root(
        model: &'m OntModel,
        anchor: Term,
        link: Term,
        element_kind: ViewKind,
    ) -> Self {
        Self {
            model,
            anchor,
            link,
            at: Position::Root,
            element_kind,
        }
    }

    /// The subject this list hangs off.
    pub fn anchor(&self) -> &Term {
        &self.anchor
    }

    /// The predicate connecting the anchor to the head cell.
    pub fn link(&self) -> &Term {
        &self.link
    }

    /// The declared element view; `members` filters to it.
    pub fn element_kind(&self) -> ViewKind {
        self.element_kind
    }

    fn g(&self) -> UnionView<'m> {
        self.model.graph_view()
    }

    /// Full chain from the current root head, plus this handle's index in
    /// it. Every public operation starts here: it is simultaneously the
    /// liveness check.
    fn chain(&self) -> Result<(Vec<Term>, usize), ListError> {
        let g = self.g();
        let head = g.object(&self.anchor, &self.link).ok_or_else(|| ListError::Expired {
            head: self.anchor.clone(),
        })?;
        let cells = walk(&g, &head)?;
        let position = match &self.at {
            Position::Root => 0,
            Position::Cell(cell) => cells
                .iter()
                .position(|c| c == cell)
                .ok_or_else(|| ListError::Expired { head: cell.clone() })?,
        };
        Ok((cells, position))
    }

    /// Pointer (subject, predicate) whose object is the cell at `index`
    /// (or nil when `index == cells.len()`).
    fn pointer(&self, cells: &[Term], index: usize) -> (Term, Term) {
        if index == 0 {
            (self.anchor.clone(), self.link.clone())
        } else {
            (cells[index - 1].clone(), iri(rdf::REST))
        }
    }

    /// Replace the pointer target, keeping bulk annotations of the list's
    /// root statement attached when the root pointer itself is rewritten.
    fn rewrite_pointer(&self, ps: &Term, pp: &Term, old: &Term, new: &Term) -> SeshatResult<()> {
        self.model
            .delete_raw(&Triple::new(ps.clone(), pp.clone(), old.clone()))?;
        self.model
            .insert_raw(Triple::new(ps.clone(), pp.clone(), new.clone()))?;
        if *ps == self.anchor && *pp == self.link {
            self.retarget_root_annotations(old, new)?;
        }
        Ok(())
    }

    /// Move reified wrappers of (anchor, link, old_head) over to the new
    /// head so `clear`/head-replacement preserve the list's annotations.
    fn retarget_root_annotations(&self, old: &Term, new: &Term) -> SeshatResult<()> {
        let g = self.g();
        let source = iri(owl::ANNOTATED_SOURCE);
        let property = iri(owl::ANNOTATED_PROPERTY);
        let target = iri(owl::ANNOTATED_TARGET);
        for wrapper in g.subjects(&target, old) {
            if g.has(&wrapper, &source, &self.anchor) && g.has(&wrapper, &property, &self.link) {
                self.model
                    .delete_raw(&Triple::new(wrapper.clone(), target.clone(), old.clone()))?;
                self.model
                    .insert_raw(Triple::new(wrapper, target.clone(), new.clone()))?;
            }
        }
        Ok(())
    }

    fn new_cell(&self, element: &Term, rest: &Term) -> SeshatResult<Term> {
        let cell = Term::Blank(self.model.fresh_blank());
        self.model
            .insert_raw(Triple::new(cell.clone(), iri(rdf::FIRST), element.clone()))?;
        self.model
            .insert_raw(Triple::new(cell.clone(), iri(rdf::REST), rest.clone()))?;
        Ok(cell)
    }

    fn delete_cell(&self, cell: &Term) -> SeshatResult<()> {
        for triple in self.g().find(Some(cell), None, None) {
            self.model.delete_raw(&triple)?;
        }
        Ok(())
    }

    fn check_self_insertion(&self, element: &Term, cells: &[Term]) -> Result<(), ListError> {
        if cells.contains(element) {
            return Err(ListError::SelfInsertion {
                cell: element.clone(),
            });
        }
        Ok(())
    }

    /// Number of elements from this handle to the end.
    pub fn size(&self) -> SeshatResult<usize> {
        let (cells, position) = self.chain()?;
        Ok(cells.len() - position)
    }

    /// Whether this (sub-)list is the empty list.
    pub fn is_nil(&self) -> SeshatResult<bool> {
        Ok(self.size()? == 0)
    }

    /// Elements passing the declared element view, in order.
    ///
    /// Graph content failing the element eligibility test is silently
    /// skipped: a list can be dirty with respect to one typed view while
    /// remaining a valid plain list.
    pub fn members(&self) -> SeshatResult<Vec<Term>> {
        let (cells, position) = self.chain()?;
        let g = self.g();
        let mut out = Vec::new();
        for cell in &cells[position..] {
            let element = g
                .object(cell, &iri(rdf::FIRST))
                .expect("walk guarantees exactly one rdf:first");
            if self.model.is_quietly_eligible(&element, self.element_kind) {
                out.push(element);
            }
        }
        Ok(out)
    }

    /// All elements regardless of the element view.
    pub fn raw_members(&self) -> SeshatResult<Vec<Term>> {
        let (cells, position) = self.chain()?;
        let g = self.g();
        Ok(cells[position..]
            .iter()
            .map(|cell| {
                g.object(cell, &iri(rdf::FIRST))
                    .expect("walk guarantees exactly one rdf:first")
            })
            .collect())
    }

    /// The sub-list starting at `index` (consistent with the linked-cell
    /// representation: you get the tail, not just the element).
    pub fn get(&self, index: usize) -> SeshatResult<OntList<'m>> {
        let (cells, position) = self.chain()?;
        let size = cells.len() - position;
        if index >= size {
            return Err(ListError::OutOfBounds { index, size }.into());
        }
        Ok(OntList {
            model: self.model,
            anchor: self.anchor.clone(),
            link: self.link.clone(),
            at: Position::Cell(cells[position + index].clone()),
            element_kind: self.element_kind,
        })
    }

    /// Append an element at the end.
    pub fn add_last(&self, element: &Term) -> SeshatResult<()> {
        let (cells, position) = self.chain()?;
        self.check_self_insertion(element, &cells)?;
        let cell = self.new_cell(element, &nil())?;
        if cells.len() == position {
            // Empty suffix: the pointer currently targets nil.
            let (ps, pp) = self.pointer(&cells, position);
            self.rewrite_pointer(&ps, &pp, &nil(), &cell)?;
        } else {
            let last = cells.last().expect("non-empty suffix").clone();
            self.rewrite_pointer(&last, &iri(rdf::REST), &nil(), &cell)?;
        }
        Ok(())
    }

    /// Alias for [`OntList::add_last`].
    pub fn add(&self, element: &Term) -> SeshatResult<()> {
        self.add_last(element)
    }

    /// Prepend an element before this handle's first cell.
    pub fn add_first(&self, element: &Term) -> SeshatResult<()> {
        let (cells, position) = self.chain()?;
        self.check_self_insertion(element, &cells)?;
        let old_target = cells.get(position).cloned().unwrap_or_else(nil);
        let cell = self.new_cell(element, &old_target)?;
        let (ps, pp) = self.pointer(&cells, position);
        self.rewrite_pointer(&ps, &pp, &old_target, &cell)
    }

    /// Remove and return the first element of this (sub-)list.
    pub fn remove_first(&self) -> SeshatResult<Term> {
        let (cells, position) = self.chain()?;
        if position == cells.len() {
            return Err(ListError::Empty.into());
        }
        self.unlink(&cells, position)
    }

    /// Remove and return the last element.
    pub fn remove_last(&self) -> SeshatResult<Term> {
        let (cells, position) = self.chain()?;
        if position == cells.len() {
            return Err(ListError::Empty.into());
        }
        self.unlink(&cells, cells.len() - 1)
    }

    /// Remove the first occurrence of `element`. Returns whether the list
    /// changed.
    pub fn remove(&self, element: &Term) -> SeshatResult<bool> {
        let (cells, position) = self.chain()?;
        let g = self.g();
        for (offset, cell) in cells[position..].iter().enumerate() {
            if g.object(cell, &iri(rdf::FIRST)).as_ref() == Some(element) {
                self.unlink(&cells, position + offset)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Splice the cell at `index` out of the chain and delete it.
    fn unlink(&self, cells: &[Term], index: usize) -> SeshatResult<Term> {
        let cell = cells[index].clone();
        let g = self.g();
        let element = g
            .object(&cell, &iri(rdf::FIRST))
            .expect("walk guarantees exactly one rdf:first");
        let successor = cells.get(index + 1).cloned().unwrap_or_else(nil);
        let (ps, pp) = self.pointer(cells, index);
        self.rewrite_pointer(&ps, &pp, &cell, &successor)?;
        self.delete_cell(&cell)?;
        Ok(element)
    }

    /// Truncate this (sub-)list to nil in place.
    ///
    /// The list's own (root-statement) annotations are preserved; the
    /// deleted interior cells never carried any.
    pub fn clear(&self) -> SeshatResult<()> {
        let (cells, position) = self.chain()?;
        if position == cells.len() {
            return Ok(());
        }
        let (ps, pp) = self.pointer(&cells, position);
        self.rewrite_pointer(&ps, &pp, &cells[position], &nil())?;
        for cell in &cells[position..] {
            self.delete_cell(cell)?;
        }
        Ok(())
    }

    /// Replace all elements.
    pub fn set_components(&self, elements: &[Term]) -> SeshatResult<()> {
        self.clear()?;
        for element in elements {
            self.add_last(element)?;
        }
        Ok(())
    }

    /// The root statement (anchor, link, head) of the whole list.
    ///
    /// Only available on the root handle (or a sub-list at index 0);
    /// interior cells have no annotatable statement.
    pub fn root_statement(&self) -> SeshatResult<OntStatement<'m>> {
        let (cells, position) = self.chain()?;
        if position != 0 {
            return Err(ListError::InteriorAnnotation {
                cell: cells[position].clone(),
            }
            .into());
        }
        let head = cells.first().cloned().unwrap_or_else(nil);
        Ok(self
            .model
            .statement(self.anchor.clone(), self.link.clone(), head))
    }

    /// Annotate the list through its root statement.
    pub fn annotate(&self, property: &Term, value: &Term) -> SeshatResult<()> {
        self.root_statement()?.add_annotation(property, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeshatError;
    use crate::model::OntModel;

    fn listed_model() -> (OntModel, Term, Term) {
        let model = OntModel::new();
        let anchor = Term::iri("urn:anchor");
        let link = Term::iri("urn:members");
        model.add_triple(Triple::new(anchor.clone(), link.clone(), nil())).unwrap();
        (model, anchor, link)
    }

    fn items(n: usize) -> Vec<Term> {
        (0..n).map(|i| Term::iri(format!("urn:item{i}"))).collect()
    }

    #[test]
    fn size_tracks_add() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        assert!(list.is_nil().unwrap());
        for (i, item) in items(3).iter().enumerate() {
            list.add(item).unwrap();
            assert_eq!(list.size().unwrap(), i + 1);
        }
        assert_eq!(list.raw_members().unwrap(), items(3));
    }

    #[test]
    fn add_first_prepends() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        let it = items(2);
        list.add_last(&it[1]).unwrap();
        list.add_first(&it[0]).unwrap();
        assert_eq!(list.raw_members().unwrap(), it);
    }

    #[test]
    fn remove_first_last_and_by_value() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        let it = items(4);
        for i in &it {
            list.add_last(i).unwrap();
        }
        assert_eq!(list.remove_first().unwrap(), it[0]);
        assert_eq!(list.remove_last().unwrap(), it[3]);
        assert!(list.remove(&it[2]).unwrap());
        assert!(!list.remove(&it[2]).unwrap());
        assert_eq!(list.raw_members().unwrap(), vec![it[1].clone()]);
    }

    #[test]
    fn clear_leaves_nil_and_no_cells() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor.clone(), link.clone(), ViewKind::NamedIndividual);
        for i in &items(3) {
            list.add_last(i).unwrap();
        }
        list.clear().unwrap();
        assert!(list.is_nil().unwrap());
        assert_eq!(list.size().unwrap(), 0);
        // The only triple mentioning the anchor is the nil pointer.
        assert_eq!(model.find(Some(&anchor), None, None).len(), 1);
        // No orphan cells.
        assert!(model.find(None, Some(&iri(rdf::FIRST)), None).is_empty());
    }

    #[test]
    fn sublist_expires_when_ancestor_cleared() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        for i in &items(4) {
            list.add_last(i).unwrap();
        }
        let tail = list.get(2).unwrap();
        assert_eq!(tail.size().unwrap(), 2);

        list.clear().unwrap();
        assert!(matches!(
            tail.size(),
            Err(SeshatError::List(ListError::Expired { .. }))
        ));
    }

    #[test]
    fn get_out_of_bounds() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        list.add_last(&items(1)[0]).unwrap();
        assert!(matches!(
            list.get(1),
            Err(SeshatError::List(ListError::OutOfBounds { index: 1, size: 1 }))
        ));
    }

    #[test]
    fn self_insertion_rejected() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor.clone(), link.clone(), ViewKind::NamedIndividual);
        list.add_last(&items(1)[0]).unwrap();
        let head = model.graph_view().object(&anchor, &link).unwrap();
        assert!(matches!(
            list.add_last(&head),
            Err(SeshatError::List(ListError::SelfInsertion { .. }))
        ));
    }

    #[test]
    fn members_filters_to_element_view() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::Class);
        let cls = Term::iri("urn:C");
        model
            .add_triple(Triple::new(
                cls.clone(),
                iri(rdf::TYPE),
                iri(owl::CLASS),
            ))
            .unwrap();
        let stray = Term::iri("urn:not-a-class");
        list.add_last(&cls).unwrap();
        list.add_last(&stray).unwrap();

        // Dirty as a class list, still a valid plain list.
        assert_eq!(list.members().unwrap(), vec![cls]);
        assert_eq!(list.size().unwrap(), 2);
    }

    #[test]
    fn interior_cells_cannot_be_annotated() {
        let (model, anchor, link) = listed_model();
        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        for i in &items(3) {
            list.add_last(i).unwrap();
        }
        let interior = list.get(1).unwrap();
        assert!(matches!(
            interior.annotate(&iri(crate::vocab::rdfs::COMMENT), &Term::literal(crate::term::Literal::string("x"))),
            Err(SeshatError::List(ListError::InteriorAnnotation { .. }))
        ));
    }

    #[test]
    fn cyclic_chain_is_reported() {
        let (model, anchor, link) = listed_model();
        let c = Term::blank("loop");
        model
            .add_triple(Triple::new(c.clone(), iri(rdf::FIRST), Term::iri("urn:x")))
            .unwrap();
        model
            .add_triple(Triple::new(c.clone(), iri(rdf::REST), c.clone()))
            .unwrap();
        model.remove_triple(&Triple::new(anchor.clone(), link.clone(), nil())).unwrap();
        model
            .add_triple(Triple::new(anchor.clone(), link.clone(), c))
            .unwrap();

        let list = OntList::root(&model, anchor, link, ViewKind::NamedIndividual);
        assert!(matches!(
            list.size(),
            Err(SeshatError::List(ListError::Cyclic { .. }))
        ));
    }
}
