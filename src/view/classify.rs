//! Structural classifier for ambiguous anonymous shapes.
//!
//! Restrictions, class expressions and data ranges all look alike from a
//! distance: an anonymous node with an `rdf:type` pointing at a generic
//! marker. The classifier inspects the exact combination of outgoing
//! predicates and picks exactly one concrete [`ViewKind`], in a fixed
//! precedence order, or rejects the node.
//!
//! Precedence is load-bearing. Within a property branch the order is:
//! some-values-from, all-values-from, min-, max-, exact-cardinality,
//! has-value, has-self. Malformed graphs can carry several of these
//! predicates at once; reordering the tests would classify such nodes
//! differently. Callers must have pushed the node being classified onto
//! the [`RecursionGuard`] before calling in, so that qualified-cardinality
//! filler checks cannot loop through mutually referential nodes.

use crate::cache::RecursionGuard;
use crate::error::ViewError;
use crate::graph::union::UnionView;
use crate::list;
use crate::term::Term;
use crate::view::ViewKind;
use crate::vocab::{BUILTIN_ANNOTATION_PROPERTIES, owl, rdf, rdfs, xsd};

fn iri(s: &str) -> Term {
    Term::iri(s)
}

fn has_type(g: &UnionView<'_>, term: &Term, ty: &str) -> bool {
    g.has(term, &iri(rdf::TYPE), &iri(ty))
}

/// Which of the two disjoint property sub-factories a restriction binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Object,
    Data,
}

// ---------------------------------------------------------------------------
// Entity eligibility (unambiguous, type-declared)
// ---------------------------------------------------------------------------

/// Named class: declared `owl:Class`, or one of the built-in classes.
pub fn is_named_class(g: &UnionView<'_>, term: &Term) -> bool {
    match term.as_iri() {
        Some(s) => s == owl::THING || s == owl::NOTHING || has_type(g, term, owl::CLASS),
        None => false,
    }
}

/// Named datatype: declared `rdfs:Datatype`, or any XSD built-in.
pub fn is_named_datatype(g: &UnionView<'_>, term: &Term) -> bool {
    match term.as_iri() {
        Some(s) => s.starts_with(xsd::NS) || has_type(g, term, rdfs::DATATYPE),
        None => false,
    }
}

/// Declared object-valued property.
pub fn is_object_property(g: &UnionView<'_>, term: &Term) -> bool {
    term.is_iri() && has_type(g, term, owl::OBJECT_PROPERTY)
}

/// Declared data-valued property.
pub fn is_data_property(g: &UnionView<'_>, term: &Term) -> bool {
    term.is_iri() && has_type(g, term, owl::DATATYPE_PROPERTY)
}

/// Declared or built-in annotation property.
pub fn is_annotation_property(g: &UnionView<'_>, term: &Term) -> bool {
    match term.as_iri() {
        Some(s) => {
            BUILTIN_ANNOTATION_PROPERTIES.contains(&s)
                || has_type(g, term, owl::ANNOTATION_PROPERTY)
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Filler eligibility (recursive, guard-protected)
// ---------------------------------------------------------------------------

/// Whether `term` qualifies as *some* class: named class, anonymous class
/// expression, or restriction.
///
/// This is the self-referential edge of the classifier: a qualified
/// cardinality's `owl:onClass` filler may itself be a restriction whose
/// own filler refers back. The guard turns such cycles into a
/// [`ViewError::Recursion`] instead of unbounded re-entry.
pub fn eligible_class_like(
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
) -> Result<bool, ViewError> {
    guard.scoped(term, |guard| {
        if is_named_class(g, term) {
            return Ok(true);
        }
        if !term.is_blank() {
            return Ok(false);
        }
        if classify_class_expression(term, g)?.is_some() {
            return Ok(true);
        }
        Ok(classify_restriction(term, g, guard)?.is_some())
    })
}

/// Whether `term` qualifies as *some* data range.
pub fn eligible_data_range_like(
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
) -> Result<bool, ViewError> {
    guard.scoped(term, |_| {
        if is_named_datatype(g, term) {
            return Ok(true);
        }
        if !term.is_blank() {
            return Ok(false);
        }
        Ok(classify_data_range(term, g)?.is_some())
    })
}

/// Arity of a data range used as an n-ary restriction's value range.
///
/// Every range this engine supports is unary; the constant exists so the
/// arity comparison reads as the contract it is.
pub fn range_arity(_range: &Term) -> usize {
    1
}

// ---------------------------------------------------------------------------
// The classifier proper
// ---------------------------------------------------------------------------

/// Classify a node carrying the `owl:Restriction` marker.
///
/// Returns the single concrete restriction kind the node's predicate
/// combination selects, or `None` if the node matches no kind. Named
/// nodes never carry restriction shapes and return `None` immediately.
pub fn classify_restriction(
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
) -> Result<Option<ViewKind>, ViewError> {
    if !term.is_blank() || !has_type(g, term, owl::RESTRICTION) {
        return Ok(None);
    }

    let mut props = g.objects(term, &iri(owl::ON_PROPERTY));
    props.sort();
    props.dedup();

    for prop in &props {
        if is_object_property(g, prop) {
            if let Some(kind) = classify_branch(term, g, guard, Branch::Object)? {
                tracing::trace!(%term, %kind, "restriction classified (object branch)");
                return Ok(Some(kind));
            }
        }
        if is_data_property(g, prop) {
            if let Some(kind) = classify_branch(term, g, guard, Branch::Data)? {
                tracing::trace!(%term, %kind, "restriction classified (data branch)");
                return Ok(Some(kind));
            }
        }
    }

    if props.is_empty() {
        return classify_nary(term, g, guard);
    }
    Ok(None)
}

/// One property branch of the restriction classifier, in precedence order.
fn classify_branch(
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
    branch: Branch,
) -> Result<Option<ViewKind>, ViewError> {
    use ViewKind::*;

    if !g.objects(term, &iri(owl::SOME_VALUES_FROM)).is_empty() {
        return Ok(Some(match branch {
            Branch::Object => ObjectSomeValuesFrom,
            Branch::Data => DataSomeValuesFrom,
        }));
    }
    if !g.objects(term, &iri(owl::ALL_VALUES_FROM)).is_empty() {
        return Ok(Some(match branch {
            Branch::Object => ObjectAllValuesFrom,
            Branch::Data => DataAllValuesFrom,
        }));
    }

    let cardinalities = [
        (
            owl::MIN_CARDINALITY,
            owl::MIN_QUALIFIED_CARDINALITY,
            match branch {
                Branch::Object => ObjectMinCardinality,
                Branch::Data => DataMinCardinality,
            },
        ),
        (
            owl::MAX_CARDINALITY,
            owl::MAX_QUALIFIED_CARDINALITY,
            match branch {
                Branch::Object => ObjectMaxCardinality,
                Branch::Data => DataMaxCardinality,
            },
        ),
        (
            owl::CARDINALITY,
            owl::QUALIFIED_CARDINALITY,
            match branch {
                Branch::Object => ObjectExactCardinality,
                Branch::Data => DataExactCardinality,
            },
        ),
    ];
    for (plain, qualified, kind) in cardinalities {
        if has_cardinality_literal(g, term, plain) {
            return Ok(Some(kind));
        }
        if has_cardinality_literal(g, term, qualified)
            && qualified_filler_eligible(term, g, guard, branch)?
        {
            return Ok(Some(kind));
        }
    }

    if let Some(value) = g.object(term, &iri(owl::HAS_VALUE)) {
        let correctly_typed = match branch {
            Branch::Object => value.is_resource(),
            Branch::Data => value.is_literal(),
        };
        if correctly_typed {
            return Ok(Some(match branch {
                Branch::Object => ObjectHasValue,
                Branch::Data => DataHasValue,
            }));
        }
    }

    if branch == Branch::Object {
        let marker = g.objects(term, &iri(owl::HAS_SELF));
        if marker
            .iter()
            .any(|o| o.as_literal().is_some_and(|l| l.is_true()))
        {
            return Ok(Some(HasSelf));
        }
    }
    Ok(None)
}

/// Whether (term, predicate, ?) holds a lexically valid
/// `xsd:nonNegativeInteger` literal.
fn has_cardinality_literal(g: &UnionView<'_>, term: &Term, predicate: &str) -> bool {
    g.objects(term, &iri(predicate))
        .iter()
        .any(|o| o.as_literal().is_some_and(|l| l.as_non_negative_integer().is_some()))
}

/// Whether the qualified-cardinality companion triple is present and its
/// object passes the corresponding eligibility test.
fn qualified_filler_eligible(
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
    branch: Branch,
) -> Result<bool, ViewError> {
    match branch {
        Branch::Object => match g.object(term, &iri(owl::ON_CLASS)) {
            Some(filler) => eligible_class_like(&filler, g, guard),
            None => Ok(false),
        },
        Branch::Data => match g.object(term, &iri(owl::ON_DATA_RANGE)) {
            Some(range) => eligible_data_range_like(&range, g, guard),
            None => Ok(false),
        },
    }
}

/// The n-ary (property-list) branch: `owl:onProperties` instead of a
/// single `owl:onProperty`.
fn classify_nary(
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
) -> Result<Option<ViewKind>, ViewError> {
    let Some(head) = g.object(term, &iri(owl::ON_PROPERTIES)) else {
        return Ok(None);
    };
    let Some(cells) = list::well_formed_cells(g, &head) else {
        return Ok(None);
    };

    for (predicate, kind) in [
        (owl::SOME_VALUES_FROM, ViewKind::NaryDataSomeValuesFrom),
        (owl::ALL_VALUES_FROM, ViewKind::NaryDataAllValuesFrom),
    ] {
        if let Some(range) = g.object(term, &iri(predicate)) {
            if eligible_data_range_like(&range, g, guard)? && cells.len() == range_arity(&range) {
                return Ok(Some(kind));
            }
        }
    }
    Ok(None)
}

/// Classify a node carrying the `owl:Class` marker into an anonymous
/// class-expression kind.
///
/// Complement-of is tested first because it is single-valued and
/// unambiguous; the three list-valued predicates follow, first predicate
/// with a well-formed list wins.
pub fn classify_class_expression(
    term: &Term,
    g: &UnionView<'_>,
) -> Result<Option<ViewKind>, ViewError> {
    if !term.is_blank() || !has_type(g, term, owl::CLASS) {
        return Ok(None);
    }
    if g.object(term, &iri(owl::COMPLEMENT_OF))
        .is_some_and(|o| o.is_resource())
    {
        return Ok(Some(ViewKind::ComplementOf));
    }
    for (predicate, kind) in [
        (owl::INTERSECTION_OF, ViewKind::IntersectionOf),
        (owl::UNION_OF, ViewKind::UnionOf),
        (owl::ONE_OF, ViewKind::OneOf),
    ] {
        if let Some(head) = g.object(term, &iri(predicate)) {
            if list::well_formed_cells(g, &head).is_some() {
                return Ok(Some(kind));
            }
        }
    }
    Ok(None)
}

/// Classify a node carrying the `rdfs:Datatype` marker into an anonymous
/// data-range kind. Mirrors the class-expression precedence.
pub fn classify_data_range(
    term: &Term,
    g: &UnionView<'_>,
) -> Result<Option<ViewKind>, ViewError> {
    if !term.is_blank() || !has_type(g, term, rdfs::DATATYPE) {
        return Ok(None);
    }
    if g.object(term, &iri(owl::DATATYPE_COMPLEMENT_OF))
        .is_some_and(|o| o.is_resource())
    {
        return Ok(Some(ViewKind::DataComplementOf));
    }
    for (predicate, kind) in [
        (owl::INTERSECTION_OF, ViewKind::DataIntersectionOf),
        (owl::UNION_OF, ViewKind::DataUnionOf),
        (owl::ONE_OF, ViewKind::DataOneOf),
    ] {
        if let Some(head) = g.object(term, &iri(predicate)) {
            if list::well_formed_cells(g, &head).is_some() {
                return Ok(Some(kind));
            }
        }
    }
    Ok(None)
}

/// Whether `term` is a list node: the nil sentinel or a well-formed cell
/// chain head.
pub fn is_list_node(g: &UnionView<'_>, term: &Term) -> bool {
    if term.as_iri() == Some(rdf::NIL) {
        return true;
    }
    term.is_resource() && list::well_formed_cells(g, term).is_some_and(|cells| !cells.is_empty())
}

/// Exact structural test for a single view kind.
///
/// This is the eligibility dispatch every factory routes through. For the
/// ambiguous families it compares against the classifier's verdict, which
/// makes the kinds mutually exclusive by construction. Side-effect-free.
pub fn eligible(
    kind: ViewKind,
    term: &Term,
    g: &UnionView<'_>,
    guard: &mut RecursionGuard,
) -> Result<bool, ViewError> {
    use ViewKind::*;
    Ok(match kind {
        Class => is_named_class(g, term),
        Datatype => is_named_datatype(g, term),
        ObjectProperty => is_object_property(g, term),
        DataProperty => is_data_property(g, term),
        AnnotationProperty => is_annotation_property(g, term),
        NamedIndividual => term.is_iri() && has_type(g, term, owl::NAMED_INDIVIDUAL),
        List => is_list_node(g, term),
        ComplementOf | IntersectionOf | UnionOf | OneOf => {
            classify_class_expression(term, g)? == Some(kind)
        }
        DataComplementOf | DataIntersectionOf | DataUnionOf | DataOneOf => {
            classify_data_range(term, g)? == Some(kind)
        }
        AnyRestriction => classify_restriction(term, g, guard)?.is_some(),
        AnyClassExpression => {
            is_named_class(g, term)
                || classify_class_expression(term, g)?.is_some()
                || classify_restriction(term, g, guard)?.is_some()
        }
        AnyDataRange => is_named_datatype(g, term) || classify_data_range(term, g)?.is_some(),
        k => classify_restriction(term, g, guard)? == Some(k),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemGraph;
    use crate::graph::union::{GraphArena, GraphId};
    use crate::term::{Literal, Triple};

    struct Fixture {
        arena: GraphArena,
        root: GraphId,
    }

    impl Fixture {
        fn new() -> Self {
            let arena = GraphArena::new();
            let root = arena.insert(Box::new(MemGraph::new()));
            Self { arena, root }
        }

        fn g(&self) -> UnionView<'_> {
            UnionView::new(&self.arena, self.root)
        }

        fn add(&self, s: Term, p: &str, o: Term) {
            self.arena
                .add(self.root, Triple::new(s, iri(p), o))
                .unwrap();
        }

        fn declare_object_property(&self, p: &str) -> Term {
            let prop = Term::iri(p);
            self.add(prop.clone(), rdf::TYPE, iri(owl::OBJECT_PROPERTY));
            prop
        }

        fn declare_data_property(&self, p: &str) -> Term {
            let prop = Term::iri(p);
            self.add(prop.clone(), rdf::TYPE, iri(owl::DATATYPE_PROPERTY));
            prop
        }

        fn restriction_on(&self, prop: &Term) -> Term {
            let r = Term::blank(format!("r-{prop}"));
            self.add(r.clone(), rdf::TYPE, iri(owl::RESTRICTION));
            self.add(r.clone(), owl::ON_PROPERTY, prop.clone());
            r
        }
    }

    fn classify(f: &Fixture, term: &Term) -> Option<ViewKind> {
        let mut guard = RecursionGuard::new();
        guard
            .scoped(term, |guard| classify_restriction(term, &f.g(), guard))
            .unwrap()
    }

    #[test]
    fn named_nodes_never_classify_as_restrictions() {
        let f = Fixture::new();
        let named = Term::iri("urn:r");
        f.add(named.clone(), rdf::TYPE, iri(owl::RESTRICTION));
        f.add(
            named.clone(),
            owl::ON_PROPERTY,
            f.declare_object_property("urn:p"),
        );
        f.add(named.clone(), owl::SOME_VALUES_FROM, iri(owl::THING));
        assert_eq!(classify(&f, &named), None);
    }

    #[test]
    fn branch_follows_property_declaration() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:op");
        let dp = f.declare_data_property("urn:dp");

        let r1 = f.restriction_on(&op);
        f.add(r1.clone(), owl::SOME_VALUES_FROM, iri(owl::THING));
        assert_eq!(classify(&f, &r1), Some(ViewKind::ObjectSomeValuesFrom));

        let r2 = f.restriction_on(&dp);
        f.add(r2.clone(), owl::ALL_VALUES_FROM, iri(xsd::STRING));
        assert_eq!(classify(&f, &r2), Some(ViewKind::DataAllValuesFrom));
    }

    #[test]
    fn precedence_existential_beats_cardinality() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:p");
        let r = f.restriction_on(&op);
        // Malformed by construction: carries both predicates.
        f.add(r.clone(), owl::MIN_CARDINALITY, Literal::non_negative_integer(1).into());
        f.add(r.clone(), owl::SOME_VALUES_FROM, iri(owl::THING));

        // Deterministic across repeated calls.
        for _ in 0..3 {
            assert_eq!(classify(&f, &r), Some(ViewKind::ObjectSomeValuesFrom));
        }
    }

    #[test]
    fn sloppy_cardinality_literal_is_rejected() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:p");
        let r = f.restriction_on(&op);
        f.add(r.clone(), owl::MAX_CARDINALITY, Literal::string("2").into());
        assert_eq!(classify(&f, &r), None);
    }

    #[test]
    fn qualified_cardinality_requires_eligible_filler() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:p");
        let cls = Term::iri("urn:C");
        f.add(cls.clone(), rdf::TYPE, iri(owl::CLASS));

        let r = f.restriction_on(&op);
        f.add(
            r.clone(),
            owl::MAX_QUALIFIED_CARDINALITY,
            Literal::non_negative_integer(2).into(),
        );
        // No onClass companion yet: matches nothing.
        assert_eq!(classify(&f, &r), None);

        f.add(r.clone(), owl::ON_CLASS, cls);
        assert_eq!(classify(&f, &r), Some(ViewKind::ObjectMaxCardinality));
    }

    #[test]
    fn has_value_object_typing() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:p");
        let dp = f.declare_data_property("urn:q");

        // Literal value on an object branch does not match.
        let r1 = f.restriction_on(&op);
        f.add(r1.clone(), owl::HAS_VALUE, Literal::string("x").into());
        assert_eq!(classify(&f, &r1), None);

        let r2 = f.restriction_on(&dp);
        f.add(r2.clone(), owl::HAS_VALUE, Literal::string("x").into());
        assert_eq!(classify(&f, &r2), Some(ViewKind::DataHasValue));
    }

    #[test]
    fn has_self_requires_true_literal() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:p");
        let r = f.restriction_on(&op);
        f.add(r.clone(), owl::HAS_SELF, Literal::boolean(false).into());
        assert_eq!(classify(&f, &r), None);
        f.add(r.clone(), owl::HAS_SELF, Literal::boolean(true).into());
        assert_eq!(classify(&f, &r), Some(ViewKind::HasSelf));
    }

    #[test]
    fn nary_branch_checks_arity() {
        let f = Fixture::new();
        let dp1 = f.declare_data_property("urn:d1");
        let dp2 = f.declare_data_property("urn:d2");

        // Two-element onProperties list against a unary range: rejected.
        let r = Term::blank("nary");
        f.add(r.clone(), rdf::TYPE, iri(owl::RESTRICTION));
        let c1 = Term::blank("c1");
        let c2 = Term::blank("c2");
        f.add(c1.clone(), rdf::FIRST, dp1.clone());
        f.add(c1.clone(), rdf::REST, c2.clone());
        f.add(c2.clone(), rdf::FIRST, dp2);
        f.add(c2.clone(), rdf::REST, iri(rdf::NIL));
        f.add(r.clone(), owl::ON_PROPERTIES, c1.clone());
        f.add(r.clone(), owl::SOME_VALUES_FROM, iri(xsd::STRING));
        assert_eq!(classify(&f, &r), None);

        // Single-property list matches.
        let r2 = Term::blank("nary2");
        f.add(r2.clone(), rdf::TYPE, iri(owl::RESTRICTION));
        let c3 = Term::blank("c3");
        f.add(c3.clone(), rdf::FIRST, dp1);
        f.add(c3.clone(), rdf::REST, iri(rdf::NIL));
        f.add(r2.clone(), owl::ON_PROPERTIES, c3);
        f.add(r2.clone(), owl::SOME_VALUES_FROM, iri(xsd::STRING));
        assert_eq!(classify(&f, &r2), Some(ViewKind::NaryDataSomeValuesFrom));
    }

    #[test]
    fn class_expression_precedence_complement_first() {
        let f = Fixture::new();
        let x = Term::blank("x");
        f.add(x.clone(), rdf::TYPE, iri(owl::CLASS));
        f.add(x.clone(), owl::COMPLEMENT_OF, iri(owl::THING));

        let cell = Term::blank("cell");
        f.add(cell.clone(), rdf::FIRST, iri(owl::THING));
        f.add(cell.clone(), rdf::REST, iri(rdf::NIL));
        f.add(x.clone(), owl::UNION_OF, cell);

        assert_eq!(
            classify_class_expression(&x, &f.g()).unwrap(),
            Some(ViewKind::ComplementOf)
        );
    }

    #[test]
    fn mutually_referential_fillers_fail_with_recursion() {
        let f = Fixture::new();
        let op = f.declare_object_property("urn:p");

        let r1 = f.restriction_on(&op);
        let r2 = f.restriction_on(&op);
        for (r, filler) in [(&r1, &r2), (&r2, &r1)] {
            f.add(
                r.clone(),
                owl::MIN_QUALIFIED_CARDINALITY,
                Literal::non_negative_integer(1).into(),
            );
            f.add(r.clone(), owl::ON_CLASS, filler.clone());
        }

        let mut guard = RecursionGuard::new();
        let result = guard.scoped(&r1, |guard| classify_restriction(&r1, &f.g(), guard));
        assert!(matches!(result, Err(ViewError::Recursion { .. })));
        // Deterministic: same failure every time.
        let mut guard = RecursionGuard::new();
        let again = guard.scoped(&r1, |guard| classify_restriction(&r1, &f.g(), guard));
        assert!(matches!(again, Err(ViewError::Recursion { .. })));
    }
}
