//! Typed views: the closed set of ontology interfaces a node can hold.
//!
//! A node never *is* a class or a restriction; it *currently qualifies*
//! for those views depending on the triples around it. A resolved view is
//! just a `(Term, ViewKind)` pair — cheap to copy, safe to cache, and
//! re-validated against the graph on demand.

pub mod classify;
pub mod factory;
pub mod personality;

use serde::{Deserialize, Serialize};

use crate::term::Term;
use crate::vocab::{owl, rdf, rdfs};

/// The closed set of typed ontology interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewKind {
    // Named entities.
    Class,
    Datatype,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,

    // Object-property restrictions.
    ObjectSomeValuesFrom,
    ObjectAllValuesFrom,
    ObjectMinCardinality,
    ObjectMaxCardinality,
    ObjectExactCardinality,
    ObjectHasValue,
    HasSelf,

    // Data-property restrictions.
    DataSomeValuesFrom,
    DataAllValuesFrom,
    DataMinCardinality,
    DataMaxCardinality,
    DataExactCardinality,
    DataHasValue,

    // N-ary (property-list) data restrictions.
    NaryDataSomeValuesFrom,
    NaryDataAllValuesFrom,

    // Anonymous class expressions.
    ComplementOf,
    IntersectionOf,
    UnionOf,
    OneOf,

    // Anonymous data ranges.
    DataComplementOf,
    DataIntersectionOf,
    DataUnionOf,
    DataOneOf,

    // Structural.
    List,

    // Composite (umbrella) kinds resolved to a concrete child.
    AnyRestriction,
    AnyClassExpression,
    AnyDataRange,
}

impl ViewKind {
    /// Whether this kind is one of the concrete restriction views.
    pub fn is_restriction(self) -> bool {
        use ViewKind::*;
        matches!(
            self,
            ObjectSomeValuesFrom
                | ObjectAllValuesFrom
                | ObjectMinCardinality
                | ObjectMaxCardinality
                | ObjectExactCardinality
                | ObjectHasValue
                | HasSelf
                | DataSomeValuesFrom
                | DataAllValuesFrom
                | DataMinCardinality
                | DataMaxCardinality
                | DataExactCardinality
                | DataHasValue
                | NaryDataSomeValuesFrom
                | NaryDataAllValuesFrom
        )
    }

    /// Whether this kind carries a cardinality bound.
    pub fn is_cardinality(self) -> bool {
        use ViewKind::*;
        matches!(
            self,
            ObjectMinCardinality
                | ObjectMaxCardinality
                | ObjectExactCardinality
                | DataMinCardinality
                | DataMaxCardinality
                | DataExactCardinality
        )
    }

    /// Whether the restriction constrains an object property.
    pub fn is_object_restriction(self) -> bool {
        use ViewKind::*;
        matches!(
            self,
            ObjectSomeValuesFrom
                | ObjectAllValuesFrom
                | ObjectMinCardinality
                | ObjectMaxCardinality
                | ObjectExactCardinality
                | ObjectHasValue
                | HasSelf
        )
    }

    /// Whether this is an umbrella kind resolved via a composite factory.
    pub fn is_composite(self) -> bool {
        use ViewKind::*;
        matches!(self, AnyRestriction | AnyClassExpression | AnyDataRange)
    }

    /// The marker type whose `rdf:type` triple structurally declares this
    /// kind, if the kind is type-declared at all.
    pub fn declaring_type(self) -> Option<&'static str> {
        use ViewKind::*;
        match self {
            Class | ComplementOf | IntersectionOf | UnionOf | OneOf => Some(owl::CLASS),
            Datatype | DataComplementOf | DataIntersectionOf | DataUnionOf | DataOneOf => {
                Some(rdfs::DATATYPE)
            }
            ObjectProperty => Some(owl::OBJECT_PROPERTY),
            DataProperty => Some(owl::DATATYPE_PROPERTY),
            AnnotationProperty => Some(owl::ANNOTATION_PROPERTY),
            NamedIndividual => Some(owl::NAMED_INDIVIDUAL),
            List => Some(rdf::LIST),
            kind if kind.is_restriction() => Some(owl::RESTRICTION),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A resolved typed view: a term known (at resolution time) to satisfy
/// `kind`'s structural contract.
///
/// Handles do not pin the graph; a later mutation can invalidate the view,
/// and operations re-validate where staleness matters (lists, statements).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedView {
    term: Term,
    kind: ViewKind,
}

impl TypedView {
    /// Pair a term with a kind. Crate-internal: only factories mint views.
    pub(crate) fn new(term: Term, kind: ViewKind) -> Self {
        Self { term, kind }
    }

    /// The underlying graph node.
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// The view this node resolved to.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Unwrap to the bare term.
    pub fn into_term(self) -> Term {
        self.term
    }
}

impl std::fmt::Display for TypedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} as {}", self.term, self.kind)
    }
}
