//! Rich diagnostic error types for the seshat engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so callers know exactly
//! which structural contract was violated and how to fix it.
//!
//! Failure policy: structural/eligibility checks never fail — they return
//! booleans. Only commitment operations (wrap, instantiate, mutate) return
//! errors, and every error is immediate and synchronous.

use miette::Diagnostic;
use thiserror::Error;

use crate::term::Term;
use crate::view::ViewKind;

/// Top-level error type for the seshat engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SeshatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Statement(#[from] StatementError),
}

/// Result type carrying the top-level error.
pub type SeshatResult<T> = std::result::Result<T, SeshatError>;

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("graph {graph} is closed")]
    #[diagnostic(
        code(seshat::graph::closed),
        help(
            "The graph was closed, transitively or directly, through \
             `OntModel::close` or `GraphArena::close`. Closed graphs reject \
             all reads and writes; create a new model over a live base graph."
        )
    )]
    Closed { graph: usize },

    #[error("unknown graph id {graph}")]
    #[diagnostic(
        code(seshat::graph::unknown),
        help(
            "The GraphId does not name a node in this arena. GraphIds are \
             only valid within the arena that issued them."
        )
    )]
    Unknown { graph: usize },

    #[error("literal term {term} cannot appear in subject position")]
    #[diagnostic(
        code(seshat::graph::literal_subject),
        help("Only named references and blank nodes can be triple subjects.")
    )]
    LiteralSubject { term: Term },

    #[error("term {term} cannot appear in predicate position")]
    #[diagnostic(
        code(seshat::graph::bad_predicate),
        help("Predicates must be named references (IRIs).")
    )]
    BadPredicate { term: Term },
}

// ---------------------------------------------------------------------------
// View-resolution errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ViewError {
    #[error("node {term} does not satisfy the structural contract of {kind}")]
    #[diagnostic(
        code(seshat::view::conversion),
        help(
            "The triples currently surrounding this node do not match the \
             requested view's shape. Use `OntModel::try_get_node_as` if a \
             missing view is an expected outcome, or add the declaring \
             triples first."
        )
    )]
    Conversion { term: Term, kind: ViewKind },

    #[error("punning conflict on {term}: requested {requested} but node already holds {held}")]
    #[diagnostic(
        code(seshat::view::punning),
        help(
            "The personality's punning table forbids this combination of \
             views for a single node. Use a distinct IRI for the second \
             declaration."
        )
    )]
    Punning {
        term: Term,
        requested: ViewKind,
        held: ViewKind,
    },

    #[error("term {term} is reserved system vocabulary")]
    #[diagnostic(
        code(seshat::view::reserved),
        help(
            "Structural vocabulary (rdf:type, owl:onProperty, list cell \
             predicates, …) can never be wrapped as an ordinary ontology \
             object."
        )
    )]
    Reserved { term: Term },

    #[error("re-entrant resolution of {term} detected")]
    #[diagnostic(
        code(seshat::view::recursion),
        help(
            "Resolving a view of this node requires resolving another view \
             of the same node (directly or through a cycle of qualified \
             fillers). The graph shape is self-referential; break the cycle \
             or treat the node as untyped."
        )
    )]
    Recursion { term: Term },

    #[error("no factory registered for {kind}")]
    #[diagnostic(
        code(seshat::view::unregistered),
        help(
            "The personality in use does not support this view kind. \
             Register a factory with `Personality::with_factory`."
        )
    )]
    Unregistered { kind: ViewKind },

    #[error("n-ary restriction arity mismatch: {expected} properties expected, list has {actual}")]
    #[diagnostic(
        code(seshat::view::arity),
        help(
            "The owl:onProperties list length must exactly equal the arity \
             of the restriction's value range. This is a construction-time \
             failure, never a silent truncation."
        )
    )]
    ArityMismatch { expected: usize, actual: usize },

    #[error("invalid argument for {kind}: {message}")]
    #[diagnostic(
        code(seshat::view::invalid_argument),
        help("The constructor was called with a malformed parameter.")
    )]
    InvalidArgument { kind: ViewKind, message: String },
}

// ---------------------------------------------------------------------------
// List errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ListError {
    #[error("list handle rooted at {head} has expired")]
    #[diagnostic(
        code(seshat::list::expired),
        help(
            "An ancestor cell of this sub-list was cleared or replaced \
             after the handle was obtained. Re-fetch the list from its \
             anchor subject."
        )
    )]
    Expired { head: Term },

    #[error("list index {index} out of bounds (size {size})")]
    #[diagnostic(code(seshat::list::out_of_bounds))]
    OutOfBounds { index: usize, size: usize },

    #[error("list starting at {head} contains a cycle")]
    #[diagnostic(
        code(seshat::list::cyclic),
        help(
            "Following rdf:rest links revisited a cell. The underlying \
             graph is malformed; repair it before using list operations."
        )
    )]
    Cyclic { head: Term },

    #[error("list cell {cell} is malformed")]
    #[diagnostic(
        code(seshat::list::malformed),
        help(
            "Every cell must carry exactly one rdf:first and exactly one \
             rdf:rest. The underlying graph violates the list convention."
        )
    )]
    Malformed { cell: Term },

    #[error("cannot insert a list's own cell {cell} as an element")]
    #[diagnostic(code(seshat::list::self_insertion))]
    SelfInsertion { cell: Term },

    #[error("cannot remove from an empty list")]
    #[diagnostic(code(seshat::list::empty))]
    Empty,

    #[error("interior list cell {cell} cannot carry annotations")]
    #[diagnostic(
        code(seshat::list::interior_annotation),
        help(
            "Only a list's root cell has root-statement semantics; interior \
             cells are structural and unannotatable."
        )
    )]
    InteriorAnnotation { cell: Term },
}

// ---------------------------------------------------------------------------
// Statement / annotation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StatementError {
    #[error("statement {statement} is not asserted in the graph")]
    #[diagnostic(
        code(seshat::statement::absent),
        help(
            "Annotation operations require the annotated statement to be \
             asserted. Add the triple before annotating it."
        )
    )]
    Absent { statement: String },

    #[error("annotation ({property}, {value}) not found on statement")]
    #[diagnostic(code(seshat::statement::annotation_not_found))]
    AnnotationNotFound { property: Term, value: Term },

    #[error("annotation ({property}, {value}) itself carries annotations")]
    #[diagnostic(
        code(seshat::statement::nested_annotations),
        help(
            "Deleting an annotation that has its own annotations would \
             orphan them. Call `clear_annotations` on it first."
        )
    )]
    NestedAnnotations { property: Term, value: Term },

    #[error("cannot remove a core triple of reified wrapper {wrapper}")]
    #[diagnostic(
        code(seshat::statement::wrapper_core),
        help(
            "owl:annotatedSource/Property/Target and the wrapper's rdf:type \
             hold sibling annotations together; the wrapper is deleted as a \
             whole when it becomes empty, never piecemeal."
        )
    )]
    WrapperCore { wrapper: Term },

    #[error("{term} is not an annotation property")]
    #[diagnostic(
        code(seshat::statement::not_annotation_property),
        help(
            "Annotation values must be asserted through a declared \
             owl:AnnotationProperty or one of the built-in annotation \
             properties (rdfs:label, rdfs:comment, …)."
        )
    )]
    NotAnnotationProperty { term: Term },
}
