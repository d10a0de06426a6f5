//! # seshat
//!
//! A typed ontology object model over untyped triple graphs.
//!
//! Nothing in the graph *is* a class, a restriction or a list; a node
//! *currently qualifies* for those views depending on the triples around
//! it. seshat resolves views on demand through a registry of factories
//! (the [`Personality`](view::personality::Personality)), classifies
//! ambiguous anonymous shapes structurally, and hands out lightweight
//! handles that re-validate against the graph instead of pinning it.
//!
//! ## Architecture
//!
//! - **Terms** (`term`): IRIs, blank nodes, literals; structural equality
//! - **Graphs** (`graph`): pluggable [`GraphPort`](graph::GraphPort)
//!   backends composed through a cycle-safe import arena
//! - **Views** (`view`): the closed [`ViewKind`](view::ViewKind) set,
//!   factories, and the precedence-ordered structural classifier
//! - **Lists** (`list`): the two-predicate linked-cell convention with
//!   expiring sub-list handles
//! - **Statements** (`statement`): first-class triples with plain and
//!   reified (bulk) annotations
//!
//! ## Library usage
//!
//! ```
//! use seshat::model::OntModel;
//! use seshat::term::Term;
//! use seshat::view::ViewKind;
//!
//! let model = OntModel::new();
//! let person = model.create_class(&Term::iri("urn:Person")).unwrap();
//! let knows = model.create_object_property(&Term::iri("urn:knows")).unwrap();
//! let sociable = model
//!     .create_object_min_cardinality(knows.term(), 1, Some(person.term()))
//!     .unwrap();
//! assert_eq!(sociable.kind(), ViewKind::ObjectMinCardinality);
//! ```

pub mod cache;
pub mod error;
pub mod graph;
pub mod list;
pub mod model;
pub mod restriction;
pub mod statement;
pub mod term;
pub mod view;
pub mod vocab;

pub use error::{SeshatError, SeshatResult};
pub use model::OntModel;
pub use term::{Literal, Term, Triple};
pub use view::{TypedView, ViewKind};
