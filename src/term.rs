//! Core term types for the seshat engine.
//!
//! Terms are the atomic units of the triple graph: named references (IRIs),
//! anonymous blank nodes, and literal values. Equality is structural
//! everywhere; no term carries identity beyond its content. The
//! [`BlankAllocator`] provides thread-safe fresh blank-node generation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Label of an anonymous (blank) node.
///
/// Two blank nodes are the same node exactly when their labels are equal;
/// fresh labels are minted by [`BlankAllocator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlankId(String);

impl BlankId {
    /// Create a blank-node label from a raw string.
    pub fn new(label: impl Into<String>) -> Self {
        BlankId(label.into())
    }

    /// The raw label, without the `_:` prefix.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Thread-safe generator of fresh blank-node labels.
///
/// Labels are `b0`, `b1`, … scoped to one allocator; a model owns one
/// allocator so bootstrap triples written by instantiators never collide.
#[derive(Debug, Default)]
pub struct BlankAllocator {
    next: AtomicU64,
}

impl BlankAllocator {
    /// Create an allocator starting at `b0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh, never-before-returned blank label.
    pub fn fresh(&self) -> BlankId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        BlankId(format!("b{n}"))
    }
}

/// A literal value: lexical form, datatype IRI, optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// The lexical form, uninterpreted.
    pub lexical: String,
    /// Datatype IRI (e.g. `xsd:string`, `xsd:nonNegativeInteger`).
    pub datatype: String,
    /// Language tag for language-tagged strings, lowercase.
    pub language: Option<String>,
}

impl Literal {
    /// A plain `xsd:string` literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: crate::vocab::xsd::STRING.to_string(),
            language: None,
        }
    }

    /// A literal with an explicit datatype IRI.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A language-tagged string.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: crate::vocab::rdf::LANG_STRING.to_string(),
            language: Some(language.into().to_lowercase()),
        }
    }

    /// An `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Self::typed(if value { "true" } else { "false" }, crate::vocab::xsd::BOOLEAN)
    }

    /// An `xsd:nonNegativeInteger` literal, as used by cardinality bounds.
    pub fn non_negative_integer(value: u64) -> Self {
        Self::typed(value.to_string(), crate::vocab::xsd::NON_NEGATIVE_INTEGER)
    }

    /// Parse this literal as a cardinality bound.
    ///
    /// Returns `None` unless the datatype is exactly
    /// `xsd:nonNegativeInteger` and the lexical form is a valid unsigned
    /// decimal integer. Classifiers depend on this strictness: a
    /// cardinality triple with a sloppy literal must not match.
    pub fn as_non_negative_integer(&self) -> Option<u64> {
        if self.datatype != crate::vocab::xsd::NON_NEGATIVE_INTEGER {
            return None;
        }
        if self.lexical.is_empty() || !self.lexical.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.lexical.parse().ok()
    }

    /// Whether this is the boolean literal `true`.
    pub fn is_true(&self) -> bool {
        self.datatype == crate::vocab::xsd::BOOLEAN && self.lexical == "true"
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.lexical)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else {
            write!(f, "^^<{}>", self.datatype)
        }
    }
}

/// A node in the triple graph.
///
/// The three kinds mirror the RDF abstract syntax: named reference (IRI),
/// anonymous reference (blank node), and literal value. Immutable;
/// equality, hashing and ordering are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// A named reference.
    Iri(String),
    /// An anonymous reference.
    Blank(BlankId),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Named-reference constructor.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Blank-node constructor from an existing label.
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(BlankId::new(label))
    }

    /// Literal constructor.
    pub fn literal(lit: Literal) -> Self {
        Term::Literal(lit)
    }

    /// Whether this is a named reference.
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Whether this is an anonymous reference.
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Whether this is a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Whether this term can appear in subject position (IRI or blank).
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    /// The IRI string, if this is a named reference.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this is a literal value.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(id) => write!(f, "{id}"),
            Term::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A (subject, predicate, object) fact.
///
/// The predicate is always a named reference by construction of every
/// entry point in this crate; the type does not re-encode that so triples
/// coming from foreign [`GraphPort`](crate::graph::GraphPort)
/// implementations can be represented losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// The subject of the triple.
    pub subject: Term,
    /// The predicate of the triple.
    pub predicate: Term,
    /// The object of the triple.
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Whether this triple matches a wildcard pattern (`None` = any).
    pub fn matches(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> bool {
        s.is_none_or(|s| *s == self.subject)
            && p.is_none_or(|p| *p == self.predicate)
            && o.is_none_or(|o| *o == self.object)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
