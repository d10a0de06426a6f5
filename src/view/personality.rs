//! The view registry: which kinds exist, how they resolve, what is
//! reserved, and which views may not alias the same node.
//!
//! A [`Personality`] is a closed, composable table. The stock
//! [`Personality::owl2`] covers the full OWL2-style view set; callers can
//! extend a copy with `with_*` builders for dialects.

use std::collections::{HashMap, HashSet};

use crate::error::ViewError;
use crate::term::Term;
use crate::view::ViewKind;
use crate::view::factory::{Factory, Locator};
use crate::vocab::{RESERVED, owl, rdfs};

/// Registry mapping each supported view kind to its factory, plus the
/// reserved-vocabulary and punning tables.
#[derive(Debug, Clone)]
pub struct Personality {
    factories: HashMap<ViewKind, Factory>,
    reserved: HashSet<String>,
    punning: HashMap<ViewKind, Vec<ViewKind>>,
    creatable: HashSet<ViewKind>,
}

impl Personality {
    /// An empty personality. Useless until factories are registered;
    /// exists for dialect construction and tests.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            reserved: HashSet::new(),
            punning: HashMap::new(),
            creatable: HashSet::new(),
        }
    }

    /// The standard OWL2-style personality.
    pub fn owl2() -> Self {
        use ViewKind::*;

        let mut p = Self::empty();

        // Named entities: declared by one rdf:type marker each.
        for (kind, marker) in [
            (Class, owl::CLASS),
            (Datatype, rdfs::DATATYPE),
            (ObjectProperty, owl::OBJECT_PROPERTY),
            (DataProperty, owl::DATATYPE_PROPERTY),
            (AnnotationProperty, owl::ANNOTATION_PROPERTY),
            (NamedIndividual, owl::NAMED_INDIVIDUAL),
        ] {
            p = p.with_factory(
                kind,
                Factory::Leaf {
                    kind,
                    locator: Locator::TypedResources { marker },
                },
            );
        }

        // Restriction sub-kinds all share one locator; the classifier
        // disambiguates.
        let restriction_kinds = [
            ObjectSomeValuesFrom,
            ObjectAllValuesFrom,
            ObjectMinCardinality,
            ObjectMaxCardinality,
            ObjectExactCardinality,
            ObjectHasValue,
            HasSelf,
            DataSomeValuesFrom,
            DataAllValuesFrom,
            DataMinCardinality,
            DataMaxCardinality,
            DataExactCardinality,
            DataHasValue,
            NaryDataSomeValuesFrom,
            NaryDataAllValuesFrom,
        ];
        for kind in restriction_kinds {
            p = p.with_factory(
                kind,
                Factory::Leaf {
                    kind,
                    locator: Locator::TypedResources {
                        marker: owl::RESTRICTION,
                    },
                },
            );
        }

        // Anonymous class expressions and data ranges.
        for kind in [ComplementOf, IntersectionOf, UnionOf, OneOf] {
            p = p.with_factory(
                kind,
                Factory::Leaf {
                    kind,
                    locator: Locator::TypedResources { marker: owl::CLASS },
                },
            );
        }
        for kind in [DataComplementOf, DataIntersectionOf, DataUnionOf, DataOneOf] {
            p = p.with_factory(
                kind,
                Factory::Leaf {
                    kind,
                    locator: Locator::TypedResources {
                        marker: rdfs::DATATYPE,
                    },
                },
            );
        }

        p = p.with_factory(
            List,
            Factory::Leaf {
                kind: List,
                locator: Locator::ListCells,
            },
        );

        // Composite umbrellas. Child order is the resolution priority.
        p = p.with_factory(
            AnyRestriction,
            Factory::Composite {
                children: restriction_kinds.to_vec(),
            },
        );
        p = p.with_factory(
            AnyClassExpression,
            Factory::Composite {
                children: vec![
                    Class,
                    ComplementOf,
                    IntersectionOf,
                    UnionOf,
                    OneOf,
                    AnyRestriction,
                ],
            },
        );
        p = p.with_factory(
            AnyDataRange,
            Factory::Composite {
                children: vec![Datatype, DataComplementOf, DataIntersectionOf, DataUnionOf, DataOneOf],
            },
        );

        for iri in RESERVED {
            p = p.with_reserved(*iri);
        }

        // Illegal punning combinations of the modeled language.
        p = p
            .with_punning(Class, Datatype)
            .with_punning(ObjectProperty, DataProperty)
            .with_punning(ObjectProperty, AnnotationProperty)
            .with_punning(DataProperty, AnnotationProperty);

        // Everything except the umbrellas and raw lists is user-creatable
        // through the model's create_* constructors.
        for kind in p.factories.keys().copied().collect::<Vec<_>>() {
            if !kind.is_composite() {
                p.creatable.insert(kind);
            }
        }
        p
    }

    /// Register (or replace) a factory for a kind.
    pub fn with_factory(mut self, kind: ViewKind, factory: Factory) -> Self {
        self.factories.insert(kind, factory);
        self
    }

    /// Mark an IRI as reserved system vocabulary.
    pub fn with_reserved(mut self, iri: impl Into<String>) -> Self {
        self.reserved.insert(iri.into());
        self
    }

    /// Declare two kinds mutually exclusive for a single node.
    pub fn with_punning(mut self, a: ViewKind, b: ViewKind) -> Self {
        self.punning.entry(a).or_default().push(b);
        self.punning.entry(b).or_default().push(a);
        self
    }

    /// Resolve a kind to its factory.
    pub fn factory(&self, kind: ViewKind) -> Result<&Factory, ViewError> {
        self.factories
            .get(&kind)
            .ok_or(ViewError::Unregistered { kind })
    }

    /// Whether this kind is registered at all.
    pub fn supports(&self, kind: ViewKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Whether the term is reserved vocabulary that must never be wrapped
    /// as an ordinary ontology object.
    pub fn is_reserved(&self, term: &Term) -> bool {
        term.as_iri().is_some_and(|iri| self.reserved.contains(iri))
    }

    /// Kinds that may not coexist with `kind` on one node.
    pub fn conflicts(&self, kind: ViewKind) -> &[ViewKind] {
        self.punning.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the model's constructors may mint this kind.
    pub fn is_creatable(&self, kind: ViewKind) -> bool {
        self.creatable.contains(&kind)
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::owl2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::rdf;

    #[test]
    fn owl2_registry_is_closed_and_complete() {
        let p = Personality::owl2();
        assert!(p.supports(ViewKind::Class));
        assert!(p.supports(ViewKind::NaryDataAllValuesFrom));
        assert!(p.supports(ViewKind::AnyClassExpression));
        assert!(p.is_reserved(&Term::iri(rdf::TYPE)));
        assert!(!p.is_reserved(&Term::iri(owl::THING)));
    }

    #[test]
    fn punning_table_is_symmetric() {
        let p = Personality::owl2();
        assert!(p.conflicts(ViewKind::Class).contains(&ViewKind::Datatype));
        assert!(p.conflicts(ViewKind::Datatype).contains(&ViewKind::Class));
        assert!(p.conflicts(ViewKind::NamedIndividual).is_empty());
    }

    #[test]
    fn umbrellas_are_not_creatable() {
        let p = Personality::owl2();
        assert!(p.is_creatable(ViewKind::Class));
        assert!(!p.is_creatable(ViewKind::AnyRestriction));
    }
}
