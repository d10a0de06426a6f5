//! Typed handle over a resolved restriction node.
//!
//! A [`Restriction`] pairs the anonymous node with the concrete kind it
//! classified to, and exposes the kind's components: the constrained
//! property (or property list for the n-ary forms), the filler, and the
//! cardinality bound where one exists.
//!
//! Cardinality restrictions come in qualified and unqualified spellings
//! that share one view kind. `set_filler` flips between them in place,
//! moving the bound literal between the plain and qualified predicates
//! verbatim so the lexical form survives the rewrite.

use crate::error::{SeshatResult, ViewError};
use crate::graph::union::UnionView;
use crate::model::OntModel;
use crate::term::{Term, Triple};
use crate::view::ViewKind;
use crate::vocab::{owl, rdf};

fn iri(s: &str) -> Term {
    Term::iri(s)
}

/// (plain, qualified) cardinality predicates of a cardinality kind.
pub(crate) fn cardinality_predicates(kind: ViewKind) -> Option<(&'static str, &'static str)> {
    use ViewKind::*;
    match kind {
        ObjectMinCardinality | DataMinCardinality => {
            Some((owl::MIN_CARDINALITY, owl::MIN_QUALIFIED_CARDINALITY))
        }
        ObjectMaxCardinality | DataMaxCardinality => {
            Some((owl::MAX_CARDINALITY, owl::MAX_QUALIFIED_CARDINALITY))
        }
        ObjectExactCardinality | DataExactCardinality => {
            Some((owl::CARDINALITY, owl::QUALIFIED_CARDINALITY))
        }
        _ => None,
    }
}

/// The qualified-filler companion predicate for a cardinality kind.
pub(crate) fn companion_predicate(kind: ViewKind) -> &'static str {
    if kind.is_object_restriction() {
        owl::ON_CLASS
    } else {
        owl::ON_DATA_RANGE
    }
}

/// A resolved restriction view with component accessors and mutators.
#[derive(Debug, Clone)]
pub struct Restriction<'m> {
    model: &'m OntModel,
    term: Term,
    kind: ViewKind,
}

impl<'m> Restriction<'m> {
    pub(crate) fn new(model: &'m OntModel, term: Term, kind: ViewKind) -> Self {
        debug_assert!(kind.is_restriction());
        Self { model, term, kind }
    }

    /// The anonymous restriction node.
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// The concrete kind this node classified to.
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    fn g(&self) -> UnionView<'m> {
        self.model.graph_view()
    }

    fn stale(&self) -> ViewError {
        // The shape this handle was resolved against is no longer present.
        ViewError::Conversion {
            term: self.term.clone(),
            kind: self.kind,
        }
    }

    fn not_applicable(&self, message: &str) -> ViewError {
        ViewError::InvalidArgument {
            kind: self.kind,
            message: message.to_string(),
        }
    }

    /// The single constrained property (all non-n-ary kinds).
    pub fn on_property(&self) -> SeshatResult<Term> {
        if self.is_nary() {
            return Err(self
                .not_applicable("n-ary restrictions constrain a property list, not a single property")
                .into());
        }
        self.g()
            .object(&self.term, &iri(owl::ON_PROPERTY))
            .ok_or_else(|| self.stale().into())
    }

    /// The constrained property list (n-ary kinds only), in order.
    pub fn on_properties(&self) -> SeshatResult<Vec<Term>> {
        if !self.is_nary() {
            return Err(self
                .not_applicable("single-property restrictions have no property list")
                .into());
        }
        let g = self.g();
        let head = g
            .object(&self.term, &iri(owl::ON_PROPERTIES))
            .ok_or_else(|| self.stale())?;
        let cells = crate::list::well_formed_cells(&g, &head).ok_or_else(|| self.stale())?;
        cells
            .iter()
            .map(|cell| {
                g.object(cell, &iri(rdf::FIRST))
                    .ok_or_else(|| self.stale().into())
            })
            .collect()
    }

    fn is_nary(&self) -> bool {
        matches!(
            self.kind,
            ViewKind::NaryDataSomeValuesFrom | ViewKind::NaryDataAllValuesFrom
        )
    }

    /// The filler: the value constraint this restriction carries.
    ///
    /// For existential/universal forms this is the filler class or range;
    /// for value restrictions the constrained value; for qualified
    /// cardinalities the qualifying filler. Unqualified cardinalities and
    /// self-restrictions have none.
    pub fn filler(&self) -> SeshatResult<Option<Term>> {
        use ViewKind::*;
        let g = self.g();
        let filler = match self.kind {
            ObjectSomeValuesFrom | DataSomeValuesFrom | NaryDataSomeValuesFrom => Some(
                g.object(&self.term, &iri(owl::SOME_VALUES_FROM))
                    .ok_or_else(|| self.stale())?,
            ),
            ObjectAllValuesFrom | DataAllValuesFrom | NaryDataAllValuesFrom => Some(
                g.object(&self.term, &iri(owl::ALL_VALUES_FROM))
                    .ok_or_else(|| self.stale())?,
            ),
            ObjectHasValue | DataHasValue => Some(
                g.object(&self.term, &iri(owl::HAS_VALUE))
                    .ok_or_else(|| self.stale())?,
            ),
            HasSelf => None,
            kind if kind.is_cardinality() => {
                g.object(&self.term, &iri(companion_predicate(kind)))
            }
            _ => None,
        };
        Ok(filler)
    }

    /// Whether this cardinality restriction is currently qualified.
    pub fn is_qualified(&self) -> SeshatResult<bool> {
        let (_, qualified) = cardinality_predicates(self.kind)
            .ok_or_else(|| self.not_applicable("kind carries no cardinality bound"))?;
        Ok(!self.g().objects(&self.term, &iri(qualified)).is_empty())
    }

    /// The bound literal triple currently asserted, plain predicate first
    /// so a (malformed) node carrying both spellings reads the same bound
    /// the classifier matched on.
    fn bound_triple(&self) -> SeshatResult<Triple> {
        let (plain, qualified) = cardinality_predicates(self.kind)
            .ok_or_else(|| self.not_applicable("kind carries no cardinality bound"))?;
        let g = self.g();
        for predicate in [plain, qualified] {
            if let Some(object) = g.object(&self.term, &iri(predicate)) {
                return Ok(Triple::new(self.term.clone(), iri(predicate), object));
            }
        }
        Err(self.stale().into())
    }

    /// The cardinality bound.
    pub fn cardinality(&self) -> SeshatResult<u64> {
        let bound = self.bound_triple()?;
        bound
            .object
            .as_literal()
            .and_then(|l| l.as_non_negative_integer())
            .ok_or_else(|| self.stale().into())
    }

    /// Replace the cardinality bound, keeping the qualified/unqualified
    /// spelling as-is.
    pub fn set_cardinality(&self, value: u64) -> SeshatResult<()> {
        let old = self.bound_triple()?;
        self.model.delete_raw(&old)?;
        self.model.insert_raw(Triple::new(
            self.term.clone(),
            old.predicate,
            crate::term::Literal::non_negative_integer(value).into(),
        ))?;
        Ok(())
    }

    /// Set or clear the qualifying filler of a cardinality restriction.
    ///
    /// `Some(filler)` rewrites the restriction to the qualified spelling;
    /// `None` rewrites it back to the unqualified one. The bound literal
    /// is carried over verbatim either way.
    pub fn set_filler(&self, filler: Option<&Term>) -> SeshatResult<()> {
        let (plain, qualified) = cardinality_predicates(self.kind)
            .ok_or_else(|| self.not_applicable("only cardinality restrictions can be (un)qualified"))?;
        let companion = companion_predicate(self.kind);
        let bound = self.bound_triple()?;
        let g = self.g();

        match filler {
            Some(filler) => {
                let eligible = if self.kind.is_object_restriction() {
                    self.model
                        .is_quietly_eligible(filler, ViewKind::AnyClassExpression)
                } else {
                    self.model.is_quietly_eligible(filler, ViewKind::AnyDataRange)
                };
                if !eligible {
                    return Err(self
                        .not_applicable("qualifying filler does not qualify for the branch's range")
                        .into());
                }
                for old in g.objects(&self.term, &iri(companion)) {
                    self.model
                        .delete_raw(&Triple::new(self.term.clone(), iri(companion), old))?;
                }
                self.model.insert_raw(Triple::new(
                    self.term.clone(),
                    iri(companion),
                    filler.clone(),
                ))?;
                if bound.predicate.as_iri() == Some(plain) {
                    self.model.delete_raw(&bound)?;
                    self.model.insert_raw(Triple::new(
                        self.term.clone(),
                        iri(qualified),
                        bound.object,
                    ))?;
                }
            }
            None => {
                for old in g.objects(&self.term, &iri(companion)) {
                    self.model
                        .delete_raw(&Triple::new(self.term.clone(), iri(companion), old))?;
                }
                if bound.predicate.as_iri() == Some(qualified) {
                    self.model.delete_raw(&bound)?;
                    self.model.insert_raw(Triple::new(
                        self.term.clone(),
                        iri(plain),
                        bound.object,
                    ))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeshatError;
    use crate::term::Literal;
    use crate::vocab::xsd;

    fn model_with_object_property() -> (OntModel, Term) {
        let model = OntModel::new();
        let prop = Term::iri("urn:p");
        model
            .add_triple(Triple::new(
                prop.clone(),
                iri(rdf::TYPE),
                iri(owl::OBJECT_PROPERTY),
            ))
            .unwrap();
        (model, prop)
    }

    #[test]
    fn qualified_flip_preserves_bound_literal() {
        let (model, prop) = model_with_object_property();
        let cls = model.create_class(&Term::iri("urn:C")).unwrap();
        let view = model
            .create_object_max_cardinality(&prop, 2, Some(cls.term()))
            .unwrap();
        let r = model.restriction(view.term()).unwrap();

        assert_eq!(r.kind(), ViewKind::ObjectMaxCardinality);
        assert!(r.is_qualified().unwrap());
        assert_eq!(r.cardinality().unwrap(), 2);

        r.set_filler(None).unwrap();
        assert!(!r.is_qualified().unwrap());
        assert_eq!(r.cardinality().unwrap(), 2);
        assert_eq!(r.filler().unwrap(), None);
        // The exact literal moved to the plain predicate.
        assert!(model.contains(&Triple::new(
            r.term().clone(),
            iri(owl::MAX_CARDINALITY),
            Literal::non_negative_integer(2).into(),
        )));

        r.set_filler(Some(cls.term())).unwrap();
        assert!(r.is_qualified().unwrap());
        assert_eq!(r.cardinality().unwrap(), 2);
        assert_eq!(r.filler().unwrap(), Some(cls.term().clone()));
    }

    #[test]
    fn set_cardinality_rewrites_in_place() {
        let (model, prop) = model_with_object_property();
        let view = model
            .create_object_min_cardinality(&prop, 1, None)
            .unwrap();
        let r = model.restriction(view.term()).unwrap();
        r.set_cardinality(3).unwrap();
        assert_eq!(r.cardinality().unwrap(), 3);
        assert!(!r.is_qualified().unwrap());
    }

    #[test]
    fn both_spellings_read_the_plain_bound() {
        let (model, prop) = model_with_object_property();
        let cls = model.create_class(&Term::iri("urn:C")).unwrap();

        // Malformed by construction: the node carries both the plain and
        // the qualified spelling. The classifier matches the plain one
        // first; the handle must report that same bound.
        let node = Term::blank("both");
        for (p, o) in [
            (rdf::TYPE, iri(owl::RESTRICTION)),
            (owl::ON_PROPERTY, prop),
            (
                owl::MIN_CARDINALITY,
                Literal::non_negative_integer(1).into(),
            ),
            (
                owl::MIN_QUALIFIED_CARDINALITY,
                Literal::non_negative_integer(5).into(),
            ),
            (owl::ON_CLASS, cls.term().clone()),
        ] {
            model
                .add_triple(Triple::new(node.clone(), iri(p), o))
                .unwrap();
        }

        let r = model.restriction(&node).unwrap();
        assert_eq!(r.kind(), ViewKind::ObjectMinCardinality);
        assert_eq!(r.cardinality().unwrap(), 1);
    }

    #[test]
    fn filler_of_existential_restriction() {
        let (model, prop) = model_with_object_property();
        let cls = model.create_class(&Term::iri("urn:C")).unwrap();
        let view = model
            .create_object_some_values_from(&prop, cls.term())
            .unwrap();
        let r = model.restriction(view.term()).unwrap();
        assert_eq!(r.kind(), ViewKind::ObjectSomeValuesFrom);
        assert_eq!(r.filler().unwrap(), Some(cls.term().clone()));
        assert_eq!(r.on_property().unwrap(), prop);
        assert!(matches!(
            r.cardinality(),
            Err(SeshatError::View(ViewError::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn ineligible_qualifying_filler_rejected() {
        let (model, prop) = model_with_object_property();
        let view = model
            .create_object_exact_cardinality(&prop, 1, None)
            .unwrap();
        let r = model.restriction(view.term()).unwrap();
        // urn:NotAClass carries no class declaration.
        assert!(matches!(
            r.set_filler(Some(&Term::iri("urn:NotAClass"))),
            Err(SeshatError::View(ViewError::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn nary_property_list_accessor() {
        let model = OntModel::new();
        let dp = Term::iri("urn:d");
        model
            .add_triple(Triple::new(
                dp.clone(),
                iri(rdf::TYPE),
                iri(owl::DATATYPE_PROPERTY),
            ))
            .unwrap();
        let view = model
            .create_nary_data_some_values_from(&[dp.clone()], &Term::iri(xsd::STRING))
            .unwrap();
        let r = model.restriction(view.term()).unwrap();
        assert_eq!(r.kind(), ViewKind::NaryDataSomeValuesFrom);
        assert_eq!(r.on_properties().unwrap(), vec![dp]);
        assert_eq!(r.filler().unwrap(), Some(Term::iri(xsd::STRING)));
        assert!(matches!(
            r.on_property(),
            Err(SeshatError::View(ViewError::InvalidArgument { .. }))
        ));
    }
}
