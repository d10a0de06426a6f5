//! The ontology model: one composed graph, one personality, one cache.
//!
//! [`OntModel`] is the crate's entry point. It owns the graph arena with
//! the model's base graph at the root, the [`Personality`] deciding which
//! typed views exist, the per-model [`NodeCache`], and a blank-node
//! allocator for bootstrap triples.
//!
//! All methods take `&self`; interior mutability lives in the layers
//! below. View handles ([`TypedView`], [`OntList`], [`OntStatement`],
//! [`Restriction`]) borrow the model and route every mutation back
//! through it so cache invalidation cannot be bypassed.

use std::sync::Arc;

use crate::cache::{NodeCache, RecursionGuard};
use crate::error::{GraphError, SeshatResult, StatementError, ViewError};
use crate::graph::union::{GraphArena, GraphId, UnionView};
use crate::graph::{GraphPort, GraphSize, MemGraph};
use crate::list::OntList;
use crate::restriction::Restriction;
use crate::statement::{self, OntStatement};
use crate::term::{BlankAllocator, BlankId, Literal, Term, Triple};
use crate::view::personality::Personality;
use crate::view::{TypedView, ViewKind, classify};
use crate::vocab::{owl, rdf, rdfs};

fn iri(s: &str) -> Term {
    Term::iri(s)
}

/// Every concrete (non-composite) view kind, in declaration order.
const CONCRETE_KINDS: &[ViewKind] = &[
    ViewKind::Class,
    ViewKind::Datatype,
    ViewKind::ObjectProperty,
    ViewKind::DataProperty,
    ViewKind::AnnotationProperty,
    ViewKind::NamedIndividual,
    ViewKind::ObjectSomeValuesFrom,
    ViewKind::ObjectAllValuesFrom,
    ViewKind::ObjectMinCardinality,
    ViewKind::ObjectMaxCardinality,
    ViewKind::ObjectExactCardinality,
    ViewKind::ObjectHasValue,
    ViewKind::HasSelf,
    ViewKind::DataSomeValuesFrom,
    ViewKind::DataAllValuesFrom,
    ViewKind::DataMinCardinality,
    ViewKind::DataMaxCardinality,
    ViewKind::DataExactCardinality,
    ViewKind::DataHasValue,
    ViewKind::NaryDataSomeValuesFrom,
    ViewKind::NaryDataAllValuesFrom,
    ViewKind::ComplementOf,
    ViewKind::IntersectionOf,
    ViewKind::UnionOf,
    ViewKind::OneOf,
    ViewKind::DataComplementOf,
    ViewKind::DataIntersectionOf,
    ViewKind::DataUnionOf,
    ViewKind::DataOneOf,
    ViewKind::List,
];

/// An ontology model over a composed graph.
pub struct OntModel {
    arena: GraphArena,
    root: GraphId,
    personality: Arc<Personality>,
    cache: NodeCache,
    blanks: BlankAllocator,
}

impl std::fmt::Debug for OntModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntModel")
            .field("root", &self.root)
            .field("personality", &self.personality)
            .field("cache", &self.cache)
            .field("blanks", &self.blanks)
            .finish_non_exhaustive()
    }
}

impl OntModel {
    /// A model over a fresh in-memory base graph with the stock
    /// personality.
    pub fn new() -> Self {
        Self::with_base(Box::new(MemGraph::named("base")))
    }

    /// A model over a caller-supplied base graph.
    pub fn with_base(base: Box<dyn GraphPort>) -> Self {
        Self::with_personality(base, Arc::new(Personality::default()))
    }

    /// A model over a caller-supplied base graph and personality.
    pub fn with_personality(base: Box<dyn GraphPort>, personality: Arc<Personality>) -> Self {
        let arena = GraphArena::new();
        let root = arena.insert(base);
        Self {
            arena,
            root,
            personality,
            cache: NodeCache::new(),
            blanks: BlankAllocator::new(),
        }
    }

    /// The personality deciding which views this model supports.
    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    /// The root graph handle.
    pub fn root(&self) -> GraphId {
        self.root
    }

    pub(crate) fn graph_view(&self) -> UnionView<'_> {
        UnionView::new(&self.arena, self.root)
    }

    pub(crate) fn fresh_blank(&self) -> BlankId {
        self.blanks.fresh()
    }

    // -----------------------------------------------------------------
    // Triple-level access
    // -----------------------------------------------------------------

    fn validate(&self, triple: &Triple) -> Result<(), GraphError> {
        if triple.subject.is_literal() {
            return Err(GraphError::LiteralSubject {
                term: triple.subject.clone(),
            });
        }
        if !triple.predicate.is_iri() {
            return Err(GraphError::BadPredicate {
                term: triple.predicate.clone(),
            });
        }
        Ok(())
    }

    /// Invalidate cache entries for every term the triple touches.
    fn touch(&self, triple: &Triple) {
        self.cache.invalidate(&triple.subject);
        self.cache.invalidate(&triple.predicate);
        self.cache.invalidate(&triple.object);
    }

    /// Validated write into the base graph, bypassing the wrapper-core
    /// guard. Internal mutation path for view handles.
    pub(crate) fn insert_raw(&self, triple: Triple) -> SeshatResult<()> {
        self.validate(&triple)?;
        self.touch(&triple);
        self.arena.add(self.root, triple)?;
        Ok(())
    }

    /// Validated removal from the base graph, bypassing the wrapper-core
    /// guard.
    pub(crate) fn delete_raw(&self, triple: &Triple) -> SeshatResult<()> {
        self.touch(triple);
        self.arena.remove(self.root, triple)?;
        Ok(())
    }

    /// Assert a triple in the base graph.
    pub fn add_triple(&self, triple: Triple) -> SeshatResult<()> {
        self.insert_raw(triple)
    }

    /// Retract a triple from the base graph.
    ///
    /// Core triples of a wrapper still holding annotations are refused;
    /// delete the annotations first (or the wrapper empties and goes away
    /// on its own).
    pub fn remove_triple(&self, triple: &Triple) -> SeshatResult<()> {
        if statement::is_live_wrapper_core(&self.graph_view(), triple) {
            return Err(StatementError::WrapperCore {
                wrapper: triple.subject.clone(),
            }
            .into());
        }
        self.delete_raw(triple)
    }

    /// Union pattern match over the base graph and all imports.
    pub fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<Triple> {
        self.graph_view().find(s, p, o)
    }

    /// Union containment test.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.graph_view().contains(triple)
    }

    /// Whether the triple is asserted in the base graph itself.
    pub fn is_local(&self, triple: &Triple) -> SeshatResult<bool> {
        Ok(self.arena.contains_local(self.root, triple)?)
    }

    /// Effective size of the composed graph.
    pub fn size(&self) -> SeshatResult<GraphSize> {
        Ok(self.arena.size(self.root)?)
    }

    // -----------------------------------------------------------------
    // Imports
    // -----------------------------------------------------------------

    /// Register `base` as a sub-graph imported by the root.
    pub fn import(&self, base: Box<dyn GraphPort>) -> SeshatResult<GraphId> {
        let id = self.arena.insert(base);
        self.arena.add_import(self.root, id)?;
        self.cache.clear();
        Ok(id)
    }

    /// Declare that `parent` imports `child`. Cycles are permitted; all
    /// traversals terminate on them.
    pub fn add_import(&self, parent: GraphId, child: GraphId) -> SeshatResult<()> {
        self.arena.add_import(parent, child)?;
        self.cache.clear();
        Ok(())
    }

    /// Retract an import edge.
    pub fn remove_import(&self, parent: GraphId, child: GraphId) -> SeshatResult<()> {
        self.arena.remove_import(parent, child)?;
        self.cache.clear();
        Ok(())
    }

    /// Close a graph and every sub-graph reachable only through it.
    pub fn close(&self, id: GraphId) -> SeshatResult<()> {
        self.arena.close(id)?;
        self.cache.clear();
        Ok(())
    }

    /// Render the import hierarchy, cycle-safe.
    pub fn import_tree(&self) -> SeshatResult<String> {
        Ok(self.arena.import_tree(self.root)?)
    }

    // -----------------------------------------------------------------
    // View resolution
    // -----------------------------------------------------------------

    /// Resolve `term` as `kind`, or fail.
    ///
    /// Composite kinds resolve to their first eligible child; the returned
    /// view always carries a concrete kind. Resolution is memoized until a
    /// mutation touches the term.
    pub fn get_node_as(&self, term: &Term, kind: ViewKind) -> SeshatResult<TypedView> {
        if self.personality.is_reserved(term) {
            return Err(ViewError::Reserved { term: term.clone() }.into());
        }
        if !kind.is_composite() && self.cache.hit(term, kind) {
            return Ok(TypedView::new(term.clone(), kind));
        }
        let factory = self.personality.factory(kind)?;
        let g = self.graph_view();
        let mut guard = RecursionGuard::new();
        let view = guard.scoped(term, |guard| {
            let view = factory.instantiate(term, &g, &self.personality, guard)?;
            for conflict in self.personality.conflicts(view.kind()) {
                if classify::eligible(*conflict, term, &g, guard)? {
                    return Err(ViewError::Punning {
                        term: term.clone(),
                        requested: view.kind(),
                        held: *conflict,
                    });
                }
            }
            Ok(view)
        })?;
        tracing::trace!(%term, kind = %view.kind(), "view resolved");
        self.cache.insert(term.clone(), view.kind());
        Ok(view)
    }

    /// Resolve `term` as `kind`, mapping structural ineligibility to
    /// `None`. Punning, reservation and recursion failures still error.
    pub fn try_get_node_as(&self, term: &Term, kind: ViewKind) -> SeshatResult<Option<TypedView>> {
        match self.get_node_as(term, kind) {
            Ok(view) => Ok(Some(view)),
            Err(crate::error::SeshatError::View(ViewError::Conversion { .. })) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Silent eligibility probe: any failure (including recursion) reads
    /// as "not eligible". Used where ineligible content is skipped rather
    /// than reported, e.g. typed list members.
    pub(crate) fn is_quietly_eligible(&self, term: &Term, kind: ViewKind) -> bool {
        let Ok(factory) = self.personality.factory(kind) else {
            return false;
        };
        let g = self.graph_view();
        let mut guard = RecursionGuard::new();
        guard
            .scoped(term, |guard| {
                factory.eligible(term, &g, &self.personality, guard)
            })
            .unwrap_or(false)
    }

    /// All views of `kind` currently resolvable in the composed graph.
    ///
    /// Candidates failing instantiation (located but ineligible, punned,
    /// reserved, or self-referential) are skipped.
    pub fn list_views(&self, kind: ViewKind) -> SeshatResult<Vec<TypedView>> {
        let factory = self.personality.factory(kind)?;
        let g = self.graph_view();
        let mut out = Vec::new();
        for candidate in factory.locate(&g, &self.personality) {
            if self.personality.is_reserved(&candidate) {
                continue;
            }
            let mut guard = RecursionGuard::new();
            let resolved = guard.scoped(&candidate, |guard| {
                factory.instantiate(&candidate, &g, &self.personality, guard)
            });
            if let Ok(view) = resolved {
                out.push(view);
            }
        }
        Ok(out)
    }

    /// Kinds structurally declared by an `rdf:type` triple with this
    /// marker object, restricted to what the personality supports.
    pub(crate) fn kinds_declared_by(&self, marker: &str) -> Vec<ViewKind> {
        CONCRETE_KINDS
            .iter()
            .copied()
            .filter(|k| k.declaring_type() == Some(marker) && self.personality.supports(*k))
            .collect()
    }

    // -----------------------------------------------------------------
    // Statements and lists
    // -----------------------------------------------------------------

    /// View (s, p, o) as a first-class statement. The triple need not be
    /// asserted; annotation operations check that themselves.
    pub fn statement(&self, s: Term, p: Term, o: Term) -> OntStatement<'_> {
        OntStatement::new(self, Triple::new(s, p, o))
    }

    /// All asserted statements matching a wildcard pattern.
    pub fn statements(
        &self,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Vec<OntStatement<'_>> {
        self.find(s, p, o)
            .into_iter()
            .map(|t| OntStatement::new(self, t))
            .collect()
    }

    /// Typed list handle over the chain hanging off (anchor, link).
    ///
    /// Fails if the pointer is absent or the chain is malformed.
    pub fn get_list(
        &self,
        anchor: &Term,
        link: &Term,
        element_kind: ViewKind,
    ) -> SeshatResult<OntList<'_>> {
        let list = OntList::root(self, anchor.clone(), link.clone(), element_kind);
        list.size()?;
        Ok(list)
    }

    /// Materialize a new chain from `elements` and point (anchor, link)
    /// at its head.
    pub fn create_list(
        &self,
        anchor: &Term,
        link: &Term,
        element_kind: ViewKind,
        elements: &[Term],
    ) -> SeshatResult<OntList<'_>> {
        let head = self.build_chain(elements)?;
        self.insert_raw(Triple::new(anchor.clone(), link.clone(), head))?;
        Ok(OntList::root(
            self,
            anchor.clone(),
            link.clone(),
            element_kind,
        ))
    }

    /// Build a nil-terminated cell chain, back to front, returning the
    /// head (nil for an empty slice).
    fn build_chain(&self, elements: &[Term]) -> SeshatResult<Term> {
        let mut head = iri(rdf::NIL);
        for element in elements.iter().rev() {
            let cell = Term::Blank(self.fresh_blank());
            self.insert_raw(Triple::new(cell.clone(), iri(rdf::FIRST), element.clone()))?;
            self.insert_raw(Triple::new(cell.clone(), iri(rdf::REST), head))?;
            head = cell;
        }
        Ok(head)
    }

    // -----------------------------------------------------------------
    // Constructors: named entities
    // -----------------------------------------------------------------

    /// Punning/reservation pre-flight shared by every constructor. Runs
    /// before any write so a refused creation leaves no partial triples.
    fn ensure_creatable(&self, term: &Term, kind: ViewKind) -> SeshatResult<()> {
        if self.personality.is_reserved(term) {
            return Err(ViewError::Reserved { term: term.clone() }.into());
        }
        if !self.personality.is_creatable(kind) {
            return Err(ViewError::InvalidArgument {
                kind,
                message: "kind is not directly creatable".to_string(),
            }
            .into());
        }
        for conflict in self.personality.conflicts(kind) {
            if self.is_quietly_eligible(term, *conflict) {
                return Err(ViewError::Punning {
                    term: term.clone(),
                    requested: kind,
                    held: *conflict,
                }
                .into());
            }
        }
        Ok(())
    }

    fn create_entity(&self, term: &Term, kind: ViewKind) -> SeshatResult<TypedView> {
        if !term.is_iri() {
            return Err(ViewError::InvalidArgument {
                kind,
                message: format!("named entities require an IRI, got {term}"),
            }
            .into());
        }
        self.ensure_creatable(term, kind)?;
        let marker = kind.declaring_type().ok_or(ViewError::Unregistered { kind })?;
        self.insert_raw(Triple::new(term.clone(), iri(rdf::TYPE), iri(marker)))?;
        self.get_node_as(term, kind)
    }

    /// Declare a named class.
    pub fn create_class(&self, term: &Term) -> SeshatResult<TypedView> {
        self.create_entity(term, ViewKind::Class)
    }

    /// Declare a named datatype.
    pub fn create_datatype(&self, term: &Term) -> SeshatResult<TypedView> {
        self.create_entity(term, ViewKind::Datatype)
    }

    /// Declare an object-valued property.
    pub fn create_object_property(&self, term: &Term) -> SeshatResult<TypedView> {
        self.create_entity(term, ViewKind::ObjectProperty)
    }

    /// Declare a data-valued property.
    pub fn create_data_property(&self, term: &Term) -> SeshatResult<TypedView> {
        self.create_entity(term, ViewKind::DataProperty)
    }

    /// Declare an annotation property.
    pub fn create_annotation_property(&self, term: &Term) -> SeshatResult<TypedView> {
        self.create_entity(term, ViewKind::AnnotationProperty)
    }

    /// Declare a named individual.
    pub fn create_named_individual(&self, term: &Term) -> SeshatResult<TypedView> {
        self.create_entity(term, ViewKind::NamedIndividual)
    }

    // -----------------------------------------------------------------
    // Constructors: restrictions
    // -----------------------------------------------------------------

    fn require_object_property(&self, property: &Term, kind: ViewKind) -> SeshatResult<()> {
        if !classify::is_object_property(&self.graph_view(), property) {
            return Err(ViewError::InvalidArgument {
                kind,
                message: format!("{property} is not a declared object property"),
            }
            .into());
        }
        Ok(())
    }

    fn require_data_property(&self, property: &Term, kind: ViewKind) -> SeshatResult<()> {
        if !classify::is_data_property(&self.graph_view(), property) {
            return Err(ViewError::InvalidArgument {
                kind,
                message: format!("{property} is not a declared data property"),
            }
            .into());
        }
        Ok(())
    }

    fn require_class_like(&self, filler: &Term, kind: ViewKind) -> SeshatResult<()> {
        if !self.is_quietly_eligible(filler, ViewKind::AnyClassExpression) {
            return Err(ViewError::InvalidArgument {
                kind,
                message: format!("{filler} does not qualify as a class expression"),
            }
            .into());
        }
        Ok(())
    }

    fn require_data_range_like(&self, range: &Term, kind: ViewKind) -> SeshatResult<()> {
        if !self.is_quietly_eligible(range, ViewKind::AnyDataRange) {
            return Err(ViewError::InvalidArgument {
                kind,
                message: format!("{range} does not qualify as a data range"),
            }
            .into());
        }
        Ok(())
    }

    /// Mint an anonymous node and bootstrap it with the restriction
    /// marker plus the single-property pointer.
    fn new_restriction(&self, property: Option<&Term>) -> SeshatResult<Term> {
        let node = Term::Blank(self.fresh_blank());
        self.insert_raw(Triple::new(
            node.clone(),
            iri(rdf::TYPE),
            iri(owl::RESTRICTION),
        ))?;
        if let Some(property) = property {
            self.insert_raw(Triple::new(
                node.clone(),
                iri(owl::ON_PROPERTY),
                property.clone(),
            ))?;
        }
        Ok(node)
    }

    fn create_values_from(
        &self,
        property: &Term,
        filler: &Term,
        kind: ViewKind,
        predicate: &'static str,
    ) -> SeshatResult<TypedView> {
        if kind.is_object_restriction() {
            self.require_object_property(property, kind)?;
            self.require_class_like(filler, kind)?;
        } else {
            self.require_data_property(property, kind)?;
            self.require_data_range_like(filler, kind)?;
        }
        let node = self.new_restriction(Some(property))?;
        self.insert_raw(Triple::new(node.clone(), iri(predicate), filler.clone()))?;
        self.get_node_as(&node, kind)
    }

    /// `∃ property . filler` over an object property.
    pub fn create_object_some_values_from(
        &self,
        property: &Term,
        filler: &Term,
    ) -> SeshatResult<TypedView> {
        self.create_values_from(
            property,
            filler,
            ViewKind::ObjectSomeValuesFrom,
            owl::SOME_VALUES_FROM,
        )
    }

    /// `∀ property . filler` over an object property.
    pub fn create_object_all_values_from(
        &self,
        property: &Term,
        filler: &Term,
    ) -> SeshatResult<TypedView> {
        self.create_values_from(
            property,
            filler,
            ViewKind::ObjectAllValuesFrom,
            owl::ALL_VALUES_FROM,
        )
    }

    /// `∃ property . range` over a data property.
    pub fn create_data_some_values_from(
        &self,
        property: &Term,
        range: &Term,
    ) -> SeshatResult<TypedView> {
        self.create_values_from(
            property,
            range,
            ViewKind::DataSomeValuesFrom,
            owl::SOME_VALUES_FROM,
        )
    }

    /// `∀ property . range` over a data property.
    pub fn create_data_all_values_from(
        &self,
        property: &Term,
        range: &Term,
    ) -> SeshatResult<TypedView> {
        self.create_values_from(
            property,
            range,
            ViewKind::DataAllValuesFrom,
            owl::ALL_VALUES_FROM,
        )
    }

    /// Value restriction over an object property; the value must be a
    /// resource.
    pub fn create_object_has_value(&self, property: &Term, value: &Term) -> SeshatResult<TypedView> {
        let kind = ViewKind::ObjectHasValue;
        self.require_object_property(property, kind)?;
        if !value.is_resource() {
            return Err(ViewError::InvalidArgument {
                kind,
                message: format!("object value restrictions require a resource, got {value}"),
            }
            .into());
        }
        let node = self.new_restriction(Some(property))?;
        self.insert_raw(Triple::new(node.clone(), iri(owl::HAS_VALUE), value.clone()))?;
        self.get_node_as(&node, kind)
    }

    /// Value restriction over a data property; the value must be a
    /// literal.
    pub fn create_data_has_value(
        &self,
        property: &Term,
        value: &Literal,
    ) -> SeshatResult<TypedView> {
        let kind = ViewKind::DataHasValue;
        self.require_data_property(property, kind)?;
        let node = self.new_restriction(Some(property))?;
        self.insert_raw(Triple::new(
            node.clone(),
            iri(owl::HAS_VALUE),
            value.clone().into(),
        ))?;
        self.get_node_as(&node, kind)
    }

    /// Local-reflexivity restriction over an object property.
    pub fn create_has_self(&self, property: &Term) -> SeshatResult<TypedView> {
        let kind = ViewKind::HasSelf;
        self.require_object_property(property, kind)?;
        let node = self.new_restriction(Some(property))?;
        self.insert_raw(Triple::new(
            node.clone(),
            iri(owl::HAS_SELF),
            Literal::boolean(true).into(),
        ))?;
        self.get_node_as(&node, kind)
    }

    fn create_cardinality(
        &self,
        property: &Term,
        bound: u64,
        filler: Option<&Term>,
        kind: ViewKind,
    ) -> SeshatResult<TypedView> {
        let (plain, qualified) =
            crate::restriction::cardinality_predicates(kind).ok_or(ViewError::Unregistered { kind })?;
        if kind.is_object_restriction() {
            self.require_object_property(property, kind)?;
            if let Some(filler) = filler {
                self.require_class_like(filler, kind)?;
            }
        } else {
            self.require_data_property(property, kind)?;
            if let Some(filler) = filler {
                self.require_data_range_like(filler, kind)?;
            }
        }
        let node = self.new_restriction(Some(property))?;
        let literal: Term = Literal::non_negative_integer(bound).into();
        match filler {
            // Qualified spelling with the companion filler triple.
            Some(filler) => {
                self.insert_raw(Triple::new(node.clone(), iri(qualified), literal))?;
                self.insert_raw(Triple::new(
                    node.clone(),
                    iri(crate::restriction::companion_predicate(kind)),
                    filler.clone(),
                ))?;
            }
            None => {
                self.insert_raw(Triple::new(node.clone(), iri(plain), literal))?;
            }
        }
        self.get_node_as(&node, kind)
    }

    /// Minimum-cardinality restriction over an object property; a filler
    /// makes it qualified.
    pub fn create_object_min_cardinality(
        &self,
        property: &Term,
        bound: u64,
        filler: Option<&Term>,
    ) -> SeshatResult<TypedView> {
        self.create_cardinality(property, bound, filler, ViewKind::ObjectMinCardinality)
    }

    /// Maximum-cardinality restriction over an object property.
    pub fn create_object_max_cardinality(
        &self,
        property: &Term,
        bound: u64,
        filler: Option<&Term>,
    ) -> SeshatResult<TypedView> {
        self.create_cardinality(property, bound, filler, ViewKind::ObjectMaxCardinality)
    }

    /// Exact-cardinality restriction over an object property.
    pub fn create_object_exact_cardinality(
        &self,
        property: &Term,
        bound: u64,
        filler: Option<&Term>,
    ) -> SeshatResult<TypedView> {
        self.create_cardinality(property, bound, filler, ViewKind::ObjectExactCardinality)
    }

    /// Minimum-cardinality restriction over a data property.
    pub fn create_data_min_cardinality(
        &self,
        property: &Term,
        bound: u64,
        range: Option<&Term>,
    ) -> SeshatResult<TypedView> {
        self.create_cardinality(property, bound, range, ViewKind::DataMinCardinality)
    }

    /// Maximum-cardinality restriction over a data property.
    pub fn create_data_max_cardinality(
        &self,
        property: &Term,
        bound: u64,
        range: Option<&Term>,
    ) -> SeshatResult<TypedView> {
        self.create_cardinality(property, bound, range, ViewKind::DataMaxCardinality)
    }

    /// Exact-cardinality restriction over a data property.
    pub fn create_data_exact_cardinality(
        &self,
        property: &Term,
        bound: u64,
        range: Option<&Term>,
    ) -> SeshatResult<TypedView> {
        self.create_cardinality(property, bound, range, ViewKind::DataExactCardinality)
    }

    fn create_nary(
        &self,
        properties: &[Term],
        range: &Term,
        kind: ViewKind,
        predicate: &'static str,
    ) -> SeshatResult<TypedView> {
        for property in properties {
            self.require_data_property(property, kind)?;
        }
        self.require_data_range_like(range, kind)?;
        let expected = classify::range_arity(range);
        if properties.len() != expected {
            return Err(ViewError::ArityMismatch {
                expected,
                actual: properties.len(),
            }
            .into());
        }
        let head = self.build_chain(properties)?;
        let node = self.new_restriction(None)?;
        self.insert_raw(Triple::new(node.clone(), iri(owl::ON_PROPERTIES), head))?;
        self.insert_raw(Triple::new(node.clone(), iri(predicate), range.clone()))?;
        self.get_node_as(&node, kind)
    }

    /// N-ary existential data restriction over a property list.
    pub fn create_nary_data_some_values_from(
        &self,
        properties: &[Term],
        range: &Term,
    ) -> SeshatResult<TypedView> {
        self.create_nary(
            properties,
            range,
            ViewKind::NaryDataSomeValuesFrom,
            owl::SOME_VALUES_FROM,
        )
    }

    /// N-ary universal data restriction over a property list.
    pub fn create_nary_data_all_values_from(
        &self,
        properties: &[Term],
        range: &Term,
    ) -> SeshatResult<TypedView> {
        self.create_nary(
            properties,
            range,
            ViewKind::NaryDataAllValuesFrom,
            owl::ALL_VALUES_FROM,
        )
    }

    /// Typed restriction handle: resolves `term` through the restriction
    /// umbrella to its concrete kind.
    pub fn restriction(&self, term: &Term) -> SeshatResult<Restriction<'_>> {
        let view = self.get_node_as(term, ViewKind::AnyRestriction)?;
        Ok(Restriction::new(self, term.clone(), view.kind()))
    }

    // -----------------------------------------------------------------
    // Constructors: class expressions and data ranges
    // -----------------------------------------------------------------

    /// Complement of a class expression.
    pub fn create_complement_of(&self, operand: &Term) -> SeshatResult<TypedView> {
        let kind = ViewKind::ComplementOf;
        self.require_class_like(operand, kind)?;
        let node = Term::Blank(self.fresh_blank());
        self.insert_raw(Triple::new(node.clone(), iri(rdf::TYPE), iri(owl::CLASS)))?;
        self.insert_raw(Triple::new(
            node.clone(),
            iri(owl::COMPLEMENT_OF),
            operand.clone(),
        ))?;
        self.get_node_as(&node, kind)
    }

    fn create_class_combination(
        &self,
        operands: &[Term],
        kind: ViewKind,
        predicate: &'static str,
        check_operands: bool,
    ) -> SeshatResult<TypedView> {
        if check_operands {
            for operand in operands {
                self.require_class_like(operand, kind)?;
            }
        }
        let head = self.build_chain(operands)?;
        let node = Term::Blank(self.fresh_blank());
        self.insert_raw(Triple::new(node.clone(), iri(rdf::TYPE), iri(owl::CLASS)))?;
        self.insert_raw(Triple::new(node.clone(), iri(predicate), head))?;
        self.get_node_as(&node, kind)
    }

    /// Intersection of class expressions.
    pub fn create_intersection_of(&self, operands: &[Term]) -> SeshatResult<TypedView> {
        self.create_class_combination(operands, ViewKind::IntersectionOf, owl::INTERSECTION_OF, true)
    }

    /// Union of class expressions.
    pub fn create_union_of(&self, operands: &[Term]) -> SeshatResult<TypedView> {
        self.create_class_combination(operands, ViewKind::UnionOf, owl::UNION_OF, true)
    }

    /// Enumerated class: a closed list of individuals.
    pub fn create_one_of(&self, individuals: &[Term]) -> SeshatResult<TypedView> {
        let kind = ViewKind::OneOf;
        for individual in individuals {
            if !individual.is_resource() {
                return Err(ViewError::InvalidArgument {
                    kind,
                    message: format!("enumerated classes hold resources, got {individual}"),
                }
                .into());
            }
        }
        self.create_class_combination(individuals, kind, owl::ONE_OF, false)
    }

    /// Complement of a data range.
    pub fn create_data_complement_of(&self, operand: &Term) -> SeshatResult<TypedView> {
        let kind = ViewKind::DataComplementOf;
        self.require_data_range_like(operand, kind)?;
        let node = Term::Blank(self.fresh_blank());
        self.insert_raw(Triple::new(node.clone(), iri(rdf::TYPE), iri(rdfs::DATATYPE)))?;
        self.insert_raw(Triple::new(
            node.clone(),
            iri(owl::DATATYPE_COMPLEMENT_OF),
            operand.clone(),
        ))?;
        self.get_node_as(&node, kind)
    }

    fn create_range_combination(
        &self,
        operands: &[Term],
        kind: ViewKind,
        predicate: &'static str,
        check_operands: bool,
    ) -> SeshatResult<TypedView> {
        if check_operands {
            for operand in operands {
                self.require_data_range_like(operand, kind)?;
            }
        }
        let head = self.build_chain(operands)?;
        let node = Term::Blank(self.fresh_blank());
        self.insert_raw(Triple::new(node.clone(), iri(rdf::TYPE), iri(rdfs::DATATYPE)))?;
        self.insert_raw(Triple::new(node.clone(), iri(predicate), head))?;
        self.get_node_as(&node, kind)
    }

    /// Intersection of data ranges.
    pub fn create_data_intersection_of(&self, operands: &[Term]) -> SeshatResult<TypedView> {
        self.create_range_combination(
            operands,
            ViewKind::DataIntersectionOf,
            owl::INTERSECTION_OF,
            true,
        )
    }

    /// Union of data ranges.
    pub fn create_data_union_of(&self, operands: &[Term]) -> SeshatResult<TypedView> {
        self.create_range_combination(operands, ViewKind::DataUnionOf, owl::UNION_OF, true)
    }

    /// Enumerated data range: a closed list of literals.
    pub fn create_data_one_of(&self, literals: &[Literal]) -> SeshatResult<TypedView> {
        let elements: Vec<Term> = literals.iter().cloned().map(Term::from).collect();
        self.create_range_combination(&elements, ViewKind::DataOneOf, owl::ONE_OF, false)
    }
}

impl Default for OntModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeshatError;

    #[test]
    fn entity_round_trip() {
        let model = OntModel::new();
        let cls = Term::iri("urn:C");
        let created = model.create_class(&cls).unwrap();
        assert_eq!(created.kind(), ViewKind::Class);

        let fetched = model.get_node_as(&cls, ViewKind::Class).unwrap();
        assert_eq!(fetched.term(), &cls);
        // Second resolution is a cache hit; same answer either way.
        assert_eq!(model.get_node_as(&cls, ViewKind::Class).unwrap(), fetched);
    }

    #[test]
    fn reserved_vocabulary_is_never_wrapped() {
        let model = OntModel::new();
        assert!(matches!(
            model.get_node_as(&Term::iri(rdf::TYPE), ViewKind::AnnotationProperty),
            Err(SeshatError::View(ViewError::Reserved { .. }))
        ));
        assert!(matches!(
            model.create_class(&Term::iri(owl::ON_PROPERTY)),
            Err(SeshatError::View(ViewError::Reserved { .. }))
        ));
    }

    #[test]
    fn punning_refused_before_any_write() {
        let model = OntModel::new();
        let term = Term::iri("urn:P");
        model.create_object_property(&term).unwrap();
        let before = model.find(None, None, None).len();

        assert!(matches!(
            model.create_data_property(&term),
            Err(SeshatError::View(ViewError::Punning { .. }))
        ));
        // The refused creation wrote nothing.
        assert_eq!(model.find(None, None, None).len(), before);

        // Class/individual punning is legal.
        model.create_class(&Term::iri("urn:X")).unwrap();
        model.create_named_individual(&Term::iri("urn:X")).unwrap();
    }

    #[test]
    fn try_get_maps_only_conversion_to_none() {
        let model = OntModel::new();
        let untyped = Term::iri("urn:nothing");
        assert!(model
            .try_get_node_as(&untyped, ViewKind::Class)
            .unwrap()
            .is_none());
        assert!(matches!(
            model.try_get_node_as(&Term::iri(rdf::TYPE), ViewKind::Class),
            Err(SeshatError::View(ViewError::Reserved { .. }))
        ));
    }

    #[test]
    fn umbrella_resolves_to_concrete_kind() {
        let model = OntModel::new();
        let prop = model.create_object_property(&Term::iri("urn:p")).unwrap();
        let cls = model.create_class(&Term::iri("urn:C")).unwrap();
        let view = model
            .create_object_all_values_from(prop.term(), cls.term())
            .unwrap();

        let resolved = model
            .get_node_as(view.term(), ViewKind::AnyRestriction)
            .unwrap();
        assert_eq!(resolved.kind(), ViewKind::ObjectAllValuesFrom);

        let as_class_expr = model
            .get_node_as(view.term(), ViewKind::AnyClassExpression)
            .unwrap();
        assert_eq!(as_class_expr.kind(), ViewKind::ObjectAllValuesFrom);
    }

    #[test]
    fn mutation_invalidates_resolution() {
        let model = OntModel::new();
        let cls = Term::iri("urn:C");
        let decl = Triple::new(cls.clone(), iri(rdf::TYPE), iri(owl::CLASS));
        model.add_triple(decl.clone()).unwrap();
        model.get_node_as(&cls, ViewKind::Class).unwrap();

        model.remove_triple(&decl).unwrap();
        assert!(model
            .try_get_node_as(&cls, ViewKind::Class)
            .unwrap()
            .is_none());
    }

    #[test]
    fn list_views_enumerates_eligible_only() {
        let model = OntModel::new();
        model.create_class(&Term::iri("urn:A")).unwrap();
        model.create_class(&Term::iri("urn:B")).unwrap();
        // A named node carrying the restriction marker: located, never
        // eligible, never listed.
        model
            .add_triple(Triple::new(
                Term::iri("urn:fake"),
                iri(rdf::TYPE),
                iri(owl::RESTRICTION),
            ))
            .unwrap();

        assert_eq!(model.list_views(ViewKind::Class).unwrap().len(), 2);
        assert!(model.list_views(ViewKind::AnyRestriction).unwrap().is_empty());
    }

    #[test]
    fn imports_are_visible_and_closable() {
        let model = OntModel::new();
        let imported = Box::new(MemGraph::named("imported"));
        let t = Triple::new(
            Term::iri("urn:C"),
            iri(rdf::TYPE),
            iri(owl::CLASS),
        );
        imported.add(t.clone()).unwrap();
        let id = model.import(imported).unwrap();

        assert!(model.contains(&t));
        assert!(!model.is_local(&t).unwrap());
        model.get_node_as(&Term::iri("urn:C"), ViewKind::Class).unwrap();
        assert!(model.import_tree().unwrap().contains("imported"));

        model.close(id).unwrap();
        assert!(!model.contains(&t));
        assert!(model
            .try_get_node_as(&Term::iri("urn:C"), ViewKind::Class)
            .unwrap()
            .is_none());
    }

    #[test]
    fn nary_arity_mismatch_is_refused() {
        let model = OntModel::new();
        let d1 = model.create_data_property(&Term::iri("urn:d1")).unwrap();
        let d2 = model.create_data_property(&Term::iri("urn:d2")).unwrap();
        assert!(matches!(
            model.create_nary_data_some_values_from(
                &[d1.term().clone(), d2.term().clone()],
                &Term::iri(crate::vocab::xsd::STRING),
            ),
            Err(SeshatError::View(ViewError::ArityMismatch {
                expected: 1,
                actual: 2
            }))
        ));
    }

    #[test]
    fn created_composites_resolve() {
        let model = OntModel::new();
        let a = model.create_class(&Term::iri("urn:A")).unwrap();
        let b = model.create_class(&Term::iri("urn:B")).unwrap();

        let inter = model
            .create_intersection_of(&[a.term().clone(), b.term().clone()])
            .unwrap();
        assert_eq!(inter.kind(), ViewKind::IntersectionOf);

        let comp = model.create_complement_of(a.term()).unwrap();
        assert_eq!(comp.kind(), ViewKind::ComplementOf);

        let range = model
            .create_data_one_of(&[Literal::string("x"), Literal::string("y")])
            .unwrap();
        assert_eq!(range.kind(), ViewKind::DataOneOf);

        // The enumerated range's member list reads back in order.
        let list = model
            .get_list(range.term(), &iri(owl::ONE_OF), ViewKind::List)
            .unwrap();
        assert_eq!(list.size().unwrap(), 2);
    }

    #[test]
    fn literal_subjects_and_bad_predicates_rejected() {
        let model = OntModel::new();
        assert!(matches!(
            model.add_triple(Triple::new(
                Literal::string("x").into(),
                iri("urn:p"),
                iri("urn:o"),
            )),
            Err(SeshatError::Graph(GraphError::LiteralSubject { .. }))
        ));
        assert!(matches!(
            model.add_triple(Triple::new(
                iri("urn:s"),
                Literal::string("p").into(),
                iri("urn:o"),
            )),
            Err(SeshatError::Graph(GraphError::BadPredicate { .. }))
        ));
    }
}
