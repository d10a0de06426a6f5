//! Fixed RDF/RDFS/OWL2/XSD vocabulary.
//!
//! These IRIs are constants of the modeled ontology language, not engine
//! configuration: the structural classifier and the annotation model match
//! against them directly. Grouped by namespace.

/// The `rdf:` namespace.
pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LIST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";
    pub const LANG_STRING: &str =
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// The `rdfs:` namespace.
pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
    pub const IS_DEFINED_BY: &str =
        "http://www.w3.org/2000/01/rdf-schema#isDefinedBy";
    pub const DATATYPE: &str = "http://www.w3.org/2000/01/rdf-schema#Datatype";
    pub const SUB_CLASS_OF: &str =
        "http://www.w3.org/2000/01/rdf-schema#subClassOf";
}

/// The `owl:` namespace.
pub mod owl {
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";

    // Marker types.
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    pub const OBJECT_PROPERTY: &str =
        "http://www.w3.org/2002/07/owl#ObjectProperty";
    pub const DATATYPE_PROPERTY: &str =
        "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const ANNOTATION_PROPERTY: &str =
        "http://www.w3.org/2002/07/owl#AnnotationProperty";
    pub const NAMED_INDIVIDUAL: &str =
        "http://www.w3.org/2002/07/owl#NamedIndividual";
    pub const ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    pub const AXIOM: &str = "http://www.w3.org/2002/07/owl#Axiom";
    pub const ANNOTATION: &str = "http://www.w3.org/2002/07/owl#Annotation";

    // Restriction shape predicates.
    pub const ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    pub const ON_PROPERTIES: &str =
        "http://www.w3.org/2002/07/owl#onProperties";
    pub const SOME_VALUES_FROM: &str =
        "http://www.w3.org/2002/07/owl#someValuesFrom";
    pub const ALL_VALUES_FROM: &str =
        "http://www.w3.org/2002/07/owl#allValuesFrom";
    pub const HAS_VALUE: &str = "http://www.w3.org/2002/07/owl#hasValue";
    pub const HAS_SELF: &str = "http://www.w3.org/2002/07/owl#hasSelf";
    pub const MIN_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#minCardinality";
    pub const MAX_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#maxCardinality";
    pub const CARDINALITY: &str = "http://www.w3.org/2002/07/owl#cardinality";
    pub const MIN_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#minQualifiedCardinality";
    pub const MAX_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#maxQualifiedCardinality";
    pub const QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#qualifiedCardinality";
    pub const ON_CLASS: &str = "http://www.w3.org/2002/07/owl#onClass";
    pub const ON_DATA_RANGE: &str =
        "http://www.w3.org/2002/07/owl#onDataRange";
    pub const ON_DATATYPE: &str = "http://www.w3.org/2002/07/owl#onDatatype";

    // Class-expression and data-range predicates.
    pub const COMPLEMENT_OF: &str =
        "http://www.w3.org/2002/07/owl#complementOf";
    pub const DATATYPE_COMPLEMENT_OF: &str =
        "http://www.w3.org/2002/07/owl#datatypeComplementOf";
    pub const INTERSECTION_OF: &str =
        "http://www.w3.org/2002/07/owl#intersectionOf";
    pub const UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
    pub const ONE_OF: &str = "http://www.w3.org/2002/07/owl#oneOf";

    // Reified-annotation predicates.
    pub const ANNOTATED_SOURCE: &str =
        "http://www.w3.org/2002/07/owl#annotatedSource";
    pub const ANNOTATED_PROPERTY: &str =
        "http://www.w3.org/2002/07/owl#annotatedProperty";
    pub const ANNOTATED_TARGET: &str =
        "http://www.w3.org/2002/07/owl#annotatedTarget";

    // Imports.
    pub const IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";

    // Built-in entities usable as ordinary ontology objects.
    pub const THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    pub const NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
    pub const VERSION_INFO: &str =
        "http://www.w3.org/2002/07/owl#versionInfo";
    pub const DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
}

/// The `xsd:` namespace (datatypes the engine interprets).
pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
}

/// Annotation properties every model understands without declaration.
pub const BUILTIN_ANNOTATION_PROPERTIES: &[&str] = &[
    rdfs::LABEL,
    rdfs::COMMENT,
    rdfs::SEE_ALSO,
    rdfs::IS_DEFINED_BY,
    owl::VERSION_INFO,
    owl::DEPRECATED,
];

/// Structural vocabulary that must never be wrapped as an ordinary
/// ontology object (the registry's reserved set).
pub const RESERVED: &[&str] = &[
    rdf::TYPE,
    rdf::FIRST,
    rdf::REST,
    rdf::LIST,
    owl::RESTRICTION,
    owl::AXIOM,
    owl::ANNOTATION,
    owl::ON_PROPERTY,
    owl::ON_PROPERTIES,
    owl::SOME_VALUES_FROM,
    owl::ALL_VALUES_FROM,
    owl::HAS_VALUE,
    owl::HAS_SELF,
    owl::MIN_CARDINALITY,
    owl::MAX_CARDINALITY,
    owl::CARDINALITY,
    owl::MIN_QUALIFIED_CARDINALITY,
    owl::MAX_QUALIFIED_CARDINALITY,
    owl::QUALIFIED_CARDINALITY,
    owl::ON_CLASS,
    owl::ON_DATA_RANGE,
    owl::ON_DATATYPE,
    owl::COMPLEMENT_OF,
    owl::DATATYPE_COMPLEMENT_OF,
    owl::INTERSECTION_OF,
    owl::UNION_OF,
    owl::ONE_OF,
    owl::ANNOTATED_SOURCE,
    owl::ANNOTATED_PROPERTY,
    owl::ANNOTATED_TARGET,
];
