//! RDF Namespace and prefix management
//!
//! Provides the prefixes used by the Data Cube output and the vocabularies the
//! hub reads (SKOS, Dublin Core, PROV, FOAF).

use std::collections::BTreeMap;

/// Standard RDF namespace
pub const PREFIX_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema namespace
pub const PREFIX_RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XML Schema datatypes namespace
pub const PREFIX_XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// OWL namespace
pub const PREFIX_OWL: &str = "http://www.w3.org/2002/07/owl#";
/// Dublin Core Terms namespace
pub const PREFIX_DCT: &str = "http://purl.org/dc/terms/";
/// FOAF namespace
pub const PREFIX_FOAF: &str = "http://xmlns.com/foaf/0.1/";
/// SKOS namespace
pub const PREFIX_SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
/// RDF Data Cube namespace
pub const PREFIX_QB: &str = "http://purl.org/linked-data/cube#";
/// W3C PROV namespace
pub const PREFIX_PROV: &str = "http://www.w3.org/ns/prov#";

/// A namespace with prefix and base IRI
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Short prefix (e.g., "rdf", "qb", "skos")
    pub prefix: String,
    /// Full base IRI
    pub iri: String,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    pub fn rdf() -> Self {
        Self::new("rdf", PREFIX_RDF)
    }

    pub fn skos() -> Self {
        Self::new("skos", PREFIX_SKOS)
    }

    pub fn qb() -> Self {
        Self::new("qb", PREFIX_QB)
    }

    /// Expand a local name to a full IRI
    /// e.g., "DimensionProperty" -> "http://purl.org/linked-data/cube#DimensionProperty"
    pub fn expand(&self, local_name: &str) -> String {
        format!("{}{}", self.iri, local_name)
    }

    /// Check if an IRI belongs to this namespace
    pub fn contains(&self, iri: &str) -> bool {
        iri.starts_with(&self.iri)
    }

    /// Compact an IRI to prefixed form if possible
    pub fn compact(&self, iri: &str) -> Option<String> {
        let local = iri.strip_prefix(self.iri.as_str())?;
        is_local_name(local).then(|| format!("{}:{}", self.prefix, local))
    }
}

/// A map of namespace prefixes.
///
/// Prefixes are kept sorted so that serialized output is stable.
#[derive(Debug, Clone, Default)]
pub struct NamespaceMap {
    prefixes: BTreeMap<String, String>,
}

impl NamespaceMap {
    /// Create an empty namespace map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namespace map with the RDF core prefixes
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.add("rdf", PREFIX_RDF);
        map.add("rdfs", PREFIX_RDFS);
        map.add("xsd", PREFIX_XSD);
        map.add("owl", PREFIX_OWL);
        map
    }

    /// The prefixes written into Data Cube output.
    pub fn datacube_defaults() -> Self {
        let mut map = Self::with_defaults();
        map.add("dct", PREFIX_DCT);
        map.add("foaf", PREFIX_FOAF);
        map.add("skos", PREFIX_SKOS);
        map.add("qb", PREFIX_QB);
        map.add("prov", PREFIX_PROV);
        map
    }

    /// Add a namespace, replacing any previous binding of the prefix
    pub fn add(&mut self, prefix: &str, iri: &str) {
        self.prefixes.insert(prefix.to_string(), iri.to_string());
    }

    /// Get the IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Expand a prefixed name to full IRI
    /// Returns `None` if the prefix is not bound
    pub fn expand(&self, prefixed: &str) -> Option<String> {
        let (prefix, local) = prefixed.split_once(':')?;
        self.prefixes
            .get(prefix)
            .map(|base| format!("{}{}", base, local))
    }

    /// Compact an IRI to prefixed form if possible.
    ///
    /// The longest matching namespace wins, and only local parts that are
    /// valid Turtle local names are compacted.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, base)| iri.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .and_then(|(prefix, base)| {
                let local = &iri[base.len()..];
                is_local_name(local).then(|| format!("{}:{}", prefix, local))
            })
    }

    /// Get all prefixes
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Generate Turtle @prefix declarations
    pub fn to_turtle_prefixes(&self) -> String {
        let mut result = String::new();
        for (prefix, iri) in &self.prefixes {
            result.push_str(&format!("@prefix {}: <{}> .\n", prefix, iri));
        }
        result
    }
}

fn is_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    local
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Well-known IRIs
pub mod iris {
    // RDF vocabulary
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    // RDFS vocabulary
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    // XSD datatypes
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    // Dublin Core
    pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DCT_IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    pub const DCT_CREATOR: &str = "http://purl.org/dc/terms/creator";

    // SKOS
    pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const SKOS_CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
    pub const SKOS_IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const SKOS_NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";

    // RDF Data Cube
    pub const QB_DATASET: &str = "http://purl.org/linked-data/cube#DataSet";
    pub const QB_DSD: &str = "http://purl.org/linked-data/cube#DataStructureDefinition";
    pub const QB_COMPONENT_SPECIFICATION: &str =
        "http://purl.org/linked-data/cube#ComponentSpecification";
    pub const QB_STRUCTURE: &str = "http://purl.org/linked-data/cube#structure";
    pub const QB_COMPONENT: &str = "http://purl.org/linked-data/cube#component";
    pub const QB_ORDER: &str = "http://purl.org/linked-data/cube#order";
    pub const QB_DIMENSION: &str = "http://purl.org/linked-data/cube#dimension";
    pub const QB_MEASURE: &str = "http://purl.org/linked-data/cube#measure";
    pub const QB_ATTRIBUTE: &str = "http://purl.org/linked-data/cube#attribute";
    pub const QB_DIMENSION_PROPERTY: &str = "http://purl.org/linked-data/cube#DimensionProperty";
    pub const QB_MEASURE_PROPERTY: &str = "http://purl.org/linked-data/cube#MeasureProperty";
    pub const QB_ATTRIBUTE_PROPERTY: &str = "http://purl.org/linked-data/cube#AttributeProperty";
    pub const QB_CODED_PROPERTY: &str = "http://purl.org/linked-data/cube#CodedProperty";
    pub const QB_CODE_LIST: &str = "http://purl.org/linked-data/cube#codeList";

    // PROV
    pub const PROV_ACTIVITY: &str = "http://www.w3.org/ns/prov#Activity";
    pub const PROV_ENTITY: &str = "http://www.w3.org/ns/prov#Entity";
    pub const PROV_PERSON: &str = "http://www.w3.org/ns/prov#Person";
    pub const PROV_USED: &str = "http://www.w3.org/ns/prov#used";
    pub const PROV_WAS_GENERATED_BY: &str = "http://www.w3.org/ns/prov#wasGeneratedBy";
    pub const PROV_WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";
    pub const PROV_WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";
    pub const PROV_WAS_ASSOCIATED_WITH: &str = "http://www.w3.org/ns/prov#wasAssociatedWith";
    pub const PROV_GENERATED_AT_TIME: &str = "http://www.w3.org/ns/prov#generatedAtTime";
    pub const PROV_ENDED_AT_TIME: &str = "http://www.w3.org/ns/prov#endedAtTime";

    // FOAF
    pub const FOAF_PERSON: &str = "http://xmlns.com/foaf/0.1/Person";
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const FOAF_MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";
}
