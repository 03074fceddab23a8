//! RDF Data Cube conversion.
//!
//! Turns the variable annotations of a dataset into a Data Structure
//! Definition spread over three named graphs:
//!
//! - **structure**: the `qb:DataSet`, its `qb:DataStructureDefinition` and one
//!   `qb:ComponentSpecification` per variable
//! - **vocabulary**: the component properties, their code lists and concepts
//! - **provenance**: who converted which source file version, and when
//!
//! All three graphs live under `<resource_base><dataset>/<hash>`, so every
//! committed version of a source file gets its own set of graphs.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::iri::{is_safe, mint, to_iri};
use crate::namespace::iris;
use crate::{Error, RdfDataset, RdfTerm, RdfTriple, Result, TrigSerializer};

/// Default namespace for minted dataset resources.
pub const DEFAULT_RESOURCE_BASE: &str = "http://data.socialhistory.org/resource/";
/// Default namespace for minted variables.
pub const DEFAULT_VOCAB_BASE: &str = "http://data.socialhistory.org/vocab/";

/// Where minted IRIs live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCubeConfig {
    pub resource_base: String,
    pub vocab_base: String,
}

impl Default for DataCubeConfig {
    fn default() -> Self {
        Self {
            resource_base: DEFAULT_RESOURCE_BASE.to_string(),
            vocab_base: DEFAULT_VOCAB_BASE.to_string(),
        }
    }
}

/// The Data Cube role of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComponentRole {
    #[default]
    Dimension,
    Measure,
    Attribute,
}

impl ComponentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::Measure => "measure",
            Self::Attribute => "attribute",
        }
    }

    /// The `qb:ComponentSpecification` predicate linking to the property.
    pub fn component_predicate(&self) -> &'static str {
        match self {
            Self::Dimension => iris::QB_DIMENSION,
            Self::Measure => iris::QB_MEASURE,
            Self::Attribute => iris::QB_ATTRIBUTE,
        }
    }

    /// The class of the component property.
    pub fn property_class(&self) -> &'static str {
        match self {
            Self::Dimension => iris::QB_DIMENSION_PROPERTY,
            Self::Measure => iris::QB_MEASURE_PROPERTY,
            Self::Attribute => iris::QB_ATTRIBUTE_PROPERTY,
        }
    }
}

impl TryFrom<String> for ComponentRole {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let role = [Self::Dimension, Self::Measure, Self::Attribute]
            .into_iter()
            .find(|role| {
                value.eq_ignore_ascii_case(role.as_str()) || value == role.property_class()
            });
        role.ok_or_else(|| format!("unknown component type '{}'", value))
    }
}

impl From<ComponentRole> for String {
    fn from(role: ComponentRole) -> Self {
        role.as_str().to_string()
    }
}

/// Reference from a variable to the SKOS scheme holding its codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeListRef {
    pub uri: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// An observed value of a variable, optionally mapped onto a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMapping {
    pub label: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub notation: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// What a user said about one column of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableAnnotation {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub role: ComponentRole,
    #[serde(default)]
    pub codelist: Option<CodeListRef>,
    #[serde(default)]
    pub values: Vec<ValueMapping>,
}

/// The person submitting a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Everything the converter needs to know about one submission.
#[derive(Debug, Clone)]
pub struct DataCubeInput {
    /// Display name of the dataset, usually the file name.
    pub name: String,
    /// Path of the source file.
    pub path: String,
    /// Content hash of the committed source file.
    pub source_hash: String,
    pub author: Author,
    /// Annotations keyed by column id, in column order.
    pub variables: IndexMap<String, VariableAnnotation>,
    pub generated_at: DateTime<Utc>,
}

/// The graph names of one converted dataset version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNames {
    pub dataset: String,
    pub structure: String,
    pub vocabulary: String,
    pub provenance: String,
}

impl GraphNames {
    pub fn new(input: &DataCubeInput, config: &DataCubeConfig) -> Self {
        let dataset = mint(
            &config.resource_base,
            &format!("{}/{}", input.name, input.source_hash),
        );
        Self {
            structure: format!("{}/structure", dataset),
            vocabulary: format!("{}/vocabulary", dataset),
            provenance: format!("{}/provenance", dataset),
            dataset,
        }
    }
}

/// Build the Data Structure Definition of a dataset.
///
/// Returns a dataset with the structure, vocabulary and provenance graphs, in
/// that order.
pub fn data_structure_definition(
    input: &DataCubeInput,
    config: &DataCubeConfig,
) -> Result<RdfDataset> {
    let names = GraphNames::new(input, config);
    let mut dataset = RdfDataset::new();

    let dsd = format!("{}/dsd", names.dataset);
    {
        let structure = dataset.graph_mut(&names.structure);
        structure.push(type_triple(&names.dataset, iris::QB_DATASET));
        structure.push(RdfTriple::iri(
            &names.dataset,
            iris::RDFS_LABEL,
            RdfTerm::literal(&input.name),
        ));
        structure.push(RdfTriple::iri(
            &names.dataset,
            iris::QB_STRUCTURE,
            RdfTerm::iri(&dsd),
        ));
        structure.push(type_triple(&dsd, iris::QB_DSD));
    }

    for (order, (column, variable)) in input.variables.iter().enumerate() {
        let property = property_iri(column, variable, config)?;
        let component = mint(&format!("{}/component", names.dataset), column);

        let structure = dataset.graph_mut(&names.structure);
        structure.push(RdfTriple::iri(&dsd, iris::QB_COMPONENT, RdfTerm::iri(&component)));
        structure.push(type_triple(&component, iris::QB_COMPONENT_SPECIFICATION));
        structure.push(RdfTriple::iri(
            &component,
            variable.role.component_predicate(),
            RdfTerm::iri(&property),
        ));
        structure.push(RdfTriple::iri(
            &component,
            iris::QB_ORDER,
            RdfTerm::integer(order as i64 + 1),
        ));

        let vocabulary = dataset.graph_mut(&names.vocabulary);
        for triple in describe_property(&property, column, variable)? {
            vocabulary.push(triple);
        }
    }

    let provenance = dataset.graph_mut(&names.provenance);
    for triple in provenance_triples(input, config, &names) {
        provenance.push(triple);
    }

    log::debug!(
        "Converted {} variables of {} into {} triples",
        input.variables.len(),
        input.name,
        dataset.triple_count()
    );
    Ok(dataset)
}

/// Render a converted dataset as TriG.
pub fn serialize_trig(dataset: &RdfDataset, config: &DataCubeConfig) -> String {
    let mut serializer = TrigSerializer::new();
    serializer.add_namespace("vocab", &config.vocab_base);
    serializer.serialize(dataset)
}

fn property_iri(
    column: &str,
    variable: &VariableAnnotation,
    config: &DataCubeConfig,
) -> Result<String> {
    match variable.uri.as_deref().map(str::trim) {
        Some(uri) if !uri.is_empty() => {
            if !is_safe(uri) {
                return Err(Error::Annotation {
                    variable: column.to_string(),
                    message: format!("'{}' is not a valid IRI", uri),
                });
            }
            Ok(uri.to_string())
        }
        _ => Ok(mint(&config.vocab_base, column)),
    }
}

fn describe_property(
    property: &str,
    column: &str,
    variable: &VariableAnnotation,
) -> Result<Vec<RdfTriple>> {
    let label = variable.label.as_deref().unwrap_or(column);
    let mut triples = vec![
        type_triple(property, iris::RDF_PROPERTY),
        type_triple(property, variable.role.property_class()),
        RdfTriple::iri(property, iris::RDFS_LABEL, RdfTerm::literal(label)),
        RdfTriple::iri(property, iris::SKOS_NOTATION, RdfTerm::literal(column)),
    ];
    if let Some(description) = variable.description.as_deref().filter(|d| !d.is_empty()) {
        triples.push(RdfTriple::iri(
            property,
            iris::RDFS_COMMENT,
            RdfTerm::literal(description),
        ));
    }

    let Some(codelist) = &variable.codelist else {
        return Ok(triples);
    };
    let scheme = codelist.uri.trim();
    if scheme.is_empty() || !is_safe(scheme) {
        return Err(Error::Annotation {
            variable: column.to_string(),
            message: format!("code list '{}' is not a valid IRI", codelist.uri),
        });
    }

    triples.push(type_triple(property, iris::QB_CODED_PROPERTY));
    triples.push(RdfTriple::iri(property, iris::QB_CODE_LIST, RdfTerm::iri(scheme)));
    triples.push(type_triple(scheme, iris::SKOS_CONCEPT_SCHEME));
    if let Some(label) = &codelist.label {
        triples.push(RdfTriple::iri(scheme, iris::RDFS_LABEL, RdfTerm::literal(label)));
    }

    for value in &variable.values {
        let concept = match value.uri.as_deref().filter(|u| !u.is_empty()) {
            Some(uri) => to_iri(uri),
            None => mint(scheme, &value.label),
        };
        triples.push(type_triple(&concept, iris::SKOS_CONCEPT));
        triples.push(RdfTriple::iri(&concept, iris::SKOS_IN_SCHEME, RdfTerm::iri(scheme)));
        triples.push(RdfTriple::iri(
            &concept,
            iris::SKOS_PREF_LABEL,
            RdfTerm::literal(&value.label),
        ));
        if let Some(notation) = &value.notation {
            triples.push(RdfTriple::iri(
                &concept,
                iris::SKOS_NOTATION,
                RdfTerm::literal(notation),
            ));
        }
    }

    Ok(triples)
}

fn provenance_triples(
    input: &DataCubeInput,
    config: &DataCubeConfig,
    names: &GraphNames,
) -> Vec<RdfTriple> {
    let activity = format!("{}/activity", names.dataset);
    let person = mint(&config.resource_base, &format!("person/{}", input.author.email));
    let source = mint(&config.resource_base, &format!("source/{}", input.source_hash));
    let generated_at = RdfTerm::date_time(input.generated_at);

    vec![
        type_triple(&activity, iris::PROV_ACTIVITY),
        RdfTriple::iri(&activity, iris::PROV_USED, RdfTerm::iri(&source)),
        RdfTriple::iri(&activity, iris::PROV_WAS_ASSOCIATED_WITH, RdfTerm::iri(&person)),
        RdfTriple::iri(&activity, iris::PROV_ENDED_AT_TIME, generated_at.clone()),
        type_triple(&person, iris::PROV_PERSON),
        type_triple(&person, iris::FOAF_PERSON),
        RdfTriple::iri(&person, iris::FOAF_NAME, RdfTerm::literal(&input.author.name)),
        RdfTriple::iri(
            &person,
            iris::FOAF_MBOX,
            RdfTerm::iri(format!("mailto:{}", to_iri(&input.author.email))),
        ),
        type_triple(&source, iris::PROV_ENTITY),
        RdfTriple::iri(&source, iris::DCT_IDENTIFIER, RdfTerm::literal(&input.source_hash)),
        RdfTriple::iri(&source, iris::DCT_TITLE, RdfTerm::literal(&input.path)),
        RdfTriple::iri(&names.dataset, iris::PROV_WAS_GENERATED_BY, RdfTerm::iri(&activity)),
        RdfTriple::iri(&names.dataset, iris::PROV_WAS_DERIVED_FROM, RdfTerm::iri(&source)),
        RdfTriple::iri(&names.dataset, iris::PROV_WAS_ATTRIBUTED_TO, RdfTerm::iri(&person)),
        RdfTriple::iri(&names.dataset, iris::PROV_GENERATED_AT_TIME, generated_at),
        RdfTriple::iri(&names.dataset, iris::DCT_CREATOR, RdfTerm::iri(&person)),
    ]
}

fn type_triple(subject: &str, class: &str) -> RdfTriple {
    RdfTriple::iri(subject, iris::RDF_TYPE, RdfTerm::iri(class))
}
