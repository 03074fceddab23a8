//! SPARQL access to the local store and the LOD cloud.
//!
//! Everything that talks SPARQL goes through the [`SparqlStore`] trait, so the
//! route layer can be exercised against an in-process double. Results come
//! back "dictized": one ordered `variable -> value` map per solution.

mod client;
pub mod queries;
mod resolve;

pub(crate) use client::build_http;
pub use client::HttpSparqlClient;
pub use resolve::{resolve, Resolution};

use async_trait::async_trait;
use csdh_rdf::{NTriplesSerializer, NamedGraph, RdfDataset};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// One row of a SELECT result, in the order the endpoint bound the variables.
pub type Solution = IndexMap<String, String>;

/// A SPARQL 1.1 endpoint.
#[async_trait]
pub trait SparqlStore: Send + Sync {
    /// Run a SELECT query.
    async fn select(&self, query: &str) -> Result<Vec<Solution>>;

    /// Run an ASK query.
    async fn ask(&self, query: &str) -> Result<bool>;

    /// Run a SPARQL Update request.
    async fn update(&self, update: &str) -> Result<()>;
}

/// A parsed `application/sparql-results+json` document.
#[derive(Debug, Default, PartialEq)]
pub struct QueryResults {
    pub solutions: Vec<Solution>,
    pub boolean: Option<bool>,
}

#[derive(Deserialize)]
struct ResultsDocument {
    #[serde(default)]
    results: Option<ResultsBindings>,
    #[serde(default)]
    boolean: Option<bool>,
}

#[derive(Deserialize)]
struct ResultsBindings {
    #[serde(default)]
    bindings: Vec<IndexMap<String, Binding>>,
}

#[derive(Deserialize)]
struct Binding {
    value: String,
}

/// Parse a SPARQL JSON results document.
pub fn parse_results(body: &[u8]) -> Result<QueryResults> {
    let document: ResultsDocument = serde_json::from_slice(body)?;
    Ok(QueryResults {
        solutions: document
            .results
            .map(|r| r.bindings.into_iter().map(dictize).collect())
            .unwrap_or_default(),
        boolean: document.boolean,
    })
}

fn dictize(binding: IndexMap<String, Binding>) -> Solution {
    binding.into_iter().map(|(var, b)| (var, b.value)).collect()
}

/// Render a named graph as an `INSERT DATA` request.
pub fn insert_data(graph: &NamedGraph) -> String {
    let mut update = format!("INSERT DATA {{\n  GRAPH <{}> {{\n", graph.name);
    for triple in &graph.triples {
        update.push_str("    ");
        update.push_str(&NTriplesSerializer::format_triple(triple));
        update.push('\n');
    }
    update.push_str("  }\n}");
    update
}

/// One `INSERT DATA` request per graph, in dataset order.
pub fn make_updates(dataset: &RdfDataset) -> Vec<(String, String)> {
    dataset
        .graphs()
        .map(|graph| (graph.name.clone(), insert_data(graph)))
        .collect()
}

/// Read the boolean of an ASK result.
pub(crate) fn ask_result(results: QueryResults) -> Result<bool> {
    results
        .boolean
        .ok_or_else(|| Error::Serialization("ASK response without a boolean".to_string()))
}
