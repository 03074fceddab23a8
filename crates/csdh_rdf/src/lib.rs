//! # CSDH RDF
//!
//! The RDF side of the Structured Data Hub: a small term model, namespace
//! handling, a Turtle parser for static vocabularies, Turtle / N-Triples /
//! TriG serializers, named-graph datasets and the RDF Data Cube converter that
//! turns annotated dataset variables into a Data Structure Definition.
//!
//! ## Example
//!
//! ```rust
//! use csdh_rdf::{RdfDataset, RdfTerm, RdfTriple, TrigSerializer};
//!
//! let mut dataset = RdfDataset::new();
//! dataset.graph_mut("http://example.org/graph").push(RdfTriple::new(
//!     RdfTerm::iri("http://example.org/alice"),
//!     RdfTerm::iri("http://www.w3.org/2000/01/rdf-schema#label"),
//!     RdfTerm::literal("Alice"),
//! ));
//!
//! let trig = TrigSerializer::new().serialize(&dataset);
//! assert!(trig.contains("<http://example.org/graph> {"));
//! ```

pub mod datacube;
pub mod dataset;
pub mod error;
pub mod iri;
pub mod namespace;
pub mod parser;
pub mod serializer;
pub mod term;

pub use dataset::{NamedGraph, RdfDataset};
pub use error::{Error, Result};
pub use namespace::{Namespace, NamespaceMap};
pub use parser::TurtleParser;
pub use serializer::{NTriplesSerializer, TrigSerializer, TurtleSerializer};
pub use term::{RdfTerm, RdfTriple};
