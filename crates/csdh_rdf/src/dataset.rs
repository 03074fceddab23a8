//! Named graphs.

use crate::RdfTriple;

/// A graph name with the triples it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedGraph {
    pub name: String,
    pub triples: Vec<RdfTriple>,
}

impl NamedGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triples: Vec::new(),
        }
    }

    pub fn push(&mut self, triple: RdfTriple) {
        self.triples.push(triple);
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// An ordered collection of named graphs.
///
/// Graphs keep the order in which they were first touched, which is also the
/// order they are serialized and uploaded in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RdfDataset {
    graphs: Vec<NamedGraph>,
}

impl RdfDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph called `name`, created empty if it does not exist yet.
    pub fn graph_mut(&mut self, name: &str) -> &mut NamedGraph {
        let idx = match self.graphs.iter().position(|g| g.name == name) {
            Some(idx) => idx,
            None => {
                self.graphs.push(NamedGraph::new(name));
                self.graphs.len() - 1
            }
        };
        &mut self.graphs[idx]
    }

    pub fn graph(&self, name: &str) -> Option<&NamedGraph> {
        self.graphs.iter().find(|g| g.name == name)
    }

    pub fn graphs(&self) -> impl Iterator<Item = &NamedGraph> {
        self.graphs.iter()
    }

    /// Number of graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Total number of triples across all graphs.
    pub fn triple_count(&self) -> usize {
        self.graphs.iter().map(NamedGraph::len).sum()
    }
}
