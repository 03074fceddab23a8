//! RDF serializers for Turtle, N-Triples and TriG.
//!
//! N-Triples is what goes over the wire in SPARQL updates; Turtle and TriG
//! are written for people (the backup dump of the latest submission).

use crate::namespace::{iris, NamespaceMap};
use crate::{RdfDataset, RdfTerm, RdfTriple};

/// Serializer for Turtle (.ttl) format
#[derive(Debug, Clone)]
pub struct TurtleSerializer {
    namespaces: NamespaceMap,
    pretty: bool,
}

impl TurtleSerializer {
    /// Create a new Turtle serializer with the Data Cube prefixes
    pub fn new() -> Self {
        Self::with_namespaces(NamespaceMap::datacube_defaults())
    }

    /// Create serializer with custom namespaces
    pub fn with_namespaces(namespaces: NamespaceMap) -> Self {
        Self {
            namespaces,
            pretty: true,
        }
    }

    /// Enable/disable grouping by subject and predicate
    pub fn pretty(mut self, enable: bool) -> Self {
        self.pretty = enable;
        self
    }

    pub fn add_namespace(&mut self, prefix: &str, iri: &str) {
        self.namespaces.add(prefix, iri);
    }

    /// Serialize triples to Turtle
    pub fn serialize(&self, triples: &[RdfTriple]) -> String {
        let mut output = self.namespaces.to_turtle_prefixes();
        if !triples.is_empty() {
            output.push('\n');
        }
        if self.pretty {
            write_grouped(&self.namespaces, triples, "", &mut output);
        } else {
            for triple in triples {
                output.push_str(&format!(
                    "{} {} {} .\n",
                    format_term(&self.namespaces, &triple.subject),
                    format_term(&self.namespaces, &triple.predicate),
                    format_term(&self.namespaces, &triple.object),
                ));
            }
        }
        output
    }
}

impl Default for TurtleSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializer for TriG (.trig), the named-graph extension of Turtle.
///
/// Prefixes are declared once at the top, then each graph of the dataset is
/// written as a `<graph> { ... }` block in insertion order.
#[derive(Debug, Clone)]
pub struct TrigSerializer {
    namespaces: NamespaceMap,
}

impl TrigSerializer {
    pub fn new() -> Self {
        Self::with_namespaces(NamespaceMap::datacube_defaults())
    }

    pub fn with_namespaces(namespaces: NamespaceMap) -> Self {
        Self { namespaces }
    }

    pub fn add_namespace(&mut self, prefix: &str, iri: &str) {
        self.namespaces.add(prefix, iri);
    }

    pub fn serialize(&self, dataset: &RdfDataset) -> String {
        let mut output = self.namespaces.to_turtle_prefixes();
        for graph in dataset.graphs() {
            output.push('\n');
            output.push_str(&format!("<{}> {{\n", graph.name));
            write_grouped(&self.namespaces, &graph.triples, "    ", &mut output);
            output.push_str("}\n");
        }
        output
    }
}

impl Default for TrigSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializer for N-Triples (.nt) format
pub struct NTriplesSerializer;

impl NTriplesSerializer {
    /// Serialize triples to N-Triples, one fully expanded triple per line
    pub fn serialize(triples: &[RdfTriple]) -> String {
        let mut output = String::new();
        for triple in triples {
            output.push_str(&Self::format_triple(triple));
            output.push('\n');
        }
        output
    }

    /// A single triple terminated by ` .`, without the newline.
    pub fn format_triple(triple: &RdfTriple) -> String {
        format!(
            "{} {} {} .",
            Self::format_term(&triple.subject),
            Self::format_term(&triple.predicate),
            Self::format_term(&triple.object)
        )
    }

    pub fn format_term(term: &RdfTerm) -> String {
        match term {
            RdfTerm::Iri(iri) => format!("<{}>", iri),
            RdfTerm::BlankNode(id) => format!("_:{}", id),
            RdfTerm::Literal {
                value,
                datatype,
                language,
            } => {
                let escaped = escape_string(value);
                if let Some(lang) = language {
                    format!("\"{}\"@{}", escaped, lang)
                } else if let Some(dt) = datatype {
                    format!("\"{}\"^^<{}>", escaped, dt)
                } else {
                    format!("\"{}\"", escaped)
                }
            }
        }
    }
}

/// Writes triples grouped by subject, then by predicate, each subject block
/// prefixed with `indent`.
fn write_grouped(namespaces: &NamespaceMap, triples: &[RdfTriple], indent: &str, output: &mut String) {
    let mut groups: Vec<(&RdfTerm, Vec<&RdfTriple>)> = Vec::new();
    for triple in triples {
        match groups.iter_mut().find(|(s, _)| *s == &triple.subject) {
            Some((_, group)) => group.push(triple),
            None => groups.push((&triple.subject, vec![triple])),
        }
    }

    for (subject, group) in groups {
        output.push_str(indent);
        output.push_str(&format_term(namespaces, subject));

        let mut predicates: Vec<(&RdfTerm, Vec<&RdfTerm>)> = Vec::new();
        for triple in group {
            match predicates.iter_mut().find(|(p, _)| *p == &triple.predicate) {
                Some((_, objects)) => objects.push(&triple.object),
                None => predicates.push((&triple.predicate, vec![&triple.object])),
            }
        }

        for (i, (predicate, objects)) in predicates.iter().enumerate() {
            if i == 0 {
                output.push(' ');
            } else {
                output.push_str(" ;\n");
                output.push_str(indent);
                output.push_str("    ");
            }

            if predicate.as_iri() == Some(iris::RDF_TYPE) {
                output.push('a');
            } else {
                output.push_str(&format_term(namespaces, predicate));
            }
            output.push(' ');

            let objects: Vec<String> = objects.iter().map(|o| format_term(namespaces, o)).collect();
            output.push_str(&objects.join(", "));
        }

        output.push_str(" .\n");
    }
}

fn format_term(namespaces: &NamespaceMap, term: &RdfTerm) -> String {
    match term {
        RdfTerm::Iri(iri) => namespaces
            .compact(iri)
            .unwrap_or_else(|| format!("<{}>", iri)),
        RdfTerm::BlankNode(id) => format!("_:{}", id),
        RdfTerm::Literal {
            value,
            datatype,
            language,
        } => {
            let escaped = escape_string(value);
            if let Some(lang) = language {
                return format!("\"{}\"@{}", escaped, lang);
            }
            let Some(dt) = datatype else {
                return format!("\"{}\"", escaped);
            };
            match dt.as_str() {
                iris::XSD_INTEGER if value.parse::<i64>().is_ok() => value.clone(),
                iris::XSD_BOOLEAN if value == "true" || value == "false" => value.clone(),
                iris::XSD_STRING => format!("\"{}\"", escaped),
                _ => match namespaces.compact(dt) {
                    Some(compact) => format!("\"{}\"^^{}", escaped, compact),
                    None => format!("\"{}\"^^<{}>", escaped, dt),
                },
            }
        }
    }
}

/// Escape special characters in a string literal
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}
