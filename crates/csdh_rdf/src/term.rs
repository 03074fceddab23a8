//! RDF terms and triples.

use crate::namespace::iris;
use crate::{Error, Result};

/// An RDF term that can be a subject, predicate, or object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfTerm {
    /// IRI (Internationalized Resource Identifier)
    Iri(String),
    /// Blank node
    BlankNode(String),
    /// Literal value
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    /// Create an IRI term
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// Create a blank node
    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// Create a plain literal
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Create a language-tagged literal
    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: Some(lang.into()),
        }
    }

    /// An `xsd:integer` literal.
    pub fn integer(value: i64) -> Self {
        Self::typed_literal(value.to_string(), iris::XSD_INTEGER)
    }

    /// An `xsd:dateTime` literal in RFC 3339 form.
    pub fn date_time(value: chrono::DateTime<chrono::Utc>) -> Self {
        Self::typed_literal(
            value.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            iris::XSD_DATETIME,
        )
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Get the IRI value if this is an IRI
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The lexical form of a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The lexical value of any term: the IRI, the blank node label or the
    /// literal's lexical form. This is what SPARQL JSON results call `value`.
    pub fn value(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::BlankNode(id) => id,
            Self::Literal { value, .. } => value,
        }
    }
}

/// An RDF triple with subject, predicate, object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfTriple {
    pub subject: RdfTerm,
    pub predicate: RdfTerm,
    pub object: RdfTerm,
}

impl RdfTriple {
    /// Create a new RDF triple
    pub fn new(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Create a triple whose subject and predicate are IRIs.
    pub fn iri(subject: impl Into<String>, predicate: impl Into<String>, object: RdfTerm) -> Self {
        Self::new(RdfTerm::iri(subject), RdfTerm::iri(predicate), object)
    }

    /// Check the positional constraints of RDF: literals cannot be subjects
    /// and predicates must be IRIs.
    pub fn validate(&self) -> Result<()> {
        if self.subject.is_literal() {
            return Err(Error::InvalidTriple(format!(
                "literal subject \"{}\"",
                self.subject.value()
            )));
        }
        if !self.predicate.is_iri() {
            return Err(Error::InvalidTriple(format!(
                "predicate must be an IRI, found \"{}\"",
                self.predicate.value()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdf_term_iri() {
        let term = RdfTerm::iri("http://example.org/alice");
        assert!(term.is_iri());
        assert_eq!(term.as_iri(), Some("http://example.org/alice"));
    }

    #[test]
    fn test_rdf_term_literal() {
        let term = RdfTerm::literal("Hello");
        assert!(term.is_literal());
        assert_eq!(term.as_literal(), Some("Hello"));
        assert_eq!(term.value(), "Hello");
    }

    #[test]
    fn test_date_time_literal() {
        let dt = chrono::DateTime::parse_from_rfc3339("2016-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let term = RdfTerm::date_time(dt);
        assert_eq!(
            term,
            RdfTerm::typed_literal("2016-03-01T10:00:00Z", iris::XSD_DATETIME)
        );
    }

    #[test]
    fn test_validate_rejects_literal_subject() {
        let triple = RdfTriple::new(
            RdfTerm::literal("oops"),
            RdfTerm::iri("http://example.org/p"),
            RdfTerm::literal("o"),
        );
        assert!(triple.validate().is_err());

        let triple = RdfTriple::iri("http://example.org/s", "http://example.org/p", RdfTerm::literal("o"));
        assert!(triple.validate().is_ok());
    }
}
