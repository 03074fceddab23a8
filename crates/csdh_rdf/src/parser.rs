//! Turtle parser
//!
//! Reads the static vocabularies the hub ships with (e.g. the HISCO concept
//! schemes). Supports prefixes and base IRIs in both `@prefix` and SPARQL
//! style, `a`, predicate and object lists, blank node labels, anonymous blank
//! nodes with property lists, collections, short and long string literals
//! with escapes, language tags, datatypes, numbers and booleans.

use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::namespace::{iris, NamespaceMap};
use crate::{Error, RdfTerm, RdfTriple, Result};

/// Parser for Turtle (.ttl) documents.
pub struct TurtleParser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    namespaces: NamespaceMap,
    base: Option<String>,
    blank_counter: u64,
    triples: Vec<RdfTriple>,
}

impl<'a> TurtleParser<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars().peekable(),
            line: 1,
            namespaces: NamespaceMap::new(),
            base: None,
            blank_counter: 0,
            triples: Vec::new(),
        }
    }

    /// Parse Turtle content
    pub fn parse(content: &str) -> Result<Vec<RdfTriple>> {
        let mut parser = TurtleParser::new(content);
        parser.document()?;
        log::debug!("Parsed {} triples", parser.triples.len());
        Ok(parser.triples)
    }

    /// Read and parse a Turtle file.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<RdfTriple>> {
        let content = std::fs::read_to_string(path)?;
        TurtleParser::parse(&content)
    }

    fn document(&mut self) -> Result<()> {
        loop {
            self.skip_ws();
            match self.chars.peek().copied() {
                None => return Ok(()),
                Some('@') => self.directive()?,
                Some(_) if self.at_keyword("PREFIX") => {
                    self.consume(6);
                    self.prefix_binding()?;
                }
                Some(_) if self.at_keyword("BASE") => {
                    self.consume(4);
                    self.skip_ws();
                    self.base = Some(self.iri_ref()?);
                }
                Some(_) => self.statement()?,
            }
        }
    }

    fn directive(&mut self) -> Result<()> {
        self.chars.next();
        let name = self.word();
        match name.as_str() {
            "prefix" => {
                self.prefix_binding()?;
            }
            "base" => {
                self.skip_ws();
                self.base = Some(self.iri_ref()?);
            }
            other => return Err(self.error(format!("Unknown directive: @{}", other))),
        }
        self.skip_ws();
        self.expect('.')
    }

    fn prefix_binding(&mut self) -> Result<()> {
        self.skip_ws();
        let mut prefix = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == ':' {
                break;
            }
            if c.is_whitespace() {
                return Err(self.error("Expected ':' after prefix name"));
            }
            prefix.push(c);
            self.chars.next();
        }
        self.expect(':')?;
        self.skip_ws();
        let iri = self.iri_ref()?;
        self.namespaces.add(&prefix, &iri);
        Ok(())
    }

    fn statement(&mut self) -> Result<()> {
        let subject = if self.chars.peek() == Some(&'[') {
            let node = self.blank_node_property_list()?;
            self.skip_ws();
            if self.chars.peek() == Some(&'.') {
                self.chars.next();
                return Ok(());
            }
            node
        } else {
            self.term()?
        };
        if subject.is_literal() {
            return Err(self.error("A literal cannot be a subject"));
        }
        self.predicate_object_list(&subject)?;
        self.skip_ws();
        self.expect('.')
    }

    fn predicate_object_list(&mut self, subject: &RdfTerm) -> Result<()> {
        loop {
            self.skip_ws();
            let predicate = self.verb()?;
            loop {
                self.skip_ws();
                let object = self.object()?;
                self.triples
                    .push(RdfTriple::new(subject.clone(), predicate.clone(), object));
                self.skip_ws();
                if self.chars.peek() == Some(&',') {
                    self.chars.next();
                    continue;
                }
                break;
            }

            if self.chars.peek() != Some(&';') {
                return Ok(());
            }
            while self.chars.peek() == Some(&';') {
                self.chars.next();
                self.skip_ws();
            }
            // A trailing ';' may close the list.
            if matches!(self.chars.peek(), Some('.') | Some(']') | None) {
                return Ok(());
            }
        }
    }

    fn verb(&mut self) -> Result<RdfTerm> {
        let predicate = self.term()?;
        if !predicate.is_iri() {
            return Err(self.error("Predicate must be an IRI"));
        }
        Ok(predicate)
    }

    fn object(&mut self) -> Result<RdfTerm> {
        if self.chars.peek() == Some(&'[') {
            self.blank_node_property_list()
        } else {
            self.term()
        }
    }

    fn blank_node_property_list(&mut self) -> Result<RdfTerm> {
        self.expect('[')?;
        let node = self.fresh_blank();
        self.skip_ws();
        if self.chars.peek() == Some(&']') {
            self.chars.next();
            return Ok(node);
        }
        self.predicate_object_list(&node)?;
        self.skip_ws();
        self.expect(']')?;
        Ok(node)
    }

    /// `( a b c )` as an `rdf:first`/`rdf:rest` chain; `()` is `rdf:nil`.
    fn collection(&mut self) -> Result<RdfTerm> {
        self.expect('(')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.chars.peek() == Some(&')') {
                self.chars.next();
                break;
            }
            items.push(self.object()?);
        }

        let mut head = RdfTerm::iri(iris::RDF_NIL);
        for item in items.into_iter().rev() {
            let node = self.fresh_blank();
            self.triples.push(RdfTriple::new(
                node.clone(),
                RdfTerm::iri(iris::RDF_FIRST),
                item,
            ));
            self.triples
                .push(RdfTriple::new(node.clone(), RdfTerm::iri(iris::RDF_REST), head));
            head = node;
        }
        Ok(head)
    }

    fn term(&mut self) -> Result<RdfTerm> {
        match self.chars.peek().copied() {
            Some('<') => {
                let iri = self.iri_ref()?;
                Ok(RdfTerm::Iri(self.resolve(&iri)))
            }
            Some('_') => {
                self.chars.next();
                self.expect(':')?;
                Ok(RdfTerm::BlankNode(self.word()))
            }
            Some('"') | Some('\'') => self.literal(),
            Some('(') => self.collection(),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.numeric(),
            Some('.') if self.next_is_digit() => self.numeric(),
            Some(_) => self.name(),
            None => Err(self.error("Unexpected end of input")),
        }
    }

    /// Prefixed names and the bare keywords `a`, `true`, `false`.
    fn name(&mut self) -> Result<RdfTerm> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            let name_char = c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '%');
            // A '.' belongs to the name only when more name characters follow.
            let inner_dot = c == '.' && !name.is_empty() && self.next_is_name_char();
            if !(name_char || inner_dot) {
                break;
            }
            name.push(c);
            self.chars.next();
        }

        match name.as_str() {
            "" => {
                let found = self.chars.peek().copied().unwrap_or(' ');
                Err(self.error(format!("Unexpected character '{}'", found)))
            }
            "a" => Ok(RdfTerm::iri(iris::RDF_TYPE)),
            "true" | "false" => Ok(RdfTerm::typed_literal(name, iris::XSD_BOOLEAN)),
            prefixed => self
                .namespaces
                .expand(prefixed)
                .map(RdfTerm::Iri)
                .ok_or_else(|| self.error(format!("Undefined prefix in '{}'", prefixed))),
        }
    }

    fn literal(&mut self) -> Result<RdfTerm> {
        let quote = self.chars.next().unwrap_or('"');
        let long = self.chars.clone().take(2).all(|c| c == quote);
        if long {
            self.consume(2);
        }

        let mut value = String::new();
        loop {
            let c = self
                .chars
                .next()
                .ok_or_else(|| self.error("Unterminated string literal"))?;
            match c {
                '\\' => value.push(self.escape()?),
                '\n' if !long => return Err(self.error("Newline in short string literal")),
                c if c == quote && !long => break,
                c if c == quote && self.chars.clone().take(2).all(|n| n == quote) => {
                    self.consume(2);
                    // Quotes directly before the closing delimiter are content.
                    while self.chars.peek() == Some(&quote) {
                        value.push(quote);
                        self.chars.next();
                    }
                    break;
                }
                c => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c)
                }
            }
        }

        match self.chars.peek() {
            Some('@') => {
                self.chars.next();
                Ok(RdfTerm::lang_literal(value, self.word()))
            }
            Some('^') => {
                self.chars.next();
                self.expect('^')?;
                let datatype = self.term()?;
                let datatype = datatype
                    .as_iri()
                    .ok_or_else(|| self.error("Datatype must be an IRI"))?
                    .to_string();
                Ok(RdfTerm::typed_literal(value, datatype))
            }
            _ => Ok(RdfTerm::literal(value)),
        }
    }

    fn escape(&mut self) -> Result<char> {
        let c = self
            .chars
            .next()
            .ok_or_else(|| self.error("Unterminated escape sequence"))?;
        let decoded = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '\\' | '"' | '\'' => c,
            'u' => self.unicode_escape(4)?,
            'U' => self.unicode_escape(8)?,
            other => return Err(self.error(format!("Invalid escape '\\{}'", other))),
        };
        Ok(decoded)
    }

    fn unicode_escape(&mut self, digits: usize) -> Result<char> {
        let hex: String = (0..digits).filter_map(|_| self.chars.next()).collect();
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("Invalid unicode escape '{}'", hex)))
    }

    fn numeric(&mut self) -> Result<RdfTerm> {
        let mut number = String::new();
        if let Some(&sign) = self.chars.peek() {
            if sign == '+' || sign == '-' {
                number.push(sign);
                self.chars.next();
            }
        }
        self.digits(&mut number);

        let mut datatype = iris::XSD_INTEGER;
        if self.chars.peek() == Some(&'.') && self.next_is_digit() {
            number.push('.');
            self.chars.next();
            self.digits(&mut number);
            datatype = "http://www.w3.org/2001/XMLSchema#decimal";
        }
        if let Some(&e) = self.chars.peek() {
            if e == 'e' || e == 'E' {
                number.push(e);
                self.chars.next();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '+' || sign == '-' {
                        number.push(sign);
                        self.chars.next();
                    }
                }
                self.digits(&mut number);
                datatype = iris::XSD_DOUBLE;
            }
        }

        if number.trim_start_matches(['+', '-']).is_empty() {
            return Err(self.error("Expected a number"));
        }
        Ok(RdfTerm::typed_literal(number, datatype))
    }

    fn digits(&mut self, into: &mut String) {
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            into.push(c);
            self.chars.next();
        }
    }

    fn iri_ref(&mut self) -> Result<String> {
        self.expect('<')?;
        let mut iri = String::new();
        loop {
            match self.chars.next() {
                Some('>') => return Ok(iri),
                Some(c) if c.is_whitespace() => {
                    return Err(self.error("Whitespace inside IRI reference"))
                }
                Some(c) => iri.push(c),
                None => return Err(self.error("Unterminated IRI")),
            }
        }
    }

    fn resolve(&self, iri: &str) -> String {
        match &self.base {
            Some(base) => resolve_iri(base, iri),
            None => iri.to_string(),
        }
    }

    fn fresh_blank(&mut self) -> RdfTerm {
        self.blank_counter += 1;
        RdfTerm::BlankNode(format!("b{}", self.blank_counter))
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        word
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        let mut peeker = self.chars.clone();
        let candidate: String = peeker.by_ref().take(keyword.len()).collect();
        candidate.eq_ignore_ascii_case(keyword)
            && peeker.next().map(char::is_whitespace).unwrap_or(false)
    }

    fn next_is_digit(&self) -> bool {
        let mut peeker = self.chars.clone();
        peeker.next();
        peeker.next().map(|c| c.is_ascii_digit()).unwrap_or(false)
    }

    fn next_is_name_char(&self) -> bool {
        let mut peeker = self.chars.clone();
        peeker.next();
        peeker
            .next()
            .map(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '%'))
            .unwrap_or(false)
    }

    fn consume(&mut self, n: usize) {
        for _ in 0..n {
            self.chars.next();
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                self.line += 1;
                self.chars.next();
            } else if c.is_whitespace() {
                self.chars.next();
            } else if c == '#' {
                while let Some(c) = self.chars.next() {
                    if c == '\n' {
                        self.line += 1;
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("Expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("Expected '{}', found EOF", expected))),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.line, message)
    }
}

fn resolve_iri(base: &str, relative: &str) -> String {
    if relative.contains("://") || relative.starts_with("urn:") || relative.starts_with("mailto:")
    {
        relative.to_string()
    } else if relative.is_empty() || relative.starts_with('#') {
        let base = base.split('#').next().unwrap_or(base);
        format!("{}{}", base, relative)
    } else if relative.starts_with('/') {
        match base.find("://") {
            Some(idx) => match base[idx + 3..].find('/') {
                Some(slash) => format!("{}{}", &base[..idx + 3 + slash], relative),
                None => format!("{}{}", base, relative),
            },
            None => relative.to_string(),
        }
    } else {
        match base.rfind('/') {
            Some(idx) => format!("{}/{}", &base[..idx], relative),
            None => relative.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_turtle_prefixes() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            @prefix foaf: <http://xmlns.com/foaf/0.1/> .

            ex:alice foaf:name "Alice" .
        "#;

        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].subject.as_iri(), Some("http://example.org/alice"));
        assert_eq!(
            triples[0].predicate.as_iri(),
            Some("http://xmlns.com/foaf/0.1/name")
        );
    }

    #[test]
    fn test_parse_sparql_style_prefix() {
        let ttl = r#"
            PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
            <http://example.org/s> a skos:ConceptScheme .
        "#;

        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples[0].predicate.as_iri(), Some(iris::RDF_TYPE));
        assert_eq!(triples[0].object.as_iri(), Some(iris::SKOS_CONCEPT_SCHEME));
    }

    #[test]
    fn test_parse_predicate_and_object_lists() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            ex:alice ex:knows ex:bob, ex:charlie ;
                     ex:age 30 ;
            .
        "#;

        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[2].object, RdfTerm::integer(30));
    }

    #[test]
    fn test_parse_literals() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

            ex:test ex:string "hello \"world\"" ;
                    ex:double 3.14 ;
                    ex:exp 1e10 ;
                    ex:bool true ;
                    ex:lang "Hola"@es ;
                    ex:typed "2016"^^xsd:gYear ;
                    ex:long """two
lines""" .
        "#;

        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples.len(), 7);
        assert_eq!(triples[0].object.as_literal(), Some("hello \"world\""));
        assert_eq!(
            triples[1].object,
            RdfTerm::typed_literal("3.14", "http://www.w3.org/2001/XMLSchema#decimal")
        );
        assert_eq!(triples[2].object, RdfTerm::typed_literal("1e10", iris::XSD_DOUBLE));
        assert_eq!(triples[4].object, RdfTerm::lang_literal("Hola", "es"));
        assert_eq!(
            triples[5].object,
            RdfTerm::typed_literal("2016", "http://www.w3.org/2001/XMLSchema#gYear")
        );
        assert_eq!(triples[6].object.as_literal(), Some("two\nlines"));
    }

    #[test]
    fn test_parse_blank_node_property_list() {
        let ttl = r#"
            @prefix ex: <http://example.org/> .
            ex:alice ex:address [ ex:city "Amsterdam" ; ex:country "NL" ] .
        "#;

        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples.len(), 3);
        let node = &triples[2].object;
        assert!(node.is_blank());
        assert!(triples.iter().filter(|t| &t.subject == node).count() == 2);
    }

    #[test]
    fn test_prefixed_name_before_final_dot() {
        let ttl = "@prefix ex: <http://example.org/> .\nex:a ex:b ex:c.d.";
        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples[0].object.as_iri(), Some("http://example.org/c.d"));
    }

    #[test]
    fn test_base_resolution() {
        let ttl = "@base <http://example.org/data/> .\n<alice> <#knows> </bob> .";
        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples[0].subject.as_iri(), Some("http://example.org/data/alice"));
        assert_eq!(
            triples[0].predicate.as_iri(),
            Some("http://example.org/data/#knows")
        );
        assert_eq!(triples[0].object.as_iri(), Some("http://example.org/bob"));
    }

    #[test]
    fn test_undefined_prefix_reports_line() {
        let ttl = "\n\nnope:a nope:b nope:c .";
        let err = TurtleParser::parse(ttl).unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_parse_collection() {
        let ttl = "<http://e/s> <http://e/p> ( <http://e/a> \"b\" ) .";
        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples.len(), 5);

        let statement = triples
            .iter()
            .find(|t| t.predicate.as_iri() == Some("http://e/p"))
            .unwrap();
        let mut node = statement.object.clone();
        let mut items = Vec::new();
        while node.as_iri() != Some(iris::RDF_NIL) {
            let first = triples
                .iter()
                .find(|t| t.subject == node && t.predicate.as_iri() == Some(iris::RDF_FIRST))
                .unwrap();
            items.push(first.object.clone());
            node = triples
                .iter()
                .find(|t| t.subject == node && t.predicate.as_iri() == Some(iris::RDF_REST))
                .unwrap()
                .object
                .clone();
        }
        assert_eq!(items, vec![RdfTerm::iri("http://e/a"), RdfTerm::literal("b")]);
    }

    #[test]
    fn test_parse_empty_collection_and_collection_subject() {
        let ttl = "@prefix ex: <http://example.org/> .\n\
                   ex:a ex:b () .\n\
                   ( ex:c ) ex:d ex:e .";
        let triples = TurtleParser::parse(ttl).unwrap();
        assert_eq!(triples[0].object.as_iri(), Some(iris::RDF_NIL));
        let last = triples.last().unwrap();
        assert!(last.subject.is_blank());
        assert_eq!(last.object.as_iri(), Some("http://example.org/e"));
    }
}
