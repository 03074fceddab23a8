//! The SPARQL texts the hub sends.

const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX dct: <http://purl.org/dc/terms/>
PREFIX qb: <http://purl.org/linked-data/cube#>
";

/// Does the store already know a label for `uri`?
pub fn label_exists(uri: &str) -> String {
    format!("{PREFIXES}\nASK {{ <{uri}> rdfs:label ?l . }}")
}

/// Dereference `uri` into a graph of the same name.
pub fn load(uri: &str) -> String {
    format!("LOAD <{uri}> INTO GRAPH <{uri}>")
}

/// The IRIs `uri` links to within its own graph.
pub fn linked_resources(uri: &str) -> String {
    format!(
        "SELECT DISTINCT ?o WHERE {{\n  GRAPH <{uri}> {{ <{uri}> ?p ?o . FILTER(isIRI(?o)) }}\n}}"
    )
}

/// Label, description, Data Cube role and measured concept of a variable.
pub fn definition(uri: &str) -> String {
    format!(
        "{PREFIXES}
SELECT (<{uri}> AS ?uri) ?type ?label ?description ?measured_concept WHERE {{
  OPTIONAL {{ <{uri}> rdfs:label ?label . }}
  OPTIONAL {{ <{uri}> rdfs:comment ?description . }}
  OPTIONAL {{ <{uri}> a qb:DimensionProperty . BIND(qb:DimensionProperty AS ?type) }}
  OPTIONAL {{ <{uri}> qb:concept ?measured_concept . }}
  OPTIONAL {{ <{uri}> a qb:MeasureProperty . BIND(qb:MeasureProperty AS ?type) }}
  OPTIONAL {{ <{uri}> a qb:AttributeProperty . BIND(qb:AttributeProperty AS ?type) }}
}}"
    )
}

/// The code lists of a coded property.
pub fn codelist(uri: &str) -> String {
    format!(
        "{PREFIXES}
SELECT DISTINCT ?uri ?label WHERE {{
  <{uri}> a qb:CodedProperty .
  <{uri}> qb:codeList ?uri .
  ?uri rdfs:label ?label .
}}"
    )
}

/// Members of a SKOS scheme or collection.
pub fn concepts(uri: &str) -> String {
    format!(
        "{PREFIXES}
SELECT DISTINCT ?uri ?label ?notation WHERE {{
  {{ ?uri skos:inScheme <{uri}> . }}
  UNION
  {{ <{uri}> skos:member+ ?uri . }}
  ?uri skos:prefLabel ?label .
  OPTIONAL {{ ?uri skos:notation ?notation . }}
}}"
    )
}

/// Component properties defined in the local store.
pub fn local_dimensions() -> String {
    format!(
        "{PREFIXES}
SELECT DISTINCT ?uri ?label (\"CSDH\" AS ?refs) WHERE {{
  {{ ?uri a qb:DimensionProperty . ?uri rdfs:label ?label . }}
  UNION
  {{ ?uri a qb:MeasureProperty . ?uri rdfs:label ?label . }}
  UNION
  {{ ?uri a qb:AttributeProperty . ?uri rdfs:label ?label . }}
}}"
    )
}

/// Schemes and collections in the local store.
pub fn local_schemes() -> String {
    format!(
        "{PREFIXES}
SELECT DISTINCT ?uri ?label WHERE {{
  {{ ?c skos:inScheme ?uri . ?uri rdfs:label ?label . }}
  UNION
  {{ ?uri skos:member ?c . ?uri rdfs:label ?label . }}
}}"
    )
}

/// Schemes known to the LOD cloud.
pub fn lod_schemes() -> String {
    format!(
        "{PREFIXES}
SELECT DISTINCT ?scheme ?label WHERE {{
  ?c skos:inScheme ?scheme .
  ?scheme rdfs:label ?label .
}}"
    )
}
