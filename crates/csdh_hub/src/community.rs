//! Community metadata: dimensions, concept schemes, variable definitions and
//! code list concepts, gathered from the LSD feed, the LOD cloud, the static
//! HISCO vocabulary and the local store.
//!
//! Lookups here are best effort. A source that fails is logged and
//! contributes nothing, except for [`concepts`], which reports an error when
//! no source could be reached at all.

use std::cmp::Ordering;
use std::path::Path;

use csdh_rdf::namespace::iris;
use csdh_rdf::{RdfTerm, TurtleParser};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::snapshot::{Freshness, Snapshot};
use crate::sparql::{queries, resolve, Solution, SparqlStore};
use crate::state::AppState;

/// The tag the local store uses instead of a reference count.
pub const CSDH_SOURCE: &str = "CSDH";

/// How often a dimension is referenced, or where it comes from.
///
/// Counts sort before source tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Refs {
    Count(u64),
    Source(String),
}

impl Ord for Refs {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Refs::Count(a), Refs::Count(b)) => a.cmp(b),
            (Refs::Count(_), Refs::Source(_)) => Ordering::Less,
            (Refs::Source(_), Refs::Count(_)) => Ordering::Greater,
            (Refs::Source(a), Refs::Source(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Refs {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A statistical variable known to the community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub uri: String,
    #[serde(default)]
    pub label: String,
    pub refs: Refs,
    /// Whatever else the source said about it.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A SKOS concept scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub label: String,
    pub uri: String,
}

/// The result of asking one source.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The source answered, possibly with nothing.
    Found(T),
    /// The source could not be reached or answered with an error.
    Unavailable(String),
}

impl<T: Default> Lookup<T> {
    pub fn unwrap_or_default(self) -> T {
        match self {
            Lookup::Found(value) => value,
            Lookup::Unavailable(_) => T::default(),
        }
    }
}

/// A resolved variable definition.
#[derive(Debug, Clone, Serialize)]
pub struct VariableDefinition {
    #[serde(flatten)]
    pub fields: Solution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codelist: Option<Solution>,
}

/// LSD dimensions referenced more than once, merged with the local store's
/// component properties. Keyed by URI, a later source replacing an earlier
/// one, and ordered ascending by `refs`.
pub async fn dimensions(state: &AppState) -> IndexMap<String, Dimension> {
    let mut merged: IndexMap<String, Dimension> = IndexMap::new();
    for dimension in lsd_dimensions(state).await.into_iter().chain(csdh_dimensions(state).await) {
        merged.insert(dimension.uri.clone(), dimension);
    }
    merged.sort_by(|_, a, _, b| a.refs.cmp(&b.refs));
    merged
}

async fn lsd_dimensions(state: &AppState) -> Vec<Dimension> {
    let snapshot = Snapshot::new(
        state.config.metadata_dir.join("dimensions.json"),
        state.config.metadata_max_age,
    );

    let raw: Vec<serde_json::Value> = match snapshot.read().await {
        Some((cached, Freshness::Fresh)) => {
            tracing::debug!("Loaded dimensions from {}", snapshot.path().display());
            cached
        }
        cached => {
            let fetched = fetch_lsd(state).await;
            if let Ok(fresh) = &fetched {
                if !fresh.is_empty() {
                    if let Err(e) = snapshot.write(fresh).await {
                        tracing::warn!("Could not write {}: {}", snapshot.path().display(), e);
                    }
                }
            }
            pick_dimensions(fetched, cached.map(|(stale, _)| stale))
        }
    };

    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<Dimension>(value) {
            Ok(dimension) => Some(dimension),
            Err(e) => {
                tracing::debug!("Skipping LSD entry: {}", e);
                None
            }
        })
        .filter(|dimension| matches!(dimension.refs, Refs::Count(n) if n > 1))
        .collect()
}

/// The fetched LSD entries, or the stale snapshot when the fetch failed or
/// came back empty.
fn pick_dimensions(
    fetched: Result<Vec<serde_json::Value>>,
    stale: Option<Vec<serde_json::Value>>,
) -> Vec<serde_json::Value> {
    match (fetched, stale) {
        (Ok(fresh), _) if !fresh.is_empty() => fresh,
        (Ok(_), Some(stale)) => {
            tracing::warn!("The LSD service returned no dimensions, keeping the snapshot");
            stale
        }
        (Err(e), Some(stale)) => {
            tracing::error!("Could not load dimensions from the LSD service: {}", e);
            stale
        }
        (Ok(fresh), None) => fresh,
        (Err(e), None) => {
            tracing::error!("Could not load dimensions from the LSD service: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_lsd(state: &AppState) -> Result<Vec<serde_json::Value>> {
    tracing::info!("Loading dimensions from {}", state.config.lsd_url);
    let response = state
        .http
        .get(&state.config.lsd_url)
        .send()
        .await?
        .error_for_status()?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn csdh_dimensions(state: &AppState) -> Vec<Dimension> {
    match state.store.select(&queries::local_dimensions()).await {
        Ok(rows) => rows
            .into_iter()
            .filter_map(|mut row| {
                Some(Dimension {
                    uri: row.shift_remove("uri")?,
                    label: row.shift_remove("label").unwrap_or_default(),
                    refs: Refs::Source(
                        row.shift_remove("refs")
                            .unwrap_or_else(|| CSDH_SOURCE.to_string()),
                    ),
                    extra: IndexMap::new(),
                })
            })
            .collect(),
        Err(e) => {
            tracing::error!("Could not load dimensions from the CSDH: {}", e);
            Vec::new()
        }
    }
}

/// Schemes from the LOD cloud and the HISCO vocabulary (via snapshot),
/// followed by the schemes in the local store. Duplicates are kept.
pub async fn schemes(state: &AppState) -> Vec<Scheme> {
    let mut schemes = external_schemes(state).await;
    schemes.extend(csdh_schemes(state).await);
    schemes
}

async fn external_schemes(state: &AppState) -> Vec<Scheme> {
    let snapshot = Snapshot::new(
        state.config.metadata_dir.join("schemes.json"),
        state.config.metadata_max_age,
    );

    let cached = match snapshot.read::<Vec<Scheme>>().await {
        Some((schemes, Freshness::Fresh)) => {
            tracing::debug!("Loaded schemes from {}", snapshot.path().display());
            return schemes;
        }
        cached => cached,
    };

    tracing::info!("Loading schemes from RDF sources");
    let hisco = hisco_schemes(&state.config.metadata_dir.join("hisco.ttl")).await;
    match state.lod.select(&queries::lod_schemes()).await {
        Ok(rows) => {
            let mut schemes: Vec<Scheme> = rows
                .into_iter()
                .filter_map(|mut row| {
                    Some(Scheme {
                        label: row.shift_remove("label")?,
                        uri: row.shift_remove("scheme")?,
                    })
                })
                .collect();
            tracing::debug!("Found {} schemes in the LOD cloud", schemes.len());
            schemes.extend(hisco);
            if let Err(e) = snapshot.write(&schemes).await {
                tracing::warn!("Could not write {}: {}", snapshot.path().display(), e);
            }
            schemes
        }
        Err(e) => {
            tracing::error!("Could not load schemes from the LOD cloud: {}", e);
            match cached {
                Some((stale, _)) => stale,
                None => hisco,
            }
        }
    }
}

/// `skos:ConceptScheme`s with a `dct:title` in a Turtle file.
async fn hisco_schemes(path: &Path) -> Vec<Scheme> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    let triples = match TurtleParser::parse(&content) {
        Ok(triples) => triples,
        Err(e) => {
            tracing::error!("Could not parse {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let concept_scheme = RdfTerm::iri(iris::SKOS_CONCEPT_SCHEME);
    let mut schemes = Vec::new();
    for typed in triples
        .iter()
        .filter(|t| t.predicate.as_iri() == Some(iris::RDF_TYPE) && t.object == concept_scheme)
    {
        let Some(uri) = typed.subject.as_iri() else {
            continue;
        };
        let titles = triples.iter().filter(|t| {
            t.subject == typed.subject && t.predicate.as_iri() == Some(iris::DCT_TITLE)
        });
        for title in titles.filter_map(|t| t.object.as_literal()) {
            let scheme = Scheme {
                label: title.to_string(),
                uri: uri.to_string(),
            };
            if !schemes.contains(&scheme) {
                schemes.push(scheme);
            }
        }
    }
    schemes
}

async fn csdh_schemes(state: &AppState) -> Vec<Scheme> {
    match state.store.select(&queries::local_schemes()).await {
        Ok(rows) => rows
            .into_iter()
            .filter_map(|mut row| {
                Some(Scheme {
                    label: row.shift_remove("label")?,
                    uri: row.shift_remove("uri")?,
                })
            })
            .collect(),
        Err(e) => {
            tracing::error!("Could not load schemes from the CSDH: {}", e);
            Vec::new()
        }
    }
}

/// Resolve a variable URI and describe it.
///
/// Unknown URIs are first dereferenced into the store. Of several code
/// lists only the first is reported.
pub async fn definition(state: &AppState, uri: &str) -> Result<VariableDefinition> {
    check_iri(uri)?;
    let store = state.store.as_ref();

    let known = match store.ask(&queries::label_exists(uri)).await {
        Ok(known) => known,
        Err(e) => {
            tracing::warn!("Could not check whether <{}> is known: {}", uri, e);
            false
        }
    };
    if !known {
        let resolution = resolve(store, uri, state.config.resolve_depth).await;
        if !resolution.success {
            return Err(Error::Unresolved(uri.to_string()));
        }
        tracing::info!("Resolved <{}> via {} resources", uri, resolution.visited.len());
    }

    let fields = store
        .select(&queries::definition(uri))
        .await?
        .into_iter()
        .next()
        .unwrap_or_else(|| Solution::from([("uri".to_string(), uri.to_string())]));

    let codelists = store.select(&queries::codelist(uri)).await?;
    if codelists.len() > 1 {
        tracing::warn!(
            "<{}> has {} code lists, only the first is used",
            uri,
            codelists.len()
        );
    }
    let codelist = codelists.into_iter().next();

    tracing::debug!("Definition for <{}>: {:?}", uri, fields);
    Ok(VariableDefinition { fields, codelist })
}

/// The concepts of a scheme or collection, from the LOD cloud (bounded by
/// the LOD timeout) followed by the local store. Fails only if neither source
/// answered.
pub async fn concepts(state: &AppState, uri: &str) -> Result<Vec<Solution>> {
    check_iri(uri)?;
    let query = queries::concepts(uri);
    let (lod, local) = tokio::join!(
        lookup_with_timeout(state.lod.as_ref(), &query, state.config.lod_timeout),
        lookup(state.store.as_ref(), &query),
    );

    match (lod, local) {
        (Lookup::Unavailable(lod), Lookup::Unavailable(local)) => Err(Error::Unavailable(format!(
            "LOD cloud: {}; CSDH: {}",
            lod, local
        ))),
        (lod, local) => {
            let mut concepts = lod.unwrap_or_default();
            concepts.extend(local.unwrap_or_default());
            Ok(concepts)
        }
    }
}

/// Client URIs end up between `<` and `>` in query and update texts.
fn check_iri(uri: &str) -> Result<()> {
    if uri.is_empty() || !csdh_rdf::iri::is_safe(uri) {
        return Err(Error::InvalidUri(uri.to_string()));
    }
    Ok(())
}

async fn lookup(store: &dyn SparqlStore, query: &str) -> Lookup<Vec<Solution>> {
    match store.select(query).await {
        Ok(rows) => Lookup::Found(rows),
        Err(e) => {
            tracing::error!("Concept lookup failed: {}", e);
            Lookup::Unavailable(e.to_string())
        }
    }
}

async fn lookup_with_timeout(
    store: &dyn SparqlStore,
    query: &str,
    timeout: std::time::Duration,
) -> Lookup<Vec<Solution>> {
    match tokio::time::timeout(timeout, lookup(store, query)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Concept lookup timed out after {:?}", timeout);
            Lookup::Unavailable(format!("timed out after {:?}", timeout))
        }
    }
}
