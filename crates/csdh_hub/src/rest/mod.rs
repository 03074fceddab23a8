//! HTTP routes of the hub.
//!
//! ## Endpoints
//!
//! ### Service
//! - `GET  /` - Landing page
//! - `GET  /api-docs` - API documentation
//! - `GET  /specs` - Swagger description
//! - `POST /trigger` - GitHub push webhook
//!
//! ### Datasets
//! - `GET  /dataset/definition?file=` - Cached or freshly read dataset
//! - `POST /dataset/save` - Cache an annotated dataset
//! - `POST /dataset/submit` - Convert and upload a dataset
//!
//! ### Community
//! - `GET  /community/dimensions` - Known dimensions
//! - `GET  /community/schemes` - Known concept schemes
//! - `GET  /community/definition?uri=` - Variable definition
//! - `GET  /community/concepts?uri=` - Concepts of a code list
//!
//! ### Files
//! - `GET  /browse?path=` - Directory listing
//! - `GET  /iri?iri=` - IRI baking
//!
//! ### Inspector
//! - `GET  /inspector` - WebSocket stream of submission events

mod base;
mod community;
mod dataset;
mod files;
mod inspector;

pub use base::{PushEvent, TriggerResponse};
pub use community::{ConceptsResponse, DimensionsResponse, SchemesResponse};
pub use dataset::{SaveRequest, SaveResponse};
pub use files::{BrowseResponse, IriResponse};

use axum::{
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::state::AppState;

/// Create the hub router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(base::index))
        .route("/api-docs", get(base::api_docs))
        .route("/specs", get(base::specs))
        .route("/trigger", post(base::trigger))
        .route("/dataset/definition", get(dataset::definition))
        .route("/dataset/save", post(dataset::save))
        .route("/dataset/submit", post(dataset::submit))
        .route("/community/dimensions", get(community::dimensions))
        .route("/community/schemes", get(community::schemes))
        .route("/community/definition", get(community::definition))
        .route("/community/concepts", get(community::concepts))
        .route("/browse", get(files::browse))
        .route("/iri", get(files::iri))
        .route("/inspector", get(inspector::ws_handler))
}

/// Decode a JSON request body. Malformed bodies surface as hub errors rather
/// than extractor rejections.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// A required query parameter.
fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingParameter(message.to_string()))
}
