//! Dataset root browsing and IRI baking.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::{self, FileEntry};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub path: String,
    pub parent: String,
    pub files: Vec<FileEntry>,
}

/// GET /browse?path=
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>> {
    let path = super::required(query.path, "Must specify a path!")?;
    let base = state.config.base_path.clone();
    let relative = path.clone();
    let (files, parent) =
        tokio::task::spawn_blocking(move || loader::browse(&base, &relative)).await??;
    Ok(Json(BrowseResponse {
        path,
        parent,
        files,
    }))
}

#[derive(Debug, Deserialize)]
pub struct IriQuery {
    pub iri: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IriResponse {
    pub result: String,
}

/// GET /iri?iri=
pub async fn iri(Query(query): Query<IriQuery>) -> Json<IriResponse> {
    let result = match query.iri {
        Some(text) => csdh_rdf::iri::to_iri(&text),
        None => "error".to_string(),
    };
    Json(IriResponse { result })
}
