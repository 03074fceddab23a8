//! Dataset definition, cache and submission endpoints.

use std::path::{Path, PathBuf};

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache;
use crate::error::{Error, Result};
use crate::loader::{confine, load_definition};
use crate::state::AppState;
use crate::submit::{self, SubmitOutcome, SubmitRequest};

#[derive(Debug, Deserialize)]
pub struct DefinitionQuery {
    pub file: Option<String>,
}

/// The dataset at `file`, as last saved or else as read from disk.
///
/// GET /dataset/definition?file=
pub async fn definition(
    State(state): State<AppState>,
    Query(query): Query<DefinitionQuery>,
) -> Result<Json<Value>> {
    let file = super::required(query.file, "You should provide a file path")?;
    let path = confine(&state.config.base_path, &file)?;

    if let Some(cached) = cache::read_cache(&path).await? {
        tracing::info!("Loaded {} from cache", path.display());
        return Ok(Json(cached));
    }

    tracing::info!("Reading {}", path.display());
    let definition = tokio::task::spawn_blocking(move || load_definition(&path)).await??;
    Ok(Json(serde_json::to_value(definition)?))
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub dataset: Value,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub response: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Cache an annotated dataset next to its source file.
///
/// Failures are reported in the body, not through the status.
///
/// POST /dataset/save
pub async fn save(State(state): State<AppState>, body: Bytes) -> Result<Json<SaveResponse>> {
    let request: SaveRequest = super::parse_body(&body)?;
    match save_dataset(&state.config.base_path, &request.dataset).await {
        Ok(path) => {
            tracing::info!("Saved {}", cache::cache_path(&path).display());
            Ok(Json(SaveResponse {
                response: "success",
                message: None,
            }))
        }
        Err(e) => {
            tracing::error!("Could not save dataset: {}", e);
            Ok(Json(SaveResponse {
                response: "error",
                message: Some(e.to_string()),
            }))
        }
    }
}

async fn save_dataset(base: &Path, dataset: &Value) -> Result<PathBuf> {
    let path = dataset
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MissingParameter("The dataset has no path".to_string()))?;
    let path = within_base(base, path)?;
    cache::write_cache(&path, dataset).await?;
    Ok(path)
}

/// A dataset path as handed out by `/dataset/definition`: the dataset root
/// joined with a relative path that does not leave it.
fn within_base(base: &Path, path: &str) -> Result<PathBuf> {
    let relative = Path::new(path)
        .strip_prefix(base)
        .map_err(|_| Error::Forbidden(path.to_string()))?;
    confine(base, &relative.to_string_lossy())
}

/// Commit, convert and upload a dataset.
///
/// POST /dataset/submit
pub async fn submit(State(state): State<AppState>, body: Bytes) -> Result<Json<SubmitOutcome>> {
    let request: SubmitRequest = super::parse_body(&body)?;
    tracing::info!("Submitting {}", request.file);
    Ok(Json(submit::submit(&state, request).await?))
}
