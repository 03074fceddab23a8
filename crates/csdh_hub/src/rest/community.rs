//! Community metadata endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::community::{self, Dimension, Scheme, VariableDefinition};
use crate::error::Result;
use crate::sparql::Solution;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UriQuery {
    pub uri: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DimensionsResponse {
    pub dimensions: IndexMap<String, Dimension>,
}

#[derive(Debug, Serialize)]
pub struct SchemesResponse {
    pub schemes: Vec<Scheme>,
}

#[derive(Debug, Serialize)]
pub struct ConceptsResponse {
    pub codelist: Vec<Solution>,
}

/// GET /community/dimensions
pub async fn dimensions(State(state): State<AppState>) -> Json<DimensionsResponse> {
    let dimensions = community::dimensions(&state).await;
    tracing::debug!("Returning {} dimensions", dimensions.len());
    Json(DimensionsResponse { dimensions })
}

/// GET /community/schemes
pub async fn schemes(State(state): State<AppState>) -> Json<SchemesResponse> {
    Json(SchemesResponse {
        schemes: community::schemes(&state).await,
    })
}

/// GET /community/definition?uri=
pub async fn definition(
    State(state): State<AppState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<VariableDefinition>> {
    let uri = super::required(query.uri, "You should provide a variable URI")?;
    Ok(Json(community::definition(&state, &uri).await?))
}

/// GET /community/concepts?uri=
pub async fn concepts(
    State(state): State<AppState>,
    Query(query): Query<UriQuery>,
) -> Result<Json<ConceptsResponse>> {
    let uri = super::required(query.uri, "You should provide a code list URI")?;
    Ok(Json(ConceptsResponse {
        codelist: community::concepts(&state, &uri).await?,
    }))
}
