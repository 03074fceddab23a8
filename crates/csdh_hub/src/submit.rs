//! The submission pipeline.
//!
//! A submitted dataset is committed to the source repository, converted into
//! a Data Structure Definition, written to the TriG backup and then uploaded
//! one named graph at a time. Uploads are not transactional: when graph *k*
//! fails, graphs before it stay in the store.

use std::path::PathBuf;

use chrono::Utc;
use csdh_rdf::datacube::{self, Author, DataCubeInput, VariableAnnotation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cache::write_atomic;
use crate::error::Result;
use crate::sparql::make_updates;
use crate::state::{AppState, GraphSummary, HubEvent};

/// Body of `POST /dataset/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Display name of the dataset, usually the file name.
    pub file: String,
    /// Location of the source file.
    pub path: PathBuf,
    #[serde(default)]
    pub variables: IndexMap<String, VariableAnnotation>,
    pub profile: Author,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub code: u16,
    pub message: String,
    /// Content hash of the committed source file.
    pub hash: String,
    pub graphs: Vec<GraphSummary>,
    /// Where the TriG rendering was written.
    pub backup: String,
}

pub async fn submit(state: &AppState, request: SubmitRequest) -> Result<SubmitOutcome> {
    let config = &state.config;

    let hash = state
        .repository
        .add_file(&request.path, &request.profile)
        .await?;
    tracing::info!("Committed {} as {}", request.path.display(), hash);

    let input = DataCubeInput {
        name: request.file.clone(),
        path: request.path.display().to_string(),
        source_hash: hash.clone(),
        author: request.profile,
        variables: request.variables,
        generated_at: Utc::now(),
    };
    let dataset = datacube::data_structure_definition(&input, &config.datacube)?;

    let trig = datacube::serialize_trig(&dataset, &config.datacube);
    write_atomic(&config.backup_path, trig.as_bytes()).await?;
    tracing::info!(
        "Wrote {} triples to {}",
        dataset.triple_count(),
        config.backup_path.display()
    );

    let graphs: Vec<GraphSummary> = dataset
        .graphs()
        .map(|graph| GraphSummary {
            uri: graph.name.clone(),
            triples: graph.len(),
        })
        .collect();
    state.broadcaster.broadcast(HubEvent::DatasetSubmitted {
        dataset: request.file.clone(),
        source_hash: hash.clone(),
        graphs: graphs.clone(),
    });

    let updates = make_updates(&dataset);
    let total = updates.len();
    for (uploaded, (graph, update)) in updates.into_iter().enumerate() {
        tracing::debug!("Uploading <{}>", graph);
        if let Err(e) = state.store.update(&update).await {
            tracing::error!(
                "Upload of <{}> failed after {} of {} graphs: {}",
                graph,
                uploaded,
                total,
                e
            );
            return Err(e);
        }
    }

    Ok(SubmitOutcome {
        code: 200,
        message: format!("Uploaded {} to the CSDH", request.file),
        hash,
        graphs,
        backup: config.backup_path.display().to_string(),
    })
}
