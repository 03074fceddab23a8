//! Landing page, documentation and the deployment webhook.

use axum::{
    body::Bytes,
    extract::State,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::docs;
use crate::error::{Error, Result};
use crate::state::AppState;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

pub async fn api_docs() -> Html<&'static str> {
    Html(include_str!("../../web/api-docs.html"))
}

/// GET /specs
pub async fn specs(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(docs::swagger(&state.config))
}

/// The parts of a GitHub push event the webhook looks at.
#[derive(Debug, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub repository: PushRepository,
    #[serde(default)]
    pub commits: Vec<PushCommit>,
}

#[derive(Debug, Deserialize)]
pub struct PushRepository {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct PushCommit {
    pub author: PushAuthor,
}

#[derive(Debug, Deserialize)]
pub struct PushAuthor {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub message: String,
    pub code: u16,
}

/// Pull the followed repository after a matching push.
///
/// POST /trigger
pub async fn trigger(State(state): State<AppState>, body: Bytes) -> Result<Json<TriggerResponse>> {
    let follow = &state.config.github;
    if !follow.enabled {
        return Err(Error::NotConfigured(
            "This application is not setup to respond to GitHub webhook data".to_string(),
        ));
    }

    let event: PushEvent = super::parse_body(&body)?;
    if event.git_ref != follow.git_ref || event.repository.url != follow.repository {
        return Err(Error::NotConfigured(format!(
            "This application follows {} of {}, not {} of {}",
            follow.git_ref, follow.repository, event.git_ref, event.repository.url
        )));
    }

    if let Some(commit) = event.commits.first() {
        tracing::info!("Push by {} to {}, pulling", commit.author.name, event.git_ref);
    }

    let output = tokio::process::Command::new("git")
        .arg("pull")
        .current_dir(&follow.checkout_dir)
        .output()
        .await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!("git pull failed: {}", stderr);
        return Err(Error::Internal(stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    tracing::info!("git pull: {}", stdout.trim());
    Ok(Json(TriggerResponse {
        message: stdout,
        code: 200,
    }))
}
