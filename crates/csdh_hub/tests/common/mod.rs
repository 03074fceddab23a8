//! Shared fixtures for the hub integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use csdh_hub::git::SourceRepository;
use csdh_hub::sparql::{Solution, SparqlStore};
use csdh_hub::{AppState, Error, HubConfig, HubServer, Result};
use csdh_rdf::datacube::Author;
use tempfile::TempDir;
use tower::ServiceExt;

/// Build a solution from `(variable, value)` pairs.
pub fn row(pairs: &[(&str, &str)]) -> Solution {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// An in-process SPARQL store with canned SELECT answers.
///
/// A SELECT is answered by the first canned response whose needle occurs in
/// the query text, and by no rows otherwise.
#[derive(Default)]
pub struct MockStore {
    responses: Vec<(String, Vec<Solution>)>,
    ask: bool,
    unavailable: bool,
    fail_on_update: Option<usize>,
    update_attempts: AtomicUsize,
    committed: Mutex<Vec<String>>,
    queried: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, needle: &str, rows: Vec<Solution>) -> Self {
        self.responses.push((needle.to_string(), rows));
        self
    }

    pub fn asking(mut self, answer: bool) -> Self {
        self.ask = answer;
        self
    }

    /// Every request fails.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// The `n`th update request (1-based) fails.
    pub fn failing_on_update(mut self, n: usize) -> Self {
        self.fail_on_update = Some(n);
        self
    }

    /// The update requests that succeeded, in order.
    pub fn committed(&self) -> Vec<String> {
        self.committed.lock().unwrap().clone()
    }

    /// Every SELECT and ASK received, in order.
    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::Sparql {
                status: 503,
                body: "store offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SparqlStore for MockStore {
    async fn select(&self, query: &str) -> Result<Vec<Solution>> {
        self.queried.lock().unwrap().push(query.to_string());
        self.check_available()?;
        Ok(self
            .responses
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn ask(&self, query: &str) -> Result<bool> {
        self.queried.lock().unwrap().push(query.to_string());
        self.check_available()?;
        Ok(self.ask)
    }

    async fn update(&self, update: &str) -> Result<()> {
        self.check_available()?;
        let attempt = self.update_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_update == Some(attempt) {
            return Err(Error::Sparql {
                status: 500,
                body: format!("update {} rejected", attempt),
            });
        }
        self.committed.lock().unwrap().push(update.to_string());
        Ok(())
    }
}

/// A source repository that records files without Git.
pub struct MockRepository {
    pub hash: String,
    pub added: Mutex<Vec<(PathBuf, Author)>>,
}

impl MockRepository {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            added: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SourceRepository for MockRepository {
    async fn add_file(&self, path: &Path, author: &Author) -> Result<String> {
        self.added
            .lock()
            .unwrap()
            .push((path.to_path_buf(), author.clone()));
        Ok(self.hash.clone())
    }
}

/// A hub over a temporary directory with `data/` and `metadata/` inside.
pub struct TestHub {
    pub dir: TempDir,
    pub store: Arc<MockStore>,
    pub lod: Arc<MockStore>,
    pub repository: Arc<MockRepository>,
    pub state: AppState,
}

impl TestHub {
    pub fn new(store: MockStore, lod: MockStore) -> Self {
        Self::with_config(store, lod, |config| config)
    }

    /// Like [`TestHub::new`], with the default test configuration passed
    /// through `configure` first.
    pub fn with_config(
        store: MockStore,
        lod: MockStore,
        configure: impl FnOnce(HubConfig) -> HubConfig,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::create_dir_all(dir.path().join("metadata")).unwrap();

        let config = configure(
            HubConfig::default()
                .with_base_path(dir.path().join("data"))
                .with_metadata_dir(dir.path().join("metadata"))
                .with_metadata_max_age(None)
                .with_backup_path(dir.path().join("latest_update.trig"))
                .with_lsd_url("http://127.0.0.1:9/data.json"),
        );

        let store = Arc::new(store);
        let lod = Arc::new(lod);
        let repository = Arc::new(MockRepository::new("4b825dc642cb6eb9a060e54bf8d69288fbee4904"));
        let state =
            AppState::with_collaborators(config, store.clone(), lod.clone(), repository.clone())
                .unwrap();

        Self {
            dir,
            store,
            lod,
            repository,
            state,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.dir.path().join("metadata")
    }

    pub fn router(&self) -> Router {
        HubServer::with_state(self.state.clone()).build_router()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> Response<Body> {
        self.router()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a response body as JSON.
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
