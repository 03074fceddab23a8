//! The shared application state for the hub API server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::HubConfig;
use crate::error::Result;
use crate::git::{GitRepository, SourceRepository};
use crate::sparql::{build_http, HttpSparqlClient, SparqlStore};

/// The state accessible by all API handlers.
///
/// Collaborators are passed as trait objects so the server can be assembled
/// around test doubles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HubConfig>,
    /// The local triple store.
    pub store: Arc<dyn SparqlStore>,
    /// The public LOD cloud endpoint.
    pub lod: Arc<dyn SparqlStore>,
    /// Where submitted source files are committed.
    pub repository: Arc<dyn SourceRepository>,
    /// Plain HTTP client for JSON feeds.
    pub http: reqwest::Client,
    /// The event broadcaster for inspector WebSocket subscribers.
    pub broadcaster: Arc<EventBroadcaster>,
}

impl AppState {
    /// Creates the state with HTTP and Git collaborators built from `config`.
    pub fn new(config: HubConfig) -> Result<Self> {
        let store = HttpSparqlClient::new(
            &config.sparql_endpoint,
            &config.update_endpoint,
            config.request_timeout,
        )?;
        let lod = HttpSparqlClient::read_only(&config.lod_endpoint, config.request_timeout)?;
        let repository = GitRepository::new(&config.repository_path);
        Self::with_collaborators(config, Arc::new(store), Arc::new(lod), Arc::new(repository))
    }

    pub fn with_collaborators(
        config: HubConfig,
        store: Arc<dyn SparqlStore>,
        lod: Arc<dyn SparqlStore>,
        repository: Arc<dyn SourceRepository>,
    ) -> Result<Self> {
        let http = build_http(config.request_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            lod,
            repository,
            http,
            broadcaster: Arc::new(EventBroadcaster::new()),
        })
    }
}

/// A broadcaster for sending real-time `HubEvent`s to WebSocket subscribers.
pub struct EventBroadcaster {
    sender: tokio::sync::broadcast::Sender<HubEvent>,
    client_count: AtomicUsize,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(256);
        Self {
            sender,
            client_count: AtomicUsize::new(0),
        }
    }

    /// Subscribes to the broadcast channel and counts the new client.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<HubEvent> {
        self.client_count.fetch_add(1, Ordering::SeqCst);
        self.sender.subscribe()
    }

    pub fn unsubscribe(&self) {
        self.client_count.fetch_sub(1, Ordering::SeqCst);
    }

    /// Broadcasts an event to all active subscribers. Without subscribers the
    /// event is dropped.
    pub fn broadcast(&self, event: HubEvent) {
        let _ = self.sender.send(event);
    }

    pub fn client_count(&self) -> usize {
        self.client_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Size of one uploaded graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub uri: String,
    pub triples: usize,
}

/// Events sent to inspector clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum HubEvent {
    /// Sent to a client immediately after it connects.
    Connected { client_id: String },
    /// A dataset was converted and is about to be uploaded.
    DatasetSubmitted {
        dataset: String,
        source_hash: String,
        graphs: Vec<GraphSummary>,
    },
    Ping,
}

impl HubEvent {
    /// Serializes the event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
