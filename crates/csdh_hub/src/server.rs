//! The hub API server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::HubConfig;
use crate::error::{Error, Result};
use crate::rest;
use crate::state::AppState;

/// How long browsers may cache a preflight response.
const CORS_MAX_AGE: Duration = Duration::from_secs(20 * 24 * 60 * 60);

/// The hub API server.
///
/// Holds the configuration and shared state, builds the router and runs it.
pub struct HubServer {
    config: HubConfig,
    state: AppState,
}

impl HubServer {
    /// Creates a server talking to the endpoints and repository named in `config`.
    ///
    /// Fails if the HTTP clients for those endpoints cannot be built.
    pub fn new(config: HubConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Creates a server around a pre-built `AppState`.
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.as_ref().clone(),
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the `axum` router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let app = rest::router().with_state(self.state.clone());

        // Layers apply in reverse order of definition.
        let app = if self.config.cors_enabled {
            app.layer(cors_layer())
        } else {
            app
        };

        if self.config.tracing {
            app.layer(TraceLayer::new_for_http())
        } else {
            app
        }
    }

    fn address(&self) -> Result<SocketAddr> {
        self.config
            .authority()
            .parse()
            .map_err(|e| Error::Internal(format!("Invalid address: {}", e)))
    }

    /// Runs the server indefinitely.
    pub async fn run(self) -> Result<()> {
        let addr = self.address()?;
        let router = self.build_router();

        info!("Starting CSDH API server on http://{}", addr);
        info!("Datasets: {}", self.config.base_path.display());
        info!("SPARQL: {}", self.config.sparql_endpoint);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Runs the server until `shutdown_signal` completes.
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.address()?;
        let router = self.build_router();

        info!("Starting CSDH API server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        info!("CSDH API server stopped");
        Ok(())
    }
}

/// Any origin is mirrored back, so credentials can be allowed.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(CORS_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address() {
        let server = HubServer::new(HubConfig::default().with_port(5050)).unwrap();
        assert_eq!(server.address().unwrap().port(), 5050);

        let server = HubServer::new(HubConfig::default().with_host("not a host")).unwrap();
        assert!(server.address().is_err());
    }

    #[test]
    fn test_with_state_keeps_config() {
        let state = AppState::new(HubConfig::public()).unwrap();
        let server = HubServer::with_state(state);
        assert_eq!(server.config.host, "0.0.0.0");
        assert_eq!(server.state().broadcaster.client_count(), 0);
    }
}
