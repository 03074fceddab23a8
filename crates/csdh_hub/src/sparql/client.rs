//! HTTP client for SPARQL 1.1 protocol endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use super::{ask_result, parse_results, QueryResults, Solution, SparqlStore};
use crate::error::{Error, Result};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// A SPARQL endpoint reached over HTTP.
///
/// Queries and updates are sent as URL-encoded form posts. An endpoint without
/// an update URL (such as the public LOD cloud) rejects updates.
#[derive(Debug, Clone)]
pub struct HttpSparqlClient {
    query_endpoint: String,
    update_endpoint: Option<String>,
    http: reqwest::Client,
}

impl HttpSparqlClient {
    /// Create a client for a read-write store.
    pub fn new(
        query_endpoint: impl Into<String>,
        update_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            query_endpoint: query_endpoint.into(),
            update_endpoint: Some(update_endpoint.into()),
            http: build_http(timeout)?,
        })
    }

    /// Create a client for a query-only endpoint.
    pub fn read_only(query_endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            query_endpoint: query_endpoint.into(),
            update_endpoint: None,
            http: build_http(timeout)?,
        })
    }

    pub fn query_endpoint(&self) -> &str {
        &self.query_endpoint
    }

    async fn query(&self, query: &str) -> Result<QueryResults> {
        tracing::debug!(endpoint = %self.query_endpoint, "SPARQL query:\n{}", query);

        let response = self
            .http
            .post(&self.query_endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sparql {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        parse_results(&body)
    }
}

/// An HTTP client whose requests give up after `timeout`.
pub(crate) fn build_http(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

#[async_trait]
impl SparqlStore for HttpSparqlClient {
    async fn select(&self, query: &str) -> Result<Vec<Solution>> {
        Ok(self.query(query).await?.solutions)
    }

    async fn ask(&self, query: &str) -> Result<bool> {
        ask_result(self.query(query).await?)
    }

    async fn update(&self, update: &str) -> Result<()> {
        let endpoint = self.update_endpoint.as_deref().ok_or_else(|| {
            Error::NotConfigured(format!(
                "{} does not accept SPARQL updates",
                self.query_endpoint
            ))
        })?;
        tracing::debug!(endpoint = %endpoint, "SPARQL update ({} bytes)", update.len());

        let response = self
            .http
            .post(endpoint)
            .form(&[("update", update)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sparql {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
