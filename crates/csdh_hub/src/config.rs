//! Hub configuration.

use std::path::PathBuf;
use std::time::Duration;

use csdh_rdf::datacube::DataCubeConfig;

/// Default LOD cloud SPARQL endpoint.
pub const DEFAULT_LOD_ENDPOINT: &str = "http://lod.openlinksw.com/sparql";
/// Default Linked Statistical Data dimensions feed.
pub const DEFAULT_LSD_URL: &str = "http://amp.ops.few.vu.nl/data.json";

/// Settings for following pushes to a GitHub repository.
#[derive(Debug, Clone, Default)]
pub struct GitHubFollow {
    /// If `false`, the webhook refuses every push.
    pub enabled: bool,
    /// The ref whose pushes are followed, e.g. `refs/heads/master`.
    pub git_ref: String,
    /// The repository URL as GitHub reports it in push events.
    pub repository: String,
    /// The checkout in which `git pull` runs.
    pub checkout_dir: PathBuf,
}

/// Configuration for the `HubServer`.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// The host address to bind the server to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// If `true`, CORS headers are added to every response.
    pub cors_enabled: bool,
    /// If `true`, HTTP request tracing is enabled.
    pub tracing: bool,
    /// Root directory of the browsable datasets.
    pub base_path: PathBuf,
    /// Directory holding the community metadata snapshots and `hisco.ttl`.
    pub metadata_dir: PathBuf,
    /// How old a metadata snapshot may get before it is refreshed.
    /// `None` keeps snapshots forever.
    pub metadata_max_age: Option<Duration>,
    /// Where the TriG rendering of the latest submission is written.
    pub backup_path: PathBuf,
    /// SPARQL query endpoint of the local store.
    pub sparql_endpoint: String,
    /// SPARQL update endpoint of the local store.
    pub update_endpoint: String,
    /// SPARQL endpoint of the LOD cloud.
    pub lod_endpoint: String,
    /// URL of the LSD dimensions feed.
    pub lsd_url: String,
    /// Git repository that source files are committed to.
    pub repository_path: PathBuf,
    /// How many levels of linked resources `resolve` loads.
    pub resolve_depth: usize,
    /// Overall timeout of outbound HTTP requests.
    pub request_timeout: Duration,
    /// Timeout of the LOD cloud concepts query.
    pub lod_timeout: Duration,
    pub github: GitHubFollow,
    /// Namespaces for minted dataset and vocabulary IRIs.
    pub datacube: DataCubeConfig,
}

impl Default for HubConfig {
    /// Returns a default configuration suitable for local development.
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_enabled: true,
            tracing: true,
            base_path: PathBuf::from("data"),
            metadata_dir: PathBuf::from("metadata"),
            metadata_max_age: Some(Duration::from_secs(7 * 24 * 60 * 60)),
            backup_path: PathBuf::from("latest_update.trig"),
            sparql_endpoint: "http://localhost:8080/sparql".to_string(),
            update_endpoint: "http://localhost:8080/sparql/update".to_string(),
            lod_endpoint: DEFAULT_LOD_ENDPOINT.to_string(),
            lsd_url: DEFAULT_LSD_URL.to_string(),
            repository_path: PathBuf::from("."),
            resolve_depth: 2,
            request_timeout: Duration::from_secs(30),
            lod_timeout: Duration::from_secs(1),
            github: GitHubFollow {
                checkout_dir: PathBuf::from(".."),
                ..Default::default()
            },
            datacube: DataCubeConfig::default(),
        }
    }
}

impl HubConfig {
    /// Returns a configuration that binds to all network interfaces.
    pub fn public() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            ..Default::default()
        }
    }

    /// Sets the port for the server to listen on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the host address for the server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = path.into();
        self
    }

    pub fn with_metadata_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_dir = path.into();
        self
    }

    pub fn with_metadata_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.metadata_max_age = max_age;
        self
    }

    pub fn with_backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = path.into();
        self
    }

    /// Sets the query and update endpoints of the local store.
    pub fn with_sparql_endpoints(
        mut self,
        query: impl Into<String>,
        update: impl Into<String>,
    ) -> Self {
        self.sparql_endpoint = query.into();
        self.update_endpoint = update.into();
        self
    }

    pub fn with_lod_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.lod_endpoint = endpoint.into();
        self
    }

    pub fn with_lsd_url(mut self, url: impl Into<String>) -> Self {
        self.lsd_url = url.into();
        self
    }

    pub fn with_repository_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.repository_path = path.into();
        self
    }

    pub fn with_github(mut self, github: GitHubFollow) -> Self {
        self.github = github;
        self
    }

    pub fn with_datacube(mut self, datacube: DataCubeConfig) -> Self {
        self.datacube = datacube;
        self
    }

    /// The `host:port` pair advertised in the API description.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HubConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.resolve_depth, 2);
        assert_eq!(config.lod_timeout, Duration::from_secs(1));
        assert_eq!(
            config.metadata_max_age,
            Some(Duration::from_secs(604_800))
        );
        assert!(!config.github.enabled);
    }

    #[test]
    fn test_config_public() {
        let config = HubConfig::public();
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_config_builder() {
        let config = HubConfig::default()
            .with_host("localhost")
            .with_port(9090)
            .with_base_path("/srv/data")
            .with_metadata_max_age(None);
        assert_eq!(config.authority(), "localhost:9090");
        assert_eq!(config.base_path, PathBuf::from("/srv/data"));
        assert!(config.metadata_max_age.is_none());
    }
}
