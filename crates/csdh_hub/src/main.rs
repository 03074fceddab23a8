//! CSDH Hub - Structured Data Hub API server.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use csdh_hub::{GitHubFollow, HubConfig, HubServer};
use csdh_rdf::datacube::{DataCubeConfig, DEFAULT_RESOURCE_BASE, DEFAULT_VOCAB_BASE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CSDH Structured Data Hub API server
#[derive(Parser, Debug)]
#[command(name = "csdh-hub")]
#[command(version)]
#[command(about = "Dataset annotation and RDF Data Cube publishing service", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, env = "CSDH_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "CSDH_PORT", default_value_t = 5000)]
    port: u16,

    /// Root directory of the browsable datasets
    #[arg(long, env = "CSDH_BASE_PATH", default_value = "data")]
    base_path: PathBuf,

    /// Directory of the community metadata snapshots and hisco.ttl
    #[arg(long, env = "CSDH_METADATA_DIR", default_value = "metadata")]
    metadata_dir: PathBuf,

    /// Maximum snapshot age in hours; 0 keeps snapshots forever
    #[arg(long, env = "CSDH_METADATA_MAX_AGE_HOURS", default_value_t = 168)]
    metadata_max_age_hours: u64,

    /// Where the TriG rendering of the latest submission is written
    #[arg(long, env = "CSDH_BACKUP_PATH", default_value = "latest_update.trig")]
    backup_path: PathBuf,

    /// SPARQL query endpoint of the local store
    #[arg(long, env = "CSDH_SPARQL_ENDPOINT", default_value = "http://localhost:8080/sparql")]
    sparql_endpoint: String,

    /// SPARQL update endpoint of the local store
    #[arg(
        long,
        env = "CSDH_UPDATE_ENDPOINT",
        default_value = "http://localhost:8080/sparql/update"
    )]
    update_endpoint: String,

    /// SPARQL endpoint of the LOD cloud
    #[arg(long, env = "CSDH_LOD_ENDPOINT", default_value = csdh_hub::config::DEFAULT_LOD_ENDPOINT)]
    lod_endpoint: String,

    /// URL of the LSD dimensions feed
    #[arg(long, env = "CSDH_LSD_URL", default_value = csdh_hub::config::DEFAULT_LSD_URL)]
    lsd_url: String,

    /// Git repository that submitted files are committed to
    #[arg(long, env = "CSDH_REPOSITORY", default_value = ".")]
    repository: PathBuf,

    /// Levels of linked resources loaded when resolving a variable
    #[arg(long, env = "CSDH_RESOLVE_DEPTH", default_value_t = 2)]
    resolve_depth: usize,

    /// Respond to GitHub push webhooks
    #[arg(long, env = "CSDH_GITHUB_FOLLOW")]
    github_follow: bool,

    /// Ref whose pushes are followed
    #[arg(long, env = "CSDH_GITHUB_REF", default_value = "refs/heads/master")]
    github_ref: String,

    /// Repository URL as reported in push events
    #[arg(long, env = "CSDH_GITHUB_REPOSITORY", default_value = "")]
    github_repository: String,

    /// Checkout in which `git pull` runs
    #[arg(long, env = "CSDH_GITHUB_CHECKOUT", default_value = "..")]
    github_checkout: PathBuf,

    /// Base IRI of minted dataset resources
    #[arg(long, env = "CSDH_RESOURCE_BASE", default_value = DEFAULT_RESOURCE_BASE)]
    resource_base: String,

    /// Base IRI of minted vocabulary terms
    #[arg(long, env = "CSDH_VOCAB_BASE", default_value = DEFAULT_VOCAB_BASE)]
    vocab_base: String,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

impl Args {
    fn into_config(self) -> HubConfig {
        let max_age = match self.metadata_max_age_hours {
            0 => None,
            hours => Some(Duration::from_secs(hours * 60 * 60)),
        };
        let mut config = HubConfig::default()
            .with_host(self.host)
            .with_port(self.port)
            .with_base_path(self.base_path)
            .with_metadata_dir(self.metadata_dir)
            .with_metadata_max_age(max_age)
            .with_backup_path(self.backup_path)
            .with_sparql_endpoints(self.sparql_endpoint, self.update_endpoint)
            .with_lod_endpoint(self.lod_endpoint)
            .with_lsd_url(self.lsd_url)
            .with_repository_path(self.repository)
            .with_github(GitHubFollow {
                enabled: self.github_follow,
                git_ref: self.github_ref,
                repository: self.github_repository,
                checkout_dir: self.github_checkout,
            })
            .with_datacube(DataCubeConfig {
                resource_base: self.resource_base,
                vocab_base: self.vocab_base,
            });
        config.resolve_depth = self.resolve_depth;
        config.cors_enabled = !self.no_cors;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csdh_hub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config();
    let server = HubServer::new(config)?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    server.run_with_shutdown(shutdown_signal).await?;
    Ok(())
}
