//! # CSDH Hub - Structured Data Hub backend
//!
//! HTTP service behind the CLARIAH Structured Data Hub front end. It lets a
//! user browse tabular datasets, annotate their columns with community
//! vocabularies, cache the annotations, and publish the result as an RDF Data
//! Cube structure in a SPARQL store.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     CSDH API Server                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  /browse /iri   /dataset/*   /community/*   /inspector   │
//! │       │             │              │              │      │
//! │  ┌────▼───┐   ┌─────▼─────┐  ┌─────▼─────┐  ┌─────▼────┐ │
//! │  │ loader │   │  cache    │  │ community │  │  events  │ │
//! │  │        │   │  submit   │  │ snapshots │  │          │ │
//! │  └────────┘   └─┬───┬─────┘  └─────┬─────┘  └──────────┘ │
//! │                 │   │              │                     │
//! │           ┌─────▼┐ ┌▼──────────────▼──┐                  │
//! │           │ git  │ │ SPARQL store/LOD │                  │
//! │           └──────┘ └──────────────────┘                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csdh_hub::{HubConfig, HubServer};
//!
//! #[tokio::main]
//! async fn main() -> csdh_hub::Result<()> {
//!     let config = HubConfig::default().with_base_path("/srv/datasets");
//!     HubServer::new(config)?.run().await
//! }
//! ```
//!
//! Collaborators (SPARQL stores, source repository) sit behind the
//! [`sparql::SparqlStore`] and [`git::SourceRepository`] traits; use
//! [`AppState::with_collaborators`] to run the routes against other
//! implementations.

pub mod cache;
pub mod community;
pub mod config;
pub mod docs;
pub mod error;
pub mod git;
pub mod loader;
pub mod rest;
pub mod server;
pub mod snapshot;
pub mod sparql;
pub mod state;
pub mod submit;

pub use config::{GitHubFollow, HubConfig};
pub use error::{Error, Result};
pub use server::HubServer;
pub use state::AppState;
