//! Local JSON snapshots of external community metadata.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::write_atomic;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// A JSON file holding the last known copy of some external data.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
    max_age: Option<Duration>,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>, max_age: Option<Duration>) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The snapshot content and whether it is still within its max age.
    ///
    /// A missing or unreadable snapshot is `None`.
    pub async fn read<T: DeserializeOwned>(&self) -> Option<(T, Freshness)> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("No snapshot at {}: {}", self.path.display(), e);
                return None;
            }
        };
        let value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring unreadable snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .ok();
        Some((value, self.freshness(modified)))
    }

    pub async fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        write_atomic(&self.path, &serde_json::to_vec(value)?).await
    }

    fn freshness(&self, modified: Option<SystemTime>) -> Freshness {
        let Some(max_age) = self.max_age else {
            return Freshness::Fresh;
        };
        // Unknown or future modification times count as fresh.
        let age = modified.and_then(|m| SystemTime::now().duration_since(m).ok());
        match age {
            Some(age) if age > max_age => Freshness::Stale,
            _ => Freshness::Fresh,
        }
    }
}
