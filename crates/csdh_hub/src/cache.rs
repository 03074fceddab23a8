//! The per-dataset annotation cache.
//!
//! An annotated dataset is kept as `<dataset path>.cache.json` next to its
//! source file. Entries are never evicted; the last write wins.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Result;

/// Where the cache entry of `dataset_path` lives.
pub fn cache_path(dataset_path: &Path) -> PathBuf {
    let mut name = OsString::from(dataset_path.as_os_str());
    name.push(".cache.json");
    PathBuf::from(name)
}

/// The cached dataset, if one was saved.
pub async fn read_cache(dataset_path: &Path) -> Result<Option<Value>> {
    let path = cache_path(dataset_path);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn write_cache(dataset_path: &Path, dataset: &Value) -> Result<()> {
    let bytes = serde_json::to_vec(dataset)?;
    write_atomic(&cache_path(dataset_path), &bytes).await
}

/// Replace `path` with `bytes` so that readers see either the old or the new
/// content, never a partial file.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_cache_path() {
        assert_eq!(
            cache_path(Path::new("/data/census.csv")),
            PathBuf::from("/data/census.csv.cache.json")
        );
    }

    #[tokio::test]
    async fn test_missing_cache_is_none() {
        let dir = TempDir::new().unwrap();
        let cached = read_cache(&dir.path().join("census.csv")).await.unwrap();
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_keeps_key_order() {
        let dir = TempDir::new().unwrap();
        let dataset_path = dir.path().join("census.csv");
        let dataset = json!({"path": "x", "name": "census", "mappings": {"b": 1, "a": 2}});

        write_cache(&dataset_path, &dataset).await.unwrap();
        let cached = read_cache(&dataset_path).await.unwrap().unwrap();

        assert_eq!(
            serde_json::to_string(&cached).unwrap(),
            serde_json::to_string(&dataset).unwrap()
        );
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_an_error() {
        let dir = TempDir::new().unwrap();
        let dataset_path = dir.path().join("census.csv");
        std::fs::write(cache_path(&dataset_path), "{not json").unwrap();
        assert!(read_cache(&dataset_path).await.is_err());
    }
}
