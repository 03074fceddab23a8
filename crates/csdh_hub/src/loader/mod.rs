//! Reading datasets from disk.

pub mod adapter;
pub mod browse;

pub use adapter::{CsvAdapter, DatasetDescriptor, DatasetFormat, DatasetMetadata, ValueCount};
pub use browse::{browse, confine, EntryKind, FileEntry};

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;

/// A freshly read dataset, before the user has annotated anything.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetDefinition {
    pub name: String,
    pub path: String,
    pub metadata: DatasetMetadata,
    pub values: IndexMap<String, Vec<ValueCount>>,
    pub mappings: serde_json::Map<String, serde_json::Value>,
}

/// Read the dataset at `path`. Its name is the file stem.
pub fn load_definition(path: &Path) -> Result<DatasetDefinition> {
    let adapter = CsvAdapter::open(DatasetDescriptor::for_path(path)?)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(DatasetDefinition {
        name,
        path: path.display().to_string(),
        metadata: adapter.get_metadata(),
        values: adapter.get_values(),
        mappings: serde_json::Map::new(),
    })
}
