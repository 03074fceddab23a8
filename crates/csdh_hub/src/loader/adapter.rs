//! Delimited-text dataset adapter.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};

/// The on-disk format of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatasetFormat {
    Csv,
    Tsv,
}

impl DatasetFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("tsv") | Some("tab") => Ok(Self::Tsv),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

/// Which file to read and how.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetDescriptor {
    pub filename: PathBuf,
    pub format: DatasetFormat,
    pub header: bool,
}

impl DatasetDescriptor {
    /// A descriptor for a file with a header row, its format taken from the
    /// extension.
    pub fn for_path(path: impl Into<PathBuf>) -> Result<Self> {
        let filename = path.into();
        let format = DatasetFormat::from_path(&filename)?;
        Ok(Self {
            filename,
            format,
            header: true,
        })
    }
}

/// What the front end shows about a dataset file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMetadata {
    pub filename: PathBuf,
    pub format: DatasetFormat,
    pub header: bool,
    pub delimiter: String,
    pub columns: Vec<String>,
    pub rows: usize,
}

/// A distinct value of a column and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub label: String,
    pub count: u64,
}

/// A delimited text file loaded into memory.
#[derive(Debug)]
pub struct CsvAdapter {
    descriptor: DatasetDescriptor,
    columns: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl CsvAdapter {
    pub fn open(descriptor: DatasetDescriptor) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(descriptor.format.delimiter())
            .has_headers(descriptor.header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&descriptor.filename)?;

        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        let columns = if descriptor.header {
            unique_names(reader.headers()?.iter())
        } else {
            let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
            (1..=width).map(|i| format!("column_{}", i)).collect()
        };

        tracing::debug!(
            "Read {} rows with {} columns from {}",
            records.len(),
            columns.len(),
            descriptor.filename.display()
        );
        Ok(Self {
            descriptor,
            columns,
            records,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get_metadata(&self) -> DatasetMetadata {
        DatasetMetadata {
            filename: self.descriptor.filename.clone(),
            format: self.descriptor.format,
            header: self.descriptor.header,
            delimiter: char::from(self.descriptor.format.delimiter()).to_string(),
            columns: self.columns.clone(),
            rows: self.records.len(),
        }
    }

    /// The distinct values of every column, most frequent first and ties
    /// broken by label. Missing trailing fields count as empty values.
    pub fn get_values(&self) -> IndexMap<String, Vec<ValueCount>> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut counts: IndexMap<&str, u64> = IndexMap::new();
                for record in &self.records {
                    *counts.entry(record.get(idx).unwrap_or("")).or_default() += 1;
                }
                let mut values: Vec<ValueCount> = counts
                    .into_iter()
                    .map(|(label, count)| ValueCount {
                        label: label.to_string(),
                        count,
                    })
                    .collect();
                values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
                (column.clone(), values)
            })
            .collect()
    }
}

/// Header names with blanks and duplicates made addressable.
fn unique_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (idx, header) in headers.enumerate() {
        let base = if header.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        let mut n = 2;
        while names.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DatasetFormat::from_path(Path::new("a.CSV")).unwrap(), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_path(Path::new("a.tab")).unwrap(), DatasetFormat::Tsv);
        assert!(matches!(
            DatasetFormat::from_path(Path::new("a.xlsx")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(DatasetFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_metadata_and_values() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "census.csv",
            "name, occupation\nalice, farmer\nbob, weaver\ncarol, farmer\n",
        );

        let adapter = CsvAdapter::open(DatasetDescriptor::for_path(&path).unwrap()).unwrap();
        let metadata = adapter.get_metadata();
        assert_eq!(metadata.columns, vec!["name", "occupation"]);
        assert_eq!(metadata.rows, 3);
        assert_eq!(metadata.delimiter, ",");

        let values = adapter.get_values();
        assert_eq!(
            values["occupation"],
            vec![
                ValueCount { label: "farmer".to_string(), count: 2 },
                ValueCount { label: "weaver".to_string(), count: 1 },
            ]
        );
        assert_eq!(values["name"][0].label, "alice");
    }

    #[test]
    fn test_headerless_tsv() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "codes.tsv", "1\tfarmer\n2\tweaver\textra\n");
        let descriptor = DatasetDescriptor {
            header: false,
            ..DatasetDescriptor::for_path(&path).unwrap()
        };

        let adapter = CsvAdapter::open(descriptor).unwrap();
        assert_eq!(adapter.columns(), ["column_1", "column_2", "column_3"]);

        let values = adapter.get_values();
        assert_eq!(values["column_3"][0], ValueCount { label: "".to_string(), count: 1 });
        assert_eq!(values["column_3"].len(), 2);
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let names = unique_names(["a", "", "a", "a"].into_iter());
        assert_eq!(names, vec!["a", "column_2", "a_2", "a_3"]);
    }
}
