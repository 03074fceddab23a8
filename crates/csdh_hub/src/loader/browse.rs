//! Directory listings below the dataset root.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// One child of a browsed directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    pub label: String,
    /// Path relative to the dataset root.
    pub uri: String,
    pub mimetype: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// Join `relative` onto `base`, refusing absolute paths and `..` components.
pub fn confine(base: &Path, relative: &str) -> Result<PathBuf> {
    let escapes = Path::new(relative).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::Forbidden(relative.to_string()));
    }
    Ok(base.join(relative))
}

/// List the non-hidden children of `base/relative`, directories first, then
/// by label. Also returns the parent of `relative` (`"."` at the root).
pub fn browse(base: &Path, relative: &str) -> Result<(Vec<FileEntry>, String)> {
    let dir = confine(base, relative)?;

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let label = entry.file_name().to_string_lossy().into_owned();
        if label.starts_with('.') {
            continue;
        }

        // Follows symlinks.
        let kind = if entry.path().is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        let mimetype = match kind {
            EntryKind::Dir => None,
            EntryKind::File => mime_guess::from_path(&label)
                .first_raw()
                .map(str::to_string),
        };

        entries.push(FileEntry {
            uri: join_relative(relative, &label),
            label,
            mimetype,
            kind,
        });
    }
    entries.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.label.cmp(&b.label)));

    Ok((entries, parent_of(relative)))
}

fn join_relative(relative: &str, name: &str) -> String {
    let relative = relative.trim_end_matches('/');
    if relative.is_empty() || relative == "." {
        name.to_string()
    } else {
        format!("{}/{}", relative, name)
    }
}

fn parent_of(relative: &str) -> String {
    match Path::new(relative.trim_end_matches('/')).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("census")).unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("census/1899.csv"), "a\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "n").unwrap();
        fs::write(dir.path().join("hisco.csv"), "a\n").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        dir
    }

    #[test]
    fn test_browse_root() {
        let dir = tree();
        let (entries, parent) = browse(dir.path(), ".").unwrap();

        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["archive", "census", "hisco.csv", "notes.txt"]);
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[0].mimetype, None);
        assert_eq!(entries[2].mimetype.as_deref(), Some("text/csv"));
        assert_eq!(entries[3].mimetype.as_deref(), Some("text/plain"));
        assert_eq!(entries[2].uri, "hisco.csv");
        assert_eq!(parent, ".");
    }

    #[test]
    fn test_browse_subdirectory() {
        let dir = tree();
        let (entries, parent) = browse(dir.path(), "census/").unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].uri, "census/1899.csv");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(parent, ".");
        assert_eq!(parent_of("a/b/c"), "a/b");
    }

    #[test]
    fn test_escape_is_forbidden() {
        let dir = tree();
        assert!(matches!(browse(dir.path(), "../"), Err(Error::Forbidden(_))));
        assert!(matches!(browse(dir.path(), "census/../.."), Err(Error::Forbidden(_))));
        assert!(matches!(browse(dir.path(), "/etc"), Err(Error::Forbidden(_))));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tree();
        assert!(matches!(browse(dir.path(), "nope"), Err(Error::Io(_))));
    }
}
