//! Committing dataset source files.
//!
//! Every submitted file is committed to a Git repository, and the blob id of
//! its content doubles as the dataset version identifier.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csdh_rdf::datacube::Author;
use git2::{Repository, Signature};

use crate::error::{Error, Result};

/// Versioned storage for dataset source files.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Record the current content of `path` on behalf of `author` and return
    /// its content hash.
    async fn add_file(&self, path: &Path, author: &Author) -> Result<String>;
}

/// A [`SourceRepository`] backed by a Git working tree.
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
}

impl GitRepository {
    /// A repository at (or above) `path`. It is opened on every commit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceRepository for GitRepository {
    async fn add_file(&self, path: &Path, author: &Author) -> Result<String> {
        let repo_path = self.path.clone();
        let file = path.to_path_buf();
        let author = author.clone();
        tokio::task::spawn_blocking(move || commit_file(&repo_path, &file, &author)).await?
    }
}

fn commit_file(repo_path: &Path, file: &Path, author: &Author) -> Result<String> {
    let repo = Repository::discover(repo_path)?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| Error::Internal("Repository has no working directory".to_string()))?
        .canonicalize()?;

    let absolute = file.canonicalize()?;
    let relative = absolute.strip_prefix(&workdir).map_err(|_| {
        Error::Forbidden(format!(
            "{} is outside the repository at {}",
            file.display(),
            workdir.display()
        ))
    })?;

    let mut index = repo.index()?;
    index.add_path(relative)?;
    index.write()?;
    let tree_id = index.write_tree()?;

    let hash = index
        .get_path(relative, 0)
        .map(|entry| entry.id.to_string())
        .ok_or_else(|| Error::Internal(format!("{} was not staged", relative.display())))?;

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    if parent.as_ref().map(|c| c.tree_id()) == Some(tree_id) {
        tracing::debug!("{} is unchanged at {}", relative.display(), hash);
        return Ok(hash);
    }

    let signature = Signature::now(&author.name, &author.email)?;
    let tree = repo.find_tree(tree_id)?;
    let parents: Vec<_> = parent.iter().collect();
    let commit = repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        &format!("Added {}", relative.display()),
        &tree,
        &parents,
    )?;

    tracing::info!(
        "Committed {} as {} (blob {})",
        relative.display(),
        commit,
        hash
    );
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn author() -> Author {
        Author {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        }
    }

    fn create_test_repo() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        (temp, repo)
    }

    #[tokio::test]
    async fn test_add_file_commits_and_returns_blob_id() {
        let (temp, repo) = create_test_repo();
        let file = temp.path().join("census.csv");
        fs::write(&file, "name,age\nalice,30\n").unwrap();

        let hash = GitRepository::new(temp.path())
            .add_file(&file, &author())
            .await
            .unwrap();

        let blob = repo.blob_path(&file).unwrap();
        assert_eq!(hash, blob.to_string());

        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.author().name(), Some("Test User"));
        assert_eq!(head.message(), Some("Added census.csv"));
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_recommitted() {
        let (temp, repo) = create_test_repo();
        let file = temp.path().join("census.csv");
        fs::write(&file, "name,age\n").unwrap();
        let repository = GitRepository::new(temp.path());

        let first = repository.add_file(&file, &author()).await.unwrap();
        let head = repo.head().unwrap().target().unwrap();
        let second = repository.add_file(&file, &author()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.head().unwrap().target().unwrap(), head);
    }

    #[tokio::test]
    async fn test_file_outside_repository_is_rejected() {
        let (temp, _repo) = create_test_repo();
        let other = TempDir::new().unwrap();
        let file = other.path().join("elsewhere.csv");
        fs::write(&file, "x\n").unwrap();

        let err = GitRepository::new(temp.path())
            .add_file(&file, &author())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }
}
