//! Version-control collaborator boundary.

pub mod git;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Read access to immutable revision snapshots.
///
/// The engine performs no retries against this trait: committed revision
/// data cannot change, so a failed request would fail identically again.
pub trait RevisionSource {
    /// Files differing between two revisions, as repository-relative paths.
    fn changed_files(&self, this: &str, that: &str) -> Result<BTreeSet<PathBuf>, VcsError>;

    /// All files present at a revision.
    fn files_at(&self, revision: &str) -> Result<BTreeSet<PathBuf>, VcsError>;

    /// File text at a revision. Absent files fail with a `NotFound` kind.
    fn contents_at(&self, revision: &str, path: &Path) -> Result<String, VcsError>;

    /// Default identifier for the revision under check.
    fn current_revision(&self) -> Result<String, VcsError>;

    /// Default identifier for the baseline revision.
    fn last_released_revision(&self) -> Result<String, VcsError>;
}

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("unknown revision {0:?}")]
    UnknownRevision(String),
    #[error("{} does not exist at revision {revision:?}", .path.display())]
    NotFound { revision: String, path: PathBuf },
    #[error("{} at revision {revision:?} is not valid UTF-8", .path.display())]
    Encoding { revision: String, path: PathBuf },
    #[error("bare repositories are not supported")]
    BareRepository,
    #[error("no release tag reachable from the current head")]
    NoReleaseTag,
    #[error("no version declared in {0}")]
    NoDeclaredVersion(String),
    #[error("invalid pyproject.toml: {0}")]
    InvalidManifest(String),
    #[error(transparent)]
    Git(#[from] git2::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
