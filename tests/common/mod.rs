use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use pysemver::{RevisionSource, VcsError};

/// In-memory revision source: a map of revision identifier to file tree.
/// Revision identifiers double as version strings, as they do for release
/// tags in a real repository.
#[derive(Debug, Default)]
pub struct FakeSource {
    revisions: BTreeMap<String, BTreeMap<PathBuf, String>>,
    current: String,
    last_released: String,
}

impl FakeSource {
    pub fn new(current: &str, last_released: &str) -> Self {
        Self {
            revisions: BTreeMap::new(),
            current: current.to_string(),
            last_released: last_released.to_string(),
        }
    }

    /// Ensure a revision exists, possibly with an empty tree.
    pub fn with_revision(mut self, revision: &str) -> Self {
        self.revisions.entry(revision.to_string()).or_default();
        self
    }

    pub fn with_file(mut self, revision: &str, path: &str, contents: &str) -> Self {
        self.revisions
            .entry(revision.to_string())
            .or_default()
            .insert(PathBuf::from(path), contents.to_string());
        self
    }

    fn tree(&self, revision: &str) -> Result<&BTreeMap<PathBuf, String>, VcsError> {
        self.revisions
            .get(revision)
            .ok_or_else(|| VcsError::UnknownRevision(revision.to_string()))
    }
}

impl RevisionSource for FakeSource {
    fn changed_files(&self, this: &str, that: &str) -> Result<BTreeSet<PathBuf>, VcsError> {
        let this_tree = self.tree(this)?;
        let that_tree = self.tree(that)?;

        let mut changed = BTreeSet::new();
        for (path, contents) in this_tree {
            if that_tree.get(path) != Some(contents) {
                changed.insert(path.clone());
            }
        }
        for path in that_tree.keys() {
            if !this_tree.contains_key(path) {
                changed.insert(path.clone());
            }
        }
        Ok(changed)
    }

    fn files_at(&self, revision: &str) -> Result<BTreeSet<PathBuf>, VcsError> {
        Ok(self.tree(revision)?.keys().cloned().collect())
    }

    fn contents_at(&self, revision: &str, path: &Path) -> Result<String, VcsError> {
        self.tree(revision)?
            .get(path)
            .cloned()
            .ok_or_else(|| VcsError::NotFound {
                revision: revision.to_string(),
                path: path.to_path_buf(),
            })
    }

    fn current_revision(&self) -> Result<String, VcsError> {
        Ok(self.current.clone())
    }

    fn last_released_revision(&self) -> Result<String, VcsError> {
        Ok(self.last_released.clone())
    }
}
