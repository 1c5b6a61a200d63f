//! git2-backed revision source.
//!
//! Holds the work-tree path and opens a fresh `Repository` per operation;
//! `git2::Repository` is neither `Send` nor `Sync`, and the path-holding
//! wrapper keeps this type trivially shareable.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use git2::{
    Commit, DescribeFormatOptions, DescribeOptions, DiffOptions, ErrorCode, ObjectType,
    Repository, TreeWalkMode, TreeWalkResult,
};
use log::warn;

use super::{RevisionSource, VcsError};

pub const PYPROJECT_FILE: &str = "pyproject.toml";

pub struct GitSource {
    repo_path: PathBuf,
}

impl GitSource {
    /// Open the repository containing `path`, discovering the work-tree
    /// root from any directory inside it.
    pub fn discover(path: &Path) -> Result<Self, VcsError> {
        let repo = Repository::discover(path)?;
        let repo_path = repo
            .workdir()
            .ok_or(VcsError::BareRepository)?
            .to_path_buf();
        Ok(Self { repo_path })
    }

    /// The work-tree root.
    pub fn root(&self) -> &Path {
        &self.repo_path
    }

    fn open_repo(&self) -> Result<Repository, VcsError> {
        Ok(Repository::open(&self.repo_path)?)
    }

    /// Resolve a revision string to a commit.
    ///
    /// Release tags commonly carry a `v` prefix, so `1.2.3` also tries
    /// `v1.2.3`. The declared-but-not-yet-tagged working version names the
    /// current head.
    fn resolve_commit<'repo>(
        &self,
        repo: &'repo Repository,
        revision: &str,
    ) -> Result<Commit<'repo>, VcsError> {
        let candidates = [revision.to_string(), format!("v{revision}")];
        for candidate in &candidates {
            if let Ok(object) = repo.revparse_single(candidate) {
                if let Ok(commit) = object.peel_to_commit() {
                    return Ok(commit);
                }
            }
        }

        if self
            .declared_version()
            .is_ok_and(|declared| declared == revision)
        {
            return Ok(repo.head()?.peel_to_commit()?);
        }

        Err(VcsError::UnknownRevision(revision.to_string()))
    }

    /// The version declared in `pyproject.toml`, PEP 621 (`[project]`) or
    /// poetry (`[tool.poetry]`) layout.
    fn declared_version(&self) -> Result<String, VcsError> {
        let path = self.repo_path.join(PYPROJECT_FILE);
        if !path.exists() {
            return Err(VcsError::NoDeclaredVersion(PYPROJECT_FILE.to_string()));
        }

        let text = fs::read_to_string(&path)?;
        let manifest: toml::Value = text
            .parse()
            .map_err(|err: toml::de::Error| VcsError::InvalidManifest(err.to_string()))?;

        manifest
            .get("project")
            .and_then(|project| project.get("version"))
            .or_else(|| {
                manifest
                    .get("tool")
                    .and_then(|tool| tool.get("poetry"))
                    .and_then(|poetry| poetry.get("version"))
            })
            .and_then(toml::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| VcsError::NoDeclaredVersion(PYPROJECT_FILE.to_string()))
    }
}

impl RevisionSource for GitSource {
    fn changed_files(&self, this: &str, that: &str) -> Result<BTreeSet<PathBuf>, VcsError> {
        let repo = self.open_repo()?;
        let this_tree = self.resolve_commit(&repo, this)?.tree()?;
        let that_tree = self.resolve_commit(&repo, that)?.tree()?;

        let mut options = DiffOptions::new();
        let diff =
            repo.diff_tree_to_tree(Some(&that_tree), Some(&this_tree), Some(&mut options))?;

        let mut paths = BTreeSet::new();
        for delta in diff.deltas() {
            // Renames contribute both sides: the old path disappeared, the
            // new one appeared.
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path() {
                    paths.insert(path.to_path_buf());
                }
            }
        }
        Ok(paths)
    }

    fn files_at(&self, revision: &str) -> Result<BTreeSet<PathBuf>, VcsError> {
        let repo = self.open_repo()?;
        let tree = self.resolve_commit(&repo, revision)?.tree()?;

        let mut paths = BTreeSet::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                match entry.name() {
                    Some(name) => {
                        paths.insert(PathBuf::from(format!("{root}{name}")));
                    }
                    None => warn!("skipping tree entry with non-utf8 name under {root:?}"),
                }
            }
            TreeWalkResult::Ok
        })?;
        Ok(paths)
    }

    fn contents_at(&self, revision: &str, path: &Path) -> Result<String, VcsError> {
        let repo = self.open_repo()?;
        let commit = self.resolve_commit(&repo, revision)?;

        let entry = commit.tree()?.get_path(path).map_err(|err| {
            if err.code() == ErrorCode::NotFound {
                VcsError::NotFound {
                    revision: revision.to_string(),
                    path: path.to_path_buf(),
                }
            } else {
                VcsError::Git(err)
            }
        })?;

        let object = entry.to_object(&repo)?;
        let blob = object.as_blob().ok_or_else(|| VcsError::NotFound {
            revision: revision.to_string(),
            path: path.to_path_buf(),
        })?;

        String::from_utf8(blob.content().to_vec()).map_err(|_| VcsError::Encoding {
            revision: revision.to_string(),
            path: path.to_path_buf(),
        })
    }

    fn current_revision(&self) -> Result<String, VcsError> {
        self.declared_version()
    }

    fn last_released_revision(&self) -> Result<String, VcsError> {
        let repo = self.open_repo()?;

        let mut options = DescribeOptions::new();
        options.describe_tags();
        let describe = repo.describe(&options).map_err(|err| {
            if err.code() == ErrorCode::NotFound {
                VcsError::NoReleaseTag
            } else {
                VcsError::Git(err)
            }
        })?;

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        let tag = describe.format(Some(&format))?;
        Ok(tag.strip_prefix('v').unwrap_or(&tag).to_string())
    }
}
