//! Ignore-list configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Deserialize;

pub const CONFIG_FILE: &str = ".pysemver.toml";

/// Project-level configuration, read from `.pysemver.toml` at the work-tree
/// root when present.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PysemverConfig {
    /// Glob patterns for paths whose changes never count as functional.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl PysemverConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config in {}", path.display()))
    }
}

/// Compiled ignore patterns, matched against repository-relative paths.
#[derive(Clone, Debug, Default)]
pub struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = entries
            .into_iter()
            .map(|entry| {
                Pattern::new(entry.as_ref())
                    .with_context(|| format!("invalid ignore pattern {:?}", entry.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }
}
