//! Error taxonomy for a version check.
//!
//! Recoverable conditions (an unrepresentable default) degrade a single
//! data point and never surface here. Everything in this module is fatal
//! for the phase that raises it and carries enough context to render a
//! diagnostic.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::version::VersionError;
use crate::vcs::VcsError;

/// A source file that could not be parsed into a syntax tree. Fatal for the
/// scan of the revision that owns the file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("failed to parse {}: {message}", .path.display())]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Conditions that abort a check. A failing verdict is not one of these; it
/// completes the run and is reported structurally.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Malformed source at one of the scanned revisions.
    #[error("at revision {revision}: {failure}")]
    Parse {
        revision: String,
        failure: ParseFailure,
    },
    /// The declared or baseline version string cannot be analyzed.
    #[error(transparent)]
    Version(#[from] VersionError),
    /// The version-control collaborator could not satisfy a request.
    /// Propagated unchanged; revision data is immutable, so no retries.
    #[error(transparent)]
    Vcs(#[from] VcsError),
}
