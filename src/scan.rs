//! Per-revision signature scanning.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::debug;

use crate::analyzers::is_python_source;
use crate::analyzers::signatures::SignatureBuilder;
use crate::core::Signature;
use crate::errors::CheckError;
use crate::progress::ProgressSink;
use crate::vcs::RevisionSource;

/// The sealed outcome of scanning one revision. Nothing mutates it once the
/// scan returns.
#[derive(Clone, Debug)]
pub struct RevisionScan {
    pub revision: String,
    pub signatures: Vec<Signature>,
}

/// Parse every changed Python file present at `revision` and accumulate the
/// public signatures, reporting progress after each file.
///
/// Unchanged files cannot contribute diff events and are skipped wholesale.
/// An empty changed set yields an empty scan with zero progress steps.
pub fn scan_revision(
    source: &dyn RevisionSource,
    revision: &str,
    changed: &BTreeSet<PathBuf>,
    progress: &mut dyn ProgressSink,
) -> Result<RevisionScan, CheckError> {
    let present = source.files_at(revision)?;
    let to_parse: Vec<&PathBuf> = present
        .iter()
        .filter(|path| is_python_source(path) && changed.contains(*path))
        .collect();

    let total = to_parse.len();
    progress.scan_started(revision, total);

    let mut builder = SignatureBuilder::new();
    for (index, path) in to_parse.into_iter().enumerate() {
        let text = source.contents_at(revision, path)?;
        builder
            .parse_source(path, &text)
            .map_err(|failure| CheckError::Parse {
                revision: revision.to_string(),
                failure,
            })?;
        debug!("parsed {} at {revision}", path.display());
        progress.file_parsed(revision, index + 1, total);
    }
    progress.scan_finished(revision);

    Ok(RevisionScan {
        revision: revision.to_string(),
        signatures: builder.into_signatures(),
    })
}
