//! The `check-version` orchestrator.
//!
//! Sequences two revision scans, the signature diff, and the version
//! analysis into one pass/fail verdict. A failing verdict completes the
//! state machine; only malformed source and malformed version strings
//! abort.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::info;
use serde::Serialize;

use crate::config::IgnoreList;
use crate::core::version::is_acceptable;
use crate::core::{Bump, Exit, SignatureChange};
use crate::diff::diff_signatures;
use crate::errors::CheckError;
use crate::progress::{ProgressEvent, ProgressSink, RecordingSink};
use crate::scan::scan_revision;
use crate::vcs::RevisionSource;

/// Inputs of one check. `this` and `that` double as revision identifiers
/// and version strings; they default to the collaborator's idea of the
/// current and last released revisions.
#[derive(Clone, Debug, Default)]
pub struct CheckVersionConfig {
    pub this: Option<String>,
    pub that: Option<String>,
    pub ignore: IgnoreList,
}

/// The structured outcome of a completed check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub this: String,
    pub that: String,
    pub required: Bump,
    pub acceptable: bool,
    pub added: Vec<SignatureChange>,
    pub removed: Vec<SignatureChange>,
    /// Changed files that survived the ignore filter.
    pub touched: Vec<PathBuf>,
    /// One `(processed, total)` pair per parsed file per scanned revision.
    pub events: Vec<ProgressEvent>,
}

impl Verdict {
    pub fn exit(&self) -> Exit {
        if self.acceptable {
            Exit::Ok
        } else {
            Exit::Ko
        }
    }
}

/// Phases of one check. Strictly forward, never re-entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Idle,
    ScanningThis,
    ScanningThat,
    Diffing,
    Validating,
    Done,
}

/// One orchestrator instance performs exactly one check.
struct CheckVersion<'a> {
    source: &'a dyn RevisionSource,
    phase: Phase,
}

impl<'a> CheckVersion<'a> {
    fn new(source: &'a dyn RevisionSource) -> Self {
        Self {
            source,
            phase: Phase::Idle,
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(self.phase < next, "check phases never go backwards");
        self.phase = next;
    }

    fn run(
        mut self,
        config: &CheckVersionConfig,
        sink: &mut dyn ProgressSink,
    ) -> Result<Verdict, CheckError> {
        let this = match &config.this {
            Some(revision) => revision.clone(),
            None => self.source.current_revision()?,
        };
        let that = match &config.that {
            Some(revision) => revision.clone(),
            None => self.source.last_released_revision()?,
        };

        let changed: BTreeSet<PathBuf> = self
            .source
            .changed_files(&this, &that)?
            .into_iter()
            .filter(|path| !config.ignore.matches(path))
            .collect();

        let mut progress = Observed {
            record: RecordingSink::default(),
            forward: sink,
        };

        self.enter(Phase::ScanningThis);
        info!("parsing files from {this}");
        let these = scan_revision(self.source, &this, &changed, &mut progress)?;

        self.enter(Phase::ScanningThat);
        info!("parsing files from {that}");
        let those = scan_revision(self.source, &that, &changed, &mut progress)?;

        self.enter(Phase::Diffing);
        let outcome = diff_signatures(&these.signatures, &those.signatures, &changed);
        for change in outcome.added.iter().chain(&outcome.removed) {
            progress.change_reported(&change.report_line());
        }

        self.enter(Phase::Validating);
        // NONE skips version analysis entirely: a no-op diff passes even
        // when the version strings would not parse.
        let acceptable = if outcome.required == Bump::None {
            true
        } else {
            is_acceptable(&this, &that, outcome.required)?
        };
        info!("version bump required: {}", outcome.required);

        self.enter(Phase::Done);
        Ok(Verdict {
            this,
            that,
            required: outcome.required,
            acceptable,
            added: outcome.added,
            removed: outcome.removed,
            touched: changed.into_iter().collect(),
            events: progress.record.events,
        })
    }
}

/// Run one full check against `source`.
pub fn check_version(
    source: &dyn RevisionSource,
    config: &CheckVersionConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Verdict, CheckError> {
    CheckVersion::new(source).run(config, sink)
}

/// Forwards to the caller's sink while keeping the recorded trail that ends
/// up on the verdict.
struct Observed<'a> {
    record: RecordingSink,
    forward: &'a mut dyn ProgressSink,
}

impl ProgressSink for Observed<'_> {
    fn scan_started(&mut self, revision: &str, total: usize) {
        self.record.scan_started(revision, total);
        self.forward.scan_started(revision, total);
    }

    fn file_parsed(&mut self, revision: &str, processed: usize, total: usize) {
        self.record.file_parsed(revision, processed, total);
        self.forward.file_parsed(revision, processed, total);
    }

    fn scan_finished(&mut self, revision: &str) {
        self.record.scan_finished(revision);
        self.forward.scan_finished(revision);
    }

    fn change_reported(&mut self, line: &str) {
        self.record.change_reported(line);
        self.forward.change_reported(line);
    }
}
