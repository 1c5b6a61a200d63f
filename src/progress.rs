//! Progress feedback for revision scans.
//!
//! Scans report one `(processed, total)` step per parsed file through the
//! [`ProgressSink`] observer. The terminal sink draws an `indicatif` bar per
//! scanned revision and stays silent in quiet mode or when stderr is not a
//! terminal; the recording sink keeps the trail so a verdict can carry it.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

pub const TEMPLATE_SCAN: &str = "📄 {msg} {pos}/{len} files ({percent}%)";

/// One `(processed, total)` step of a revision scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub revision: String,
    pub processed: usize,
    pub total: usize,
}

/// Configuration for progress display behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output.
    pub quiet: bool,
}

impl ProgressConfig {
    /// Combine the CLI flag with the `PYSEMVER_QUIET` environment variable.
    pub fn from_env(quiet: bool) -> Self {
        Self {
            quiet: quiet || std::env::var("PYSEMVER_QUIET").is_ok(),
        }
    }

    /// Progress bars are only drawn on an interactive stderr.
    pub fn should_show_progress(&self) -> bool {
        if self.quiet {
            return false;
        }
        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// Observer for scan progress and diff events.
pub trait ProgressSink {
    fn scan_started(&mut self, revision: &str, total: usize);
    fn file_parsed(&mut self, revision: &str, processed: usize, total: usize);
    fn scan_finished(&mut self, revision: &str);

    /// One itemized `+`/`-` line found during the diff phase.
    fn change_reported(&mut self, _line: &str) {}
}

/// Swallows every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn scan_started(&mut self, _revision: &str, _total: usize) {}
    fn file_parsed(&mut self, _revision: &str, _processed: usize, _total: usize) {}
    fn scan_finished(&mut self, _revision: &str) {}
}

/// Records every step.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ProgressEvent>,
}

impl ProgressSink for RecordingSink {
    fn scan_started(&mut self, _revision: &str, _total: usize) {}

    fn file_parsed(&mut self, revision: &str, processed: usize, total: usize) {
        self.events.push(ProgressEvent {
            revision: revision.to_string(),
            processed,
            total,
        });
    }

    fn scan_finished(&mut self, _revision: &str) {}
}

/// Live terminal feedback, one bar per scanned revision.
pub struct BarSink {
    config: ProgressConfig,
    bar: Option<ProgressBar>,
}

impl BarSink {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config, bar: None }
    }
}

impl ProgressSink for BarSink {
    fn scan_started(&mut self, revision: &str, total: usize) {
        if !self.config.should_show_progress() {
            self.bar = Some(ProgressBar::hidden());
            return;
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE_SCAN)
                .expect("Invalid progress bar template")
                .progress_chars("█▓▒░  "),
        );
        bar.set_message(format!("parsing {revision}"));
        self.bar = Some(bar);
    }

    fn file_parsed(&mut self, _revision: &str, processed: usize, _total: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(processed as u64);
        }
    }

    fn scan_finished(&mut self, _revision: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
