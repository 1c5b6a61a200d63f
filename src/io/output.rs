//! Verdict rendering.

use std::io::Write;

use colored::Colorize;

use crate::commands::check_version::Verdict;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl From<crate::cli::OutputFormat> for OutputFormat {
    fn from(format: crate::cli::OutputFormat) -> Self {
        match format {
            crate::cli::OutputFormat::Terminal => OutputFormat::Terminal,
            crate::cli::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

pub trait VerdictWriter {
    fn write_verdict(&mut self, verdict: &Verdict) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn VerdictWriter> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> VerdictWriter for JsonWriter<W> {
    fn write_verdict(&mut self, verdict: &Verdict) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(verdict)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> VerdictWriter for TerminalWriter<W> {
    fn write_verdict(&mut self, verdict: &Verdict) -> anyhow::Result<()> {
        writeln!(self.writer, "Parsing files from {}…", verdict.this)?;
        writeln!(self.writer, "Parsing files from {}…", verdict.that)?;

        writeln!(self.writer, "Checking for functional changes…")?;
        for path in &verdict.touched {
            let line = format!("~ {}", path.display());
            writeln!(self.writer, "{}", line.yellow())?;
        }

        writeln!(self.writer, "Checking for + functions…")?;
        for change in &verdict.added {
            writeln!(self.writer, "{}", change.report_line().yellow())?;
        }

        writeln!(self.writer, "Checking for - functions…")?;
        for change in &verdict.removed {
            writeln!(self.writer, "{}", change.report_line().yellow())?;
        }

        writeln!(self.writer, "Version bump required: {}!", verdict.required)?;
        if verdict.acceptable {
            let line = format!("Current version: {}", verdict.this);
            writeln!(self.writer, "{}", line.green())?;
        } else {
            let line = format!(
                "Current version: {} does not cover a {} bump over {}",
                verdict.this, verdict.required, verdict.that
            );
            writeln!(self.writer, "{}", line.red())?;
        }
        Ok(())
    }
}
