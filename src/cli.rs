use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pysemver")]
#[command(about = "Semantic-version checker for the public function surface of Python projects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the declared version covers the public API changes
    CheckVersion {
        /// Repository location (any directory inside the work tree)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Revision under check (defaults to the declared package version)
        #[arg(long)]
        this: Option<String>,

        /// Baseline revision (defaults to the last release tag)
        #[arg(long)]
        that: Option<String>,

        /// Paths to ignore when looking for functional changes
        #[arg(long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress progress bars
        #[arg(long)]
        quiet: bool,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
