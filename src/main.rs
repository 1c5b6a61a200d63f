use std::fs::File;
use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use pysemver::cli::{Cli, Commands};
use pysemver::commands::check_version::{check_version, CheckVersionConfig};
use pysemver::config::{IgnoreList, PysemverConfig};
use pysemver::io::output::create_writer;
use pysemver::progress::{BarSink, ProgressConfig};
use pysemver::vcs::git::GitSource;

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::CheckVersion {
            path,
            this,
            that,
            ignore,
            format,
            output,
            quiet,
            verbosity,
        } => {
            init_logging(verbosity);

            let source = GitSource::discover(&path)?;
            let file_config = PysemverConfig::load(source.root())?;

            let mut entries = file_config.ignore;
            entries.extend(ignore);
            let config = CheckVersionConfig {
                this,
                that,
                ignore: IgnoreList::new(&entries)?,
            };

            let mut sink = BarSink::new(ProgressConfig::from_env(quiet));
            let verdict = check_version(&source, &config, &mut sink)?;

            let destination: Box<dyn Write> = match output {
                Some(path) => Box::new(
                    File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?,
                ),
                None => Box::new(io::stdout()),
            };
            let mut writer = create_writer(format.into(), destination);
            writer.write_verdict(&verdict)?;

            Ok(verdict.exit().code())
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
