//! it2fss: convert an Impulse Tracker module into an FSS note sequence.
//!
//! Usage:
//!   it2fss song.it
//!   it2fss song.it -o song.fss --channel 1 --classify octave

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fss_convert::{convert_into, render, Classifier, ConvertOptions};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "it2fss")]
#[command(about = "Convert an Impulse Tracker module into an FSS note sequence")]
#[command(version)]
struct Cli {
    /// Input .it module
    module: PathBuf,

    /// Output .fss file (defaults to the module path with .fss, `-` for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tracker channel to translate (1-based, as shown in the tracker)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=64))]
    channel: u8,

    /// How notes are mapped to FSS voices
    #[arg(long, value_enum, default_value_t = Classify::Instrument)]
    classify: Classify,

    /// Write the lines produced before a conversion error
    #[arg(long)]
    keep_partial: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Classify {
    /// Instrument 1 = tone, 2 = noise, 3 = kick, 4 = snare
    Instrument,
    /// Octave 1-7 = tone, 0 = kick, 8 = snare, others = noise
    Octave,
}

impl From<Classify> for Classifier {
    fn from(classify: Classify) -> Self {
        match classify {
            Classify::Instrument => Classifier::Instrument,
            Classify::Octave => Classifier::Octave,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let data = fs::read(&cli.module)
        .with_context(|| format!("Failed to read {}", cli.module.display()))?;

    let options = ConvertOptions {
        channel: cli.channel - 1,
        classifier: cli.classify.into(),
    };
    let module = fss_formats::load_it(&data, options.channel)
        .with_context(|| format!("Failed to parse {}", cli.module.display()))?;

    let output = cli.output.clone().unwrap_or_else(|| cli.module.with_extension("fss"));

    let mut lines = Vec::new();
    let result = convert_into(&module, &options, &mut lines);
    if result.is_ok() || cli.keep_partial {
        write_output(&output, &render(&lines))?;
    }
    let report = result.with_context(|| format!("Failed to convert {}", cli.module.display()))?;

    tracing::info!(
        patterns = report.patterns,
        runs = report.runs,
        rows = report.rows,
        advisories = report.advisories.len(),
        "Converted {:?} -> {:?}",
        cli.module,
        output
    );
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if path == Path::new("-") {
        std::io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
