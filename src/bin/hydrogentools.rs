//! hydrogentools: convert a LightGBM text dump into the binary tree layout.
//!
//! Usage:
//!   hydrogentools [-i model.txt] [-o model.bin] [-v...] [-q]
//!
//! Prints `Wrote <path> (<n> bytes)` on success. Exit code 0 on success,
//! 1 if the input cannot be read or the output cannot be written.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hydrogen_tools::config::{ConvertConfig, Verbosity, DEFAULT_INPUT, DEFAULT_OUTPUT};
use hydrogen_tools::io::{convert_file, ConvertError};

#[derive(Parser, Debug)]
#[command(
    name = "hydrogentools",
    version,
    about = "Convert a LightGBM text model dump into a compact binary tree layout"
)]
struct Args {
    /// Model text dump.
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Binary output.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Log more (-v: info, -vv: per-tree debug).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Log nothing.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Silent
        } else {
            Verbosity::from_occurrences(self.verbose)
        }
    }
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(verbosity.level_filter().into()));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = ConvertConfig::builder()
        .verbosity(args.verbosity())
        .input(args.input)
        .output(args.output)
        .build();
    init_logging(config.verbosity);

    match convert_file(&config) {
        Ok(report) => {
            println!("Wrote {} ({} bytes)", report.output.display(), report.num_bytes);
            ExitCode::SUCCESS
        }
        Err(ConvertError::Read { path, source }) => {
            tracing::debug!(error = %source, "read failed");
            eprintln!(
                "Cannot read \"{}\" (maybe try hydrogentools --help)",
                path.display()
            );
            ExitCode::FAILURE
        }
        Err(e @ ConvertError::Write { .. }) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
