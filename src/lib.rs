pub mod cli;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod io_utils;
pub mod stream;

use std::env;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, Log};

use crate::{
    cli::Cli,
    diagnostics::Diagnostics,
    stream::{BatchSummary, Pipeline},
};

pub use crate::{
    convert::{RoundingRule, ValueConversionError, convert_k_to_f},
    error::BatchError,
};

/// Builds the binary's logger without installing it globally.
///
/// `RUST_LOG` is honoured when set; otherwise this crate logs at `info`.
pub fn build_logger() -> env_logger::Logger {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if env::var("RUST_LOG").is_err() {
        builder.filter_module(diagnostics::TARGET, LevelFilter::Info);
    }
    builder.format_timestamp_millis().build()
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let logger = build_logger();
    execute(&cli, &logger).map(|_| ())
}

pub fn execute(cli: &Cli, logger: &dyn Log) -> Result<BatchSummary> {
    let diagnostics = Diagnostics::new(logger);
    diagnostics.info(format_args!("Starting Kelvin to Fahrenheit batch conversion"));
    let summary = Pipeline::new(diagnostics)
        .process_files(&cli.input, &cli.output)
        .with_context(|| {
            format!("Converting {:?} into {:?}", cli.input, cli.output)
        });
    if let Ok(summary) = &summary {
        diagnostics.info(format_args!(
            "Processing complete: {} row(s) written to '{}'",
            summary.rows,
            cli.output.display()
        ));
    }
    diagnostics.flush();
    summary
}
