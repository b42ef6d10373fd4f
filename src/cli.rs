use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_INPUT: &str = "batchfile_2_kelvin.csv";
pub const DEFAULT_OUTPUT: &str = "batchfile_3_fahrenheit.csv";

/// Command-line options: where to read Kelvin readings and where to write Fahrenheit ones.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert Kelvin temperature readings in a CSV file to whole degrees Fahrenheit",
    long_about = None
)]
pub struct Cli {
    /// Input CSV file with Year, Month, Day, Time, TempK columns
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    /// Output CSV file (created or truncated)
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}
