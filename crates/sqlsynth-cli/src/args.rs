//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use sqlsynth_core::config::{DEFAULT_ROWS, DEFAULT_SEED};
use sqlsynth_core::{GeneratorConfig, ShapeSkew};

use crate::writer::OutputFormat;

/// Path that selects standard output.
pub const STDOUT_PATH: &str = "-";

/// sqlsynth - labeled synthetic SQL dataset generator
#[derive(Parser, Debug)]
#[command(name = "sqlsynth")]
#[command(version, about = "Generate a labeled synthetic SQL dataset", long_about = None)]
pub struct Args {
    /// Number of rows to generate
    #[arg(short = 'n', long = "n", default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Output path, or "-" for stdout
    #[arg(short, long, default_value = "synthetic_v3.csv")]
    pub out: PathBuf,

    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Low, medium and high shape proportions
    #[arg(long, default_value = "0.7,0.2,0.1")]
    pub skew: ShapeSkew,

    /// Output format
    #[arg(long, default_value = "csv", value_enum)]
    pub format: OutputFormat,

    /// JSON table catalog to use instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

impl Args {
    /// Convert arguments to a generator configuration.
    pub fn into_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.rows)
            .with_seed(self.seed)
            .with_skew(self.skew)
    }

    /// Whether output goes to stdout.
    pub fn writes_stdout(&self) -> bool {
        self.out.as_os_str() == STDOUT_PATH
    }
}
