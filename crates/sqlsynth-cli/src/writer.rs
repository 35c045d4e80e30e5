//! Dataset writers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use sqlsynth_core::LabeledRow;

use crate::error::CliError;

/// Output format for the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header row, then one record per query
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Write `rows` to `out` in `format`.
pub fn write_dataset<W: Write>(
    rows: &[LabeledRow],
    format: OutputFormat,
    out: W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Csv => write_csv(rows, out),
        OutputFormat::Jsonl => write_jsonl(rows, out),
    }
}

/// Write `rows` to the file at `path`, or to stdout when `to_stdout` is set.
pub fn write_to(
    rows: &[LabeledRow],
    format: OutputFormat,
    path: &Path,
    to_stdout: bool,
) -> Result<(), CliError> {
    if to_stdout {
        let stdout = io::stdout();
        return write_dataset(rows, format, stdout.lock());
    }
    let file = File::create(path)?;
    write_dataset(rows, format, BufWriter::new(file))
}

fn write_csv<W: Write>(rows: &[LabeledRow], out: W) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(LabeledRow::COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_jsonl<W: Write>(rows: &[LabeledRow], mut out: W) -> Result<(), CliError> {
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
