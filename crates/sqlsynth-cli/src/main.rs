//! sqlsynth Command-Line Generator
//!
//! Generates a labeled synthetic SQL dataset and writes it as CSV or JSON lines.

mod args;
mod error;
mod writer;

use args::Args;
use clap::Parser;
use error::CliError;
use sqlsynth_core::{generate_dataset, CatalogExtractor, DatasetSummary, Label, TableCatalog};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout output stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqlsynth=info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprint!("{}", e.render());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let catalog = match &args.catalog {
        Some(path) => {
            let catalog = TableCatalog::load(path)?;
            tracing::info!(path = %path.display(), tables = catalog.len(), "catalog loaded");
            catalog
        }
        None => TableCatalog::builtin(),
    };

    let config = args.into_config();
    let extractor = CatalogExtractor::new(&catalog);
    let rows = generate_dataset(&catalog, &extractor, &config)?;

    let summary = DatasetSummary::from_rows(&rows);
    tracing::info!(
        format = %args.format,
        low = summary.count(Label::Low),
        medium = summary.count(Label::Medium),
        high = summary.count(Label::High),
        "writing dataset"
    );

    writer::write_to(&rows, args.format, &args.out, args.writes_stdout())?;

    if !args.writes_stdout() {
        println!("writing {}", args.out.display());
    }
    Ok(())
}
