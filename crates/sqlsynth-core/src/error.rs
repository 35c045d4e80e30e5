//! Core error types.

use sqlsynth_lang::ExtractError;
use thiserror::Error;

/// Query synthesis errors.
///
/// None of these are recoverable inside a generation run; they propagate to
/// the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// The metadata extractor rejected a generated query.
    #[error("metadata extraction failed: {source}")]
    Extract {
        /// The rejected query.
        sql: String,
        #[source]
        source: ExtractError,
    },

    /// No tables to sample from.
    #[error("table catalog is empty")]
    EmptyCatalog,

    /// No (alias, column) pairs to build clauses from.
    #[error("column pool is empty")]
    EmptyPool,

    /// Malformed catalog definition.
    #[error("invalid catalog: {0}")]
    Catalog(String),

    /// Invalid generation parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pattern compilation error.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an extraction failure together with the query that caused it.
    pub fn extract(sql: impl Into<String>, source: ExtractError) -> Self {
        Error::Extract {
            sql: sql.into(),
            source,
        }
    }
}
