//! CLI error type.

use thiserror::Error;

/// Errors surfaced by the `sqlsynth` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generation failed.
    #[error(transparent)]
    Generate(#[from] sqlsynth_core::Error),

    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Message for stderr. Extraction failures show the rejected query with
    /// the offending span marked.
    pub fn render(&self) -> String {
        match self {
            CliError::Generate(sqlsynth_core::Error::Extract { sql, source }) => {
                source.format_with_source(sql)
            }
            other => format!("Error: {}\n", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlsynth_core::lang::{ExtractError, Span};

    #[test]
    fn test_render_extract_error_with_source() {
        let err = CliError::from(sqlsynth_core::Error::extract(
            "SELECT t0.id FROM users t0 WHERE t0.id = $1",
            ExtractError::UnexpectedInput {
                found: "$".to_string(),
                span: Span::new(41, 42),
            },
        ));
        let rendered = err.render();
        assert!(rendered.starts_with("error: unexpected input"), "{rendered}");
        assert!(rendered.contains("line 1:42"), "{rendered}");
        assert!(rendered.contains("SELECT t0.id FROM users t0 WHERE t0.id = $1"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn test_render_other_errors() {
        let err = CliError::from(sqlsynth_core::Error::EmptyCatalog);
        assert_eq!(err.render(), "Error: table catalog is empty\n");
    }
}
