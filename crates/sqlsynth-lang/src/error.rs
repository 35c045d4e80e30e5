//! Error types for lexing and metadata extraction.

use crate::span::{offset_to_line_col, Span};
use thiserror::Error;

/// Errors raised while extracting metadata from a SQL string.
///
/// Every variant is a contract violation: a caller must not fall back to
/// default metadata, since the complexity label is derived from it.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input contains characters outside the SQL surface.
    #[error("unexpected input {found:?} at byte {}", .span.start)]
    UnexpectedInput { found: String, span: Span },

    /// The statement does not begin with SELECT.
    #[error("expected a SELECT statement")]
    NotSelect { span: Span },

    /// A metadata mapping is missing a required key.
    #[error("metadata is missing required key '{0}'")]
    MissingKey(&'static str),

    /// A metadata mapping has a value of the wrong type.
    #[error("metadata key '{key}' has invalid value: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ExtractError {
    /// Source span of the error, when it points into the SQL text.
    pub fn span(&self) -> Option<Span> {
        match self {
            ExtractError::UnexpectedInput { span, .. } | ExtractError::NotSelect { span } => {
                Some(*span)
            }
            ExtractError::MissingKey(_) | ExtractError::InvalidValue { .. } => None,
        }
    }

    /// Format the error with source context.
    pub fn format_with_source(&self, source: &str) -> String {
        let mut result = format!("error: {}\n", self);
        let Some(span) = self.span() else {
            return result;
        };

        let (line, col) = offset_to_line_col(source, span.start);
        result.push_str(&format!("  --> line {}:{}\n", line, col));

        if let Some(source_line) = source.lines().nth(line - 1) {
            result.push_str(&format!("   |\n{:3}| {}\n   |", line, source_line));

            for _ in 0..col {
                result.push(' ');
            }
            result.push('^');

            if span.len() > 1 {
                let room = source_line.len().saturating_sub(col) + 1;
                for _ in 1..span.len().min(room) {
                    result.push('~');
                }
            }
            result.push('\n');
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_source() {
        let err = ExtractError::UnexpectedInput {
            found: "@".to_string(),
            span: Span::new(7, 8),
        };
        let formatted = err.format_with_source("SELECT @x");
        assert!(formatted.contains("line 1:8"));
        assert!(formatted.contains("^"));
    }

    #[test]
    fn test_format_without_span() {
        let err = ExtractError::MissingKey("num_joins");
        let formatted = err.format_with_source("SELECT 1");
        assert_eq!(formatted, "error: metadata is missing required key 'num_joins'\n");
    }
}
