//! sqlsynth SQL surface
//!
//! This crate tokenizes the SQL produced by the generator and extracts the
//! structural metadata the complexity scorer consumes.
//!
//! # Usage
//!
//! ```rust
//! use sqlsynth_lang::extract_metadata;
//!
//! fn rows(_table: &str) -> u64 {
//!     1000
//! }
//!
//! let meta = extract_metadata("SELECT t0.id FROM users t0 LIMIT 10", &rows).unwrap();
//! assert_eq!(meta.num_joins, 0);
//! assert!(meta.has_limit);
//! ```

pub mod error;
pub mod extractor;
pub mod lexer;
pub mod metadata;
pub mod span;

pub use error::ExtractError;
pub use extractor::{extract_metadata, TableSizes, AGGREGATE_FUNCTIONS};
pub use lexer::{is_bare_identifier, SpannedToken, Token};
pub use metadata::Metadata;
pub use span::Span;

/// Tokenize a SQL string (for debugging/testing).
///
/// # Example
///
/// ```rust
/// use sqlsynth_lang::tokenize;
///
/// let tokens = tokenize("SELECT t0.id FROM users t0").unwrap();
/// assert_eq!(tokens.len(), 7);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ExtractError> {
    lexer::tokenize(source)
}
