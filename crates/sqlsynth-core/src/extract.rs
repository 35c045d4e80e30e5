//! Metadata extractor seam.

use sqlsynth_lang::{extract_metadata, Metadata};

use crate::catalog::TableCatalog;
use crate::error::Error;

/// Turns a generated SQL string into structural metadata.
///
/// Implementations must return every metadata field or fail; a partial
/// result would corrupt the complexity label.
pub trait MetadataExtractor {
    /// Extract metadata for `sql`.
    fn extract(&self, sql: &str) -> Result<Metadata, Error>;
}

/// Token-scan extractor that sizes tables from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogExtractor<'a> {
    catalog: &'a TableCatalog,
}

impl<'a> CatalogExtractor<'a> {
    /// Create an extractor backed by `catalog`.
    pub fn new(catalog: &'a TableCatalog) -> Self {
        Self { catalog }
    }
}

impl MetadataExtractor for CatalogExtractor<'_> {
    fn extract(&self, sql: &str) -> Result<Metadata, Error> {
        extract_metadata(sql, self.catalog).map_err(|source| Error::extract(sql, source))
    }
}
