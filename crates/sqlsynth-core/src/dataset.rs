//! Labeled dataset generation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use sqlsynth_lang::Metadata;
use tracing::{debug, info};

use crate::assembler::QueryGenerator;
use crate::catalog::TableCatalog;
use crate::config::GeneratorConfig;
use crate::error::Error;
use crate::extract::MetadataExtractor;
use crate::scorer::{score_and_label, Label};
use crate::shape::QueryShape;

/// One labeled training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledRow {
    pub sql: String,
    #[serde(flatten)]
    pub metadata: Metadata,
    pub label: Label,
}

impl LabeledRow {
    /// Column order of a serialized row.
    pub const COLUMNS: [&'static str; 16] = [
        "sql",
        "estimated_table_size_max",
        "num_joins",
        "num_subqueries",
        "subquery_depth",
        "num_aggregates",
        "has_groupby",
        "select_star",
        "window_functions",
        "has_limit",
        "udf_usage",
        "s3_scan",
        "cartesian_join",
        "estimated_output_rows",
        "estimated_sort_cost",
        "label",
    ];

    /// Render the row as strings in [`LabeledRow::COLUMNS`] order.
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(Self::COLUMNS.len());
        record.push(self.sql.clone());
        record.extend(self.metadata.values());
        record.push(self.label.to_string());
        record
    }
}

/// Label histogram of a generated dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub rows: usize,
    /// Row count per label, indexed by [`Label::as_u8`].
    pub per_label: [usize; 3],
}

impl DatasetSummary {
    /// Count labels over `rows`.
    pub fn from_rows(rows: &[LabeledRow]) -> Self {
        let mut per_label = [0; 3];
        for row in rows {
            per_label[row.label.as_u8() as usize] += 1;
        }
        Self {
            rows: rows.len(),
            per_label,
        }
    }

    /// Rows carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.per_label[label.as_u8() as usize]
    }
}

/// Generate a shuffled, labeled dataset.
///
/// The random stream is seeded once from `config.seed` and drives every draw
/// in the run, including the final shuffle, so equal configs give equal
/// output.
pub fn generate_dataset<E: MetadataExtractor>(
    catalog: &TableCatalog,
    extractor: &E,
    config: &GeneratorConfig,
) -> Result<Vec<LabeledRow>, Error> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let generator = QueryGenerator::new(catalog, extractor)?;
    let quotas = config.skew.partition(config.rows);

    let mut rows = Vec::with_capacity(config.rows);
    for (shape, quota) in QueryShape::ALL.into_iter().zip(quotas) {
        for _ in 0..quota {
            let query = generator.generate_query(shape, &mut rng)?;
            let label = score_and_label(&query.metadata);
            debug!(
                %shape,
                tables = query.tables.len(),
                label = label.as_u8(),
                "generated query"
            );
            rows.push(LabeledRow {
                sql: query.sql,
                metadata: query.metadata,
                label,
            });
        }
    }

    rows.shuffle(&mut rng);

    let summary = DatasetSummary::from_rows(&rows);
    info!(
        rows = summary.rows,
        seed = config.seed,
        low_shape = quotas[0],
        medium_shape = quotas[1],
        high_shape = quotas[2],
        label_0 = summary.count(Label::Low),
        label_1 = summary.count(Label::Medium),
        label_2 = summary.count(Label::High),
        "dataset generated"
    );

    Ok(rows)
}
