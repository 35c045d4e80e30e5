//! Filter predicate synthesis keyed off column names.

use rand::Rng;

/// Substrings marking a temporal column.
const TEMPORAL_MARKERS: [&str; 4] = ["date", "ts", "time", "at"];
/// Substring marking an identifier column.
const IDENTIFIER_MARKER: &str = "id";
/// Substrings marking a numeric quantity column.
const QUANTITY_MARKERS: [&str; 4] = ["amount", "price", "qty", "stock"];

/// Predicate family chosen for a column.
///
/// Classification is by substring and checked in declaration order, so a
/// column like `order_id` is an identifier and `updated_at` is temporal.
/// Note that substring matching is loose: `status` and `category_id` both
/// contain `at` and classify as temporal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Temporal,
    Identifier,
    Quantity,
    Other,
}

impl ColumnKind {
    /// Classify a column by name.
    pub fn classify(column: &str) -> Self {
        if TEMPORAL_MARKERS.iter().any(|m| column.contains(m)) {
            ColumnKind::Temporal
        } else if column.contains(IDENTIFIER_MARKER) {
            ColumnKind::Identifier
        } else if QUANTITY_MARKERS.iter().any(|m| column.contains(m)) {
            ColumnKind::Quantity
        } else {
            ColumnKind::Other
        }
    }
}

/// Build one filter predicate for `alias.column`.
///
/// `_row_count` is accepted for callers that pass table size but does not
/// influence the predicate.
pub fn build_pred<R: Rng + ?Sized>(
    column: &str,
    alias: &str,
    _row_count: u64,
    rng: &mut R,
) -> String {
    match ColumnKind::classify(column) {
        ColumnKind::Temporal => {
            if rng.gen_bool(0.6) {
                format!("{}.{} > '2021-01-01'", alias, column)
            } else {
                format!("{}.{} BETWEEN '2020-01-01' AND '2022-12-31'", alias, column)
            }
        }
        ColumnKind::Identifier => {
            if rng.gen_bool(0.7) {
                format!("{}.{} = {}", alias, column, rng.gen_range(1..=1000))
            } else {
                let count = rng.gen_range(2..=4);
                let values: Vec<String> = (0..count)
                    .map(|_| rng.gen_range(1..=100).to_string())
                    .collect();
                format!("{}.{} IN ({})", alias, column, values.join(","))
            }
        }
        ColumnKind::Quantity => {
            format!("{}.{} > {}", alias, column, rng.gen_range(1..=500))
        }
        ColumnKind::Other => format!("{}.{} IS NOT NULL", alias, column),
    }
}
