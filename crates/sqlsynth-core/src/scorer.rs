//! Complexity scoring.
//!
//! Turns extracted metadata into an integer cost score and a three-class
//! label. Tiered factors (table size, joins, subqueries, aggregation) take
//! the highest matching tier only; every other factor is an independent
//! bonus or penalty.

use serde::{Serialize, Serializer};
use sqlsynth_lang::Metadata;

/// Table size tiers, highest first: (minimum rows, points).
const TABLE_SIZE_TIERS: [(u64, i32); 3] = [(20_000_000, 3), (5_000_000, 2), (500_000, 1)];

const SUBQUERY_HEAVY_COUNT: u32 = 2;
const SUBQUERY_HEAVY_DEPTH: u32 = 3;
const OUTPUT_ROWS_THRESHOLD: u64 = 1_000_000;
const SORT_COST_THRESHOLD: u64 = 5_000_000;

/// Highest score labelled [`Label::Low`].
const LOW_CEILING: i32 = 2;
/// Highest score labelled [`Label::Medium`].
const MEDIUM_CEILING: i32 = 6;

/// Estimated execution cost class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Label {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Label {
    /// All labels, in class order.
    pub const ALL: [Label; 3] = [Label::Low, Label::Medium, Label::High];

    /// Numeric class, 0 to 2.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Map a score onto a label: `<= 2` low, `3..=6` medium, `>= 7` high.
    pub fn from_score(score: i32) -> Self {
        if score <= LOW_CEILING {
            Label::Low
        } else if score <= MEDIUM_CEILING {
            Label::Medium
        } else {
            Label::High
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Compute the integer complexity score of `meta`.
pub fn score(meta: &Metadata) -> i32 {
    let mut score = 0;

    // Table size
    score += TABLE_SIZE_TIERS
        .iter()
        .find(|(min_rows, _)| meta.estimated_table_size_max >= *min_rows)
        .map_or(0, |(_, points)| *points);

    // Joins
    score += match meta.num_joins {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => 3,
    };

    // Subqueries
    if meta.num_subqueries >= SUBQUERY_HEAVY_COUNT || meta.subquery_depth >= SUBQUERY_HEAVY_DEPTH {
        score += 3;
    } else if meta.num_subqueries == 1 {
        score += 1;
    }

    // Aggregation, heavier with grouping
    if meta.num_aggregates > 0 && meta.has_groupby {
        score += 3;
    } else if meta.num_aggregates > 0 {
        score += 1;
    }

    if meta.select_star {
        score += 2;
    }
    if meta.window_functions {
        score += 3;
    }
    if meta.has_limit {
        score -= 1;
    }
    if meta.udf_usage {
        score += 3;
    }
    if meta.s3_scan {
        score += 3;
    }
    if meta.cartesian_join {
        score += 5;
    }
    if meta.estimated_output_rows > OUTPUT_ROWS_THRESHOLD {
        score += 2;
    }
    if meta.estimated_sort_cost > SORT_COST_THRESHOLD {
        score += 2;
    }

    score
}

/// Score `meta` and map the score onto a label.
pub fn score_and_label(meta: &Metadata) -> Label {
    Label::from_score(score(meta))
}
