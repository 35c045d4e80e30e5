//! Weighted table sampling.
//!
//! Selection is an explicit cumulative-weight walk over the catalog in
//! insertion order rather than a library weighted-choice primitive, so the
//! no-hit fallback stays reachable and the draw sequence is fixed.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::catalog::TableCatalog;
use crate::error::Error;

/// Lower clamp of the mixed-bias weight.
const MIXED_WEIGHT_MIN: u64 = 1;
/// Upper clamp of the mixed-bias weight.
const MIXED_WEIGHT_MAX: u64 = 1000;

/// Table sampling bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    /// Favor large tables: weight = row count.
    Fact,
    /// Favor small tables: weight = 1 / (1 + row count).
    Dim,
    /// Moderate: weight = clamp(row count / 1000, 1, 1000).
    #[default]
    Mixed,
}

impl Bias {
    /// Parse a bias name. Unrecognized names fall through to `Mixed`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "fact" => Bias::Fact,
            "dim" => Bias::Dim,
            _ => Bias::Mixed,
        }
    }

    /// Sampling weight of a table with `rows` estimated rows.
    pub fn weight(&self, rows: u64) -> f64 {
        match self {
            Bias::Fact => rows as f64,
            Bias::Dim => 1.0 / (1.0 + rows as f64),
            Bias::Mixed => (rows / 1000).clamp(MIXED_WEIGHT_MIN, MIXED_WEIGHT_MAX) as f64,
        }
    }
}

/// Pick one table name from the catalog under `bias`.
///
/// Draws `r` uniformly in `[0, total)` and returns the first table whose
/// cumulative weight reaches `r`. If the walk finds nothing, falls back to
/// a uniformly random table.
pub fn pick_table<'c, R: Rng + ?Sized>(
    catalog: &'c TableCatalog,
    bias: Bias,
    rng: &mut R,
) -> Result<&'c str, Error> {
    let tables = catalog.tables();
    let weights: Vec<f64> = tables.iter().map(|t| bias.weight(t.rows)).collect();
    let total: f64 = weights.iter().sum();

    let r = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (table, weight) in tables.iter().zip(&weights) {
        cumulative += weight;
        if r <= cumulative {
            return Ok(&table.name);
        }
    }

    warn!(?bias, r, total, "weighted walk found no table, using uniform fallback");
    tables
        .choose(rng)
        .map(|table| table.name.as_str())
        .ok_or(Error::EmptyCatalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TableDef;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn two_table_catalog() -> TableCatalog {
        TableCatalog::new(vec![
            TableDef::new("tiny", 10, &["id"]),
            TableDef::new("huge", 50_000_000, &["id"]),
        ])
        .unwrap()
    }

    fn histogram(catalog: &TableCatalog, bias: Bias, draws: usize) -> HashMap<String, usize> {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = HashMap::new();
        for _ in 0..draws {
            let name = pick_table(catalog, bias, &mut rng).unwrap();
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_weights() {
        assert_eq!(Bias::Fact.weight(5_000), 5_000.0);
        assert_eq!(Bias::Dim.weight(9), 0.1);
        assert_eq!(Bias::Mixed.weight(10), 1.0);
        assert_eq!(Bias::Mixed.weight(250_000), 250.0);
        assert_eq!(Bias::Mixed.weight(50_000_000), 1000.0);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Bias::from_name("fact"), Bias::Fact);
        assert_eq!(Bias::from_name("dim"), Bias::Dim);
        assert_eq!(Bias::from_name("mixed"), Bias::Mixed);
        assert_eq!(Bias::from_name("bogus"), Bias::Mixed);
    }

    #[test]
    fn test_fact_bias_prefers_large_tables() {
        let counts = histogram(&two_table_catalog(), Bias::Fact, 1000);
        assert!(counts.get("huge").copied().unwrap_or(0) > 990);
    }

    #[test]
    fn test_dim_bias_prefers_small_tables() {
        let counts = histogram(&two_table_catalog(), Bias::Dim, 1000);
        assert!(counts.get("tiny").copied().unwrap_or(0) > 990);
    }

    #[test]
    fn test_mixed_bias_is_clamped() {
        // Weights 1 and 1000: the small table is rare but still drawn.
        let counts = histogram(&two_table_catalog(), Bias::Mixed, 20_000);
        let tiny = counts.get("tiny").copied().unwrap_or(0);
        assert!(tiny > 0 && tiny < 100, "tiny = {tiny}");
    }

    #[test]
    fn test_pick_is_deterministic() {
        let catalog = TableCatalog::builtin();
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(
                pick_table(&catalog, Bias::Mixed, &mut a).unwrap(),
                pick_table(&catalog, Bias::Mixed, &mut b).unwrap()
            );
        }
    }

    #[test]
    fn test_zero_weights_pick_first_table() {
        let catalog = TableCatalog::new(vec![
            TableDef::new("empty_a", 0, &["id"]),
            TableDef::new("empty_b", 0, &["id"]),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_table(&catalog, Bias::Fact, &mut rng).unwrap(), "empty_a");
    }
}
