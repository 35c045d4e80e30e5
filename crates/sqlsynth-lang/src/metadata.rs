//! Structural metadata for one SQL string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractError;

/// Structural features of a SQL string, consumed by the complexity scorer.
///
/// Field order matches [`Metadata::KEYS`] and is the column order used when
/// rows are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Largest estimated row count over all referenced tables.
    pub estimated_table_size_max: u64,
    pub num_joins: u32,
    pub num_subqueries: u32,
    /// Deepest paren nesting at which a SELECT appears (0 for a flat query).
    pub subquery_depth: u32,
    pub num_aggregates: u32,
    pub has_groupby: bool,
    pub select_star: bool,
    pub window_functions: bool,
    pub has_limit: bool,
    pub udf_usage: bool,
    pub s3_scan: bool,
    pub cartesian_join: bool,
    pub estimated_output_rows: u64,
    pub estimated_sort_cost: u64,
}

impl Metadata {
    /// Every metadata key, in serialization order.
    pub const KEYS: [&'static str; 14] = [
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
    ];

    /// Build metadata from a JSON object produced by a foreign extractor.
    ///
    /// Every key in [`Metadata::KEYS`] must be present. Counts must be
    /// non-negative integers, flags booleans (or 0/1), and magnitudes
    /// non-negative numbers.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ExtractError> {
        Ok(Self {
            estimated_table_size_max: magnitude(map, "estimated_table_size_max")?,
            num_joins: count(map, "num_joins")?,
            num_subqueries: count(map, "num_subqueries")?,
            subquery_depth: count(map, "subquery_depth")?,
            num_aggregates: count(map, "num_aggregates")?,
            has_groupby: flag(map, "has_groupby")?,
            select_star: flag(map, "select_star")?,
            window_functions: flag(map, "window_functions")?,
            has_limit: flag(map, "has_limit")?,
            udf_usage: flag(map, "udf_usage")?,
            s3_scan: flag(map, "s3_scan")?,
            cartesian_join: flag(map, "cartesian_join")?,
            estimated_output_rows: magnitude(map, "estimated_output_rows")?,
            estimated_sort_cost: magnitude(map, "estimated_sort_cost")?,
        })
    }

    /// Render every value as a string, in [`Metadata::KEYS`] order.
    ///
    /// Flags render as `True`/`False` so existing training pipelines can
    /// read the columns unchanged.
    pub fn values(&self) -> [String; 14] {
        [
            self.estimated_table_size_max.to_string(),
            self.num_joins.to_string(),
            self.num_subqueries.to_string(),
            self.subquery_depth.to_string(),
            self.num_aggregates.to_string(),
            render_flag(self.has_groupby),
            render_flag(self.select_star),
            render_flag(self.window_functions),
            render_flag(self.has_limit),
            render_flag(self.udf_usage),
            render_flag(self.s3_scan),
            render_flag(self.cartesian_join),
            self.estimated_output_rows.to_string(),
            self.estimated_sort_cost.to_string(),
        ]
    }
}

fn render_flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ExtractError> {
    map.get(key).ok_or(ExtractError::MissingKey(key))
}

fn count(map: &Map<String, Value>, key: &'static str) -> Result<u32, ExtractError> {
    let value = lookup(map, key)?;
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ExtractError::InvalidValue {
            key,
            reason: format!("expected a non-negative integer, got {}", value),
        })
}

fn flag(map: &Map<String, Value>, key: &'static str) -> Result<bool, ExtractError> {
    match lookup(map, key)? {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        other => Err(ExtractError::InvalidValue {
            key,
            reason: format!("expected a boolean, got {}", other),
        }),
    }
}

fn magnitude(map: &Map<String, Value>, key: &'static str) -> Result<u64, ExtractError> {
    let value = lookup(map, key)?;
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Ok(f.round() as u64),
        _ => Err(ExtractError::InvalidValue {
            key,
            reason: format!("expected a non-negative number, got {}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_map() -> Map<String, Value> {
        let value = json!({
            "estimated_table_size_max": 25_000_000,
            "num_joins": 2,
            "num_subqueries": 1,
            "subquery_depth": 1,
            "num_aggregates": 1,
            "has_groupby": true,
            "select_star": false,
            "window_functions": 0,
            "has_limit": true,
            "udf_usage": false,
            "s3_scan": false,
            "cartesian_join": false,
            "estimated_output_rows": 1500.4,
            "estimated_sort_cost": 0,
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_from_map() {
        let meta = Metadata::from_map(&full_map()).unwrap();
        assert_eq!(meta.estimated_table_size_max, 25_000_000);
        assert_eq!(meta.num_joins, 2);
        assert!(meta.has_groupby);
        assert!(!meta.window_functions);
        assert_eq!(meta.estimated_output_rows, 1500);
    }

    #[test]
    fn test_from_map_missing_key() {
        let mut map = full_map();
        map.remove("cartesian_join");
        let err = Metadata::from_map(&map).unwrap_err();
        assert!(matches!(err, ExtractError::MissingKey("cartesian_join")));
    }

    #[test]
    fn test_from_map_invalid_value() {
        let mut map = full_map();
        map.insert("num_joins".to_string(), json!(-1));
        let err = Metadata::from_map(&map).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { key: "num_joins", .. }));
    }

    #[test]
    fn test_values_follow_key_order() {
        let meta = Metadata {
            estimated_table_size_max: 7,
            has_limit: true,
            ..Default::default()
        };
        let values = meta.values();
        assert_eq!(values.len(), Metadata::KEYS.len());
        assert_eq!(values[0], "7");
        assert_eq!(values[8], "True");
        assert_eq!(values[11], "False");
    }

    #[test]
    fn test_serde_field_names_match_keys() {
        let value = serde_json::to_value(Metadata::default()).unwrap();
        let map = value.as_object().unwrap();
        for key in Metadata::KEYS {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert_eq!(map.len(), Metadata::KEYS.len());
    }
}
