//! Query assembly.
//!
//! Draw order is part of the reproducibility contract: table count, tables,
//! select list, join types, predicates, grouping, ordering, limit, subquery
//! wrap. Reordering any draw changes every query that follows it in a run.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use sqlsynth_lang::Metadata;

use crate::catalog::TableCatalog;
use crate::error::Error;
use crate::extract::MetadataExtractor;
use crate::predicate::build_pred;
use crate::sampler::pick_table;
use crate::select::{make_select_list, pick, AliasedColumn};
use crate::shape::QueryShape;

/// Join types, drawn uniformly.
pub const JOIN_TYPES: [&str; 3] = ["INNER JOIN", "LEFT JOIN", "RIGHT JOIN"];

/// Shared join columns, in preference order.
pub const JOIN_KEY_PRIORITY: [&str; 4] = ["user_id", "order_id", "id", "product_id"];

/// LIMIT values, drawn uniformly.
pub const LIMIT_CHOICES: [u32; 4] = [10, 50, 100, 1000];

/// Matches an aggregate call anywhere in the assembled text.
const AGGREGATE_CALL_PATTERN: &str = r"(?i)\b(SUM|COUNT|AVG|MIN|MAX)\(";

/// A generated query and its extracted metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuery {
    pub sql: String,
    pub metadata: Metadata,
    /// Tables in draw order; `tables[i]` is aliased `t{i}`.
    pub tables: Vec<String>,
}

/// Build the ON condition joining `right` to `left`.
///
/// Uses the first column of [`JOIN_KEY_PRIORITY`] present in both tables.
/// Without a shared key, equates the two tables' first columns.
pub fn join_condition(
    left_alias: &str,
    left_columns: &[String],
    right_alias: &str,
    right_columns: &[String],
) -> Result<String, Error> {
    let shared = JOIN_KEY_PRIORITY.iter().find(|key| {
        left_columns.iter().any(|c| c == *key) && right_columns.iter().any(|c| c == *key)
    });

    if let Some(key) = shared {
        return Ok(format!("{}.{} = {}.{}", left_alias, key, right_alias, key));
    }

    match (left_columns.first(), right_columns.first()) {
        (Some(left), Some(right)) => Ok(format!(
            "{}.{} = {}.{}",
            left_alias, left, right_alias, right
        )),
        _ => Err(Error::EmptyPool),
    }
}

/// Generates one SQL query at a time from a catalog.
pub struct QueryGenerator<'a, E> {
    catalog: &'a TableCatalog,
    extractor: &'a E,
    aggregate_call: Regex,
}

impl<'a, E: MetadataExtractor> QueryGenerator<'a, E> {
    /// Create a generator over `catalog`, extracting metadata with `extractor`.
    pub fn new(catalog: &'a TableCatalog, extractor: &'a E) -> Result<Self, Error> {
        Ok(Self {
            catalog,
            extractor,
            aggregate_call: Regex::new(AGGREGATE_CALL_PATTERN)?,
        })
    }

    /// Generate one query of `shape` and extract its metadata.
    pub fn generate_query<R: Rng + ?Sized>(
        &self,
        shape: QueryShape,
        rng: &mut R,
    ) -> Result<GeneratedQuery, Error> {
        let table_count = shape.draw_table_count(rng);
        let bias = shape.bias();

        let mut tables = Vec::with_capacity(table_count);
        for _ in 0..table_count {
            tables.push(pick_table(self.catalog, bias, rng)?.to_string());
        }
        let aliases: Vec<String> = (0..tables.len()).map(|i| format!("t{}", i)).collect();

        let pool: Vec<AliasedColumn> = aliases
            .iter()
            .zip(&tables)
            .flat_map(|(alias, table)| {
                self.catalog
                    .columns(table)
                    .iter()
                    .map(move |column| AliasedColumn::new(alias.as_str(), column.as_str()))
            })
            .collect();

        let mut clauses = vec![format!("SELECT {}", make_select_list(&pool, rng)?)];
        clauses.push(format!("FROM {} {}", tables[0], aliases[0]));
        self.push_joins(&tables, &aliases, &mut clauses, rng)?;

        let predicates = self.predicates(&tables, &aliases, rng);
        if !predicates.is_empty() {
            clauses.push(format!("WHERE {}", predicates.join(" AND ")));
        }

        // Detected on the text assembled so far, not tracked during select-list
        // construction.
        if self.aggregate_call.is_match(&clauses.join(" ")) && rng.gen_bool(0.8) {
            clauses.push(format!("GROUP BY {}", pick(&pool, rng)?));
            if rng.gen_bool(0.3) {
                clauses.push("HAVING COUNT(1) > 10".to_string());
            }
        }

        if rng.gen_bool(0.4) {
            clauses.push(format!("ORDER BY {} DESC", pick(&pool, rng)?));
        }
        if rng.gen_bool(0.6) {
            let limit = LIMIT_CHOICES[rng.gen_range(0..LIMIT_CHOICES.len())];
            clauses.push(format!("LIMIT {}", limit));
        }

        let mut sql = clauses.join(" ");
        if shape == QueryShape::High && rng.gen_bool(0.35) {
            let first = pool.first().ok_or(Error::EmptyPool)?;
            sql = format!(
                "SELECT * FROM ({}) sub WHERE sub.{} IS NOT NULL",
                sql, first.column
            );
        }

        let metadata = self.extractor.extract(&sql)?;
        Ok(GeneratedQuery {
            sql,
            metadata,
            tables,
        })
    }

    /// Join every table after the first back to `t0`.
    fn push_joins<R: Rng + ?Sized>(
        &self,
        tables: &[String],
        aliases: &[String],
        clauses: &mut Vec<String>,
        rng: &mut R,
    ) -> Result<(), Error> {
        let left_columns = self.catalog.columns(&tables[0]);
        for (table, alias) in tables.iter().zip(aliases).skip(1) {
            let join_type = JOIN_TYPES[rng.gen_range(0..JOIN_TYPES.len())];
            let on = join_condition(
                &aliases[0],
                left_columns,
                alias,
                self.catalog.columns(table),
            )?;
            clauses.push(format!("{} {} {} ON {}", join_type, table, alias, on));
        }
        Ok(())
    }

    /// Per table: with probability 0.7, add 0 to 2 predicates on random columns.
    fn predicates<R: Rng + ?Sized>(
        &self,
        tables: &[String],
        aliases: &[String],
        rng: &mut R,
    ) -> Vec<String> {
        let mut predicates = Vec::new();
        for (table, alias) in tables.iter().zip(aliases) {
            if !rng.gen_bool(0.7) {
                continue;
            }
            let columns = self.catalog.columns(table);
            let row_count = self.catalog.row_count(table);
            for _ in 0..rng.gen_range(0..=2) {
                if let Some(column) = columns.choose(rng) {
                    predicates.push(build_pred(column, alias, row_count, rng));
                }
            }
        }
        predicates
    }
}
