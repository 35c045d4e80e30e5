//! Structural metadata extraction.
//!
//! A single left-to-right pass over the token stream. Paren depth is tracked
//! to measure subquery nesting, and the current clause scopes predicate
//! selectivity so join conditions and HAVING filters do not count as WHERE
//! predicates.

use crate::error::ExtractError;
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::metadata::Metadata;
use crate::span::Span;

/// Aggregate function names, upper case.
pub const AGGREGATE_FUNCTIONS: [&str; 5] = ["SUM", "COUNT", "AVG", "MIN", "MAX"];

/// Non-aggregate functions that do not count as user-defined.
const BUILTIN_FUNCTIONS: &[&str] = &[
    "ABS",
    "CAST",
    "CEIL",
    "COALESCE",
    "CONCAT",
    "CURRENT_DATE",
    "DATE",
    "DATE_TRUNC",
    "DENSE_RANK",
    "EXTRACT",
    "FIRST_VALUE",
    "FLOOR",
    "IFNULL",
    "LAG",
    "LAST_VALUE",
    "LEAD",
    "LENGTH",
    "LOWER",
    "NOW",
    "NTILE",
    "NULLIF",
    "RANK",
    "ROUND",
    "ROW_NUMBER",
    "SUBSTR",
    "SUBSTRING",
    "TRIM",
    "UPPER",
];

const EQ_SELECTIVITY: f64 = 0.1;
const NE_SELECTIVITY: f64 = 0.9;
const RANGE_SELECTIVITY: f64 = 0.3;
const BETWEEN_SELECTIVITY: f64 = 0.25;
const IN_VALUE_SELECTIVITY: f64 = 0.1;
const IS_NULL_SELECTIVITY: f64 = 0.1;
const IS_NOT_NULL_SELECTIVITY: f64 = 0.9;
const GROUP_BY_REDUCTION: f64 = 0.1;
const HAVING_REDUCTION: f64 = 0.5;

/// Row-count lookup used to size referenced tables.
pub trait TableSizes {
    /// Estimated row count for `table`.
    fn estimated_rows(&self, table: &str) -> u64;
}

impl<F> TableSizes for F
where
    F: Fn(&str) -> u64,
{
    fn estimated_rows(&self, table: &str) -> u64 {
        self(table)
    }
}

/// Extract structural metadata from a SQL string.
///
/// Fails if the input cannot be tokenized or is not a SELECT statement.
pub fn extract_metadata(sql: &str, sizes: &dyn TableSizes) -> Result<Metadata, ExtractError> {
    let tokens = tokenize(sql)?;
    match tokens.first() {
        Some(first) if first.token == Token::Select => {}
        Some(first) => return Err(ExtractError::NotSelect { span: first.span }),
        None => {
            return Err(ExtractError::NotSelect {
                span: Span::new(0, sql.len()),
            })
        }
    }

    let mut scan = Scan::new(&tokens);
    scan.run();
    Ok(scan.into_metadata(sizes))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Select,
    From,
    On,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
}

struct Scan<'a> {
    tokens: &'a [SpannedToken],
    depth: u32,
    clause: Clause,
    tables: Vec<String>,
    limits: Vec<u64>,
    selectivity: f64,
    num_joins: u32,
    num_subqueries: u32,
    subquery_depth: u32,
    num_aggregates: u32,
    has_groupby: bool,
    has_having: bool,
    has_order: bool,
    select_star: bool,
    window_functions: bool,
    udf_usage: bool,
    s3_scan: bool,
    cartesian_join: bool,
}

impl<'a> Scan<'a> {
    fn new(tokens: &'a [SpannedToken]) -> Self {
        Self {
            tokens,
            depth: 0,
            clause: Clause::Select,
            tables: Vec::new(),
            limits: Vec::new(),
            selectivity: 1.0,
            num_joins: 0,
            num_subqueries: 0,
            subquery_depth: 0,
            num_aggregates: 0,
            has_groupby: false,
            has_having: false,
            has_order: false,
            select_star: false,
            window_functions: false,
            udf_usage: false,
            s3_scan: false,
            cartesian_join: false,
        }
    }

    fn peek(&self, index: usize) -> Option<&'a Token> {
        self.tokens.get(index).map(|t| &t.token)
    }

    fn run(&mut self) {
        let tokens = self.tokens;
        for (i, spanned) in tokens.iter().enumerate() {
            let next = self.peek(i + 1);
            match &spanned.token {
                Token::LParen => {
                    if next == Some(&Token::Select) {
                        self.num_subqueries += 1;
                    }
                    self.depth += 1;
                }
                Token::RParen => self.depth = self.depth.saturating_sub(1),
                Token::Select => {
                    self.clause = Clause::Select;
                    self.subquery_depth = self.subquery_depth.max(self.depth);
                    let first_item = match next {
                        Some(Token::Distinct) => self.peek(i + 2),
                        other => other,
                    };
                    if first_item == Some(&Token::Star) {
                        self.select_star = true;
                    }
                }
                Token::From => {
                    self.clause = Clause::From;
                    self.scan_from_list(i + 1);
                }
                Token::Join => {
                    self.clause = Clause::From;
                    self.num_joins += 1;
                    if i > 0 && self.peek(i - 1) == Some(&Token::Cross) {
                        self.cartesian_join = true;
                    }
                    if let Some(name) = next.and_then(Token::ident) {
                        self.tables.push(name.to_string());
                    }
                    if !self.has_join_condition(i + 1) {
                        self.cartesian_join = true;
                    }
                }
                Token::On | Token::Using => self.clause = Clause::On,
                Token::Where => self.clause = Clause::Where,
                Token::Group if next == Some(&Token::By) => {
                    self.clause = Clause::GroupBy;
                    self.has_groupby = true;
                }
                Token::Order if next == Some(&Token::By) => {
                    self.clause = Clause::OrderBy;
                    self.has_order = true;
                }
                Token::Having => {
                    self.clause = Clause::Having;
                    self.has_having = true;
                }
                Token::Limit => {
                    self.clause = Clause::Limit;
                    if let Some(Token::Int(n)) = next {
                        self.limits.push(u64::try_from(*n).unwrap_or(0));
                    }
                }
                Token::Over if next == Some(&Token::LParen) => self.window_functions = true,
                Token::Ident(name) if next == Some(&Token::LParen) => self.record_call(name),
                Token::String(text) => {
                    if is_s3_wildcard(text) {
                        self.s3_scan = true;
                    }
                }
                comparison @ (Token::Eq
                | Token::Ne
                | Token::Lt
                | Token::Le
                | Token::Gt
                | Token::Ge) => {
                    if self.clause == Clause::Where && next.is_some_and(Token::is_literal) {
                        self.selectivity *= match comparison {
                            Token::Eq => EQ_SELECTIVITY,
                            Token::Ne => NE_SELECTIVITY,
                            _ => RANGE_SELECTIVITY,
                        };
                    }
                }
                Token::Between if self.clause == Clause::Where => {
                    self.selectivity *= BETWEEN_SELECTIVITY;
                }
                Token::In if self.clause == Clause::Where => {
                    if next == Some(&Token::LParen) && self.peek(i + 2) != Some(&Token::Select) {
                        let values = tokens[i + 2..]
                            .iter()
                            .take_while(|t| t.token != Token::RParen)
                            .filter(|t| t.token.is_literal())
                            .count();
                        self.selectivity *= (values as f64 * IN_VALUE_SELECTIVITY).min(1.0);
                    }
                }
                Token::Is if self.clause == Clause::Where => match next {
                    Some(Token::Not) if self.peek(i + 2) == Some(&Token::Null) => {
                        self.selectivity *= IS_NOT_NULL_SELECTIVITY;
                    }
                    Some(Token::Null) => self.selectivity *= IS_NULL_SELECTIVITY,
                    _ => {}
                },
                _ => {}
            }
        }
    }

    /// Record tables in a FROM list. A comma-separated list is a cartesian join.
    fn scan_from_list(&mut self, start: usize) {
        let mut j = start;
        loop {
            match self.peek(j) {
                Some(Token::Ident(name)) => {
                    self.tables.push(name.clone());
                    j += 1;
                }
                // Derived table or end of input.
                _ => return,
            }
            if self.peek(j) == Some(&Token::As) {
                j += 1;
            }
            if matches!(self.peek(j), Some(Token::Ident(_))) {
                j += 1;
            }
            if self.peek(j) != Some(&Token::Comma) {
                return;
            }
            self.cartesian_join = true;
            j += 1;
        }
    }

    /// Whether the join starting at `start` has an ON/USING before its clause ends.
    fn has_join_condition(&self, start: usize) -> bool {
        let mut depth = 0u32;
        for spanned in self.tokens.iter().skip(start) {
            match &spanned.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                Token::On | Token::Using if depth == 0 => return true,
                Token::Join
                | Token::Where
                | Token::Group
                | Token::Order
                | Token::Having
                | Token::Limit
                | Token::Union
                    if depth == 0 =>
                {
                    return false
                }
                _ => {}
            }
        }
        false
    }

    fn record_call(&mut self, name: &str) {
        let upper = name.to_ascii_uppercase();
        if AGGREGATE_FUNCTIONS.contains(&upper.as_str()) {
            self.num_aggregates += 1;
        } else if !BUILTIN_FUNCTIONS.contains(&upper.as_str()) {
            self.udf_usage = true;
        }
    }

    fn into_metadata(self, sizes: &dyn TableSizes) -> Metadata {
        let table_rows: Vec<u64> = self
            .tables
            .iter()
            .map(|t| sizes.estimated_rows(t))
            .collect();
        let size_max = table_rows.iter().copied().max().unwrap_or(0);

        let base = if self.cartesian_join {
            table_rows.iter().fold(1u64, |acc, rows| acc.saturating_mul(*rows))
        } else {
            size_max
        };

        let mut rows = base as f64 * self.selectivity;
        if self.has_groupby {
            rows *= GROUP_BY_REDUCTION;
        }
        if self.has_having {
            rows *= HAVING_REDUCTION;
        }
        let pre_limit = rows.round() as u64;

        let output_rows = self
            .limits
            .iter()
            .copied()
            .min()
            .map_or(pre_limit, |limit| pre_limit.min(limit));

        let sort_cost = if (self.has_order || self.has_groupby) && pre_limit > 1 {
            let n = pre_limit as f64;
            (n * n.log2()).round() as u64
        } else {
            0
        };

        Metadata {
            estimated_table_size_max: size_max,
            num_joins: self.num_joins,
            num_subqueries: self.num_subqueries,
            subquery_depth: self.subquery_depth,
            num_aggregates: self.num_aggregates,
            has_groupby: self.has_groupby,
            select_star: self.select_star,
            window_functions: self.window_functions,
            has_limit: !self.limits.is_empty(),
            udf_usage: self.udf_usage,
            s3_scan: self.s3_scan,
            cartesian_join: self.cartesian_join,
            estimated_output_rows: output_rows,
            estimated_sort_cost: sort_cost,
        }
    }
}

fn is_s3_wildcard(literal: &str) -> bool {
    literal.to_ascii_lowercase().starts_with("s3://") && literal.contains(['*', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(table: &str) -> u64 {
        match table {
            "users" => 50_000,
            "orders" => 2_000_000,
            "payments" => 800_000,
            _ => 1000,
        }
    }

    fn extract(sql: &str) -> Metadata {
        extract_metadata(sql, &sizes).unwrap()
    }

    #[test]
    fn test_single_table_with_limit() {
        let meta = extract("SELECT t0.id, t0.name FROM users t0 WHERE t0.id = 5 LIMIT 10");
        assert_eq!(meta.estimated_table_size_max, 50_000);
        assert_eq!(meta.num_joins, 0);
        assert_eq!(meta.num_subqueries, 0);
        assert_eq!(meta.subquery_depth, 0);
        assert!(meta.has_limit);
        assert!(!meta.select_star);
        assert!(!meta.cartesian_join);
        assert_eq!(meta.estimated_output_rows, 10);
        assert_eq!(meta.estimated_sort_cost, 0);
    }

    #[test]
    fn test_star_join_with_grouping() {
        let meta = extract(
            "SELECT t0.user_id, COUNT(t1.amount) FROM users t0 \
             INNER JOIN orders t1 ON t0.user_id = t1.user_id \
             LEFT JOIN payments t2 ON t0.user_id = t2.user_id \
             GROUP BY t0.user_id HAVING COUNT(1) > 10",
        );
        assert_eq!(meta.num_joins, 2);
        assert_eq!(meta.num_aggregates, 2);
        assert!(meta.has_groupby);
        assert!(!meta.has_limit);
        assert!(!meta.cartesian_join);
        assert_eq!(meta.estimated_table_size_max, 2_000_000);
        // 2_000_000 * 0.1 (group by) * 0.5 (having)
        assert_eq!(meta.estimated_output_rows, 100_000);
        assert_eq!(meta.estimated_sort_cost, 1_660_964);
    }

    #[test]
    fn test_wrapped_subquery() {
        let meta = extract(
            "SELECT * FROM (SELECT t0.id FROM users t0 LIMIT 50) sub WHERE sub.id IS NOT NULL",
        );
        assert!(meta.select_star);
        assert_eq!(meta.num_subqueries, 1);
        assert_eq!(meta.subquery_depth, 1);
        assert_eq!(meta.estimated_table_size_max, 50_000);
        assert_eq!(meta.estimated_output_rows, 50);
    }

    #[test]
    fn test_nested_subquery_depth() {
        let meta = extract(
            "SELECT * FROM (SELECT * FROM (SELECT t0.id FROM users t0) a) b",
        );
        assert_eq!(meta.num_subqueries, 2);
        assert_eq!(meta.subquery_depth, 2);
    }

    #[test]
    fn test_comma_join_is_cartesian() {
        let meta = extract("SELECT a.id FROM users a, orders b");
        assert!(meta.cartesian_join);
        assert_eq!(meta.estimated_output_rows, 50_000 * 2_000_000);
    }

    #[test]
    fn test_join_without_condition_is_cartesian() {
        assert!(extract("SELECT t0.id FROM users t0 CROSS JOIN orders t1").cartesian_join);
        assert!(extract("SELECT t0.id FROM users t0 JOIN orders t1 WHERE t0.id = 1").cartesian_join);
        assert!(!extract("SELECT t0.id FROM users t0 JOIN orders t1 USING (id)").cartesian_join);
    }

    #[test]
    fn test_in_list_selectivity() {
        let meta = extract("SELECT t0.id FROM users t0 WHERE t0.id IN (1, 2, 3)");
        assert_eq!(meta.estimated_output_rows, 15_000);
    }

    #[test]
    fn test_window_function_is_not_udf() {
        let meta =
            extract("SELECT ROW_NUMBER() OVER (PARTITION BY t0.id ORDER BY t0.id) FROM users t0");
        assert!(meta.window_functions);
        assert!(!meta.udf_usage);
        assert_eq!(meta.num_aggregates, 0);
    }

    #[test]
    fn test_udf_usage() {
        let meta = extract("SELECT my_score(t0.id) FROM users t0");
        assert!(meta.udf_usage);
    }

    #[test]
    fn test_s3_wildcard_scan() {
        let meta = extract("SELECT t0.id FROM logs t0 WHERE t0.path LIKE 's3://bucket/*/2021'");
        assert!(meta.s3_scan);
        let meta = extract("SELECT t0.id FROM logs t0 WHERE t0.path = 's3://bucket/2021'");
        assert!(!meta.s3_scan);
    }

    #[test]
    fn test_unknown_table_uses_lookup_default() {
        let meta = extract("SELECT t0.id FROM mystery t0");
        assert_eq!(meta.estimated_table_size_max, 1000);
        assert_eq!(meta.estimated_output_rows, 1000);
    }

    #[test]
    fn test_not_select() {
        let err = extract_metadata("DELETE FROM users", &sizes).unwrap_err();
        assert!(matches!(err, ExtractError::NotSelect { .. }));

        let err = extract_metadata("", &sizes).unwrap_err();
        assert!(matches!(err, ExtractError::NotSelect { .. }));
    }

    #[test]
    fn test_lex_error_propagates() {
        let err = extract_metadata("SELECT t0.id FROM users t0 WHERE t0.id = $1", &sizes).unwrap_err();
        assert!(matches!(err, ExtractError::UnexpectedInput { .. }));
    }
}
