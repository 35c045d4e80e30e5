//! Column pool and select-list construction.

use rand::seq::SliceRandom;
use rand::Rng;

use sqlsynth_lang::AGGREGATE_FUNCTIONS;

use crate::error::Error;

/// Most base columns a select list draws.
const MAX_SELECT_COLUMNS: usize = 4;

/// A column qualified by the alias of its table within one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasedColumn {
    /// Positional alias, `t0`, `t1`, ...
    pub alias: String,
    pub column: String,
}

impl AliasedColumn {
    /// Create a new aliased column.
    pub fn new(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            column: column.into(),
        }
    }
}

impl std::fmt::Display for AliasedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.alias, self.column)
    }
}

/// Pick one pool entry uniformly.
pub(crate) fn pick<'p, R: Rng + ?Sized>(
    pool: &'p [AliasedColumn],
    rng: &mut R,
) -> Result<&'p AliasedColumn, Error> {
    pool.choose(rng).ok_or(Error::EmptyPool)
}

/// Build the expression list that follows `SELECT`.
///
/// Samples 1 to 4 distinct pool entries, then with probability 0.5 appends
/// one aggregate `FUNC(alias.column)` over an independent uniform draw.
pub fn make_select_list<R: Rng + ?Sized>(
    pool: &[AliasedColumn],
    rng: &mut R,
) -> Result<String, Error> {
    if pool.is_empty() {
        return Err(Error::EmptyPool);
    }

    let wanted = rng.gen_range(1..=MAX_SELECT_COLUMNS).min(pool.len());
    let mut expressions: Vec<String> = pool
        .choose_multiple(rng, wanted)
        .map(|column| column.to_string())
        .collect();

    if rng.gen_bool(0.5) {
        let target = pick(pool, rng)?;
        let function = AGGREGATE_FUNCTIONS[rng.gen_range(0..AGGREGATE_FUNCTIONS.len())];
        expressions.push(format!("{}({})", function, target));
    }

    Ok(expressions.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> Vec<AliasedColumn> {
        vec![AliasedColumn::new("t0", "id"), AliasedColumn::new("t0", "amount")]
    }

    #[test]
    fn test_display() {
        assert_eq!(AliasedColumn::new("t3", "price").to_string(), "t3.price");
    }

    #[test]
    fn test_select_list_shape() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut saw_aggregate = false;
        let mut saw_plain = false;

        for _ in 0..300 {
            let list = make_select_list(&pool(), &mut rng).unwrap();
            let parts: Vec<&str> = list.split(", ").collect();
            let (base, aggregates): (Vec<&str>, Vec<&str>) =
                parts.iter().partition(|p| !p.contains('('));

            assert!((1..=2).contains(&base.len()), "{list}");
            assert!(base.iter().all(|c| *c == "t0.id" || *c == "t0.amount"), "{list}");
            // Sampling is without replacement.
            assert!(base.len() < 2 || base[0] != base[1], "{list}");

            assert!(aggregates.len() <= 1, "{list}");
            for aggregate in &aggregates {
                let (function, rest) = aggregate.split_once('(').unwrap();
                assert!(AGGREGATE_FUNCTIONS.contains(&function), "{list}");
                assert!(rest == "t0.id)" || rest == "t0.amount)", "{list}");
            }

            saw_aggregate |= !aggregates.is_empty();
            saw_plain |= aggregates.is_empty();
        }

        assert!(saw_aggregate && saw_plain);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            make_select_list(&[], &mut rng),
            Err(Error::EmptyPool)
        ));
    }
}
