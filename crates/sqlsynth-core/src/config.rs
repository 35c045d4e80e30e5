//! Generation configuration.

use std::str::FromStr;

use crate::error::Error;

/// Default number of rows to generate.
pub const DEFAULT_ROWS: usize = 5000;

/// Default random seed.
pub const DEFAULT_SEED: u64 = 42;

/// Allowed distance of the skew ratio sum from 1.
pub const SKEW_TOLERANCE: f64 = 0.01;

/// Proportions of low, medium and high query shapes in a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSkew {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl ShapeSkew {
    /// Create a new skew.
    pub fn new(low: f64, medium: f64, high: f64) -> Self {
        Self { low, medium, high }
    }

    /// Check that every ratio is finite and non-negative and that they sum to ~1.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, ratio) in [("low", self.low), ("medium", self.medium), ("high", self.high)] {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} skew must be a non-negative number, got {}",
                    name, ratio
                )));
            }
        }

        let sum = self.low + self.medium + self.high;
        if (sum - 1.0).abs() > SKEW_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "skew ratios must sum to 1, got {}",
                sum
            )));
        }
        Ok(())
    }

    /// Split `n` rows into `[low, medium, high]` quotas.
    ///
    /// Low and medium are truncated; high takes the remainder, so the three
    /// quotas always sum to exactly `n`.
    pub fn partition(&self, n: usize) -> [usize; 3] {
        let low = ((n as f64 * self.low) as usize).min(n);
        let medium = ((n as f64 * self.medium) as usize).min(n - low);
        [low, medium, n - low - medium]
    }
}

impl Default for ShapeSkew {
    fn default() -> Self {
        Self::new(0.7, 0.2, 0.1)
    }
}

impl FromStr for ShapeSkew {
    type Err = Error;

    /// Parse `"low,medium,high"`, e.g. `"0.7,0.2,0.1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    Error::InvalidConfig(format!("invalid skew ratio '{}'", part.trim()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [low, medium, high] => Ok(Self::new(*low, *medium, *high)),
            _ => Err(Error::InvalidConfig(format!(
                "skew needs three comma-separated ratios, got {}",
                parts.len()
            ))),
        }
    }
}

/// Dataset generation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of rows to generate.
    pub rows: usize,

    /// Seed for the single random stream of a run.
    pub seed: u64,

    /// Shape proportions.
    pub skew: ShapeSkew,
}

impl GeneratorConfig {
    /// Create a new configuration for `rows` rows.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            seed: DEFAULT_SEED,
            skew: ShapeSkew::default(),
        }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the shape skew.
    pub fn with_skew(mut self, skew: ShapeSkew) -> Self {
        self.skew = skew;
        self
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), Error> {
        if self.rows == 0 {
            return Err(Error::InvalidConfig("row count must be positive".to_string()));
        }
        self.skew.validate()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.rows, DEFAULT_ROWS);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.skew, ShapeSkew::new(0.7, 0.2, 0.1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = GeneratorConfig::new(100)
            .with_seed(7)
            .with_skew(ShapeSkew::new(0.5, 0.25, 0.25));
        assert_eq!(config.rows, 100);
        assert_eq!(config.seed, 7);
        assert_eq!(config.skew.medium, 0.25);
    }

    #[test]
    fn test_zero_rows_rejected() {
        assert!(matches!(
            GeneratorConfig::new(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_skew_validation() {
        assert!(ShapeSkew::new(0.7, 0.2, 0.1).validate().is_ok());
        assert!(ShapeSkew::new(0.5, 0.5, 0.5).validate().is_err());
        assert!(ShapeSkew::new(1.2, -0.1, -0.1).validate().is_err());
        assert!(ShapeSkew::new(f64::NAN, 0.5, 0.5).validate().is_err());
    }

    #[test]
    fn test_partition_sums_to_n() {
        let skew = ShapeSkew::default();
        for n in [1, 2, 3, 7, 10, 99, 1000, 5001] {
            let counts = skew.partition(n);
            assert_eq!(counts.iter().sum::<usize>(), n, "n = {n}");
        }
        assert_eq!(skew.partition(1000), [700, 200, 100]);
        // Remainder goes to high.
        assert_eq!(skew.partition(7), [4, 1, 2]);
    }

    #[test]
    fn test_partition_with_skew_over_one() {
        let skew = ShapeSkew::new(0.705, 0.3, 0.0);
        let counts = skew.partition(1000);
        assert_eq!(counts.iter().sum::<usize>(), 1000);
        assert_eq!(counts, [705, 295, 0]);
    }

    #[test]
    fn test_parse_skew() {
        let skew: ShapeSkew = "0.6, 0.3, 0.1".parse().unwrap();
        assert_eq!(skew, ShapeSkew::new(0.6, 0.3, 0.1));
        assert!("0.6,0.4".parse::<ShapeSkew>().is_err());
        assert!("a,b,c".parse::<ShapeSkew>().is_err());
    }
}
