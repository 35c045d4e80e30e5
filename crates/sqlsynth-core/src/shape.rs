//! Query shapes: generation-time difficulty tiers.

use rand::Rng;

use crate::sampler::Bias;

/// Difficulty tier of a generated query.
///
/// A shape controls how many tables a query draws and which sampling bias
/// it uses. It is independent of the complexity label, which is derived
/// from the extracted metadata alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    Low,
    Medium,
    High,
}

impl QueryShape {
    /// All shapes, in dataset generation order.
    pub const ALL: [QueryShape; 3] = [QueryShape::Low, QueryShape::Medium, QueryShape::High];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryShape::Low => "low",
            QueryShape::Medium => "medium",
            QueryShape::High => "high",
        }
    }

    /// Table sampling bias for this shape.
    pub fn bias(&self) -> Bias {
        match self {
            QueryShape::Low => Bias::Dim,
            QueryShape::Medium => Bias::Mixed,
            QueryShape::High => Bias::Fact,
        }
    }

    /// Draw the number of tables for one query.
    ///
    /// Low: 1 (p = 0.8) or 2. Medium: uniform in 1..=3. High: uniform in 2..=5.
    pub fn draw_table_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            QueryShape::Low => {
                if rng.gen_bool(0.8) {
                    1
                } else {
                    2
                }
            }
            QueryShape::Medium => rng.gen_range(1..=3),
            QueryShape::High => rng.gen_range(2..=5),
        }
    }
}

impl std::fmt::Display for QueryShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
