//! Score and tier types produced by the scoring engine

use serde::{Deserialize, Serialize};

/// Lead tier derived from the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Highest-value lead, route immediately
    Priority,
    /// High intent, ready to act
    Hot,
    /// Interested but not yet ready
    Warm,
    /// Low intent or incomplete signal
    Cold,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Priority => "priority",
            Tier::Hot => "hot",
            Tier::Warm => "warm",
            Tier::Cold => "cold",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded for one rubric category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category name ("budget", "authority", ...)
    pub category: String,
    /// Points contributed to the total
    pub points: u8,
    /// Label of the matched criterion, if any matched
    pub matched: Option<String>,
}

/// Result of scoring a fact record against a rubric.
///
/// Derived from a `(facts, rubric)` snapshot; never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Weighted score on the 0-100 scale
    pub score: u8,
    pub tier: Tier,
    /// Per-category contributions, in rubric order
    pub breakdown: Vec<CategoryScore>,
}
