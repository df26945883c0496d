//! Rubric configuration model
//!
//! Point tables follow the repository convention that the highest-point
//! entry in a category approximates that category's weight; this is a
//! convention, not a validated invariant (see `validator`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a rubric from YAML.
#[derive(Error, Debug)]
pub enum RubricConfigError {
    #[error("Rubric file not found: {0} ({1})")]
    FileNotFound(String, String),

    #[error("Rubric parse error: {0}")]
    ParseError(String),
}

/// Category weights on the 0-100 scale; must sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub budget: u8,
    pub authority: u8,
    pub need: u8,
    pub timeline: u8,
    pub contact: u8,
}

impl CategoryWeights {
    /// Sum of all five weights.
    pub fn total(&self) -> u32 {
        self.budget as u32
            + self.authority as u32
            + self.need as u32
            + self.timeline as u32
            + self.contact as u32
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            budget: 30,
            authority: 20,
            need: 20,
            timeline: 20,
            contact: 10,
        }
    }
}

/// A normalized fact value presented to a criterion predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactValue<'a> {
    /// Numeric amount (budget)
    Amount(f64),
    /// Canonical category tag (authority, need, timeline, contact)
    Tag(&'a str),
}

/// Predicate half of a criterion: either a numeric range or a type tag.
///
/// `Tag` is tried first during deserialization, so `{ tag: sole, ... }`
/// never falls through to an unbounded range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionPredicate {
    Tag {
        tag: String,
    },
    /// Half-open range `[min, max)`; either bound may be absent.
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl CriterionPredicate {
    /// Whether this predicate matches the given fact value.
    pub fn matches(&self, value: &FactValue<'_>) -> bool {
        match (self, value) {
            (CriterionPredicate::Range { min, max }, FactValue::Amount(amount)) => {
                min.map_or(true, |m| *amount >= m) && max.map_or(true, |m| *amount < m)
            }
            (CriterionPredicate::Tag { tag }, FactValue::Tag(value_tag)) => tag == value_tag,
            _ => false,
        }
    }
}

/// One row of a category's criterion table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(flatten)]
    pub predicate: CriterionPredicate,
    pub points: u8,
    pub label: String,
}

impl Criterion {
    pub fn range(min: Option<f64>, max: Option<f64>, points: u8, label: &str) -> Self {
        Self {
            predicate: CriterionPredicate::Range { min, max },
            points,
            label: label.to_string(),
        }
    }

    pub fn tag(tag: &str, points: u8, label: &str) -> Self {
        Self {
            predicate: CriterionPredicate::Tag { tag: tag.to_string() },
            points,
            label: label.to_string(),
        }
    }
}

/// Tier thresholds on the 0-100 scale; must be strictly descending.
/// Scores at or below `warm` classify as cold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub priority: u8,
    pub hot: u8,
    pub warm: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            priority: 85,
            hot: 70,
            warm: 50,
        }
    }
}

/// An organization's scoring rubric.
///
/// `RubricConfig::default()` is the documented system rubric applied when an
/// organization has not configured its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricConfig {
    pub weights: CategoryWeights,
    /// Budget bands, first matching range wins
    pub budget: Vec<Criterion>,
    pub authority: Vec<Criterion>,
    pub need: Vec<Criterion>,
    pub timeline: Vec<Criterion>,
    pub contact: Vec<Criterion>,
    pub thresholds: TierThresholds,
}

impl Default for RubricConfig {
    fn default() -> Self {
        const M: f64 = 1_000_000.0;
        Self {
            weights: CategoryWeights::default(),
            budget: vec![
                Criterion::range(None, Some(M), 5, "under_1m"),
                Criterion::range(Some(M), Some(5.0 * M), 10, "1m_to_5m"),
                Criterion::range(Some(5.0 * M), Some(10.0 * M), 15, "5m_to_10m"),
                Criterion::range(Some(10.0 * M), Some(20.0 * M), 20, "10m_to_20m"),
                Criterion::range(Some(20.0 * M), Some(50.0 * M), 25, "20m_to_50m"),
                Criterion::range(Some(50.0 * M), None, 30, "50m_plus"),
            ],
            authority: vec![
                Criterion::tag("sole", 20, "sole_decision_maker"),
                Criterion::tag("joint", 14, "joint_decision"),
                Criterion::tag("group", 8, "group_decision"),
            ],
            need: vec![
                Criterion::tag("immediate", 20, "immediate_need"),
                Criterion::tag("relocation", 15, "relocation"),
                Criterion::tag("investment", 12, "investment"),
                Criterion::tag("exploring", 5, "exploring"),
            ],
            timeline: vec![
                Criterion::tag("immediate", 20, "ready_now"),
                Criterion::tag("this_month", 17, "this_month"),
                Criterion::tag("this_quarter", 12, "this_quarter"),
                Criterion::tag("this_year", 8, "this_year"),
                Criterion::tag("browsing", 3, "browsing"),
            ],
            contact: vec![
                Criterion::tag("full_verified", 10, "full_contact"),
                Criterion::tag("partial", 6, "partial_contact"),
                Criterion::tag("name_only", 3, "name_only"),
            ],
            thresholds: TierThresholds::default(),
        }
    }
}

impl RubricConfig {
    /// Load a rubric from a YAML file. The result is unvalidated; run it
    /// through [`crate::validator::validate`] before storing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RubricConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RubricConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;
        serde_yaml::from_str(&content).map_err(|e| RubricConfigError::ParseError(e.to_string()))
    }

    /// Criterion table for a named category.
    pub fn table(&self, category: &str) -> Option<&[Criterion]> {
        match category {
            "budget" => Some(&self.budget),
            "authority" => Some(&self.authority),
            "need" => Some(&self.need),
            "timeline" => Some(&self.timeline),
            "contact" => Some(&self.contact),
            _ => None,
        }
    }

    /// Weight for a named category.
    pub fn weight(&self, category: &str) -> Option<u8> {
        match category {
            "budget" => Some(self.weights.budget),
            "authority" => Some(self.weights.authority),
            "need" => Some(self.weights.need),
            "timeline" => Some(self.weights.timeline),
            "contact" => Some(self.weights.contact),
            _ => None,
        }
    }

    /// Natural-language summary of the rubric for the extraction prompt.
    /// Deterministic templating; regenerate after any change.
    pub fn description(&self) -> String {
        crate::describe::rubric_description(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        assert_eq!(CategoryWeights::default().total(), 100);
    }

    #[test]
    fn test_range_predicate_half_open() {
        let band = CriterionPredicate::Range {
            min: Some(1_000_000.0),
            max: Some(5_000_000.0),
        };
        assert!(band.matches(&FactValue::Amount(1_000_000.0)));
        assert!(band.matches(&FactValue::Amount(4_999_999.0)));
        assert!(!band.matches(&FactValue::Amount(5_000_000.0)));
        assert!(!band.matches(&FactValue::Amount(999_999.0)));
    }

    #[test]
    fn test_unbounded_ranges() {
        let open_top = CriterionPredicate::Range {
            min: Some(50_000_000.0),
            max: None,
        };
        assert!(open_top.matches(&FactValue::Amount(1e12)));

        let open_bottom = CriterionPredicate::Range {
            min: None,
            max: Some(1_000_000.0),
        };
        assert!(open_bottom.matches(&FactValue::Amount(0.0)));
    }

    #[test]
    fn test_tag_predicate_exact_match() {
        let sole = CriterionPredicate::Tag { tag: "sole".to_string() };
        assert!(sole.matches(&FactValue::Tag("sole")));
        assert!(!sole.matches(&FactValue::Tag("joint")));
        // Type mismatch never matches.
        assert!(!sole.matches(&FactValue::Amount(1.0)));
    }

    #[test]
    fn test_yaml_roundtrip_predicates() {
        let yaml = r#"
weights: { budget: 30, authority: 20, need: 20, timeline: 20, contact: 10 }
budget:
  - { max: 1000000, points: 5, label: under_1m }
  - { min: 1000000, points: 30, label: 1m_plus }
authority:
  - { tag: sole, points: 20, label: sole }
need:
  - { tag: immediate, points: 20, label: immediate }
timeline:
  - { tag: immediate, points: 20, label: now }
contact:
  - { tag: full_verified, points: 10, label: full }
thresholds: { priority: 85, hot: 70, warm: 50 }
"#;
        let rubric: RubricConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            rubric.authority[0].predicate,
            CriterionPredicate::Tag { tag: "sole".to_string() }
        );
        assert_eq!(
            rubric.budget[0].predicate,
            CriterionPredicate::Range { min: None, max: Some(1_000_000.0) }
        );
    }

    #[test]
    fn test_category_lookup() {
        let rubric = RubricConfig::default();
        assert_eq!(rubric.weight("budget"), Some(30));
        assert_eq!(rubric.weight("unknown"), None);
        assert_eq!(rubric.table("timeline").map(|t| t.len()), Some(5));
    }
}
