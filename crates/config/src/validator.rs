//! Rubric validation
//!
//! Admin-submitted rubrics pass through here before they are stored.
//! Validation rejects synchronously with every violation collected, so an
//! administrator sees the full list in one round trip; nothing is persisted
//! on failure.

use crate::rubric::{Criterion, CriterionPredicate, RubricConfig};

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config section or field the violation is about
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collected validation outcome.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError::new(field, message));
    }

    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            "rubric valid".to_string()
        } else {
            format!("{} violation(s)", self.errors.len())
        }
    }
}

/// Validate a rubric; returns it unchanged on success.
///
/// Checks, in order:
/// 1. the five category weights sum to exactly 100;
/// 2. tier thresholds are strictly descending (`priority > hot > warm`);
/// 3. every criterion table is non-empty and uses the predicate kind its
///    category expects (numeric ranges for budget, tags elsewhere).
///
/// Point values are unsigned by construction, which covers the
/// non-negativity rule. Whether a category's maximum points equal its
/// declared weight is deliberately NOT checked (see DESIGN.md).
pub fn validate(rubric: RubricConfig) -> Result<RubricConfig, Vec<ValidationError>> {
    let result = check(&rubric);
    if result.is_ok() {
        Ok(rubric)
    } else {
        tracing::warn!(violations = result.errors.len(), "Rubric rejected");
        Err(result.errors)
    }
}

/// Run all checks without consuming the rubric.
pub fn check(rubric: &RubricConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    let sum = rubric.weights.total();
    if sum != 100 {
        result.add(
            "weights",
            format!("category weights must sum to exactly 100, got {}", sum),
        );
    }

    let t = &rubric.thresholds;
    if t.priority <= t.hot {
        result.add(
            "thresholds",
            format!("priority ({}) must be greater than hot ({})", t.priority, t.hot),
        );
    }
    if t.hot <= t.warm {
        result.add(
            "thresholds",
            format!("hot ({}) must be greater than warm ({})", t.hot, t.warm),
        );
    }

    check_table(&mut result, "budget", &rubric.budget, PredicateKind::Range);
    check_table(&mut result, "authority", &rubric.authority, PredicateKind::Tag);
    check_table(&mut result, "need", &rubric.need, PredicateKind::Tag);
    check_table(&mut result, "timeline", &rubric.timeline, PredicateKind::Tag);
    check_table(&mut result, "contact", &rubric.contact, PredicateKind::Tag);

    result
}

#[derive(Clone, Copy, PartialEq)]
enum PredicateKind {
    Range,
    Tag,
}

fn check_table(
    result: &mut ValidationResult,
    category: &str,
    table: &[Criterion],
    expected: PredicateKind,
) {
    if table.is_empty() {
        result.add(category, "criterion table must not be empty");
        return;
    }

    for criterion in table {
        let actual = match criterion.predicate {
            CriterionPredicate::Range { .. } => PredicateKind::Range,
            CriterionPredicate::Tag { .. } => PredicateKind::Tag,
        };
        if actual != expected {
            let wanted = match expected {
                PredicateKind::Range => "a numeric range",
                PredicateKind::Tag => "a type tag",
            };
            result.add(
                category,
                format!("criterion '{}' must use {} predicate", criterion.label, wanted),
            );
        }

        if let CriterionPredicate::Range { min: Some(min), max: Some(max) } = criterion.predicate {
            if min >= max {
                result.add(
                    category,
                    format!("criterion '{}': min ({}) must be below max ({})", criterion.label, min, max),
                );
            }
        }
    }
}
