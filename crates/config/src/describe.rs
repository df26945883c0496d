//! Natural-language rubric description
//!
//! The extraction service receives this summary so its answers line up with
//! the organization's rubric vocabulary. Pure text templating over the
//! config; no scoring logic lives here.

use crate::rubric::{Criterion, CriterionPredicate, RubricConfig};

/// Render a deterministic, human-readable summary of a rubric.
pub fn rubric_description(rubric: &RubricConfig) -> String {
    let w = &rubric.weights;
    let t = &rubric.thresholds;

    let mut lines = Vec::new();
    lines.push(format!(
        "Category weights: budget {}, authority {}, need {}, timeline {}, contact {}.",
        w.budget, w.authority, w.need, w.timeline, w.contact
    ));
    lines.push(format!("Budget bands: {}.", table_summary(&rubric.budget)));
    lines.push(format!("Authority: {}.", table_summary(&rubric.authority)));
    lines.push(format!("Need: {}.", table_summary(&rubric.need)));
    lines.push(format!("Timeline: {}.", table_summary(&rubric.timeline)));
    lines.push(format!("Contact: {}.", table_summary(&rubric.contact)));
    lines.push(format!(
        "Tiers: priority at {} and above, hot at {}, warm at {}, cold below.",
        t.priority, t.hot, t.warm
    ));

    lines.join("\n")
}

fn table_summary(table: &[Criterion]) -> String {
    table
        .iter()
        .map(|criterion| format!("{} = {} pts", predicate_label(criterion), criterion.points))
        .collect::<Vec<_>>()
        .join(", ")
}

fn predicate_label(criterion: &Criterion) -> String {
    match &criterion.predicate {
        CriterionPredicate::Tag { tag } => tag.clone(),
        CriterionPredicate::Range { min, max } => match (min, max) {
            (Some(min), Some(max)) => format!("{}-{}", format_amount(*min), format_amount(*max)),
            (Some(min), None) => format!("{}+", format_amount(*min)),
            (None, Some(max)) => format!("under {}", format_amount(*max)),
            (None, None) => "any amount".to_string(),
        },
    }
}

fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        let millions = amount / 1_000_000.0;
        if millions.fract() == 0.0 {
            format!("${}M", millions as u64)
        } else {
            format!("${:.1}M", millions)
        }
    } else if amount >= 1_000.0 {
        format!("${}k", (amount / 1_000.0) as u64)
    } else {
        format!("${}", amount as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_is_deterministic() {
        let rubric = RubricConfig::default();
        assert_eq!(rubric_description(&rubric), rubric_description(&rubric));
    }

    #[test]
    fn test_description_covers_all_sections() {
        let text = rubric_description(&RubricConfig::default());
        assert!(text.contains("budget 30"));
        assert!(text.contains("under $1M = 5 pts"));
        assert!(text.contains("$20M-$50M = 25 pts"));
        assert!(text.contains("sole = 20 pts"));
        assert!(text.contains("this_month = 17 pts"));
        assert!(text.contains("full_verified = 10 pts"));
        assert!(text.contains("priority at 85"));
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(format_amount(500_000.0), "$500k");
        assert_eq!(format_amount(2_500_000.0), "$2.5M");
        assert_eq!(format_amount(20_000_000.0), "$20M");
    }
}
