//! Weighted rubric scoring
//!
//! Pure function of `(facts, rubric)`: each category normalizes its fact to
//! a criterion value (numeric amount for budget, canonical tag elsewhere),
//! takes the first matching criterion's points, and the five contributions
//! sum into the 0-100 score. Absent or unmatched facts contribute zero
//! rather than failing.

use leadqual_config::{Criterion, FactValue, RubricConfig, TierThresholds};
use leadqual_core::{Authority, CategoryScore, FactRecord, Need, ScoreResult, Tier, Timeline};

/// Score a fact record against a rubric.
pub fn score(facts: &FactRecord, rubric: &RubricConfig) -> ScoreResult {
    let budget_amount = facts.budget_amount();
    let authority_tag = facts
        .authority
        .as_deref()
        .and_then(Authority::from_utterance)
        .map(|tag| tag.as_str());
    let need_tag = facts
        .need
        .as_deref()
        .and_then(Need::from_utterance)
        .map(|tag| tag.as_str());
    let timeline_tag = facts
        .timeline
        .as_deref()
        .and_then(Timeline::from_utterance)
        .map(|tag| tag.as_str());
    let contact_tag = facts.contact_quality().map(|tag| tag.as_str());

    let breakdown = vec![
        category_score("budget", &rubric.budget, budget_amount.map(FactValue::Amount)),
        category_score("authority", &rubric.authority, authority_tag.map(FactValue::Tag)),
        category_score("need", &rubric.need, need_tag.map(FactValue::Tag)),
        category_score("timeline", &rubric.timeline, timeline_tag.map(FactValue::Tag)),
        category_score("contact", &rubric.contact, contact_tag.map(FactValue::Tag)),
    ];

    let total: u32 = breakdown.iter().map(|c| c.points as u32).sum();
    let total = total.min(100) as u8;

    ScoreResult {
        score: total,
        tier: classify(total, &rubric.thresholds),
        breakdown,
    }
}

/// Classify a score against the tier thresholds, highest first.
pub fn classify(score: u8, thresholds: &TierThresholds) -> Tier {
    if score >= thresholds.priority {
        Tier::Priority
    } else if score >= thresholds.hot {
        Tier::Hot
    } else if score >= thresholds.warm {
        Tier::Warm
    } else {
        Tier::Cold
    }
}

fn category_score(
    category: &str,
    table: &[Criterion],
    value: Option<FactValue<'_>>,
) -> CategoryScore {
    let matched = value.and_then(|value| first_match(table, &value));

    CategoryScore {
        category: category.to_string(),
        points: matched.map(|criterion| criterion.points).unwrap_or(0),
        matched: matched.map(|criterion| criterion.label.clone()),
    }
}

/// First criterion whose predicate matches; table order is authoritative.
fn first_match<'a>(table: &'a [Criterion], value: &FactValue<'_>) -> Option<&'a Criterion> {
    table.iter().find(|criterion| criterion.predicate.matches(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadqual_core::ContactInfo;
    use uuid::Uuid;

    fn qualified_record() -> FactRecord {
        let mut facts = FactRecord::new(Uuid::new_v4());
        facts.budget = Some("$20-25M".to_string());
        facts.authority = Some("sole decision maker".to_string());
        facts.need = Some("immediate".to_string());
        facts.timeline = Some("this_month".to_string());
        facts.contact = ContactInfo {
            full_name: Some("Dana Reyes".to_string()),
            phone: Some("555-0101".to_string()),
            email: Some("dana@example.com".to_string()),
        };
        facts
    }

    #[test]
    fn test_default_rubric_boundary_example() {
        // 25 + 20 + 20 + 17 + 10 = 92, over the priority threshold of 85.
        let result = score(&qualified_record(), &RubricConfig::default());

        assert_eq!(result.score, 92);
        assert_eq!(result.tier, Tier::Priority);

        let by_category: Vec<u8> = result.breakdown.iter().map(|c| c.points).collect();
        assert_eq!(by_category, vec![25, 20, 20, 17, 10]);
    }

    #[test]
    fn test_empty_record_scores_zero_cold() {
        let facts = FactRecord::new(Uuid::new_v4());
        let result = score(&facts, &RubricConfig::default());

        assert_eq!(result.score, 0);
        assert_eq!(result.tier, Tier::Cold);
        assert!(result.breakdown.iter().all(|c| c.matched.is_none()));
    }

    #[test]
    fn test_unmatched_fact_contributes_zero() {
        let mut facts = FactRecord::new(Uuid::new_v4());
        // A budget with no parseable amount cannot match any range.
        facts.budget = Some("whatever it takes".to_string());
        facts.authority = Some("sole".to_string());

        let result = score(&facts, &RubricConfig::default());
        assert_eq!(result.breakdown[0].points, 0);
        assert_eq!(result.breakdown[1].points, 20);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn test_first_matching_criterion_wins() {
        let mut rubric = RubricConfig::default();
        // Overlapping bands: the earlier row takes precedence.
        rubric.budget.insert(
            0,
            leadqual_config::Criterion::range(None, None, 1, "catch_all"),
        );

        let mut facts = FactRecord::new(Uuid::new_v4());
        facts.budget = Some("$2M".to_string());

        let result = score(&facts, &rubric);
        assert_eq!(result.breakdown[0].points, 1);
        assert_eq!(result.breakdown[0].matched.as_deref(), Some("catch_all"));
    }

    #[test]
    fn test_tier_thresholds_inclusive() {
        let thresholds = TierThresholds { priority: 85, hot: 70, warm: 50 };
        assert_eq!(classify(85, &thresholds), Tier::Priority);
        assert_eq!(classify(84, &thresholds), Tier::Hot);
        assert_eq!(classify(70, &thresholds), Tier::Hot);
        assert_eq!(classify(69, &thresholds), Tier::Warm);
        assert_eq!(classify(50, &thresholds), Tier::Warm);
        assert_eq!(classify(49, &thresholds), Tier::Cold);
        assert_eq!(classify(0, &thresholds), Tier::Cold);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let mut rubric = RubricConfig::default();
        // Tables may overshoot their weights; the total still clamps.
        rubric.budget[4].points = 200;

        let result = score(&qualified_record(), &rubric);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_rescoring_is_idempotent() {
        let facts = qualified_record();
        let rubric = RubricConfig::default();

        assert_eq!(score(&facts, &rubric), score(&facts, &rubric));
    }

    #[test]
    fn test_partial_contact_scores_partial_band() {
        let mut facts = FactRecord::new(Uuid::new_v4());
        facts.contact.phone = Some("555-0101".to_string());

        let result = score(&facts, &RubricConfig::default());
        assert_eq!(result.breakdown[4].points, 6);
        assert_eq!(result.breakdown[4].matched.as_deref(), Some("partial_contact"));
    }
}
