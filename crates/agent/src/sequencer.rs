//! Question sequencing
//!
//! A strictly ordered, single linear path over the qualification fields:
//! budget, authority, need, timeline, then the three contact fields. The
//! next question is recomputed from the fact record every turn instead of
//! tracking a persisted cursor, so out-of-order fills and process restarts
//! cannot drift the machine: a field captured early is simply skipped when
//! its stage comes up.

use serde::{Deserialize, Serialize};

use leadqual_core::FactRecord;

/// Stages of the qualification flow, in asking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationStage {
    Budget,
    Authority,
    Need,
    Timeline,
    ContactName,
    ContactPhone,
    ContactEmail,
    Complete,
}

/// Question stages in fixed order; `Complete` is terminal and not listed.
const STAGE_ORDER: [QualificationStage; 7] = [
    QualificationStage::Budget,
    QualificationStage::Authority,
    QualificationStage::Need,
    QualificationStage::Timeline,
    QualificationStage::ContactName,
    QualificationStage::ContactPhone,
    QualificationStage::ContactEmail,
];

impl QualificationStage {
    /// Whether the fact backing this stage is already captured.
    fn is_satisfied(&self, facts: &FactRecord) -> bool {
        match self {
            QualificationStage::Budget => facts.budget.is_some(),
            QualificationStage::Authority => facts.authority.is_some(),
            QualificationStage::Need => facts.need.is_some(),
            QualificationStage::Timeline => facts.timeline.is_some(),
            QualificationStage::ContactName => facts.contact.full_name.is_some(),
            QualificationStage::ContactPhone => facts.contact.phone.is_some(),
            QualificationStage::ContactEmail => facts.contact.email.is_some(),
            QualificationStage::Complete => true,
        }
    }

    /// Default question copy for this stage.
    ///
    /// Wording is not contractual; callers may substitute their own copy by
    /// stage id.
    pub fn question_text(&self) -> &'static str {
        match self {
            QualificationStage::Budget => {
                "What budget range are you considering for this purchase?"
            }
            QualificationStage::Authority => {
                "Will you be making this decision on your own, or together with someone else?"
            }
            QualificationStage::Need => {
                "What's prompting your search right now?"
            }
            QualificationStage::Timeline => {
                "When are you hoping to complete the purchase?"
            }
            QualificationStage::ContactName => {
                "May I have your full name?"
            }
            QualificationStage::ContactPhone => {
                "What's the best phone number to reach you?"
            }
            QualificationStage::ContactEmail => {
                "And your email address?"
            }
            QualificationStage::Complete => "",
        }
    }
}

/// A question to relay to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub stage: QualificationStage,
    pub text: String,
}

/// Outcome of a sequencing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerOutcome {
    /// Ask this question next.
    Ask(Question),
    /// Every required field is captured; hand off to scoring.
    Complete,
}

/// Decide the next question for the current fact state.
///
/// Pure function of `facts`: scans the fixed stage order and returns the
/// first unmet stage's question, or `Complete` when none remain.
pub fn next_question(facts: &FactRecord) -> SequencerOutcome {
    for stage in STAGE_ORDER {
        if !stage.is_satisfied(facts) {
            return SequencerOutcome::Ask(Question {
                stage,
                text: stage.question_text().to_string(),
            });
        }
    }
    SequencerOutcome::Complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadqual_core::ContactInfo;
    use uuid::Uuid;

    fn record() -> FactRecord {
        FactRecord::new(Uuid::new_v4())
    }

    fn asked_stage(facts: &FactRecord) -> QualificationStage {
        match next_question(facts) {
            SequencerOutcome::Ask(question) => question.stage,
            SequencerOutcome::Complete => QualificationStage::Complete,
        }
    }

    #[test]
    fn test_empty_record_starts_with_budget() {
        assert_eq!(asked_stage(&record()), QualificationStage::Budget);
    }

    #[test]
    fn test_linear_progression() {
        let mut facts = record();

        facts.budget = Some("$2M".to_string());
        assert_eq!(asked_stage(&facts), QualificationStage::Authority);

        facts.authority = Some("sole".to_string());
        assert_eq!(asked_stage(&facts), QualificationStage::Need);

        facts.need = Some("relocation".to_string());
        assert_eq!(asked_stage(&facts), QualificationStage::Timeline);

        facts.timeline = Some("this month".to_string());
        assert_eq!(asked_stage(&facts), QualificationStage::ContactName);
    }

    #[test]
    fn test_out_of_order_fills_are_skipped() {
        let mut facts = record();
        // User volunteered timeline before budget was ever asked.
        facts.timeline = Some("this month".to_string());

        assert_eq!(asked_stage(&facts), QualificationStage::Budget);

        facts.budget = Some("$2M".to_string());
        facts.authority = Some("joint".to_string());
        // Timeline is already known, so Need is followed by ContactName.
        facts.need = Some("investment".to_string());
        assert_eq!(asked_stage(&facts), QualificationStage::ContactName);
    }

    #[test]
    fn test_contact_fields_sequence_independently() {
        let mut facts = record();
        facts.budget = Some("$2M".to_string());
        facts.authority = Some("sole".to_string());
        facts.need = Some("immediate".to_string());
        facts.timeline = Some("now".to_string());
        // Email arrived before phone; only the phone should be asked for
        // once the name is in.
        facts.contact = ContactInfo {
            full_name: Some("Dana Reyes".to_string()),
            phone: None,
            email: Some("dana@example.com".to_string()),
        };

        assert_eq!(asked_stage(&facts), QualificationStage::ContactPhone);
    }

    #[test]
    fn test_complete_when_all_fields_present() {
        let mut facts = record();
        facts.budget = Some("$2M".to_string());
        facts.authority = Some("sole".to_string());
        facts.need = Some("immediate".to_string());
        facts.timeline = Some("now".to_string());
        facts.contact = ContactInfo {
            full_name: Some("Dana Reyes".to_string()),
            phone: Some("555-0101".to_string()),
            email: Some("dana@example.com".to_string()),
        };

        assert_eq!(next_question(&facts), SequencerOutcome::Complete);
    }

    #[test]
    fn test_sequencer_is_deterministic() {
        let mut facts = record();
        facts.budget = Some("$2M".to_string());

        assert_eq!(next_question(&facts), next_question(&facts));
    }
}
