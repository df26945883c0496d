//! The per-conversation fact record and its merge policy
//!
//! A `FactRecord` accumulates Budget / Authority / Need / Timeline / Contact
//! facts across turns. Values are stored as the user stated them; normalized
//! views (numeric budget, category tags) are derived on demand and never
//! persisted.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::conversation::ConversationId;
use crate::tags::ContactQuality;

/// Contact details, filled incrementally; each field merges independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactInfo {
    /// All three contact fields captured.
    pub fn is_complete(&self) -> bool {
        self.full_name.is_some() && self.phone.is_some() && self.email.is_some()
    }

    /// No contact field captured yet.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.email.is_none()
    }
}

/// Facts extracted from a single conversation window.
///
/// Every field is optional: `None` means "not explicitly stated in this
/// window", never "unknown overall". The merge in [`FactRecord::merged`]
/// keeps prior values for `None` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFacts {
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub need: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl ExtractedFacts {
    /// Nothing was stated in this window.
    pub fn is_empty(&self) -> bool {
        self.budget.is_none()
            && self.authority.is_none()
            && self.need.is_none()
            && self.timeline.is_none()
            && self.contact.is_empty()
    }
}

/// Qualification state for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    pub conversation_id: ConversationId,
    pub budget: Option<String>,
    pub authority: Option<String>,
    pub need: Option<String>,
    pub timeline: Option<String>,
    pub contact: ContactInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly once, when every required field is non-null. A completed
    /// record is no longer mutated by extraction.
    pub completed_at: Option<DateTime<Utc>>,
}

impl FactRecord {
    pub fn new(conversation_id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            conversation_id,
            budget: None,
            authority: None,
            need: None,
            timeline: None,
            contact: ContactInfo::default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Merge an extraction pass into this record.
    ///
    /// For every field: the extracted value wins when present (explicit
    /// restatement), otherwise the prior value is kept. A populated field is
    /// never reset to `None`. Contact sub-fields merge independently.
    /// Completed records are returned unchanged.
    pub fn merged(&self, extracted: &ExtractedFacts) -> FactRecord {
        if self.completed_at.is_some() {
            return self.clone();
        }

        FactRecord {
            conversation_id: self.conversation_id,
            budget: extracted.budget.clone().or_else(|| self.budget.clone()),
            authority: extracted.authority.clone().or_else(|| self.authority.clone()),
            need: extracted.need.clone().or_else(|| self.need.clone()),
            timeline: extracted.timeline.clone().or_else(|| self.timeline.clone()),
            contact: ContactInfo {
                full_name: extracted
                    .contact
                    .full_name
                    .clone()
                    .or_else(|| self.contact.full_name.clone()),
                phone: extracted.contact.phone.clone().or_else(|| self.contact.phone.clone()),
                email: extracted.contact.email.clone().or_else(|| self.contact.email.clone()),
            },
            created_at: self.created_at,
            updated_at: Utc::now(),
            completed_at: self.completed_at,
        }
    }

    /// All required fields captured.
    pub fn is_complete(&self) -> bool {
        self.budget.is_some()
            && self.authority.is_some()
            && self.need.is_some()
            && self.timeline.is_some()
            && self.contact.is_complete()
    }

    /// Stamp `completed_at` once all required fields are present.
    /// Idempotent; a no-op while fields are still missing.
    pub fn mark_completed(&mut self) {
        if self.completed_at.is_none() && self.is_complete() {
            self.completed_at = Some(Utc::now());
        }
    }

    /// Names of the fields still missing, in qualification order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.budget.is_none() {
            missing.push("budget");
        }
        if self.authority.is_none() {
            missing.push("authority");
        }
        if self.need.is_none() {
            missing.push("need");
        }
        if self.timeline.is_none() {
            missing.push("timeline");
        }
        if self.contact.full_name.is_none() {
            missing.push("contact_name");
        }
        if self.contact.phone.is_none() {
            missing.push("contact_phone");
        }
        if self.contact.email.is_none() {
            missing.push("contact_email");
        }
        missing
    }

    /// Normalized numeric view of the budget text, if one can be parsed.
    pub fn budget_amount(&self) -> Option<f64> {
        self.budget.as_deref().and_then(parse_amount)
    }

    /// Contact completeness tag for rubric matching; `None` while no
    /// contact field has been captured.
    pub fn contact_quality(&self) -> Option<ContactQuality> {
        if self.contact.is_empty() {
            return None;
        }
        if self.contact.is_complete() {
            Some(ContactQuality::FullVerified)
        } else if self.contact.phone.is_some() || self.contact.email.is_some() {
            Some(ContactQuality::Partial)
        } else {
            Some(ContactQuality::NameOnly)
        }
    }

    /// Summarize known facts for prompt construction.
    pub fn to_context_string(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref budget) = self.budget {
            parts.push(format!("Budget: {}", budget));
        }
        if let Some(ref authority) = self.authority {
            parts.push(format!("Authority: {}", authority));
        }
        if let Some(ref need) = self.need {
            parts.push(format!("Need: {}", need));
        }
        if let Some(ref timeline) = self.timeline {
            parts.push(format!("Timeline: {}", timeline));
        }
        if let Some(ref name) = self.contact.full_name {
            parts.push(format!("Name: {}", name));
        }
        if let Some(ref phone) = self.contact.phone {
            parts.push(format!("Phone: {}", phone));
        }
        if let Some(ref email) = self.contact.email {
            parts.push(format!("Email: {}", email));
        }

        if parts.is_empty() {
            "No information collected yet.".to_string()
        } else {
            parts.join("\n")
        }
    }
}

// Matches "20", "2.5m", "500k", "20-25m", "1.5 million to 2 million".
// Longer suffix words come first so "m" does not clip "million".
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (\d+(?:\.\d+)?)\s*(thousand|million|billion|k|m|b)?
        (?:\s*(?:-|–|to)\s*\$?(\d+(?:\.\d+)?)\s*(thousand|million|billion|k|m|b)?)?",
    )
    .expect("amount pattern compiles")
});

fn suffix_scale(suffix: &str) -> f64 {
    match suffix.to_lowercase().as_str() {
        "k" | "thousand" => 1_000.0,
        "m" | "million" => 1_000_000.0,
        "b" | "billion" => 1_000_000_000.0,
        _ => 1.0,
    }
}

/// Parse a money amount out of free text.
///
/// Handles `$1,200,000`, `500k`, `2.5 million`, and ranges like `$20-25M`
/// (a trailing suffix distributes over both ends). A range normalizes to
/// its midpoint. Returns `None` when no number is present.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    let caps = AMOUNT_RE.captures(&cleaned)?;

    let first: f64 = caps.get(1)?.as_str().parse().ok()?;
    let first_suffix = caps.get(2).map(|m| m.as_str());
    let second: Option<f64> = caps.get(3).and_then(|m| m.as_str().parse().ok());
    let second_suffix = caps.get(4).map(|m| m.as_str());

    // "20-25M" carries one suffix for both ends.
    let low_scale = suffix_scale(first_suffix.or(second_suffix).unwrap_or(""));
    let low = first * low_scale;

    match second {
        Some(high) => {
            let high_scale = suffix_scale(second_suffix.or(first_suffix).unwrap_or(""));
            Some((low + high * high_scale) / 2.0)
        }
        None => Some(low),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record() -> FactRecord {
        FactRecord::new(Uuid::new_v4())
    }

    #[test]
    fn test_merge_fills_empty_fields() {
        let prior = record();
        let extracted = ExtractedFacts {
            budget: Some("$500k".to_string()),
            timeline: Some("this month".to_string()),
            ..Default::default()
        };

        let merged = prior.merged(&extracted);
        assert_eq!(merged.budget.as_deref(), Some("$500k"));
        assert_eq!(merged.timeline.as_deref(), Some("this month"));
        assert!(merged.authority.is_none());
    }

    #[test]
    fn test_merge_never_nulls_populated_field() {
        let mut prior = record();
        prior.budget = Some("$2M".to_string());
        prior.contact.phone = Some("555-0101".to_string());

        let merged = prior.merged(&ExtractedFacts::default());
        assert_eq!(merged.budget.as_deref(), Some("$2M"));
        assert_eq!(merged.contact.phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn test_merge_restatement_overwrites() {
        let mut prior = record();
        prior.budget = Some("$2M".to_string());

        let extracted = ExtractedFacts {
            budget: Some("$3M".to_string()),
            ..Default::default()
        };
        assert_eq!(prior.merged(&extracted).budget.as_deref(), Some("$3M"));
    }

    #[test]
    fn test_contact_subfields_merge_independently() {
        let mut prior = record();
        prior.contact.full_name = Some("Dana Reyes".to_string());

        let extracted = ExtractedFacts {
            contact: ContactInfo {
                email: Some("dana@example.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = prior.merged(&extracted);
        assert_eq!(merged.contact.full_name.as_deref(), Some("Dana Reyes"));
        assert_eq!(merged.contact.email.as_deref(), Some("dana@example.com"));
        assert!(merged.contact.phone.is_none());
    }

    #[test]
    fn test_completed_record_is_immutable() {
        let mut prior = record();
        prior.budget = Some("$1M".to_string());
        prior.authority = Some("sole".to_string());
        prior.need = Some("immediate".to_string());
        prior.timeline = Some("this month".to_string());
        prior.contact = ContactInfo {
            full_name: Some("Dana".to_string()),
            phone: Some("555-0101".to_string()),
            email: Some("dana@example.com".to_string()),
        };
        prior.mark_completed();
        assert!(prior.completed_at.is_some());

        let extracted = ExtractedFacts {
            budget: Some("$9M".to_string()),
            ..Default::default()
        };
        assert_eq!(prior.merged(&extracted).budget.as_deref(), Some("$1M"));
    }

    #[test]
    fn test_mark_completed_requires_all_fields() {
        let mut partial = record();
        partial.budget = Some("$1M".to_string());
        partial.mark_completed();
        assert!(partial.completed_at.is_none());
    }

    #[test]
    fn test_missing_fields_order() {
        let mut rec = record();
        rec.budget = Some("$1M".to_string());
        rec.contact.phone = Some("555-0101".to_string());

        assert_eq!(
            rec.missing_fields(),
            vec!["authority", "need", "timeline", "contact_name", "contact_email"]
        );
    }

    #[test]
    fn test_contact_quality_tiers() {
        let mut rec = record();
        assert_eq!(rec.contact_quality(), None);

        rec.contact.full_name = Some("Dana".to_string());
        assert_eq!(rec.contact_quality(), Some(ContactQuality::NameOnly));

        rec.contact.phone = Some("555-0101".to_string());
        assert_eq!(rec.contact_quality(), Some(ContactQuality::Partial));

        rec.contact.email = Some("dana@example.com".to_string());
        assert_eq!(rec.contact_quality(), Some(ContactQuality::FullVerified));
    }

    #[test]
    fn test_parse_amount_plain_and_suffixed() {
        assert_eq!(parse_amount("$1,200,000"), Some(1_200_000.0));
        assert_eq!(parse_amount("500k"), Some(500_000.0));
        assert_eq!(parse_amount("2.5 million"), Some(2_500_000.0));
        assert_eq!(parse_amount("flexible"), None);
    }

    #[test]
    fn test_parse_amount_ranges() {
        // Trailing suffix distributes over both ends; ranges normalize to midpoint.
        assert_eq!(parse_amount("$20-25M"), Some(22_500_000.0));
        assert_eq!(parse_amount("1.5 million to 2 million"), Some(1_750_000.0));
        assert_eq!(parse_amount("400k-600k"), Some(500_000.0));
    }

    #[test]
    fn test_context_string() {
        let mut rec = record();
        assert_eq!(rec.to_context_string(), "No information collected yet.");

        rec.budget = Some("$2M".to_string());
        rec.contact.full_name = Some("Dana Reyes".to_string());
        let context = rec.to_context_string();
        assert!(context.contains("Budget: $2M"));
        assert!(context.contains("Name: Dana Reyes"));
    }
}
