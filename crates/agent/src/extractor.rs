//! Fact extraction
//!
//! Wraps the text-understanding backend: builds the extraction prompt from
//! the recent window plus the known facts, parses the structured reply, and
//! merges it into the prior record under the monotonic merge policy. Every
//! failure mode leaves the caller's record untouched; the turn simply does
//! not advance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leadqual_core::{conversation::recent_window, FactRecord, Turn};
use leadqual_llm::{extraction_messages, parse_extracted, LlmBackend, LlmError, TokenUsage};

/// Extractor tuning knobs.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// How many recent turns to resend to the understanding service.
    pub window_turns: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { window_turns: 8 }
    }
}

/// Where a fact change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// First capture of the field
    Extraction,
    /// User restated a field that already had a value
    Correction,
}

/// Record of a single field change, for audit and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactChange {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub source: ChangeSource,
    pub timestamp: DateTime<Utc>,
}

/// A successful extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractionUpdate {
    /// The merged fact record; the caller persists this.
    pub facts: FactRecord,
    /// Field-level changes this pass produced (possibly empty).
    pub changes: Vec<FactChange>,
    /// Token usage of the understanding call, for metering.
    pub usage: TokenUsage,
}

/// Turns conversation windows into fact record updates.
pub struct FactExtractor {
    backend: Arc<dyn LlmBackend>,
    config: ExtractorConfig,
}

impl FactExtractor {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(backend: Arc<dyn LlmBackend>, config: ExtractorConfig) -> Self {
        Self { backend, config }
    }

    /// Extract facts from the recent window and merge them over `prior`.
    ///
    /// `prior` is never mutated; on any error the caller keeps it as-is and
    /// the failure is recoverable (transient transport errors were already
    /// retried inside the backend, malformed output is surfaced directly).
    pub async fn extract(
        &self,
        prior: &FactRecord,
        turns: &[Turn],
        rubric_description: Option<&str>,
    ) -> Result<ExtractionUpdate, LlmError> {
        let window = recent_window(turns, self.config.window_turns);

        // Facts come from user-authored turns only; without one there is
        // nothing to extract and no reason to spend a call.
        if !window.iter().any(Turn::is_user) {
            return Ok(ExtractionUpdate {
                facts: prior.clone(),
                changes: Vec::new(),
                usage: TokenUsage::default(),
            });
        }

        let messages =
            extraction_messages(window, &prior.to_context_string(), rubric_description);
        let result = self.backend.generate(&messages).await?;
        let extracted = parse_extracted(&result.text)?;

        let merged = prior.merged(&extracted);
        let changes = diff(prior, &merged);

        for change in &changes {
            tracing::debug!(
                field = change.field,
                old_value = ?change.old_value,
                new_value = ?change.new_value,
                source = ?change.source,
                "Fact updated"
            );
        }

        Ok(ExtractionUpdate {
            facts: merged,
            changes,
            usage: result.usage,
        })
    }
}

/// Field-level diff between a prior record and its merged successor.
fn diff(prior: &FactRecord, merged: &FactRecord) -> Vec<FactChange> {
    let mut changes = Vec::new();
    let now = Utc::now();

    let fields: [(&'static str, &Option<String>, &Option<String>); 7] = [
        ("budget", &prior.budget, &merged.budget),
        ("authority", &prior.authority, &merged.authority),
        ("need", &prior.need, &merged.need),
        ("timeline", &prior.timeline, &merged.timeline),
        ("contact_name", &prior.contact.full_name, &merged.contact.full_name),
        ("contact_phone", &prior.contact.phone, &merged.contact.phone),
        ("contact_email", &prior.contact.email, &merged.contact.email),
    ];

    for (field, old_value, new_value) in fields {
        if old_value != new_value {
            changes.push(FactChange {
                field: field.to_string(),
                old_value: old_value.clone(),
                new_value: new_value.clone(),
                source: if old_value.is_some() {
                    ChangeSource::Correction
                } else {
                    ChangeSource::Extraction
                },
                timestamp: now,
            });
        }
    }

    changes
}
