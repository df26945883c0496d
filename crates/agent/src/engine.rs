//! Per-turn orchestration
//!
//! One inbound user turn flows extract → persist → sequence, and on
//! completion score → assign. The engine owns no cross-conversation mutable
//! state; callers serialize turns per conversation id and may run distinct
//! conversations in parallel.

use std::sync::Arc;

use thiserror::Error;

use leadqual_config::{validate, RubricConfig, ValidationError};
use leadqual_core::{ConversationId, Error, FactRecord, ScoreResult, Turn};
use leadqual_llm::{LlmBackend, TokenUsage};
use leadqual_persistence::{FactStore, MembershipDirectory, PersistenceError, RubricStore};

use crate::assignment::AssignmentBalancer;
use crate::extractor::{ExtractorConfig, FactChange, FactExtractor};
use crate::scoring;
use crate::sequencer::{next_question, Question, SequencerOutcome};

/// Identifies whose conversation a turn belongs to.
#[derive(Debug, Clone)]
pub struct LeadContext {
    pub conversation_id: ConversationId,
    pub org_id: String,
    /// The organization's configured agent profile; rubric lookup key.
    pub agent_id: String,
}

/// What the transport should do after a turn.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Relay this question to the user.
    Ask(Question),
    /// Qualification is complete; the lead was scored and (when an eligible
    /// agent exists) assigned.
    Qualified {
        score: ScoreResult,
        assigned: Option<String>,
    },
}

/// Outcome of processing one turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub outcome: TurnOutcome,
    /// False when extraction failed recoverably this turn; the fact record
    /// did not advance and the caller should surface a retry-safe reply.
    pub extraction_advanced: bool,
    /// Field-level changes this turn produced.
    pub changes: Vec<FactChange>,
    /// Understanding-service usage for external metering.
    pub usage: TokenUsage,
}

/// Errors from the admin rubric-configuration path.
#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error("Rubric rejected with {} violation(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Store(#[from] PersistenceError),
}

/// The qualification engine.
pub struct QualificationEngine {
    extractor: FactExtractor,
    facts: Arc<dyn FactStore>,
    rubrics: Arc<dyn RubricStore>,
    directory: Arc<dyn MembershipDirectory>,
    balancer: AssignmentBalancer,
}

impl QualificationEngine {
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        facts: Arc<dyn FactStore>,
        rubrics: Arc<dyn RubricStore>,
        directory: Arc<dyn MembershipDirectory>,
    ) -> Self {
        Self {
            extractor: FactExtractor::new(backend),
            facts,
            rubrics,
            balancer: AssignmentBalancer::new(directory.clone()),
            directory,
        }
    }

    /// Override the extractor window bound.
    pub fn with_extractor_config(
        backend: Arc<dyn LlmBackend>,
        config: ExtractorConfig,
        facts: Arc<dyn FactStore>,
        rubrics: Arc<dyn RubricStore>,
        directory: Arc<dyn MembershipDirectory>,
    ) -> Self {
        Self {
            extractor: FactExtractor::with_config(backend, config),
            facts,
            rubrics,
            balancer: AssignmentBalancer::new(directory.clone()),
            directory,
        }
    }

    /// Process one inbound user turn.
    ///
    /// `turns` is the conversation history including the new turn; only the
    /// recent window is sent to the understanding service. Extraction
    /// failures degrade to an unchanged record rather than an error.
    pub async fn handle_turn(
        &self,
        ctx: &LeadContext,
        turns: &[Turn],
    ) -> Result<TurnResult, Error> {
        let prior = self
            .facts
            .get(ctx.conversation_id)
            .await?
            .unwrap_or_else(|| FactRecord::new(ctx.conversation_id));

        let rubric = self.resolve_rubric(ctx).await?;

        // A completed conversation takes no further questions and is not
        // re-assigned; scoring is pure, so the tier is simply recomputed.
        if prior.completed_at.is_some() {
            return Ok(TurnResult {
                outcome: TurnOutcome::Qualified {
                    score: scoring::score(&prior, &rubric),
                    assigned: None,
                },
                extraction_advanced: false,
                changes: Vec::new(),
                usage: TokenUsage::default(),
            });
        }

        let description = rubric.description();
        let (mut facts, extraction_advanced, changes, usage) = match self
            .extractor
            .extract(&prior, turns, Some(&description))
            .await
        {
            Ok(update) => (update.facts, true, update.changes, update.usage),
            Err(e) => {
                tracing::warn!(
                    conversation_id = %ctx.conversation_id,
                    error = %e,
                    "Extraction did not advance this turn"
                );
                (prior.clone(), false, Vec::new(), TokenUsage::default())
            }
        };

        match next_question(&facts) {
            SequencerOutcome::Ask(question) => {
                self.facts.put(facts).await?;
                Ok(TurnResult {
                    outcome: TurnOutcome::Ask(question),
                    extraction_advanced,
                    changes,
                    usage,
                })
            }
            SequencerOutcome::Complete => {
                facts.mark_completed();
                self.facts.put(facts.clone()).await?;

                let score = scoring::score(&facts, &rubric);
                tracing::info!(
                    conversation_id = %ctx.conversation_id,
                    score = score.score,
                    tier = %score.tier,
                    "Lead qualified"
                );

                let assigned = self.balancer.assign(&ctx.org_id).await?;
                if let Some(ref member) = assigned {
                    self.directory
                        .record_assignment(&ctx.org_id, &member.id, ctx.conversation_id)
                        .await?;
                }

                Ok(TurnResult {
                    outcome: TurnOutcome::Qualified {
                        score,
                        assigned: assigned.map(|member| member.id),
                    },
                    extraction_advanced,
                    changes,
                    usage,
                })
            }
        }
    }

    /// Validate and store an organization's rubric, returning the derived
    /// rubric description. Nothing is persisted on a validation failure.
    pub async fn configure_rubric(
        &self,
        org_id: &str,
        agent_id: &str,
        input: RubricConfig,
    ) -> Result<String, ConfigureError> {
        let rubric = validate(input).map_err(ConfigureError::Validation)?;
        let description = rubric.description();
        self.rubrics.put(org_id, agent_id, rubric).await?;
        Ok(description)
    }

    async fn resolve_rubric(&self, ctx: &LeadContext) -> Result<RubricConfig, Error> {
        let rubric = self
            .rubrics
            .get(&ctx.org_id, &ctx.agent_id)
            .await?
            .unwrap_or_default();
        Ok(rubric)
    }
}
