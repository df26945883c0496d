//! Organization membership directory
//!
//! Supplies the assignment balancer with the member pool and each member's
//! current load. Load is the count of conversations assigned to the member
//! in human mode and still active; AI-handled and closed conversations do
//! not count.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use leadqual_core::{ConversationId, OrgMember};

use crate::error::PersistenceError;

/// Who is handling an assigned conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    Human,
    Ai,
}

/// Lifecycle of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Closed,
}

/// A member together with its point-in-time load.
#[derive(Debug, Clone)]
pub struct MemberLoad {
    pub member: OrgMember,
    pub active_conversations: u32,
}

/// Directory of organization members and their conversation loads.
///
/// The load read here and the later `record_assignment` are deliberately
/// not coupled in a transaction; concurrent assignments may observe the
/// same snapshot (see the balancer's docs).
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// All members of the organization with current loads.
    async fn member_loads(&self, org_id: &str) -> Result<Vec<MemberLoad>, PersistenceError>;

    /// Record a new active human-mode assignment.
    async fn record_assignment(
        &self,
        org_id: &str,
        member_id: &str,
        conversation_id: ConversationId,
    ) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone)]
struct AssignmentRow {
    org_id: String,
    member_id: String,
    conversation_id: ConversationId,
    mode: AssignmentMode,
    status: AssignmentStatus,
}

#[derive(Default)]
struct DirectoryState {
    members: Vec<OrgMember>,
    assignments: Vec<AssignmentRow>,
}

/// In-memory directory for tests and local development.
#[derive(Default)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&self, member: OrgMember) {
        self.state.write().members.push(member);
    }

    /// Seed an assignment row directly, for shaping load in tests.
    pub fn seed_assignment(
        &self,
        org_id: &str,
        member_id: &str,
        mode: AssignmentMode,
        status: AssignmentStatus,
    ) {
        self.state.write().assignments.push(AssignmentRow {
            org_id: org_id.to_string(),
            member_id: member_id.to_string(),
            conversation_id: uuid::Uuid::new_v4(),
            mode,
            status,
        });
    }

    /// Close every active assignment for a conversation.
    pub fn close_conversation(&self, conversation_id: ConversationId) {
        let mut state = self.state.write();
        for row in state
            .assignments
            .iter_mut()
            .filter(|row| row.conversation_id == conversation_id)
        {
            row.status = AssignmentStatus::Closed;
        }
    }
}

#[async_trait]
impl MembershipDirectory for InMemoryDirectory {
    async fn member_loads(&self, org_id: &str) -> Result<Vec<MemberLoad>, PersistenceError> {
        let state = self.state.read();

        let loads = state
            .members
            .iter()
            .filter(|member| member.org_id == org_id)
            .map(|member| {
                let active = state
                    .assignments
                    .iter()
                    .filter(|row| {
                        row.org_id == org_id
                            && row.member_id == member.id
                            && row.mode == AssignmentMode::Human
                            && row.status == AssignmentStatus::Active
                    })
                    .count() as u32;
                MemberLoad {
                    member: member.clone(),
                    active_conversations: active,
                }
            })
            .collect();

        Ok(loads)
    }

    async fn record_assignment(
        &self,
        org_id: &str,
        member_id: &str,
        conversation_id: ConversationId,
    ) -> Result<(), PersistenceError> {
        let known = self
            .state
            .read()
            .members
            .iter()
            .any(|m| m.org_id == org_id && m.id == member_id);
        if !known {
            return Err(PersistenceError::NotFound(format!(
                "member {} in org {}",
                member_id, org_id
            )));
        }

        self.state.write().assignments.push(AssignmentRow {
            org_id: org_id.to_string(),
            member_id: member_id.to_string(),
            conversation_id,
            mode: AssignmentMode::Human,
            status: AssignmentStatus::Active,
        });
        tracing::debug!(org_id, member_id, %conversation_id, "Assignment recorded");
        Ok(())
    }
}
