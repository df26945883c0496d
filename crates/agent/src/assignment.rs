//! Lead assignment
//!
//! Picks the human agent to receive a qualified lead: filter the
//! organization's members to the human-agent role, then take the member
//! with the strictly lowest active load. Ties break on earliest membership
//! timestamp, then member id, so repeated runs over the same snapshot pick
//! the same agent.
//!
//! The load read and the eventual assignment write are not held under a
//! lock; two concurrent assignments for one organization may observe the
//! same snapshot and pick the same agent. That imprecision is accepted in
//! exchange for availability.

use std::sync::Arc;

use leadqual_core::OrgMember;
use leadqual_persistence::{MembershipDirectory, PersistenceError};

/// Least-load balancer over the membership directory.
pub struct AssignmentBalancer {
    directory: Arc<dyn MembershipDirectory>,
}

impl AssignmentBalancer {
    pub fn new(directory: Arc<dyn MembershipDirectory>) -> Self {
        Self { directory }
    }

    /// Pick the least-loaded eligible agent, or `None` when the
    /// organization has no human agents configured. An empty pool is an
    /// expected outcome, not an error.
    pub async fn assign(&self, org_id: &str) -> Result<Option<OrgMember>, PersistenceError> {
        let loads = self.directory.member_loads(org_id).await?;

        let picked = loads
            .into_iter()
            .filter(|load| load.member.role.is_human_agent())
            .min_by(|a, b| {
                a.active_conversations
                    .cmp(&b.active_conversations)
                    .then_with(|| a.member.joined_at.cmp(&b.member.joined_at))
                    .then_with(|| a.member.id.cmp(&b.member.id))
            });

        match &picked {
            Some(load) => tracing::debug!(
                org_id,
                member_id = %load.member.id,
                load = load.active_conversations,
                "Lead assigned"
            ),
            None => tracing::warn!(org_id, "No eligible human agent for assignment"),
        }

        Ok(picked.map(|load| load.member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use leadqual_core::MemberRole;
    use leadqual_persistence::{AssignmentMode, AssignmentStatus, InMemoryDirectory};
    use uuid::Uuid;

    fn member(id: &str, role: MemberRole, joined_days_ago: i64) -> OrgMember {
        OrgMember {
            id: id.to_string(),
            org_id: "org-1".to_string(),
            role,
            joined_at: Utc::now() - Duration::days(joined_days_ago),
        }
    }

    fn seed_active(directory: &InMemoryDirectory, member_id: &str, count: usize) {
        for _ in 0..count {
            directory.seed_assignment(
                "org-1",
                member_id,
                AssignmentMode::Human,
                AssignmentStatus::Active,
            );
        }
    }

    #[tokio::test]
    async fn test_picks_least_loaded() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_member(member("agent-a", MemberRole::HumanAgent, 30));
        directory.add_member(member("agent-b", MemberRole::HumanAgent, 10));
        seed_active(&directory, "agent-a", 2);

        let balancer = AssignmentBalancer::new(directory);
        let picked = balancer.assign("org-1").await.unwrap().unwrap();
        assert_eq!(picked.id, "agent-b");
    }

    #[tokio::test]
    async fn test_tie_breaks_on_earliest_join() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_member(member("agent-new", MemberRole::HumanAgent, 5));
        directory.add_member(member("agent-old", MemberRole::HumanAgent, 100));

        let balancer = AssignmentBalancer::new(directory);
        let picked = balancer.assign("org-1").await.unwrap().unwrap();
        assert_eq!(picked.id, "agent-old");
    }

    #[tokio::test]
    async fn test_excludes_non_human_roles() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_member(member("the-admin", MemberRole::Admin, 400));
        directory.add_member(member("the-mod", MemberRole::Moderator, 300));
        directory.add_member(member("the-bot", MemberRole::AiAgent, 200));
        directory.add_member(member("agent-a", MemberRole::HumanAgent, 1));
        // Even with the only human agent heavily loaded, the others are
        // never considered.
        seed_active(&directory, "agent-a", 50);

        let balancer = AssignmentBalancer::new(directory);
        let picked = balancer.assign("org-1").await.unwrap().unwrap();
        assert_eq!(picked.id, "agent-a");
    }

    #[tokio::test]
    async fn test_empty_pool_is_unassigned_not_error() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_member(member("the-admin", MemberRole::Admin, 10));

        let balancer = AssignmentBalancer::new(directory);
        assert!(balancer.assign("org-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consecutive_assignments_stay_balanced() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_member(member("agent-a", MemberRole::HumanAgent, 30));
        directory.add_member(member("agent-b", MemberRole::HumanAgent, 10));

        let balancer = AssignmentBalancer::new(directory.clone());

        for _ in 0..3 {
            let picked = balancer.assign("org-1").await.unwrap().unwrap();
            directory
                .record_assignment("org-1", &picked.id, Uuid::new_v4())
                .await
                .unwrap();
        }

        let loads = directory.member_loads("org-1").await.unwrap();
        let counts: Vec<u32> = loads.iter().map(|l| l.active_conversations).collect();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1, "loads {:?} should differ by at most 1", counts);
        assert_eq!(counts.iter().sum::<u32>(), 3);
    }
}
