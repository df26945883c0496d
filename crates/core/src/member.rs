//! Organization membership types used by lead assignment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of an organization member.
///
/// Only `HumanAgent` members are eligible to receive qualified leads;
/// administrators, moderators, and automated agents never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Moderator,
    HumanAgent,
    AiAgent,
}

impl MemberRole {
    pub fn is_human_agent(&self) -> bool {
        matches!(self, MemberRole::HumanAgent)
    }
}

/// An organization member as reported by the membership directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgMember {
    pub id: String,
    pub org_id: String,
    pub role: MemberRole,
    /// When the member joined the organization; the assignment tie-breaker.
    pub joined_at: DateTime<Utc>,
}
