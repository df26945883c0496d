//! Core types for the BANT lead qualification engine
//!
//! This crate provides the foundational types shared by all other crates:
//! - Conversation turns and the bounded extraction window
//! - The incrementally-filled fact record and its merge policy
//! - Normalized category tags (authority, need, timeline, contact quality)
//! - Score and tier types
//! - Organization membership types used by assignment
//! - Error types

pub mod conversation;
pub mod error;
pub mod facts;
pub mod member;
pub mod score;
pub mod tags;

pub use conversation::{ConversationId, Turn, TurnRole};
pub use error::{Error, Result};
pub use facts::{ContactInfo, ExtractedFacts, FactRecord};
pub use member::{MemberRole, OrgMember};
pub use score::{CategoryScore, ScoreResult, Tier};
pub use tags::{Authority, ContactQuality, Need, Timeline};
