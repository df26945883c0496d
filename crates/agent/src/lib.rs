//! The BANT qualification engine
//!
//! Stateful, multi-turn lead qualification for conversational real-estate
//! products:
//! - [`extractor`] turns conversation windows into fact record updates via
//!   the external text-understanding service;
//! - [`sequencer`] decides the next fixed-order question, tolerating
//!   out-of-order answers;
//! - [`scoring`] scores the accumulated facts against an organization's
//!   weighted rubric and classifies the lead into a tier;
//! - [`assignment`] hands a qualified lead to the least-loaded eligible
//!   human agent;
//! - [`engine`] wires the four together per inbound turn.

pub mod assignment;
pub mod engine;
pub mod extractor;
pub mod scoring;
pub mod sequencer;

pub use assignment::AssignmentBalancer;
pub use engine::{ConfigureError, LeadContext, QualificationEngine, TurnOutcome, TurnResult};
pub use extractor::{ChangeSource, ExtractionUpdate, ExtractorConfig, FactChange, FactExtractor};
pub use scoring::{classify, score};
pub use sequencer::{next_question, QualificationStage, Question, SequencerOutcome};
