//! Shared error type for the qualification engine boundary

use thiserror::Error;

/// Errors surfaced across crate boundaries.
///
/// Subsystem crates define their own error enums and convert into this
/// type at the engine boundary (see `From` impls in those crates).
#[derive(Error, Debug)]
pub enum Error {
    /// Fact extraction did not advance this turn; the fact record is
    /// unchanged and the conversation may continue.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A store read or write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller handed the engine inconsistent input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
