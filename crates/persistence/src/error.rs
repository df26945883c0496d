//! Persistence error type

use thiserror::Error;

/// Errors from store operations.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Backend(String),
}

impl From<PersistenceError> for leadqual_core::Error {
    fn from(err: PersistenceError) -> Self {
        leadqual_core::Error::Persistence(err.to_string())
    }
}
