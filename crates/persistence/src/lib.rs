//! Storage seams for the qualification engine
//!
//! The engine reads and writes through these traits; the real relational
//! datastore lives behind them in the host application. In-memory
//! implementations are provided for tests and local development. All
//! operations have per-row atomic semantics: a `put` replaces the prior row
//! in one step and concurrent readers never observe a partial write.

pub mod directory;
pub mod error;
pub mod facts;
pub mod rubrics;

pub use directory::{
    AssignmentMode, AssignmentStatus, InMemoryDirectory, MemberLoad, MembershipDirectory,
};
pub use error::PersistenceError;
pub use facts::{FactStore, InMemoryFactStore};
pub use rubrics::{InMemoryRubricStore, RubricStore};
