//! Rubric configuration for the lead qualification engine
//!
//! An organization's rubric defines how accumulated facts become a score:
//! five category weights (summing to 100), per-category criterion tables,
//! and tier thresholds. This crate owns the configuration model, the
//! validator admins go through before a rubric is stored, and the derived
//! natural-language rubric description consumed by the extraction prompt.

pub mod describe;
pub mod rubric;
pub mod validator;

pub use describe::rubric_description;
pub use rubric::{
    CategoryWeights, Criterion, CriterionPredicate, FactValue, RubricConfig, RubricConfigError,
    TierThresholds,
};
pub use validator::{validate, ValidationError, ValidationResult};
