//! Recursal Engine - deterministic argument validation and decision pipeline
//!
//! Classifier output is untrusted input: candidates pass the pattern
//! validator, the finding may be reclassified, implicit arguments are
//! inferred, and the decision matrix maps the result to an outcome. All of
//! it is pure and reproducible for a fixed rule-table version.

pub mod inference;
pub mod matrix;
pub mod pipeline;
pub mod reclassify;
pub mod validator;

pub use inference::InferencePolicy;
pub use matrix::RuleTable;
pub use pipeline::{Engine, Evaluation};
pub use reclassify::{Reclassification, Reclassifier};
pub use validator::{PatternValidator, RejectReason, Rejection, Validated};
