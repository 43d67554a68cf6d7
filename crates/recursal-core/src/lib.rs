//! Recursal Core - Types, catalog, rules configuration, and error handling

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use config::{ArgumentPattern, DecisionRule, InferenceConfig, RulesConfig};
pub use error::{Error, Result};
pub use types::*;
