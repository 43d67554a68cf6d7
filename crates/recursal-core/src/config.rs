//! Rules configuration — serde structs for the versioned decision-rule file.
//!
//! Pure types and parsing only. Load-time exhaustiveness/ambiguity checks
//! live in `recursal-engine`, which compiles this into an indexed table.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ArgumentId, FindingCategory, Outcome};

/// Predicate over the resolved argument set. The `default` variant always
/// matches and is what guarantees totality per category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentPattern {
    AllOf(Vec<ArgumentId>),
    AnyOf(Vec<ArgumentId>),
    NoneOf(Vec<ArgumentId>),
    Default,
}

/// One row of the decision matrix.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecisionRule {
    pub category: FindingCategory,
    pub pattern: ArgumentPattern,
    pub result: Outcome,
    pub priority: i32,
    /// Operator-facing rationale, carried into diagnostics.
    #[serde(default)]
    pub note: String,
}

/// Address-inference policy. The empirical basis ("defense always denies
/// cohabitation when the finding is address-based") is configuration, not
/// code: both the category subset and the inferred id are overridable here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub cohabitation_denial_argument: ArgumentId,
    pub address_related: Vec<FindingCategory>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            cohabitation_denial_argument: crate::catalog::ARG_DISTINCT_ADDRESS,
            address_related: vec![
                FindingCategory::ChildAddress,
                FindingCategory::MultipleAddressRecords,
                FindingCategory::RegistryAddressMatch,
            ],
        }
    }
}

/// The whole versioned rules document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Configuration source version, carried into logs and diagnostics.
    pub version: String,
    #[serde(default)]
    pub inference: InferenceConfig,
    pub rules: Vec<DecisionRule>,
}

impl RulesConfig {
    /// Parse a rules document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.rules.is_empty() {
            return Err(Error::config("rules document contains no rules"));
        }
        Ok(config)
    }

    /// Load from a file path. Missing or malformed files are fatal — the
    /// engine must not serve decisions without a verified table.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }
}

impl ArgumentPattern {
    /// Does the predicate hold over `ids`?
    pub fn matches(&self, ids: &crate::types::ResolvedArgumentSet) -> bool {
        match self {
            Self::AllOf(req) => ids.contains_all(req),
            Self::AnyOf(req) => ids.contains_any(req),
            Self::NoneOf(req) => !ids.contains_any(req),
            Self::Default => true,
        }
    }

    /// Conservative disjointness: `true` only when no argument set can match
    /// both patterns. Used by the load-time ambiguity check; anything not
    /// provably disjoint counts as overlapping.
    pub fn provably_disjoint(&self, other: &Self) -> bool {
        fn intersects(a: &[ArgumentId], b: &[ArgumentId]) -> bool {
            a.iter().any(|id| b.contains(id))
        }
        fn subset(a: &[ArgumentId], b: &[ArgumentId]) -> bool {
            a.iter().all(|id| b.contains(id))
        }
        match (self, other) {
            (Self::AllOf(a), Self::NoneOf(b)) | (Self::NoneOf(b), Self::AllOf(a)) => {
                intersects(a, b)
            }
            (Self::AnyOf(a), Self::NoneOf(b)) | (Self::NoneOf(b), Self::AnyOf(a)) => {
                !a.is_empty() && subset(a, b)
            }
            _ => false,
        }
    }
}
