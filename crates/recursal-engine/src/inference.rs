//! Argument Inference Engine
//!
//! One table-driven rule: when the finding category is address-based, the
//! defense predictably denies cohabitation, so the negation-of-cohabitation
//! argument is appended if absent. The category subset and the appended id
//! come from configuration (`InferenceConfig`), not from string matching on
//! category names, so new categories join the subset without code change.

use recursal_core::config::InferenceConfig;
use recursal_core::types::{ArgumentId, FindingCategory, ResolvedArgumentSet};
use tracing::debug;

pub struct InferencePolicy {
    inferred: ArgumentId,
    address_related: Vec<FindingCategory>,
}

impl InferencePolicy {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            inferred: config.cohabitation_denial_argument,
            address_related: config.address_related.clone(),
        }
    }

    pub fn is_address_related(&self, category: FindingCategory) -> bool {
        self.address_related.contains(&category)
    }

    /// Append the configured argument for address-related categories.
    /// Identity for everything else. Idempotent: the presence check
    /// short-circuits re-insertion, and existing ids are never touched.
    pub fn infer(
        &self,
        category: FindingCategory,
        resolved: &ResolvedArgumentSet,
    ) -> (ResolvedArgumentSet, Option<ArgumentId>) {
        if !self.is_address_related(category) {
            return (resolved.clone(), None);
        }
        let mut out = resolved.clone();
        if out.push(self.inferred) {
            debug!(category = %category, argument = %self.inferred, "argument inferred");
            (out, Some(self.inferred))
        } else {
            (out, None)
        }
    }
}

impl Default for InferencePolicy {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}
