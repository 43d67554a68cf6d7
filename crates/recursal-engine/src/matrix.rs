//! Decision Matrix — indexed rule table with load-time verification
//!
//! The flat rule list from the configuration file is compiled once into a
//! category → rules-by-descending-priority index. Configuration defects are
//! caught here, at load, not at decision time:
//!
//! - ambiguity: two same-category rules with equal priority whose patterns
//!   are not provably disjoint;
//! - totality: every category in the enumeration must have a rule matching
//!   the empty argument set, so `decide` can never come up empty for a
//!   well-formed table.

use std::collections::BTreeMap;

use recursal_core::config::{DecisionRule, RulesConfig};
use recursal_core::error::{Error, Result};
use recursal_core::types::{FindingCategory, Outcome, ResolvedArgumentSet};
use tracing::{debug, info};

#[derive(Debug)]
pub struct RuleTable {
    version: String,
    by_category: BTreeMap<FindingCategory, Vec<DecisionRule>>,
}

impl RuleTable {
    /// Compile and verify a rules configuration.
    pub fn compile(config: &RulesConfig) -> Result<Self> {
        let mut by_category: BTreeMap<FindingCategory, Vec<DecisionRule>> = BTreeMap::new();
        for rule in &config.rules {
            by_category.entry(rule.category).or_default().push(rule.clone());
        }
        for rules in by_category.values_mut() {
            rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        for (category, rules) in &by_category {
            for (i, a) in rules.iter().enumerate() {
                for b in &rules[i + 1..] {
                    if a.priority == b.priority && !a.pattern.provably_disjoint(&b.pattern) {
                        return Err(Error::AmbiguousRule {
                            category: category.label().to_string(),
                            priority: a.priority,
                        });
                    }
                }
            }
        }

        let empty = ResolvedArgumentSet::new();
        for category in FindingCategory::ALL {
            let covered = by_category
                .get(category)
                .is_some_and(|rules| rules.iter().any(|r| r.pattern.matches(&empty)));
            if !covered {
                return Err(Error::UnresolvedCategory(category.label().to_string()));
            }
        }

        info!(
            version = %config.version,
            rules = config.rules.len(),
            "decision matrix loaded"
        );
        Ok(Self {
            version: config.version.clone(),
            by_category,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The matching rule with the highest priority.
    pub fn match_rule(
        &self,
        category: FindingCategory,
        resolved: &ResolvedArgumentSet,
    ) -> Result<&DecisionRule> {
        let rules = self
            .by_category
            .get(&category)
            .ok_or_else(|| Error::UnresolvedCategory(category.label().to_string()))?;
        // Sorted by descending priority at compile time.
        rules
            .iter()
            .find(|rule| rule.pattern.matches(resolved))
            .ok_or_else(|| Error::UnresolvedCategory(category.label().to_string()))
    }

    /// Pure lookup: (category, resolved set) → outcome.
    pub fn decide(
        &self,
        category: FindingCategory,
        resolved: &ResolvedArgumentSet,
    ) -> Result<Outcome> {
        let rule = self.match_rule(category, resolved)?;
        debug!(
            category = %category,
            priority = rule.priority,
            outcome = %rule.result,
            "rule matched"
        );
        Ok(rule.result)
    }
}
