//! Evaluation pipeline: validate → reclassify → infer → decide
//!
//! One synchronous unit of work per case. Either every stage completes and
//! a full `Evaluation` is returned, or the error propagates and no partial
//! argument set escapes.

use recursal_core::config::RulesConfig;
use recursal_core::error::Result;
use recursal_core::types::{
    ArgumentCandidate, ArgumentId, Finding, FindingCategory, Outcome, ResolvedArgumentSet,
};
use tracing::info;

use crate::inference::InferencePolicy;
use crate::matrix::RuleTable;
use crate::reclassify::{Reclassification, Reclassifier};
use crate::validator::{PatternValidator, Rejection};

/// Full result of one case evaluation.
#[derive(Debug)]
pub struct Evaluation {
    pub finding_code: String,
    /// Category after reclassification; what the decision was made on.
    pub category: FindingCategory,
    /// Present when a reclassification rule fired.
    pub reclassified: Option<Reclassification>,
    pub arguments: ResolvedArgumentSet,
    /// Id appended by the inference engine, when it fired.
    pub inferred: Option<ArgumentId>,
    pub outcome: Outcome,
    /// Diagnostic trail of dropped classifier candidates.
    pub rejections: Vec<Rejection>,
    /// Rule-table version the outcome was derived under.
    pub table_version: String,
}

pub struct Engine {
    table: RuleTable,
    validator: PatternValidator,
    reclassifier: Reclassifier,
    inference: InferencePolicy,
}

impl Engine {
    /// Build an engine from a verified rules configuration. Fails on the
    /// load-time checks in [`RuleTable::compile`]; an engine that cannot
    /// verify its table never serves decisions.
    pub fn new(config: &RulesConfig) -> Result<Self> {
        Ok(Self {
            table: RuleTable::compile(config)?,
            validator: PatternValidator::new(),
            reclassifier: Reclassifier::new(),
            inference: InferencePolicy::new(&config.inference),
        })
    }

    /// Swap in a new rules configuration. The old table stays in service if
    /// the new one fails verification.
    pub fn reload(&mut self, config: &RulesConfig) -> Result<()> {
        self.table = RuleTable::compile(config)?;
        self.inference = InferencePolicy::new(&config.inference);
        Ok(())
    }

    pub fn table_version(&self) -> &str {
        self.table.version()
    }

    /// Evaluate one case.
    pub fn evaluate(
        &self,
        finding: &Finding,
        candidates: &[ArgumentCandidate],
        defense_text: &str,
    ) -> Result<Evaluation> {
        let validated = self.validator.validate_all(candidates);

        let mut arguments = ResolvedArgumentSet::new();
        for candidate in &validated.accepted {
            arguments.push(candidate.argument_id);
        }

        let (category, reclassified) =
            self.reclassifier
                .reclassify(finding.category, &arguments, defense_text);

        let (arguments, inferred) = self.inference.infer(category, &arguments);

        let outcome = self.table.decide(category, &arguments)?;

        info!(
            code = %finding.code,
            category = %category,
            outcome = %outcome,
            arguments = arguments.len(),
            rejected = validated.rejected.len(),
            "case evaluated"
        );

        Ok(Evaluation {
            finding_code: finding.code.clone(),
            category,
            reclassified,
            arguments,
            inferred,
            outcome,
            rejections: validated.rejected,
            table_version: self.table.version().to_string(),
        })
    }
}
