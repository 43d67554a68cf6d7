//! Pattern Validator — deterministic post-classifier filter
//!
//! The external classifier over-detects the two "prior decision" arguments:
//! it reads any jurisprudence citation as res judicata (id 6) and any
//! mention of administrative procedure as a prior administrative process
//! (id 9). Acceptance of those ids therefore requires a structural signature
//! in the supporting span. Every other catalog id passes through
//! unconditionally — validation is a rejection filter, never a promoter.

use recursal_core::catalog::{self, ARG_PRIOR_ADMIN, ARG_RES_JUDICATA};
use recursal_core::types::{ArgumentCandidate, ArgumentId};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Why a candidate was dropped. Attached to the case's diagnostic trail;
/// never propagated as an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Id 6 span has no process number, no finality marker and no explicit
    /// process reference.
    NoProcessReference,
    /// Id 6 span cites jurisprudence without a concrete case number.
    GenericJurisprudence,
    /// Id 9 span never states the matter was handled administratively.
    NoAdministrativeReference,
    /// Argument id outside the fixed catalog.
    UnknownArgument,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::NoProcessReference => {
                "sem número de processo, trânsito em julgado ou referência ao caso concreto"
            }
            Self::GenericJurisprudence => "citação genérica de jurisprudência sem número de processo",
            Self::NoAdministrativeReference => {
                "sem referência a processo administrativo anterior sobre a matéria"
            }
            Self::UnknownArgument => "argumento fora do catálogo",
        };
        f.write_str(msg)
    }
}

/// A dropped candidate plus the reason it was dropped.
#[derive(Clone, Debug, Serialize)]
pub struct Rejection {
    pub argument_id: ArgumentId,
    pub source_text: String,
    pub reason: RejectReason,
}

/// Validation output: survivors in their original relative order, plus the
/// diagnostic trail of rejections.
#[derive(Debug, Default)]
pub struct Validated {
    pub accepted: Vec<ArgumentCandidate>,
    pub rejected: Vec<Rejection>,
}

pub struct PatternValidator {
    /// CNJ national case-number format: NNNNNNN-DD.AAAA.J.TR.OOOO
    cnj_number: Regex,
    finality: Regex,
    explicit_process: Regex,
    jurisprudence: Regex,
    admin_reference: Regex,
}

impl Default for PatternValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("hardcoded pattern is valid")
}

impl PatternValidator {
    pub fn new() -> Self {
        Self {
            cnj_number: pattern(r"\d{7}-\d{2}\.\d{4}\.\d\.\d{2}\.\d{4}"),
            finality: pattern(r"(?i)trânsit|transit(ad|ou)"),
            explicit_process: pattern(r"(?i)(processo|autos)\s+(n[º°]|número)"),
            jurisprudence: pattern(
                r"(?i)jurisprudência|precedente|súmula|entendimento\s+dos?\s+tribuna",
            ),
            admin_reference: pattern(
                r"(?i)\bNUP\b|processo\s+administrativo|nota\s+técnica|\bPAD\b|já\s+foi\s+(analisado|avaliado|auditado|julgado)|decisão\s+administrativa\s+anterior|já\s+(deferido|indeferido)\s+administrativamente",
            ),
        }
    }

    /// Check one candidate. `Ok(())` means keep; `Err` carries the drop
    /// reason for the diagnostic trail.
    pub fn check(&self, candidate: &ArgumentCandidate) -> Result<(), RejectReason> {
        if !catalog::is_known(candidate.argument_id) {
            return Err(RejectReason::UnknownArgument);
        }
        match candidate.argument_id {
            id if id == ARG_RES_JUDICATA => self.check_res_judicata(&candidate.source_text),
            id if id == ARG_PRIOR_ADMIN => self.check_prior_admin(&candidate.source_text),
            _ => Ok(()),
        }
    }

    /// Filter a batch, preserving relative order of survivors.
    pub fn validate_all(&self, candidates: &[ArgumentCandidate]) -> Validated {
        let mut out = Validated::default();
        for candidate in candidates {
            match self.check(candidate) {
                Ok(()) => out.accepted.push(candidate.clone()),
                Err(reason) => {
                    debug!(
                        argument = %candidate.argument_id,
                        %reason,
                        "candidate rejected"
                    );
                    out.rejected.push(Rejection {
                        argument_id: candidate.argument_id,
                        source_text: candidate.source_text.clone(),
                        reason,
                    });
                }
            }
        }
        out
    }

    fn check_res_judicata(&self, text: &str) -> Result<(), RejectReason> {
        let has_number = self.cnj_number.is_match(text);
        let has_finality = self.finality.is_match(text);
        let has_process_ref = self.explicit_process.is_match(text);

        if !has_number && !has_finality && !has_process_ref {
            return Err(RejectReason::NoProcessReference);
        }
        // A jurisprudence citation only counts with a concrete case number.
        if self.jurisprudence.is_match(text) && !has_number {
            return Err(RejectReason::GenericJurisprudence);
        }
        Ok(())
    }

    fn check_prior_admin(&self, text: &str) -> Result<(), RejectReason> {
        if self.admin_reference.is_match(text) {
            Ok(())
        } else {
            Err(RejectReason::NoAdministrativeReference)
        }
    }
}
