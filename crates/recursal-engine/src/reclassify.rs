//! Finding reclassification — deterministic upgrades of the audit category
//!
//! Two rules, both derived from how the registries actually work rather than
//! from classifier output:
//!
//! - A companheiro(a) declaration in CadÚnico requires a common address, so
//!   "Apenas CadÚnico" always implies a declared shared address. When the
//!   defense itself admits a common child (ids 2 or 12), the finding is
//!   upgraded to child+registry instead.
//! - The audit often sees a single child in the public registries while the
//!   defense text reveals several. Plural mentions without an explicit
//!   singularity negation upgrade the finding to multiple children.
//!
//! Both rules are idempotent: their target categories are never themselves
//! reclassified.

use recursal_core::catalog::{ARG_CHILD_NO_CUSTODY, ARG_COMMON_CHILD};
use recursal_core::types::{FindingCategory, ResolvedArgumentSet};
use regex::Regex;
use tracing::debug;

/// A reclassification that fired, for the diagnostic trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reclassification {
    pub from: FindingCategory,
    pub to: FindingCategory,
    pub reason: &'static str,
}

pub struct Reclassifier {
    plural_indicators: Vec<Regex>,
    bare_plural: Regex,
    singular_negations: Vec<Regex>,
}

impl Default for Reclassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("hardcoded pattern is valid")
}

impl Reclassifier {
    pub fn new() -> Self {
        Self {
            plural_indicators: vec![
                pattern(r"(?i)\bmeus\s+filhos\b"),
                pattern(r"(?i)\bminhas\s+filhas\b"),
                pattern(r"(?i)\b(dois|duas|três|tres|quatro|cinco)\s+filh[oa]s\b"),
                pattern(r"(?i)\b(ambos|ambas|todos|todas)\s+[oa]s\s+filh[oa]s\b"),
                // Plural birth certificates attached to the defense.
                pattern(r"(?i)certidões\s+de\s+nascimento"),
                pattern(r"(?i)certid(ão|ões)\s+de\s+nascimento.*\s(e|,)\s.*certid"),
            ],
            bare_plural: pattern(r"(?i)\bfilhos\b"),
            singular_negations: vec![
                pattern(r"(?i)\bapenas\s+um\s+filho\b"),
                pattern(r"(?i)\bsomente\s+um\s+filho\b"),
                pattern(r"(?i)\bsó\s+um\s+filho\b"),
                pattern(r"(?i)\bum\s+único\s+filho\b"),
            ],
        }
    }

    /// Apply both rules to a finding. Returns the (possibly unchanged)
    /// category plus a note when a rule fired.
    pub fn reclassify(
        &self,
        category: FindingCategory,
        arguments: &ResolvedArgumentSet,
        defense_text: &str,
    ) -> (FindingCategory, Option<Reclassification>) {
        let upgraded = match category {
            FindingCategory::OnlyRegistryMatch => {
                if arguments.contains_any(&[ARG_COMMON_CHILD, ARG_CHILD_NO_CUSTODY]) {
                    Some(Reclassification {
                        from: category,
                        to: FindingCategory::ChildRegistry,
                        reason: "defesa admite filho em comum; CadÚnico reforça vínculo com prole",
                    })
                } else {
                    Some(Reclassification {
                        from: category,
                        to: FindingCategory::RegistryAddressMatch,
                        reason: "declaração de companheiro(a) no CadÚnico implica endereço comum",
                    })
                }
            }
            FindingCategory::SingleChild if self.reveals_plural_children(defense_text) => {
                Some(Reclassification {
                    from: category,
                    to: FindingCategory::MultipleChildren,
                    reason: "defesa revela pluralidade de filhos",
                })
            }
            _ => None,
        };

        match upgraded {
            Some(note) => {
                debug!(from = %note.from, to = %note.to, "finding reclassified");
                (note.to, Some(note))
            }
            None => (category, None),
        }
    }

    /// Does the defense text reveal more than one child? Plural indicators
    /// win unless an explicit singularity negation is present.
    fn reveals_plural_children(&self, text: &str) -> bool {
        let mentions_plural = self.plural_indicators.iter().any(|p| p.is_match(text))
            || self.bare_plural_outside_common_child(text);
        let negates_plural = self.singular_negations.iter().any(|p| p.is_match(text));
        mentions_plural && !negates_plural
    }

    /// The bare plural "filhos" counts, except in the fixed phrase
    /// "filho(s) em comum" which is how a single common child is described.
    fn bare_plural_outside_common_child(&self, text: &str) -> bool {
        self.bare_plural.find_iter(text).any(|m| {
            let rest = text[m.end()..].trim_start();
            let rest = rest.to_lowercase();
            !rest.starts_with("em comum")
        })
    }
}
