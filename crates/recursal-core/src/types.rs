//! Core types for Recursal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version stamped on every persisted feedback record.
pub const FEEDBACK_SCHEMA_VERSION: u32 = 1;

/// Identifier into the fixed argument catalog (1..=12).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentId(pub u8);

impl std::fmt::Display for ArgumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ArgumentId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Audit finding category, mapped from the TCU extract labels.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    SingleChild,
    OnlyRegistryMatch,
    ChildAddress,
    ChildRegistry,
    MultipleChildren,
    MultipleAddressRecords,
    RegistryAddressMatch,
    InssPension,
    Unclassified,
}

impl FindingCategory {
    /// Every category the engine can be asked to decide on.
    pub const ALL: &'static [FindingCategory] = &[
        FindingCategory::SingleChild,
        FindingCategory::OnlyRegistryMatch,
        FindingCategory::ChildAddress,
        FindingCategory::ChildRegistry,
        FindingCategory::MultipleChildren,
        FindingCategory::MultipleAddressRecords,
        FindingCategory::RegistryAddressMatch,
        FindingCategory::InssPension,
        FindingCategory::Unclassified,
    ];

    /// Map a free-form achado label from the extract classifier onto the
    /// enumeration. Unknown labels become `Unclassified` rather than errors —
    /// classifier output is never trusted to be well-formed.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "apenas 1 filho" | "apenas um filho" => Self::SingleChild,
            "apenas cadúnico" | "apenas cadunico" => Self::OnlyRegistryMatch,
            "filho + endereço" | "filho + endereco" => Self::ChildAddress,
            "filho + cadúnico" | "filho + cadunico" => Self::ChildRegistry,
            "mais de 1 filho" | "mais de um filho" => Self::MultipleChildren,
            "endereço em múltiplas bases (tse/receita)"
            | "endereço em múltiplas bases"
            | "endereco em multiplas bases" => Self::MultipleAddressRecords,
            "cadúnico + endereço em múltiplas bases"
            | "cadunico + endereco em multiplas bases" => Self::RegistryAddressMatch,
            "pensão do inss como companheira" | "pensao do inss como companheira" => {
                Self::InssPension
            }
            _ => Self::Unclassified,
        }
    }

    /// The achado label used in prompts and operator-facing output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SingleChild => "Apenas 1 filho",
            Self::OnlyRegistryMatch => "Apenas CadÚnico",
            Self::ChildAddress => "Filho + endereço",
            Self::ChildRegistry => "Filho + CadÚnico",
            Self::MultipleChildren => "Mais de 1 filho",
            Self::MultipleAddressRecords => "Endereço em múltiplas bases (TSE/Receita)",
            Self::RegistryAddressMatch => "CadÚnico + Endereço em múltiplas bases",
            Self::InssPension => "Pensão do INSS como companheira",
            Self::Unclassified => "Achado não classificado",
        }
    }
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An audit irregularity extracted from the TCU report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    /// Unique per case instance (process or extract number).
    pub code: String,
    pub category: FindingCategory,
    /// Free text, informational only.
    #[serde(default)]
    pub description: String,
}

/// A raw classification proposal for one argument slot, produced by the
/// external classifier. `confidence` is advisory; the validator ignores it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArgumentCandidate {
    pub argument_id: ArgumentId,
    pub source_text: String,
    #[serde(default)]
    pub confidence: f32,
}

/// Ordered, duplicate-free set of argument ids for one case.
///
/// Insertion order is meaningful: validation order first, inference-appended
/// ids at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedArgumentSet {
    ids: Vec<ArgumentId>,
}

impl ResolvedArgumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id unless already present. Returns whether it was inserted.
    pub fn push(&mut self, id: ArgumentId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: ArgumentId) -> bool {
        self.ids.contains(&id)
    }

    pub fn contains_any(&self, ids: &[ArgumentId]) -> bool {
        ids.iter().any(|id| self.contains(*id))
    }

    pub fn contains_all(&self, ids: &[ArgumentId]) -> bool {
        ids.iter().all(|id| self.contains(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = ArgumentId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[ArgumentId] {
        &self.ids
    }
}

impl FromIterator<ArgumentId> for ResolvedArgumentSet {
    fn from_iter<I: IntoIterator<Item = ArgumentId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.push(id);
        }
        set
    }
}

impl From<&[u8]> for ResolvedArgumentSet {
    fn from(ids: &[u8]) -> Self {
        ids.iter().map(|id| ArgumentId(*id)).collect()
    }
}

/// Binary legal resolution of an appeal.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Appeal upheld.
    Procedente,
    /// Appeal rejected.
    Improcedente,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Procedente => f.write_str("procedente"),
            Self::Improcedente => f.write_str("improcedente"),
        }
    }
}

/// Reviewer verdict on a generated report.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLabel {
    Correct,
    Incorrect,
}

/// One persisted evaluation of a generated report. Immutable once appended;
/// identified by `(timestamp, finding_code)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub schema_version: u32,
    pub timestamp: DateTime<Utc>,
    pub finding_code: String,
    pub category: FindingCategory,
    pub arguments: ResolvedArgumentSet,
    pub outcome: Outcome,
    pub label: FeedbackLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub generated_text: String,
}

impl FeedbackRecord {
    /// Build a record for the current instant at the current schema version.
    pub fn now(
        finding_code: impl Into<String>,
        category: FindingCategory,
        arguments: ResolvedArgumentSet,
        outcome: Outcome,
        label: FeedbackLabel,
        comment: Option<String>,
        generated_text: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: FEEDBACK_SCHEMA_VERSION,
            timestamp: Utc::now(),
            finding_code: finding_code.into(),
            category,
            arguments,
            outcome,
            label,
            comment,
            generated_text: generated_text.into(),
        }
    }

    /// Append-time invariant: an `incorrect` verdict must carry a non-empty
    /// comment explaining what was wrong.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.label == FeedbackLabel::Incorrect
            && self.comment.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            return Err(crate::error::Error::validation(
                "feedback with label=incorrect requires a non-empty comment",
            ));
        }
        Ok(())
    }
}
