//! Exemplar Retriever — pick the reference case for report drafting
//!
//! Exact match on (category, outcome) among approved records, newest first.
//! Recency is the only ranking: later approvals reflect earlier review
//! lessons. No match is a normal outcome, not an error — the caller drafts
//! without an exemplar.

use recursal_core::types::{FeedbackLabel, FeedbackRecord, FindingCategory, Outcome};
use tracing::debug;

/// Select from an already-loaded snapshot.
pub fn select_exemplar(
    records: &[FeedbackRecord],
    category: FindingCategory,
    outcome: Outcome,
) -> Option<&FeedbackRecord> {
    let chosen = records
        .iter()
        .filter(|r| {
            r.label == FeedbackLabel::Correct && r.category == category && r.outcome == outcome
        })
        .max_by_key(|r| r.timestamp);
    if let Some(record) = chosen {
        debug!(
            category = %category,
            outcome = %outcome,
            code = %record.finding_code,
            "exemplar selected"
        );
    }
    chosen
}

/// Convenience wrapper: load a snapshot from the store and select.
pub async fn retrieve(
    store: &crate::feedback::FeedbackStore,
    category: FindingCategory,
    outcome: Outcome,
) -> crate::error::StoreResult<Option<FeedbackRecord>> {
    let records = store.load_all().await?;
    Ok(select_exemplar(&records, category, outcome).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use recursal_core::types::{ResolvedArgumentSet, FEEDBACK_SCHEMA_VERSION};

    fn record(
        code: &str,
        category: FindingCategory,
        outcome: Outcome,
        label: FeedbackLabel,
        hour: u32,
    ) -> FeedbackRecord {
        FeedbackRecord {
            schema_version: FEEDBACK_SCHEMA_VERSION,
            timestamp: Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0).unwrap(),
            finding_code: code.into(),
            category,
            arguments: ResolvedArgumentSet::new(),
            outcome,
            label,
            comment: None,
            generated_text: format!("parecer {code}"),
        }
    }

    #[test]
    fn newest_correct_match_wins() {
        let records = vec![
            record("A", FindingCategory::ChildAddress, Outcome::Procedente, FeedbackLabel::Correct, 8),
            record("B", FindingCategory::ChildAddress, Outcome::Procedente, FeedbackLabel::Correct, 12),
            record("C", FindingCategory::ChildAddress, Outcome::Procedente, FeedbackLabel::Correct, 10),
        ];
        let chosen =
            select_exemplar(&records, FindingCategory::ChildAddress, Outcome::Procedente).unwrap();
        assert_eq!(chosen.finding_code, "B");
    }

    #[test]
    fn incorrect_and_mismatched_records_are_ignored() {
        let records = vec![
            record("A", FindingCategory::ChildAddress, Outcome::Procedente, FeedbackLabel::Incorrect, 12),
            record("B", FindingCategory::ChildAddress, Outcome::Improcedente, FeedbackLabel::Correct, 12),
            record("C", FindingCategory::SingleChild, Outcome::Procedente, FeedbackLabel::Correct, 12),
        ];
        assert!(
            select_exemplar(&records, FindingCategory::ChildAddress, Outcome::Procedente).is_none()
        );
    }

    #[test]
    fn no_match_is_none_not_error() {
        assert!(select_exemplar(&[], FindingCategory::InssPension, Outcome::Procedente).is_none());
    }
}
