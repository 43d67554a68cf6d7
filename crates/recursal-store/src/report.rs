//! Feedback aggregation — descriptive statistics over the review log
//!
//! Deterministic and reproducible for a fixed input: counts, accuracy, the
//! incorrect records grouped by category, and recurring normalized terms
//! from reviewer comments. Free-text insight generation stays an external
//! collaborator; nothing here calls one.

use std::collections::BTreeMap;

use recursal_core::types::{FeedbackLabel, FeedbackRecord, FindingCategory};
use serde::Serialize;

/// Minimum occurrences for a comment term to count as recurring.
const RECURRING_THRESHOLD: usize = 2;

/// Connectives and fillers excluded from comment term counting.
const STOPWORDS: &[&str] = &[
    "a", "o", "e", "de", "da", "do", "em", "um", "uma", "que", "com", "para", "por", "não",
    "nao", "se", "na", "no", "os", "as", "dos", "das", "foi", "ser", "mas",
];

#[derive(Clone, Debug, Default, Serialize)]
pub struct CategoryStats {
    pub total: usize,
    pub incorrect: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct FeedbackReport {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// correct / total, 0.0 when the log is empty.
    pub accuracy: f64,
    pub by_category: BTreeMap<FindingCategory, CategoryStats>,
    /// (term, occurrences) across incorrect-record comments, ordered by
    /// descending count then term, so the output is stable.
    pub recurring_terms: Vec<(String, usize)>,
}

/// Aggregate a snapshot of the log.
pub fn summarize(records: &[FeedbackRecord]) -> FeedbackReport {
    let mut correct = 0usize;
    let mut incorrect = 0usize;
    let mut by_category: BTreeMap<FindingCategory, CategoryStats> = BTreeMap::new();
    let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        let stats = by_category.entry(record.category).or_default();
        stats.total += 1;
        match record.label {
            FeedbackLabel::Correct => correct += 1,
            FeedbackLabel::Incorrect => {
                incorrect += 1;
                stats.incorrect += 1;
                if let Some(comment) = &record.comment {
                    for term in normalize_terms(comment) {
                        *term_counts.entry(term).or_default() += 1;
                    }
                }
            }
        }
    }

    let total = records.len();
    let mut recurring_terms: Vec<(String, usize)> = term_counts
        .into_iter()
        .filter(|(_, n)| *n >= RECURRING_THRESHOLD)
        .collect();
    recurring_terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    FeedbackReport {
        total,
        correct,
        incorrect,
        accuracy: if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        },
        by_category,
        recurring_terms,
    }
}

/// Lowercase, strip punctuation, drop stopwords and single characters.
fn normalize_terms(comment: &str) -> Vec<String> {
    comment
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 1 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use recursal_core::types::{Outcome, ResolvedArgumentSet, FEEDBACK_SCHEMA_VERSION};

    fn record(
        category: FindingCategory,
        label: FeedbackLabel,
        comment: Option<&str>,
        minute: u32,
    ) -> FeedbackRecord {
        FeedbackRecord {
            schema_version: FEEDBACK_SCHEMA_VERSION,
            timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 9, minute, 0).unwrap(),
            finding_code: format!("TC-{minute}"),
            category,
            arguments: ResolvedArgumentSet::new(),
            outcome: Outcome::Improcedente,
            label,
            comment: comment.map(String::from),
            generated_text: String::new(),
        }
    }

    #[test]
    fn counts_and_accuracy() {
        let records = vec![
            record(FindingCategory::SingleChild, FeedbackLabel::Correct, None, 1),
            record(FindingCategory::SingleChild, FeedbackLabel::Correct, None, 2),
            record(
                FindingCategory::ChildAddress,
                FeedbackLabel::Incorrect,
                Some("errou a matriz de decisão"),
                3,
            ),
            record(FindingCategory::ChildAddress, FeedbackLabel::Correct, None, 4),
        ];
        let report = summarize(&records);
        assert_eq!(report.total, 4);
        assert_eq!(report.correct, 3);
        assert_eq!(report.incorrect, 1);
        assert!((report.accuracy - 0.75).abs() < f64::EPSILON);
        assert_eq!(report.by_category[&FindingCategory::ChildAddress].incorrect, 1);
        assert_eq!(report.by_category[&FindingCategory::SingleChild].total, 2);
    }

    #[test]
    fn recurring_terms_are_counted_and_ordered() {
        let records = vec![
            record(
                FindingCategory::SingleChild,
                FeedbackLabel::Incorrect,
                Some("Matriz errada; a matriz ignorou o argumento 4"),
                1,
            ),
            record(
                FindingCategory::ChildAddress,
                FeedbackLabel::Incorrect,
                Some("ignorou trecho da defesa"),
                2,
            ),
        ];
        let report = summarize(&records);
        // "matriz" twice in one comment, "ignorou" once in each.
        assert!(report
            .recurring_terms
            .contains(&("matriz".to_string(), 2)));
        assert!(report
            .recurring_terms
            .contains(&("ignorou".to_string(), 2)));
        // Below threshold terms are absent.
        assert!(!report.recurring_terms.iter().any(|(t, _)| t == "trecho"));
    }

    #[test]
    fn deterministic_for_fixed_input() {
        let records = vec![
            record(
                FindingCategory::MultipleChildren,
                FeedbackLabel::Incorrect,
                Some("faltou citar faltou citar"),
                1,
            ),
            record(FindingCategory::MultipleChildren, FeedbackLabel::Correct, None, 2),
        ];
        let a = serde_json::to_string(&summarize(&records)).unwrap();
        let b = serde_json::to_string(&summarize(&records)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_log() {
        let report = summarize(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy, 0.0);
        assert!(report.by_category.is_empty());
        assert!(report.recurring_terms.is_empty());
    }
}
