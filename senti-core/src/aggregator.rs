//! Aggregation of a review set into labels and summary counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classifier::classify;
use crate::label::SentimentLabel;
use crate::scorer::{ScoreError, SentimentScorer};

/// Review id → review text. Ids are unique; texts may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSet {
    reviews: BTreeMap<String, String>,
}

impl ReviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a review, replacing any previous text for the same id.
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.reviews.insert(id.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.reviews.get(id).map(String::as_str)
    }

    /// Iterate `(id, text)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reviews.iter().map(|(id, text)| (id.as_str(), text.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ReviewSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            reviews: iter
                .into_iter()
                .map(|(id, text)| (id.into(), text.into()))
                .collect(),
        }
    }
}

/// Per-label tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

impl Summary {
    /// Count one more review with `label`.
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive_count += 1,
            SentimentLabel::Negative => self.negative_count += 1,
            SentimentLabel::Neutral => self.neutral_count += 1,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive_count,
            SentimentLabel::Negative => self.negative_count,
            SentimentLabel::Neutral => self.neutral_count,
        }
    }

    pub fn total(&self) -> usize {
        self.positive_count + self.negative_count + self.neutral_count
    }
}

/// Labels for every review plus the summary counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiments: BTreeMap<String, SentimentLabel>,
    pub summary: Summary,
}

/// Classify every review in `reviews`.
///
/// Blank texts are neutral and never reach the scorer. The first scorer error
/// aborts the whole analysis.
pub fn analyze_reviews(
    reviews: &ReviewSet,
    scorer: &dyn SentimentScorer,
) -> Result<AnalysisResult, ScoreError> {
    let mut result = AnalysisResult::default();

    for (id, text) in reviews.iter() {
        let label = if text.trim().is_empty() {
            SentimentLabel::Neutral
        } else {
            classify(scorer, text)?
        };

        tracing::debug!(review_id = %id, label = %label, "Review classified");
        result.summary.record(label);
        result.sentiments.insert(id.to_string(), label);
    }

    tracing::info!(
        reviews = result.sentiments.len(),
        positive = result.summary.positive_count,
        negative = result.summary.negative_count,
        neutral = result.summary.neutral_count,
        "Review analysis completed"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores by keyword so tests do not depend on a lexicon.
    fn keyword_scorer(text: &str) -> Result<f64, ScoreError> {
        if text.contains("good") {
            Ok(0.6)
        } else if text.contains("bad") {
            Ok(-0.6)
        } else {
            Ok(0.0)
        }
    }

    #[test]
    fn test_labels_and_counts() {
        let reviews: ReviewSet = [
            ("a", "good stuff"),
            ("b", "bad stuff"),
            ("c", "plain stuff"),
            ("d", "so good"),
        ]
        .into_iter()
        .collect();

        let result = analyze_reviews(&reviews, &keyword_scorer).unwrap();

        assert_eq!(result.sentiments["a"], SentimentLabel::Positive);
        assert_eq!(result.sentiments["b"], SentimentLabel::Negative);
        assert_eq!(result.sentiments["c"], SentimentLabel::Neutral);
        assert_eq!(
            result.summary,
            Summary {
                positive_count: 2,
                negative_count: 1,
                neutral_count: 1,
            }
        );
    }

    #[test]
    fn test_blank_text_skips_scorer() {
        let calls = AtomicUsize::new(0);
        let scorer = |_: &str| -> Result<f64, ScoreError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(0.9)
        };

        let reviews: ReviewSet = [("empty", ""), ("spaces", "   "), ("tabs", "\t\n")]
            .into_iter()
            .collect();
        let result = analyze_reviews(&reviews, &scorer).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.summary.neutral_count, 3);
        assert!(result
            .sentiments
            .values()
            .all(|label| *label == SentimentLabel::Neutral));
    }

    #[test]
    fn test_scorer_failure_aborts_analysis() {
        let scorer = |text: &str| -> Result<f64, ScoreError> {
            if text == "boom" {
                Err(ScoreError::Backend("lexicon unavailable".into()))
            } else {
                Ok(0.3)
            }
        };

        let reviews: ReviewSet = [("a", "fine"), ("b", "boom")].into_iter().collect();
        assert_eq!(
            analyze_reviews(&reviews, &scorer),
            Err(ScoreError::Backend("lexicon unavailable".into()))
        );
    }

    #[test]
    fn test_empty_set_yields_empty_result() {
        let result = analyze_reviews(&ReviewSet::new(), &keyword_scorer).unwrap();
        assert!(result.sentiments.is_empty());
        assert_eq!(result.summary.total(), 0);
    }

    #[test]
    fn test_result_json_shape() {
        let reviews: ReviewSet = [("id1", "good")].into_iter().collect();
        let result = analyze_reviews(&reviews, &keyword_scorer).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["sentiments"]["id1"], "positive");
        assert_eq!(json["summary"]["positive_count"], 1);
        assert_eq!(json["summary"]["negative_count"], 0);
        assert_eq!(json["summary"]["neutral_count"], 0);
    }

    proptest! {
        #[test]
        fn prop_counts_match_review_set(
            reviews in prop::collection::btree_map("[a-z0-9]{1,6}", "[ a-z]{0,12}", 0..40),
            score in -1.0f64..=1.0,
        ) {
            let set: ReviewSet = reviews.clone().into_iter().collect();
            let scorer = move |_: &str| -> Result<f64, ScoreError> { Ok(score) };
            let result = analyze_reviews(&set, &scorer).unwrap();

            prop_assert_eq!(result.sentiments.len(), reviews.len());
            prop_assert_eq!(result.summary.total(), reviews.len());
            for label in SentimentLabel::ALL {
                let tallied = result.sentiments.values().filter(|l| **l == label).count();
                prop_assert_eq!(result.summary.count(label), tallied);
            }
            for id in reviews.keys() {
                prop_assert!(result.sentiments.contains_key(id));
            }
        }
    }
}
