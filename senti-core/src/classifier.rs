//! Threshold classification of compound scores.

use crate::label::SentimentLabel;
use crate::scorer::{ScoreError, SentimentScorer};

/// Scores at or above this value are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Scores at or below this value are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Map a compound score to a label. Both boundaries are inclusive.
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Score `text` and classify it.
///
/// The caller guarantees `text` is not blank. Scorer errors are returned
/// unchanged.
pub fn classify(scorer: &dyn SentimentScorer, text: &str) -> Result<SentimentLabel, ScoreError> {
    let score = scorer.score(text)?;
    if !score.is_finite() {
        return Err(ScoreError::NonFinite(score));
    }
    Ok(label_for_score(score))
}
