//! Compound sentiment scoring capability.
//!
//! The classifier only needs a single normalized score per text. Any lexicon- or
//! model-based scorer can be plugged in by implementing [`SentimentScorer`];
//! closures of the right shape implement it too.

use std::fmt;
use thiserror::Error;

/// Errors raised by a scorer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    /// Scorer output did not contain a compound value
    #[error("scorer returned no compound score")]
    MissingCompound,

    /// Scorer produced NaN or an infinite value
    #[error("scorer returned a non-finite score: {0}")]
    NonFinite(f64),

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

/// Produces a compound polarity score in `[-1.0, 1.0]` for a text.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<f64, ScoreError>;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> Result<f64, ScoreError> + Send + Sync,
{
    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        self(text)
    }
}

/// VADER lexicon scorer.
///
/// The lexicon is loaded once per process and shared read-only by every
/// analyzer instance.
pub struct VaderScorer {
    analyzer: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VaderScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaderScorer").finish_non_exhaustive()
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> Result<f64, ScoreError> {
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .ok_or(ScoreError::MissingCompound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_scorer() {
        let scorer = |text: &str| -> Result<f64, ScoreError> {
            Ok(if text.contains("good") { 0.5 } else { 0.0 })
        };
        assert_eq!(scorer.score("good day").unwrap(), 0.5);
        assert_eq!(scorer.score("a day").unwrap(), 0.0);
    }

    #[test]
    fn test_vader_scores_within_range() {
        let scorer = VaderScorer::new();
        for text in ["I love this product!", "Very bad experience", "Average service"] {
            let score = scorer.score(text).unwrap();
            assert!((-1.0..=1.0).contains(&score), "{text}: {score}");
        }
    }

    #[test]
    fn test_vader_polarity_direction() {
        let scorer = VaderScorer::new();
        assert!(scorer.score("I love this product!").unwrap() > 0.05);
        assert!(scorer.score("Very bad experience").unwrap() < -0.05);
    }

    #[test]
    fn test_scorer_is_object_safe() {
        let scorer: Box<dyn SentimentScorer> = Box::new(VaderScorer::new());
        assert!(scorer.score("great").is_ok());
    }
}
