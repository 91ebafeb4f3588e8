//! Senti Core - Review sentiment classification and aggregation.
//!
//! This crate provides:
//! - The [`SentimentScorer`] capability and a VADER-backed implementation
//! - Threshold classification of compound scores into [`SentimentLabel`]s
//! - Aggregation of a [`ReviewSet`] into an [`AnalysisResult`]
//! - Validation of uploaded review documents
//!
//! ## Flow
//!
//! ```text
//! bytes → parse_upload → ReviewSet → analyze_reviews(scorer) → AnalysisResult
//!                                            ↓
//!                                  classify(text) per review
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod aggregator;
pub mod classifier;
pub mod label;
pub mod output;
pub mod scorer;
pub mod upload;

pub use aggregator::{analyze_reviews, AnalysisResult, ReviewSet, Summary};
pub use classifier::{classify, label_for_score, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
pub use label::SentimentLabel;
pub use output::{DEFAULT_RESULT_FILE_NAME, EXAMPLE_INPUT, RESULT_MIME_TYPE};
pub use scorer::{ScoreError, SentimentScorer, VaderScorer};
pub use upload::{analyze_upload, parse_upload, UploadError, UploadErrorKind};
