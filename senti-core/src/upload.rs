//! Validation of uploaded review documents.
//!
//! Expected shape:
//!
//! ```text
//! { "reviews": { "<id>": "<text>", ... } }
//! ```
//!
//! Checks run in order and the first failure wins: JSON syntax, presence of
//! `reviews`, `reviews` being an object, `reviews` being non-empty.

use serde_json::Value;
use thiserror::Error;

use crate::aggregator::{analyze_reviews, AnalysisResult, ReviewSet};
use crate::scorer::SentimentScorer;

/// Reasons an upload cannot be analyzed.
///
/// `Display` renders the exact user-facing message.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid JSON file format.")]
    InvalidJson(#[source] serde_json::Error),

    #[error("JSON must contain 'reviews' key.")]
    MissingReviews,

    #[error("'reviews' must be a dictionary with id:text format.")]
    ReviewsNotObject,

    #[error("Review dictionary is empty.")]
    EmptyReviews,

    #[error("Unexpected Error: {0}")]
    Unexpected(String),
}

/// Coarse classification of [`UploadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    /// `reviews` missing or of the wrong type
    Structural,
    /// `reviews` present but empty; informational only
    EmptyInput,
    /// Input is not JSON
    Parse,
    /// Anything else
    Unexpected,
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            Self::InvalidJson(_) => UploadErrorKind::Parse,
            Self::MissingReviews | Self::ReviewsNotObject => UploadErrorKind::Structural,
            Self::EmptyReviews => UploadErrorKind::EmptyInput,
            Self::Unexpected(_) => UploadErrorKind::Unexpected,
        }
    }

    /// Whether this is a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        self.kind() == UploadErrorKind::EmptyInput
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::MissingReviews => "REVIEWS_MISSING",
            Self::ReviewsNotObject => "REVIEWS_NOT_OBJECT",
            Self::EmptyReviews => "REVIEWS_EMPTY",
            Self::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate an uploaded document and extract its reviews.
///
/// `null` texts are treated as empty. Any other non-string text fails the
/// whole upload.
pub fn parse_upload(bytes: &[u8]) -> Result<ReviewSet, UploadError> {
    let document: Value = serde_json::from_slice(bytes).map_err(UploadError::InvalidJson)?;

    let reviews = document
        .as_object()
        .and_then(|root| root.get("reviews"))
        .ok_or(UploadError::MissingReviews)?;

    let entries = reviews.as_object().ok_or(UploadError::ReviewsNotObject)?;

    if entries.is_empty() {
        return Err(UploadError::EmptyReviews);
    }

    let mut set = ReviewSet::new();
    for (id, text) in entries {
        match text {
            Value::String(text) => set.insert(id.as_str(), text.as_str()),
            Value::Null => set.insert(id.as_str(), ""),
            other => {
                return Err(UploadError::Unexpected(format!(
                    "review '{id}' text must be a string, found {}",
                    json_type_name(other)
                )))
            }
        }
    }

    Ok(set)
}

/// Validate an upload and analyze its reviews.
pub fn analyze_upload(
    bytes: &[u8],
    scorer: &dyn SentimentScorer,
) -> Result<AnalysisResult, UploadError> {
    let reviews = parse_upload(bytes)?;
    analyze_reviews(&reviews, scorer).map_err(|e| UploadError::Unexpected(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::ScoreError;
    use test_case::test_case;

    #[test_case(br#"{"foo": {}}"#, UploadErrorKind::Structural, "REVIEWS_MISSING" ; "missing reviews")]
    #[test_case(br#"{"reviews": []}"#, UploadErrorKind::Structural, "REVIEWS_NOT_OBJECT" ; "reviews is array")]
    #[test_case(br#"{"reviews": "text"}"#, UploadErrorKind::Structural, "REVIEWS_NOT_OBJECT" ; "reviews is string")]
    #[test_case(br#"[1, 2]"#, UploadErrorKind::Structural, "REVIEWS_MISSING" ; "top level array")]
    #[test_case(b"5", UploadErrorKind::Structural, "REVIEWS_MISSING" ; "top level integer")]
    #[test_case(br#""reviews""#, UploadErrorKind::Structural, "REVIEWS_MISSING" ; "top level string")]
    #[test_case(b"null", UploadErrorKind::Structural, "REVIEWS_MISSING" ; "top level null")]
    #[test_case(br#"{"reviews": {}}"#, UploadErrorKind::EmptyInput, "REVIEWS_EMPTY" ; "empty reviews")]
    #[test_case(b"{\"reviews\": {", UploadErrorKind::Parse, "INVALID_JSON" ; "truncated")]
    #[test_case(b"\xff\xfe", UploadErrorKind::Parse, "INVALID_JSON" ; "binary")]
    #[test_case(br#"{"reviews": {"id1": 42}}"#, UploadErrorKind::Unexpected, "UNEXPECTED_ERROR" ; "numeric text")]
    fn test_rejected_uploads(input: &[u8], kind: UploadErrorKind, code: &str) {
        let err = parse_upload(input).unwrap_err();
        assert_eq!(err.kind(), kind);
        assert_eq!(err.code(), code);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            parse_upload(b"nope").unwrap_err().to_string(),
            "Invalid JSON file format."
        );
        assert_eq!(
            UploadError::MissingReviews.to_string(),
            "JSON must contain 'reviews' key."
        );
        assert_eq!(
            UploadError::ReviewsNotObject.to_string(),
            "'reviews' must be a dictionary with id:text format."
        );
        assert_eq!(UploadError::EmptyReviews.to_string(), "Review dictionary is empty.");
        assert_eq!(
            UploadError::Unexpected("boom".into()).to_string(),
            "Unexpected Error: boom"
        );
    }

    #[test]
    fn test_only_empty_is_warning() {
        assert!(UploadError::EmptyReviews.is_warning());
        assert!(!UploadError::MissingReviews.is_warning());
        assert!(!UploadError::Unexpected("x".into()).is_warning());
    }

    #[test]
    fn test_missing_key_checked_before_type() {
        // `reviews` absent wins even though nothing else is valid either.
        let err = parse_upload(br#"{"review": []}"#).unwrap_err();
        assert!(matches!(err, UploadError::MissingReviews));
    }

    #[test]
    fn test_null_text_is_empty() {
        let set = parse_upload(br#"{"reviews": {"a": null, "b": "hi"}}"#).unwrap();
        assert_eq!(set.get("a"), Some(""));
        assert_eq!(set.get("b"), Some("hi"));
    }

    #[test]
    fn test_non_string_message_names_review() {
        let err = parse_upload(br#"{"reviews": {"r7": [1]}}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected Error: review 'r7' text must be a string, found array"
        );
    }

    #[test]
    fn test_analyze_upload_maps_scorer_error() {
        let scorer =
            |_: &str| -> Result<f64, ScoreError> { Err(ScoreError::Backend("no lexicon".into())) };
        let err = analyze_upload(br#"{"reviews": {"a": "text"}}"#, &scorer).unwrap_err();
        assert_eq!(err.kind(), UploadErrorKind::Unexpected);
        assert_eq!(err.to_string(), "Unexpected Error: no lexicon");
    }
}
