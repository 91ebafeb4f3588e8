//! Export helpers for analysis results.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::aggregator::AnalysisResult;

/// File name offered for the downloaded result.
pub const DEFAULT_RESULT_FILE_NAME: &str = "sentiment_results.json";

/// Content type of the downloaded result.
pub const RESULT_MIME_TYPE: &str = "application/json";

/// An example of a valid upload.
pub const EXAMPLE_INPUT: &str = r#"{
  "reviews": {
    "id1": "I love this product!",
    "id2": "Average service",
    "id3": "Very bad experience"
  }
}"#;

impl AnalysisResult {
    /// Render as UTF-8 JSON indented with four spaces.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        into_utf8(buf)
    }
}

fn into_utf8(buf: Vec<u8>) -> Result<String, serde_json::Error> {
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::SentimentLabel;

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let mut result = AnalysisResult::default();
        result
            .sentiments
            .insert("id1".to_string(), SentimentLabel::Positive);
        result.summary.record(SentimentLabel::Positive);

        let rendered = result.to_pretty_json().unwrap();
        let expected = r#"{
    "sentiments": {
        "id1": "positive"
    },
    "summary": {
        "positive_count": 1,
        "negative_count": 0,
        "neutral_count": 0
    }
}"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_pretty_json_keeps_unicode() {
        let mut result = AnalysisResult::default();
        result
            .sentiments
            .insert("café".to_string(), SentimentLabel::Neutral);
        result.summary.record(SentimentLabel::Neutral);

        let rendered = result.to_pretty_json().unwrap();
        assert!(rendered.contains("\"café\": \"neutral\""));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = into_utf8(vec![b'{', 0xff, b'}']).unwrap_err();
        assert!(err.to_string().contains("invalid utf-8"));
        assert_eq!(into_utf8(b"{}".to_vec()).unwrap(), "{}");
    }

    #[test]
    fn test_example_input_is_valid_upload() {
        let set = crate::upload::parse_upload(EXAMPLE_INPUT.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("id2"), Some("Average service"));
    }
}
