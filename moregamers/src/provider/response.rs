//! Metadata response model.
//!
//! The ad server answers the metadata request with a JSON object that has
//! been serialized a second time as a JSON string: the body arrives wrapped
//! in double quotes with every inner quote escaped. [`sanitize_body`] undoes
//! that before the body is handed to `serde_json`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::shape::BannerShape;

/// Errors produced while turning a metadata body into an [`AdResponse`].
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Body was not valid JSON after sanitizing.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Body parsed but was not a JSON object.
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The server reported an error in the `error` field.
    #[error("Ad server reported an error: {0}")]
    Api(String),

    /// A required field was missing or not a string.
    #[error("Malformed ad response: {0}")]
    Malformed(serde_json::Error),
}

/// Immutable description of one ad, as returned by the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdResponse {
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(rename = "landscape_image")]
    pub landscape_image_url: String,
    #[serde(rename = "portrait_image")]
    pub portrait_image_url: String,
    #[serde(rename = "click")]
    pub click_url: String,
    #[serde(rename = "tracking")]
    pub tracking_url: String,
}

impl AdResponse {
    /// Build a response from an already-parsed mapping.
    ///
    /// All five URL fields are mandatory strings; extra keys are ignored.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, ResponseError> {
        serde_json::from_value(Value::Object(map)).map_err(ResponseError::Malformed)
    }

    /// The image URL served for `shape`: landscape for square banners,
    /// portrait for rectangles.
    pub fn image_url_for(&self, shape: BannerShape) -> &str {
        match shape {
            BannerShape::Square => &self.landscape_image_url,
            BannerShape::Rectangle => &self.portrait_image_url,
        }
    }

    /// Sanitize, parse and validate a raw metadata body.
    pub fn parse(body: &[u8]) -> Result<Self, ResponseError> {
        let text = String::from_utf8_lossy(body);
        let map = parse_object(&sanitize_body(&text))?;
        check_error_field(&map)?;
        Self::from_map(map)
    }
}

fn sanitize_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Leading quote, trailing quote, or any backslash.
    PATTERN.get_or_init(|| Regex::new(r#"(^")|("$)|(\\)"#).unwrap())
}

/// Strip the outer quotes and all backslashes from a metadata body.
pub fn sanitize_body(raw: &str) -> String {
    sanitize_pattern().replace_all(raw, "").into_owned()
}

/// Parse sanitized text into a key/value mapping.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, ResponseError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(ResponseError::NotAnObject(json_type_name(&other))),
    }
}

/// Accept the mapping only if its `error` field reads `false`.
///
/// The comparison is case-insensitive and a boolean `false` counts too.
/// A missing field is treated as an error report.
pub fn check_error_field(map: &Map<String, Value>) -> Result<(), ResponseError> {
    match map.get("error") {
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(()),
        Some(Value::Bool(false)) => Ok(()),
        Some(Value::String(s)) => Err(ResponseError::Api(s.clone())),
        Some(other) => Err(ResponseError::Api(other.to_string())),
        None => Err(ResponseError::Api("missing 'error' field".to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CLEAN: &str = r#"{"error":"false","image":"i","landscape_image":"L1","portrait_image":"P1","click":"C","tracking":"T"}"#;

    #[test]
    fn test_parse_clean_body() {
        let response = AdResponse::parse(CLEAN.as_bytes()).unwrap();
        assert_eq!(response.image_url, "i");
        assert_eq!(response.landscape_image_url, "L1");
        assert_eq!(response.portrait_image_url, "P1");
        assert_eq!(response.click_url, "C");
        assert_eq!(response.tracking_url, "T");
    }

    #[test]
    fn test_image_url_for_shape() {
        let response = AdResponse::parse(CLEAN.as_bytes()).unwrap();
        assert_eq!(response.image_url_for(BannerShape::Square), "L1");
        assert_eq!(response.image_url_for(BannerShape::Rectangle), "P1");
    }

    #[test]
    fn test_parse_double_encoded_body() {
        let wire = r#""{\"error\":\"False\",\"image\":\"i\",\"landscape_image\":\"https://cdn.example/l.png\",\"portrait_image\":\"https://cdn.example/p.png\",\"click\":\"https://click.example\",\"tracking\":\"https://track.example\"}""#;
        let response = AdResponse::parse(wire.as_bytes()).unwrap();
        assert_eq!(response.landscape_image_url, "https://cdn.example/l.png");
        assert_eq!(response.click_url, "https://click.example");
    }

    #[test]
    fn test_sanitize_only_strips_outer_quotes() {
        assert_eq!(sanitize_body(r#""{\"a\":\"b\"}""#), r#"{"a":"b"}"#);
        assert_eq!(sanitize_body(r#"{"a":"b"}"#), r#"{"a":"b"}"#);
    }

    #[test]
    fn test_error_true_is_api_error() {
        let body = r#"{"error":"true","image":"i","landscape_image":"L","portrait_image":"P","click":"C","tracking":"T"}"#;
        match AdResponse::parse(body.as_bytes()) {
            Err(ResponseError::Api(msg)) => assert_eq!(msg, "true"),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_boolean_false_is_accepted() {
        let body = r#"{"error":false,"image":"i","landscape_image":"L","portrait_image":"P","click":"C","tracking":"T"}"#;
        assert!(AdResponse::parse(body.as_bytes()).is_ok());
    }

    #[test]
    fn test_missing_error_field_is_api_error() {
        let body = r#"{"image":"i","landscape_image":"L","portrait_image":"P","click":"C","tracking":"T"}"#;
        assert!(matches!(
            AdResponse::parse(body.as_bytes()),
            Err(ResponseError::Api(_))
        ));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let body = r#"{"error":"false","image":"i","landscape_image":"L","click":"C","tracking":"T"}"#;
        match AdResponse::parse(body.as_bytes()) {
            Err(ResponseError::Malformed(e)) => {
                assert!(e.to_string().contains("portrait_image"))
            }
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_field_is_malformed() {
        let body = r#"{"error":"false","image":"i","landscape_image":"L","portrait_image":"P","click":42,"tracking":"T"}"#;
        assert!(matches!(
            AdResponse::parse(body.as_bytes()),
            Err(ResponseError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AdResponse::parse(b"<html>502 Bad Gateway</html>"),
            Err(ResponseError::Json(_))
        ));
    }

    #[test]
    fn test_non_object_json() {
        match AdResponse::parse(b"[1,2,3]") {
            Err(ResponseError::NotAnObject(kind)) => assert_eq!(kind, "an array"),
            other => panic!("Expected NotAnObject, got {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_sanitized_body_has_no_backslashes(raw in ".*") {
            prop_assert!(!sanitize_body(&raw).contains('\\'));
        }

        #[test]
        fn prop_sanitize_is_identity_without_quotes_or_backslashes(raw in "[^\"\\\\]*") {
            prop_assert_eq!(sanitize_body(&raw), raw);
        }
    }
}
