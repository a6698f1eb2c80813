//! Request DTOs for the tiered store API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the record operation (PUT /record)
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRequest {
    /// The key to store the value under
    pub key: String,
    /// The value to store
    pub value: String,
}

impl RecordRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request_deserialize() {
        let json = r#"{"key": "111", "value": "aaa"}"#;
        let req: RecordRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "111");
        assert_eq!(req.value, "aaa");
    }

    #[test]
    fn test_record_request_requires_value() {
        let json = r#"{"key": "111"}"#;
        assert!(serde_json::from_str::<RecordRequest>(json).is_err());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = RecordRequest {
            key: "".to_string(),
            value: "test".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_key_too_long() {
        let req = RecordRequest {
            key: "x".repeat(MAX_KEY_LENGTH + 1),
            value: "test".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_empty_value_is_allowed() {
        let req = RecordRequest {
            key: "valid_key".to_string(),
            value: "".to_string(),
        };
        assert!(req.validate().is_none());
    }
}
