//! Request and Response message types.
//!
//! Defines the message format for one-shot requests from the UI side
//! and the correlated responses the native side sends back.
//!
//! # Format
//!
//! Request:
//! ```json
//! { "id": 7, "method": "getPluralString", "args": ["itemsKey", 5] }
//! ```
//!
//! Success response:
//! ```json
//! { "id": 7, "type": "success", "result": "5 items" }
//! ```
//!
//! Error response:
//! ```json
//! { "id": 7, "type": "error", "error": "unknown-method", "message": "..." }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::CorrelationId;

// ============================================================================
// Constants
// ============================================================================

/// Native error code reported when no handler exists for a method.
pub const UNKNOWN_METHOD_CODE: &str = "unknown-method";

// ============================================================================
// Request
// ============================================================================

/// A one-shot request from the UI side to native code.
///
/// The correlation ID appears in exactly one response; concurrent
/// requests to the same method carry distinct IDs and never share a
/// resolution path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: CorrelationId,

    /// Method name the native side dispatches on.
    pub method: String,

    /// Positional JSON arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Request {
    /// Creates a new request.
    #[inline]
    #[must_use]
    pub fn new(id: CorrelationId, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id,
            method: method.into(),
            args,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A correlated response from native code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: CorrelationId,

    /// Response type discriminator.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data (if success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Native error code (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Native error message (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// Creates a success response.
    #[inline]
    #[must_use]
    pub fn success(id: CorrelationId, result: Value) -> Self {
        Self {
            id,
            response_type: ResponseType::Success,
            result: Some(result),
            error: None,
            message: None,
        }
    }

    /// Creates an error response.
    #[inline]
    #[must_use]
    pub fn failure(id: CorrelationId, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            response_type: ResponseType::Error,
            result: None,
            error: Some(code.into()),
            message: Some(message.into()),
        }
    }

    /// Creates an unknown-method error response.
    #[inline]
    #[must_use]
    pub fn unknown_method(id: CorrelationId, method: &str) -> Self {
        Self::failure(
            id,
            UNKNOWN_METHOD_CODE,
            format!("no handler for '{method}'"),
        )
    }

    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }

    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.response_type == ResponseType::Error
    }

    /// Extracts the result value, mapping error responses to crate errors.
    ///
    /// The method name is threaded through so rejections identify the
    /// call that failed.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMethod`] if the native side had no handler
    /// - [`Error::Native`] for any other native failure
    pub fn into_result(self, method: &str) -> Result<Value> {
        match self.response_type {
            ResponseType::Success => Ok(self.result.unwrap_or(Value::Null)),
            ResponseType::Error => {
                let code = self.error.unwrap_or_else(|| "unknown".to_string());
                if code == UNKNOWN_METHOD_CODE {
                    return Err(Error::unknown_method(method));
                }
                let message = self.message.unwrap_or_else(|| code.clone());
                Err(Error::native(method, code, message))
            }
        }
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Successful response.
    Success,
    /// Error response.
    Error,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = Request::new(
            CorrelationId::from_raw(7),
            "getPluralString",
            vec![json!("itemsKey"), json!(5)],
        );
        let json = serde_json::to_string(&request).expect("serialize");

        assert!(json.contains("\"id\":7"));
        assert!(json.contains("getPluralString"));
        assert!(json.contains("itemsKey"));
    }

    #[test]
    fn test_request_empty_args_roundtrip() {
        let parsed: Request = serde_json::from_str(r#"{"id":3,"method":"getSyncCode"}"#)
            .expect("parse without args");
        assert_eq!(parsed.method, "getSyncCode");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_success_response() {
        let json_str = r#"{"id":7,"type":"success","result":"5 items"}"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_success());
        assert!(!response.is_error());
        assert_eq!(
            response.into_result("getPluralString").expect("ok"),
            json!("5 items")
        );
    }

    #[test]
    fn test_success_response_null_result() {
        let json_str = r#"{"id":1,"type":"success"}"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert_eq!(response.into_result("setSyncEnabled").expect("ok"), Value::Null);
    }

    #[test]
    fn test_error_response() {
        let json_str = r#"{
            "id": 9,
            "type": "error",
            "error": "E_DENIED",
            "message": "page not privileged"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_error());

        let err = response.into_result("getSyncCode").unwrap_err();
        match err {
            Error::Native { method, code, message } => {
                assert_eq!(method, "getSyncCode");
                assert_eq!(code, "E_DENIED");
                assert_eq!(message, "page not privileged");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_method_response() {
        let response =
            Response::unknown_method(CorrelationId::from_raw(2), "doesNotExist");

        let err = response.into_result("doesNotExist").unwrap_err();
        assert!(matches!(err, Error::UnknownMethod { method } if method == "doesNotExist"));
    }

    #[test]
    fn test_failure_constructor_roundtrip() {
        let response = Response::failure(CorrelationId::from_raw(4), "E_ARGS", "bad count");
        let json = serde_json::to_string(&response).expect("serialize");
        let back: Response = serde_json::from_str(&json).expect("parse");

        assert!(back.is_error());
        assert_eq!(back.error.as_deref(), Some("E_ARGS"));
        assert_eq!(back.message.as_deref(), Some("bad count"));
        assert!(back.result.is_none());
    }
}
