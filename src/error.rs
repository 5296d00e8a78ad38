//! Error types for the WebUI bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webui_bridge::{BrowserProxy, Result};
//!
//! async fn example(proxy: &BrowserProxy) -> Result<()> {
//!     let code = proxy.send_with_promise("getSyncCode", vec![]).await?;
//!     println!("{code}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Channel | [`Error::ChannelClosed`], [`Error::Channel`], [`Error::ConnectTimeout`] |
//! | Native | [`Error::Native`], [`Error::UnknownMethod`] |
//! | Protocol | [`Error::Protocol`], [`Error::RequestTimeout`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::ChannelRecv`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::CorrelationId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging. Errors that
/// reach a caller of `send_with_promise` are exactly the promise
/// rejections the facade contract defines; fire-and-forget paths never
/// produce them.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Channel Errors
    // ========================================================================
    /// Channel setup or I/O failed.
    ///
    /// Returned when the native binding cannot be established.
    #[error("Channel error: {message}")]
    Channel {
        /// Description of the channel failure.
        message: String,
    },

    /// Channel torn down or never established.
    ///
    /// Pending requests fail with this when the dispatch loop exits.
    #[error("Channel closed")]
    ChannelClosed,

    /// Timed out waiting for the native host to connect.
    #[error("Connect timeout after {timeout_ms}ms")]
    ConnectTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Native Errors
    // ========================================================================
    /// Native handler reported a failure.
    ///
    /// Carries the method name and the opaque native error descriptor,
    /// so callers can render a meaningful "unavailable" state.
    #[error("Native error in {method}: {code}: {message}")]
    Native {
        /// Method the request named.
        method: String,
        /// Opaque native error code.
        code: String,
        /// Human-readable native message.
        message: String,
    },

    /// No native handler registered for the method.
    ///
    /// Distinct from [`Error::Native`] so callers can tell "feature not
    /// available" from a transient failure.
    #[error("Unknown method: {method}")]
    UnknownMethod {
        /// The unrecognized method name.
        method: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected wire traffic.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Request response not received within the timeout.
    #[error("Request {correlation_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The correlation ID that timed out.
        correlation_id: CorrelationId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Response channel dropped before a value arrived.
    #[error("Response channel closed")]
    ChannelRecv(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a channel error.
    #[inline]
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Creates a connect timeout error.
    #[inline]
    pub fn connect_timeout(timeout_ms: u64) -> Self {
        Self::ConnectTimeout { timeout_ms }
    }

    /// Creates a native error.
    #[inline]
    pub fn native(
        method: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Native {
            method: method.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown method error.
    #[inline]
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            method: method.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(correlation_id: CorrelationId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            correlation_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a channel-level error.
    #[inline]
    #[must_use]
    pub fn is_channel_error(&self) -> bool {
        matches!(
            self,
            Self::Channel { .. }
                | Self::ChannelClosed
                | Self::ConnectTimeout { .. }
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the failure came from the native side.
    #[inline]
    #[must_use]
    pub fn is_native_error(&self) -> bool {
        matches!(self, Self::Native { .. } | Self::UnknownMethod { .. })
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout { .. } | Self::RequestTimeout { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::channel("binding refused");
        assert_eq!(err.to_string(), "Channel error: binding refused");
    }

    #[test]
    fn test_native_error_display() {
        let err = Error::native("getSyncCode", "E_DENIED", "not privileged");
        assert_eq!(
            err.to_string(),
            "Native error in getSyncCode: E_DENIED: not privileged"
        );
    }

    #[test]
    fn test_unknown_method_display() {
        let err = Error::unknown_method("doesNotExist");
        assert_eq!(err.to_string(), "Unknown method: doesNotExist");
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::request_timeout(CorrelationId::from_raw(1), 5000);
        let other_err = Error::channel("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_channel_error() {
        assert!(Error::channel("test").is_channel_error());
        assert!(Error::ChannelClosed.is_channel_error());
        assert!(Error::connect_timeout(1000).is_channel_error());
        assert!(!Error::protocol("test").is_channel_error());
    }

    #[test]
    fn test_is_native_error() {
        assert!(Error::native("m", "c", "msg").is_native_error());
        assert!(Error::unknown_method("m").is_native_error());
        assert!(!Error::ChannelClosed.is_native_error());
    }

    #[test]
    fn test_is_recoverable() {
        let timeout_err = Error::request_timeout(CorrelationId::from_raw(9), 1000);
        let native_err = Error::unknown_method("m");

        assert!(timeout_err.is_recoverable());
        assert!(!native_err.is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
