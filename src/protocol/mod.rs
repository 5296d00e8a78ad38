//! Wire message types for the native messaging channel.
//!
//! This module defines the message formats exchanged between the UI
//! side (this crate) and native browser code.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`Request`] | UI → Native | Correlated one-shot request |
//! | [`Response`] | Native → UI | Resolves exactly one request |
//! | [`Event`] | Native → UI | Unsolicited push notification |
//!
//! Fire-and-forget commands reuse the [`Request`] shape with a
//! correlation ID the UI side never waits on; the native side sends no
//! response for them.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `method` | Typed command vocabulary by feature area |
//! | `event` | Event types and well-known event names |
//! | `request` | Request and Response types |

// ============================================================================
// Submodules
// ============================================================================

/// Typed command definitions organized by feature area.
pub mod method;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::Event;
pub use method::{Command, RewardsCommand, StringsCommand, SyncCommand, VpnCommand};
pub use request::{Request, Response, ResponseType, UNKNOWN_METHOD_CODE};

// ============================================================================
// InboundMessage
// ============================================================================

/// Any message the native side may send.
///
/// Responses carry a correlation `id` and a `success`/`error` type tag;
/// events carry the `event` type tag and no id, so the two shapes never
/// overlap and untagged deserialization is unambiguous.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InboundMessage {
    /// Correlated response to a pending request.
    Response(Response),
    /// Unsolicited event notification.
    Event(Event),
}

impl InboundMessage {
    /// Parses an inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the frame matches neither shape.
    pub fn parse(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_response() {
        let msg = InboundMessage::parse(r#"{"id":7,"type":"success","result":"5 items"}"#)
            .expect("parse");

        match msg {
            InboundMessage::Response(response) => {
                assert!(response.is_success());
                assert_eq!(response.id.as_u64(), 7);
            }
            InboundMessage::Event(_) => panic!("expected response"),
        }
    }

    #[test]
    fn test_inbound_event() {
        let msg = InboundMessage::parse(
            r#"{"type":"event","event":"device-info-changed","payload":[]}"#,
        )
        .expect("parse");

        match msg {
            InboundMessage::Event(event) => {
                assert_eq!(event.event, "device-info-changed");
            }
            InboundMessage::Response(_) => panic!("expected event"),
        }
    }

    #[test]
    fn test_inbound_garbage_rejected() {
        assert!(InboundMessage::parse("not json").is_err());
        assert!(InboundMessage::parse(r#"{"hello":"world"}"#).is_err());
    }
}
