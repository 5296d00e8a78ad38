//! Event message types.
//!
//! Events are unsolicited notifications pushed from native code to the
//! UI side. They carry no correlation ID and have no reply path;
//! delivery fans out to every listener registered for the event name,
//! in registration order.
//!
//! # Format
//!
//! ```json
//! {
//!   "type": "event",
//!   "event": "device-info-changed",
//!   "payload": [{ "id": 1 }, { "id": 2 }]
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Well-Known Event Names
// ============================================================================

/// Sync device list changed.
pub const DEVICE_INFO_CHANGED: &str = "device-info-changed";

/// Sync setup reported an error.
pub const SYNC_SETUP_ERROR: &str = "sync-setup-error";

/// Rewards parameters were refreshed.
pub const REWARDS_PARAMETERS_UPDATED: &str = "rewards-parameters-updated";

/// VPN tunnel state changed.
pub const VPN_CONNECTION_STATE_CHANGED: &str = "vpn-connection-state-changed";

/// VPN purchase/credential state changed.
pub const VPN_PURCHASED_STATE_CHANGED: &str = "vpn-purchased-state-changed";

// ============================================================================
// Event
// ============================================================================

/// An unsolicited notification from native code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Message type marker (always `"event"`).
    #[serde(rename = "type")]
    pub message_type: String,

    /// Event name listeners key on.
    pub event: String,

    /// Event-specific data.
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    /// Creates a new event.
    #[inline]
    #[must_use]
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            message_type: "event".to_string(),
            event: event.into(),
            payload,
        }
    }

    /// Returns `true` if the type marker is well-formed.
    #[inline]
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.message_type == "event"
    }
}

// ============================================================================
// Tests
// ============================================================================
