//! Type-safe identifiers for bridge entities.
//!
//! Newtype wrappers around the raw integer and string IDs flowing
//! through the bridge, so a correlation ID can never be handed where a
//! listener ID is expected.
//!
//! | Type | Backing | Used for |
//! |------|---------|----------|
//! | [`CorrelationId`] | `u64` | Matching one response to its request |
//! | [`ListenerId`] | `u64` | Removing one listener registration |
//! | [`FeatureId`] | `String` | Keying per-feature proxy singletons |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// CorrelationId
// ============================================================================

/// Identifier correlating one request with its response.
///
/// Allocated per call from a [`CorrelationCounter`], never derived
/// from the method name. Serializes as a bare integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl CorrelationId {
    /// Creates a correlation ID from a raw integer.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// CorrelationCounter
// ============================================================================

/// Allocator handing out unique [`CorrelationId`]s for one channel.
///
/// IDs start at 1 and increment; allocation is lock-free and safe to
/// call from any task.
#[derive(Debug, Default)]
pub struct CorrelationCounter(AtomicU64);

impl CorrelationCounter {
    /// Creates a counter starting at 1.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Returns the next unused correlation ID.
    #[inline]
    pub fn next(&self) -> CorrelationId {
        CorrelationId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

// ============================================================================
// ListenerId
// ============================================================================

/// Identifier for one listener registration.
///
/// Unique per registry; the same callback registered twice gets two
/// distinct IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Creates a listener ID from a raw integer.
    #[inline]
    #[must_use]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

// ============================================================================
// FeatureId
// ============================================================================

/// Name of a feature area served by one proxy singleton.
///
/// Examples: `"new-tab"`, `"sync"`, `"rewards"`, `"vpn-panel"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Creates a feature ID from a name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the feature name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FeatureId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_counter_starts_at_one_and_increments() {
        let counter = CorrelationCounter::new();
        assert_eq!(counter.next(), CorrelationId::from_raw(1));
        assert_eq!(counter.next(), CorrelationId::from_raw(2));
        assert_eq!(counter.next(), CorrelationId::from_raw(3));
    }

    #[test]
    fn test_correlation_id_serializes_as_bare_integer() {
        let id = CorrelationId::from_raw(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let parsed: CorrelationId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_correlation_id_display() {
        assert_eq!(CorrelationId::from_raw(42).to_string(), "#42");
        assert_eq!(CorrelationId::from_raw(42).as_u64(), 42);
    }

    #[test]
    fn test_listener_ids_are_distinct() {
        let a = ListenerId::from_raw(1);
        let b = ListenerId::from_raw(2);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "listener-1");
    }

    #[test]
    fn test_feature_id_conversions() {
        let from_str = FeatureId::from("new-tab");
        let from_string = FeatureId::from("new-tab".to_string());
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.as_str(), "new-tab");
        assert_eq!(FeatureId::new("sync").to_string(), "sync");
    }
}
