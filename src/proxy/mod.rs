//! The facade layer: per-feature proxies and their registry.
//!
//! This is the surface feature UI code depends on. It never touches
//! the raw channel primitives; everything goes through
//! [`BrowserProxy`] and the [`ProxyRegistry`] that owns the
//! singletons.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | The [`BrowserProxy`] facade |
//! | `registry` | Per-feature singleton registry |

// ============================================================================
// Submodules
// ============================================================================

/// The BrowserProxy facade.
pub mod core;

/// Per-feature proxy singleton registry.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::BrowserProxy;
pub use self::registry::ProxyRegistry;
