//! WebUI bridge - promise-style browser proxy over native messaging.
//!
//! This library provides the client-side RPC facade WebUI feature code
//! uses to talk to privileged native browser code: one-shot requests
//! resolved as futures, fire-and-forget commands, and persistent event
//! listeners - all over a host-provided messaging channel.
//!
//! # Architecture
//!
//! The bridge follows a local/remote model:
//!
//! - **UI side (this crate)**: issues requests, receives responses and
//!   events over a frame pipe
//! - **Native side (external)**: the privileged browser code that
//!   implements settings, sync, rewards, vpn, and answers requests
//!
//! Key design principles:
//!
//! - Responses are correlated per call, never per method name: two
//!   concurrent requests to the same method cannot swap results
//! - Fire-and-forget commands have no delivery feedback, by contract
//! - Listener registration is scoped: handles unregister on drop, so
//!   repeated UI mounts cannot leak callbacks
//! - Singletons live in an explicit [`ProxyRegistry`], not in module
//!   globals, so tests substitute a fake channel per test
//!
//! # Quick Start
//!
//! ```no_run
//! use serde_json::json;
//! use webui_bridge::{Channel, ProxyRegistry, Result, transport::socket};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Bind to the native host and build the registry
//!     let raw = socket::connect("ws://127.0.0.1:9229").await?;
//!     let registry = ProxyRegistry::new(Channel::new(raw));
//!
//!     // Per-feature proxy singleton
//!     let proxy = registry.instance("new-tab");
//!
//!     // Promise-style request
//!     let text = proxy
//!         .send_with_promise("getPluralString", vec![json!("itemsKey"), json!(5)])
//!         .await?;
//!     println!("{text}");
//!
//!     // Persistent event listener
//!     let handle = proxy.add_listener("device-info-changed", |devices| {
//!         println!("devices now: {devices}");
//!     });
//!     handle.detach();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`listeners`] | Listener registry and scoped handles |
//! | [`protocol`] | Wire message types and typed commands |
//! | [`proxy`] | [`BrowserProxy`] facade and [`ProxyRegistry`] |
//! | [`transport`] | Channel dispatch loop and socket binding |

// ============================================================================
// Modules
// ============================================================================

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for bridge entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Listener registry for native-to-UI event dispatch.
pub mod listeners;

/// Wire message types for the native messaging channel.
pub mod protocol;

/// The facade layer: per-feature proxies and their registry.
pub mod proxy;

/// Native messaging transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Facade types
pub use proxy::{BrowserProxy, ProxyRegistry};

// Listener types
pub use listeners::{ListenerHandle, ListenerRegistry};

// Transport types
pub use transport::{Channel, ChannelOptions, NativeEnd, RawChannel};

// Protocol types
pub use protocol::{
    Command, Event, Request, Response, RewardsCommand, StringsCommand, SyncCommand, VpnCommand,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{CorrelationId, FeatureId, ListenerId};
