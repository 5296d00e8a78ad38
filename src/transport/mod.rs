//! Native messaging transport layer.
//!
//! This module carries frames between the UI side (this crate) and the
//! privileged native side, and correlates responses to the requests
//! that caused them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                          ┌──────────────────┐
//! │  BrowserProxy    │   RawChannel (frames)    │  Native host     │
//! │                  │◄────────────────────────►│                  │
//! │  Channel         │   in-process pair, or    │  settings, sync, │
//! │  (dispatch loop) │   WebSocket binding      │  rewards, vpn …  │
//! └──────────────────┘                          └──────────────────┘
//! ```
//!
//! # Channel Lifecycle
//!
//! 1. Obtain a [`RawChannel`]: [`RawChannel::pair`] in-process, or
//!    [`socket::connect`] / [`socket::SocketHost`] out-of-process
//! 2. [`Channel::new`] spawns the dispatch loop
//! 3. Requests, fire-and-forget commands, and events flow
//! 4. [`Channel::shutdown`] (or the native side hanging up) tears it down
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Channel core and dispatch loop |
//! | `socket` | WebSocket binding for out-of-process hosts |

// ============================================================================
// Submodules
// ============================================================================

/// Channel core and dispatch loop.
pub mod channel;

/// WebSocket binding for out-of-process native hosts.
pub mod socket;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{Channel, ChannelOptions, NativeEnd, RawChannel};
pub use socket::SocketHost;
