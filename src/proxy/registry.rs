//! Per-feature proxy singleton registry.
//!
//! One registry owns one channel and hands out exactly one
//! [`BrowserProxy`] per feature area, constructed lazily on first
//! access. The registry is an explicit context object: tests build
//! their own over an in-process channel pair, so no global state leaks
//! between tests.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::identifiers::FeatureId;
use crate::proxy::BrowserProxy;
use crate::transport::Channel;

// ============================================================================
// ProxyRegistry
// ============================================================================

/// Registry of per-feature proxy singletons over one shared channel.
///
/// # Example
///
/// ```ignore
/// use webui_bridge::{Channel, ProxyRegistry, RawChannel};
///
/// let raw = webui_bridge::transport::socket::connect("ws://127.0.0.1:9229").await?;
/// let registry = ProxyRegistry::new(Channel::new(raw));
///
/// let sync = registry.instance("sync");
/// let also_sync = registry.instance("sync");
/// assert!(sync.same_instance(&also_sync));
/// ```
pub struct ProxyRegistry {
    /// Shared state behind registry clones.
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    /// Channel every proxy shares.
    channel: Channel,
    /// Constructed proxies by feature.
    proxies: Mutex<FxHashMap<FeatureId, BrowserProxy>>,
}

impl Clone for ProxyRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ProxyRegistry {
    /// Creates a registry over a channel.
    ///
    /// Construction is infallible and performs no I/O.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                channel,
                proxies: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    /// Returns the proxy singleton for a feature area.
    ///
    /// The first call for a feature constructs the proxy; every later
    /// call returns the same instance for the registry's lifetime.
    pub fn instance(&self, feature: impl Into<FeatureId>) -> BrowserProxy {
        let feature = feature.into();
        let mut proxies = self.inner.proxies.lock();

        proxies
            .entry(feature.clone())
            .or_insert_with(|| {
                debug!(feature = %feature, "Constructing proxy");
                BrowserProxy::new(feature.clone(), self.inner.channel.clone())
            })
            .clone()
    }

    /// Returns the number of constructed proxies.
    #[inline]
    #[must_use]
    pub fn proxy_count(&self) -> usize {
        self.inner.proxies.lock().len()
    }

    /// Returns the shared channel.
    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.inner.channel
    }

    /// Shuts down the shared channel.
    ///
    /// Every proxy's pending requests fail with
    /// [`Error::ChannelClosed`](crate::Error::ChannelClosed) and
    /// listeners stop receiving events.
    pub fn shutdown(&self) {
        self.inner.channel.shutdown();
    }
}

impl fmt::Debug for ProxyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRegistry")
            .field("proxies", &self.proxy_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
