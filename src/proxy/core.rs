//! The BrowserProxy facade.
//!
//! Feature UI code talks to native browser code exclusively through
//! this type: one-shot promise-style requests, fire-and-forget
//! commands, and scoped event listener registration. Nothing above
//! this layer touches the raw channel primitives.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::identifiers::FeatureId;
use crate::listeners::{ListenerHandle, ListenerRegistry};
use crate::protocol::Command;
use crate::transport::Channel;

// ============================================================================
// BrowserProxy
// ============================================================================

/// Per-feature facade over the native messaging channel.
///
/// Obtained from a [`ProxyRegistry`](crate::proxy::ProxyRegistry);
/// clones share the same underlying instance, so a feature area sees
/// exactly one proxy per registry lifetime.
///
/// # Example
///
/// ```ignore
/// use serde_json::json;
/// use webui_bridge::{ProxyRegistry, StringsCommand};
///
/// let proxy = registry.instance("new-tab");
///
/// // Typed request
/// let text = proxy
///     .call(StringsCommand::GetPluralString { key: "itemsKey".into(), count: 5 })
///     .await?;
///
/// // Fire-and-forget command
/// proxy.send("recordP3A", vec![json!("Brave.NTP.CustomizeUsageStatus"), json!(2)]);
/// ```
#[derive(Clone)]
pub struct BrowserProxy {
    inner: Arc<ProxyInner>,
}

/// Shared state behind proxy clones.
struct ProxyInner {
    /// Feature area this proxy serves.
    feature: FeatureId,
    /// Shared channel to native code.
    channel: Channel,
}

impl BrowserProxy {
    /// Creates a proxy for a feature area over a channel.
    ///
    /// Construction is infallible and performs no I/O; the channel
    /// binding already exists.
    #[must_use]
    pub fn new(feature: FeatureId, channel: Channel) -> Self {
        Self {
            inner: Arc::new(ProxyInner { feature, channel }),
        }
    }

    /// Returns the feature area this proxy serves.
    #[inline]
    #[must_use]
    pub fn feature(&self) -> &FeatureId {
        &self.inner.feature
    }

    /// Returns `true` if two handles refer to the same instance.
    #[inline]
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Issues a named request and resolves with the native response.
    ///
    /// Each call gets its own independent resolution: concurrent calls
    /// to the same method are correlated per call, never per method
    /// name.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelClosed`](crate::Error::ChannelClosed) if the channel is torn down
    /// - [`Error::UnknownMethod`](crate::Error::UnknownMethod) if no native handler exists
    /// - [`Error::Native`](crate::Error::Native) if the native handler reported failure
    /// - [`Error::RequestTimeout`](crate::Error::RequestTimeout) if no response arrives in time
    pub async fn send_with_promise(
        &self,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<Value> {
        self.inner.channel.request(method, args).await
    }

    /// Issues a typed request from the closed command vocabulary.
    ///
    /// # Errors
    ///
    /// Same as [`BrowserProxy::send_with_promise`].
    pub async fn call(&self, command: impl Into<Command>) -> Result<Value> {
        let command = command.into();
        let method = command.method();
        self.send_with_promise(method, command.into_args()).await
    }

    /// Sends a fire-and-forget command.
    ///
    /// Returns control before any native round trip; there is no
    /// delivery feedback by design, and calling on a torn-down channel
    /// is a silent no-op.
    pub fn send(&self, method: impl Into<String>, args: Vec<Value>) {
        self.inner.channel.fire(method, args);
    }

    /// Registers a callback for a native event.
    ///
    /// Callbacks for one event name run in registration order.
    /// Registering the same callback twice yields two invocations per
    /// event. The returned handle unregisters on drop; call
    /// [`ListenerHandle::detach`] to keep the registration for the
    /// channel lifetime.
    pub fn add_listener(
        &self,
        event: impl Into<String>,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> ListenerHandle {
        let event = event.into();
        let registry = self.inner.channel.listeners();
        let id = registry.add(event.clone(), Arc::new(callback));
        ListenerHandle::new(registry, event, id)
    }

    /// Returns the shared listener registry.
    #[inline]
    #[must_use]
    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        self.inner.channel.listeners()
    }

    /// Returns the underlying channel.
    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.inner.channel
    }
}

impl fmt::Debug for BrowserProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserProxy")
            .field("feature", &self.inner.feature)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
