//! Channel core and dispatch loop.
//!
//! This module wraps the host-provided native messaging pipe with
//! request/response correlation and event routing.
//!
//! # Dispatch Loop
//!
//! Each [`Channel`] spawns one tokio task that handles:
//!
//! - Incoming frames from the native side (responses, events)
//! - Outgoing requests and fire-and-forget commands from the facade
//! - Request/response correlation by per-call [`CorrelationId`]
//! - Event fan-out through the shared [`ListenerRegistry`]
//!
//! Correlation is per call, never per method name: two concurrent
//! requests to the same method hold distinct IDs, so out-of-order
//! responses still resolve the caller that issued them.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, to_string};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{CorrelationCounter, CorrelationId};
use crate::listeners::ListenerRegistry;
use crate::protocol::{Event, InboundMessage, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for one-shot requests.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum pending requests before rejecting new ones.
const DEFAULT_MAX_PENDING: usize = 128;

// ============================================================================
// Types
// ============================================================================

/// Map of correlation IDs to the method name and response channel of
/// the call that registered them.
type CorrelationMap = FxHashMap<CorrelationId, PendingRequest>;

/// Bookkeeping for one in-flight request.
struct PendingRequest {
    /// Method name, for rejection context.
    method: String,
    /// Resolves the caller's future.
    response_tx: oneshot::Sender<Result<Response>>,
}

// ============================================================================
// ChannelOptions
// ============================================================================

/// Channel tuning knobs.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use webui_bridge::ChannelOptions;
///
/// let options = ChannelOptions::new()
///     .with_request_timeout(Duration::from_secs(5))
///     .with_max_pending(32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOptions {
    /// Maximum time to wait for a response.
    pub request_timeout: Duration,

    /// Maximum in-flight requests before new ones are rejected.
    pub max_pending: usize,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelOptions {
    /// Creates options with default settings (30s timeout, 128 pending).
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }

    /// Sets the request timeout.
    #[inline]
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sets the pending request cap.
    #[inline]
    #[must_use]
    pub const fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }
}

// ============================================================================
// RawChannel / NativeEnd
// ============================================================================

/// The host-provided duplex message pipe: serialized frames out to the
/// native side, serialized frames in from it.
///
/// Embedders that talk to an out-of-process native host build one with
/// [`socket::connect`](crate::transport::socket::connect); tests build
/// an in-process pair with [`RawChannel::pair`].
pub struct RawChannel {
    /// Frames to the native side.
    pub(crate) outbound: mpsc::UnboundedSender<String>,
    /// Frames from the native side.
    pub(crate) inbound: mpsc::UnboundedReceiver<String>,
}

impl RawChannel {
    /// Creates a raw channel from its two halves.
    #[inline]
    #[must_use]
    pub fn new(
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self { outbound, inbound }
    }

    /// Creates an in-process pipe pair: the UI half and the native half.
    #[must_use]
    pub fn pair() -> (Self, NativeEnd) {
        let (to_native, from_ui) = mpsc::unbounded_channel();
        let (to_ui, from_native) = mpsc::unbounded_channel();

        let raw = Self::new(to_native, from_native);
        let native = NativeEnd { from_ui, to_ui };
        (raw, native)
    }
}

impl std::fmt::Debug for RawChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawChannel").finish_non_exhaustive()
    }
}

/// The native half of an in-process pipe pair.
///
/// Stands in for the privileged browser side: reads requests the UI
/// sent, answers them, and pushes events. Used by tests and by
/// embedders faking a native host.
pub struct NativeEnd {
    /// Frames the UI side sent.
    from_ui: mpsc::UnboundedReceiver<String>,
    /// Frames to deliver to the UI side.
    to_ui: mpsc::UnboundedSender<String>,
}

impl NativeEnd {
    /// Receives the next request frame from the UI side.
    ///
    /// Returns `None` once the UI side is gone.
    pub async fn next_request(&mut self) -> Option<Request> {
        loop {
            let frame = self.from_ui.recv().await?;
            match serde_json::from_str::<Request>(&frame) {
                Ok(request) => return Some(request),
                Err(e) => {
                    warn!(error = %e, frame = %frame, "Unparseable frame from UI side");
                }
            }
        }
    }

    /// Sends a response back to the UI side.
    pub fn respond(&self, response: &Response) {
        if let Ok(json) = to_string(response) {
            let _ = self.to_ui.send(json);
        }
    }

    /// Pushes an event to the UI side.
    pub fn emit(&self, event: impl Into<String>, payload: Value) {
        let event = Event::new(event, payload);
        if let Ok(json) = to_string(&event) {
            let _ = self.to_ui.send(json);
        }
    }

    /// Delivers a raw frame verbatim, bypassing serialization.
    pub fn send_raw(&self, frame: impl Into<String>) {
        let _ = self.to_ui.send(frame.into());
    }

    /// Tears the channel down from the native side.
    pub fn hang_up(self) {}
}

impl std::fmt::Debug for NativeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeEnd").finish_non_exhaustive()
    }
}

// ============================================================================
// ChannelCommand
// ============================================================================

/// Internal commands for the dispatch loop.
enum ChannelCommand {
    /// Send a request and wait for response.
    Request {
        request: Request,
        pending: PendingRequest,
    },
    /// Send a command with no response channel.
    Fire { request: Request },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(CorrelationId),
    /// Shut the channel down.
    Shutdown,
}

// ============================================================================
// Channel
// ============================================================================

/// Correlated request/response and event routing over a [`RawChannel`].
///
/// Spawns an internal dispatch task on creation. Construction performs
/// no I/O beyond that spawn and cannot fail.
///
/// # Thread Safety
///
/// `Channel` is `Send + Sync` and cheap to clone; clones share the
/// dispatch loop, correlation map, and listener registry.
pub struct Channel {
    /// Commands to the dispatch loop.
    command_tx: mpsc::UnboundedSender<ChannelCommand>,
    /// Correlation map (shared with the dispatch loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Listener registry (shared with the dispatch loop).
    listeners: Arc<ListenerRegistry>,
    /// Per-channel correlation ID allocator.
    counter: Arc<CorrelationCounter>,
    /// Tuning knobs.
    options: ChannelOptions,
}

impl Clone for Channel {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            correlation: Arc::clone(&self.correlation),
            listeners: Arc::clone(&self.listeners),
            counter: Arc::clone(&self.counter),
            options: self.options,
        }
    }
}

impl Channel {
    /// Creates a channel with default options.
    #[must_use]
    pub fn new(raw: RawChannel) -> Self {
        Self::with_options(raw, ChannelOptions::default())
    }

    /// Creates a channel with explicit options.
    ///
    /// Spawns the dispatch loop task internally.
    #[must_use]
    pub fn with_options(raw: RawChannel, options: ChannelOptions) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation: Arc<Mutex<CorrelationMap>> = Arc::new(Mutex::new(FxHashMap::default()));
        let listeners = Arc::new(ListenerRegistry::new());

        tokio::spawn(Self::run_dispatch_loop(
            raw,
            command_rx,
            Arc::clone(&correlation),
            Arc::clone(&listeners),
            options,
        ));

        Self {
            command_tx,
            correlation,
            listeners,
            counter: Arc::new(CorrelationCounter::new()),
            options,
        }
    }

    /// Returns the shared listener registry.
    #[inline]
    #[must_use]
    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }

    /// Returns the number of in-flight requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Returns `true` if the dispatch loop is gone.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// Sends a request and waits for the correlated response.
    ///
    /// Uses the channel's configured timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelClosed`] if the channel is torn down
    /// - [`Error::UnknownMethod`] if no native handler exists
    /// - [`Error::Native`] if the native handler reported failure
    /// - [`Error::RequestTimeout`] if no response arrives in time
    /// - [`Error::Protocol`] if the pending cap is exceeded
    pub async fn request(&self, method: impl Into<String>, args: Vec<Value>) -> Result<Value> {
        self.request_with_timeout(method, args, self.options.request_timeout)
            .await
    }

    /// Sends a request and waits for the response with a custom timeout.
    ///
    /// # Errors
    ///
    /// Same as [`Channel::request`].
    pub async fn request_with_timeout(
        &self,
        method: impl Into<String>,
        args: Vec<Value>,
        request_timeout: Duration,
    ) -> Result<Value> {
        let method = method.into();

        // Fast-path cap check. Callers racing past it are still caught
        // by the authoritative check on the loop task, which owns
        // insertion.
        {
            let correlation = self.correlation.lock();
            if correlation.len() >= self.options.max_pending {
                warn!(
                    pending = correlation.len(),
                    max = self.options.max_pending,
                    method = %method,
                    "Too many pending requests"
                );
                return Err(Error::protocol(format!(
                    "Too many pending requests: {}/{}",
                    correlation.len(),
                    self.options.max_pending
                )));
            }
        }

        let correlation_id = self.counter.next();
        let request = Request::new(correlation_id, method.clone(), args);
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ChannelCommand::Request {
                request,
                pending: PendingRequest {
                    method: method.clone(),
                    response_tx,
                },
            })
            .map_err(|_| Error::ChannelClosed)?;

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(result)) => result?.into_result(&method),
            Ok(Err(_)) => Err(Error::ChannelClosed),
            Err(_) => {
                // Timeout - clean up the correlation entry
                let _ = self
                    .command_tx
                    .send(ChannelCommand::RemoveCorrelation(correlation_id));

                Err(Error::request_timeout(
                    correlation_id,
                    request_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Sends a fire-and-forget command.
    ///
    /// Returns before any native round trip; failures are not
    /// observable from the caller. Calling on a closed channel is a
    /// silent no-op.
    pub fn fire(&self, method: impl Into<String>, args: Vec<Value>) {
        let request = Request::new(self.counter.next(), method, args);
        if self
            .command_tx
            .send(ChannelCommand::Fire { request })
            .is_err()
        {
            trace!("Fire on closed channel dropped");
        }
    }

    /// Shuts the channel down.
    ///
    /// Pending requests fail with [`Error::ChannelClosed`]; listeners
    /// stop receiving events.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ChannelCommand::Shutdown);
    }

    /// Dispatch loop that pumps the raw pipe.
    async fn run_dispatch_loop(
        raw: RawChannel,
        mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
        listeners: Arc<ListenerRegistry>,
        options: ChannelOptions,
    ) {
        let RawChannel {
            outbound,
            mut inbound,
        } = raw;

        loop {
            tokio::select! {
                // Incoming frames from the native side
                frame = inbound.recv() => {
                    match frame {
                        Some(text) => {
                            Self::handle_inbound_frame(&text, &correlation, &listeners);
                        }
                        None => {
                            debug!("Native side hung up");
                            break;
                        }
                    }
                }

                // Commands from the facade
                command = command_rx.recv() => {
                    match command {
                        Some(ChannelCommand::Request { request, pending }) => {
                            Self::handle_request_command(
                                request,
                                pending,
                                &outbound,
                                &correlation,
                                options.max_pending,
                            );
                        }

                        Some(ChannelCommand::Fire { request }) => {
                            match to_string(&request) {
                                Ok(json) => {
                                    if outbound.send(json).is_err() {
                                        trace!(method = %request.method, "Fire dropped, outbound closed");
                                    }
                                }
                                Err(e) => {
                                    warn!(error = %e, method = %request.method, "Fire serialization failed");
                                }
                            }
                        }

                        Some(ChannelCommand::RemoveCorrelation(correlation_id)) => {
                            correlation.lock().remove(&correlation_id);
                            debug!(%correlation_id, "Removed timed-out correlation");
                        }

                        Some(ChannelCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        // Fail all pending requests on teardown
        Self::fail_pending_requests(&correlation);

        debug!("Dispatch loop terminated");
    }

    /// Routes one inbound frame to its pending request or listeners.
    fn handle_inbound_frame(
        text: &str,
        correlation: &Arc<Mutex<CorrelationMap>>,
        listeners: &Arc<ListenerRegistry>,
    ) {
        match InboundMessage::parse(text) {
            Ok(InboundMessage::Response(response)) => {
                let pending = correlation.lock().remove(&response.id);

                if let Some(pending) = pending {
                    let _ = pending.response_tx.send(Ok(response));
                } else {
                    warn!(id = %response.id, "Response for unknown request");
                }
            }

            Ok(InboundMessage::Event(event)) => {
                if !event.is_well_formed() {
                    warn!(marker = %event.message_type, "Event with bad type marker");
                    return;
                }
                let delivered = listeners.dispatch(&event);
                trace!(event = %event.event, delivered, "Event dispatched");
            }

            Err(e) => {
                warn!(error = %e, text = %text, "Failed to parse inbound frame");
            }
        }
    }

    /// Serializes and sends one correlated request.
    ///
    /// Runs on the loop task, which owns correlation map insertion, so
    /// the pending cap enforced here cannot be raced past.
    fn handle_request_command(
        request: Request,
        pending: PendingRequest,
        outbound: &mpsc::UnboundedSender<String>,
        correlation: &Arc<Mutex<CorrelationMap>>,
        max_pending: usize,
    ) {
        let correlation_id = request.id;

        let json = match to_string(&request) {
            Ok(j) => j,
            Err(e) => {
                let _ = pending.response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Store correlation before sending
        {
            let mut correlation = correlation.lock();
            if correlation.len() >= max_pending {
                let count = correlation.len();
                drop(correlation);
                warn!(
                    pending = count,
                    max = max_pending,
                    method = %pending.method,
                    "Too many pending requests"
                );
                let _ = pending.response_tx.send(Err(Error::protocol(format!(
                    "Too many pending requests: {count}/{max_pending}"
                ))));
                return;
            }
            correlation.insert(correlation_id, pending);
        }

        if outbound.send(json).is_err() {
            if let Some(pending) = correlation.lock().remove(&correlation_id) {
                let _ = pending.response_tx.send(Err(Error::ChannelClosed));
            }
            return;
        }

        trace!(%correlation_id, "Request sent");
    }

    /// Fails all pending requests with `ChannelClosed`.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, entry) in pending {
            let _ = entry.response_tx.send(Err(Error::ChannelClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on teardown");
        }
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("pending", &self.pending_count())
            .field("closed", &self.is_closed())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
