//! Content-side signal emission.
//!
//! [`BridgeSender`] is an explicit instance scoped to the content lifetime,
//! injected where pages need it — not a global attached to the page
//! environment. It probes its transports at call time and silently does
//! nothing when none is available, which is the expected condition while the
//! content build runs standalone in a desktop browser.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::protocol::Signal;
use crate::transport::SignalTransport;

use super::router::{ContentRouter, RouteChange};

// ============================================================================
// BridgeSender
// ============================================================================

/// Emits signals from embedded content toward the host.
///
/// Every operation is fire-and-forget and infallible: no transport means no
/// signal, never an error.
///
/// # Example
///
/// ```ignore
/// let (transport, stream) = channel_pair();
/// let sender = BridgeSender::new(vec![Arc::new(transport)]);
///
/// sender.request_close();
/// ```
#[derive(Clone)]
pub struct BridgeSender {
    /// Candidate transports, probed in order per emission.
    transports: Vec<Arc<dyn SignalTransport>>,
}

impl fmt::Debug for BridgeSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeSender")
            .field("transports", &self.transports.len())
            .finish_non_exhaustive()
    }
}

impl BridgeSender {
    /// Creates a sender over an ordered list of candidate transports.
    #[must_use]
    pub fn new(transports: Vec<Arc<dyn SignalTransport>>) -> Self {
        Self { transports }
    }

    /// Creates a sender with no transports.
    ///
    /// Every emission becomes a silent no-op; useful for standalone content
    /// development and tests.
    #[inline]
    #[must_use]
    pub fn noop() -> Self {
        Self {
            transports: Vec::new(),
        }
    }

    /// Emits a signal on the first available transport.
    ///
    /// Availability is probed at call time; with no transport available the
    /// signal is dropped silently.
    pub fn emit(&self, signal: Signal) {
        let name = signal.wire_name();

        for transport in &self.transports {
            if transport.is_available() {
                trace!(signal = name, transport = transport.name(), "Emitting signal");
                transport.send(signal.into_message());
                return;
            }
        }

        debug!(signal = name, "No native transport available; signal dropped");
    }
}

// ============================================================================
// BridgeSender - Operations
// ============================================================================

impl BridgeSender {
    /// Reports a root-state transition.
    ///
    /// Emits `enableSwipeBack` when the content is at its root page and
    /// `disableSwipeBack` otherwise. Harmless to repeat: the host applies
    /// these as state sets, not toggles.
    pub fn root_state_changed(&self, is_root: bool) {
        if is_root {
            self.emit(Signal::EnableSwipeBack);
        } else {
            self.emit(Signal::DisableSwipeBack);
        }
    }

    /// Requests dismissal of the hosting full-screen screen.
    ///
    /// Only meaningful from a full-screen screen; the host ignores the
    /// request otherwise.
    pub fn request_close(&self) {
        self.emit(Signal::Close);
    }

    /// Sends an arbitrary passthrough message to the host.
    pub fn send_custom(&self, payload: Value) {
        self.emit(Signal::Custom(payload));
    }
}

// ============================================================================
// GestureSync
// ============================================================================

/// Glues router observations to gesture signals.
///
/// Tracks the last reported root state and emits only on actual transitions,
/// including the initial observation on page entry.
pub struct GestureSync {
    /// Sender used for emissions.
    sender: BridgeSender,
    /// Last reported root state; `None` until the first observation.
    last: Mutex<Option<bool>>,
}

impl GestureSync {
    /// Creates an unbound sync.
    #[must_use]
    pub fn new(sender: BridgeSender) -> Self {
        Self {
            sender,
            last: Mutex::new(None),
        }
    }

    /// Binds a sync to a router, registering a route observer.
    ///
    /// The router fires immediately on registration, so binding on a root
    /// page emits the initial `enableSwipeBack`.
    pub fn bind(router: &ContentRouter, sender: BridgeSender) -> Arc<Self> {
        let sync = Arc::new(Self::new(sender));
        let observer = Arc::clone(&sync);
        router.observe(move |change: &RouteChange| {
            observer.observe(change.is_root);
        });
        sync
    }

    /// Records a root-state observation, emitting once per transition.
    pub fn observe(&self, is_root: bool) {
        let mut last = self.last.lock();
        if *last == Some(is_root) {
            return;
        }
        *last = Some(is_root);
        self.sender.root_state_changed(is_root);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::protocol::SignalMessage;
    use crate::transport::channel_pair;

    /// Transport that records sent names and can be toggled unavailable.
    struct FakeTransport {
        available: AtomicBool,
        sent: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new(available: bool) -> Arc<Self> {
            Arc::new(Self {
                available: AtomicBool::new(available),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().clone()
        }
    }

    impl SignalTransport for FakeTransport {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn is_available(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }

        fn send(&self, message: SignalMessage) {
            self.sent.lock().push(message.name);
        }
    }

    #[test]
    fn test_emits_on_first_available_transport() {
        let dead = FakeTransport::new(false);
        let live = FakeTransport::new(true);
        let sender = BridgeSender::new(vec![dead.clone(), live.clone()]);

        sender.request_close();

        assert!(dead.sent().is_empty());
        assert_eq!(live.sent(), vec!["closeWebview"]);
    }

    #[test]
    fn test_probe_happens_at_call_time() {
        let transport = FakeTransport::new(false);
        let sender = BridgeSender::new(vec![transport.clone()]);

        sender.request_close();
        assert!(transport.sent().is_empty());

        transport.available.store(true, Ordering::SeqCst);
        sender.request_close();
        assert_eq!(transport.sent(), vec!["closeWebview"]);
    }

    #[test]
    fn test_noop_sender_never_panics() {
        let sender = BridgeSender::noop();
        sender.request_close();
        sender.root_state_changed(true);
        sender.send_custom(serde_json::json!({ "k": 1 }));
    }

    #[test]
    fn test_root_state_changed_signal_choice() {
        let transport = FakeTransport::new(true);
        let sender = BridgeSender::new(vec![transport.clone()]);

        sender.root_state_changed(true);
        sender.root_state_changed(false);

        assert_eq!(transport.sent(), vec!["enableSwipeBack", "disableSwipeBack"]);
    }

    #[test]
    fn test_gesture_sync_emits_once_per_transition() {
        let transport = FakeTransport::new(true);
        let sync = GestureSync::new(BridgeSender::new(vec![transport.clone()]));

        sync.observe(true);
        sync.observe(true);
        sync.observe(false);
        sync.observe(false);
        sync.observe(true);

        assert_eq!(
            transport.sent(),
            vec!["enableSwipeBack", "disableSwipeBack", "enableSwipeBack"]
        );
    }

    #[tokio::test]
    async fn test_bound_router_emits_route_scenario() {
        // Root page load → enable; deeper navigation → disable; back → enable.
        let (transport, mut stream) = channel_pair();
        let sender = BridgeSender::new(vec![Arc::new(transport)]);
        let router = ContentRouter::at("/promo/coffee-frenzy");

        let _sync = GestureSync::bind(&router, sender);
        router.push("/promo/coffee-frenzy/offers");
        router.push("/promo/coffee-frenzy/offers/star-coffee-central");
        router.back();
        router.back();

        assert_eq!(stream.recv().await.expect("signal").name, "enableSwipeBack");
        assert_eq!(
            stream.recv().await.expect("signal").name,
            "disableSwipeBack"
        );
        assert_eq!(stream.recv().await.expect("signal").name, "enableSwipeBack");
    }
}
