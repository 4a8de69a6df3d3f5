//! In-process channel adapter.
//!
//! The default transport when content runs inside the host process (the
//! embedded-view case). A [`ChannelTransport`] is handed to the content-side
//! sender; the paired [`SignalStream`] is attached to the host's signal
//! receiver.

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::mpsc;
use tracing::trace;

use crate::protocol::SignalMessage;

use super::SignalTransport;

// ============================================================================
// channel_pair
// ============================================================================

/// Creates a connected transport/stream pair.
///
/// # Example
///
/// ```ignore
/// let (transport, stream) = channel_pair();
/// let sender = BridgeSender::new(vec![Arc::new(transport)]);
/// shell.receiver().attach(stream);
/// ```
#[must_use]
pub fn channel_pair() -> (ChannelTransport, SignalStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelTransport { tx }, SignalStream { rx })
}

// ============================================================================
// ChannelTransport
// ============================================================================

/// Content-side endpoint of an in-process signal channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    /// Sender half; unbounded so `send` never blocks.
    tx: mpsc::UnboundedSender<SignalMessage>,
}

impl SignalTransport for ChannelTransport {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send(&self, message: SignalMessage) {
        if self.tx.send(message).is_err() {
            trace!("host end of signal channel is gone; signal dropped");
        }
    }
}

// ============================================================================
// SignalStream
// ============================================================================

/// Host-side stream of inbound signal envelopes.
///
/// Produced by [`channel_pair`] or by accepting a
/// [`SignalSocket`](super::SignalSocket) connection. Ends when every sender
/// is gone.
#[derive(Debug)]
pub struct SignalStream {
    /// Receiver half of the channel.
    rx: mpsc::UnboundedReceiver<SignalMessage>,
}

impl SignalStream {
    /// Creates a stream from a raw receiver.
    pub(crate) fn from_receiver(rx: mpsc::UnboundedReceiver<SignalMessage>) -> Self {
        Self { rx }
    }

    /// Receives the next signal envelope, in emission order.
    ///
    /// Returns `None` once the content side has disconnected.
    pub async fn recv(&mut self) -> Option<SignalMessage> {
        self.rx.recv().await
    }
}

// ============================================================================
// Tests
// ============================================================================
