//! Host-side signal receiver.
//!
//! [`SignalReceiver`] is the single entry point on the native side for all
//! inbound signals from embedded content. It parses, drops what it does not
//! recognize, and marshals everything else onto the shell's event loop —
//! signals may arrive from any transport task and must never race a
//! concurrent screen transition.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::protocol::{ParsedSignal, SignalMessage};
use crate::transport::SignalStream;

use super::shell::ShellCommand;

// ============================================================================
// SignalReceiver
// ============================================================================

/// Entry point for inbound content signals.
///
/// Cheap to clone; obtained from [`Shell::receiver`].
///
/// Delivery is fire-and-forget: unknown names, malformed text, and a
/// shut-down shell all degrade to a silent drop, never an error.
///
/// [`Shell::receiver`]: super::Shell::receiver
#[derive(Clone)]
pub struct SignalReceiver {
    /// Command channel into the shell event loop.
    commands: mpsc::UnboundedSender<ShellCommand>,
}

impl fmt::Debug for SignalReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalReceiver").finish_non_exhaustive()
    }
}

impl SignalReceiver {
    /// Creates a receiver over the shell's command channel.
    pub(crate) fn new(commands: mpsc::UnboundedSender<ShellCommand>) -> Self {
        Self { commands }
    }

    /// Delivers one signal envelope.
    ///
    /// Known signals are enqueued onto the shell's UI-update path in arrival
    /// order; unknown names are ignored to keep independently versioned host
    /// and content builds compatible.
    pub fn deliver(&self, message: SignalMessage) {
        match message.parse() {
            ParsedSignal::Known(signal) => {
                if self.commands.send(ShellCommand::Signal(signal)).is_err() {
                    debug!("Shell gone; signal dropped");
                }
            }
            ParsedSignal::Unknown { name } => {
                debug!(name = %name, "Ignoring unknown signal");
            }
        }
    }

    /// Delivers a raw JSON frame, as received off a transport.
    ///
    /// Malformed frames are dropped with a log line, never an error.
    pub fn deliver_raw(&self, text: &str) {
        match serde_json::from_str::<SignalMessage>(text) {
            Ok(message) => self.deliver(message),
            Err(e) => {
                debug!(error = %e, "Dropping malformed signal frame");
            }
        }
    }

    /// Attaches a transport stream, forwarding its signals until it ends.
    pub fn attach(&self, mut stream: SignalStream) -> JoinHandle<()> {
        let receiver = self.clone();
        tokio::spawn(async move {
            while let Some(message) = stream.recv().await {
                receiver.deliver(message);
            }
            debug!("Signal stream ended");
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::host::{Shell, ScreenPhase};
    use crate::protocol::Signal;
    use crate::transport::{channel_pair, SignalTransport};

    const TARGET: &str = "app://content/promo/coffee-frenzy";

    async fn presented_shell() -> Shell {
        let shell = Shell::builder().tab("Loyalty").build().expect("build");
        shell.present_full_screen(TARGET).await.expect("present");
        shell
    }

    #[tokio::test]
    async fn test_deliver_known_signal() {
        let shell = presented_shell().await;
        shell.receiver().deliver(Signal::DisableSwipeBack.into_message());

        let snap = shell.snapshot().await.expect("snapshot");
        assert!(!snap.top().expect("top").gesture_enabled);
    }

    #[tokio::test]
    async fn test_deliver_raw_frames() {
        let shell = presented_shell().await;
        let receiver = shell.receiver();

        receiver.deliver_raw(r#"{ "name": "disableSwipeBack" }"#);
        receiver.deliver_raw("not json at all");
        receiver.deliver_raw(r#"{ "name": "launchRocket", "payload": 1 }"#);

        let snap = shell.snapshot().await.expect("snapshot");
        let top = snap.top().expect("top");
        assert!(!top.gesture_enabled);
        assert_eq!(top.phase, ScreenPhase::FullScreenActive);
    }

    #[tokio::test]
    async fn test_deliver_after_shutdown_is_silent() {
        let shell = presented_shell().await;
        let receiver = shell.receiver();
        shell.shutdown();

        // Must not panic or error, whatever the loop state.
        receiver.deliver(Signal::Close.into_message());
    }

    #[tokio::test]
    async fn test_attach_forwards_stream_in_order() {
        let shell = presented_shell().await;
        let (transport, stream) = channel_pair();
        let forwarder = shell.receiver().attach(stream);

        transport.send(Signal::EnableSwipeBack.into_message());
        transport.send(Signal::DisableSwipeBack.into_message());
        drop(transport);

        // Stream end terminates the forwarder; by then both signals are
        // enqueued ahead of any later snapshot.
        forwarder.await.expect("forwarder");
        let snap = shell.snapshot().await.expect("snapshot");
        assert!(!snap.top().expect("top").gesture_enabled);
    }
}
