//! Signal transport layer.
//!
//! Host platforms each expose their own messaging channel to embedded
//! content (a script-message handler on one, an injected interface object on
//! the other). This module unifies them behind a single [`SignalTransport`]
//! interface; the content-side sender probes adapters at call time and picks
//! the first one that is available.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                          ┌──────────────────┐
//! │ Content (sender) │                          │ Host (shell)     │
//! │                  │   ChannelTransport       │                  │
//! │  BridgeSender ───┼─────────────────────────►│  SignalStream    │
//! │                  │   (in-process, embedded) │  → SignalReceiver│
//! │                  │                          │                  │
//! │  BridgeSender ───┼─────────────────────────►│  SignalSocket    │
//! │                  │   SocketTransport        │  → SignalStream  │
//! │                  │   (WebSocket, dev)       │                  │
//! └──────────────────┘                          └──────────────────┘
//! ```
//!
//! Both adapters deliver [`SignalMessage`]s into a [`SignalStream`], so the
//! host attaches signals the same way regardless of how content is running.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | In-process adapter for embedded content |
//! | `socket` | WebSocket adapter for standalone content development |

// ============================================================================
// Imports
// ============================================================================

use crate::protocol::SignalMessage;

// ============================================================================
// Submodules
// ============================================================================

/// In-process channel adapter.
pub mod channel;

/// WebSocket adapter for standalone content development.
pub mod socket;

// ============================================================================
// SignalTransport
// ============================================================================

/// A one-way, fire-and-forget channel from content to host.
///
/// Implementations never block and never fail loudly: a send into a dead or
/// absent channel is dropped, at most with a log line. Availability is probed
/// per call because the hosting environment can change underneath the content
/// (and is simply absent in a plain desktop browser).
pub trait SignalTransport: Send + Sync {
    /// Returns the adapter name, for logging.
    fn name(&self) -> &'static str;

    /// Returns `true` if the transport can currently deliver signals.
    fn is_available(&self) -> bool;

    /// Sends a signal envelope, fire-and-forget.
    ///
    /// Must not block and must not panic; delivery is at-most-once.
    fn send(&self, message: SignalMessage);
}

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{ChannelTransport, SignalStream, channel_pair};
pub use socket::{SignalSocket, SocketTransport};
