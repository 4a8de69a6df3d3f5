//! Webshell Bridge - native/web bridge for hybrid app shells.
//!
//! This library implements the signal protocol and lifecycle coordination
//! between a native host shell (tab bar, screen stack, back gesture) and the
//! web content it embeds.
//!
//! # Architecture
//!
//! The bridge crosses one boundary in one direction:
//!
//! - **Content end**: owns its navigation history, emits signals at root
//!   transitions and on explicit close actions
//! - **Host end**: receives signals on a single entry point and applies them
//!   on its single UI-update path
//!
//! Key design principles:
//!
//! - Signals are fire-and-forget, at-most-once, never acknowledged
//! - Unknown signal names are ignored, keeping independently versioned host
//!   and content builds compatible
//! - Every host-state mutation is serialized onto the [`Shell`] event loop;
//!   transport callbacks never touch screen state directly
//! - Gesture signals apply as state sets, not toggles; a fresh screen always
//!   starts with the gesture enabled
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use webshell_bridge::{BridgeSender, ContentRouter, GestureSync, Result, Shell};
//! use webshell_bridge::transport::channel_pair;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Host side: a shell with docked tabs, presenting content full-screen.
//!     let shell = Shell::builder().tab("Manage").tab("Loyalty").build()?;
//!     let screen = shell
//!         .present_full_screen("app://content/promo/coffee-frenzy")
//!         .await?;
//!
//!     // Content side: router + sender wired over the in-process transport.
//!     let (transport, stream) = channel_pair();
//!     shell.receiver().attach(stream);
//!
//!     let router = ContentRouter::launch("app://content/promo/coffee-frenzy")?;
//!     let sender = BridgeSender::new(vec![Arc::new(transport)]);
//!     let _sync = GestureSync::bind(&router, sender.clone());
//!
//!     // Deep navigation disables the native gesture; close dismisses.
//!     router.push("/promo/coffee-frenzy/offers");
//!     sender.request_close();
//!
//!     shell.finish_transition(screen)?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`content`] | Content-side router, sender, gesture sync |
//! | [`host`] | Shell controller, signal receiver, screens, loading |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Signal definitions and wire envelope |
//! | [`transport`] | Signal transport adapters (channel, socket) |

// ============================================================================
// Modules
// ============================================================================

/// Content-side bridge pieces: router, sender, gesture sync.
///
/// Runs in the embedded web content's world.
pub mod content;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Host-side shell: receiver, screens, controller, loading.
pub mod host;

/// Type-safe identifiers for shell entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Bridge protocol definitions.
///
/// The closed signal set and its wire envelope.
pub mod protocol;

/// Signal transport layer.
///
/// Adapters behind the [`SignalTransport`](transport::SignalTransport) seam.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Content types
pub use content::{BridgeSender, ContentRouter, GestureSync, Route, RouteChange};

// Host types
pub use host::{
    BackAction, ContentLoader, LoadRequest, LoadedContent, NavigationPolicy, NullLoader,
    ScreenPhase, ScreenPresentation, ScreenSnapshot, Shell, ShellBuilder, ShellSnapshot,
    SignalReceiver,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ScreenId;

// Protocol types
pub use protocol::{ParsedSignal, Signal, SignalMessage};
