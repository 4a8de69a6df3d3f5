//! Host-side shell: receiver, screens, controller, loading.
//!
//! Everything in this module runs in the native shell's world. The
//! [`Shell`] event loop is the single UI-update path; the
//! [`SignalReceiver`] marshals inbound signals onto it, and per-screen
//! state never escapes it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Shell`] | Tab/stack controller owning all navigation state |
//! | [`SignalReceiver`] | Single entry point for inbound content signals |
//! | [`ScreenPhase`] / [`ScreenPresentation`] | Per-screen lifecycle state |
//! | [`ContentLoader`] | Async, cancellable content resolution seam |
//!
//! # Example
//!
//! ```ignore
//! use webshell_bridge::host::Shell;
//!
//! let shell = Shell::builder().tab("Manage").tab("Loyalty").build()?;
//! let screen = shell.present_full_screen("app://content/promo/coffee-frenzy").await?;
//!
//! // Platform glue feeds inbound signals to one place:
//! let receiver = shell.receiver();
//! receiver.deliver_raw(r#"{ "name": "disableSwipeBack" }"#);
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Asynchronous, cancellable content loading.
pub mod loader;

/// Host-side signal receiver.
pub mod receiver;

/// Per-screen presentation, gesture, and lifecycle state.
pub mod screen;

/// Host tab/stack controller.
pub mod shell;

// ============================================================================
// Re-exports
// ============================================================================

pub use loader::{ContentLoader, LoadRequest, LoadedContent, NullLoader};
pub use receiver::SignalReceiver;
pub use screen::{NavigationPolicy, ScreenPhase, ScreenPresentation};
pub use shell::{
    BackAction, CustomMessageHandler, ScreenSnapshot, Shell, ShellBuilder, ShellSnapshot,
};
