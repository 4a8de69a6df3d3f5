//! Bridge protocol definitions.
//!
//! This module defines the closed set of signals exchanged between embedded
//! content and the hosting native shell.
//!
//! # Protocol Overview
//!
//! | Signal | Direction | Payload | Effect |
//! |--------|-----------|---------|--------|
//! | `closeWebview` | content → host | none | dismiss current full-screen screen |
//! | `enableSwipeBack` | content → host | none | GestureState = enabled |
//! | `disableSwipeBack` | content → host | none | GestureState = disabled |
//! | `customMessage` | content → host | arbitrary JSON | passthrough |
//!
//! No signal requires a response; delivery is at-most-once per emission,
//! fire-and-forget. Unknown signal names are ignored (no error) so that
//! independently versioned host and content builds remain compatible.

// ============================================================================
// Submodules
// ============================================================================

/// Signal definitions and wire envelope.
pub mod signal;

// ============================================================================
// Re-exports
// ============================================================================

pub use signal::{ParsedSignal, Signal, SignalMessage, names};
