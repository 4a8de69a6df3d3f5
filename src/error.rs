//! Error types for the webshell bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webshell_bridge::{Result, Shell};
//!
//! async fn example(shell: &Shell) -> Result<()> {
//!     let screen = shell.present_full_screen("app://promo/coffee-frenzy").await?;
//!     shell.finish_transition(screen)?;
//!     Ok(())
//! }
//! ```
//!
//! Note that the signal path itself never surfaces errors: unknown signals,
//! absent transports, and duplicate close requests all degrade to silent
//! no-ops. The variants below cover host API misuse and the dev transport.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidTarget`] |
//! | Shell | [`Error::ScreenNotFound`], [`Error::ShellClosed`] |
//! | Transport | [`Error::ConnectionTimeout`] |
//! | Content loading | [`Error::LoadFailed`], [`Error::LoadCancelled`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::ChannelClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::ScreenId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when shell configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Launch target could not be parsed.
    ///
    /// Returned when a screen launch URL is not a valid URL.
    #[error("Invalid launch target {target}: {message}")]
    InvalidTarget {
        /// The rejected target string.
        target: String,
        /// Description of the parse failure.
        message: String,
    },

    // ========================================================================
    // Shell Errors
    // ========================================================================
    /// Screen not found.
    ///
    /// Returned when a screen ID does not refer to a live screen.
    #[error("Screen not found: {screen_id}")]
    ScreenNotFound {
        /// The missing screen ID.
        screen_id: ScreenId,
    },

    /// Shell event loop has stopped.
    ///
    /// Returned when a command is issued after [`Shell::shutdown`].
    ///
    /// [`Shell::shutdown`]: crate::host::Shell::shutdown
    #[error("Shell closed")]
    ShellClosed,

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Timed out waiting for the content build to connect.
    ///
    /// Only the development socket transport produces this; the embedded
    /// channel transport is connected by construction.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Content Loading Errors
    // ========================================================================
    /// Content load failed.
    ///
    /// Reported by [`ContentLoader`] implementations; the shell logs it
    /// passively and does not retry.
    ///
    /// [`ContentLoader`]: crate::host::ContentLoader
    #[error("Content load failed: {message}")]
    LoadFailed {
        /// Description of the load failure.
        message: String,
    },

    /// Content load was cancelled.
    ///
    /// Returned when a load is aborted because its screen began dismissal.
    #[error("Content load cancelled")]
    LoadCancelled,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid target error.
    #[inline]
    pub fn invalid_target(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates a screen not found error.
    #[inline]
    pub fn screen_not_found(screen_id: ScreenId) -> Self {
        Self::ScreenNotFound { screen_id }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a content load failure error.
    #[inline]
    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::LoadFailed {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a content loading error.
    #[inline]
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::LoadFailed { .. } | Self::LoadCancelled)
    }

    /// Returns `true` if this error means the shell is gone.
    ///
    /// Callers holding a [`Shell`](crate::host::Shell) handle should stop
    /// issuing commands once they see this.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ShellClosed | Self::ChannelClosed(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing loader");
        assert_eq!(err.to_string(), "Configuration error: missing loader");
    }

    #[test]
    fn test_invalid_target_display() {
        let err = Error::invalid_target("not a url", "relative URL without a base");
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_is_load_error() {
        assert!(Error::load_failed("timeout").is_load_error());
        assert!(Error::LoadCancelled.is_load_error());
        assert!(!Error::ShellClosed.is_load_error());
    }

    #[test]
    fn test_is_closed() {
        assert!(Error::ShellClosed.is_closed());
        assert!(!Error::config("x").is_closed());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
