//! Signal definitions and wire envelope.
//!
//! Signal names cross the content/host boundary verbatim; both sides must
//! agree on the strings in [`names`]. Delivery is at-most-once per emission,
//! fire-and-forget, with no acknowledgement.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Wire Names
// ============================================================================

/// Wire names for bridge signals.
///
/// These strings are the contract between content and host builds; they are
/// never abbreviated or re-cased on either side.
pub mod names {
    /// Requests dismissal of the current full-screen screen.
    pub const CLOSE_WEBVIEW: &str = "closeWebview";
    /// Enables the host's native swipe-back gesture for the current screen.
    pub const ENABLE_SWIPE_BACK: &str = "enableSwipeBack";
    /// Disables the host's native swipe-back gesture for the current screen.
    pub const DISABLE_SWIPE_BACK: &str = "disableSwipeBack";
    /// Arbitrary passthrough message with no built-in host behavior.
    pub const CUSTOM_MESSAGE: &str = "customMessage";
}

// ============================================================================
// Signal
// ============================================================================

/// A named, fire-and-forget message from embedded content to the host.
///
/// Signals are immutable once constructed and transmitted once per emission.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Requests dismissal of the current full-screen screen.
    Close,
    /// Sets GestureState = enabled for the current screen.
    EnableSwipeBack,
    /// Sets GestureState = disabled for the current screen.
    DisableSwipeBack,
    /// Passthrough payload for the host's custom-message callback.
    Custom(Value),
}

impl Signal {
    /// Returns the wire name for this signal.
    #[inline]
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Close => names::CLOSE_WEBVIEW,
            Self::EnableSwipeBack => names::ENABLE_SWIPE_BACK,
            Self::DisableSwipeBack => names::DISABLE_SWIPE_BACK,
            Self::Custom(_) => names::CUSTOM_MESSAGE,
        }
    }

    /// Converts the signal into its wire envelope.
    #[must_use]
    pub fn into_message(self) -> SignalMessage {
        let name = self.wire_name().to_string();
        let payload = match self {
            Self::Custom(value) => Some(value),
            _ => None,
        };
        SignalMessage { name, payload }
    }
}

// ============================================================================
// SignalMessage
// ============================================================================

/// Wire envelope for a signal.
///
/// # Format
///
/// ```json
/// { "name": "closeWebview" }
/// { "name": "customMessage", "payload": { "source": "promo" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMessage {
    /// Signal name; must match one of [`names`] to be acted upon.
    pub name: String,

    /// Optional transport-serializable payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl SignalMessage {
    /// Creates an envelope with a bare name and no payload.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    /// Parses the envelope into a typed signal.
    ///
    /// Unknown names yield [`ParsedSignal::Unknown`], which consumers drop
    /// without error so that independently versioned host and content builds
    /// stay compatible.
    #[must_use]
    pub fn parse(&self) -> ParsedSignal {
        match self.name.as_str() {
            names::CLOSE_WEBVIEW => ParsedSignal::Known(Signal::Close),
            names::ENABLE_SWIPE_BACK => ParsedSignal::Known(Signal::EnableSwipeBack),
            names::DISABLE_SWIPE_BACK => ParsedSignal::Known(Signal::DisableSwipeBack),
            names::CUSTOM_MESSAGE => ParsedSignal::Known(Signal::Custom(
                self.payload.clone().unwrap_or(Value::Null),
            )),
            _ => ParsedSignal::Unknown {
                name: self.name.clone(),
            },
        }
    }
}

impl From<Signal> for SignalMessage {
    fn from(signal: Signal) -> Self {
        signal.into_message()
    }
}

// ============================================================================
// ParsedSignal
// ============================================================================

/// Result of parsing a [`SignalMessage`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSignal {
    /// A signal from the closed protocol set.
    Known(Signal),
    /// A name outside the protocol set; ignored, never raised as an error.
    Unknown {
        /// The unrecognized signal name.
        name: String,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_wire_names_verbatim() {
        assert_eq!(Signal::Close.wire_name(), "closeWebview");
        assert_eq!(Signal::EnableSwipeBack.wire_name(), "enableSwipeBack");
        assert_eq!(Signal::DisableSwipeBack.wire_name(), "disableSwipeBack");
        assert_eq!(Signal::Custom(Value::Null).wire_name(), "customMessage");
    }

    #[test]
    fn test_control_signals_carry_no_payload() {
        let message = Signal::EnableSwipeBack.into_message();
        assert_eq!(message.name, "enableSwipeBack");
        assert!(message.payload.is_none());

        let json = serde_json::to_string(&message).expect("serialize");
        assert!(!json.contains("payload"));
    }

    #[test]
    fn test_custom_signal_roundtrip() {
        let message = Signal::Custom(json!({ "source": "promo" })).into_message();
        let json = serde_json::to_string(&message).expect("serialize");
        let back: SignalMessage = serde_json::from_str(&json).expect("deserialize");

        match back.parse() {
            ParsedSignal::Known(Signal::Custom(value)) => {
                assert_eq!(value, json!({ "source": "promo" }));
            }
            other => panic!("unexpected parse result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_known_names() {
        let message = SignalMessage::new("closeWebview");
        assert_eq!(message.parse(), ParsedSignal::Known(Signal::Close));
    }

    #[test]
    fn test_parse_unknown_name() {
        let message = SignalMessage::new("openSettings");
        match message.parse() {
            ParsedSignal::Unknown { name } => assert_eq!(name, "openSettings"),
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_custom_without_payload_defaults_to_null() {
        let message = SignalMessage::new("customMessage");
        assert_eq!(
            message.parse(),
            ParsedSignal::Known(Signal::Custom(Value::Null))
        );
    }
}
