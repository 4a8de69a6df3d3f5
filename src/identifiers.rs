//! Type-safe identifiers for shell entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ScreenId
// ============================================================================

/// Unique identifier for a host screen instance.
///
/// Every presented screen gets a fresh ID; a dismissed screen's ID is never
/// reused, so stale handles can be detected and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(Uuid);

impl ScreenId {
    /// Generates a new random screen ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_id_unique() {
        let a = ScreenId::generate();
        let b = ScreenId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_screen_id_display_roundtrip() {
        let id = ScreenId::generate();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_screen_id_serde() {
        let id = ScreenId::generate();
        let json = serde_json::to_string(&id).expect("serialize");
        let back: ScreenId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, back);
    }
}
