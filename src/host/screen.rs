//! Per-screen presentation, gesture, and lifecycle state.
//!
//! A [`Screen`] is one live instance of embedded content hosted by the
//! shell. Its state is owned exclusively by the shell's event loop; nothing
//! mutates it from outside that loop.

// ============================================================================
// Imports
// ============================================================================

use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use crate::identifiers::ScreenId;

// ============================================================================
// ScreenPresentation
// ============================================================================

/// How a screen occupies the host.
///
/// Fixed at creation for the screen's lifetime; host chrome is restored
/// automatically when a full-screen screen is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPresentation {
    /// Part of the tab navigation; tab bar visible.
    Docked,
    /// Tab bar and host chrome hidden.
    FullScreen,
}

// ============================================================================
// ScreenPhase
// ============================================================================

/// Lifecycle phase of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    /// Resting inside a tab; chrome visible.
    Docked,
    /// Presented full-screen over the tabs.
    FullScreenActive,
    /// Dismissal has begun; all further inbound requests are rejected.
    FullScreenLeaving,
    /// Terminal. The instance is torn down and never revived.
    Dismissed,
}

// ============================================================================
// NavigationPolicy
// ============================================================================

/// Decision for an embedded navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    /// Let the navigation proceed.
    Allow,
    /// Block it; the screen is leaving or already gone.
    Cancel,
}

// ============================================================================
// Screen
// ============================================================================

/// One live screen instance owned by the shell.
pub(crate) struct Screen {
    /// Unique instance ID; never reused.
    pub id: ScreenId,
    /// Launch target supplied by the host.
    pub target: Url,
    /// Fixed presentation mode.
    pub presentation: ScreenPresentation,
    /// Current lifecycle phase.
    pub phase: ScreenPhase,
    /// Whether the host's native back/swipe gesture is enabled.
    ///
    /// Enabled by default on every fresh instance; forced off while the
    /// screen is leaving.
    pub gesture_enabled: bool,
    /// Whether the content load has completed.
    pub loaded: bool,
    /// In-flight content load, if any.
    load: Option<JoinHandle<()>>,
}

impl Screen {
    /// Creates a fresh full-screen instance with default state.
    pub(crate) fn full_screen(id: ScreenId, target: Url) -> Self {
        Self {
            id,
            target,
            presentation: ScreenPresentation::FullScreen,
            phase: ScreenPhase::FullScreenActive,
            gesture_enabled: true,
            loaded: false,
            load: None,
        }
    }

    /// Creates a fresh docked instance with default state.
    pub(crate) fn docked(id: ScreenId, target: Url) -> Self {
        Self {
            id,
            target,
            presentation: ScreenPresentation::Docked,
            phase: ScreenPhase::Docked,
            gesture_enabled: true,
            loaded: false,
            load: None,
        }
    }
}

// ============================================================================
// Screen - Queries
// ============================================================================

impl Screen {
    /// Returns `true` while the screen still accepts inbound signals.
    #[inline]
    pub(crate) fn accepts_signals(&self) -> bool {
        matches!(
            self.phase,
            ScreenPhase::Docked | ScreenPhase::FullScreenActive
        )
    }

    /// Evaluates an embedded navigation request against the lifecycle.
    ///
    /// Once dismissal has begun, every navigation is cancelled so a pending
    /// load can never re-show content.
    #[inline]
    pub(crate) fn navigation_policy(&self) -> NavigationPolicy {
        if self.accepts_signals() {
            NavigationPolicy::Allow
        } else {
            NavigationPolicy::Cancel
        }
    }
}

// ============================================================================
// Screen - Mutations
// ============================================================================

impl Screen {
    /// Applies a gesture signal as a state set (not a toggle).
    ///
    /// Returns `false` when the screen no longer accepts signals.
    pub(crate) fn set_gesture(&mut self, enabled: bool) -> bool {
        if !self.accepts_signals() {
            debug!(screen_id = %self.id, phase = ?self.phase, "Gesture signal rejected");
            return false;
        }
        self.gesture_enabled = enabled;
        true
    }

    /// Begins dismissal: `FullScreenActive → FullScreenLeaving`.
    ///
    /// Cancels any in-flight content load and forces the gesture off.
    /// Returns `false` (and does nothing) unless the screen is a full-screen
    /// screen in the active phase — this is the guard that makes duplicate
    /// close requests collapse into one dismissal.
    pub(crate) fn begin_leaving(&mut self) -> bool {
        if self.presentation != ScreenPresentation::FullScreen
            || self.phase != ScreenPhase::FullScreenActive
        {
            return false;
        }
        self.phase = ScreenPhase::FullScreenLeaving;
        self.gesture_enabled = false;
        self.abort_load();
        true
    }

    /// Completes dismissal: `FullScreenLeaving → Dismissed`.
    ///
    /// Returns `false` unless the screen was leaving.
    pub(crate) fn finish_dismissal(&mut self) -> bool {
        if self.phase != ScreenPhase::FullScreenLeaving {
            return false;
        }
        self.phase = ScreenPhase::Dismissed;
        true
    }

    /// Attaches the in-flight content load task.
    pub(crate) fn attach_load(&mut self, handle: JoinHandle<()>) {
        self.load = Some(handle);
    }

    /// Aborts the in-flight content load, if any.
    pub(crate) fn abort_load(&mut self) {
        if let Some(handle) = self.load.take() {
            debug!(screen_id = %self.id, "Cancelling in-flight content load");
            handle.abort();
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        // Teardown is complete: a dying screen never leaves a load running.
        self.abort_load();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn full_screen() -> Screen {
        Screen::full_screen(
            ScreenId::generate(),
            Url::parse("app://content/promo/coffee-frenzy").expect("url"),
        )
    }

    fn docked() -> Screen {
        Screen::docked(
            ScreenId::generate(),
            Url::parse("app://content/promo/coffee-frenzy").expect("url"),
        )
    }

    #[test]
    fn test_fresh_screen_defaults() {
        let screen = full_screen();
        assert!(screen.gesture_enabled);
        assert_eq!(screen.phase, ScreenPhase::FullScreenActive);
        assert_eq!(screen.presentation, ScreenPresentation::FullScreen);
        assert!(!screen.loaded);
    }

    #[test]
    fn test_gesture_is_set_not_toggle() {
        let mut screen = full_screen();
        assert!(screen.set_gesture(false));
        assert!(screen.set_gesture(false));
        assert!(!screen.gesture_enabled);

        assert!(screen.set_gesture(true));
        assert!(screen.set_gesture(true));
        assert!(screen.gesture_enabled);
    }

    #[test]
    fn test_begin_leaving_exactly_once() {
        let mut screen = full_screen();
        assert!(screen.begin_leaving());
        assert!(!screen.begin_leaving());
        assert_eq!(screen.phase, ScreenPhase::FullScreenLeaving);
    }

    #[test]
    fn test_leaving_forces_gesture_off_and_rejects_signals() {
        let mut screen = full_screen();
        screen.begin_leaving();

        assert!(!screen.gesture_enabled);
        assert!(!screen.set_gesture(true));
        assert!(!screen.gesture_enabled);
        assert_eq!(screen.navigation_policy(), NavigationPolicy::Cancel);
    }

    #[test]
    fn test_docked_screen_cannot_leave() {
        let mut screen = docked();
        assert!(!screen.begin_leaving());
        assert_eq!(screen.phase, ScreenPhase::Docked);
    }

    #[test]
    fn test_finish_requires_leaving() {
        let mut screen = full_screen();
        assert!(!screen.finish_dismissal());

        screen.begin_leaving();
        assert!(screen.finish_dismissal());
        assert!(!screen.finish_dismissal());
        assert_eq!(screen.phase, ScreenPhase::Dismissed);
    }

    #[test]
    fn test_active_screen_allows_navigation() {
        assert_eq!(full_screen().navigation_policy(), NavigationPolicy::Allow);
        assert_eq!(docked().navigation_policy(), NavigationPolicy::Allow);
    }

    proptest! {
        /// Any enable/disable sequence leaves the gesture equal to the last
        /// value applied.
        #[test]
        fn prop_gesture_sequence_last_write_wins(sequence in prop::collection::vec(any::<bool>(), 1..64)) {
            let mut screen = full_screen();
            for &enabled in &sequence {
                prop_assert!(screen.set_gesture(enabled));
            }
            prop_assert_eq!(screen.gesture_enabled, *sequence.last().expect("non-empty"));
        }

        /// Fresh instances always start enabled, whatever happened before.
        #[test]
        fn prop_no_state_leak_across_instances(sequence in prop::collection::vec(any::<bool>(), 0..32)) {
            let mut first = full_screen();
            for &enabled in &sequence {
                first.set_gesture(enabled);
            }
            first.begin_leaving();
            first.finish_dismissal();

            let second = full_screen();
            prop_assert!(second.gesture_enabled);
        }
    }
}
