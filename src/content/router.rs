//! Embedded content navigation history.
//!
//! The content build owns its navigation stack; the host only ever learns
//! about it through signals. [`ContentRouter`] models that stack and answers
//! the one question the bridge cares about: is the active page the root of
//! the embedded history?
//!
//! Root detection is a capability query (`!can_go_back()`), never a depth
//! counter, so it cannot drift if the history is manipulated externally.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Route
// ============================================================================

/// A single entry in the embedded navigation history.
///
/// Route identity is the URL path; path segments are the only configuration
/// channel content receives (e.g. `/promo/coffee-frenzy/offers`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Normalized path with a leading slash.
    path: String,
}

impl Route {
    /// Creates a route from a path, normalizing the leading slash.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let raw = path.into();
        let path = if raw.starts_with('/') {
            raw
        } else {
            format!("/{raw}")
        };
        Self { path }
    }

    /// Returns the route path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the non-empty path segments.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let route = Route::new("/promo/coffee-frenzy/offers");
    /// assert_eq!(route.segments(), vec!["promo", "coffee-frenzy", "offers"]);
    /// ```
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// ============================================================================
// RouteChange
// ============================================================================

/// Notification delivered to observers on every route entry/exit.
#[derive(Debug, Clone)]
pub struct RouteChange {
    /// The route that just became active.
    pub route: Route,
    /// Whether the active route is the root of the embedded history.
    pub is_root: bool,
}

/// Observer callback invoked once per route change.
///
/// Observers run on the mutating thread and must not call back into the
/// router.
pub type RouteObserver = Box<dyn Fn(&RouteChange) + Send + Sync>;

// ============================================================================
// ContentRouter
// ============================================================================

/// Internal shared state for the router.
struct RouterInner {
    /// Navigation history; the last entry is the active route.
    history: Mutex<Vec<Route>>,
    /// Registered route-change observers.
    observers: Mutex<Vec<RouteObserver>>,
}

/// The embedded content's navigation history.
///
/// Cheap to clone; all clones share one history.
///
/// # Example
///
/// ```ignore
/// let router = ContentRouter::launch("http://localhost:5173/promo/coffee-frenzy")?;
/// assert!(router.is_root());
///
/// router.push("/promo/coffee-frenzy/offers");
/// assert!(!router.is_root());
/// assert!(router.can_go_back());
/// ```
#[derive(Clone)]
pub struct ContentRouter {
    inner: Arc<RouterInner>,
}

impl fmt::Debug for ContentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRouter")
            .field("current", &self.current())
            .field("depth", &self.inner.history.lock().len())
            .finish_non_exhaustive()
    }
}

impl ContentRouter {
    /// Creates a router from the host-supplied launch URL.
    ///
    /// The URL's path becomes the root history entry; everything else about
    /// the URL is the loader's business.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] if the target is not a valid URL.
    pub fn launch(target: &str) -> Result<Self> {
        let url =
            Url::parse(target).map_err(|e| Error::invalid_target(target, e.to_string()))?;
        Ok(Self::at(url.path()))
    }

    /// Creates a router rooted at a bare path.
    #[must_use]
    pub fn at(path: impl Into<String>) -> Self {
        let root = Route::new(path);
        debug!(route = %root, "Content router launched");
        Self {
            inner: Arc::new(RouterInner {
                history: Mutex::new(vec![root]),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }
}

// ============================================================================
// ContentRouter - Queries
// ============================================================================

impl ContentRouter {
    /// Returns `true` if the embedded history can navigate back.
    ///
    /// Pure query; no side effects.
    #[inline]
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.inner.history.lock().len() > 1
    }

    /// Returns `true` if the active page is the root of the embedded stack.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        !self.can_go_back()
    }

    /// Returns the active route.
    #[must_use]
    pub fn current(&self) -> Route {
        self.inner
            .history
            .lock()
            .last()
            .cloned()
            .unwrap_or_else(|| Route::new("/"))
    }
}

// ============================================================================
// ContentRouter - Navigation
// ============================================================================

impl ContentRouter {
    /// Pushes a new route onto the history.
    pub fn push(&self, path: impl Into<String>) {
        let route = Route::new(path);
        debug!(route = %route, "Route pushed");
        self.inner.history.lock().push(route);
        self.notify();
    }

    /// Navigates back one entry.
    ///
    /// Returns `false` (and stays put) when already at the root.
    pub fn back(&self) -> bool {
        {
            let mut history = self.inner.history.lock();
            if history.len() <= 1 {
                return false;
            }
            history.pop();
        }
        debug!(route = %self.current(), "Route popped");
        self.notify();
        true
    }

    /// Replaces the active route without changing depth.
    pub fn replace(&self, path: impl Into<String>) {
        let route = Route::new(path);
        debug!(route = %route, "Route replaced");
        {
            let mut history = self.inner.history.lock();
            history.pop();
            history.push(route);
        }
        self.notify();
    }
}

// ============================================================================
// ContentRouter - Observation
// ============================================================================

impl ContentRouter {
    /// Registers a route-change observer.
    ///
    /// The observer fires once immediately with the current state (modeling
    /// the initial page entry), then once per subsequent route entry/exit.
    /// Changes are pushed, never polled.
    pub fn observe(&self, observer: impl Fn(&RouteChange) + Send + Sync + 'static) {
        let change = self.change_snapshot();
        observer(&change);
        self.inner.observers.lock().push(Box::new(observer));
    }

    /// Builds the current [`RouteChange`] snapshot.
    fn change_snapshot(&self) -> RouteChange {
        RouteChange {
            route: self.current(),
            is_root: self.is_root(),
        }
    }

    /// Notifies all observers of the current state.
    fn notify(&self) {
        let change = self.change_snapshot();
        let observers = self.inner.observers.lock();
        for observer in observers.iter() {
            observer(&change);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_launch_takes_path_from_url() {
        let router =
            ContentRouter::launch("http://localhost:5173/promo/coffee-frenzy").expect("launch");
        assert_eq!(router.current().path(), "/promo/coffee-frenzy");
        assert!(router.is_root());
    }

    #[test]
    fn test_launch_rejects_garbage() {
        let err = ContentRouter::launch("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { .. }));
    }

    #[test]
    fn test_root_is_capability_query() {
        let router = ContentRouter::at("/promo/coffee-frenzy");
        assert!(!router.can_go_back());
        assert!(router.is_root());

        router.push("/promo/coffee-frenzy/offers");
        assert!(router.can_go_back());
        assert!(!router.is_root());

        assert!(router.back());
        assert!(router.is_root());
    }

    #[test]
    fn test_back_at_root_is_noop() {
        let router = ContentRouter::at("/promo/coffee-frenzy");
        assert!(!router.back());
        assert_eq!(router.current().path(), "/promo/coffee-frenzy");
    }

    #[test]
    fn test_replace_keeps_depth() {
        let router = ContentRouter::at("/promo/coffee-frenzy");
        router.push("/promo/coffee-frenzy/offers");
        router.replace("/promo/coffee-frenzy/missions");

        assert_eq!(router.current().path(), "/promo/coffee-frenzy/missions");
        assert!(router.can_go_back());
    }

    #[test]
    fn test_segments() {
        let route = Route::new("/promo/coffee-frenzy/offers/star-coffee-central");
        assert_eq!(
            route.segments(),
            vec!["promo", "coffee-frenzy", "offers", "star-coffee-central"]
        );
    }

    #[test]
    fn test_route_normalizes_leading_slash() {
        assert_eq!(Route::new("promo/x").path(), "/promo/x");
        assert_eq!(Route::new("/promo/x").path(), "/promo/x");
    }

    #[test]
    fn test_observer_fires_on_registration_and_changes() {
        let router = ContentRouter::at("/promo/coffee-frenzy");
        let calls = Arc::new(AtomicUsize::new(0));

        let counted = Arc::clone(&calls);
        router.observe(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        router.push("/promo/coffee-frenzy/offers");
        router.back();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_observer_sees_root_transitions() {
        let router = ContentRouter::at("/promo/coffee-frenzy");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        router.observe(move |change| {
            sink.lock().push((change.route.path().to_string(), change.is_root));
        });

        router.push("/promo/coffee-frenzy/offers");
        router.push("/promo/coffee-frenzy/offers/star-coffee-central");
        router.back();
        router.back();

        let seen = seen.lock();
        assert_eq!(
            *seen,
            vec![
                ("/promo/coffee-frenzy".to_string(), true),
                ("/promo/coffee-frenzy/offers".to_string(), false),
                (
                    "/promo/coffee-frenzy/offers/star-coffee-central".to_string(),
                    false
                ),
                ("/promo/coffee-frenzy/offers".to_string(), false),
                ("/promo/coffee-frenzy".to_string(), true),
            ]
        );
    }
}
