//! Content-side bridge pieces.
//!
//! Everything in this module runs inside the embedded web content's world:
//! its own navigation history, and the sender that turns history transitions
//! and user actions into signals toward the host.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ContentRouter`] | Embedded navigation history and root detection |
//! | [`BridgeSender`] | Injected, transport-probing signal emitter |
//! | [`GestureSync`] | Emits gesture signals once per root transition |
//!
//! # Example
//!
//! ```ignore
//! use webshell_bridge::content::{BridgeSender, ContentRouter, GestureSync};
//!
//! let router = ContentRouter::launch("http://localhost:5173/promo/coffee-frenzy")?;
//! let sender = BridgeSender::new(vec![transport]);
//! let _sync = GestureSync::bind(&router, sender.clone());
//!
//! // A close control on any page:
//! sender.request_close();
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Embedded content navigation history.
pub mod router;

/// Content-side signal emission.
pub mod sender;

// ============================================================================
// Re-exports
// ============================================================================

pub use router::{ContentRouter, Route, RouteChange, RouteObserver};
pub use sender::{BridgeSender, GestureSync};
