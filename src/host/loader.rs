//! Asynchronous, cancellable content loading.
//!
//! The shell never fetches content itself; the embedding layer supplies a
//! [`ContentLoader`] and the shell drives it: one load task per presented
//! screen, aborted the moment the screen begins dismissal, with the result
//! marshaled back onto the shell's event loop.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::identifiers::ScreenId;

// ============================================================================
// LoadRequest
// ============================================================================

/// A request to resolve embedded content for one screen.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Screen the content is destined for.
    pub screen_id: ScreenId,
    /// The single launch URL; path segments carry all configuration.
    pub url: Url,
}

// ============================================================================
// LoadedContent
// ============================================================================

/// Metadata about successfully resolved content.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    /// Final URL after any redirects the loader followed.
    pub final_url: Url,
    /// Document title, when the loader knows one.
    pub title: Option<String>,
}

// ============================================================================
// ContentLoader
// ============================================================================

/// Resolves launch URLs into embedded content.
///
/// Implementations live in the embedding layer (a real web view, a CMS
/// client, a test double). Load failures are reported to the shell, logged
/// passively, and never retried — reload is user-initiated via back and
/// re-entry.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    /// Loads content for a screen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadFailed`](crate::Error::LoadFailed) (or any other
    /// error) when content cannot be resolved.
    async fn load(&self, request: LoadRequest) -> Result<LoadedContent>;
}

// ============================================================================
// NullLoader
// ============================================================================

/// Loader that resolves immediately without fetching anything.
///
/// Used when the embedding platform drives the actual web view itself and
/// the shell only needs the lifecycle bookkeeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLoader;

#[async_trait]
impl ContentLoader for NullLoader {
    async fn load(&self, request: LoadRequest) -> Result<LoadedContent> {
        Ok(LoadedContent {
            final_url: request.url,
            title: None,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
