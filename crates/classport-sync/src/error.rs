//! Error type for cache operations.

/// Error type for cache operations.
///
/// Only foreground fetches surface errors to the caller; background
/// failures are logged and swallowed so a view that already has data
/// keeps it.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
