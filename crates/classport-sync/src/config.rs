//! Sync cache configuration.
//!
//! This module provides configuration for fetch behavior loaded from
//! environment variables.

use std::env;
use std::time::Duration;

/// Sync cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SYNC_FETCH_TIMEOUT_SECS`: upper bound for a single fetch in seconds;
///   unset or unparsable means no bound beyond the transport's own.
#[derive(Clone, Debug, Default)]
pub struct SyncConfig {
    /// Optional upper bound for a single fetch.
    pub fetch_timeout: Option<Duration>,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            fetch_timeout: env::var("SYNC_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        }
    }
}
