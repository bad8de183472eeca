//! # Classport Sync
//!
//! Tab-scoped resource caching for the classport portal.
//!
//! Every data-bearing view (classes, attendance, library, ...) shares one
//! [`SyncCache`] owned by the portal shell. On mount a view asks the cache
//! how to load: the first visit fetches in the foreground with a visible
//! loading state; every revisit fetches silently in the background and
//! only replaces the cached data when the payload actually changed, so a
//! tab switch never flickers.
//!
//! This crate provides:
//! - The per-key cache service with foreground/background load policy
//! - Deep-equality dedup of background results
//! - Ticket fencing so a slow stale fetch cannot clobber a newer one
//! - Resource key registry and environment-driven configuration
//!
//! # Example
//!
//! ```ignore
//! use classport_sync::{keys, SyncCache};
//!
//! let cache = SyncCache::new();
//!
//! // On mount: foreground the first time, silent sync afterwards.
//! let outcome = cache
//!     .load_on_mount(keys::ATTENDANCE, fetch_attendance)
//!     .await?;
//! if let Some(rows) = outcome.into_data() {
//!     render(rows);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod keys;

pub use cache::{LoadMode, LoadOutcome, SyncCache, SyncPhase};
pub use config::SyncConfig;
pub use error::SyncError;
