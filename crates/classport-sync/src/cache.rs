//! The per-key resource cache shared by sibling portal views.
//!
//! Each logical resource (one key) moves through a small state machine:
//! empty -> loading (foreground, visible) -> loaded, and thereafter
//! loaded -> syncing (background, silent) -> loaded. Background results
//! replace the cached data only when they differ structurally from it;
//! identical payloads are discarded without notifying anyone, which is
//! what keeps tab switches from flickering.
//!
//! Every issued fetch takes a monotonic ticket per key. A result is only
//! applied if no later ticket has been applied, so a slow stale response
//! cannot clobber a newer one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, instrument, warn};

use crate::config::SyncConfig;
use crate::error::SyncError;

/// How a load presents itself to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Visible, blocking load; used only while the key has no data yet.
    Foreground,
    /// Silent re-sync of a key that already has data.
    Background,
}

/// Lifecycle of one cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Never successfully fetched.
    Empty,
    /// First fetch in flight.
    Loading,
    /// Data cached, nothing in flight.
    Loaded,
    /// Data cached, silent re-fetch in flight.
    Syncing,
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    /// Fresh data was applied to the cache.
    Updated(T),
    /// The fetched payload matched the cache; nothing changed, nobody
    /// was notified.
    Unchanged,
    /// A later fetch already applied; this result was discarded.
    Superseded,
    /// Background fetch failed; the previous data was kept.
    Retained,
}

impl<T> LoadOutcome<T> {
    /// The fresh data, when this load produced any.
    pub fn into_data(self) -> Option<T> {
        match self {
            LoadOutcome::Updated(data) => Some(data),
            _ => None,
        }
    }
}

struct Entry {
    data: Option<Value>,
    loaded: bool,
    /// Tickets handed out for this key.
    issued: u64,
    /// Ticket of the newest applied result.
    applied: u64,
    in_flight: u32,
    version_tx: watch::Sender<u64>,
}

impl Entry {
    fn new() -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            data: None,
            loaded: false,
            issued: 0,
            applied: 0,
            in_flight: 0,
            version_tx,
        }
    }

    fn phase(&self) -> SyncPhase {
        match (self.loaded, self.in_flight > 0) {
            (false, false) => SyncPhase::Empty,
            (false, true) => SyncPhase::Loading,
            (true, false) => SyncPhase::Loaded,
            (true, true) => SyncPhase::Syncing,
        }
    }

    fn bump_version(&mut self) {
        self.version_tx.send_modify(|v| *v += 1);
    }
}

/// Per-resource cache service.
///
/// One instance is owned by the portal shell that outlives tab switches;
/// child views receive it by reference and go through its methods instead
/// of holding their own `{data, loaded}` pairs.
pub struct SyncCache {
    config: SyncConfig,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Default for SyncCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncCache {
    /// Create a cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Create a cache with explicit configuration.
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The load mode a view should use when it (re)mounts.
    ///
    /// Foreground until the first successful fetch, background afterwards.
    pub fn mode_for(&self, key: &str) -> LoadMode {
        if self.is_loaded(key) {
            LoadMode::Background
        } else {
            LoadMode::Foreground
        }
    }

    /// Whether the key has been successfully fetched at least once.
    pub fn is_loaded(&self, key: &str) -> bool {
        self.entries().get(key).is_some_and(|e| e.loaded)
    }

    /// The key's lifecycle phase.
    pub fn phase(&self, key: &str) -> SyncPhase {
        self.entries()
            .get(key)
            .map(Entry::phase)
            .unwrap_or(SyncPhase::Empty)
    }

    /// The cached data for a key.
    ///
    /// Returns `None` when nothing is cached or the cached value does not
    /// deserialize as `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let entries = self.entries();
        let value = entries.get(key)?.data.as_ref()?;
        match serde_json::from_value(value.clone()) {
            Ok(data) => Some(data),
            Err(e) => {
                error!(sync.key = %key, error = %e, "Failed to deserialize cached value");
                None
            }
        }
    }

    /// Watch for data changes on a key.
    ///
    /// The value increments each time the cached data is replaced. A view
    /// drops its receiver on unmount; a replacement applied after that
    /// notifies nobody.
    pub fn subscribe(&self, key: &str) -> watch::Receiver<u64> {
        let mut entries = self.entries();
        entries
            .entry(key.to_string())
            .or_insert_with(Entry::new)
            .version_tx
            .subscribe()
    }

    /// Drop the cached data for a key.
    ///
    /// The next mount goes back to a foreground load, and any fetch still
    /// in flight for the key is discarded when it resolves.
    #[instrument(skip(self))]
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.data = None;
            entry.loaded = false;
            entry.applied = entry.issued;
            entry.bump_version();
            debug!(sync.key = %key, "Cache entry invalidated");
        }
    }

    /// Fetch a resource and reconcile the result with the cache.
    ///
    /// Foreground mode is for a key with no data yet: a failure is
    /// returned to the view and `loaded` stays false so the next mount
    /// retries in the foreground. Background mode re-syncs a loaded key:
    /// an identical payload is discarded silently, a failure is logged
    /// and swallowed, and only a genuinely different payload replaces the
    /// cache and notifies subscribers.
    #[instrument(skip(self, fetcher), fields(sync.key = %key, sync.mode = ?mode))]
    pub async fn load<T, F, Fut>(
        &self,
        key: &str,
        mode: LoadMode,
        fetcher: F,
    ) -> Result<LoadOutcome<T>, SyncError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mode = self.effective_mode(key, mode);
        let ticket = {
            let mut entries = self.entries();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            entry.issued += 1;
            entry.in_flight += 1;
            entry.issued
        };

        let result = match self.config.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, fetcher()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("fetch timed out after {limit:?}")),
            },
            None => fetcher().await,
        };

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                self.finish(key);
                return match mode {
                    LoadMode::Foreground => {
                        error!(sync.key = %key, error = %e, "Foreground fetch failed");
                        Err(SyncError::Fetch(e))
                    }
                    LoadMode::Background => {
                        warn!(sync.key = %key, error = %e, "Background sync failed; keeping cached data");
                        Ok(LoadOutcome::Retained)
                    }
                };
            }
        };

        let value = match serde_json::to_value(&data) {
            Ok(value) => value,
            Err(e) => {
                self.finish(key);
                return Err(SyncError::Serialization(e));
            }
        };

        let mut entries = self.entries();
        let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
        entry.in_flight = entry.in_flight.saturating_sub(1);

        if ticket <= entry.applied {
            debug!(sync.key = %key, "Discarding result of a superseded fetch");
            return Ok(LoadOutcome::Superseded);
        }
        entry.applied = ticket;

        if entry.data.as_ref() == Some(&value) {
            debug!(sync.key = %key, "Payload unchanged; cache kept as-is");
            return Ok(LoadOutcome::Unchanged);
        }

        entry.data = Some(value);
        entry.loaded = true;
        entry.bump_version();
        debug!(sync.key = %key, "Cache entry updated");

        Ok(LoadOutcome::Updated(data))
    }

    /// Load with the mode a mounting view should use.
    pub async fn load_on_mount<T, F, Fut>(
        &self,
        key: &str,
        fetcher: F,
    ) -> Result<LoadOutcome<T>, SyncError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mode = self.mode_for(key);
        self.load(key, mode, fetcher).await
    }

    /// A foreground request against an already-loaded key downgrades to a
    /// background sync; the data on screen must not be blanked by a
    /// redundant visible load.
    fn effective_mode(&self, key: &str, mode: LoadMode) -> LoadMode {
        if mode == LoadMode::Foreground && self.is_loaded(key) {
            debug!(sync.key = %key, "Key already loaded; downgrading to background sync");
            LoadMode::Background
        } else {
            mode
        }
    }

    fn finish(&self, key: &str) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_foreground_load_populates_cache() {
        let cache = SyncCache::new();
        assert_eq!(cache.mode_for("classes"), LoadMode::Foreground);
        assert_eq!(cache.phase("classes"), SyncPhase::Empty);

        let outcome = cache
            .load("classes", LoadMode::Foreground, || async {
                Ok(json!([{"id": 1}]))
            })
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Updated(json!([{"id": 1}])));
        assert!(cache.is_loaded("classes"));
        assert_eq!(cache.phase("classes"), SyncPhase::Loaded);
        assert_eq!(cache.get::<Value>("classes"), Some(json!([{"id": 1}])));
        assert_eq!(cache.mode_for("classes"), LoadMode::Background);
    }

    #[tokio::test]
    async fn test_foreground_failure_leaves_key_unloaded() {
        let cache = SyncCache::new();

        let result = cache
            .load::<Value, _, _>("classes", LoadMode::Foreground, || async {
                Err(anyhow::anyhow!("boom"))
            })
            .await;

        assert!(matches!(result, Err(SyncError::Fetch(_))));
        assert!(!cache.is_loaded("classes"));
        // The next mount retries in the foreground.
        assert_eq!(cache.mode_for("classes"), LoadMode::Foreground);
        assert_eq!(cache.phase("classes"), SyncPhase::Empty);
    }

    #[tokio::test]
    async fn test_background_identical_payload_is_discarded() {
        let cache = SyncCache::new();
        let data = json!([{"id": 1, "name": "Physics"}]);

        cache
            .load("classes", LoadMode::Foreground, || {
                let data = data.clone();
                async move { Ok(data) }
            })
            .await
            .unwrap();

        let mut rx = cache.subscribe("classes");
        rx.borrow_and_update();

        let outcome = cache
            .load("classes", LoadMode::Background, || {
                let data = data.clone();
                async move { Ok(data) }
            })
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Unchanged);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_background_different_payload_replaces_and_notifies() {
        let cache = SyncCache::new();

        cache
            .load("notices", LoadMode::Foreground, || async { Ok(json!([])) })
            .await
            .unwrap();

        let mut rx = cache.subscribe("notices");
        rx.borrow_and_update();

        let outcome = cache
            .load("notices", LoadMode::Background, || async {
                Ok(json!([{"id": 9}]))
            })
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Updated(json!([{"id": 9}])));
        assert!(rx.has_changed().unwrap());
        assert_eq!(cache.get::<Value>("notices"), Some(json!([{"id": 9}])));
    }

    #[tokio::test]
    async fn test_background_failure_keeps_previous_data() {
        let cache = SyncCache::new();
        let data = json!([{"id": 1}]);

        cache
            .load("attendance", LoadMode::Foreground, || {
                let data = data.clone();
                async move { Ok(data) }
            })
            .await
            .unwrap();

        let outcome = cache
            .load::<Value, _, _>("attendance", LoadMode::Background, || async {
                Err(anyhow::anyhow!("server hiccup"))
            })
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Retained);
        assert!(cache.is_loaded("attendance"));
        assert_eq!(cache.get::<Value>("attendance"), Some(data));
    }

    #[tokio::test]
    async fn test_stale_fetch_is_superseded_by_newer_one() {
        let cache = SyncCache::new();
        cache
            .load("exams", LoadMode::Foreground, || async { Ok(json!([1])) })
            .await
            .unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        // Issued first, resolves last.
        let slow = cache.load("exams", LoadMode::Background, || async move {
            let _ = rx.await;
            Ok(json!(["stale"]))
        });
        // Issued second, resolves first, then releases the slow fetch.
        let fast = async {
            let outcome = cache
                .load("exams", LoadMode::Background, || async { Ok(json!(["fresh"])) })
                .await
                .unwrap();
            let _ = tx.send(());
            outcome
        };

        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

        assert_eq!(fast_outcome, LoadOutcome::Updated(json!(["fresh"])));
        assert_eq!(slow_outcome.unwrap(), LoadOutcome::Superseded);
        assert_eq!(cache.get::<Value>("exams"), Some(json!(["fresh"])));
    }

    #[tokio::test]
    async fn test_invalidate_resets_to_foreground() {
        let cache = SyncCache::new();
        cache
            .load("library", LoadMode::Foreground, || async { Ok(json!([1])) })
            .await
            .unwrap();

        cache.invalidate("library");

        assert!(!cache.is_loaded("library"));
        assert_eq!(cache.phase("library"), SyncPhase::Empty);
        assert_eq!(cache.get::<Value>("library"), None);
        assert_eq!(cache.mode_for("library"), LoadMode::Foreground);
    }

    #[tokio::test]
    async fn test_invalidate_fences_in_flight_fetch() {
        let cache = SyncCache::new();
        cache
            .load("library", LoadMode::Foreground, || async { Ok(json!([1])) })
            .await
            .unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let inflight = cache.load("library", LoadMode::Background, || async move {
            let _ = rx.await;
            Ok(json!([2]))
        });
        let invalidation = async {
            cache.invalidate("library");
            let _ = tx.send(());
        };

        let (outcome, ()) = tokio::join!(inflight, invalidation);

        assert_eq!(outcome.unwrap(), LoadOutcome::Superseded);
        assert_eq!(cache.get::<Value>("library"), None);
    }

    #[tokio::test]
    async fn test_foreground_on_loaded_key_downgrades() {
        let cache = SyncCache::new();
        cache
            .load("classes", LoadMode::Foreground, || async { Ok(json!([1])) })
            .await
            .unwrap();

        // A redundant foreground request behaves like a background sync:
        // a failure is swallowed instead of surfacing a blocking error.
        let outcome = cache
            .load::<Value, _, _>("classes", LoadMode::Foreground, || async {
                Err(anyhow::anyhow!("boom"))
            })
            .await
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Retained);
        assert_eq!(cache.get::<Value>("classes"), Some(json!([1])));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_a_fetch_failure() {
        let cache = SyncCache::with_config(SyncConfig {
            fetch_timeout: Some(std::time::Duration::from_millis(10)),
        });

        let result = cache
            .load::<Value, _, _>("classes", LoadMode::Foreground, || async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                Ok(json!([1]))
            })
            .await;

        assert!(matches!(result, Err(SyncError::Fetch(_))));
        assert!(!cache.is_loaded("classes"));
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Row {
            id: u32,
            name: String,
        }

        let cache = SyncCache::new();
        let rows = vec![Row {
            id: 1,
            name: "Kinematics".into(),
        }];

        cache
            .load("library", LoadMode::Foreground, || {
                let rows = rows.clone();
                async move { Ok(rows) }
            })
            .await
            .unwrap();

        assert_eq!(cache.get::<Vec<Row>>("library"), Some(rows));
    }
}
