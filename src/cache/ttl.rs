//! Time-bounded in-memory cache with a periodic background sweep
//!
//! Provides a `TtlCache` that stores raw response bytes under a single
//! exclusive lock. A sweeper task spawned at construction removes stale
//! entries once per TTL period and stops when the cache is dropped or shut down.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

/// Smallest sweep period accepted; `tokio::time::interval` rejects zero.
const MIN_TTL: Duration = Duration::from_millis(1);

type EntryMap = HashMap<String, CacheEntry>;

/// A single cached payload
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Raw bytes as received from the network
    value: Vec<u8>,
    /// When the entry was inserted or last overwritten
    created_at: Instant,
}

/// Concurrency-safe key to bytes store with time-based expiry
///
/// `get` reports whatever is in the store at call time, including entries
/// that are already older than the TTL but have not been swept yet. Staleness
/// is only evaluated by the sweep, which runs every `ttl` and removes entries
/// whose `created_at + ttl` is at or before the tick.
#[derive(Debug)]
pub struct TtlCache {
    entries: Arc<Mutex<EntryMap>>,
    ttl: Duration,
    shutdown_tx: mpsc::Sender<()>,
}

impl TtlCache {
    /// Creates a new cache and spawns its sweeper on the current tokio runtime
    ///
    /// # Arguments
    /// * `ttl` - How long entries stay fresh; also the sweep period
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn new(ttl: Duration) -> Self {
        let ttl = ttl.max(MIN_TTL);
        let entries = Arc::new(Mutex::new(EntryMap::new()));
        let shutdown_tx = spawn_sweeper(Arc::clone(&entries), ttl);

        Self {
            entries,
            ttl,
            shutdown_tx,
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Inserts or overwrites the entry for `key`, stamping the current time
    pub fn add(&self, key: impl Into<String>, value: Vec<u8>) {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
        };
        lock(&self.entries).insert(key.into(), entry);
    }

    /// Returns a copy of the bytes stored for `key`, if present
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        lock(&self.entries).get(key).map(|entry| entry.value.clone())
    }

    /// Number of entries currently held, stale or not
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    /// Runs one sweep immediately, as if a tick fired now
    ///
    /// # Returns
    /// The number of entries removed
    pub fn reap_expired(&self) -> usize {
        reap(&self.entries, self.ttl, Instant::now())
    }

    /// Stops the background sweeper
    ///
    /// Entries already in the store stay readable until the cache is dropped.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Acquires the store lock, recovering the map if a holder panicked
fn lock(entries: &Mutex<EntryMap>) -> MutexGuard<'_, EntryMap> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes every entry whose freshness window ended at or before `now`
fn reap(entries: &Mutex<EntryMap>, ttl: Duration, now: Instant) -> usize {
    let mut entries = lock(entries);
    let before = entries.len();
    entries.retain(|_, entry| entry.created_at + ttl > now);
    before - entries.len()
}

/// Spawns the sweep loop and returns the sender that stops it
///
/// The loop also ends when the sender is dropped, so dropping the owning
/// `TtlCache` is enough to stop it.
fn spawn_sweeper(entries: Arc<Mutex<EntryMap>>, ttl: Duration) -> mpsc::Sender<()> {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl);
        // Skip the first tick (immediate)
        interval.tick().await;

        loop {
            tokio::select! {
                tick = interval.tick() => {
                    let removed = reap(&entries, ttl, tick);
                    if removed > 0 {
                        debug!(removed, "Swept expired cache entries");
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!("Cache sweeper stopped");
                    break;
                }
            }
        }
    });

    shutdown_tx
}
