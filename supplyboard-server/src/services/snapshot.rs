//! Snapshot Service - 上游数据快照缓存
//!
//! Snapshots are fetched on demand and cached per source with a TTL.
//! Every fetch draws a ticket from a monotonic counter; a result is stored
//! only when its ticket is newer than the stored one, so a slow fetch that
//! was superseded can never overwrite fresher data. Requests that find the
//! cache expired share one in-flight fetch.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use supplyboard_client::{DataSnapshot, SnapshotSource};
use tokio_util::sync::CancellationToken;

use crate::utils::{AppError, AppResult, ErrorCode};

/// 缓存条目
#[derive(Debug, Clone)]
struct CachedSnapshot {
    ticket: u64,
    stored_at: Instant,
    snapshot: Arc<DataSnapshot>,
}

/// Cache state reported by health and refresh endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStatus {
    pub source: String,
    pub ticket: u64,
    pub fetched_at: DateTime<Utc>,
    pub age_secs: u64,
    pub stale: bool,
    pub orders: usize,
    pub products: usize,
    pub customers: usize,
}

/// 快照服务 (Arc 共享，浅拷贝)
#[derive(Clone)]
pub struct SnapshotService {
    inner: Arc<SnapshotInner>,
}

struct SnapshotInner {
    name: String,
    source: Arc<dyn SnapshotSource>,
    ttl: Duration,
    entries: DashMap<String, CachedSnapshot>,
    tickets: AtomicU64,
    /// Serializes on-demand refreshes from `current()`
    refreshing: tokio::sync::Mutex<()>,
}

impl fmt::Debug for SnapshotService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotService")
            .field("source", &self.inner.name)
            .field("ttl", &self.inner.ttl)
            .field("tickets", &self.inner.tickets.load(Ordering::Relaxed))
            .finish()
    }
}

impl SnapshotService {
    pub fn new(name: impl Into<String>, source: Arc<dyn SnapshotSource>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(SnapshotInner {
                name: name.into(),
                source,
                ttl,
                entries: DashMap::new(),
                tickets: AtomicU64::new(0),
                refreshing: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.inner.name
    }

    fn entry(&self) -> Option<CachedSnapshot> {
        self.inner.entries.get(&self.inner.name).map(|e| e.value().clone())
    }

    fn is_fresh(&self, entry: &CachedSnapshot) -> bool {
        entry.stored_at.elapsed() < self.inner.ttl
    }

    /// Cached snapshot regardless of age
    pub fn cached(&self) -> Option<Arc<DataSnapshot>> {
        self.entry().map(|e| e.snapshot)
    }

    /// Fresh snapshot, fetching when the cache is empty or expired
    ///
    /// Concurrent callers wait for a single fetch. A failed refresh falls
    /// back to the expired snapshot when there is one.
    pub async fn current(&self) -> AppResult<Arc<DataSnapshot>> {
        let stale = match self.entry() {
            Some(entry) if self.is_fresh(&entry) => return Ok(entry.snapshot),
            other => other,
        };
        let seen = stale.as_ref().map_or(0, |e| e.ticket);

        let _guard = self.inner.refreshing.lock().await;
        // another caller stored a newer snapshot while we waited
        if let Some(entry) = self.entry().filter(|e| e.ticket > seen) {
            return Ok(entry.snapshot);
        }

        match self.refresh().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => match stale {
                Some(entry) => {
                    tracing::warn!(
                        source = %self.inner.name,
                        error = %e,
                        age_secs = entry.stored_at.elapsed().as_secs(),
                        "Snapshot refresh failed, serving stale snapshot"
                    );
                    Ok(entry.snapshot)
                }
                None => Err(e),
            },
        }
    }

    /// Fetch from the source now
    ///
    /// Returns the snapshot that is current after the fetch, which is a newer
    /// one when this fetch was overtaken.
    pub async fn refresh(&self) -> AppResult<Arc<DataSnapshot>> {
        let ticket = self.inner.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();

        let snapshot = self.inner.source.fetch_snapshot().await.map_err(|e| {
            tracing::error!(source = %self.inner.name, ticket, error = %e, "Snapshot fetch failed");
            AppError::from(e)
        })?;

        tracing::info!(
            source = %self.inner.name,
            ticket,
            orders = snapshot.orders.len(),
            products = snapshot.products.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Snapshot fetched"
        );
        Ok(self.store(ticket, snapshot))
    }

    /// Store `snapshot` unless a newer ticket is already stored
    fn store(&self, ticket: u64, snapshot: DataSnapshot) -> Arc<DataSnapshot> {
        let fresh = CachedSnapshot {
            ticket,
            stored_at: Instant::now(),
            snapshot: Arc::new(snapshot),
        };

        match self.inner.entries.entry(self.inner.name.clone()) {
            Entry::Occupied(mut slot) => {
                if slot.get().ticket > ticket {
                    tracing::debug!(
                        source = %self.inner.name,
                        ticket,
                        stored = slot.get().ticket,
                        "Discarding superseded snapshot"
                    );
                    return slot.get().snapshot.clone();
                }
                let snapshot = fresh.snapshot.clone();
                slot.insert(fresh);
                snapshot
            }
            Entry::Vacant(slot) => {
                let snapshot = fresh.snapshot.clone();
                slot.insert(fresh);
                snapshot
            }
        }
    }

    pub fn status(&self) -> AppResult<SnapshotStatus> {
        let entry = self.entry().ok_or_else(|| {
            AppError::with_message(ErrorCode::SnapshotUnavailable, "No snapshot fetched yet")
        })?;
        Ok(SnapshotStatus {
            source: self.inner.name.clone(),
            ticket: entry.ticket,
            fetched_at: entry.snapshot.fetched_at,
            age_secs: entry.stored_at.elapsed().as_secs(),
            stale: !self.is_fresh(&entry),
            orders: entry.snapshot.orders.len(),
            products: entry.snapshot.products.len(),
            customers: entry.snapshot.customers.len(),
        })
    }

    /// Refresh every `interval` until `shutdown` fires
    pub async fn refresh_loop(self, interval: Duration, shutdown: CancellationToken) {
        // first tick after one interval; startup warm-up covers t=0
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(source = %self.inner.name, "Snapshot refresh loop stopped");
                    return;
                }
                _ = ticker.tick() => {
                    // errors are already logged by refresh()
                    let _ = self.refresh().await;
                }
            }
        }
    }
}
