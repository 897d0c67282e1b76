//! Process-wide composite cache: one slot, short TTL, explicit clear.
//!
//! The slot lives behind an async mutex that is held across a refresh, so
//! concurrent callers during an expiry window produce exactly one
//! recompute; everyone else awaits and reads the fresh value. Readers
//! inside the TTL window observe the identical cached value, timestamp
//! included.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::Mutex;

use crate::compose::CompositeSentiment;

#[derive(Debug, Clone)]
struct Entry {
    value: CompositeSentiment,
    written_at: Instant,
}

#[derive(Debug)]
pub struct CompositeCache {
    slot: Mutex<Option<Entry>>,
    ttl: Duration,
}

impl CompositeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached composite if fresh, otherwise run `refresh` and
    /// store its result. A failed refresh leaves the slot untouched.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<CompositeSentiment>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CompositeSentiment>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(entry) = slot.as_ref() {
            if entry.written_at.elapsed() < self.ttl {
                return Ok(entry.value.clone());
            }
        }

        let fresh = refresh().await?;
        *slot = Some(Entry {
            value: fresh.clone(),
            written_at: Instant::now(),
        });
        Ok(fresh)
    }

    /// Manual invalidation: empty the slot unconditionally.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    /// Current cached value if still fresh, without triggering a refresh.
    pub async fn peek(&self) -> Option<CompositeSentiment> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|e| e.written_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }
}
