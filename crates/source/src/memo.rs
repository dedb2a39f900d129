//! Time-bounded memoization of enrichment data.
//!
//! Wraps another [`SecondaryProvider`] and remembers each successful result
//! for a fixed time-to-live, so an item that shows up in several pages (or
//! several passes of a live stream) is only fetched once per TTL.

use async_trait::async_trait;
use reel_catalog::ItemId;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::Result;
use crate::{ProviderHandle, SecondaryProvider};

/// Memoizing provider.
///
/// Only successes are remembered: a failed fetch is retried on the next
/// call. Expired entries are evicted when a lookup finds them, and all of
/// them are pruned whenever a fresh result is stored.
pub struct Memoized<D> {
    inner: ProviderHandle<D>,
    ttl: Duration,
    entries: Mutex<HashMap<ItemId, (Instant, D)>>,
}
impl<D: Clone + Debug + Send + Sync + 'static> Memoized<D> {
    pub fn new(inner: ProviderHandle<D>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::default(),
        }
    }

    /// Number of remembered entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, id: ItemId) -> Option<D> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&id) {
            Some((stored, data)) if stored.elapsed() < self.ttl => Some(data.clone()),
            Some(_) => {
                entries.remove(&id);
                None
            },
            None => None,
        }
    }
}

#[async_trait]
impl<D: Clone + Debug + Send + Sync + 'static> SecondaryProvider for Memoized<D> {
    type Data = D;

    async fn fetch(&self, id: ItemId) -> Result<D> {
        if let Some(data) = self.lookup(id) {
            tracing::trace!(%id, "memoized enrichment hit");
            return Ok(data);
        }
        // Lock is not held across the fetch; concurrent misses for one id
        // both reach the inner provider and the last one to finish is kept.
        let data = self.inner.fetch(id).await?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, (stored, _)| stored.elapsed() < self.ttl);
        entries.insert(id, (Instant::now(), data.clone()));
        Ok(data)
    }
}
