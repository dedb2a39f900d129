//! In-memory page store for testing.

use crate::error::{ErrorKind, Result};
use crate::store::{LocalStore, Notifications};
use async_trait::async_trait;
use reel_catalog::{Filter, Item, PageKey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{RwLock, broadcast};

/// In-memory page store for testing.
///
/// Pages are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation. Reads and writes
/// can be made to fail on demand, and writes are counted, which is what
/// tests of the repository layer need.
pub struct MemoryStore<F, I> {
    name: String,
    pages: RwLock<HashMap<PageKey<F>, Vec<I>>>,
    changes: broadcast::Sender<()>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl<F: Filter, I: Item> MemoryStore<F, I> {
    /// Create a memory store pre-populated with pages.
    pub fn with_pages(pages: impl IntoIterator<Item = (PageKey<F>, Vec<I>)>) -> Self {
        Self {
            name: "memory".to_string(),
            pages: RwLock::new(pages.into_iter().collect()),
            changes: broadcast::channel(reel_config::DEFAULT_NOTIFICATION_CAPACITY).0,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent read fail (or succeed again) with a database error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again) with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Notify subscribers without changing anything.
    pub fn touch(&self) {
        _ = self.changes.send(());
    }

    fn check_reads(&self) -> Result<()> {
        match self.fail_reads.load(Ordering::SeqCst) {
            true => exn::bail!(ErrorKind::Database),
            false => Ok(()),
        }
    }
}
impl<F: Filter, I: Item> Default for MemoryStore<F, I> {
    fn default() -> Self {
        Self::with_pages(Vec::new())
    }
}

#[async_trait]
impl<F: Filter, I: Item> LocalStore for MemoryStore<F, I> {
    type Filter = F;
    type Item = I;

    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self, key: &PageKey<F>) -> Result<Option<Vec<I>>> {
        self.check_reads()?;
        Ok(self.pages.read().await.get(key).cloned())
    }

    async fn write(&self, key: &PageKey<F>, items: &[I]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::Database);
        }
        self.pages.write().await.insert(key.clone(), items.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        _ = self.changes.send(());
        Ok(())
    }

    fn subscribe(&self) -> Notifications {
        self.changes.subscribe()
    }

    async fn max_cached_page(&self, filter: Option<&F>) -> Result<Option<u32>> {
        self.check_reads()?;
        let guard = self.pages.read().await;
        Ok(guard
            .iter()
            .filter(|(key, items)| key.filter() == filter && !items.is_empty())
            .map(|(key, _)| key.page)
            .max())
    }

    async fn read_all(&self, filter: Option<&F>) -> Result<Vec<I>> {
        self.check_reads()?;
        let guard = self.pages.read().await;
        let mut pages: Vec<_> = guard.iter().filter(|(key, _)| key.filter() == filter).collect();
        pages.sort_by_key(|(key, _)| key.page);
        Ok(pages.into_iter().flat_map(|(_, items)| items.iter().cloned()).collect())
    }
}
