//! Cache-aside access to pages of primary items.
//!
//! The local store answers whenever it holds a non-empty page. Otherwise the
//! remote source is asked and its answer is written back before it's
//! returned, so the next request for the same page is a hit.

use reel_cache::StoreHandle;
use reel_catalog::{FIRST_PAGE, Filter, Item, PageKey};
use reel_source::SourceHandle;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

pub struct Repository<F, I> {
    store: StoreHandle<F, I>,
    source: SourceHandle<F, I>,
}
impl<F, I> Clone for Repository<F, I> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            source: Arc::clone(&self.source),
        }
    }
}

impl<F: Filter, I: Item> Repository<F, I> {
    pub fn new(store: StoreHandle<F, I>, source: SourceHandle<F, I>) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &StoreHandle<F, I> {
        &self.store
    }

    /// One page of items, from the store when cached, from the remote otherwise.
    ///
    /// An empty cached page counts as a miss. No retries: a remote failure is
    /// returned as is, and so is a failure to persist a fresh page.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn fetch_page(&self, filter: Option<&F>, page: u32) -> Result<Vec<I>> {
        let key = PageKey::new(filter.cloned(), page);
        match self.store.read(&key).await.map_err(ErrorKind::cache)? {
            Some(items) if !items.is_empty() => {
                tracing::debug!(items = items.len(), "cache hit");
                return Ok(items);
            },
            _ => tracing::debug!("cache miss"),
        }
        self.fetch_remote(&key).await
    }

    /// Fetch a page from the remote regardless of what's cached, and store it.
    ///
    /// An empty remote page is stored too (and notifies), which is how a live
    /// view learns there was nothing more to load.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn refresh_page(&self, filter: Option<&F>, page: u32) -> Result<Vec<I>> {
        self.fetch_remote(&PageKey::new(filter.cloned(), page)).await
    }

    async fn fetch_remote(&self, key: &PageKey<F>) -> Result<Vec<I>> {
        let items = self.source.fetch_page(key.filter(), key.page).await.map_err(ErrorKind::source)?;
        tracing::debug!(source = self.source.name(), items = items.len(), "fetched remote page");
        self.store.write(key, &items).await.map_err(ErrorKind::cache)?;
        Ok(items)
    }

    /// The page after the last non-empty cached page of `filter`.
    pub async fn next_page(&self, filter: Option<&F>) -> Result<u32> {
        let max = self.store.max_cached_page(filter).await.map_err(ErrorKind::cache)?;
        Ok(max.map_or(FIRST_PAGE, |page| page.saturating_add(1)))
    }

    /// Every cached item of `filter` in page order.
    ///
    /// Remote lists shift while they're being paged through, so the same item
    /// can be cached on two pages. Only its first occurrence is kept.
    pub async fn snapshot(&self, filter: Option<&F>) -> Result<Vec<I>> {
        let mut items = self.store.read_all(filter).await.map_err(ErrorKind::cache)?;
        let mut seen = HashSet::with_capacity(items.len());
        items.retain(|item| seen.insert(item.id()));
        Ok(items)
    }
}
