//! Local store trait.
//!
//! The store is a persistent collection of pages keyed by [`PageKey`]. It is
//! the only mutable shared resource of the pipeline: implementations must make
//! a page write atomic, so concurrent writers to the same key can't interleave
//! partial writes (the last complete write wins).

use async_trait::async_trait;
use reel_catalog::{FIRST_PAGE, Filter, Item, PageKey};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::Result;

/// Receiver of change notifications.
///
/// One `()` is sent after every completed write, whichever key it touched.
/// A receiver that falls behind gets [`RecvError::Lagged`](broadcast::error::RecvError::Lagged),
/// which should be treated as "something changed".
pub type Notifications = broadcast::Receiver<()>;

pub type StoreHandle<F, I> = Arc<dyn LocalStore<Filter = F, Item = I>>;

/// Unified interface for local page stores.
///
/// # Examples
///
/// ```
/// use reel_cache::{LocalStore, error::Result};
/// use reel_catalog::PageKey;
/// use reel_catalog::models::{Movie, MovieFilter};
///
/// async fn first_titles(store: &dyn LocalStore<Filter = MovieFilter, Item = Movie>) -> Result<Vec<String>> {
///     let key = PageKey::first(Some(MovieFilter::Popular));
///     let page = store.read(&key).await?.unwrap_or_default();
///     Ok(page.into_iter().map(|movie| movie.title).collect())
/// }
/// ```
#[async_trait]
pub trait LocalStore: Send + Sync {
    type Filter: Filter;
    type Item: Item;

    /// Name of the store (its namespace). Used for logging only.
    fn name(&self) -> &str;

    /// Read one page. `None` when the key has never been written.
    async fn read(&self, key: &PageKey<Self::Filter>) -> Result<Option<Vec<Self::Item>>>;

    /// Replace the page stored under `key`, then notify subscribers.
    ///
    /// Writing an empty page is valid and still notifies.
    async fn write(&self, key: &PageKey<Self::Filter>, items: &[Self::Item]) -> Result<()>;

    /// Subscribe to change notifications for every future write.
    fn subscribe(&self) -> Notifications;

    /// Highest page number of `filter` holding at least one item.
    ///
    /// Empty pages don't count, so "advance past the end" keeps targeting the
    /// same page number.
    async fn max_cached_page(&self, filter: Option<&Self::Filter>) -> Result<Option<u32>>;

    /// Every cached item of `filter`, in ascending page order.
    ///
    /// The default implementation reads pages one at a time up to
    /// [`max_cached_page()`](Self::max_cached_page); backends that can do it
    /// in one query should override it.
    async fn read_all(&self, filter: Option<&Self::Filter>) -> Result<Vec<Self::Item>> {
        let Some(max) = self.max_cached_page(filter).await? else {
            return Ok(Vec::new());
        };
        let mut items = Vec::new();
        for page in FIRST_PAGE..=max {
            if let Some(found) = self.read(&PageKey::new(filter.cloned(), page)).await? {
                items.extend(found);
            }
        }
        Ok(items)
    }
}
