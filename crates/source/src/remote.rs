use crate::error::Result;
use async_trait::async_trait;
use reel_catalog::{Filter, Item};

/// Source of truth for primary items.
///
/// A page fetch is a pure function of `(filter, page)` as far as the
/// pipeline is concerned: no caching, no retries. A page past the end of the
/// list is an empty `Vec`, not an error.
///
/// # Examples
///
/// ```
/// use reel_catalog::models::{Movie, MovieFilter};
/// use reel_source::{RemoteSource, error::Result};
///
/// async fn first_title(source: &dyn RemoteSource<Filter = MovieFilter, Item = Movie>) -> Result<Option<String>> {
///     let page = source.fetch_page(Some(&MovieFilter::Popular), 1).await?;
///     Ok(page.into_iter().next().map(|movie| movie.title))
/// }
/// ```
#[async_trait]
pub trait RemoteSource: Send + Sync {
    type Filter: Filter;
    type Item: Item;

    /// Name of the source. Used for logging only.
    fn name(&self) -> &str;

    /// Fetch one page (1-based) of items for `filter`.
    async fn fetch_page(&self, filter: Option<&Self::Filter>, page: u32) -> Result<Vec<Self::Item>>;
}
