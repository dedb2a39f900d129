//! Live, deduplicated views of a filter.
//!
//! A view emits the presentation of everything cached for its filter as soon
//! as it's polled, then again after every local store write, but only when
//! the presentation actually changed since the previous emission.
//!
//! Error policy:
//! - The first pass failing is yielded once as `Err`, then the view ends.
//! - A later pass failing is logged and skipped; the view keeps waiting.
//!
//! Otherwise a view runs until it is dropped: it owns a handle to the store,
//! so the notification channel it listens on stays open.

use async_stream::stream;
use futures::Stream;
use reel_asyncutils::TryDistinctStreamExt;
use reel_cache::Notifications;
use std::pin::Pin;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::catalog::Catalog;
use crate::context::Context;
use crate::error::Result;

pub type CatalogStream<M> = Pin<Box<dyn Stream<Item = Result<Vec<M>>> + Send>>;

impl<C: Context> Catalog<C> {
    /// Open a live view of everything cached for `filter`.
    ///
    /// Dropping the stream unsubscribes it and cancels any pass in progress,
    /// enrichment fetches included.
    pub fn open_stream(&self, filter: Option<C::Filter>) -> CatalogStream<C::Model> {
        let catalog = self.clone();
        // Subscribed before the first read: a write landing in between still
        // triggers a pass.
        let mut changes = catalog.repository.store().subscribe();
        // `rustfmt` does not format macros that use braces. Wrap in parentheses!
        let passes = stream!({
            match catalog.snapshot(filter.as_ref()).await {
                Ok(models) => yield Ok(models),
                Err(err) => {
                    yield Err(err);
                    return;
                },
            }
            while wait_for_change(&mut changes).await {
                match catalog.snapshot(filter.as_ref()).await {
                    Ok(models) => yield Ok(models),
                    Err(err) => tracing::warn!(context = C::NAME, error = ?err, "skipping view update"),
                }
            }
        });
        Box::pin(passes.try_distinct_until_changed())
    }

    async fn snapshot(&self, filter: Option<&C::Filter>) -> Result<Vec<C::Model>> {
        let items = self.repository.snapshot(filter).await?;
        self.project(&items).await
    }
}

/// Wait for the next store change. `false` if the channel closed.
///
/// Changes already queued behind the first one are consumed too: the pass
/// that follows reads the store after all of them.
async fn wait_for_change(changes: &mut Notifications) -> bool {
    match changes.recv().await {
        Ok(()) => {},
        Err(RecvError::Lagged(missed)) => tracing::debug!(missed, "view fell behind store writes"),
        Err(RecvError::Closed) => return false,
    }
    while matches!(changes.try_recv(), Ok(()) | Err(TryRecvError::Lagged(_))) {}
    true
}

#[cfg(test)]
mod tests {
    use crate::testing::{Fixture, ids, movies, provider};
    use futures::StreamExt;
    use reel_cache::LocalStore;
    use reel_catalog::models::MovieFilter;
    use reel_catalog::{ItemId, PageKey};
    use reel_source::MockSource;
    use std::sync::Arc;
    use std::time::Duration;

    use super::CatalogStream;
    use crate::error::ErrorKind;
    use reel_catalog::models::MovieCard;

    /// Next emission, or `None` when nothing arrives once the runtime is idle.
    ///
    /// With the clock paused, the timeout only fires after every other task
    /// has run out of work.
    async fn next(stream: &mut CatalogStream<MovieCard>) -> Option<Vec<MovieCard>> {
        match tokio::time::timeout(Duration::from_secs(5), stream.next()).await {
            Ok(Some(result)) => Some(result.unwrap()),
            Ok(None) => panic!("stream ended"),
            Err(_elapsed) => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_store_then_one_write() {
        let fixture = Fixture::new(MockSource::default(), provider(1..=3));
        let mut stream = fixture.catalog().open_stream(None);
        assert_eq!(next(&mut stream).await, Some(vec![]));

        fixture.store.write(&PageKey::first(None), &movies(1..=3)).await.unwrap();
        assert_eq!(next(&mut stream).await.map(|cards| ids(&cards)), Some(vec![1, 2, 3]));

        // Same content again: nothing to emit.
        fixture.store.write(&PageKey::first(None), &movies(1..=3)).await.unwrap();
        assert_eq!(next(&mut stream).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_notifications_emit_once() {
        let fixture = Fixture::new(MockSource::default(), provider([1]));
        fixture.store.write(&PageKey::first(None), &movies([1])).await.unwrap();
        let mut stream = fixture.catalog().open_stream(None);
        assert!(next(&mut stream).await.is_some());
        fixture.store.touch();
        assert_eq!(next(&mut stream).await, None);
        fixture.store.touch();
        fixture.store.touch();
        assert_eq!(next(&mut stream).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_page_emits_through_notification() {
        let fixture = Fixture::new(MockSource::default().with_page(None, 1, movies(1..=2)), provider(1..=2));
        let catalog = fixture.catalog();
        let mut stream = catalog.open_stream(None);
        assert_eq!(next(&mut stream).await, Some(vec![]));

        catalog.advance_page(None).await.unwrap();
        assert_eq!(next(&mut stream).await.map(|cards| ids(&cards)), Some(vec![1, 2]));

        // The remote has nothing more: an empty page 2 is written, nothing emitted.
        catalog.advance_page(None).await.unwrap();
        assert_eq!(next(&mut stream).await, None);
        catalog.advance_page(None).await.unwrap();
        assert_eq!(next(&mut stream).await, None);
        let pages: Vec<u32> = fixture.source.requests().iter().map(|key| key.page).collect();
        assert_eq!(pages, [1, 2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_spans_pages_in_order() {
        let fixture = Fixture::new(MockSource::default(), provider([]));
        fixture.store.write(&PageKey::new(None, 2), &movies([3, 4])).await.unwrap();
        fixture.store.write(&PageKey::new(None, 1), &movies([1, 2, 3])).await.unwrap();
        let mut stream = fixture.catalog().open_stream(None);
        assert_eq!(next(&mut stream).await.map(|cards| ids(&cards)), Some(vec![1, 2, 3, 4]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_filters_do_not_emit() {
        let fixture = Fixture::new(MockSource::default(), provider([]));
        let mut stream = fixture.catalog().open_stream(Some(MovieFilter::Popular));
        assert_eq!(next(&mut stream).await, Some(vec![]));
        // A write to another filter still notifies, but the view is unchanged.
        fixture.store.write(&PageKey::first(Some(MovieFilter::TopRated)), &movies([1])).await.unwrap();
        assert_eq!(next(&mut stream).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrichment_failure_keeps_emitting() {
        let fixture = Fixture::new(MockSource::default(), provider(1..=3).failing(ItemId(2)));
        fixture.store.write(&PageKey::first(None), &movies(1..=3)).await.unwrap();
        let mut stream = fixture.catalog().open_stream(None);
        let cards = next(&mut stream).await.unwrap();
        assert_eq!(ids(&cards), [1, 2, 3]);
        assert!(!cards[1].is_enriched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_failure_is_yielded_once() {
        let fixture = Fixture::new(MockSource::default(), provider([]));
        fixture.store.fail_reads(true);
        let mut stream = fixture.catalog().open_stream(None);
        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(*err, ErrorKind::Unknown);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_failures_are_skipped() {
        let fixture = Fixture::new(MockSource::default(), provider([]));
        let mut stream = fixture.catalog().open_stream(None);
        assert_eq!(next(&mut stream).await, Some(vec![]));

        fixture.configuration.fail(true);
        fixture.store.write(&PageKey::first(None), &movies([1])).await.unwrap();
        assert_eq!(next(&mut stream).await, None);

        fixture.configuration.fail(false);
        fixture.store.touch();
        assert_eq!(next(&mut stream).await.map(|cards| ids(&cards)), Some(vec![1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lagging_view_catches_up_in_one_pass() {
        let fixture = Fixture::new(MockSource::default(), provider([]));
        let mut stream = fixture.catalog().open_stream(None);
        assert_eq!(next(&mut stream).await, Some(vec![]));
        // More writes than the notification buffer holds.
        for page in 1..=40 {
            fixture.store.write(&PageKey::new(None, page), &movies([u64::from(page)])).await.unwrap();
        }
        let cards = next(&mut stream).await.unwrap();
        assert_eq!(cards.len(), 40);
        assert_eq!(next(&mut stream).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_stream_releases_the_store() {
        let fixture = Fixture::new(MockSource::default(), provider([]));
        let catalog = fixture.catalog();
        let before = Arc::strong_count(&fixture.store);
        let mut stream = catalog.open_stream(None);
        assert_eq!(next(&mut stream).await, Some(vec![]));
        assert_eq!(Arc::strong_count(&fixture.store), before + 1);
        drop(stream);
        assert_eq!(Arc::strong_count(&fixture.store), before);
        // Writes after the drop go nowhere and don't fail.
        fixture.store.write(&PageKey::first(None), &movies([1])).await.unwrap();
    }
}
