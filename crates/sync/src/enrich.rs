//! Per-item enrichment fan-out.
//!
//! Every distinct item of a batch gets one concurrent fetch from the
//! secondary provider. The batch never fails: an item whose fetch fails,
//! panics or is cancelled is simply left out of the result, and the caller
//! presents it without enrichment.

use reel_catalog::{Item, ItemId};
use reel_source::ProviderHandle;
use reel_source::error::Result as SourceResult;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::instrument;

pub struct Enricher<D> {
    provider: ProviderHandle<D>,
    max_concurrency: Option<usize>,
}
impl<D> Clone for Enricher<D> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            max_concurrency: self.max_concurrency,
        }
    }
}

impl<D: Clone + Debug + Send + Sync + 'static> Enricher<D> {
    /// Unbounded enricher: every unit of work starts at once.
    pub fn new(provider: ProviderHandle<D>) -> Self {
        Self {
            provider,
            max_concurrency: None,
        }
    }

    /// Cap the number of fetches in flight at once (`None` is unbounded).
    pub fn with_max_concurrency(mut self, max: Option<usize>) -> Self {
        self.max_concurrency = max.map(|max| max.max(1));
        self
    }

    /// Fetch enrichment for every distinct id in `items`.
    ///
    /// The fetches run as tasks on the runtime. Dropping the returned future
    /// aborts the ones still running.
    #[instrument(level = "debug", skip_all, fields(items = items.len()))]
    pub async fn enrich<I: Item>(&self, items: &[I]) -> HashMap<ItemId, D> {
        let mut seen = HashSet::with_capacity(items.len());
        let mut pending: VecDeque<ItemId> = items.iter().map(Item::id).filter(|id| seen.insert(*id)).collect();
        let limit = self.max_concurrency.unwrap_or(pending.len());
        tracing::debug!(units = pending.len(), limit, "enriching");

        let mut results = HashMap::with_capacity(pending.len());
        let mut tasks = JoinSet::new();
        for id in pending.drain(..limit.min(pending.len())) {
            self.spawn(&mut tasks, id);
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(data))) => {
                    results.insert(id, data);
                },
                Ok((id, Err(err))) => tracing::warn!(%id, error = ?err, "enrichment failed, continuing without it"),
                Err(err) => tracing::warn!(error = %err, "enrichment task did not complete"),
            }
            // Pop-n-push, FIFO.
            if let Some(id) = pending.pop_front() {
                self.spawn(&mut tasks, id);
            }
        }
        results
    }

    fn spawn(&self, tasks: &mut JoinSet<(ItemId, SourceResult<D>)>, id: ItemId) {
        let provider = Arc::clone(&self.provider);
        tasks.spawn(async move { (id, provider.fetch(id).await) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_catalog::models::Movie;
    use reel_source::MockProvider;
    use rstest::rstest;
    use std::time::Duration;

    fn movies(ids: impl IntoIterator<Item = u64>) -> Vec<Movie> {
        ids.into_iter().map(|id| Movie::new(id, format!("Movie {id}"))).collect()
    }

    fn provider(ids: impl IntoIterator<Item = u64>) -> MockProvider<u64> {
        ids.into_iter().fold(MockProvider::new(), |provider, id| provider.with(ItemId(id), id * 10))
    }

    #[tokio::test]
    async fn test_every_item_enriched() {
        let provider = Arc::new(provider(1..=3));
        let data = Enricher::<u64>::new(provider.clone()).enrich(&movies(1..=3)).await;
        assert_eq!(data, HashMap::from([(ItemId(1), 10), (ItemId(2), 20), (ItemId(3), 30)]));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_partial_failure_is_absorbed() {
        let provider = Arc::new(provider(1..=5).failing(ItemId(2)));
        let data = Enricher::<u64>::new(provider.clone()).enrich(&movies(1..=5)).await;
        assert_eq!(data.len(), 4);
        assert!(!data.contains_key(&ItemId(2)));
    }

    #[tokio::test]
    async fn test_panicking_unit_is_absorbed() {
        let provider = Arc::new(provider(1..=3).panicking(ItemId(3)));
        let data = Enricher::<u64>::new(provider).enrich(&movies(1..=3)).await;
        assert_eq!(data.len(), 2);
        assert!(!data.contains_key(&ItemId(3)));
    }

    #[tokio::test]
    async fn test_missing_data_is_absorbed() {
        let provider = Arc::new(provider([1]));
        let data = Enricher::<u64>::new(provider).enrich(&movies([1, 2])).await;
        assert_eq!(data, HashMap::from([(ItemId(1), 10)]));
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_coalesced() {
        let provider = Arc::new(provider([1, 2]));
        let data = Enricher::<u64>::new(provider.clone()).enrich(&movies([1, 2, 1, 1, 2])).await;
        assert_eq!(data.len(), 2);
        assert_eq!(provider.calls_for(ItemId(1)), 1);
        assert_eq!(provider.calls_for(ItemId(2)), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let provider = Arc::new(provider([]));
        assert!(Enricher::<u64>::new(provider.clone()).enrich::<Movie>(&[]).await.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(8)]
    async fn test_bounded_fan_out_respects_cap(#[case] cap: usize) {
        let provider = Arc::new(provider(1..=12).with_delay(Duration::from_millis(10)));
        let enricher = Enricher::<u64>::new(provider.clone()).with_max_concurrency(Some(cap));
        let data = enricher.enrich(&movies(1..=12)).await;
        assert_eq!(data.len(), 12);
        assert!(provider.max_in_flight() <= cap);
        assert_eq!(provider.calls(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_fan_out_runs_concurrently() {
        let provider = Arc::new(provider(1..=6).with_delay(Duration::from_secs(1)));
        let data = Enricher::<u64>::new(provider.clone()).enrich(&movies(1..=6)).await;
        assert_eq!(data.len(), 6);
        assert_eq!(provider.max_in_flight(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_batch_aborts_units() {
        let provider = Arc::new(provider(1..=3).with_delay(Duration::from_secs(60)));
        let enricher = Enricher::<u64>::new(provider.clone());
        let items = movies(1..=3);
        let batch = enricher.enrich(&items);
        assert!(tokio::time::timeout(Duration::from_secs(1), batch).await.is_err());
        // Aborted tasks release their handle once the runtime reaps them.
        for _ in 0..100 {
            if Arc::strong_count(&provider) == 2 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(Arc::strong_count(&provider), 2);
    }
}
