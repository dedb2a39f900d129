//! The pipeline end to end on a real SQLite cache.

use futures::StreamExt;
use reel_cache::{Database, LocalStore};
use reel_catalog::models::{Configuration, Image, ImageSet, TvFilter, TvSeries};
use reel_catalog::{ItemId, PageKey};
use reel_config::{CacheConfig, Config};
use reel_source::{MockProvider, MockSource, StaticConfiguration};
use reel_sync::{Catalog, TvContext, open_database, store_for};
use std::sync::Arc;
use std::time::Duration;

fn configuration() -> Configuration {
    Configuration {
        base_url: "https://img.example.org/t/p".to_string(),
        poster_sizes: ["w92", "w500", "original"].map(String::from).to_vec(),
        backdrop_sizes: ["w300", "original"].map(String::from).to_vec(),
        logo_sizes: ["w92", "original"].map(String::from).to_vec(),
    }
}

fn shows(ids: impl IntoIterator<Item = u64>) -> Vec<TvSeries> {
    ids.into_iter().map(|id| TvSeries::new(id, format!("Show {id}")).with_poster(format!("/show-{id}.jpg"))).collect()
}

fn provider(ids: impl IntoIterator<Item = u64>) -> MockProvider<ImageSet> {
    ids.into_iter().fold(MockProvider::new(), |provider, id| {
        let images = ImageSet {
            logos: vec![Image::new(format!("/logo-{id}.png"))],
            ..ImageSet::empty(ItemId(id))
        };
        provider.with(ItemId(id), images)
    })
}

fn catalog(
    database: &Database,
    source: &Arc<MockSource<TvFilter, TvSeries>>,
    provider: &Arc<MockProvider<ImageSet>>,
) -> Catalog<TvContext> {
    Catalog::<TvContext>::builder(
        store_for::<TvContext>(database),
        source.clone(),
        provider.clone(),
        Arc::new(StaticConfiguration::new(configuration())),
    )
    .build()
}

#[tokio::test]
async fn cold_page_is_fetched_enriched_and_persisted() {
    let database = Database::connect_in_memory().await.unwrap();
    let source = Arc::new(MockSource::default().with_page(Some(TvFilter::Popular), 1, shows(1..=3)));
    let provider = Arc::new(provider(1..=3).failing(ItemId(2)));
    let catalog = catalog(&database, &source, &provider);

    let cards = catalog.fetch_page(Some(&TvFilter::Popular), 1).await.unwrap();
    assert_eq!(cards.len(), 3);
    assert!(cards[0].logo.is_some());
    assert!(cards[1].logo.is_none());
    assert!(cards[2].logo.is_some());

    let stored = store_for::<TvContext>(&database).read(&PageKey::first(Some(TvFilter::Popular))).await.unwrap();
    assert_eq!(stored, Some(shows(1..=3)));
    database.close().await;
}

#[tokio::test]
async fn cache_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        cache: CacheConfig {
            path: Some(dir.path().join("reel").join("cache.sqlite")),
            in_memory: false,
        },
        ..Config::default()
    };
    let source = Arc::new(MockSource::default().with_page(None, 1, shows([1, 2])));
    let provider = Arc::new(provider([1, 2]));
    {
        let database = open_database(&config).await.unwrap();
        catalog(&database, &source, &provider).fetch_page(None, 1).await.unwrap();
        database.close().await;
    }
    let database = open_database(&config).await.unwrap();
    let cards = catalog(&database, &source, &provider).fetch_page(None, 1).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(source.calls(), 1);
    database.close().await;
}

#[tokio::test]
async fn live_view_follows_store_writes() {
    let database = Database::connect_in_memory().await.unwrap();
    let source = Arc::new(MockSource::default().with_page(None, 1, shows(1..=3)));
    let provider = Arc::new(provider(1..=3));
    let catalog = catalog(&database, &source, &provider);

    let mut stream = catalog.open_stream(None);
    assert!(stream.next().await.unwrap().unwrap().is_empty());

    catalog.advance_page(None).await.unwrap();
    let cards = stream.next().await.unwrap().unwrap();
    assert_eq!(cards.iter().map(|card| card.id.0).collect::<Vec<_>>(), [1, 2, 3]);

    // Past the end of the remote list: an empty page is written, no emission.
    catalog.advance_page(None).await.unwrap();
    let quiet = tokio::time::timeout(Duration::from_millis(200), stream.next()).await;
    assert!(quiet.is_err());
    drop(stream);
    database.close().await;
}
