//! Fixtures shared by the pipeline's unit tests.

use reel_cache::MemoryStore;
use reel_catalog::ItemId;
use reel_catalog::models::{Configuration, Image, ImageSet, Movie, MovieCard, MovieFilter};
use reel_source::{MockConfiguration, MockProvider, MockSource};
use std::sync::Arc;

use crate::{Catalog, CatalogBuilder, MovieContext};

pub(crate) struct Fixture {
    pub(crate) store: Arc<MemoryStore<MovieFilter, Movie>>,
    pub(crate) source: Arc<MockSource<MovieFilter, Movie>>,
    pub(crate) provider: Arc<MockProvider<ImageSet>>,
    pub(crate) configuration: Arc<MockConfiguration>,
}

impl Fixture {
    pub(crate) fn new(source: MockSource<MovieFilter, Movie>, provider: MockProvider<ImageSet>) -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            source: Arc::new(source),
            provider: Arc::new(provider),
            configuration: Arc::new(MockConfiguration::new(configuration())),
        }
    }

    pub(crate) fn builder(&self) -> CatalogBuilder<MovieContext> {
        Catalog::<MovieContext>::builder(
            self.store.clone(),
            self.source.clone(),
            self.provider.clone(),
            self.configuration.clone(),
        )
    }

    pub(crate) fn catalog(&self) -> Catalog<MovieContext> {
        self.builder().build()
    }
}

pub(crate) fn configuration() -> Configuration {
    Configuration {
        base_url: "https://img.example.org/t/p/".to_string(),
        poster_sizes: ["w92", "w342", "original"].map(String::from).to_vec(),
        backdrop_sizes: ["w300", "w1280", "original"].map(String::from).to_vec(),
        logo_sizes: ["w45", "w300", "original"].map(String::from).to_vec(),
    }
}

pub(crate) fn movies(ids: impl IntoIterator<Item = u64>) -> Vec<Movie> {
    ids.into_iter()
        .map(|id| Movie::new(id, format!("Movie {id}")).with_poster(format!("/poster-{id}.jpg")))
        .collect()
}

pub(crate) fn images(id: u64) -> ImageSet {
    ImageSet {
        backdrops: vec![Image::new(format!("/backdrop-{id}.jpg"))],
        logos: vec![Image::new(format!("/logo-{id}.png")).with_language("en")],
        ..ImageSet::empty(ItemId(id))
    }
}

/// A provider with an image set for every id in `ids`.
pub(crate) fn provider(ids: impl IntoIterator<Item = u64>) -> MockProvider<ImageSet> {
    ids.into_iter().fold(MockProvider::new(), |provider, id| provider.with(ItemId(id), images(id)))
}

pub(crate) fn ids(cards: &[MovieCard]) -> Vec<u64> {
    cards.iter().map(|card| card.id.0).collect()
}
