//! Content contexts.
//!
//! A context ties the pipeline's type parameters together: which filter
//! selects its lists, which items it caches, which enrichment it attaches and
//! what it presents. Mapping to the presentation model is pure and total.

use reel_catalog::models::{Configuration, ImageSet, Movie, MovieCard, MovieFilter, TvCard, TvFilter, TvSeries};
use reel_catalog::{Filter, Item};
use std::fmt::Debug;

pub trait Context: Send + Sync + 'static {
    type Filter: Filter;
    type Item: Item;
    type Data: Clone + Debug + Send + Sync + 'static;
    type Model: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Local store namespace. Must be unique per context sharing a database.
    const NAME: &'static str;

    fn map(item: &Self::Item, data: Option<&Self::Data>, configuration: &Configuration) -> Self::Model;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MovieContext;
impl Context for MovieContext {
    type Filter = MovieFilter;
    type Item = Movie;
    type Data = ImageSet;
    type Model = MovieCard;

    const NAME: &'static str = "movies";

    fn map(item: &Movie, data: Option<&ImageSet>, configuration: &Configuration) -> MovieCard {
        MovieCard::new(item, data, configuration)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TvContext;
impl Context for TvContext {
    type Filter = TvFilter;
    type Item = TvSeries;
    type Data = ImageSet;
    type Model = TvCard;

    const NAME: &'static str = "tv";

    fn map(item: &TvSeries, data: Option<&ImageSet>, configuration: &Configuration) -> TvCard {
        TvCard::new(item, data, configuration)
    }
}
