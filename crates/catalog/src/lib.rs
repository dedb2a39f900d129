//! Domain model for the media catalog.
//!
//! Everything in here is a plain value: no I/O, no async. The types fall into
//! three groups:
//!
//! - **Primary items** ([`Movie`](models::Movie), [`TvSeries`](models::TvSeries))
//!   as delivered by a remote source and persisted by the local cache. Asset
//!   references are raw paths, not URLs.
//! - **Enrichment** ([`ImageSet`](models::ImageSet)) fetched per item, and the
//!   [`Configuration`](models::Configuration) needed to turn raw asset paths
//!   into absolute URLs.
//! - **Presentation** ([`MovieCard`](models::MovieCard),
//!   [`TvCard`](models::TvCard)): display-ready values combining the two.
//!
//! Caching is partitioned by [`PageKey`](models::PageKey), a filter plus a
//! 1-based page number.

pub mod models;

pub use crate::models::{FIRST_PAGE, Filter, Item, ItemId, PageKey};
