//! Cache-aside catalog pipeline.
//!
//! Callers ask a [`Catalog`] for pages of presentation models, or open a
//! live view that re-emits whenever the local store changes. Underneath:
//!
//! - [`Repository`] serves pages from the local store, falls back to the
//!   remote source on a miss and writes the result back.
//! - [`Enricher`] fetches per-item secondary data concurrently, absorbing
//!   failures.
//! - A [`Context`] maps each item and its enrichment to a presentation model.
//!
//! ```no_run
//! use reel_catalog::models::{ImageSet, Movie, MovieCard, MovieFilter};
//! use reel_config::Config;
//! use reel_source::{ConfigHandle, ProviderHandle, SourceHandle};
//! use reel_sync::{Catalog, MovieContext, error::Result, open_database, store_for};
//!
//! async fn popular(
//!     config: &Config,
//!     source: SourceHandle<MovieFilter, Movie>,
//!     provider: ProviderHandle<ImageSet>,
//!     configuration: ConfigHandle,
//! ) -> Result<Vec<MovieCard>> {
//!     let database = open_database(config).await?;
//!     let store = store_for::<MovieContext>(&database);
//!     let movies = Catalog::<MovieContext>::builder(store, source, provider, configuration)
//!         .enrichment(&config.enrichment)
//!         .build();
//!     movies.fetch_page(Some(&MovieFilter::Popular), 1).await
//! }
//! ```

mod catalog;
mod context;
mod enrich;
pub mod error;
mod repository;
mod stream;
#[cfg(test)]
mod testing;

pub use crate::catalog::{Catalog, CatalogBuilder, open_database, store_for};
pub use crate::context::{Context, MovieContext, TvContext};
pub use crate::enrich::Enricher;
pub use crate::repository::Repository;
pub use crate::stream::CatalogStream;
