//! Remote collaborators of the catalog pipeline.
//!
//! Three traits describe everything the pipeline needs from outside the
//! process:
//!
//! - [`RemoteSource`] fetches one page of primary items for a filter.
//! - [`SecondaryProvider`] fetches one unit of enrichment data for one item.
//! - [`ConfigurationProvider`] yields the current image [`Configuration`](reel_catalog::models::Configuration).
//!
//! Implementations for a concrete remote API live with the application. This
//! crate only carries decorators ([`Memoized`]), a fixed configuration
//! ([`StaticConfiguration`]) and, behind the `mock` feature, in-memory test
//! doubles with call counting and failure injection.

mod configuration;
pub mod error;
mod memo;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod provider;
mod remote;

pub use crate::configuration::{ConfigurationProvider, StaticConfiguration};
pub use crate::memo::Memoized;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{MockConfiguration, MockProvider, MockSource};
pub use crate::provider::SecondaryProvider;
pub use crate::remote::RemoteSource;
use std::sync::Arc;

pub type SourceHandle<F, I> = Arc<dyn RemoteSource<Filter = F, Item = I>>;
pub type ProviderHandle<D> = Arc<dyn SecondaryProvider<Data = D>>;
pub type ConfigHandle = Arc<dyn ConfigurationProvider>;
