//! The pipeline as seen by its callers.
//!
//! A [`Catalog`] serves presentation models for one [`Context`]: it reads
//! pages through the cache-aside [`Repository`], enriches them through the
//! [`Enricher`] and maps them with the context. Raw items never leave it.

use exn::ResultExt;
use reel_cache::{Database, StoreHandle};
use reel_catalog::Item;
use reel_config::{Config, EnrichmentConfig};
use reel_source::{ConfigHandle, Memoized, ProviderHandle, SourceHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::context::Context;
use crate::enrich::Enricher;
use crate::error::{ErrorKind, Result};
use crate::repository::Repository;

pub struct Catalog<C: Context> {
    pub(crate) repository: Repository<C::Filter, C::Item>,
    pub(crate) enricher: Enricher<C::Data>,
    pub(crate) configuration: ConfigHandle,
}
impl<C: Context> Clone for Catalog<C> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            enricher: self.enricher.clone(),
            configuration: Arc::clone(&self.configuration),
        }
    }
}

impl<C: Context> Catalog<C> {
    pub fn builder(
        store: StoreHandle<C::Filter, C::Item>,
        source: SourceHandle<C::Filter, C::Item>,
        provider: ProviderHandle<C::Data>,
        configuration: ConfigHandle,
    ) -> CatalogBuilder<C> {
        CatalogBuilder {
            store,
            source,
            provider,
            configuration,
            max_concurrency: None,
            memo_ttl: None,
        }
    }

    /// One page of presentation models.
    ///
    /// Served from the local store when cached, otherwise fetched, persisted
    /// and then presented. Enrichment failures only leave the affected items
    /// unenriched.
    #[instrument(skip(self), fields(context = C::NAME))]
    pub async fn fetch_page(&self, filter: Option<&C::Filter>, page: u32) -> Result<Vec<C::Model>> {
        let items = self.repository.fetch_page(filter, page).await?;
        self.project(&items).await
    }

    /// Load the page after the last cached one into the local store.
    ///
    /// Nothing is returned: open streams for `filter` pick the page up from
    /// the store's change notification. Once the remote list is exhausted
    /// every call re-fetches the same (empty) page.
    #[instrument(skip(self), fields(context = C::NAME))]
    pub async fn advance_page(&self, filter: Option<&C::Filter>) -> Result<()> {
        let page = self.repository.next_page(filter).await?;
        let items = self.repository.refresh_page(filter, page).await?;
        tracing::debug!(page, items = items.len(), "advanced page");
        Ok(())
    }

    /// Enrich and map `items`, reading the configuration once for the pass.
    pub(crate) async fn project(&self, items: &[C::Item]) -> Result<Vec<C::Model>> {
        let (configuration, data) = futures::join!(self.configuration.current(), self.enricher.enrich(items));
        let configuration = configuration.map_err(ErrorKind::source)?;
        Ok(items.iter().map(|item| C::map(item, data.get(&item.id()), &configuration)).collect())
    }
}

pub struct CatalogBuilder<C: Context> {
    store: StoreHandle<C::Filter, C::Item>,
    source: SourceHandle<C::Filter, C::Item>,
    provider: ProviderHandle<C::Data>,
    configuration: ConfigHandle,
    max_concurrency: Option<usize>,
    memo_ttl: Option<Duration>,
}

impl<C: Context> CatalogBuilder<C> {
    /// Apply the enrichment section of a loaded [`Config`].
    pub fn enrichment(self, config: &EnrichmentConfig) -> Self {
        self.max_concurrency(config.max_concurrency).memo_ttl(config.memo_ttl())
    }

    pub fn max_concurrency(mut self, max: Option<usize>) -> Self {
        self.max_concurrency = max;
        self
    }

    /// Remember enrichment results for `ttl`. `None` fetches every time.
    pub fn memo_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.memo_ttl = ttl;
        self
    }

    pub fn build(self) -> Catalog<C> {
        let provider: ProviderHandle<C::Data> = match self.memo_ttl {
            Some(ttl) => Arc::new(Memoized::new(self.provider, ttl)),
            None => self.provider,
        };
        Catalog {
            repository: Repository::new(self.store, self.source),
            enricher: Enricher::new(provider).with_max_concurrency(self.max_concurrency),
            configuration: self.configuration,
        }
    }
}

/// Open the cache database described by `config`.
///
/// The parent directory of an on-disk database is created when missing.
pub async fn open_database(config: &Config) -> Result<Database> {
    let database = match config.cache.location() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Unknown)?;
            }
            tracing::info!(path = %path.display(), "opening cache database");
            Database::connect(path).await
        },
        None => Database::connect_in_memory().await,
    }
    .map_err(ErrorKind::cache)?;
    Ok(database.with_notification_capacity(config.stream.notification_capacity))
}

/// The page store of context `C` inside `database`.
pub fn store_for<C: Context>(database: &Database) -> StoreHandle<C::Filter, C::Item> {
    Arc::new(database.store::<C::Filter, C::Item>(C::NAME))
}
