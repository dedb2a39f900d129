//! SQLite-backed page store.

use crate::error::{ErrorKind, Result};
use crate::models::{PageRow, filter_column};
use crate::store::{LocalStore, Notifications};
use async_trait::async_trait;
use exn::ResultExt;
use reel_catalog::{Filter, Item, PageKey};
use sqlx::SqlitePool;
use std::marker::PhantomData;
use time::UtcDateTime;
use tokio::sync::broadcast;
use tracing::instrument;

/// Page store for one namespace of the cache database.
///
/// Items are stored as a JSON array per page, so any [`Item`] works without
/// a dedicated table. Obtain one through [`Database::store`](crate::Database::store).
///
/// # Atomicity
///
/// A write is a single upsert statement: SQLite guarantees readers see
/// either the previous page or the new one, never a mix.
#[derive(Debug)]
pub struct SqliteStore<F, I> {
    pool: SqlitePool,
    namespace: String,
    changes: broadcast::Sender<()>,
    _types: PhantomData<fn() -> (F, I)>,
}
impl<F, I> Clone for SqliteStore<F, I> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            namespace: self.namespace.clone(),
            changes: self.changes.clone(),
            _types: PhantomData,
        }
    }
}

impl<F: Filter, I: Item> SqliteStore<F, I> {
    pub(crate) fn new(pool: SqlitePool, namespace: String, changes: broadcast::Sender<()>) -> Self {
        Self {
            pool,
            namespace,
            changes,
            _types: PhantomData,
        }
    }

    fn page_number(key: &PageKey<F>) -> i64 {
        i64::from(key.page)
    }

    async fn fetch_row(&self, key: &PageKey<F>) -> Result<Option<PageRow>> {
        sqlx::query_as::<_, PageRow>(include_str!("../queries/read_page.sql"))
            .bind(&self.namespace)
            .bind(filter_column(key.filter())?)
            .bind(Self::page_number(key))
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// When the page under `key` was last written, if it ever was.
    pub async fn written_at(&self, key: &PageKey<F>) -> Result<Option<UtcDateTime>> {
        self.fetch_row(key).await?.map(|row| row.written_at()).transpose()
    }

    /// Number of pages (empty ones included) stored in this namespace.
    pub async fn page_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_pages.sql"))
            .bind(&self.namespace)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("page count"))
    }
}

#[async_trait]
impl<F: Filter, I: Item> LocalStore for SqliteStore<F, I> {
    type Filter = F;
    type Item = I;

    fn name(&self) -> &str {
        &self.namespace
    }

    #[instrument(level = "trace", skip(self), fields(namespace = %self.namespace))]
    async fn read(&self, key: &PageKey<F>) -> Result<Option<Vec<I>>> {
        self.fetch_row(key).await?.map(|row| row.items()).transpose()
    }

    #[instrument(skip(self, items), fields(namespace = %self.namespace, items = items.len()))]
    async fn write(&self, key: &PageKey<F>, items: &[I]) -> Result<()> {
        let row = PageRow::new(&self.namespace, key, items)?;
        sqlx::query(include_str!("../queries/upsert_page.sql"))
            .bind(row.namespace)
            .bind(row.filter)
            .bind(row.page)
            .bind(row.items)
            .bind(row.item_count)
            .bind(row.written_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        // No subscribers is fine, nobody is watching.
        _ = self.changes.send(());
        Ok(())
    }

    fn subscribe(&self) -> Notifications {
        self.changes.subscribe()
    }

    async fn max_cached_page(&self, filter: Option<&F>) -> Result<Option<u32>> {
        let max: Option<i64> = sqlx::query_scalar(include_str!("../queries/max_cached_page.sql"))
            .bind(&self.namespace)
            .bind(filter_column(filter)?)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        max.map(|page| u32::try_from(page).or_raise(|| ErrorKind::InvalidData("page"))).transpose()
    }

    #[instrument(level = "trace", skip(self), fields(namespace = %self.namespace))]
    async fn read_all(&self, filter: Option<&F>) -> Result<Vec<I>> {
        let rows: Vec<PageRow> = sqlx::query_as(include_str!("../queries/read_all_pages.sql"))
            .bind(&self.namespace)
            .bind(filter_column(filter)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let mut items = Vec::new();
        for row in rows {
            items.extend(row.items::<I>()?);
        }
        Ok(items)
    }
}
