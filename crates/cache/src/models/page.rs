use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reel_catalog::{Filter, Item, PageKey};
use serde_json::{from_str as from_json, to_string as to_json};
use time::UtcDateTime;

/// Encode a filter into its partition column value (`null` when absent).
pub(crate) fn filter_column<F: Filter>(filter: Option<&F>) -> Result<String> {
    to_json(&filter).or_raise(|| ErrorKind::InvalidData("filter"))
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PageRow {
    pub(crate) namespace: String,
    pub(crate) filter: String,
    pub(crate) page: i64,
    pub(crate) items: String,
    pub(crate) item_count: i64,
    pub(crate) written_at: i64,
}
impl PageRow {
    pub(crate) fn new<F: Filter, I: Item>(namespace: &str, key: &PageKey<F>, items: &[I]) -> Result<Self> {
        Ok(Self {
            namespace: namespace.to_string(),
            filter: filter_column(key.filter())?,
            page: i64::from(key.page),
            items: to_json(items).or_raise(|| ErrorKind::InvalidData("items"))?,
            item_count: i64::try_from(items.len()).or_raise(|| ErrorKind::InvalidData("item count"))?,
            written_at: UtcDateTime::now().unix_timestamp(),
        })
    }

    pub(crate) fn items<I: Item>(&self) -> Result<Vec<I>> {
        let items: Vec<I> = from_json(&self.items).or_raise(|| ErrorKind::InvalidData("items"))?;
        if i64::try_from(items.len()).ok() != Some(self.item_count) {
            exn::bail!(ErrorKind::InvalidData("item count"));
        }
        Ok(items)
    }

    pub(crate) fn written_at(&self) -> Result<UtcDateTime> {
        UtcDateTime::from_unix_timestamp(self.written_at).or_raise(|| ErrorKind::InvalidData("write date"))
    }
}
