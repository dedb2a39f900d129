use crate::error::Result;
use async_trait::async_trait;
use reel_catalog::ItemId;
use std::fmt::Debug;

/// Per-item enrichment data (image sets, credits, ...).
///
/// Enrichment is never persisted by the local store and a failure to fetch it
/// is never fatal to the caller, so implementations need not retry.
#[async_trait]
pub trait SecondaryProvider: Send + Sync {
    type Data: Clone + Debug + Send + Sync + 'static;

    /// Fetch the enrichment data of one item.
    async fn fetch(&self, id: ItemId) -> Result<Self::Data>;
}
