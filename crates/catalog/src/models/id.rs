use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Identifier of a primary item, as assigned by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// An identity-bearing primary item (a movie, a show, ...).
///
/// Items are immutable values. A later fetch of the same page replaces the
/// stored items wholesale, it never patches them.
pub trait Item: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> ItemId;
}
