//! Small stream adapters that `futures` doesn't ship.
//!
//! The only thing in here right now is last-value deduplication: suppress an
//! item when it's equal to the item emitted immediately before it. Only the
//! single most recent emission is remembered, not the whole history.

mod distinct;

pub use crate::distinct::{DistinctUntilChanged, TryDistinctUntilChanged};
use futures::Stream;

/// Extension methods for any [`Stream`].
pub trait DistinctStreamExt: Stream + Sized {
    /// Skip items that are equal to the previously emitted item.
    ///
    /// ```
    /// use futures::{StreamExt, stream};
    /// use reel_asyncutils::DistinctStreamExt;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let items: Vec<u8> = stream::iter([1, 1, 2, 2, 1]).distinct_until_changed().collect().await;
    /// assert_eq!(items, [1, 2, 1]);
    /// # }
    /// ```
    fn distinct_until_changed(self) -> DistinctUntilChanged<Self, Self::Item>
    where
        Self::Item: PartialEq + Clone,
    {
        DistinctUntilChanged::new(self)
    }
}
impl<St: Stream> DistinctStreamExt for St {}

/// Extension methods for streams of [`Result`]s.
pub trait TryDistinctStreamExt<T, E>: Stream<Item = Result<T, E>> + Sized {
    /// Skip `Ok` values equal to the previously emitted `Ok` value.
    ///
    /// Errors always pass through and never reset the remembered value, so
    /// `Ok(a), Err(_), Ok(a)` yields the error but only one `Ok(a)`.
    fn try_distinct_until_changed(self) -> TryDistinctUntilChanged<Self, T>
    where
        T: PartialEq + Clone,
    {
        TryDistinctUntilChanged::new(self)
    }
}
impl<St, T, E> TryDistinctStreamExt<T, E> for St where St: Stream<Item = Result<T, E>> {}
