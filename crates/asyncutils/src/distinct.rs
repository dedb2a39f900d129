use futures::Stream;
use futures::task::{Context, Poll};
use pin_project_lite::pin_project;
use std::pin::Pin;

pin_project! {
    /// Stream for [`distinct_until_changed`](crate::DistinctStreamExt::distinct_until_changed).
    #[must_use = "streams do nothing unless polled"]
    pub struct DistinctUntilChanged<St, T> {
        #[pin]
        stream: St,
        last: Option<T>,
    }
}
impl<St, T> DistinctUntilChanged<St, T> {
    pub(crate) fn new(stream: St) -> Self {
        Self { stream, last: None }
    }

    /// The most recently emitted item, if anything has been emitted yet.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl<St, T> Stream for DistinctUntilChanged<St, T>
where
    St: Stream<Item = T>,
    T: PartialEq + Clone,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut this = self.project();
        loop {
            let Some(item) = futures::ready!(this.stream.as_mut().poll_next(cx)) else {
                return Poll::Ready(None);
            };
            if this.last.as_ref() == Some(&item) {
                continue;
            }
            *this.last = Some(item.clone());
            return Poll::Ready(Some(item));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Every item might be a duplicate.
        (0, self.stream.size_hint().1)
    }
}

pin_project! {
    /// Stream for [`try_distinct_until_changed`](crate::TryDistinctStreamExt::try_distinct_until_changed).
    #[must_use = "streams do nothing unless polled"]
    pub struct TryDistinctUntilChanged<St, T> {
        #[pin]
        stream: St,
        last: Option<T>,
    }
}
impl<St, T> TryDistinctUntilChanged<St, T> {
    pub(crate) fn new(stream: St) -> Self {
        Self { stream, last: None }
    }
}

impl<St, T, E> Stream for TryDistinctUntilChanged<St, T>
where
    St: Stream<Item = Result<T, E>>,
    T: PartialEq + Clone,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            match futures::ready!(this.stream.as_mut().poll_next(cx)) {
                None => return Poll::Ready(None),
                Some(Err(e)) => return Poll::Ready(Some(Err(e))),
                Some(Ok(value)) => {
                    if this.last.as_ref() == Some(&value) {
                        continue;
                    }
                    *this.last = Some(value.clone());
                    return Poll::Ready(Some(Ok(value)));
                },
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.stream.size_hint().1)
    }
}
