use std::fmt::{Display, Formatter, Result as FmtResult};

/// Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// Composite cache key: an optional filter plus a page number.
///
/// `filter: None` means "no filter" and is a partition of its own; it never
/// shares cached pages with any `Some` filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey<F> {
    pub filter: Option<F>,
    pub page: u32,
}
impl<F> PageKey<F> {
    pub fn new(filter: Option<F>, page: u32) -> Self {
        Self { filter, page }
    }

    /// Key for the first page of `filter`.
    pub fn first(filter: Option<F>) -> Self {
        Self::new(filter, FIRST_PAGE)
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }
}
impl<F: Clone> PageKey<F> {
    /// Key for the page after this one, under the same filter.
    pub fn next(&self) -> Self {
        Self::new(self.filter.clone(), self.page.saturating_add(1))
    }
}
impl<F: Display> Display for PageKey<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.filter {
            Some(filter) => write!(f, "{filter} (page {})", self.page),
            None => write!(f, "unfiltered (page {})", self.page),
        }
    }
}
