mod card;
mod configuration;
mod filter;
mod id;
mod image;
mod movie;
mod page;
mod tv;

pub use self::card::{MovieCard, TvCard};
pub use self::configuration::{Configuration, ImageKind, ImageUrls};
pub use self::filter::{Filter, MovieFilter, TvFilter};
pub use self::id::{Item, ItemId};
pub use self::image::{Image, ImageSet};
pub use self::movie::Movie;
pub use self::page::{FIRST_PAGE, PageKey};
pub use self::tv::TvSeries;

/// Trim surrounding whitespace and collapse internal runs of whitespace.
fn normalize(s: impl AsRef<str>) -> String {
    s.as_ref().split_whitespace().collect::<Vec<_>>().join(" ")
}
