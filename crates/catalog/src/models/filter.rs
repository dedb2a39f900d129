use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::Hash;

use super::normalize;

/// An opaque, comparable value selecting one list out of a catalog.
///
/// The serialized form is used as the cache partition, so two filters must
/// serialize identically if and only if they're equal. Both of the filters in
/// this crate are plain enums, which guarantees that.
pub trait Filter: Clone + Debug + Eq + Hash + Serialize + DeserializeOwned + Send + Sync + 'static {}
impl<T> Filter for T where T: Clone + Debug + Eq + Hash + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Movie lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovieFilter {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
    /// Free-text search; see [`MovieFilter::search`].
    Search { query: String },
    Discover {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        genre: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
    },
}
impl MovieFilter {
    /// Search filter with normalized whitespace, so `" dune  part two"` and
    /// `"dune part two"` share a cache partition.
    pub fn search(query: impl AsRef<str>) -> Self {
        Self::Search { query: normalize(query) }
    }
}
impl Display for MovieFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Popular => write!(f, "popular"),
            Self::TopRated => write!(f, "top rated"),
            Self::Upcoming => write!(f, "upcoming"),
            Self::NowPlaying => write!(f, "now playing"),
            Self::Search { query } => write!(f, "search \"{query}\""),
            Self::Discover { genre, year } => {
                write!(f, "discover")?;
                if let Some(genre) = genre {
                    write!(f, " genre={genre}")?;
                }
                if let Some(year) = year {
                    write!(f, " year={year}")?;
                }
                Ok(())
            },
        }
    }
}

/// TV series lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TvFilter {
    Popular,
    TopRated,
    OnTheAir,
    AiringToday,
    Search { query: String },
}
impl TvFilter {
    pub fn search(query: impl AsRef<str>) -> Self {
        Self::Search { query: normalize(query) }
    }
}
impl Display for TvFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Popular => write!(f, "popular"),
            Self::TopRated => write!(f, "top rated"),
            Self::OnTheAir => write!(f, "on the air"),
            Self::AiringToday => write!(f, "airing today"),
            Self::Search { query } => write!(f, "search \"{query}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MovieFilter::Popular, r#"{"kind":"popular"}"#)]
    #[case(MovieFilter::search("  dune   part two "), r#"{"kind":"search","query":"dune part two"}"#)]
    #[case(MovieFilter::Discover{genre: Some(878), year: None}, r#"{"kind":"discover","genre":878}"#)]
    #[case(MovieFilter::Discover{genre: None, year: None}, r#"{"kind":"discover"}"#)]
    fn test_movie_filter_serialize(#[case] input: MovieFilter, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&input).unwrap(), expected);
    }

    #[rstest]
    #[case(TvFilter::OnTheAir, r#"{"kind":"on_the_air"}"#)]
    #[case(TvFilter::search("severance"), r#"{"kind":"search","query":"severance"}"#)]
    fn test_tv_filter_serialize(#[case] input: TvFilter, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&input).unwrap(), expected);
    }

    #[test]
    fn test_absent_filter_is_its_own_partition() {
        let none: Option<MovieFilter> = None;
        let some = Some(MovieFilter::Popular);
        assert_eq!(serde_json::to_string(&none).unwrap(), "null");
        assert_ne!(serde_json::to_string(&none).unwrap(), serde_json::to_string(&some).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(MovieFilter::Discover { genre: Some(18), year: Some(1999) }.to_string(), "discover genre=18 year=1999");
        assert_eq!(TvFilter::search("the bear").to_string(), "search \"the bear\"");
    }
}
