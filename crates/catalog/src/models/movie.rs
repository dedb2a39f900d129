use serde::{Deserialize, Serialize};
use time::Date;

use super::{Item, ItemId};

/// A movie as listed by the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<Date>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f32,
    #[serde(default)]
    pub adult: bool,
    /// Raw poster path, resolved against a [`Configuration`](super::Configuration).
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}
impl Movie {
    /// Minimal movie with every optional field empty.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            original_title: None,
            original_language: None,
            overview: None,
            release_date: None,
            genre_ids: Vec::new(),
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            adult: false,
            poster_path: None,
            backdrop_path: None,
        }
    }

    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    pub fn with_backdrop(mut self, path: impl Into<String>) -> Self {
        self.backdrop_path = Some(path.into());
        self
    }
}
impl Item for Movie {
    fn id(&self) -> ItemId {
        self.id
    }
}
