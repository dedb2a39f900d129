use serde::{Deserialize, Serialize};
use time::Date;

use super::{Item, ItemId};

/// A TV series as listed by the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvSeries {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<Date>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f32,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}
impl TvSeries {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            original_name: None,
            original_language: None,
            overview: None,
            first_air_date: None,
            origin_country: Vec::new(),
            genre_ids: Vec::new(),
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            poster_path: None,
            backdrop_path: None,
        }
    }

    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }
}
impl Item for TvSeries {
    fn id(&self) -> ItemId {
        self.id
    }
}
