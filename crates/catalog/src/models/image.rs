use serde::{Deserialize, Serialize};

use super::ItemId;

/// One image of an item, as a raw path plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// ISO 639-1 language of any text in the image. `None` for textless images.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
}
impl Image {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            width: 0,
            height: 0,
            language: None,
            vote_average: 0.0,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Enrichment data for a single item: every image the catalog knows of.
///
/// Fetched per item and never persisted by the cache. An item without an
/// image set is perfectly valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    pub id: ItemId,
    #[serde(default)]
    pub backdrops: Vec<Image>,
    #[serde(default)]
    pub posters: Vec<Image>,
    #[serde(default)]
    pub logos: Vec<Image>,
}
impl ImageSet {
    pub fn empty(id: ItemId) -> Self {
        Self {
            id,
            backdrops: Vec::new(),
            posters: Vec::new(),
            logos: Vec::new(),
        }
    }

    /// The logo to show for `language`.
    ///
    /// Prefers a logo in that language, then a textless one, then whatever
    /// comes first.
    pub fn preferred_logo(&self, language: &str) -> Option<&Image> {
        self.logos
            .iter()
            .find(|l| l.language.as_deref() == Some(language))
            .or_else(|| self.logos.iter().find(|l| l.language.is_none()))
            .or_else(|| self.logos.first())
    }
}
