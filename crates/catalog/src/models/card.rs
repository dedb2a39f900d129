//! Display-ready presentation models.
//!
//! A card is built from a primary item, its (optional) image set, and the
//! image [`Configuration`]. Building one is pure and total: a missing image
//! set or an unconfigured size list just leaves the corresponding fields
//! empty.

use time::Date;

use super::{Configuration, ImageKind, ImageSet, ImageUrls, ItemId, Movie, TvSeries};

/// Maximum number of backdrops carried into a card's gallery.
pub const GALLERY_LIMIT: usize = 10;
/// Language used to pick a logo out of an [`ImageSet`].
pub const LOGO_LANGUAGE: &str = "en";

fn gallery(config: &Configuration, images: Option<&ImageSet>) -> Vec<ImageUrls> {
    images
        .map(|set| {
            set.backdrops
                .iter()
                .filter_map(|image| config.resolve(ImageKind::Backdrop, &image.file_path))
                .take(GALLERY_LIMIT)
                .collect()
        })
        .unwrap_or_default()
}

fn logo(config: &Configuration, images: Option<&ImageSet>) -> Option<ImageUrls> {
    images
        .and_then(|set| set.preferred_logo(LOGO_LANGUAGE))
        .and_then(|logo| config.resolve(ImageKind::Logo, &logo.file_path))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub id: ItemId,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<Date>,
    pub genre_ids: Vec<u32>,
    pub vote_average: f32,
    pub poster: Option<ImageUrls>,
    pub backdrop: Option<ImageUrls>,
    /// From the item's [`ImageSet`]; `None` when there's no enrichment.
    pub logo: Option<ImageUrls>,
    /// From the item's [`ImageSet`]; empty when there's no enrichment.
    pub gallery: Vec<ImageUrls>,
}
impl MovieCard {
    pub fn new(movie: &Movie, images: Option<&ImageSet>, config: &Configuration) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date,
            genre_ids: movie.genre_ids.clone(),
            vote_average: movie.vote_average,
            poster: config.resolve_opt(ImageKind::Poster, movie.poster_path.as_deref()),
            backdrop: config.resolve_opt(ImageKind::Backdrop, movie.backdrop_path.as_deref()),
            logo: logo(config, images),
            gallery: gallery(config, images),
        }
    }

    /// Whether any enrichment made it onto this card.
    pub fn is_enriched(&self) -> bool {
        self.logo.is_some() || !self.gallery.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TvCard {
    pub id: ItemId,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<Date>,
    pub origin_country: Vec<String>,
    pub genre_ids: Vec<u32>,
    pub vote_average: f32,
    pub poster: Option<ImageUrls>,
    pub backdrop: Option<ImageUrls>,
    pub logo: Option<ImageUrls>,
    pub gallery: Vec<ImageUrls>,
}
impl TvCard {
    pub fn new(series: &TvSeries, images: Option<&ImageSet>, config: &Configuration) -> Self {
        Self {
            id: series.id,
            name: series.name.clone(),
            overview: series.overview.clone(),
            first_air_date: series.first_air_date,
            origin_country: series.origin_country.clone(),
            genre_ids: series.genre_ids.clone(),
            vote_average: series.vote_average,
            poster: config.resolve_opt(ImageKind::Poster, series.poster_path.as_deref()),
            backdrop: config.resolve_opt(ImageKind::Backdrop, series.backdrop_path.as_deref()),
            logo: logo(config, images),
            gallery: gallery(config, images),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.logo.is_some() || !self.gallery.is_empty()
    }
}
