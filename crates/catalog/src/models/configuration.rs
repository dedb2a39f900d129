use serde::{Deserialize, Serialize};

/// Image configuration published by the remote catalog.
///
/// Raw asset paths (`/kqjL17yufvn9OVLyXYpvtyrFfak.jpg`) only become usable
/// URLs when joined with a base URL and one of the advertised size names.
/// Size lists are ordered smallest first, usually ending with `original`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Base URL that every image URL starts with, e.g. `https://image.example.org/t/p/`.
    pub base_url: String,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    #[serde(default)]
    pub logo_sizes: Vec<String>,
}

/// Which size list applies to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Poster,
    Backdrop,
    Logo,
}

/// An image resolved at the three fixed size classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageUrls {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl Configuration {
    pub fn sizes(&self, kind: ImageKind) -> &[String] {
        match kind {
            ImageKind::Poster => &self.poster_sizes,
            ImageKind::Backdrop => &self.backdrop_sizes,
            ImageKind::Logo => &self.logo_sizes,
        }
    }

    /// Resolve a raw asset path into absolute URLs.
    ///
    /// Small is the first advertised size, large the last and medium the
    /// middle one. Returns `None` for a blank path or when the configuration
    /// advertises no sizes for `kind`.
    pub fn resolve(&self, kind: ImageKind, path: &str) -> Option<ImageUrls> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        let sizes = self.sizes(kind);
        let (Some(small), Some(large)) = (sizes.first(), sizes.last()) else {
            tracing::trace!(?kind, "no image sizes configured");
            return None;
        };
        let medium = &sizes[sizes.len() / 2];
        Some(ImageUrls {
            small: self.url(small, path),
            medium: self.url(medium, path),
            large: self.url(large, path),
        })
    }

    /// [`resolve`](Self::resolve) for an optional path.
    pub fn resolve_opt(&self, kind: ImageKind, path: Option<&str>) -> Option<ImageUrls> {
        path.and_then(|p| self.resolve(kind, p))
    }

    fn url(&self, size: &str, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        match path.starts_with('/') {
            true => format!("{base}/{size}{path}"),
            false => format!("{base}/{size}/{path}"),
        }
    }
}
