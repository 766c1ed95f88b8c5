//! Image CDN URLs.
//!
//! Images are addressed as `{base}/{size}/{path}` where `path` comes from the
//! metadata payloads (`poster_path`, `backdrop_path`, `still_path`, ...).

use std::fmt;
use std::str::FromStr;

/// Default image CDN base URL.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Width buckets served by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageSize {
    W92,
    W154,
    W185,
    W342,
    W500,
    W780,
    W1280,
    #[default]
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w92" => Ok(ImageSize::W92),
            "w154" => Ok(ImageSize::W154),
            "w185" => Ok(ImageSize::W185),
            "w342" => Ok(ImageSize::W342),
            "w500" => Ok(ImageSize::W500),
            "w780" => Ok(ImageSize::W780),
            "w1280" => Ok(ImageSize::W1280),
            "original" => Ok(ImageSize::Original),
            _ => anyhow::bail!("Unknown image size: {}", s),
        }
    }
}

/// Builds full image URLs against one CDN base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base_url: String,
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `None` for a missing or blank path.
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> Option<String> {
        let path = path?.trim();
        if path.is_empty() {
            return None;
        }
        let path = path.strip_prefix('/').unwrap_or(path);
        Some(format!("{}/{}/{}", self.base_url, size, path))
    }

    /// Poster first, then backdrop.
    pub fn poster_or_backdrop(
        &self,
        poster: Option<&str>,
        backdrop: Option<&str>,
        size: ImageSize,
    ) -> Option<String> {
        self.url(poster, size).or_else(|| self.url(backdrop, size))
    }
}
