//! Movie-or-show content with an explicit kind tag.
//!
//! The kind is decided once, when a payload is ingested: list endpoints know
//! what they return, and mixed endpoints carry a `media_type` field. Code
//! downstream matches on [`Content`] instead of probing for `title` or
//! `name`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::{Movie, Person, TvShow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the API (`movie` or `tv`).
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_path())
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "show" | "shows" => Ok(MediaKind::Tv),
            _ => anyhow::bail!("Unknown media kind: {}. Expected movie or tv.", s),
        }
    }
}

/// A movie or a TV show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Content {
    Movie(Movie),
    Tv(TvShow),
}

impl Content {
    pub fn kind(&self) -> MediaKind {
        match self {
            Content::Movie(_) => MediaKind::Movie,
            Content::Tv(_) => MediaKind::Tv,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Content::Movie(m) => m.id,
            Content::Tv(t) => t.id,
        }
    }

    /// Movie title or show name.
    pub fn title(&self) -> &str {
        match self {
            Content::Movie(m) => &m.title,
            Content::Tv(t) => &t.name,
        }
    }

    /// Release date for movies, first air date for shows.
    pub fn date(&self) -> Option<&str> {
        let date = match self {
            Content::Movie(m) => m.release_date.as_deref(),
            Content::Tv(t) => t.first_air_date.as_deref(),
        };
        date.filter(|d| !d.is_empty())
    }

    /// Four-digit year of [`Content::date`].
    pub fn year(&self) -> Option<&str> {
        self.date().and_then(|d| d.get(..4))
    }

    pub fn overview(&self) -> &str {
        match self {
            Content::Movie(m) => &m.overview,
            Content::Tv(t) => &t.overview,
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            Content::Movie(m) => m.vote_average,
            Content::Tv(t) => t.vote_average,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Content::Movie(m) => m.poster_path.as_deref(),
            Content::Tv(t) => t.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            Content::Movie(m) => m.backdrop_path.as_deref(),
            Content::Tv(t) => t.backdrop_path.as_deref(),
        }
    }
}

impl From<Movie> for Content {
    fn from(movie: Movie) -> Self {
        Content::Movie(movie)
    }
}

impl From<TvShow> for Content {
    fn from(show: TvShow) -> Self {
        Content::Tv(show)
    }
}

/// An entry of a mixed endpoint (`/trending/all/*`, `/search/multi`),
/// tagged by the payload's own `media_type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MediaItem {
    Movie(Movie),
    Tv(TvShow),
    Person(Person),
    #[serde(other)]
    Unknown,
}

impl MediaItem {
    /// Movies and shows become [`Content`]; people and unknown kinds are
    /// dropped.
    pub fn into_content(self) -> Option<Content> {
        match self {
            MediaItem::Movie(m) => Some(Content::Movie(m)),
            MediaItem::Tv(t) => Some(Content::Tv(t)),
            MediaItem::Person(_) | MediaItem::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Page;

    #[test]
    fn test_media_kind_from_str() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("TV".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        assert!("person".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_media_item_tagged_by_media_type() {
        let page: Page<MediaItem> = serde_json::from_str(
            r#"{
                "page": 1,
                "total_pages": 1,
                "total_results": 4,
                "results": [
                    {"media_type": "movie", "id": 1, "title": "Alien", "release_date": "1979-05-25"},
                    {"media_type": "tv", "id": 2, "name": "Andor", "first_air_date": "2022-09-21"},
                    {"media_type": "person", "id": 3, "name": "Sigourney Weaver"},
                    {"media_type": "collection", "id": 4, "name": "Alien Collection"}
                ]
            }"#,
        )
        .unwrap();

        let content: Vec<Content> = page
            .results
            .into_iter()
            .filter_map(MediaItem::into_content)
            .collect();

        assert_eq!(content.len(), 2);
        assert_eq!(content[0].kind(), MediaKind::Movie);
        assert_eq!(content[0].title(), "Alien");
        assert_eq!(content[0].year(), Some("1979"));
        assert_eq!(content[1].kind(), MediaKind::Tv);
        assert_eq!(content[1].title(), "Andor");
        assert_eq!(content[1].date(), Some("2022-09-21"));
    }

    #[test]
    fn test_content_ingested_from_list_endpoint() {
        let show = TvShow {
            id: 7,
            name: "Severance".to_string(),
            first_air_date: Some(String::new()),
            ..Default::default()
        };
        let content = Content::from(show);

        assert_eq!(content.kind(), MediaKind::Tv);
        assert_eq!(content.id(), 7);
        assert_eq!(content.date(), None);
        assert_eq!(content.year(), None);
    }

    #[test]
    fn test_content_serializes_with_kind() {
        let content = Content::from(Movie {
            id: 9,
            title: "Heat".to_string(),
            ..Default::default()
        });
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "movie");
        assert_eq!(json["title"], "Heat");
    }
}
