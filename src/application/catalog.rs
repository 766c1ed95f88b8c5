//! Category lists, trending and genre discovery.

use anyhow::Result;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::pagination::{Page, Paginator};
use crate::tmdb::{Content, MediaKind, MovieCategory, TimeWindow, TmdbApi, TrendingScope, TvCategory};

/// Items accumulated from one or more pages of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub items: Vec<Content>,
    /// Pages loaded into `items`.
    pub pages_loaded: usize,
    /// Total reported upstream, if any page was loaded.
    pub total_results: Option<u32>,
    /// Whether more pages exist past the ones loaded.
    pub has_more: bool,
}

impl Listing {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pages_loaded: 0,
            total_results: None,
            has_more: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn from_paginator<F>(paginator: Paginator<Content, F>) -> Self {
        let pages_loaded = paginator.pages().len();
        let total_results = paginator.total_results();
        let has_more = paginator.pages().last().is_some_and(Page::has_next_page);
        Self {
            items: paginator.into_items(),
            pages_loaded,
            total_results,
            has_more,
        }
    }

    pub(crate) fn from_page(page: Page<Content>) -> Self {
        Self {
            pages_loaded: 1,
            total_results: Some(page.total_results),
            has_more: page.has_next_page(),
            items: page.results,
        }
    }
}

#[tracing::instrument(skip(api, cancel))]
pub async fn trending<A: TmdbApi>(
    api: &A,
    scope: TrendingScope,
    window: TimeWindow,
    page: u32,
    cancel: &CancellationToken,
) -> Result<Listing> {
    let page = api.trending(scope, window, page, cancel).await?;
    Ok(Listing::from_page(page))
}

#[tracing::instrument(skip(api, cancel))]
pub async fn movie_list<A: TmdbApi>(
    api: &A,
    category: MovieCategory,
    page: u32,
    cancel: &CancellationToken,
) -> Result<Listing> {
    let dated = api.movie_list(category, page, cancel).await?;
    if let Some(dates) = &dated.dates {
        debug!(
            "{} covers {} to {}",
            category, dates.minimum, dates.maximum
        );
    }
    Ok(Listing::from_page(dated.page.map(Content::Movie)))
}

#[tracing::instrument(skip(api, cancel))]
pub async fn tv_list<A: TmdbApi>(
    api: &A,
    category: TvCategory,
    page: u32,
    cancel: &CancellationToken,
) -> Result<Listing> {
    let page = api.tv_list(category, page, cancel).await?;
    Ok(Listing::from_page(page.map(Content::Tv)))
}

/// Loads up to `max_pages` pages of titles tagged with `genre_id`.
#[tracing::instrument(skip(api, cancel))]
pub async fn discover<A: TmdbApi>(
    api: &A,
    kind: MediaKind,
    genre_id: u64,
    max_pages: usize,
    cancel: &CancellationToken,
) -> Result<Listing> {
    let mut paginator = Paginator::new(|page| api.discover(kind, genre_id, page, cancel));
    let fetched = paginator.fetch_pages(max_pages).await?;
    debug!("Discover {} genre {}: fetched {} page(s)", kind, genre_id, fetched);
    Ok(Listing::from_paginator(paginator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{DateRange, DatedPage, MockTmdbApi, Movie, TvShow};

    fn movie(id: u64, title: &str) -> Content {
        Content::Movie(Movie {
            id,
            title: title.to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_discover_fetches_until_max_pages() {
        let mut api = MockTmdbApi::new();

        api.expect_discover()
            .times(2)
            .returning(|kind, genre_id, page, _| {
                assert_eq!(kind, MediaKind::Movie);
                assert_eq!(genre_id, 28);
                Ok(Page {
                    page,
                    results: vec![movie(page as u64, "Action")],
                    total_pages: 10,
                    total_results: 200,
                })
            });

        let listing = discover(&api, MediaKind::Movie, 28, 2, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(listing.pages_loaded, 2);
        assert_eq!(listing.items.len(), 2);
        assert_eq!(listing.total_results, Some(200));
        assert!(listing.has_more);
    }

    #[tokio::test]
    async fn test_discover_stops_at_last_page() {
        let mut api = MockTmdbApi::new();

        api.expect_discover()
            .times(1)
            .returning(|_, _, page, _| {
                Ok(Page {
                    page,
                    results: vec![movie(1, "Only")],
                    total_pages: 1,
                    total_results: 1,
                })
            });

        let listing = discover(&api, MediaKind::Tv, 16, 5, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(listing.pages_loaded, 1);
        assert!(!listing.has_more);
    }

    #[tokio::test]
    async fn test_movie_list_tags_content() {
        let mut api = MockTmdbApi::new();

        api.expect_movie_list().times(1).returning(|category, page, _| {
            assert_eq!(category, MovieCategory::Upcoming);
            Ok(DatedPage {
                page: Page {
                    page,
                    results: vec![Movie {
                        id: 3,
                        title: "Soon".to_string(),
                        ..Default::default()
                    }],
                    total_pages: 3,
                    total_results: 50,
                },
                dates: Some(DateRange {
                    minimum: "2024-06-01".to_string(),
                    maximum: "2024-07-01".to_string(),
                }),
            })
        });

        let listing = movie_list(&api, MovieCategory::Upcoming, 1, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(listing.items[0].kind(), MediaKind::Movie);
        assert!(listing.has_more);
    }

    #[tokio::test]
    async fn test_tv_list_propagates_error() {
        let mut api = MockTmdbApi::new();

        api.expect_tv_list()
            .returning(|_, _, _| Err(anyhow::anyhow!("boom")));

        let result = tv_list(&api, TvCategory::OnTheAir, 1, &CancellationToken::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tv_list_tags_content() {
        let mut api = MockTmdbApi::new();

        api.expect_tv_list().returning(|_, page, _| {
            Ok(Page {
                page,
                results: vec![TvShow {
                    id: 1,
                    name: "Bluey".to_string(),
                    ..Default::default()
                }],
                total_pages: 1,
                total_results: 1,
            })
        });

        let listing = tv_list(&api, TvCategory::Popular, 1, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(listing.items[0].kind(), MediaKind::Tv);
        assert_eq!(listing.items[0].title(), "Bluey");
    }
}
