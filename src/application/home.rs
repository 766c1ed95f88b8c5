//! Home feed - the first page of every featured list, loaded concurrently.

use anyhow::Result;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::pagination::FIRST_PAGE;
use crate::tmdb::{Content, MovieCategory, TimeWindow, TmdbApi, TrendingScope, TvCategory};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeFeed {
    pub trending: Vec<Content>,
    pub popular_movies: Vec<Content>,
    pub popular_tv: Vec<Content>,
    pub top_rated_movies: Vec<Content>,
    pub top_rated_tv: Vec<Content>,
}

impl HomeFeed {
    /// Sections in display order.
    pub fn sections(&self) -> [(&'static str, &[Content]); 5] {
        [
            ("Trending Today", self.trending.as_slice()),
            (MovieCategory::Popular.label(), self.popular_movies.as_slice()),
            (TvCategory::Popular.label(), self.popular_tv.as_slice()),
            (MovieCategory::TopRated.label(), self.top_rated_movies.as_slice()),
            (TvCategory::TopRated.label(), self.top_rated_tv.as_slice()),
        ]
    }
}

/// Any failing list fails the whole feed.
#[tracing::instrument(skip(api, cancel))]
pub async fn load_home_feed<A: TmdbApi>(api: &A, cancel: &CancellationToken) -> Result<HomeFeed> {
    let (trending, popular_movies, popular_tv, top_rated_movies, top_rated_tv) = tokio::try_join!(
        api.trending(TrendingScope::All, TimeWindow::Day, FIRST_PAGE, cancel),
        api.movie_list(MovieCategory::Popular, FIRST_PAGE, cancel),
        api.tv_list(TvCategory::Popular, FIRST_PAGE, cancel),
        api.movie_list(MovieCategory::TopRated, FIRST_PAGE, cancel),
        api.tv_list(TvCategory::TopRated, FIRST_PAGE, cancel),
    )?;

    let feed = HomeFeed {
        trending: trending.results,
        popular_movies: popular_movies.page.map(Content::Movie).results,
        popular_tv: popular_tv.map(Content::Tv).results,
        top_rated_movies: top_rated_movies.page.map(Content::Movie).results,
        top_rated_tv: top_rated_tv.map(Content::Tv).results,
    };

    debug!(
        "Home feed loaded: {} trending, {} popular movies, {} popular shows",
        feed.trending.len(),
        feed.popular_movies.len(),
        feed.popular_tv.len()
    );

    Ok(feed)
}
