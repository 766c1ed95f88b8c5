//! Typed access to the TMDB REST API.

mod content;
mod image;
mod lists;
mod types;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::http::{ApiClient, QueryParams, RequestOptions};
use crate::pagination::Page;

pub use content::{Content, MediaItem, MediaKind};
pub use image::{DEFAULT_IMAGE_BASE_URL, ImageSize, ImageUrls};
pub use lists::{MovieCategory, SearchMode, TimeWindow, TrendingScope, TvCategory};
pub use types::{
    DateRange, DatedPage, Episode, Genre, GenreList, Movie, MovieDetails, Person,
    ProductionCompany, ProductionCountry, SeasonDetails, SeasonSummary, SpokenLanguage, TvShow,
    TvShowDetails, Video, VideoList,
};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<Content>>;

    async fn movie_list(
        &self,
        category: MovieCategory,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<DatedPage<Movie>>;

    async fn tv_list(
        &self,
        category: TvCategory,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<TvShow>>;

    async fn discover(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<Content>>;

    async fn genres(&self, kind: MediaKind, cancel: &CancellationToken) -> Result<Vec<Genre>>;

    async fn movie_details(&self, id: u64, cancel: &CancellationToken) -> Result<MovieDetails>;

    async fn tv_details(&self, id: u64, cancel: &CancellationToken) -> Result<TvShowDetails>;

    async fn season_details(
        &self,
        tv_id: u64,
        season_number: u32,
        cancel: &CancellationToken,
    ) -> Result<SeasonDetails>;

    async fn videos(
        &self,
        kind: MediaKind,
        id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>>;

    async fn search(
        &self,
        mode: SearchMode,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<Content>>;
}

/// [`TmdbApi`] over a configured [`ApiClient`].
#[derive(Debug, Clone)]
pub struct Tmdb {
    client: ApiClient,
}

impl Tmdb {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: QueryParams,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let options = RequestOptions::new().params(params).cancel(cancel.clone());
        self.client.get(endpoint, options).await
    }
}

#[async_trait]
impl TmdbApi for Tmdb {
    #[tracing::instrument(skip(self, cancel))]
    async fn trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<Content>> {
        let endpoint = format!("/trending/{}/{}", scope.as_path(), window.as_path());
        let params = QueryParams::new().with("page", page);

        debug!("Fetching trending from {}...", endpoint);

        match scope {
            TrendingScope::All => {
                let page: Page<MediaItem> = self.get(&endpoint, params, cancel).await?;
                Ok(page.filter_map(MediaItem::into_content))
            }
            TrendingScope::Movie => {
                let page: Page<Movie> = self.get(&endpoint, params, cancel).await?;
                Ok(page.map(Content::Movie))
            }
            TrendingScope::Tv => {
                let page: Page<TvShow> = self.get(&endpoint, params, cancel).await?;
                Ok(page.map(Content::Tv))
            }
        }
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn movie_list(
        &self,
        category: MovieCategory,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<DatedPage<Movie>> {
        let endpoint = format!("/movie/{}", category.as_path());
        self.get(&endpoint, QueryParams::new().with("page", page), cancel)
            .await
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn tv_list(
        &self,
        category: TvCategory,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<TvShow>> {
        let endpoint = format!("/tv/{}", category.as_path());
        self.get(&endpoint, QueryParams::new().with("page", page), cancel)
            .await
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn discover(
        &self,
        kind: MediaKind,
        genre_id: u64,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<Content>> {
        let endpoint = format!("/discover/{}", kind.as_path());
        let params = QueryParams::new()
            .with("with_genres", genre_id)
            .with("page", page);

        match kind {
            MediaKind::Movie => {
                let page: Page<Movie> = self.get(&endpoint, params, cancel).await?;
                Ok(page.map(Content::Movie))
            }
            MediaKind::Tv => {
                let page: Page<TvShow> = self.get(&endpoint, params, cancel).await?;
                Ok(page.map(Content::Tv))
            }
        }
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn genres(&self, kind: MediaKind, cancel: &CancellationToken) -> Result<Vec<Genre>> {
        let endpoint = format!("/genre/{}/list", kind.as_path());
        let list: GenreList = self.get(&endpoint, QueryParams::new(), cancel).await?;
        Ok(list.genres)
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn movie_details(&self, id: u64, cancel: &CancellationToken) -> Result<MovieDetails> {
        self.get(&format!("/movie/{}", id), QueryParams::new(), cancel)
            .await
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn tv_details(&self, id: u64, cancel: &CancellationToken) -> Result<TvShowDetails> {
        self.get(&format!("/tv/{}", id), QueryParams::new(), cancel)
            .await
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn season_details(
        &self,
        tv_id: u64,
        season_number: u32,
        cancel: &CancellationToken,
    ) -> Result<SeasonDetails> {
        let endpoint = format!("/tv/{}/season/{}", tv_id, season_number);
        self.get(&endpoint, QueryParams::new(), cancel).await
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn videos(
        &self,
        kind: MediaKind,
        id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>> {
        let endpoint = format!("/{}/{}/videos", kind.as_path(), id);
        let list: VideoList = self.get(&endpoint, QueryParams::new(), cancel).await?;
        Ok(list.results)
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn search(
        &self,
        mode: SearchMode,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Page<Content>> {
        let endpoint = format!("/search/{}", mode.as_path());
        let params = QueryParams::new().with("query", query).with("page", page);

        match mode {
            SearchMode::Multi => {
                let page: Page<MediaItem> = self.get(&endpoint, params, cancel).await?;
                Ok(page.filter_map(MediaItem::into_content))
            }
            SearchMode::Movie => {
                let page: Page<Movie> = self.get(&endpoint, params, cancel).await?;
                Ok(page.map(Content::Movie))
            }
            SearchMode::Tv => {
                let page: Page<TvShow> = self.get(&endpoint, params, cancel).await?;
                Ok(page.map(Content::Tv))
            }
        }
    }
}
