//! Title detail pages and season browsing.

use anyhow::Result;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::http::Cancelled;
use crate::tmdb::{MediaKind, MovieDetails, SeasonDetails, TmdbApi, TvShowDetails, Video};

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub details: MovieDetails,
    pub videos: Vec<Video>,
}

impl MovieDetail {
    pub fn trailer(&self) -> Option<&Video> {
        featured_trailer(&self.videos)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowDetail {
    pub details: TvShowDetails,
    pub videos: Vec<Video>,
}

impl ShowDetail {
    pub fn trailer(&self) -> Option<&Video> {
        featured_trailer(&self.videos)
    }
}

/// The first official YouTube trailer, else the first YouTube trailer.
pub fn featured_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube_trailer() && v.official)
        .or_else(|| videos.iter().find(|v| v.is_youtube_trailer()))
}

/// Videos are secondary: a failed video fetch is logged and yields an empty
/// list, unless the request was cancelled.
fn videos_or_empty(result: Result<Vec<Video>>, kind: MediaKind, id: u64) -> Result<Vec<Video>> {
    match result {
        Ok(videos) => Ok(videos),
        Err(e) if e.downcast_ref::<Cancelled>().is_some() => Err(e),
        Err(e) => {
            warn!("Failed to load videos for {} {}: {:#}", kind, id, e);
            Ok(Vec::new())
        }
    }
}

#[tracing::instrument(skip(api, cancel))]
pub async fn movie_detail<A: TmdbApi>(
    api: &A,
    id: u64,
    cancel: &CancellationToken,
) -> Result<MovieDetail> {
    let (details, videos) = tokio::join!(
        api.movie_details(id, cancel),
        api.videos(MediaKind::Movie, id, cancel),
    );
    let details = details?;
    let videos = videos_or_empty(videos, MediaKind::Movie, id)?;
    debug!("Loaded movie {} with {} video(s)", details.title, videos.len());
    Ok(MovieDetail { details, videos })
}

#[tracing::instrument(skip(api, cancel))]
pub async fn show_detail<A: TmdbApi>(
    api: &A,
    id: u64,
    cancel: &CancellationToken,
) -> Result<ShowDetail> {
    let (details, videos) = tokio::join!(
        api.tv_details(id, cancel),
        api.videos(MediaKind::Tv, id, cancel),
    );
    let details = details?;
    let videos = videos_or_empty(videos, MediaKind::Tv, id)?;
    debug!("Loaded show {} with {} video(s)", details.name, videos.len());
    Ok(ShowDetail { details, videos })
}

#[tracing::instrument(skip(api, cancel))]
pub async fn season<A: TmdbApi>(
    api: &A,
    tv_id: u64,
    season_number: u32,
    cancel: &CancellationToken,
) -> Result<SeasonDetails> {
    api.season_details(tv_id, season_number, cancel).await
}
