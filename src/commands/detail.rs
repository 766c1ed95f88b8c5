use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::{
    application,
    tmdb::{ImageUrls, SeasonDetails, TmdbApi},
};

use super::{config::Config, output};

/// Show a movie with its featured trailer
#[tracing::instrument(skip(config, cancel))]
pub async fn movie<T: TmdbApi>(config: &Config<T>, id: u64, cancel: &CancellationToken) -> Result<()> {
    let detail = application::movie_detail(&config.tmdb, id, cancel).await?;
    print!("{}", output::movie_detail(&detail, &config.images));
    Ok(())
}

/// Show a TV show with its seasons and featured trailer
#[tracing::instrument(skip(config, cancel))]
pub async fn show<T: TmdbApi>(config: &Config<T>, id: u64, cancel: &CancellationToken) -> Result<()> {
    let detail = application::show_detail(&config.tmdb, id, cancel).await?;
    print!("{}", output::show_detail(&detail, &config.images));
    Ok(())
}

/// Show the episodes of one season
#[tracing::instrument(skip(config, cancel))]
pub async fn season<T: TmdbApi>(
    config: &Config<T>,
    tv_id: u64,
    season_number: u32,
    cancel: &CancellationToken,
) -> Result<()> {
    let season = application::season(&config.tmdb, tv_id, season_number, cancel).await?;
    print!("{}", season_listing(&season, &config.images));
    Ok(())
}

fn season_listing(season: &SeasonDetails, images: &ImageUrls) -> String {
    if season.episodes.is_empty() {
        return format!("{}: no episodes listed.\n", season.name);
    }
    output::season(season, images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiError, ErrorBody};
    use crate::tmdb::{Episode, MockTmdbApi, MovieDetails};

    fn config(tmdb: MockTmdbApi) -> Config<MockTmdbApi> {
        Config {
            tmdb,
            images: ImageUrls::default(),
            counter: None,
        }
    }

    #[tokio::test]
    async fn test_movie() {
        let mut api = MockTmdbApi::new();
        api.expect_movie_details()
            .times(1)
            .returning(|id, _| {
                Ok(MovieDetails {
                    id,
                    title: "Heat".to_string(),
                    ..Default::default()
                })
            });
        api.expect_videos().times(1).returning(|_, _, _| Ok(vec![]));

        let result = movie(&config(api), 949, &CancellationToken::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_show_not_found() {
        let mut api = MockTmdbApi::new();
        api.expect_tv_details().returning(|_, _| {
            Err(ApiError::new(404, "Not Found", ErrorBody::Text(String::new())).into())
        });
        api.expect_videos().returning(|_, _, _| Ok(vec![]));

        let err = show(&config(api), 1, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ApiError>().unwrap().status, 404);
    }

    #[test]
    fn test_season_without_episodes() {
        let season = SeasonDetails {
            season_number: 0,
            name: "Specials".to_string(),
            ..Default::default()
        };

        assert_eq!(
            season_listing(&season, &ImageUrls::default()),
            "Specials: no episodes listed.\n"
        );
    }

    #[test]
    fn test_season_with_episodes() {
        let season = SeasonDetails {
            season_number: 2,
            name: "Season 2".to_string(),
            episodes: vec![Episode {
                episode_number: 1,
                name: "The North Remembers".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let out = season_listing(&season, &ImageUrls::default());

        assert!(out.starts_with("Season 2\n"));
        assert!(out.contains("  E01  The North Remembers\n"));
    }
}
