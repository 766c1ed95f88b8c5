use anyhow::Result;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::{
    application::{self, Listing, TOP_SEARCHES_LIMIT},
    counter::SearchCounter,
    tmdb::{MediaKind, MovieCategory, TimeWindow, TmdbApi, TrendingScope, TvCategory},
};

use super::{config::Config, output};

/// Show the featured lists, plus trending searches when searches are counted
#[tracing::instrument(skip(config, cancel))]
pub async fn home<T: TmdbApi, C: SearchCounter>(
    config: &Config<T, C>,
    cancel: &CancellationToken,
) -> Result<()> {
    print!("{}", render_home(config, cancel).await?);
    Ok(())
}

async fn render_home<T: TmdbApi, C: SearchCounter>(
    config: &Config<T, C>,
    cancel: &CancellationToken,
) -> Result<String> {
    let searches = async {
        match &config.counter {
            Some(counter) => {
                application::top_searches_or_empty(counter, TOP_SEARCHES_LIMIT, cancel).await
            }
            None => Ok(Vec::new()),
        }
    };
    let (feed, searches) = tokio::try_join!(
        application::load_home_feed(&config.tmdb, cancel),
        searches
    )?;

    let mut out = String::new();
    if !searches.is_empty() {
        out.push_str("== Trending Searches ==\n");
        out.push_str(&output::top_searches(&searches));
        out.push('\n');
    }
    out.push_str(&output::home_feed(&feed));
    Ok(out)
}

/// Show one page of trending titles
#[tracing::instrument(skip(config, cancel))]
pub async fn trending<T: TmdbApi>(
    config: &Config<T>,
    scope: TrendingScope,
    window: TimeWindow,
    page: u32,
    cancel: &CancellationToken,
) -> Result<()> {
    let listing = application::trending(&config.tmdb, scope, window, page, cancel).await?;
    let title = format!(
        "Trending ({}, {})",
        scope.as_path(),
        match window {
            TimeWindow::Day => "today",
            TimeWindow::Week => "this week",
        }
    );
    print!("{}", page_listing(&title, page, &listing));
    Ok(())
}

/// Show one page of a movie list
#[tracing::instrument(skip(config, cancel))]
pub async fn movies<T: TmdbApi>(
    config: &Config<T>,
    category: MovieCategory,
    page: u32,
    cancel: &CancellationToken,
) -> Result<()> {
    let listing = application::movie_list(&config.tmdb, category, page, cancel).await?;
    print!("{}", page_listing(category.label(), page, &listing));
    Ok(())
}

/// Show one page of a TV list
#[tracing::instrument(skip(config, cancel))]
pub async fn tv<T: TmdbApi>(
    config: &Config<T>,
    category: TvCategory,
    page: u32,
    cancel: &CancellationToken,
) -> Result<()> {
    let listing = application::tv_list(&config.tmdb, category, page, cancel).await?;
    print!("{}", page_listing(category.label(), page, &listing));
    Ok(())
}

/// List the genres available for movies or TV
#[tracing::instrument(skip(config, cancel))]
pub async fn genres<T: TmdbApi>(
    config: &Config<T>,
    kind: MediaKind,
    cancel: &CancellationToken,
) -> Result<()> {
    let genres = config.tmdb.genres(kind, cancel).await?;
    debug!("Found {} genre(s)", genres.len());
    if genres.is_empty() {
        println!("No genres found.");
        return Ok(());
    }
    print!("{}", output::genres(&genres));
    Ok(())
}

/// Show titles of one genre, up to `pages` pages
#[tracing::instrument(skip(config, cancel))]
pub async fn discover<T: TmdbApi>(
    config: &Config<T>,
    kind: MediaKind,
    genre_id: u64,
    pages: usize,
    cancel: &CancellationToken,
) -> Result<()> {
    let listing = application::discover(&config.tmdb, kind, genre_id, pages, cancel).await?;
    print!("{}", discover_listing(kind, genre_id, &listing));
    Ok(())
}

fn discover_listing(kind: MediaKind, genre_id: u64, listing: &Listing) -> String {
    if listing.is_empty() {
        return format!("No titles found for genre {}.\n", genre_id);
    }
    let title = format!("Discover {} (genre {})", kind, genre_id);
    output::listing(&title, listing)
}

fn page_listing(title: &str, page: u32, listing: &Listing) -> String {
    if listing.is_empty() {
        return format!("{}: nothing on page {}.\n", title, page);
    }
    output::listing(&format!("{} - page {}", title, page), listing)
}
