use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;

use crate::{
    application::{self, MIN_QUERY_LEN},
    counter::SearchCounter,
    tmdb::{SearchMode, TmdbApi},
};

use super::{
    config::{COUNTER_ENDPOINT_ENV, Config},
    output,
};

/// Search movies and shows
#[tracing::instrument(skip(config, cancel))]
pub async fn search<T: TmdbApi, C: SearchCounter>(
    config: &Config<T, C>,
    query: &str,
    mode: SearchMode,
    pages: usize,
    cancel: &CancellationToken,
) -> Result<()> {
    print!("{}", render_search(config, query, mode, pages, cancel).await?);
    Ok(())
}

async fn render_search<T: TmdbApi, C: SearchCounter>(
    config: &Config<T, C>,
    query: &str,
    mode: SearchMode,
    pages: usize,
    cancel: &CancellationToken,
) -> Result<String> {
    if query.trim().chars().count() < MIN_QUERY_LEN {
        return Ok(format!("Type at least {} characters to search.\n", MIN_QUERY_LEN));
    }

    let listing = application::search(&config.tmdb, mode, query, pages, cancel).await?;
    if listing.is_empty() {
        return Ok(format!("No results found for \"{}\".\n", query.trim()));
    }

    if let Some(counter) = &config.counter {
        application::record_search(counter, &config.images, query, &listing, cancel).await?;
    }

    let title = format!("Results for \"{}\"", query.trim());
    Ok(output::listing(&title, &listing))
}

/// Show the most searched queries
#[tracing::instrument(skip(config, cancel))]
pub async fn top_searches<T: TmdbApi, C: SearchCounter>(
    config: &Config<T, C>,
    limit: u32,
    cancel: &CancellationToken,
) -> Result<()> {
    print!("{}", render_top_searches(config, limit, cancel).await?);
    Ok(())
}

async fn render_top_searches<T: TmdbApi, C: SearchCounter>(
    config: &Config<T, C>,
    limit: u32,
    cancel: &CancellationToken,
) -> Result<String> {
    let Some(counter) = &config.counter else {
        bail!(
            "Searches are not counted. Set {} and the project, database and collection IDs.",
            COUNTER_ENDPOINT_ENV
        );
    };

    let records = application::top_searches(counter, limit, cancel).await?;
    if records.is_empty() {
        return Ok("No searches counted yet.\n".to_string());
    }
    Ok(output::top_searches(&records))
}
