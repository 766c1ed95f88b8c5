//! Text search across movies and shows.

use anyhow::Result;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::pagination::Paginator;
use crate::tmdb::{SearchMode, TmdbApi};

use super::Listing;

/// Shorter queries are not sent.
pub const MIN_QUERY_LEN: usize = 3;

/// Searches with the trimmed `query`, loading up to `max_pages` pages.
///
/// A query under [`MIN_QUERY_LEN`] characters yields an empty listing
/// without any request.
#[tracing::instrument(skip(api, cancel))]
pub async fn search<A: TmdbApi>(
    api: &A,
    mode: SearchMode,
    query: &str,
    max_pages: usize,
    cancel: &CancellationToken,
) -> Result<Listing> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        debug!("Query {:?} too short, skipping search", query);
        return Ok(Listing::empty());
    }

    let mut paginator = Paginator::new(|page| api.search(mode, query, page, cancel));
    paginator.fetch_pages(max_pages).await?;

    let listing = Listing::from_paginator(paginator);
    debug!(
        "Search {:?} returned {} item(s) over {} page(s)",
        query,
        listing.items.len(),
        listing.pages_loaded
    );
    Ok(listing)
}
