//! Trending searches - which queries people run most.

use anyhow::Result;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::counter::{SearchCounter, SearchHit, SearchRecord};
use crate::http::Cancelled;
use crate::tmdb::{ImageSize, ImageUrls};

use super::Listing;

/// How many trending searches the home feed shows.
pub const TOP_SEARCHES_LIMIT: u32 = 5;

/// Counts `query` once it has produced results, remembering its top result.
///
/// Counting is secondary to the search itself: failures are logged and
/// reported as `false`, unless the request was cancelled.
#[tracing::instrument(skip(counter, images, listing, cancel))]
pub async fn record_search<C: SearchCounter>(
    counter: &C,
    images: &ImageUrls,
    query: &str,
    listing: &Listing,
    cancel: &CancellationToken,
) -> Result<bool> {
    let query = query.trim();
    let Some(top) = listing.items.first() else {
        debug!("No results for {:?}, not counting it", query);
        return Ok(false);
    };
    if query.is_empty() {
        return Ok(false);
    }

    let hit = SearchHit {
        movie_id: top.id(),
        title: top.title().to_string(),
        poster_url: images.url(top.poster_path(), ImageSize::Original),
    };

    match counter.record_search(query, &hit, cancel).await {
        Ok(()) => Ok(true),
        Err(e) if e.downcast_ref::<Cancelled>().is_some() => Err(e),
        Err(e) => {
            warn!("Failed to count search {:?}: {:#}", query, e);
            Ok(false)
        }
    }
}

#[tracing::instrument(skip(counter, cancel))]
pub async fn top_searches<C: SearchCounter>(
    counter: &C,
    limit: u32,
    cancel: &CancellationToken,
) -> Result<Vec<SearchRecord>> {
    let records = counter.top_searches(limit, cancel).await?;
    debug!("Loaded {} trending search(es)", records.len());
    Ok(records)
}

/// Like [`top_searches`], but a failure yields an empty list unless the
/// request was cancelled.
pub async fn top_searches_or_empty<C: SearchCounter>(
    counter: &C,
    limit: u32,
    cancel: &CancellationToken,
) -> Result<Vec<SearchRecord>> {
    match top_searches(counter, limit, cancel).await {
        Ok(records) => Ok(records),
        Err(e) if e.downcast_ref::<Cancelled>().is_some() => Err(e),
        Err(e) => {
            warn!("Failed to load trending searches: {:#}", e);
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MockSearchCounter;
    use crate::http::{ApiError, ErrorBody};
    use crate::tmdb::{Content, Movie, TvShow};

    fn listing(items: Vec<Content>) -> Listing {
        Listing {
            total_results: Some(items.len() as u32),
            items,
            pages_loaded: 1,
            has_more: false,
        }
    }

    fn matrix() -> Content {
        Content::Movie(Movie {
            id: 603,
            title: "The Matrix".to_string(),
            poster_path: Some("/matrix.jpg".to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_record_search_uses_top_result() {
        let mut counter = MockSearchCounter::new();
        counter
            .expect_record_search()
            .times(1)
            .returning(|query, hit, _| {
                assert_eq!(query, "matrix");
                assert_eq!(hit.movie_id, 603);
                assert_eq!(hit.title, "The Matrix");
                assert_eq!(
                    hit.poster_url.as_deref(),
                    Some("http://cdn.local/original/matrix.jpg")
                );
                Ok(())
            });

        let second = Content::Tv(TvShow {
            id: 1,
            name: "Matrix Show".to_string(),
            ..Default::default()
        });
        let recorded = record_search(
            &counter,
            &ImageUrls::new("http://cdn.local"),
            " matrix ",
            &listing(vec![matrix(), second]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(recorded);
    }

    #[tokio::test]
    async fn test_record_search_skips_empty_results() {
        let mut counter = MockSearchCounter::new();
        counter.expect_record_search().times(0);

        let recorded = record_search(
            &counter,
            &ImageUrls::default(),
            "zzzqqq",
            &Listing::empty(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(!recorded);
    }

    #[tokio::test]
    async fn test_record_search_failure_is_not_fatal() {
        let mut counter = MockSearchCounter::new();
        counter.expect_record_search().returning(|_, _, _| {
            Err(ApiError::new(503, "Service Unavailable", ErrorBody::Text(String::new())).into())
        });

        let recorded = record_search(
            &counter,
            &ImageUrls::default(),
            "matrix",
            &listing(vec![matrix()]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(!recorded);
    }

    #[tokio::test]
    async fn test_record_search_cancelled_propagates() {
        let mut counter = MockSearchCounter::new();
        counter
            .expect_record_search()
            .returning(|_, _, _| Err(Cancelled.into()));

        let err = record_search(
            &counter,
            &ImageUrls::default(),
            "matrix",
            &listing(vec![matrix()]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<Cancelled>().is_some());
    }

    #[tokio::test]
    async fn test_top_searches_propagates_errors() {
        let mut counter = MockSearchCounter::new();
        counter
            .expect_top_searches()
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

        let result = top_searches(&counter, 5, &CancellationToken::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_top_searches_or_empty() {
        let mut counter = MockSearchCounter::new();
        counter
            .expect_top_searches()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

        let records = top_searches_or_empty(&counter, TOP_SEARCHES_LIMIT, &CancellationToken::new())
            .await
            .unwrap();
        assert!(records.is_empty());

        let mut counter = MockSearchCounter::new();
        counter.expect_top_searches().returning(|limit, _| {
            assert_eq!(limit, TOP_SEARCHES_LIMIT);
            Ok(vec![SearchRecord {
                query: "dune".to_string(),
                count: 2,
                ..Default::default()
            }])
        });

        let records = top_searches_or_empty(&counter, TOP_SEARCHES_LIMIT, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(records[0].query, "dune");
    }
}
