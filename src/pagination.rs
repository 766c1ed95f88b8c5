//! Page-based list responses and incremental fetching.
//!
//! Every list endpoint answers with `{ page, results, total_pages,
//! total_results }`. There is a next page while `page < total_pages`, and it
//! is fetched by asking the same endpoint for `page + 1`.

use std::future::Future;

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

/// Page numbers start at 1.
pub const FIRST_PAGE: u32 = 1;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> Page<T> {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    /// The page to request next, if any.
    pub fn next_page(&self) -> Option<u32> {
        if self.has_next_page() {
            Some(self.page + 1)
        } else {
            None
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }

    /// Drops results for which `f` returns `None`; page counters are kept
    /// as reported upstream.
    pub fn filter_map<U, F: FnMut(T) -> Option<U>>(self, f: F) -> Page<U> {
        Page {
            page: self.page,
            results: self.results.into_iter().filter_map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

/// Accumulates pages of one list, fetching them one at a time.
///
/// Results are concatenated in page order. Nothing is deduplicated: if the
/// upstream list shifts between fetches, items may repeat or go missing.
pub struct Paginator<T, F> {
    fetch: F,
    pages: Vec<Page<T>>,
}

impl<T, F, Fut> Paginator<T, F>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    /// `fetch` is called with the page number to load.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            pages: Vec::new(),
        }
    }

    /// The page `fetch_next_page` would request, or `None` once exhausted.
    pub fn next_page_param(&self) -> Option<u32> {
        match self.pages.last() {
            None => Some(FIRST_PAGE),
            Some(last) => last.next_page(),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_param().is_some()
    }

    /// Fetches the next page. Returns `false` without making a request when
    /// there is no next page. A failed fetch leaves the paginator unchanged.
    pub async fn fetch_next_page(&mut self) -> Result<bool> {
        let Some(page) = self.next_page_param() else {
            return Ok(false);
        };

        debug!("Fetching page {}...", page);
        let fetched = (self.fetch)(page).await?;
        debug!(
            "Got page {}/{} with {} result(s)",
            fetched.page,
            fetched.total_pages,
            fetched.results.len()
        );

        self.pages.push(fetched);
        Ok(true)
    }

    /// Fetches until `max_pages` pages are loaded or the list is exhausted.
    /// Returns the number of pages fetched by this call.
    pub async fn fetch_pages(&mut self, max_pages: usize) -> Result<usize> {
        let mut fetched = 0;
        while self.pages.len() < max_pages && self.fetch_next_page().await? {
            fetched += 1;
        }
        Ok(fetched)
    }
}

impl<T, F> Paginator<T, F> {
    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|p| p.results.iter())
    }

    /// Upstream total as reported by the most recent page.
    pub fn total_results(&self) -> Option<u32> {
        self.pages.last().map(|p| p.total_results)
    }

    pub fn into_items(self) -> Vec<T> {
        self.pages.into_iter().flat_map(|p| p.results).collect()
    }
}
