//! Application layer - Use cases that coordinate API calls.
//!
//! Each use case is written against the [`TmdbApi`](crate::tmdb::TmdbApi)
//! and [`SearchCounter`](crate::counter::SearchCounter) traits so the CLI
//! layer stays thin and the orchestration can be tested with mocks.

mod catalog;
mod detail;
mod home;
mod search;
mod searches;

pub use catalog::{Listing, discover, movie_list, trending, tv_list};
pub use detail::{MovieDetail, ShowDetail, featured_trailer, movie_detail, season, show_detail};
pub use home::{HomeFeed, load_home_feed};
pub use search::{MIN_QUERY_LEN, search};
pub use searches::{TOP_SEARCHES_LIMIT, record_search, top_searches, top_searches_or_empty};
