//! CLI command handlers.
//!
//! Handlers run one use case and print its result as plain text.

mod browse;
pub mod config;
mod detail;
pub mod output;
mod search;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use browse::{discover, genres, home, movies, trending, tv};
pub use config::{
    COUNTER_COLLECTION_ENV, COUNTER_DATABASE_ENV, COUNTER_ENDPOINT_ENV, COUNTER_KEY_ENV,
    COUNTER_PROJECT_ENV, Config, Settings, TOKEN_ENV,
};
pub use detail::{movie, season, show};
pub use search::{search, top_searches};

/// Exit code used when interrupted with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Cancels the returned token on Ctrl-C.
///
/// Abort the returned handle once the command has finished.
pub fn cancel_on_ctrl_c() -> (CancellationToken, JoinHandle<()>) {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let ctrl_c_handler = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, cancelling...");
            token.cancel();
        }
    });

    (cancel, ctrl_c_handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_on_ctrl_c_starts_uncancelled() {
        let (cancel, ctrl_c_handler) = cancel_on_ctrl_c();

        assert!(!cancel.is_cancelled());

        ctrl_c_handler.abort();
        assert!(ctrl_c_handler.await.unwrap_err().is_cancelled());
        assert!(!cancel.is_cancelled());
    }
}
