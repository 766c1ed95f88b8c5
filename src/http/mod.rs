//! HTTP client module with typed errors and retry logic.

mod client;
mod error;
mod params;
mod retry;

pub use client::{ApiClient, ApiConfig, BeforeRequest, Interceptors, OnError, RequestOptions};
pub use error::{ApiError, Cancelled, ErrorBody};
pub use params::{Body, ParamValue, QueryParams};
pub use retry::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_RETRIES, RetryPolicy, is_retryable, with_retry,
};
