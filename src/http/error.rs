//! Typed errors raised by the request wrapper.

use std::fmt;

/// Body of a failed response, parsed on a best-effort basis.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The body parsed as JSON.
    Json(serde_json::Value),
    /// The body was not valid JSON (including an empty body).
    Text(String),
}

impl ErrorBody {
    /// Parses `raw` as JSON, falling back to the raw text.
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(raw),
        }
    }

    /// TMDB puts a human readable reason in `status_message`.
    pub fn status_message(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(value) => value.get("status_message").and_then(|v| v.as_str()),
            ErrorBody::Text(_) => None,
        }
    }
}

/// A non-2xx HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub status_text: String,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: u16, status_text: impl Into<String>, body: ErrorBody) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// 4xx responses will not succeed on a retry.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error: {} {}", self.status, self.status_text)?;
        if let Some(message) = self.body.status_message() {
            write!(f, " ({})", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// The request was abandoned through its cancellation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request cancelled")
    }
}

impl std::error::Error for Cancelled {}
