//! REST client with typed requests, typed errors and built-in retry logic.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hyper::ext::ReasonPhrase;
use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::error::{ApiError, ErrorBody};
use super::params::{Body, ParamValue, QueryParams};
use super::retry::{RetryPolicy, with_retry};

/// Rewrites request options before they are sent.
pub type BeforeRequest = Arc<dyn Fn(RequestOptions) -> RequestOptions + Send + Sync>;

/// Receives the final error once retries are exhausted; the returned error
/// is what the caller sees.
pub type OnError = Arc<dyn Fn(anyhow::Error) -> anyhow::Error + Send + Sync>;

#[derive(Clone, Default)]
pub struct Interceptors {
    pub before_request: Option<BeforeRequest>,
    pub on_error: Option<OnError>,
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors")
            .field("before_request", &self.before_request.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Everything needed to construct an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub headers: HeaderMap,
    pub retry: RetryPolicy,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub interceptors: Interceptors,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: HeaderMap::new(),
            retry: RetryPolicy::default(),
            user_agent: concat!("cinedex/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Some(Duration::from_secs(30)),
            interceptors: Interceptors::default(),
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds `Authorization: Bearer <token>`, marked sensitive.
    pub fn bearer_token(mut self, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("API token contains characters not allowed in a header")?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn before_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(RequestOptions) -> RequestOptions + Send + Sync + 'static,
    {
        self.interceptors.before_request = Some(Arc::new(hook));
        self
    }

    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(anyhow::Error) -> anyhow::Error + Send + Sync + 'static,
    {
        self.interceptors.on_error = Some(Arc::new(hook));
        self
    }
}

/// Per-call options. Defaults to a GET with no parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub params: QueryParams,
    pub body: Option<Body>,
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// HTTP client for one base URL and credential pair.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
    retry: RetryPolicy,
    interceptors: Interceptors,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client from the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let base_url = config
            .base_url
            .strip_suffix('/')
            .unwrap_or(&config.base_url)
            .to_string();

        Ok(Self {
            client,
            base_url,
            default_headers: config.headers,
            retry: config.retry,
            interceptors: config.interceptors,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Joins the endpoint onto the base URL and appends parameters in
    /// insertion order.
    pub fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url> {
        let url = if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        };

        let mut url = Url::parse(&url).with_context(|| format!("Invalid request URL: {}", url))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, &value.to_string());
            }
        }

        Ok(url)
    }

    /// Default headers overridden by per-call headers, plus the JSON content
    /// type when a JSON body will be sent.
    pub fn build_headers(&self, options: &RequestOptions) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        match &options.body {
            Some(body) if body.is_form() => {
                // reqwest writes the multipart boundary itself
                headers.remove(CONTENT_TYPE);
            }
            Some(_) if options.method != Method::GET => {
                headers
                    .entry(CONTENT_TYPE)
                    .or_insert_with(|| HeaderValue::from_static("application/json"));
            }
            _ => {}
        }

        headers
    }

    /// Performs a request and deserializes the JSON response.
    /// Retries transient failures according to the configured policy.
    #[tracing::instrument(skip(self, options))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let options = match &self.interceptors.before_request {
            Some(hook) => hook(options),
            None => options,
        };

        let url = self.build_url(endpoint, &options.params)?;
        let headers = self.build_headers(&options);
        let method = options.method.clone();
        let body = if method == Method::GET {
            None
        } else {
            options.body.clone()
        };
        let cancel = options.cancel.clone().unwrap_or_default();

        debug!("{} {}...", method, url);

        let operation_name = format!("{} {}", method, endpoint);
        let result = with_retry(&operation_name, &self.retry, &cancel, || {
            self.send_once(method.clone(), url.clone(), headers.clone(), body.clone())
        })
        .await;

        match (result, &self.interceptors.on_error) {
            (Ok(value), _) => Ok(value),
            (Err(e), Some(hook)) => Err(hook(e)),
            (Err(e), None) => Err(e),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T> {
        self.request(endpoint, options.method(Method::GET)).await
    }

    pub async fn post<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T> {
        self.request(endpoint, options.method(Method::POST)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T> {
        self.request(endpoint, options.method(Method::PUT)).await
    }

    pub async fn patch<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T> {
        self.request(endpoint, options.method(Method::PATCH)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T> {
        self.request(endpoint, options.method(Method::DELETE)).await
    }

    /// Single attempt without retry.
    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<Body>,
    ) -> Result<T> {
        let mut request = self.client.request(method, url).headers(headers);

        request = match body {
            Some(Body::Json(value)) => request.body(serde_json::to_vec(&value)?),
            Some(Body::Form(fields)) => request.multipart(Body::to_multipart(&fields)),
            None => request,
        };

        // Transport errors stay unwrapped.
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let status_text = reason_phrase(&response);
            let raw = response.text().await.unwrap_or_default();
            debug!("Request failed with {}: {}", status, raw);
            return Err(ApiError::new(status.as_u16(), status_text, ErrorBody::parse(raw)).into());
        }

        let raw = response.text().await?;
        let raw = if raw.trim().is_empty() { "null" } else { raw.as_str() };

        let value = serde_json::from_str::<T>(raw).context("Failed to parse JSON response")?;
        Ok(value)
    }
}

/// The reason phrase as the server sent it. hyper only keeps phrases that
/// differ from the canonical one, so fall back to that.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}
