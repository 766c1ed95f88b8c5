use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;

use crate::{
    counter::{Appwrite, CounterConfig, SearchCounter},
    http::{ApiClient, ApiConfig, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_RETRIES, RetryPolicy},
    runtime::Runtime,
    tmdb::{DEFAULT_API_URL, ImageUrls, Tmdb, TmdbApi},
};

/// Environment variable holding the API read access token.
pub const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Search counter backend. Counting is off unless the endpoint is set.
pub const COUNTER_ENDPOINT_ENV: &str = "APPWRITE_ENDPOINT";
pub const COUNTER_PROJECT_ENV: &str = "APPWRITE_PROJECT_ID";
pub const COUNTER_DATABASE_ENV: &str = "APPWRITE_DATABASE_ID";
pub const COUNTER_COLLECTION_ENV: &str = "APPWRITE_COLLECTION_ID";
pub const COUNTER_KEY_ENV: &str = "APPWRITE_API_KEY";

/// Options given on the command line (or through their environment
/// variables).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Option<String>,
    pub image_url: Option<String>,
    pub retries: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            image_url: None,
            retries: DEFAULT_MAX_RETRIES,
        }
    }
}

pub struct Config<T: TmdbApi, C: SearchCounter = Appwrite> {
    pub tmdb: T,
    pub images: ImageUrls,
    /// `None` when no counter backend is configured.
    pub counter: Option<C>,
}

impl Config<Tmdb, Appwrite> {
    pub fn new<R: Runtime>(runtime: &R, settings: &Settings) -> Result<Self> {
        let token = runtime.env_var(TOKEN_ENV).with_context(|| {
            format!(
                "{} is not set. Create an API read access token in your TMDB account settings.",
                TOKEN_ENV
            )
        })?;
        debug!("Using {} for authentication: {}", TOKEN_ENV, mask_token(&token));

        let api_url = settings.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        debug!("Using API at {} with {} retries", api_url, settings.retries);

        let retry = RetryPolicy::new(
            settings.retries,
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        );
        let api_config = ApiConfig::new(api_url)
            .bearer_token(&token)
            .context("Invalid API token")?
            .retry(retry);

        let client = ApiClient::new(api_config)?;
        let images = match &settings.image_url {
            Some(url) => ImageUrls::new(url.as_str()),
            None => ImageUrls::default(),
        };

        let counter = match counter_config(runtime)? {
            Some(counter) => {
                debug!(
                    "Counting searches in {} at {}",
                    counter.collection_id, counter.endpoint
                );
                Some(Appwrite::new(&counter, retry)?)
            }
            None => {
                debug!("{} not set, searches are not counted", COUNTER_ENDPOINT_ENV);
                None
            }
        };

        Ok(Self {
            tmdb: Tmdb::new(client),
            images,
            counter,
        })
    }
}

/// Reads the counter backend from the environment. Once the endpoint is set
/// the project, database and collection are required too.
fn counter_config<R: Runtime>(runtime: &R) -> Result<Option<CounterConfig>> {
    let endpoint = match runtime.env_var(COUNTER_ENDPOINT_ENV) {
        Ok(endpoint) if !endpoint.trim().is_empty() => endpoint,
        _ => return Ok(None),
    };

    let required = |key: &str| {
        runtime
            .env_var(key)
            .with_context(|| format!("{} is set but {} is not", COUNTER_ENDPOINT_ENV, key))
    };

    let api_key = runtime.env_var(COUNTER_KEY_ENV).ok();
    if let Some(key) = &api_key {
        debug!("Using {}: {}", COUNTER_KEY_ENV, mask_token(key));
    }

    Ok(Some(CounterConfig {
        endpoint,
        project_id: required(COUNTER_PROJECT_ENV)?,
        database_id: required(COUNTER_DATABASE_ENV)?,
        collection_id: required(COUNTER_COLLECTION_ENV)?,
        api_key,
    }))
}

/// Keeps the first and last four characters of long tokens.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::tmdb::MediaKind;
    use mockito::{Matcher, Server};
    use std::collections::HashMap;
    use tokio_util::sync::CancellationToken;

    fn runtime_with(vars: &[(&str, &str)]) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        runtime
            .expect_env_var()
            .returning(move |key| vars.get(key).cloned().ok_or(std::env::VarError::NotPresent));

        runtime
    }

    fn runtime_with_token(token: Option<&str>) -> MockRuntime {
        match token {
            Some(token) => runtime_with(&[(TOKEN_ENV, token)]),
            None => runtime_with(&[]),
        }
    }

    #[tokio::test]
    async fn test_config_sends_bearer_token() {
        // --- Setup ---

        let runtime = runtime_with_token(Some("test_token_0123456789"));
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/genre/tv/list")
            .match_header(
                "Authorization",
                Matcher::Exact("Bearer test_token_0123456789".to_string()),
            )
            .with_status(200)
            .with_body(r#"{"genres": [{"id": 18, "name": "Drama"}]}"#)
            .create_async()
            .await;

        // --- Execute ---

        let settings = Settings {
            api_url: Some(server.url()),
            ..Default::default()
        };
        let config = Config::new(&runtime, &settings).unwrap();
        let genres = config
            .tmdb
            .genres(MediaKind::Tv, &CancellationToken::new())
            .await
            .unwrap();

        // --- Verify ---

        mock.assert_async().await;
        assert_eq!(genres[0].name, "Drama");
    }

    #[test]
    fn test_config_requires_token() {
        let runtime = runtime_with_token(None);

        let err = Config::new(&runtime, &Settings::default())
            .err()
            .unwrap();

        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn test_config_defaults() {
        let runtime = runtime_with_token(Some("abc"));

        let config = Config::new(&runtime, &Settings::default()).unwrap();

        assert_eq!(config.tmdb.client().base_url(), DEFAULT_API_URL);
        assert_eq!(config.tmdb.client().retry_policy().max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.images, ImageUrls::default());
        assert!(config.counter.is_none());
    }

    #[test]
    fn test_config_with_search_counter() {
        let runtime = runtime_with(&[
            (TOKEN_ENV, "abc"),
            (COUNTER_ENDPOINT_ENV, "http://localhost:8081/v1"),
            (COUNTER_PROJECT_ENV, "cinedex"),
            (COUNTER_DATABASE_ENV, "movies"),
            (COUNTER_COLLECTION_ENV, "searches"),
        ]);
        let settings = Settings {
            retries: 1,
            ..Default::default()
        };

        let config = Config::new(&runtime, &settings).unwrap();

        let counter = config.counter.unwrap();
        assert_eq!(counter.client().base_url(), "http://localhost:8081/v1");
        assert_eq!(counter.client().retry_policy().max_retries, 1);
    }

    #[test]
    fn test_config_counter_requires_collection() {
        let runtime = runtime_with(&[
            (TOKEN_ENV, "abc"),
            (COUNTER_ENDPOINT_ENV, "http://localhost:8081/v1"),
            (COUNTER_PROJECT_ENV, "cinedex"),
            (COUNTER_DATABASE_ENV, "movies"),
        ]);

        let err = Config::new(&runtime, &Settings::default()).err().unwrap();

        assert!(err.to_string().contains(COUNTER_COLLECTION_ENV));
    }

    #[test]
    fn test_config_blank_counter_endpoint_disables_counting() {
        let runtime = runtime_with(&[(TOKEN_ENV, "abc"), (COUNTER_ENDPOINT_ENV, "  ")]);

        let config = Config::new(&runtime, &Settings::default()).unwrap();

        assert!(config.counter.is_none());
    }

    #[tokio::test]
    async fn test_config_counter_sends_project_and_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/databases/movies/collections/searches/documents")
            .match_query(Matcher::Any)
            .match_header("x-appwrite-project", "cinedex")
            .match_header("x-appwrite-key", "server-key")
            .with_status(200)
            .with_body(r#"{"total": 0, "documents": []}"#)
            .create_async()
            .await;

        let url = server.url();
        let runtime = runtime_with(&[
            (TOKEN_ENV, "abc"),
            (COUNTER_ENDPOINT_ENV, url.as_str()),
            (COUNTER_PROJECT_ENV, "cinedex"),
            (COUNTER_DATABASE_ENV, "movies"),
            (COUNTER_COLLECTION_ENV, "searches"),
            (COUNTER_KEY_ENV, "server-key"),
        ]);

        let config = Config::new(&runtime, &Settings::default()).unwrap();
        let records = config
            .counter
            .unwrap()
            .top_searches(5, &CancellationToken::new())
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(records.is_empty());
    }

    #[test]
    fn test_config_overrides() {
        let runtime = runtime_with_token(Some("abc"));
        let settings = Settings {
            api_url: Some("http://localhost:9999/3/".to_string()),
            image_url: Some("http://cdn.local/t/p".to_string()),
            retries: 0,
        };

        let config = Config::new(&runtime, &settings).unwrap();

        assert_eq!(config.tmdb.client().base_url(), "http://localhost:9999/3");
        assert_eq!(config.tmdb.client().retry_policy().max_retries, 0);
        assert_eq!(config.images.base_url(), "http://cdn.local/t/p");
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9xyz1"), "eyJh*********xyz1");
        assert_eq!(mask_token("short"), "*********");
    }
}
