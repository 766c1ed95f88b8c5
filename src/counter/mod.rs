//! Search counter kept in a document database.
//!
//! Each searched query is one document holding a running count and the title
//! the query led to the first time. The most counted queries are the
//! "trending searches".

mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::http::{ApiClient, ApiConfig, Body, RequestOptions, RetryPolicy};

pub use types::{DocumentList, SearchHit, SearchRecord};

const PROJECT_HEADER: &str = "x-appwrite-project";
const KEY_HEADER: &str = "x-appwrite-key";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchCounter: Send + Sync {
    /// Adds one to the count of `query`, creating its record on first use.
    async fn record_search(
        &self,
        query: &str,
        hit: &SearchHit,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// The most searched queries, highest count first.
    async fn top_searches(
        &self,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchRecord>>;
}

/// Where the counter documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: Option<String>,
}

/// [`SearchCounter`] over the Appwrite databases REST API.
#[derive(Debug, Clone)]
pub struct Appwrite {
    client: ApiClient,
    documents_path: String,
}

impl Appwrite {
    pub fn new(config: &CounterConfig, retry: RetryPolicy) -> Result<Self> {
        let project = HeaderValue::from_str(&config.project_id)
            .context("Project ID contains characters not allowed in a header")?;
        let mut api_config = ApiConfig::new(config.endpoint.as_str())
            .header(HeaderName::from_static(PROJECT_HEADER), project)
            .retry(retry);

        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key)
                .context("API key contains characters not allowed in a header")?;
            value.set_sensitive(true);
            api_config = api_config.header(HeaderName::from_static(KEY_HEADER), value);
        }

        Ok(Self {
            client: ApiClient::new(api_config)?,
            documents_path: format!(
                "/databases/{}/collections/{}/documents",
                config.database_id, config.collection_id
            ),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn find(&self, query: &str, cancel: &CancellationToken) -> Result<Option<SearchRecord>> {
        let equal = json!({"method": "equal", "attribute": "query", "values": [query]});
        let options = RequestOptions::new()
            .param("queries[0]", equal.to_string())
            .cancel(cancel.clone());

        let list: DocumentList<SearchRecord> = self
            .client
            .get(&self.documents_path, options)
            .await
            .context("Failed to look up search count")?;
        Ok(list.documents.into_iter().next())
    }
}

#[async_trait]
impl SearchCounter for Appwrite {
    #[tracing::instrument(skip(self, hit, cancel))]
    async fn record_search(
        &self,
        query: &str,
        hit: &SearchHit,
        cancel: &CancellationToken,
    ) -> Result<()> {
        match self.find(query, cancel).await? {
            Some(record) => {
                debug!("Search {:?} counted {} time(s) so far", query, record.count);
                let options = RequestOptions::new()
                    .body(Body::Json(json!({"data": {"count": record.count + 1}})))
                    .cancel(cancel.clone());
                let _: SearchRecord = self
                    .client
                    .patch(&format!("{}/{}", self.documents_path, record.id), options)
                    .await
                    .context("Failed to update search count")?;
            }
            None => {
                debug!("First search for {:?}", query);
                let options = RequestOptions::new()
                    .body(Body::Json(json!({
                        "documentId": "unique()",
                        "data": {
                            "query": query,
                            "movie_id": hit.movie_id,
                            "title": hit.title,
                            "count": 1,
                            "poster_url": hit.poster_url,
                        }
                    })))
                    .cancel(cancel.clone());
                let _: SearchRecord = self
                    .client
                    .post(&self.documents_path, options)
                    .await
                    .context("Failed to create search count")?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, cancel))]
    async fn top_searches(
        &self,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchRecord>> {
        let options = RequestOptions::new()
            .param("queries[0]", json!({"method": "limit", "values": [limit]}).to_string())
            .param(
                "queries[1]",
                json!({"method": "orderDesc", "attribute": "count"}).to_string(),
            )
            .cancel(cancel.clone());

        let list: DocumentList<SearchRecord> = self
            .client
            .get(&self.documents_path, options)
            .await
            .context("Failed to load trending searches")?;
        debug!("Loaded {} of {} search record(s)", list.documents.len(), list.total);
        Ok(list.documents)
    }
}
