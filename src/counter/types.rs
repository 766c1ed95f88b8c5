use serde::{Deserialize, Serialize};

/// How often a query was searched, with the title it led to the first time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SearchRecord {
    #[serde(rename = "$id")]
    pub id: String,
    pub query: String,
    pub movie_id: u64,
    pub title: String,
    pub count: u64,
    pub poster_url: Option<String>,
}

/// The top result of a search, stored when a query is counted for the
/// first time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchHit {
    pub movie_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
}

/// A document listing as returned by the backend.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentList<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}
