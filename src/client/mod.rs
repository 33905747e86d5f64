//! HTTP client for the directory endpoint and the search orchestration built
//! on top of it.

mod search;

pub use search::*;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ADVOCATES_ENDPOINT;
use crate::db::Advocate;
use crate::search::{SortDirection, SortField};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to fetch advocates")]
    FetchFailed,
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Parameters for a directory request. Absent or empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub order_by: Option<SortField>,
    pub sort: Option<SortDirection>,
}

impl SearchParams {
    /// Build request parameters from the search box text and the table's
    /// sort state. The query is only sent when it has non-blank content;
    /// ordering is only sent when both field and direction are set.
    pub fn from_input(query: &str, sort: &SortState) -> Self {
        let q = (!query.trim().is_empty()).then(|| query.to_string());
        let (order_by, sort) = match (sort.field, sort.direction) {
            (Some(field), Some(direction)) => (Some(field), Some(direction)),
            _ => (None, None),
        };
        Self { q, order_by, sort }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(field) = self.order_by {
            pairs.push(("orderBy", field.to_string()));
        }
        if let Some(direction) = self.sort {
            pairs.push(("sort", direction.to_string()));
        }
        pairs
    }
}

/// Something that can answer directory requests.
#[async_trait]
pub trait AdvocateSource: Send + Sync {
    async fn get_advocates(&self, params: &SearchParams) -> Result<Vec<Advocate>, ClientError>;
}

pub struct AdvocateClient {
    base_url: Url,
    client: Client,
}

impl AdvocateClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, params: &SearchParams) -> Result<Url, ClientError> {
        let mut url = self.base_url.join(ADVOCATES_ENDPOINT)?;
        let pairs = params.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

#[async_trait]
impl AdvocateSource for AdvocateClient {
    async fn get_advocates(&self, params: &SearchParams) -> Result<Vec<Advocate>, ClientError> {
        let url = self.build_url(params)?;
        debug!(%url, "fetching advocates");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Failed to fetch advocates: {e}");
            ClientError::FetchFailed
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Failed to fetch advocates");
            return Err(ClientError::FetchFailed);
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Failed to fetch advocates: invalid body: {e}");
            ClientError::FetchFailed
        })?;

        match body.get("data").filter(|d| d.is_array()) {
            Some(data) => serde_json::from_value(data.clone()).map_err(|e| {
                error!("Failed to fetch advocates: invalid record: {e}");
                ClientError::FetchFailed
            }),
            None => {
                warn!(%body, "Unexpected response structure");
                Ok(Vec::new())
            }
        }
    }
}
