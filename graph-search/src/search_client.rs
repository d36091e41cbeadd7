use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use reqwest::header;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use typeahead::{normalize, CancellationToken, FetchError, SuggestionFetcher, SuggestionItem};

use crate::models::{
    GraphErrorInfo, GraphSearchRequest, GraphSearchResponse, MergedHits, DEFAULT_ENTITY_TYPES,
};

pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const SEARCH_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
const SEARCH_CACHE_CAPACITY: u64 = 256;

#[derive(Clone)]
pub struct GraphSearchClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    entity_types: Vec<String>,
    surface_errors: bool,
    cache: Cache<String, GraphSearchResponse>,
}

impl GraphSearchClient {
    pub fn new(base_url: &str) -> Result<Self, GraphError> {
        let base_url = base_url.trim().trim_end_matches('/');
        reqwest::Url::parse(base_url)
            .map_err(|e| GraphError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_owned(),
            access_token: None,
            entity_types: DEFAULT_ENTITY_TYPES.iter().map(|t| t.to_string()).collect(),
            surface_errors: false,
            cache: Cache::builder()
                .max_capacity(SEARCH_CACHE_CAPACITY)
                .time_to_live(SEARCH_CACHE_TTL)
                .build(),
        })
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = (!token.trim().is_empty()).then_some(token);
        self
    }

    /// Entity types queried for suggestions. An empty list keeps the defaults.
    pub fn with_entity_types(mut self, entity_types: Vec<String>) -> Self {
        if !entity_types.is_empty() {
            self.entity_types = entity_types;
        }
        self
    }

    pub fn surfacing_errors(mut self, surface_errors: bool) -> Self {
        self.surface_errors = surface_errors;
        self
    }

    pub fn entity_types(&self) -> &[String] {
        &self.entity_types
    }

    async fn post_search(&self, body: &Value) -> Result<Value, GraphError> {
        let mut request = self
            .http
            .post(format!("{}/search/query", self.base_url))
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| GraphError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<Value>().await.ok();
            return Err(GraphError::Api {
                status: status.as_u16(),
                info: GraphErrorInfo::from_response(status.as_u16(), body.as_ref()),
            });
        }

        resp.json::<Value>().await.map_err(|e| {
            GraphError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// Prefix query across the configured entity types. Every failure is
    /// reported.
    #[instrument(skip(self))]
    pub async fn fetch_suggestions(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, GraphError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(vec![]);
        }

        let request = GraphSearchRequest::new(format!("{}*", term), self.entity_types.clone())
            .with_size(u32::try_from(limit).unwrap_or(u32::MAX));
        let body = self.post_search(&request.to_body()).await?;

        let merged = MergedHits::from_body(body);
        tracing::debug!(hits = merged.hits.len(), "Graph hits found");

        let mut items = normalize::normalize_hits(&merged.hits);
        items.truncate(limit);
        Ok(items)
    }

    /// Full search. Results are cached per request for ten minutes.
    #[instrument(skip(self, request), fields(query = %request.query))]
    pub async fn search(
        &self,
        request: &GraphSearchRequest,
    ) -> Result<GraphSearchResponse, GraphError> {
        let cache_key = request.cache_key();
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Returning cached Graph result");
            return Ok(cached);
        }

        let body = self.post_search(&request.to_body()).await?;
        let response = GraphSearchResponse::from(MergedHits::from_body(body));
        tracing::debug!(
            total_items = response.total_items,
            items = response.items.len(),
            "Graph search completed"
        );

        self.cache.insert(cache_key, response.clone());
        Ok(response)
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl SuggestionFetcher for GraphSearchClient {
    async fn fetch(
        &self,
        term: &str,
        cancel: &CancellationToken,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = self.fetch_suggestions(term, limit) => result,
        };

        match result {
            Ok(items) => Ok(items),
            Err(e) if self.surface_errors => Err(e.into()),
            Err(e) => {
                tracing::warn!("Graph suggestions unavailable, showing none: {}", e);
                Ok(vec![])
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid Graph base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Graph API error {status}: {}", .info.message)]
    Api { status: u16, info: GraphErrorInfo },
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

impl GraphError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GraphError::Api { info, .. } => info.is_retryable,
            GraphError::ResponseError(_) => true,
            _ => false,
        }
    }
}

impl From<GraphError> for FetchError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Api { ref info, .. } if info.is_auth_failure() => FetchError::Unauthorized,
            GraphError::ParsingError(msg) => FetchError::Parsing(msg),
            other => FetchError::Transport(other.to_string()),
        }
    }
}
