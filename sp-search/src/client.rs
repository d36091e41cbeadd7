use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use reqwest::{header, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use typeahead::{normalize, CancellationToken, FetchError, SuggestionFetcher, SuggestionItem};

use crate::{
    domain::{Collection, QueryEnvelope, QueryTextFilter, SearchRequest, SearchResponse, SuggestFilter},
    SearchURL,
};

const VERBOSE_JSON: &str = "application/json;odata=verbose";
const SEARCH_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
const SEARCH_CACHE_CAPACITY: u64 = 256;

/// Managed properties requested for type-ahead rows.
pub const DEFAULT_SELECT_PROPERTIES: [&str; 12] = [
    "Title",
    "Path",
    "Author",
    "LastModifiedTime",
    "FileType",
    "SiteName",
    "SPWebUrl",
    "HitHighlightedSummary",
    "FileName",
    "Name",
    "FileLeafRef",
    "UniqueId",
];

#[derive(Clone)]
pub struct SharePointClient {
    http: reqwest::Client,
    site_url: SearchURL,
    access_token: Option<String>,
    select_properties: Vec<String>,
    surface_errors: bool,
    search_cache: Cache<String, SearchResponse>,
}

impl SharePointClient {
    pub fn new(site_url: &str) -> Result<Self, SharePointError> {
        let site = site_url.trim();
        reqwest::Url::parse(site)
            .map_err(|e| SharePointError::InvalidSiteUrl(format!("{}: {}", site, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            site_url: SearchURL::new(site),
            access_token: None,
            select_properties: DEFAULT_SELECT_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            surface_errors: false,
            search_cache: Cache::builder()
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

    /// Replaces the type-ahead select list. An empty list keeps the defaults.
    pub fn with_select_properties(mut self, properties: Vec<String>) -> Self {
        if !properties.is_empty() {
            self.select_properties = properties;
        }
        self
    }

    /// Report transport failures from [`SuggestionFetcher::fetch`] instead of
    /// answering with an empty list.
    pub fn surfacing_errors(mut self, surface_errors: bool) -> Self {
        self.surface_errors = surface_errors;
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(header::ACCEPT, VERBOSE_JSON);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value, SharePointError> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| SharePointError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SharePointError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SharePointError::Status(status.as_u16()));
        }

        resp.json::<Value>().await.map_err(|e| {
            SharePointError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// Prefix-wildcard type-ahead query. Unlike the [`SuggestionFetcher`] impl
    /// this reports every failure.
    #[instrument(skip(self))]
    pub async fn fetch_suggestions(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, SharePointError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(vec![]);
        }

        let url = self
            .site_url
            .append_path("/_api/search/query")
            .with_filter(&QueryTextFilter::prefix(term, &self.select_properties, limit));
        tracing::debug!(url = url.as_ref(), "SharePoint suggestion query");

        let body = self.send_json(self.http.get(url.as_ref())).await?;
        let envelope = QueryEnvelope::parse(body);
        let shape = envelope.shape;
        let rows = envelope.into_rows();
        tracing::debug!(?shape, rows = rows.len(), "SharePoint rows found");

        let mut items = normalize::normalize_rows(&rows);
        items.truncate(limit);
        Ok(items)
    }

    /// Full search with refiners and paging. Results are cached per request
    /// for fifteen minutes.
    #[instrument(skip(self, request), fields(query = %request.query_text))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SharePointError> {
        let cache_key = request.cache_key();
        if let Some(cached) = self.search_cache.get(&cache_key) {
            tracing::debug!("Returning cached search result");
            return Ok(cached);
        }

        let url = self.site_url.append_path("/_api/search/postquery");
        let request_builder = self
            .http
            .post(url.as_ref())
            .header(header::CONTENT_TYPE, VERBOSE_JSON)
            .json(&request.to_post_body());

        let body = self.send_json(request_builder).await?;
        let response = SearchResponse::from(QueryEnvelope::parse(body));
        tracing::debug!(
            total_rows = response.total_rows,
            items = response.items.len(),
            "Search completed"
        );

        self.search_cache.insert(cache_key, response.clone());
        Ok(response)
    }

    pub fn clear_cache(&self) {
        self.search_cache.invalidate_all();
    }

    /// Query completions from the search service. Failures yield an empty list.
    #[instrument(skip(self))]
    pub async fn suggest(&self, query: &str, count: usize) -> Vec<String> {
        if query.trim().is_empty() {
            return vec![];
        }

        let url = self
            .site_url
            .append_path("/_api/search/suggest")
            .with_filter(&SuggestFilter::new(query, count));

        match self.send_json(self.http.get(url.as_ref())).await {
            Ok(body) => parse_query_suggestions(&body),
            Err(e) => {
                tracing::warn!("Query suggestions unavailable: {}", e);
                vec![]
            }
        }
    }
}

#[async_trait]
impl SuggestionFetcher for SharePointClient {
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
                tracing::warn!("SharePoint suggestions unavailable, showing none: {}", e);
                Ok(vec![])
            }
        }
    }
}

fn parse_query_suggestions(body: &Value) -> Vec<String> {
    ["/d/suggest/Queries", "/d/Suggest/Queries", "/Queries"]
        .iter()
        .find_map(|pointer| body.pointer(pointer))
        .and_then(|queries| serde_json::from_value::<Collection<Value>>(queries.clone()).ok())
        .map(|queries| {
            queries
                .into_vec()
                .iter()
                .filter_map(|q| q.get("Query").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharePointError {
    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Request failed with status {0}")]
    Status(u16),
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

impl From<SharePointError> for FetchError {
    fn from(err: SharePointError) -> Self {
        match err {
            SharePointError::Unauthorized => FetchError::Unauthorized,
            SharePointError::ParsingError(msg) => FetchError::Parsing(msg),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_invalid_site_url() {
        assert!(matches!(
            SharePointClient::new("not a url"),
            Err(SharePointError::InvalidSiteUrl(_))
        ));
        assert!(SharePointClient::new("https://contoso.sharepoint.com/sites/fin/").is_ok());
    }

    #[test]
    fn query_suggestions_from_either_shape() {
        let verbose = json!({ "d": { "suggest": { "Queries": { "results": [
            { "Query": "budget 2024", "IsPersonal": false },
            { "Query": "budget review", "IsPersonal": false }
        ] } } } });
        let legacy = json!({ "d": { "Suggest": { "Queries": [{ "Query": "budget" }] } } });

        assert_eq!(
            parse_query_suggestions(&verbose),
            vec!["budget 2024", "budget review"]
        );
        assert_eq!(parse_query_suggestions(&legacy), vec!["budget"]);
        assert!(parse_query_suggestions(&json!({})).is_empty());
    }

    #[test]
    fn errors_map_to_fetch_errors() {
        assert_eq!(
            FetchError::from(SharePointError::Unauthorized),
            FetchError::Unauthorized
        );
        assert_eq!(
            FetchError::from(SharePointError::Status(503)),
            FetchError::Transport("Request failed with status 503".into())
        );
        assert!(matches!(
            FetchError::from(SharePointError::ParsingError("x".into())),
            FetchError::Parsing(_)
        ));
    }
}
