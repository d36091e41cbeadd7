//! Fetcher abstraction and composite fetchers.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::{FetchError, StaticSuggestionProvider, SuggestionItem};

/// Issues exactly one outbound request per call.
///
/// Implementations must return [`FetchError::Cancelled`] once `cancel` fires and
/// should drop the underlying request when it does. Transport failures are
/// usually degraded to an empty list; anything returned as `Err` other than
/// `Cancelled` is shown to the user.
#[async_trait]
pub trait SuggestionFetcher: Send + Sync {
    async fn fetch(
        &self,
        term: &str,
        cancel: &CancellationToken,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, FetchError>;
}

#[async_trait]
impl<T: SuggestionFetcher + ?Sized> SuggestionFetcher for Arc<T> {
    async fn fetch(
        &self,
        term: &str,
        cancel: &CancellationToken,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        (**self).fetch(term, cancel, limit).await
    }
}

/// Queries several sources concurrently and concatenates their results in
/// source order.
///
/// A source that fails is logged and skipped while another source answers.
/// When every source fails the first error is returned. Cancellation of any
/// source cancels the merge.
pub struct MergedFetcher {
    sources: Vec<Arc<dyn SuggestionFetcher>>,
}

impl MergedFetcher {
    pub fn new(sources: Vec<Arc<dyn SuggestionFetcher>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SuggestionFetcher for MergedFetcher {
    async fn fetch(
        &self,
        term: &str,
        cancel: &CancellationToken,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        let results = join_all(
            self.sources
                .iter()
                .map(|source| source.fetch(term, cancel, limit)),
        )
        .await;

        let mut merged = Vec::new();
        let mut succeeded = 0;
        let mut first_error = None;
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(items) => {
                    succeeded += 1;
                    merged.extend(items);
                }
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    tracing::warn!("Suggestion source {} failed, skipping: {}", index, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(err) if succeeded == 0 => Err(err),
            _ => Ok(dedupe_and_truncate(merged, limit)),
        }
    }
}

/// Places static-suggestion matches ahead of live results. Both count
/// towards `limit`.
pub struct StaticAugmentedFetcher<F> {
    provider: StaticSuggestionProvider,
    inner: F,
}

impl<F: SuggestionFetcher> StaticAugmentedFetcher<F> {
    pub fn new(provider: StaticSuggestionProvider, inner: F) -> Self {
        Self { provider, inner }
    }
}

#[async_trait]
impl<F: SuggestionFetcher> SuggestionFetcher for StaticAugmentedFetcher<F> {
    async fn fetch(
        &self,
        term: &str,
        cancel: &CancellationToken,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        let mut items = self.provider.matching(term);
        items.extend(self.inner.fetch(term, cancel, limit).await?);
        Ok(dedupe_and_truncate(items, limit))
    }
}

/// Keeps the first item for each id and at most `limit` items.
fn dedupe_and_truncate(items: Vec<SuggestionItem>, limit: usize) -> Vec<SuggestionItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .take(limit)
        .collect()
}
