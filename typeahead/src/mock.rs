//! Scripted fetcher for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{FetchError, SuggestionFetcher, SuggestionItem};

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    result: Result<Vec<SuggestionItem>, FetchError>,
}

/// Mock fetcher with per-term scripted responses.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use typeahead::MockFetcher;
///
/// // Same answer for every term
/// let fetcher = MockFetcher::returning(vec![]);
///
/// // Slow answer for "x", fast answer for "xy"
/// let fetcher = MockFetcher::default()
///     .respond_after("x", Duration::from_millis(500), vec![])
///     .respond_after("xy", Duration::from_millis(50), vec![]);
/// ```
#[derive(Clone, Default)]
pub struct MockFetcher {
    scripts: Arc<Mutex<HashMap<String, Scripted>>>,
    fallback: Option<Scripted>,
    calls: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
    ignore_cancellation: bool,
}

impl MockFetcher {
    /// Create a mock that always returns the same items.
    pub fn returning(items: Vec<SuggestionItem>) -> Self {
        Self {
            fallback: Some(Scripted {
                delay: Duration::ZERO,
                result: Ok(items),
            }),
            ..Self::default()
        }
    }

    /// Create a mock that always fails with `error`.
    pub fn failing(error: FetchError) -> Self {
        Self {
            fallback: Some(Scripted {
                delay: Duration::ZERO,
                result: Err(error),
            }),
            ..Self::default()
        }
    }

    pub fn respond(self, term: &str, items: Vec<SuggestionItem>) -> Self {
        self.respond_after(term, Duration::ZERO, items)
    }

    pub fn respond_after(self, term: &str, delay: Duration, items: Vec<SuggestionItem>) -> Self {
        self.script(term, delay, Ok(items))
    }

    pub fn fail_after(self, term: &str, delay: Duration, error: FetchError) -> Self {
        self.script(term, delay, Err(error))
    }

    /// Keep sleeping after the token fires, like a transport that cannot be
    /// interrupted.
    pub fn ignoring_cancellation(mut self) -> Self {
        self.ignore_cancellation = true;
        self
    }

    fn script(
        self,
        term: &str,
        delay: Duration,
        result: Result<Vec<SuggestionItem>, FetchError>,
    ) -> Self {
        self.scripts
            .lock()
            .insert(term.to_owned(), Scripted { delay, result });
        self
    }

    /// Terms passed to `fetch`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionFetcher for MockFetcher {
    async fn fetch(
        &self,
        term: &str,
        cancel: &CancellationToken,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(term.to_owned());

        let scripted = self
            .scripts
            .lock()
            .get(term)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or(Scripted {
                delay: Duration::ZERO,
                result: Ok(vec![]),
            });

        if self.ignore_cancellation {
            tokio::time::sleep(scripted.delay).await;
        } else {
            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(scripted.delay) => {}
            }
        }

        scripted
            .result
            .map(|items| items.into_iter().take(limit).collect())
    }
}
