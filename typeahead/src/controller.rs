//! Debounced, cancellation-safe type-ahead controller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    FetchError, StaticSuggestionProvider, SuggestionFetcher, SuggestionItem, TypeaheadConfig,
    TypeaheadState,
};

/// Turns a stream of keystrokes into a stream of suggestion-list states.
///
/// Each call to [`set_query`](Self::set_query) cancels the in-flight request
/// and reschedules a single debounce timer. When the timer fires a new request
/// is issued; only the newest request may write to the state. Errors never
/// escape: they end up in [`TypeaheadState::error`] and the next keystroke
/// starts over.
///
/// Must be used from within a Tokio runtime. Dropping the controller cancels
/// the pending timer and the in-flight request. After
/// [`shutdown`](Self::shutdown) further input is ignored.
pub struct TypeaheadController {
    fetcher: Arc<dyn SuggestionFetcher>,
    config: TypeaheadConfig,
    zero_term: Vec<SuggestionItem>,
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
}

impl TypeaheadController {
    pub fn new(fetcher: Arc<dyn SuggestionFetcher>, config: TypeaheadConfig) -> Self {
        let zero_term = StaticSuggestionProvider::new("", &config.zero_term_suggestions).zero_term();
        let (state, _) = watch::channel(TypeaheadState::default());

        Self {
            fetcher,
            config,
            zero_term,
            shared: Arc::new(Shared {
                state,
                slot: Mutex::new(RequestSlot::default()),
            }),
            timer: None,
        }
    }

    /// Record new input and schedule a fetch for it.
    #[instrument(name = "TypeaheadController::set_query", skip(self, text))]
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        let term = text.trim().to_owned();

        let Some(timer_ticket) = self.shared.reschedule() else {
            return;
        };
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        self.shared.state.send_modify(|state| state.value = text);

        if term.is_empty() {
            self.shared.show_zero_term(self.zero_term.clone());
            return;
        }

        let shared = Arc::clone(&self.shared);
        let fetcher = Arc::clone(&self.fetcher);
        let debounce = self.config.debounce();
        let limit = self.config.effective_limit();
        let timeout = self.config.request_timeout();

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let Some((ticket, token)) = shared.begin_request(timer_ticket) else {
                return;
            };

            // The request outlives its timer; the next keystroke cancels it.
            tokio::spawn(run_request(shared, fetcher, term, ticket, token, limit, timeout));
        }));
    }

    /// Current state snapshot.
    pub fn state(&self) -> TypeaheadState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TypeaheadState> {
        self.shared.state.subscribe()
    }

    pub fn value(&self) -> String {
        self.shared.state.borrow().value.clone()
    }

    pub fn suggestions(&self) -> Vec<SuggestionItem> {
        self.shared.state.borrow().suggestions.clone()
    }

    pub fn is_open(&self) -> bool {
        self.shared.state.borrow().open
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.borrow().error.clone()
    }

    /// Open or close the dropdown, e.g. on blur or escape.
    pub fn set_open(&self, open: bool) {
        self.shared
            .state
            .send_if_modified(|state| std::mem::replace(&mut state.open, open) != open);
    }

    /// Replace the suggestion list, e.g. to clear it after a selection.
    pub fn set_suggestions(&self, suggestions: Vec<SuggestionItem>) {
        self.shared
            .state
            .send_modify(|state| state.suggestions = suggestions);
    }

    /// Cancel the pending timer and the in-flight request. Later completions
    /// are ignored.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.shared.close();
    }
}

impl Drop for TypeaheadController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State shared between the controller and its timer/request tasks.
struct Shared {
    state: watch::Sender<TypeaheadState>,
    slot: Mutex<RequestSlot>,
}

#[derive(Default)]
struct RequestSlot {
    timer_ticket: u64,
    request_ticket: u64,
    in_flight: Option<CancellationToken>,
    closed: bool,
}

impl Shared {
    /// Invalidate every scheduled timer and the live request, and return the
    /// ticket for the next timer. `None` once the controller is closed.
    fn reschedule(&self) -> Option<u64> {
        let mut slot = self.slot.lock();
        if slot.closed {
            return None;
        }
        slot.timer_ticket += 1;
        // A result for older text must never land under the new text.
        Self::abort_in_flight(&mut slot);
        Some(slot.timer_ticket)
    }

    fn show_zero_term(&self, zero_term: Vec<SuggestionItem>) {
        let mut slot = self.slot.lock();
        // An empty box must not be overwritten by a request for older text.
        Self::abort_in_flight(&mut slot);

        self.state.send_modify(|state| {
            state.open = !zero_term.is_empty();
            state.suggestions = zero_term;
            state.loading = false;
            state.error = None;
        });
    }

    /// Promote the timer identified by `timer_ticket` to a live request.
    ///
    /// Returns `None` if the timer was superseded or the controller is gone.
    fn begin_request(&self, timer_ticket: u64) -> Option<(u64, CancellationToken)> {
        let mut slot = self.slot.lock();
        if slot.closed || slot.timer_ticket != timer_ticket {
            return None;
        }

        Self::abort_in_flight(&mut slot);
        let token = CancellationToken::new();
        slot.in_flight = Some(token.clone());

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        Some((slot.request_ticket, token))
    }

    fn settle(&self, ticket: u64, outcome: Result<Vec<SuggestionItem>, FetchError>) {
        let mut slot = self.slot.lock();
        if slot.closed || slot.request_ticket != ticket {
            tracing::debug!("Discarding superseded response for request {}", ticket);
            return;
        }

        match outcome {
            Err(FetchError::Cancelled) => {}
            Ok(items) => {
                slot.in_flight = None;
                tracing::debug!("Request {} returned {} suggestions", ticket, items.len());
                self.state.send_modify(|state| {
                    state.open = !items.is_empty();
                    state.suggestions = items;
                    state.loading = false;
                });
            }
            Err(err) => {
                slot.in_flight = None;
                tracing::warn!("Request {} failed: {}", ticket, err);
                self.state.send_modify(|state| {
                    state.error = Some(err.to_string());
                    state.suggestions = Vec::new();
                    state.open = false;
                    state.loading = false;
                });
            }
        }
    }

    fn close(&self) {
        let mut slot = self.slot.lock();
        slot.closed = true;
        slot.timer_ticket += 1;
        Self::abort_in_flight(&mut slot);
    }

    /// Cancel the live request and make its ticket stale.
    fn abort_in_flight(slot: &mut RequestSlot) {
        if let Some(token) = slot.in_flight.take() {
            token.cancel();
        }
        slot.request_ticket += 1;
    }
}

async fn run_request(
    shared: Arc<Shared>,
    fetcher: Arc<dyn SuggestionFetcher>,
    term: String,
    ticket: u64,
    token: CancellationToken,
    limit: usize,
    timeout: Option<Duration>,
) {
    let fetch = fetcher.fetch(&term, &token, limit);

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => Err(FetchError::Cancelled),
        result = with_timeout(timeout, fetch) => result,
    };

    shared.settle(ticket, outcome);
}

async fn with_timeout<F>(
    timeout: Option<Duration>,
    fetch: F,
) -> Result<Vec<SuggestionItem>, FetchError>
where
    F: std::future::Future<Output = Result<Vec<SuggestionItem>, FetchError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .unwrap_or(Err(FetchError::Timeout(limit))),
        None => fetch.await,
    }
}
