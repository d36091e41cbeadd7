//! Type-ahead suggestions over SharePoint Search and Microsoft Graph.
//!
//! The crate is built around a small pipeline:
//!
//! - [`TypeaheadController`] - debounced, cancellation-safe query state machine
//! - [`SuggestionFetcher`] - one outbound request per invocation (implemented by
//!   the `sp-search` and `graph-search` crates)
//! - [`normalize`] - pure mapping from raw provider records to [`SuggestionItem`]s
//! - [`StaticSuggestionProvider`] - operator-configured suggestion lists
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use typeahead::{TypeaheadConfig, TypeaheadController};
//!
//! let fetcher = Arc::new(sp_search::SharePointClient::new(site_url)?.with_access_token(token));
//! let mut controller = TypeaheadController::new(fetcher, TypeaheadConfig::default());
//!
//! controller.set_query("budget");
//! let mut updates = controller.subscribe();
//! updates.changed().await?;
//! println!("{:?}", controller.state().suggestions);
//! ```
//!
//! # Ordering
//!
//! Every fired request carries a ticket. Only the newest ticket may write to the
//! visible state, so responses that arrive out of order are dropped no matter
//! how long the network takes.

mod config;
mod controller;
mod error;
mod fetcher;
mod model;
mod static_suggestions;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub mod normalize;

pub use config::TypeaheadConfig;
pub use controller::TypeaheadController;
pub use error::{FetchError, RecordError};
pub use fetcher::{MergedFetcher, StaticAugmentedFetcher, SuggestionFetcher};
pub use model::{SuggestionItem, TypeaheadState};
pub use static_suggestions::StaticSuggestionProvider;
pub use tokio_util::sync::CancellationToken;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockFetcher;
