mod client;
pub mod domain;
pub mod kql;
mod search_url;

pub(crate) use search_url::*;

pub use client::*;
pub use domain::{
    EnvelopeShape, QueryEnvelope, RefinementResult, RefinementValue, SearchRequest,
    SearchResponse, SortDirection,
};
