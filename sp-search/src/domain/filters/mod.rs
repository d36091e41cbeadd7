mod query_text_filter;
mod suggest_filter;

pub use query_text_filter::QueryTextFilter;
pub use suggest_filter::SuggestFilter;

pub trait SearchFilter {
    fn as_query_string(&self) -> String;
}

/// OData string literal: single quotes doubled, then percent-encoded and
/// wrapped in quotes.
pub(crate) fn odata_string(value: &str) -> String {
    format!("'{}'", urlencoding::encode(&value.replace('\'', "''")))
}
