//! Operator-configured suggestion lists.

use crate::SuggestionItem;

/// Filters comma-separated suggestion lists without touching the network.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestionProvider {
    general: Vec<String>,
    zero_term: Vec<String>,
}

impl StaticSuggestionProvider {
    pub const MAX_STATIC: usize = 10;
    pub const MAX_ZERO_TERM: usize = 5;

    pub fn new(static_csv: &str, zero_term_csv: &str) -> Self {
        Self {
            general: split_csv(static_csv),
            zero_term: split_csv(zero_term_csv),
        }
    }

    /// Static suggestions containing `query` (case-insensitive). An empty query
    /// matches everything.
    pub fn matching(&self, query: &str) -> Vec<SuggestionItem> {
        let needle = query.trim().to_lowercase();

        self.general
            .iter()
            .filter(|s| needle.is_empty() || s.to_lowercase().contains(&needle))
            .take(Self::MAX_STATIC)
            .enumerate()
            .map(|(index, s)| {
                SuggestionItem::new(format!("static-{index}"), s.as_str())
                    .with_subtitle("Suggested search")
            })
            .collect()
    }

    /// Suggestions shown while the search box is empty.
    pub fn zero_term(&self) -> Vec<SuggestionItem> {
        self.zero_term
            .iter()
            .take(Self::MAX_ZERO_TERM)
            .enumerate()
            .map(|(index, s)| {
                SuggestionItem::new(format!("zero-term-{index}"), s.as_str())
                    .with_subtitle("Popular search")
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.zero_term.is_empty()
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
