//! Pure mapping from provider records to [`SuggestionItem`]s.
//!
//! Nothing in here performs I/O or panics on bad input. A record that cannot
//! be read becomes one [`error_placeholder`] at its position, so a batch of
//! `n` records always yields `n` items.

pub mod format;
pub mod graph;
pub mod sharepoint;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SuggestionItem;

pub use graph::{entity_profile, normalize_hit, normalize_hits, EntityProfile, SearchResultItem};
pub use sharepoint::{flatten_row, normalize_rows};

/// Flattened `Key -> Value` cells of one search row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(BTreeMap<String, Value>);

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-blank string value of `key`, trimmed.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// First non-blank string among `keys`, in order.
    pub fn first_text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.text(key))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Stand-in for a record that could not be read.
pub fn error_placeholder(index: usize) -> SuggestionItem {
    SuggestionItem::new(
        format!("error-{index}"),
        format!("Error processing item {index}"),
    )
    .with_subtitle("Error occurred")
}

/// Makes every id in `items` unique by suffixing repeats with `#n`.
pub fn ensure_unique_ids(items: &mut [SuggestionItem]) {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items.iter_mut() {
        if seen.insert(item.id.clone()) {
            continue;
        }

        let mut n = 2;
        let unique = loop {
            let candidate = format!("{}#{n}", item.id);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        seen.insert(unique.clone());
        item.id = unique;
    }
}
