use serde::{Deserialize, Serialize};
use serde_json::Value;
use typeahead::normalize::{normalize_hit, SearchResultItem};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseBody {
    #[serde(default)]
    value: Vec<SearchResponseSet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseSet {
    #[serde(default)]
    hits_containers: Vec<HitsContainer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HitsContainer {
    #[serde(default)]
    hits: Vec<Value>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    more_results_available: bool,
}

/// Hits of every container in a response, in response order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergedHits {
    pub hits: Vec<Value>,
    pub total_items: u64,
    pub more_results_available: bool,
}

impl MergedHits {
    pub fn from_body(body: Value) -> Self {
        let body = match serde_json::from_value::<SearchResponseBody>(body) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Unrecognized Graph search response: {}", e);
                return Self::default();
            }
        };

        let mut merged = Self::default();
        for container in body.value.into_iter().flat_map(|set| set.hits_containers) {
            merged.total_items += container.total.unwrap_or(container.hits.len() as u64);
            merged.more_results_available |= container.more_results_available;
            merged.hits.extend(container.hits);
        }
        merged
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSearchResponse {
    pub items: Vec<SearchResultItem>,
    pub total_items: u64,
    pub more_results_available: bool,
}

impl From<MergedHits> for GraphSearchResponse {
    fn from(merged: MergedHits) -> Self {
        let items = merged
            .hits
            .iter()
            .enumerate()
            .filter_map(|(index, hit)| match normalize_hit(hit) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Dropping unreadable Graph hit {}: {}", index, e);
                    None
                }
            })
            .collect();

        Self {
            items,
            total_items: merged.total_items,
            more_results_available: merged.more_results_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(id: &str) -> Value {
        json!({
            "hitId": id,
            "rank": 1,
            "resource": { "@odata.type": "#microsoft.graph.driveItem", "id": id, "name": format!("{id}.docx") }
        })
    }

    #[test]
    fn merges_all_containers_in_order() {
        let body = json!({ "value": [
            { "hitsContainers": [
                { "hits": [hit("a"), hit("b")], "total": 40, "moreResultsAvailable": true },
                { "hits": [hit("c")] }
            ] },
            { "hitsContainers": [{ "hits": [hit("d")], "total": 1 }] }
        ] });

        let merged = MergedHits::from_body(body);

        let ids: Vec<_> = merged.hits.iter().map(|h| h["hitId"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(merged.total_items, 42);
        assert!(merged.more_results_available);
    }

    #[test]
    fn containers_without_hits_are_fine() {
        let body = json!({ "value": [{ "hitsContainers": [{ "total": 0, "moreResultsAvailable": false }] }] });
        let merged = MergedHits::from_body(body);

        assert!(merged.hits.is_empty());
        assert_eq!(merged.total_items, 0);
        assert!(!merged.more_results_available);
    }

    #[test]
    fn unrecognized_body_is_empty() {
        assert_eq!(MergedHits::from_body(json!({ "value": "nope" })), MergedHits::default());
        assert_eq!(MergedHits::from_body(json!([])), MergedHits::default());
    }

    #[test]
    fn response_drops_unreadable_hits() {
        let merged = MergedHits {
            hits: vec![hit("a"), json!({ "hitId": "broken" })],
            total_items: 2,
            more_results_available: false,
        };

        let response = GraphSearchResponse::from(merged);

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].title, "a.docx");
        assert_eq!(response.total_items, 2);
    }
}
