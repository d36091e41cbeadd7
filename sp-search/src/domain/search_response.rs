use serde::Serialize;
use typeahead::normalize::{flatten_row, PropertyBag};

use super::{count_of, QueryEnvelope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementValue {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementResult {
    pub name: String,
    pub values: Vec<RefinementValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<PropertyBag>,
    pub total_rows: i64,
    pub refinement_results: Vec<RefinementResult>,
    pub query_rule_id: Option<String>,
    pub spelling_suggestion: Option<String>,
}

impl From<QueryEnvelope> for SearchResponse {
    fn from(envelope: QueryEnvelope) -> Self {
        let total_rows = envelope.total_rows();
        let result = envelope.result;

        let query_rule_id = result
            .properties
            .map(|p| p.into_vec())
            .unwrap_or_default()
            .into_iter()
            .find(|kv| kv.key == "QueryRuleId")
            .and_then(|kv| kv.value.as_str().map(str::to_owned));

        let primary = result.primary_query_result;

        let refinement_results = primary
            .refinement_results
            .map(|r| r.refiners.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|refiner| RefinementResult {
                name: refiner.name,
                values: refiner
                    .entries
                    .into_vec()
                    .into_iter()
                    .map(|entry| RefinementValue {
                        count: count_of(&entry.refinement_count),
                        value: entry.refinement_value,
                    })
                    .collect(),
            })
            .collect();

        let rows = primary
            .relevant_results
            .and_then(|r| r.table)
            .map(|t| t.rows.into_vec())
            .unwrap_or_default();

        let items = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| match flatten_row(row) {
                Ok(props) => Some(props),
                Err(e) => {
                    tracing::warn!("Dropping unreadable search row {}: {}", index, e);
                    None
                }
            })
            .collect();

        Self {
            items,
            total_rows,
            refinement_results,
            query_rule_id,
            spelling_suggestion: result.spelling_suggestion.filter(|s| !s.is_empty()),
        }
    }
}
