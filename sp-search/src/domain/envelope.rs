//! Wire shapes of the search REST responses.
//!
//! SharePoint answers in one of two layouts depending on the OData flavour the
//! request negotiated:
//!
//! - verbose: `{ "d": { "query": { "PrimaryQueryResult": .. } } }` (`postquery`
//!   for POST requests), collections wrapped as `{ "results": [..] }`
//! - direct: `{ "PrimaryQueryResult": .. }`, collections as plain arrays
//!
//! [`QueryEnvelope::parse`] tries them in that order and falls back to an
//! empty result.

use serde::Deserialize;
use serde_json::Value;

/// A JSON array, optionally wrapped in `{ "results": [..] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Plain(Vec<T>),
    Wrapped { results: Vec<T> },
}

impl<T> Collection<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Collection::Plain(items) => items,
            Collection::Wrapped { results } => results,
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection::Plain(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    Verbose,
    Direct,
    Unrecognized,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEnvelope {
    Verbose { d: VerboseBody },
    Direct(QueryResult),
}

#[derive(Debug, Deserialize)]
struct VerboseBody {
    #[serde(alias = "postquery")]
    query: QueryResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    pub primary_query_result: PrimaryQueryResult,
    #[serde(default)]
    pub properties: Option<Collection<KeyValue>>,
    #[serde(default)]
    pub spelling_suggestion: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrimaryQueryResult {
    #[serde(default)]
    pub relevant_results: Option<RelevantResults>,
    #[serde(default)]
    pub refinement_results: Option<RefinementResults>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelevantResults {
    #[serde(default)]
    pub total_rows: Option<i64>,
    #[serde(default)]
    pub table: Option<Table>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    /// Raw rows, read one at a time so a bad row cannot fail the batch.
    #[serde(default)]
    pub rows: Collection<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefinementResults {
    #[serde(default)]
    pub refiners: Collection<RawRefiner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRefiner {
    pub name: String,
    #[serde(default)]
    pub entries: Collection<RawRefinerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRefinerEntry {
    pub refinement_value: String,
    /// Int64 in the service, which verbose OData sends as a string.
    #[serde(default)]
    pub refinement_count: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// A parsed search response and the layout it arrived in.
#[derive(Debug)]
pub struct QueryEnvelope {
    pub shape: EnvelopeShape,
    pub result: QueryResult,
}

impl QueryEnvelope {
    pub fn parse(body: Value) -> Self {
        match serde_json::from_value::<RawEnvelope>(body) {
            Ok(RawEnvelope::Verbose { d }) => Self {
                shape: EnvelopeShape::Verbose,
                result: d.query,
            },
            Ok(RawEnvelope::Direct(result)) => Self {
                shape: EnvelopeShape::Direct,
                result,
            },
            Err(e) => {
                tracing::debug!("Unrecognized search response envelope: {}", e);
                Self {
                    shape: EnvelopeShape::Unrecognized,
                    result: QueryResult::default(),
                }
            }
        }
    }

    pub fn total_rows(&self) -> i64 {
        self.relevant()
            .and_then(|r| r.total_rows)
            .unwrap_or_default()
    }

    pub fn into_rows(self) -> Vec<Value> {
        self.result
            .primary_query_result
            .relevant_results
            .and_then(|r| r.table)
            .map(|t| t.rows.into_vec())
            .unwrap_or_default()
    }

    fn relevant(&self) -> Option<&RelevantResults> {
        self.result.primary_query_result.relevant_results.as_ref()
    }
}

pub(crate) fn count_of(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}
