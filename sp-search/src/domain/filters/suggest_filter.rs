use super::{odata_string, SearchFilter};

/// Query string for `GET /_api/search/suggest`.
pub struct SuggestFilter {
    query_text: String,
    count: usize,
}

impl SuggestFilter {
    pub fn new(query_text: &str, count: usize) -> Self {
        Self {
            query_text: query_text.trim().to_string(),
            count,
        }
    }
}

impl SearchFilter for SuggestFilter {
    fn as_query_string(&self) -> String {
        format!(
            "querytext={}&inumberofquerysuggestions={}&fprequerysuggestions=true&fhithighlighting=false",
            odata_string(&self.query_text),
            self.count
        )
    }
}
