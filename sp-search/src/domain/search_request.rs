use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SortDirection {
    Ascending = 0,
    Descending = 1,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SortField {
    pub property: String,
    pub direction: SortDirection,
}

/// Full search request for `POST /_api/search/postquery`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchRequest {
    pub query_text: String,
    pub select_properties: Vec<String>,
    pub refiners: Option<String>,
    pub sort_list: Vec<SortField>,
    pub row_limit: u32,
    pub start_row: u32,
    pub trim_duplicates: bool,
    pub enable_query_rules: bool,
    pub enable_stemming: bool,
    pub enable_nicknames: bool,
    pub enable_phonetic: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            select_properties: Vec::new(),
            refiners: None,
            sort_list: Vec::new(),
            row_limit: 50,
            start_row: 0,
            trim_duplicates: true,
            enable_query_rules: true,
            enable_stemming: true,
            enable_nicknames: true,
            enable_phonetic: true,
        }
    }
}

impl SearchRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            ..Self::default()
        }
    }

    pub fn with_select_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Comma-separated refiner list, e.g. `FileType,Author`.
    pub fn with_refiners(mut self, refiners: impl Into<String>) -> Self {
        self.refiners = Some(refiners.into());
        self
    }

    pub fn sorted_by(mut self, property: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_list.push(SortField {
            property: property.into(),
            direction,
        });
        self
    }

    pub fn with_row_limit(mut self, row_limit: u32) -> Self {
        self.row_limit = row_limit;
        self
    }

    pub fn starting_at(mut self, start_row: u32) -> Self {
        self.start_row = start_row;
        self
    }

    /// Query text sent to the service; blank becomes `*`.
    pub fn effective_query_text(&self) -> &str {
        let trimmed = self.query_text.trim();
        if trimmed.is_empty() {
            "*"
        } else {
            trimmed
        }
    }

    pub(crate) fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.query_text.clone())
    }

    /// Verbose OData body for `postquery`.
    pub fn to_post_body(&self) -> Value {
        let mut request = json!({
            "__metadata": { "type": "Microsoft.Office.Server.Search.REST.SearchRequest" },
            "Querytext": self.effective_query_text(),
            "RowLimit": self.row_limit,
            "StartRow": self.start_row,
            "TrimDuplicates": self.trim_duplicates,
            "EnableQueryRules": self.enable_query_rules,
            "EnableStemming": self.enable_stemming,
            "EnableNicknames": self.enable_nicknames,
            "EnablePhonetic": self.enable_phonetic,
        });

        if !self.select_properties.is_empty() {
            request["SelectProperties"] = json!({ "results": self.select_properties });
        }
        if let Some(refiners) = self.refiners.as_deref().filter(|r| !r.trim().is_empty()) {
            request["Refiners"] = json!(refiners);
        }
        if !self.sort_list.is_empty() {
            let sorts: Vec<_> = self
                .sort_list
                .iter()
                .map(|s| json!({ "Property": s.property, "Direction": s.direction as i32 }))
                .collect();
            request["SortList"] = json!({ "results": sorts });
        }

        json!({ "request": request })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let request = SearchRequest::new("budget");
        assert_eq!(request.row_limit, 50);
        assert!(request.trim_duplicates);
        assert!(request.enable_phonetic);
    }

    #[test]
    fn blank_query_searches_everything() {
        let body = SearchRequest::new("   ").to_post_body();
        assert_eq!(body["request"]["Querytext"], "*");
    }

    #[test]
    fn post_body_includes_optional_parts_only_when_set() {
        let plain = SearchRequest::new("budget").to_post_body();
        assert!(plain["request"].get("SelectProperties").is_none());
        assert!(plain["request"].get("Refiners").is_none());
        assert!(plain["request"].get("SortList").is_none());

        let body = SearchRequest::new("budget")
            .with_select_properties(["Title", "Path"])
            .with_refiners("FileType,Author")
            .sorted_by("LastModifiedTime", SortDirection::Descending)
            .with_row_limit(20)
            .starting_at(40)
            .to_post_body();

        let request = &body["request"];
        assert_eq!(request["SelectProperties"]["results"][1], "Path");
        assert_eq!(request["Refiners"], "FileType,Author");
        assert_eq!(request["SortList"]["results"][0]["Direction"], 1);
        assert_eq!(request["RowLimit"], 20);
        assert_eq!(request["StartRow"], 40);
    }

    #[test]
    fn cache_key_distinguishes_pages() {
        let first = SearchRequest::new("budget");
        let second = SearchRequest::new("budget").starting_at(50);
        assert_ne!(first.cache_key(), second.cache_key());
        assert_eq!(first.cache_key(), SearchRequest::new("budget").cache_key());
    }
}
