use serde::Serialize;
use serde_json::{json, Value};
use typeahead::normalize::{entity_profile, EntityProfile};

/// Hard page-size ceiling of the `/search/query` endpoint.
pub const MAX_PAGE_SIZE: u32 = 25;

pub const DEFAULT_ENTITY_TYPES: [&str; 3] = ["driveItem", "message", "event"];

/// One `/search/query` call: a sub-request per entity type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSearchRequest {
    pub query: String,
    pub entity_types: Vec<String>,
    pub size: u32,
    pub from: u32,
    pub fields: Option<Vec<String>>,
    pub enhance_query: bool,
}

impl GraphSearchRequest {
    pub fn new<I, S>(query: impl Into<String>, entity_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            entity_types: entity_types.into_iter().map(Into::into).collect(),
            size: MAX_PAGE_SIZE,
            from: 0,
            fields: None,
            enhance_query: true,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn starting_at(mut self, from: u32) -> Self {
        self.from = from;
        self
    }

    /// Fields for every sub-request, instead of the per-entity defaults.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn enhance_query(mut self, enhance: bool) -> Self {
        self.enhance_query = enhance;
        self
    }

    pub(crate) fn cache_key(&self) -> String {
        format!(
            "graph_{}",
            serde_json::to_string(self).unwrap_or_else(|_| self.query.clone())
        )
    }

    pub fn query_string_for(&self, entity_type: &str) -> String {
        let profile = entity_profile(entity_type);
        let mut query_string = if self.enhance_query {
            enhance_query_string(self.query.trim(), profile)
        } else {
            self.query.trim().to_string()
        };
        if query_string.is_empty() {
            query_string.push('*');
        }
        if let Some(suffix) = profile.query_suffix {
            query_string.push_str(suffix);
        }
        query_string
    }

    pub fn to_body(&self) -> Value {
        let requests: Vec<_> = self
            .entity_types
            .iter()
            .map(|entity_type| {
                let fields: Vec<String> = match &self.fields {
                    Some(fields) => fields.clone(),
                    None => entity_profile(entity_type)
                        .default_fields
                        .iter()
                        .map(|f| f.to_string())
                        .collect(),
                };

                json!({
                    "entityType": entity_type,
                    "query": { "queryString": self.query_string_for(entity_type) },
                    "from": self.from,
                    "size": self.size.min(MAX_PAGE_SIZE),
                    "fields": fields,
                })
            })
            .collect();

        json!({ "requests": requests })
    }
}

/// `(q) OR field:q ...` for each of the profile's query fields.
fn enhance_query_string(query: &str, profile: &EntityProfile) -> String {
    if query.is_empty() {
        return "*".to_string();
    }
    if profile.query_fields.is_empty() {
        return query.to_string();
    }

    let mut enhanced = format!("({})", query);
    for field in profile.query_fields {
        enhanced.push_str(&format!(" OR {}:{}", field, query));
    }
    enhanced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sub_request_per_entity_type_with_capped_size() {
        let body = GraphSearchRequest::new("budget", DEFAULT_ENTITY_TYPES)
            .with_size(100)
            .to_body();

        let requests = body["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r["size"] == 25));
        assert_eq!(requests[0]["entityType"], "driveItem");
        assert_eq!(requests[1]["entityType"], "message");
        assert_eq!(requests[2]["from"], 0);
    }

    #[test]
    fn size_under_cap_is_kept() {
        let body = GraphSearchRequest::new("budget", ["message"]).with_size(10).to_body();
        assert_eq!(body["requests"][0]["size"], 10);
    }

    #[test]
    fn query_enhancement_per_entity() {
        let request = GraphSearchRequest::new("budget", DEFAULT_ENTITY_TYPES);

        assert_eq!(
            request.query_string_for("driveItem"),
            "(budget) OR filename:budget AND NOT(FileExtension:aspx)"
        );
        assert_eq!(
            request.query_string_for("message"),
            "(budget) OR subject:budget OR body:budget"
        );
        assert_eq!(
            request.query_string_for("event"),
            "(budget) OR subject:budget OR location:budget"
        );
        assert_eq!(request.query_string_for("site"), "budget");
    }

    #[test]
    fn plain_and_empty_queries() {
        let plain = GraphSearchRequest::new("budget", ["driveItem"]).enhance_query(false);
        assert_eq!(
            plain.query_string_for("driveItem"),
            "budget AND NOT(FileExtension:aspx)"
        );

        let empty = GraphSearchRequest::new("  ", ["message"]);
        assert_eq!(empty.query_string_for("message"), "*");
        let empty = GraphSearchRequest::new("", ["message"]).enhance_query(false);
        assert_eq!(empty.query_string_for("message"), "*");
    }

    #[test]
    fn fields_default_per_entity_or_override() {
        let body = GraphSearchRequest::new("x", ["event", "bookmark"]).to_body();
        assert!(body["requests"][0]["fields"]
            .as_array()
            .unwrap()
            .contains(&json!("organizer")));
        assert_eq!(
            body["requests"][1]["fields"],
            json!(["id", "displayName", "webUrl"])
        );

        let body = GraphSearchRequest::new("x", ["event"])
            .with_fields(["id", "subject"])
            .to_body();
        assert_eq!(body["requests"][0]["fields"], json!(["id", "subject"]));
    }
}
