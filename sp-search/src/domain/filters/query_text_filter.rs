use super::{odata_string, SearchFilter};

/// Query string for `GET /_api/search/query`.
pub struct QueryTextFilter {
    query_text: String,
    select_properties: Vec<String>,
    row_limit: usize,
}

impl QueryTextFilter {
    pub fn new(query_text: String, select_properties: Vec<String>, row_limit: usize) -> Self {
        Self {
            query_text,
            select_properties,
            row_limit,
        }
    }

    /// Prefix-wildcard query for type-ahead, `budget` becomes `budget*`.
    pub fn prefix(term: &str, select_properties: &[String], row_limit: usize) -> Self {
        Self::new(
            format!("{}*", term.trim()),
            select_properties.to_vec(),
            row_limit,
        )
    }
}

impl SearchFilter for QueryTextFilter {
    fn as_query_string(&self) -> String {
        format!(
            "querytext={}&selectproperties={}&rowlimit={}&trimduplicates=true",
            odata_string(&self.query_text),
            odata_string(&self.select_properties.join(",")),
            self.row_limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_query_string() {
        let filter = QueryTextFilter::prefix(
            " budget ",
            &["Title".to_string(), "Path".to_string()],
            10,
        );

        assert_eq!(
            filter.as_query_string(),
            "querytext='budget%2A'&selectproperties='Title%2CPath'&rowlimit=10&trimduplicates=true"
        );
    }
}
