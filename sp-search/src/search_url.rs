use crate::domain::SearchFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchURL(String);

impl AsRef<str> for SearchURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SearchURL {
    /// Creates a new SearchURL rooted at a SharePoint site, e.g.
    /// `https://contoso.sharepoint.com/sites/finance`.
    pub fn new(site_url: &str) -> Self {
        Self(site_url.trim().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_filter(&self, filter: &impl SearchFilter) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}", self.0, filter.as_query_string()))
        } else {
            Self(format!("{}?{}", self.0, filter.as_query_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Raw(&'static str);

    impl SearchFilter for Raw {
        fn as_query_string(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn append_path_normalizes_slashes() {
        let url = SearchURL::new("https://contoso.sharepoint.com/sites/fin/")
            .append_path("/_api/search/query");
        assert_eq!(
            url.as_ref(),
            "https://contoso.sharepoint.com/sites/fin/_api/search/query"
        );
    }

    #[test]
    fn filters_chain_with_ampersand() {
        let url = SearchURL::new("https://x")
            .append_path("_api/search/query")
            .with_filter(&Raw("a=1"))
            .with_filter(&Raw("b=2"));
        assert_eq!(url.as_ref(), "https://x/_api/search/query?a=1&b=2");
    }
}
