//! Keyword Query Language helpers.

use time::{macros::format_description, Date};

/// Backslash-escapes `( ) { } [ ] " ' :`.
pub fn escape_kql_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | '"' | '\'' | ':') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KqlOperator {
    #[default]
    Or,
    And,
}

impl KqlOperator {
    fn as_separator(self) -> &'static str {
        match self {
            KqlOperator::Or => " OR ",
            KqlOperator::And => " AND ",
        }
    }
}

/// `Property:"a"` for one value, `(Property:"a" OR Property:"b")` for more.
pub fn build_property_filter(property: &str, values: &[&str], operator: KqlOperator) -> String {
    let clauses: Vec<_> = values
        .iter()
        .map(|v| format!("{}:\"{}\"", property, escape_kql_value(v)))
        .collect();

    match clauses.len() {
        0 => String::new(),
        1 => clauses.into_iter().collect(),
        _ => format!("({})", clauses.join(operator.as_separator())),
    }
}

pub fn build_date_range_filter(property: &str, start: Option<Date>, end: Option<Date>) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    let format = |date: Date| date.format(fmt).unwrap_or_default();

    match (start, end) {
        (Some(start), Some(end)) => format!("{}:{}..{}", property, format(start), format(end)),
        (Some(start), None) => format!("{}>={}", property, format(start)),
        (None, Some(end)) => format!("{}<={}", property, format(end)),
        (None, None) => String::new(),
    }
}

/// `Property:*value*`
pub fn build_wildcard_query(property: &str, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    format!("{}:*{}*", property, escape_kql_value(value))
}

/// Joins the non-blank filters with ` AND `.
pub fn combine_filters<S: AsRef<str>>(filters: &[S]) -> String {
    filters
        .iter()
        .filter_map(|f| {
            let f: &str = f.as_ref();
            (!f.trim().is_empty()).then_some(f)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Trims and collapses runs of whitespace.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a query into terms, keeping `"quoted phrases"` together.
pub fn extract_search_terms(query: &str) -> Vec<String> {
    let normalized = normalize_query(query);
    let mut terms = Vec::new();
    let mut rest = normalized.as_str();

    while !rest.is_empty() {
        rest = rest.trim_start();
        if let Some(after_quote) = rest.strip_prefix('"') {
            if let Some(close) = after_quote.find('"').filter(|&i| i > 0) {
                terms.push(after_quote[..close].to_string());
                rest = &after_quote[close + 1..];
                continue;
            }
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end > 0 {
            terms.push(rest[..end].to_string());
        }
        rest = &rest[end..];
    }

    terms
}

/// Query refinements for a partial query: matching common terms, wildcard
/// forms, then property-scoped forms. At most eight.
pub fn generate_query_suggestions(partial_query: &str, common_terms: &[&str]) -> Vec<String> {
    const MAX_SUGGESTIONS: usize = 8;
    const PROPERTIES: [&str; 4] = ["title", "author", "filename", "content"];

    if partial_query.chars().count() < 2 {
        return Vec::new();
    }

    let lower = partial_query.to_lowercase();
    common_terms
        .iter()
        .filter(|term| term.to_lowercase().starts_with(&lower))
        .map(|term| term.to_string())
        .chain([format!("{partial_query}*"), format!("*{partial_query}*")])
        .chain(PROPERTIES.iter().map(|p| format!("{p}:{partial_query}")))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_kql_value(r#"a:(b)"c""#), r#"a\:\(b\)\"c\""#);
        assert_eq!(escape_kql_value("plain"), "plain");
        assert_eq!(escape_kql_value(""), "");
    }

    #[test]
    fn property_filters() {
        assert_eq!(build_property_filter("FileType", &[], KqlOperator::Or), "");
        assert_eq!(
            build_property_filter("FileType", &["docx"], KqlOperator::Or),
            r#"FileType:"docx""#
        );
        assert_eq!(
            build_property_filter("FileType", &["docx", "pdf"], KqlOperator::And),
            r#"(FileType:"docx" AND FileType:"pdf")"#
        );
    }

    #[test]
    fn date_ranges() {
        let start = date!(2024 - 01 - 01);
        let end = date!(2024 - 03 - 31);

        assert_eq!(
            build_date_range_filter("LastModifiedTime", Some(start), Some(end)),
            "LastModifiedTime:2024-01-01..2024-03-31"
        );
        assert_eq!(
            build_date_range_filter("Created", Some(start), None),
            "Created>=2024-01-01"
        );
        assert_eq!(build_date_range_filter("Created", None, Some(end)), "Created<=2024-03-31");
        assert_eq!(build_date_range_filter("Created", None, None), "");
    }

    #[test]
    fn wildcard_and_combine() {
        assert_eq!(build_wildcard_query("Title", "budget"), "Title:*budget*");
        assert_eq!(build_wildcard_query("Title", ""), "");
        assert_eq!(
            combine_filters(&["budget", " ", "", r#"FileType:"xlsx""#]),
            r#"budget AND FileType:"xlsx""#
        );
        assert_eq!(combine_filters::<&str>(&[]), "");
    }

    #[test]
    fn terms_keep_quoted_phrases() {
        assert_eq!(normalize_query("  q1   budget\treview "), "q1 budget review");
        assert_eq!(
            extract_search_terms(r#"budget "annual report" 2024"#),
            vec!["budget", "annual report", "2024"]
        );
        assert_eq!(extract_search_terms(r#"say "unterminated"#), vec!["say", "\"unterminated"]);
        assert!(extract_search_terms("   ").is_empty());
    }

    #[test]
    fn query_suggestions() {
        assert!(generate_query_suggestions("b", &["budget"]).is_empty());

        let suggestions = generate_query_suggestions("bu", &["Budget", "Holiday", "bus"]);
        assert_eq!(
            suggestions,
            vec![
                "Budget",
                "bus",
                "bu*",
                "*bu*",
                "title:bu",
                "author:bu",
                "filename:bu",
                "content:bu"
            ]
        );
    }
}
