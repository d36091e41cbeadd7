use serde::{Deserialize, Serialize};

/// Display-ready suggestion shown in the type-ahead dropdown.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    /// Unique within one result set.
    pub id: String,
    #[serde(rename = "suggestionTitle")]
    pub title: String,
    #[serde(rename = "suggestionSubtitle", default)]
    pub subtitle: String,
    /// Empty when the source has no navigable URL.
    #[serde(default)]
    pub path: String,
    /// Lowercase file type used for icon selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl SuggestionItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_file_type(mut self, file_type: impl AsRef<str>) -> Self {
        let file_type = file_type.as_ref().trim().to_lowercase();
        self.file_type = (!file_type.is_empty()).then_some(file_type);
        self
    }

    /// Whether selecting this item navigates somewhere instead of running a search.
    pub fn has_path(&self) -> bool {
        !self.path.trim().is_empty()
    }

    /// Icon key for the item's file type.
    pub fn icon_name(&self) -> &'static str {
        match self.file_type.as_deref().unwrap_or_default() {
            "pdf" => "PDF",
            "doc" | "docx" => "WordDocument",
            "xls" | "xlsx" => "ExcelDocument",
            "ppt" | "pptx" => "PowerPointDocument",
            "txt" => "TextDocument",
            "html" | "htm" => "FileHTML",
            _ => "Page",
        }
    }
}

/// Snapshot of everything a consumer needs to draw the search box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeaheadState {
    pub value: String,
    pub suggestions: Vec<SuggestionItem>,
    pub open: bool,
    pub loading: bool,
    pub error: Option<String>,
}
