//! SharePoint search rows.
//!
//! A row is `{ "Cells": [ { "Key": .., "Value": .. }, .. ] }`, or with the
//! verbose OData wrapper `{ "Cells": { "results": [ .. ] } }`.

use serde_json::Value;

use super::{ensure_unique_ids, error_placeholder, format, PropertyBag};
use crate::{RecordError, SuggestionItem};

const TITLE_FIELDS: [&str; 4] = ["FileName", "Title", "Name", "FileLeafRef"];
const UNTITLED: &str = "(untitled)";

/// Flattens the cells of one row into a property bag.
///
/// Cells without a string `Key` are skipped; a row without a cell collection
/// is an error.
pub fn flatten_row(row: &Value) -> Result<PropertyBag, RecordError> {
    let row = row.as_object().ok_or(RecordError::NotAnObject)?;

    let cells = match row.get("Cells") {
        Some(Value::Array(cells)) => cells,
        Some(Value::Object(wrapped)) => wrapped
            .get("results")
            .and_then(Value::as_array)
            .ok_or(RecordError::MissingCells)?,
        _ => return Err(RecordError::MissingCells),
    };

    Ok(cells
        .iter()
        .filter_map(|cell| {
            let key = cell.get("Key")?.as_str()?;
            let value = cell.get("Value").cloned().unwrap_or(Value::Null);
            Some((key.to_string(), value))
        })
        .collect())
}

/// Maps one flattened row to a suggestion.
///
/// Title: `FileName`, `Title`, `Name`, `FileLeafRef`, then `(untitled)`.
/// Id: `Path`, `UniqueId`, then `sharepoint-{index}`.
pub fn suggestion_from_properties(props: &PropertyBag, index: usize) -> SuggestionItem {
    let title = props.first_text(&TITLE_FIELDS).unwrap_or(UNTITLED);
    let path = props.text("Path").unwrap_or_default();
    let id = props
        .first_text(&["Path", "UniqueId"])
        .map(str::to_owned)
        .unwrap_or_else(|| format!("sharepoint-{index}"));

    let modified = props.text("LastModifiedTime").and_then(format::format_date);
    let subtitle = [props.text("FileType"), props.text("SiteName"), modified.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

    let mut item = SuggestionItem::new(id, title)
        .with_subtitle(subtitle)
        .with_path(path);
    if let Some(file_type) = props.text("FileType") {
        item = item.with_file_type(file_type);
    }
    item
}

/// Normalizes a batch of raw rows, one item per row.
pub fn normalize_rows(rows: &[Value]) -> Vec<SuggestionItem> {
    let mut items: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| match flatten_row(row) {
            Ok(props) => suggestion_from_properties(&props, index),
            Err(e) => {
                tracing::warn!("Skipping unreadable search row {}: {}", index, e);
                error_placeholder(index)
            }
        })
        .collect();

    ensure_unique_ids(&mut items);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cells: &[(&str, &str)]) -> Value {
        let cells: Vec<_> = cells
            .iter()
            .map(|(k, v)| json!({ "Key": k, "Value": v, "ValueType": "Edm.String" }))
            .collect();
        json!({ "Cells": cells })
    }

    #[test]
    fn flattens_plain_and_wrapped_cells() {
        let plain = json!({ "Cells": [{ "Key": "Title", "Value": "A" }] });
        let wrapped = json!({ "Cells": { "results": [{ "Key": "Title", "Value": "A" }] } });

        assert_eq!(flatten_row(&plain).unwrap().text("Title"), Some("A"));
        assert_eq!(flatten_row(&wrapped).unwrap().text("Title"), Some("A"));
    }

    #[test]
    fn flatten_skips_cells_without_string_key() {
        let row = json!({ "Cells": [{ "Key": 7, "Value": "x" }, "junk", { "Key": "Path" }] });
        let props = flatten_row(&row).unwrap();

        assert_eq!(props.len(), 1);
        assert_eq!(props.get("Path"), Some(&Value::Null));
    }

    #[test]
    fn flatten_rejects_malformed_rows() {
        assert_eq!(flatten_row(&json!("row")), Err(RecordError::NotAnObject));
        assert_eq!(flatten_row(&json!({})), Err(RecordError::MissingCells));
        assert_eq!(
            flatten_row(&json!({ "Cells": { "items": [] } })),
            Err(RecordError::MissingCells)
        );
    }

    #[test]
    fn full_row_maps_to_display_ready_item() {
        let props = flatten_row(&row(&[
            ("Title", "Budget"),
            ("FileName", "Budget 2024.xlsx"),
            ("Path", "/sites/fin/Budget2024.xlsx"),
            ("FileType", "XLSX"),
            ("SiteName", "Finance"),
            ("LastModifiedTime", "2024-03-01T09:30:00.0000000Z"),
        ]))
        .unwrap();

        let item = suggestion_from_properties(&props, 0);

        assert_eq!(item.id, "/sites/fin/Budget2024.xlsx");
        assert_eq!(item.title, "Budget 2024.xlsx");
        assert_eq!(item.subtitle, "XLSX · Finance · 2024-03-01");
        assert_eq!(item.path, "/sites/fin/Budget2024.xlsx");
        assert_eq!(item.file_type.as_deref(), Some("xlsx"));
    }

    #[test]
    fn title_falls_back_in_order() {
        let title = |cells: &[(&str, &str)]| {
            suggestion_from_properties(&flatten_row(&row(cells)).unwrap(), 0).title
        };

        assert_eq!(title(&[("Title", "T"), ("Name", "N")]), "T");
        assert_eq!(title(&[("FileName", ""), ("Name", "N")]), "N");
        assert_eq!(title(&[("FileLeafRef", "leaf.docx")]), "leaf.docx");
        assert_eq!(title(&[]), "(untitled)");
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let item = suggestion_from_properties(&flatten_row(&row(&[("UniqueId", "u-1")])).unwrap(), 4);
        assert_eq!(item.id, "u-1");
        assert_eq!(item.path, "");
        assert_eq!(item.subtitle, "");
        assert_eq!(item.file_type, None);

        let item = suggestion_from_properties(&PropertyBag::new(), 4);
        assert_eq!(item.id, "sharepoint-4");

        let item = suggestion_from_properties(
            &flatten_row(&row(&[("LastModifiedTime", "yesterday"), ("SiteName", "HR")])).unwrap(),
            0,
        );
        assert_eq!(item.subtitle, "HR");
    }

    #[test]
    fn malformed_record_becomes_placeholder_in_place() {
        let rows = vec![
            row(&[("Title", "One"), ("Path", "/1")]),
            row(&[("Title", "Two"), ("Path", "/2")]),
            json!({ "NoCells": true }),
            row(&[("Title", "Four"), ("Path", "/4")]),
            row(&[("Title", "Five"), ("Path", "/5")]),
        ];

        let items = normalize_rows(&rows);

        assert_eq!(items.len(), 5);
        assert_eq!(items[2].id, "error-2");
        assert_eq!(items[2].subtitle, "Error occurred");
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Error processing item 2", "Four", "Five"]);
    }

    #[test]
    fn rows_with_same_path_get_unique_ids() {
        let rows = vec![row(&[("Path", "/same")]), row(&[("Path", "/same")])];
        let items = normalize_rows(&rows);

        assert_eq!(items[0].id, "/same");
        assert_eq!(items[1].id, "/same#2");
        assert_eq!(items[1].path, "/same");
    }
}
