//! Display formatting shared by the normalizers.

use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime};

/// Lowercase extension of the last path segment, or `""`.
pub fn file_extension(path: &str) -> String {
    let last_dot = path.rfind('.');
    let last_slash = path.rfind(['/', '\\']);

    match (last_dot, last_slash) {
        (Some(dot), Some(slash)) if dot > slash + 1 => path[dot + 1..].to_lowercase(),
        (Some(dot), None) if dot > 0 => path[dot + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Broad category for a file extension.
pub fn file_type_category(extension: &str) -> &'static str {
    if extension.is_empty() {
        return "Unknown";
    }

    match extension.to_lowercase().as_str() {
        "doc" | "docx" | "pdf" | "txt" | "rtf" | "odt" => "Document",
        "xls" | "xlsx" | "csv" | "ods" => "Spreadsheet",
        "ppt" | "pptx" | "odp" => "Presentation",
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" => "Image",
        "mp4" | "avi" | "mov" | "wmv" | "flv" | "webm" | "mkv" => "Video",
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" => "Audio",
        "js" | "ts" | "html" | "css" | "json" | "xml" | "sql" | "cs" | "java" | "py" | "php" => {
            "Code"
        }
        "zip" | "rar" | "7z" | "tar" | "gz" => "Archive",
        _ => "File",
    }
}

/// Office-flavoured category for a drive item extension.
pub fn drive_extension_category(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "doc" | "docx" => "Word Document",
        "xls" | "xlsx" => "Excel Spreadsheet",
        "ppt" | "pptx" => "PowerPoint",
        "pdf" => "PDF",
        "txt" | "rtf" => "Text",
        "jpg" | "jpeg" | "png" | "gif" | "bmp" => "Image",
        "mp4" | "avi" | "mov" | "wmv" => "Video",
        "mp3" | "wav" | "flac" => "Audio",
        "js" | "ts" | "html" | "css" | "json" => "Code",
        _ => "File",
    }
}

pub fn mime_type_category(mime_type: &str) -> &'static str {
    let mime = mime_type.to_lowercase();

    if mime.is_empty() {
        "File"
    } else if mime.starts_with("image/") {
        "Image"
    } else if mime.starts_with("video/") {
        "Video"
    } else if mime.starts_with("audio/") {
        "Audio"
    } else if mime.starts_with("text/") {
        "Text"
    } else if mime.contains("pdf") {
        "PDF"
    } else if mime.contains("word") || mime.contains("document") {
        "Word Document"
    } else if mime.contains("excel") || mime.contains("spreadsheet") {
        "Excel Spreadsheet"
    } else if mime.contains("powerpoint") || mime.contains("presentation") {
        "PowerPoint"
    } else if mime.contains("zip") || mime.contains("archive") {
        "Archive"
    } else {
        "File"
    }
}

/// `0 B`, `512.0 B`, `1.5 KB`, ...
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let unit_index = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let unit_index = unit_index.min(UNITS.len() - 1);
    let size = bytes as f64 / 1024_f64.powi(unit_index as i32);

    format!("{:.1} {}", size, UNITS[unit_index])
}

/// Calendar date of an RFC 3339 timestamp, e.g. `2024-03-01`.
pub fn format_date(timestamp: &str) -> Option<String> {
    let parsed = OffsetDateTime::parse(timestamp.trim(), &Rfc3339).ok()?;
    parsed
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .ok()
}

/// Human label for a SharePoint managed property.
pub fn format_property_name(property: &str) -> String {
    let mapped = match property {
        "ModifiedOOBDate" => Some("Modified Date"),
        "CreatedOOBDate" => Some("Created Date"),
        "LastModifiedTime" => Some("Last Modified"),
        "AuthorOWSUSER" => Some("Author"),
        "EditorOWSUSER" => Some("Editor"),
        "FileExtension" => Some("File Type"),
        "ContentTypeId" => Some("Content Type"),
        "SPSiteURL" => Some("Site"),
        "SiteName" => Some("Site Name"),
        "ListId" => Some("List"),
        "DocumentLinkOWSMTXT" => Some("Document Link"),
        _ => None,
    };
    if let Some(label) = mapped {
        return label.to_string();
    }

    let mut label = String::with_capacity(property.len() + 4);
    for (i, c) in property.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            label.push(' ');
        }
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
    }
    label
}

/// Cut `text` to at most `max_chars` characters, ending in `suffix` when cut.
pub fn truncate_text(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(suffix.chars().count());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(suffix);
    truncated
}
