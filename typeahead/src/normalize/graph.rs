//! Microsoft Graph search hits.
//!
//! Field extraction is table driven: [`entity_profile`] maps an entity type
//! (`driveItem`, `message`, ...) to the fields and fallbacks used for it, with
//! a default profile for anything unlisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ensure_unique_ids, error_placeholder, format};
use crate::{RecordError, SuggestionItem};

const ODATA_TYPE_PREFIX: &str = "#microsoft.graph.";

/// Extraction rules and request defaults for one Graph entity type.
pub struct EntityProfile {
    pub entity_type: &'static str,
    display_name: &'static str,
    pub icon: &'static str,
    title_fields: &'static [&'static str],
    untitled: &'static str,
    author_fields: &'static [&'static str],
    unknown_author: &'static str,
    summary: fn(&Value) -> String,
    extras: fn(&Value, &mut Map<String, Value>),
    /// Fields requested when the caller does not name any.
    pub default_fields: &'static [&'static str],
    /// KQL properties OR-ed with the raw query when enhancement is on.
    pub query_fields: &'static [&'static str],
    /// Appended to every query string for this entity type.
    pub query_suffix: Option<&'static str>,
}

impl EntityProfile {
    /// Human label, e.g. `Calendar Event`. Unknown types label themselves.
    pub fn display_name<'a>(&'a self, entity_type: &'a str) -> &'a str {
        if self.display_name.is_empty() {
            entity_type
        } else {
            self.display_name
        }
    }

    fn title(&self, resource: &Value) -> String {
        first_text(resource, self.title_fields)
            .unwrap_or(self.untitled)
            .to_string()
    }

    fn author(&self, resource: &Value) -> String {
        first_text(resource, self.author_fields)
            .unwrap_or(self.unknown_author)
            .to_string()
    }
}

const DEFAULT_FIELDS: &[&str] = &["id", "displayName", "webUrl"];
const DEFAULT_TITLE: &[&str] = &["/displayName", "/name", "/title"];
const CREATED_BY: &[&str] = &["/createdBy/user/displayName"];

static PROFILES: &[EntityProfile] = &[
    EntityProfile {
        entity_type: "driveItem",
        display_name: "File",
        icon: "OneDriveAdd",
        title_fields: &["/name"],
        untitled: "Untitled File",
        author_fields: CREATED_BY,
        unknown_author: "Unknown",
        summary: drive_item_summary,
        extras: drive_item_extras,
        default_fields: &[
            "id",
            "name",
            "webUrl",
            "size",
            "createdDateTime",
            "lastModifiedDateTime",
            "createdBy",
            "lastModifiedBy",
            "file",
            "folder",
            "parentReference",
        ],
        query_fields: &["filename"],
        query_suffix: Some(" AND NOT(FileExtension:aspx)"),
    },
    EntityProfile {
        entity_type: "message",
        display_name: "Email",
        icon: "Mail",
        title_fields: &["/subject"],
        untitled: "No Subject",
        author_fields: &["/from/emailAddress/name"],
        unknown_author: "Unknown Sender",
        summary: body_preview,
        extras: message_extras,
        default_fields: &[
            "id",
            "subject",
            "bodyPreview",
            "from",
            "toRecipients",
            "receivedDateTime",
            "importance",
            "isRead",
            "hasAttachments",
            "webLink",
        ],
        query_fields: &["subject", "body"],
        query_suffix: None,
    },
    EntityProfile {
        entity_type: "event",
        display_name: "Calendar Event",
        icon: "Calendar",
        title_fields: &["/subject"],
        untitled: "No Title",
        author_fields: &["/organizer/emailAddress/name"],
        unknown_author: "Unknown Organizer",
        summary: event_summary,
        extras: event_extras,
        default_fields: &[
            "id",
            "subject",
            "bodyPreview",
            "start",
            "end",
            "location",
            "organizer",
            "attendees",
            "isAllDay",
            "webLink",
            "categories",
        ],
        query_fields: &["subject", "location"],
        query_suffix: None,
    },
    EntityProfile {
        entity_type: "contact",
        display_name: "Contact",
        icon: "Contact",
        title_fields: &["/displayName"],
        untitled: "Unknown Contact",
        author_fields: CREATED_BY,
        unknown_author: "Unknown",
        summary: description,
        extras: no_extras,
        default_fields: &[
            "id",
            "displayName",
            "emailAddresses",
            "businessPhones",
            "jobTitle",
            "companyName",
            "department",
        ],
        query_fields: &[],
        query_suffix: None,
    },
    EntityProfile {
        entity_type: "chatMessage",
        display_name: "Teams Message",
        icon: "TeamsLogo",
        title_fields: &["/subject", "/summary"],
        untitled: "Untitled",
        author_fields: &["/from/user/displayName"],
        unknown_author: "Unknown",
        summary: description,
        extras: no_extras,
        default_fields: &[
            "id",
            "body",
            "from",
            "createdDateTime",
            "importance",
            "attachments",
        ],
        query_fields: &[],
        query_suffix: None,
    },
    generic("site", "SharePoint Site", "SharePointLogo"),
    generic("list", "SharePoint List", "List"),
    generic("listItem", "List Item", "ListMirrored"),
    generic("person", "Person", "Person"),
    generic("group", "Group", "Group"),
    generic("team", "Team", "TeamsLogo"),
    generic("channel", "Channel", "TeamsLogo"),
];

static DEFAULT_PROFILE: EntityProfile = generic("", "", "GenericScan");

const fn generic(
    entity_type: &'static str,
    display_name: &'static str,
    icon: &'static str,
) -> EntityProfile {
    EntityProfile {
        entity_type,
        display_name,
        icon,
        title_fields: DEFAULT_TITLE,
        untitled: "Untitled",
        author_fields: CREATED_BY,
        unknown_author: "Unknown",
        summary: description,
        extras: no_extras,
        default_fields: DEFAULT_FIELDS,
        query_fields: &[],
        query_suffix: None,
    }
}

/// Profile for `entity_type` (case-insensitive), or the default profile.
pub fn entity_profile(entity_type: &str) -> &'static EntityProfile {
    PROFILES
        .iter()
        .find(|p| p.entity_type.eq_ignore_ascii_case(entity_type))
        .unwrap_or(&DEFAULT_PROFILE)
}

/// One normalized Graph hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResultItem {
    pub title: String,
    /// `webUrl`, else `webLink`, else empty.
    pub path: String,
    pub summary: String,
    pub author: String,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub is_from_graph: bool,
    pub graph_entity_type: String,
    pub graph_id: Option<String>,
    pub hit_id: Option<String>,
    pub rank: Option<i64>,
    /// Entity specific extras such as `FileSize` or `Location`.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl SearchResultItem {
    pub fn profile(&self) -> &'static EntityProfile {
        entity_profile(&self.graph_entity_type)
    }

    pub fn to_suggestion(&self, index: usize) -> SuggestionItem {
        let id = self
            .graph_id
            .clone()
            .or_else(|| self.hit_id.clone())
            .unwrap_or_else(|| format!("graph-{index}"));

        let modified = self.modified.as_deref().and_then(format::format_date);
        let subtitle = [
            Some(self.profile().display_name(&self.graph_entity_type)),
            Some(self.author.as_str()),
            modified.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");

        let mut item = SuggestionItem::new(id, self.title.as_str())
            .with_subtitle(subtitle)
            .with_path(self.path.as_str());
        if self.profile().entity_type == "driveItem" {
            item = item.with_file_type(format::file_extension(&self.title));
        }
        item
    }
}

/// Entity type of a resource with the `#microsoft.graph.` prefix removed.
pub fn entity_type_of(resource: &Value) -> &str {
    resource
        .get("@odata.type")
        .and_then(Value::as_str)
        .map(|t| t.strip_prefix(ODATA_TYPE_PREFIX).unwrap_or(t))
        .filter(|t| !t.is_empty())
        .unwrap_or("unknown")
}

/// Reads one hit (`{ hitId, rank, summary, resource }`).
pub fn normalize_hit(hit: &Value) -> Result<SearchResultItem, RecordError> {
    let hit = hit.as_object().ok_or(RecordError::NotAnObject)?;
    let resource = hit
        .get("resource")
        .filter(|r| r.is_object())
        .ok_or(RecordError::MissingResource)?;

    let entity_type = entity_type_of(resource);
    let profile = entity_profile(entity_type);

    let mut summary = (profile.summary)(resource);
    if summary.is_empty() {
        summary = hit
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
    }

    let mut properties = Map::new();
    (profile.extras)(resource, &mut properties);

    Ok(SearchResultItem {
        title: profile.title(resource),
        path: first_text(resource, &["/webUrl", "/webLink"])
            .unwrap_or_default()
            .to_string(),
        summary,
        author: profile.author(resource),
        created: first_text(resource, &["/createdDateTime", "/dateTimeCreated"]).map(str::to_owned),
        modified: first_text(
            resource,
            &[
                "/lastModifiedDateTime",
                "/dateTimeLastModified",
                "/receivedDateTime",
            ],
        )
        .map(str::to_owned),
        is_from_graph: true,
        graph_entity_type: entity_type.to_string(),
        graph_id: text_at(resource, "/id").map(str::to_owned),
        hit_id: hit.get("hitId").and_then(Value::as_str).map(str::to_owned),
        rank: hit.get("rank").and_then(Value::as_i64),
        properties,
    })
}

/// Normalizes hits for the dropdown, one item per hit.
pub fn normalize_hits(hits: &[Value]) -> Vec<SuggestionItem> {
    let mut items: Vec<_> = hits
        .iter()
        .enumerate()
        .map(|(index, hit)| match normalize_hit(hit) {
            Ok(result) => result.to_suggestion(index),
            Err(e) => {
                tracing::warn!("Skipping unreadable Graph hit {}: {}", index, e);
                error_placeholder(index)
            }
        })
        .collect();

    ensure_unique_ids(&mut items);
    items
}

fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn first_text<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers.iter().find_map(|p| text_at(value, p))
}

fn copy_field(resource: &Value, pointer: &str, key: &str, into: &mut Map<String, Value>) {
    if let Some(value) = resource.pointer(pointer).filter(|v| !v.is_null()) {
        into.insert(key.to_string(), value.clone());
    }
}

fn drive_item_type(resource: &Value) -> &'static str {
    if resource.get("folder").is_some_and(|f| !f.is_null()) {
        return "Folder";
    }
    if let Some(mime) = text_at(resource, "/file/mimeType") {
        return format::mime_type_category(mime);
    }
    match text_at(resource, "/name").map(format::file_extension) {
        Some(ext) if !ext.is_empty() => format::drive_extension_category(&ext),
        _ => "File",
    }
}

fn drive_item_summary(resource: &Value) -> String {
    if resource.get("file").is_some_and(|f| !f.is_null()) {
        let size = resource.get("size").and_then(Value::as_u64).unwrap_or(0);
        format!(
            "{} • {}",
            drive_item_type(resource),
            format::format_file_size(size)
        )
    } else {
        "Folder".to_string()
    }
}

fn drive_item_extras(resource: &Value, into: &mut Map<String, Value>) {
    let size = resource.get("size").and_then(Value::as_u64).unwrap_or(0);
    into.insert("FileType".into(), drive_item_type(resource).into());
    copy_field(resource, "/size", "FileSize", into);
    into.insert("FileSizeFormatted".into(), format::format_file_size(size).into());
    copy_field(resource, "/parentReference/path", "ParentPath", into);
}

fn body_preview(resource: &Value) -> String {
    text_at(resource, "/bodyPreview")
        .unwrap_or_default()
        .to_string()
}

fn message_extras(resource: &Value, into: &mut Map<String, Value>) {
    copy_field(resource, "/importance", "Importance", into);
    copy_field(resource, "/isRead", "IsRead", into);
    copy_field(resource, "/hasAttachments", "HasAttachments", into);

    if let Some(recipients) = resource.get("toRecipients").and_then(Value::as_array) {
        let names = recipients
            .iter()
            .filter_map(|r| text_at(r, "/emailAddress/name"))
            .collect::<Vec<_>>()
            .join(", ");
        into.insert("Recipients".into(), names.into());
    }
}

fn event_summary(resource: &Value) -> String {
    first_text(resource, &["/bodyPreview", "/location/displayName"])
        .unwrap_or_default()
        .to_string()
}

fn event_extras(resource: &Value, into: &mut Map<String, Value>) {
    copy_field(resource, "/start/dateTime", "StartTime", into);
    copy_field(resource, "/end/dateTime", "EndTime", into);
    copy_field(resource, "/location/displayName", "Location", into);
    copy_field(resource, "/isAllDay", "IsAllDay", into);

    if let Some(categories) = resource.get("categories").and_then(Value::as_array) {
        let joined = categories
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        into.insert("Categories".into(), joined.into());
    }
}

fn description(resource: &Value) -> String {
    first_text(resource, &["/description", "/bodyPreview"])
        .unwrap_or_default()
        .to_string()
}

fn no_extras(_: &Value, _: &mut Map<String, Value>) {}
