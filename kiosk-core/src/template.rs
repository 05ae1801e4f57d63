//! Navigation template (`template.json`) loading.
//!
//! The template is a JSON array of entries. Each raw entry is resolved once
//! into an [`Entry`] whose [`EntryContent`] decides how it is rendered, so
//! the composer never re-inspects the `type` string.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSource;
use crate::error::{KioskError, KioskResult};

/// File name of the template, relative to the files root.
pub const TEMPLATE_FILE: &str = "template.json";

const CALENDAR_TYPE: &str = "calendar";
const DOCUMENTS_TYPE: &str = "documents";
const PLACEHOLDER_TYPE: &str = "placeholder";

/// A navigation entry as written in `template.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileOverride>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calendars: Vec<CalendarSource>,
}

/// Per-file display corrections layered onto scanned files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileOverride {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A template entry with its defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub display_name: String,
    /// Value of the `type` field in responses.
    pub kind: String,
    /// Directory named in the template, whatever the entry's kind.
    pub directory: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub content: EntryContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    /// Files scanned from a directory below the files root.
    Documents {
        directory: String,
        overrides: Vec<FileOverride>,
    },
    /// Upcoming events from one or more iCal feeds.
    Calendar { sources: Vec<CalendarSource> },
    /// A page without backing data (placeholder, iframe, ...).
    Page,
}

impl Entry {
    /// Resolve a raw entry found at `index` in the template.
    pub fn resolve(raw: TemplateEntry, index: usize) -> Self {
        let directory = non_empty(raw.directory);
        let kind = non_empty(raw.kind);

        let content = if kind.as_deref() == Some(CALENDAR_TYPE) {
            EntryContent::Calendar {
                sources: raw.calendars,
            }
        } else if let Some(directory) = &directory {
            EntryContent::Documents {
                directory: directory.clone(),
                overrides: raw.files,
            }
        } else {
            EntryContent::Page
        };

        let kind = kind.unwrap_or_else(|| {
            let default = match &content {
                EntryContent::Documents { .. } => DOCUMENTS_TYPE,
                _ => PLACEHOLDER_TYPE,
            };
            default.to_string()
        });

        let id = non_empty(raw.id)
            .or(directory.clone())
            .unwrap_or_else(|| match &content {
                EntryContent::Calendar { .. } => format!("calendar-{index}"),
                _ => format!("page-{index}"),
            });

        Entry {
            id,
            display_name: raw.display_name,
            kind,
            directory,
            url: non_empty(raw.url),
            icon: non_empty(raw.icon),
            content,
        }
    }

    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    /// Whether a `category` query selects this entry.
    pub fn matches_category(&self, category: &str) -> bool {
        self.directory() == Some(category) || self.display_name == category
    }
}

/// Load and resolve the template below `files_root`.
///
/// A missing template is an empty navigation, not an error.
pub fn load_template(files_root: &Path) -> KioskResult<Vec<Entry>> {
    let path = files_root.join(TEMPLATE_FILE);

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no template found");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)?;
    parse_template(&content).map_err(|source| KioskError::TemplateParse {
        path: path.display().to_string(),
        source,
    })
}

/// Parse template JSON text into resolved entries.
pub fn parse_template(content: &str) -> Result<Vec<Entry>, serde_json::Error> {
    let raw: Vec<TemplateEntry> = serde_json::from_str(content)?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Entry::resolve(entry, index))
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directory_entries_default_to_documents() {
        let entries = parse_template(r#"[{"directory":"flyers","display_name":"Flyers"}]"#)
            .expect("valid template");

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.id, "flyers");
        assert_eq!(entry.kind, "documents");
        assert_eq!(entry.url, None);
        assert_eq!(
            entry.content,
            EntryContent::Documents {
                directory: "flyers".into(),
                overrides: vec![],
            }
        );
    }

    #[test]
    fn directory_less_entries_become_placeholders() {
        let entries = parse_template(
            r#"[
                {"directory":"a","display_name":"A"},
                {"display_name":"Website","type":"iframe","url":"https://example.org"},
                {"display_name":"Soon"}
            ]"#,
        )
        .expect("valid template");

        assert_eq!(entries[1].id, "page-1");
        assert_eq!(entries[1].kind, "iframe");
        assert_eq!(entries[1].url.as_deref(), Some("https://example.org"));
        assert_eq!(entries[1].content, EntryContent::Page);

        assert_eq!(entries[2].id, "page-2");
        assert_eq!(entries[2].kind, "placeholder");
    }

    #[test]
    fn calendar_entries_get_calendar_ids() {
        let entries = parse_template(
            r#"[
                {"display_name":"Home"},
                {"type":"calendar","display_name":"Events",
                 "calendars":[{"name":"Main","url_env":"CAL_MAIN"}]}
            ]"#,
        )
        .expect("valid template");

        let calendar = &entries[1];
        assert_eq!(calendar.id, "calendar-1");
        assert_eq!(calendar.kind, "calendar");
        match &calendar.content {
            EntryContent::Calendar { sources } => {
                assert_eq!(sources.len(), 1);
                assert_eq!(sources[0].name, "Main");
                assert_eq!(sources[0].url_env.as_deref(), Some("CAL_MAIN"));
            }
            other => panic!("Expected calendar content, got {:?}", other),
        }
    }

    #[test]
    fn explicit_id_wins_over_directory() {
        let entries =
            parse_template(r#"[{"id":"news","directory":"aktuelles","display_name":"News"}]"#)
                .expect("valid template");

        assert_eq!(entries[0].id, "news");
        assert_eq!(entries[0].directory(), Some("aktuelles"));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let entries = parse_template(
            r#"[{"id":"","directory":"","display_name":"X","type":"","icon":""}]"#,
        )
        .expect("valid template");

        assert_eq!(entries[0].id, "page-0");
        assert_eq!(entries[0].kind, "placeholder");
        assert_eq!(entries[0].icon, None);
    }

    #[test]
    fn category_matches_directory_or_display_name() {
        let entries = parse_template(r#"[{"directory":"flyers","display_name":"Flyer"}]"#)
            .expect("valid template");

        assert!(entries[0].matches_category("flyers"));
        assert!(entries[0].matches_category("Flyer"));
        assert!(!entries[0].matches_category("flyer"));
    }

    #[test]
    fn calendar_entries_keep_their_directory() {
        let entries = parse_template(
            r#"[{"type":"calendar","directory":"events","display_name":"Termine","calendars":[]}]"#,
        )
        .expect("valid template");

        assert_eq!(entries[0].id, "events");
        assert_eq!(entries[0].directory(), Some("events"));
        assert!(matches!(entries[0].content, EntryContent::Calendar { .. }));
        assert!(entries[0].matches_category("events"));
        assert!(entries[0].matches_category("Termine"));
    }

    #[test]
    fn missing_template_is_empty() {
        let tmp = TempDir::new().unwrap();
        let entries = load_template(tmp.path()).expect("missing template is not an error");
        assert!(entries.is_empty());
    }

    #[test]
    fn malformed_template_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(TEMPLATE_FILE), "[{ not json").unwrap();

        let err = load_template(tmp.path()).unwrap_err();
        assert!(matches!(err, KioskError::TemplateParse { .. }));
    }

    #[test]
    fn entries_without_display_name_are_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(TEMPLATE_FILE), r#"[{"directory":"a"}]"#).unwrap();

        assert!(load_template(tmp.path()).is_err());
    }
}
