//! Navigation composition.
//!
//! Loads the template once per request and turns every entry into its
//! response shape: scanned files, calendar events or an empty placeholder.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarAggregator, CalendarEnv, CalendarResult};
use crate::config::KioskConfig;
use crate::error::KioskResult;
use crate::scan::{ScannedFile, scan_directory};
use crate::template::{Entry, EntryContent, load_template};

/// One entry of the navigation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    pub icon: Option<String>,
    #[serde(flatten)]
    pub content: NavigationContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavigationContent {
    Calendars { calendars: Vec<CalendarResult> },
    Files { files: Vec<ScannedFile> },
}

/// Response of the navigation endpoint.
///
/// A category query yields a single entry; otherwise the whole list. Both
/// collapse to an empty list when there is nothing to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Navigation {
    Entry(Box<NavigationEntry>),
    Entries(Vec<NavigationEntry>),
}

impl Navigation {
    pub fn empty() -> Self {
        Navigation::Entries(Vec::new())
    }
}

/// Composes navigation from the template, the files root and calendar feeds.
#[derive(Debug, Clone)]
pub struct Navigator {
    files_root: PathBuf,
    public_prefix: String,
    calendars: CalendarAggregator,
}

impl Navigator {
    pub fn new(
        files_root: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
        calendars: CalendarAggregator,
    ) -> Self {
        Navigator {
            files_root: files_root.into(),
            public_prefix: public_prefix.into(),
            calendars,
        }
    }

    /// Navigator for a loaded configuration.
    pub fn from_config(config: &KioskConfig, env: CalendarEnv) -> KioskResult<Self> {
        let calendars = CalendarAggregator::with_timeout(env, config.calendar_timeout)?;
        Ok(Self::new(
            config.files_dir.clone(),
            config.public_prefix.clone(),
            calendars,
        ))
    }

    pub fn calendars(&self) -> &CalendarAggregator {
        &self.calendars
    }

    /// Build the navigation response, optionally narrowed to one category.
    pub async fn compose(
        &self,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> KioskResult<Navigation> {
        let entries = load_template(&self.files_root)?;

        match category {
            Some(category) => {
                let Some(entry) = entries.iter().find(|e| e.matches_category(category)) else {
                    tracing::debug!(category, "no navigation entry for category");
                    return Ok(Navigation::empty());
                };
                let entry = self.resolve_entry(entry, now).await?;
                Ok(Navigation::Entry(Box::new(entry)))
            }
            None => {
                let resolved = join_all(entries.iter().map(|e| self.resolve_entry(e, now))).await;
                let entries = resolved.into_iter().collect::<KioskResult<Vec<_>>>()?;
                Ok(Navigation::Entries(entries))
            }
        }
    }

    async fn resolve_entry(
        &self,
        entry: &Entry,
        now: DateTime<Utc>,
    ) -> KioskResult<NavigationEntry> {
        let content = match &entry.content {
            EntryContent::Calendar { sources } => NavigationContent::Calendars {
                calendars: self.calendars.aggregate(sources, now).await,
            },
            EntryContent::Documents {
                directory,
                overrides,
            } => NavigationContent::Files {
                files: scan_directory(
                    &self.files_root,
                    directory,
                    overrides,
                    &self.public_prefix,
                )?,
            },
            EntryContent::Page => NavigationContent::Files { files: Vec::new() },
        };

        Ok(NavigationEntry {
            id: entry.id.clone(),
            display_name: entry.display_name.clone(),
            kind: entry.kind.clone(),
            url: entry.url.clone(),
            icon: entry.icon.clone(),
            content,
        })
    }
}
