//! Calendar feed sources and URL resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A feed listed under a calendar entry in the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub name: String,
    /// Literal feed URL; wins over `url_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Name of a variable holding the feed URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_env: Option<String>,
}

/// Variables used to resolve feed URLs.
///
/// Built once at start-up (usually from the process environment) and handed
/// to the aggregator, so resolution never touches global state.
#[derive(Debug, Clone, Default)]
pub struct CalendarEnv {
    vars: HashMap<String, String>,
}

impl CalendarEnv {
    pub fn new(vars: HashMap<String, String>) -> Self {
        CalendarEnv { vars }
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self::new(std::env::vars().collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Resolve the URL of a template source.
    pub fn resolve(&self, source: &CalendarSource) -> Option<String> {
        let literal = source.url.as_deref().filter(|u| !u.trim().is_empty());

        literal
            .or_else(|| source.url_env.as_deref().and_then(|name| self.get(name)))
            .map(normalize_feed_url)
    }

    /// Resolve the URL of the detail endpoint's `CALENDAR_<ID>` variable.
    ///
    /// Dashes in the id are kept as written first; shells cannot export such
    /// names, so `CALENDAR_TEAM_EVENTS` is tried next for `team-events`.
    pub fn resolve_calendar_id(&self, calendar_id: &str) -> Option<String> {
        let var = calendar_id_var(calendar_id);

        self.get(&var)
            .or_else(|| self.get(&var.replace('-', "_")))
            .map(normalize_feed_url)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CalendarEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Variable name holding the feed URL for a calendar id, e.g.
/// `sports` -> `CALENDAR_SPORTS`.
pub fn calendar_id_var(calendar_id: &str) -> String {
    format!("CALENDAR_{}", calendar_id.to_uppercase())
}

/// `webcal://` is plain HTTPS as far as fetching goes.
fn normalize_feed_url(url: &str) -> String {
    let url = url.trim();
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
