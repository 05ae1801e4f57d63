//! Error types for the kiosk backend.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while composing navigation or fetching calendars.
#[derive(Error, Debug)]
pub enum KioskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid template {path}: {source}")]
    TemplateParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calendar request failed: {0}")]
    CalendarFetch(#[from] reqwest::Error),

    #[error("Calendar server responded with status {0}")]
    CalendarStatus(u16),

    #[error("Calendar request timed out after {}", humantime::format_duration(*.0))]
    CalendarTimeout(Duration),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Not configured")]
    NotConfigured,
}

/// Result type alias for kiosk operations.
pub type KioskResult<T> = Result<T, KioskError>;
