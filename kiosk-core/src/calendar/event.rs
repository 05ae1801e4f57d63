//! Calendar event types: parsed feed events and their JSON shapes.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Summary used for events without a `SUMMARY`.
pub const NO_TITLE: &str = "Kein Titel";

/// A start or end value as written in the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// Value with a trailing `Z`
    DateTimeUtc(DateTime<Utc>),
    /// Value without zone information
    DateTimeFloating(NaiveDateTime),
    /// Value with a `TZID` parameter
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    /// The instant this value denotes.
    ///
    /// Floating times, all-day dates and unknown `TZID`s are read as local
    /// time; dates start at local midnight.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::DateTimeUtc(dt) => Some(*dt),
            EventTime::Date(date) => local_to_utc(date.and_hms_opt(0, 0, 0)?),
            EventTime::DateTimeFloating(naive) => local_to_utc(*naive),
            EventTime::DateTimeZoned { datetime, tzid } => match tzid.parse::<Tz>() {
                Ok(tz) => zoned_to_utc(&tz, *datetime),
                Err(_) => local_to_utc(*datetime),
            },
        }
    }
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    zoned_to_utc(&Local, naive)
}

fn zoned_to_utc<T: TimeZone>(tz: &T, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        // Wall time skipped by a forward DST jump: read it past the gap
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Organizer of an event, from the `ORGANIZER` property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    /// Display name (`CN` parameter)
    pub name: Option<String>,
    /// Email address, without `mailto:`
    pub email: String,
}

/// A `VEVENT` read from a feed, with times resolved to instants.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub organizer: Option<Organizer>,
}

/// Event as listed in the navigation view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub location: String,
}

/// Event as listed by the single-calendar endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: UpcomingEvent,
    pub description: String,
    pub organizer: Option<Organizer>,
}

impl From<FeedEvent> for UpcomingEvent {
    fn from(event: FeedEvent) -> Self {
        UpcomingEvent {
            summary: event.summary.unwrap_or_else(|| NO_TITLE.to_string()),
            start: event.start,
            end: event.end,
            location: event.location.unwrap_or_default(),
        }
    }
}

impl From<FeedEvent> for EventDetail {
    fn from(mut event: FeedEvent) -> Self {
        let description = event.description.take().unwrap_or_default();
        let organizer = event.organizer.take();

        EventDetail {
            event: event.into(),
            description,
            organizer,
        }
    }
}
