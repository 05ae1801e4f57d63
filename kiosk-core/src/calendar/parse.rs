//! ICS feed parsing using the icalendar crate's parser.

use chrono::{DateTime, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::calendar::event::{EventTime, FeedEvent, Organizer};
use crate::error::{KioskError, KioskResult};

/// Parse a feed body into its events.
///
/// Events without a usable `DTSTART` are skipped. A body that is not an
/// iCalendar document at all is an error.
pub fn parse_feed(content: &str) -> KioskResult<Vec<FeedEvent>> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    if !content.starts_with("BEGIN:VCALENDAR") {
        return Err(KioskError::IcsParse(
            "response is not an iCalendar document".into(),
        ));
    }

    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| KioskError::IcsParse(e.to_string()))?;

    Ok(vevents(&calendar.components)
        .into_iter()
        .filter_map(parse_vevent)
        .collect())
}

/// Collect `VEVENT`s, looking inside `VCALENDAR` wrappers.
fn vevents<'c, 'a>(components: &'c [Component<'a>]) -> Vec<&'c Component<'a>> {
    let mut found = Vec::new();
    for component in components {
        if component.name == "VEVENT" {
            found.push(component);
        } else if component.name == "VCALENDAR" {
            found.extend(vevents(&component.components));
        }
    }
    found
}

fn parse_vevent(vevent: &Component) -> Option<FeedEvent> {
    let start = DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?)
        .ok()
        .map(to_event_time)?
        .to_utc()?;

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .and_then(|t| t.to_utc())
        .or_else(|| {
            vevent
                .find_prop("DURATION")
                .and_then(|p| add_duration(start, p.val.as_ref()))
        });

    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| unescape_text(p.val.as_ref()))
            .filter(|v| !v.is_empty())
    };

    Some(FeedEvent {
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        start,
        end,
        organizer: vevent.find_prop("ORGANIZER").map(parse_organizer),
    })
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::DateTimeZoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}

/// Apply a `DURATION` value (`PT1H30M`, `P1D`, ...) to the start.
fn add_duration(start: DateTime<Utc>, value: &str) -> Option<DateTime<Utc>> {
    let duration = iso8601::duration(value.trim_start_matches('+')).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let duration = chrono::Duration::from_std(std_duration).ok()?;

    start.checked_add_signed(duration)
}

/// Parse the ORGANIZER property
fn parse_organizer(prop: &Property) -> Organizer {
    let value = prop.val.as_ref();
    let email = value
        .strip_prefix("mailto:")
        .or_else(|| value.strip_prefix("MAILTO:"))
        .unwrap_or(value)
        .to_string();

    let name = prop
        .params
        .iter()
        .find(|p| p.key == "CN")
        .and_then(|p| p.val.as_ref().map(|v| v.as_ref().trim_matches('"').to_string()));

    Organizer { name, email }
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out.trim().to_string()
}
