//! Calendar feed aggregation.
//!
//! Feeds are fetched concurrently, each with its own timeout. A failing
//! feed never fails the request: its error is reported next to its (empty)
//! event list.

mod event;
mod parse;
mod source;

pub use event::{EventDetail, EventTime, FeedEvent, NO_TITLE, Organizer, UpcomingEvent};
pub use parse::parse_feed;
pub use source::{CalendarEnv, CalendarSource, calendar_id_var};

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::error::{KioskError, KioskResult};

/// Events per source in the navigation view.
pub const NAVIGATION_EVENT_LIMIT: usize = 10;
/// Events returned by the single-calendar endpoint.
pub const DETAIL_EVENT_LIMIT: usize = 20;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome for one source of a calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarResult {
    pub name: String,
    pub events: Vec<UpcomingEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fetches and normalizes iCal feeds.
#[derive(Debug, Clone)]
pub struct CalendarAggregator {
    client: reqwest::Client,
    env: CalendarEnv,
    fetch_timeout: Duration,
}

impl CalendarAggregator {
    pub fn new(client: reqwest::Client, env: CalendarEnv, fetch_timeout: Duration) -> Self {
        CalendarAggregator {
            client,
            env,
            fetch_timeout,
        }
    }

    /// Aggregator with its own HTTP client.
    pub fn with_timeout(env: CalendarEnv, fetch_timeout: Duration) -> KioskResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KioskError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(Self::new(client, env, fetch_timeout))
    }

    pub fn env(&self) -> &CalendarEnv {
        &self.env
    }

    /// Upcoming events of every source, in source order.
    pub async fn aggregate(
        &self,
        sources: &[CalendarSource],
        now: DateTime<Utc>,
    ) -> Vec<CalendarResult> {
        join_all(sources.iter().map(|source| self.source_events(source, now))).await
    }

    async fn source_events(&self, source: &CalendarSource, now: DateTime<Utc>) -> CalendarResult {
        let result = match self.env.resolve(source) {
            Some(url) => self.fetch_feed(&url).await,
            None => Err(KioskError::NotConfigured),
        };

        match result {
            Ok(events) => CalendarResult {
                name: source.name.clone(),
                events: upcoming(events, now, NAVIGATION_EVENT_LIMIT)
                    .into_iter()
                    .map(UpcomingEvent::from)
                    .collect(),
                error: None,
            },
            Err(e) => {
                if !matches!(e, KioskError::NotConfigured) {
                    tracing::warn!(calendar = %source.name, error = %e, "calendar source failed");
                }
                CalendarResult {
                    name: source.name.clone(),
                    events: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Upcoming events of the calendar configured as `CALENDAR_<ID>`.
    ///
    /// Returns `Ok(None)` when no such calendar is configured.
    pub async fn calendar_details(
        &self,
        calendar_id: &str,
        now: DateTime<Utc>,
    ) -> KioskResult<Option<Vec<EventDetail>>> {
        let Some(url) = self.env.resolve_calendar_id(calendar_id) else {
            return Ok(None);
        };

        let events = self.fetch_feed(&url).await?;

        Ok(Some(
            upcoming(events, now, DETAIL_EVENT_LIMIT)
                .into_iter()
                .map(EventDetail::from)
                .collect(),
        ))
    }

    /// Fetch and parse one feed, bounded by the fetch timeout.
    pub async fn fetch_feed(&self, url: &str) -> KioskResult<Vec<FeedEvent>> {
        timeout(self.fetch_timeout, self.fetch_feed_inner(url))
            .await
            .map_err(|_| KioskError::CalendarTimeout(self.fetch_timeout))?
    }

    async fn fetch_feed_inner(&self, url: &str) -> KioskResult<Vec<FeedEvent>> {
        tracing::debug!(url, "fetching calendar feed");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(KioskError::CalendarStatus(status.as_u16()));
        }

        let body = response.text().await?;
        parse_feed(&body)
    }
}

/// Events starting at or after `now`, earliest first, at most `limit`.
pub fn upcoming(mut events: Vec<FeedEvent>, now: DateTime<Utc>, limit: usize) -> Vec<FeedEvent> {
    events.retain(|event| event.start >= now);
    events.sort_by_key(|event| event.start);
    events.truncate(limit);
    events
}
