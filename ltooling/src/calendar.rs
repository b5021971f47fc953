//! Calendar search tool over a pluggable [`CalendarSource`].
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ltooling::calendar::{CalendarEvent, CalendarSearchTool, InMemoryCalendar};
//! use ltooling::Tool;
//!
//! let calendar = InMemoryCalendar::new(vec![CalendarEvent::new(
//!     "Standup",
//!     Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).single().expect("valid timestamp"),
//! )]);
//! let tool = CalendarSearchTool::new(calendar);
//!
//! assert_eq!(tool.definition().name, "calendar.search");
//! ```

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lcommon::SessionId;
use serde::Serialize;

use crate::{
    Tool, ToolArguments, ToolDefinition, ToolError, ToolFuture, ToolOutcome, optional_string,
    optional_u64,
};

pub const CALENDAR_SEARCH_TOOL: &str = "calendar.search";
pub const DEFAULT_MAX_EVENTS: usize = 10;
pub const MAX_EVENTS_LIMIT: usize = 50;
const SUMMARY_LINES: usize = 5;

const INPUT_SCHEMA: &str = r#"{"type":"object","properties":{"query":{"type":"string"},"start":{"type":"string","format":"date-time"},"end":{"type":"string","format":"date-time"},"max":{"type":"integer","minimum":1,"maximum":50}},"additionalProperties":false}"#;
const OUTPUT_SCHEMA: &str = r#"{"type":"array","items":{"type":"object","properties":{"title":{"type":"string"},"start":{"type":"string"},"end":{"type":"string"},"location":{"type":"string"},"link":{"type":"string"}}}}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub link: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            end: None,
            location: None,
            link: None,
        }
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarQuery {
    pub text: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub max: usize,
}

/// Backend that answers calendar searches, e.g. a remote calendar API.
pub trait CalendarSource: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a CalendarQuery,
    ) -> ToolFuture<'a, Result<Vec<CalendarEvent>, ToolError>>;
}

impl<T> CalendarSource for Arc<T>
where
    T: CalendarSource + ?Sized,
{
    fn search<'a>(
        &'a self,
        query: &'a CalendarQuery,
    ) -> ToolFuture<'a, Result<Vec<CalendarEvent>, ToolError>> {
        self.as_ref().search(query)
    }
}

/// Fixed event list, searched by case-insensitive title/location match.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendar {
    events: Vec<CalendarEvent>,
}

impl InMemoryCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }
}

impl CalendarSource for InMemoryCalendar {
    fn search<'a>(
        &'a self,
        query: &'a CalendarQuery,
    ) -> ToolFuture<'a, Result<Vec<CalendarEvent>, ToolError>> {
        Box::pin(async move {
            let needle = query.text.as_deref().map(str::to_lowercase);
            let mut events: Vec<CalendarEvent> = self
                .events
                .iter()
                .filter(|event| {
                    let ends_at = event.end.unwrap_or(event.start);
                    query.start.is_none_or(|start| ends_at >= start)
                        && query.end.is_none_or(|end| event.start <= end)
                })
                .filter(|event| match &needle {
                    Some(needle) => {
                        event.title.to_lowercase().contains(needle)
                            || event
                                .location
                                .as_deref()
                                .is_some_and(|location| location.to_lowercase().contains(needle))
                    }
                    None => true,
                })
                .cloned()
                .collect();

            events.sort_by_key(|event| event.start);
            events.truncate(query.max);
            Ok(events)
        })
    }
}

pub struct CalendarSearchTool {
    source: Box<dyn CalendarSource>,
}

impl CalendarSearchTool {
    pub fn new<S>(source: S) -> Self
    where
        S: CalendarSource + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }

    pub fn query_from_arguments(arguments: &ToolArguments) -> CalendarQuery {
        let max = optional_u64(arguments, "max")
            .and_then(|max| usize::try_from(max).ok())
            .filter(|max| (1..=MAX_EVENTS_LIMIT).contains(max))
            .unwrap_or(DEFAULT_MAX_EVENTS);

        CalendarQuery {
            text: optional_string(arguments, "query"),
            start: optional_string(arguments, "start").and_then(|value| parse_date_time(&value)),
            end: optional_string(arguments, "end").and_then(|value| parse_date_time(&value)),
            max,
        }
    }
}

impl Tool for CalendarSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            CALENDAR_SEARCH_TOOL,
            "Search calendar events by text and time window.",
        )
        .with_input_schema(INPUT_SCHEMA)
        .with_output_schema(OUTPUT_SCHEMA)
    }

    fn invoke<'a>(
        &'a self,
        session_id: &'a SessionId,
        arguments: &'a ToolArguments,
    ) -> ToolFuture<'a, Result<ToolOutcome, ToolError>> {
        Box::pin(async move {
            let query = Self::query_from_arguments(arguments);
            tracing::debug!(
                session_id = %session_id,
                query = ?query.text,
                start = ?query.start,
                end = ?query.end,
                max = query.max,
                "calendar search invoked"
            );

            let events = self.source.search(&query).await.map_err(|error| {
                ToolError::execution(format!("failed to search calendar: {}", error.message))
            })?;

            let events: Vec<EventView> = events.iter().map(EventView::from).collect();
            let message = summarize(&query, &events);
            let data = serde_json::to_value(SearchPayload {
                message: &message,
                events: &events,
            })
            .map_err(|error| ToolError::execution(format!("failed to encode events: {error}")))?;

            Ok(ToolOutcome::success(data))
        })
    }
}

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    message: &'a str,
    events: &'a [EventView],
}

#[derive(Debug, Serialize)]
struct EventView {
    title: String,
    start: String,
    end: Option<String>,
    location: Option<String>,
    link: Option<String>,
}

impl From<&CalendarEvent> for EventView {
    fn from(value: &CalendarEvent) -> Self {
        Self {
            title: value.title.clone(),
            start: format_event_time(&value.start),
            end: value.end.as_ref().map(format_event_time),
            location: value.location.clone(),
            link: value.link.clone(),
        }
    }
}

fn format_event_time(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn format_day(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

fn summarize(query: &CalendarQuery, events: &[EventView]) -> String {
    let matching = query.text.as_deref().filter(|text| !text.trim().is_empty());

    if events.is_empty() {
        let window = match (&query.start, &query.end) {
            (Some(start), Some(end)) => {
                format!(" between {} and {}", format_day(start), format_day(end))
            }
            (Some(start), None) => format!(" from {}", format_day(start)),
            (None, Some(end)) => format!(" until {}", format_day(end)),
            (None, None) => String::new(),
        };
        let suffix = match matching {
            Some(text) => format!(" matching '{text}'."),
            None => ".".to_string(),
        };
        return format!("No calendar events found{window}{suffix}");
    }

    let mut summary = format!("Found {} event(s)", events.len());
    if let (Some(start), Some(end)) = (&query.start, &query.end) {
        summary.push_str(&format!(" between {} and {}", format_day(start), format_day(end)));
    }
    if let Some(text) = matching {
        summary.push_str(&format!(" matching '{text}'"));
    }
    summary.push_str(":\n");

    let lines: Vec<String> = events
        .iter()
        .take(SUMMARY_LINES)
        .map(|event| match &event.end {
            Some(end) => format!("- {} ({} - {})", event.title, event.start, end),
            None => format!("- {} ({})", event.title, event.start),
        })
        .collect();
    summary.push_str(&lines.join("\n"));

    if events.len() > SUMMARY_LINES {
        summary.push_str(&format!("\n…and {} more", events.len() - SUMMARY_LINES));
    }
    summary
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (read as UTC) or `YYYY-MM-DD`.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| date_time.and_utc())
}
