use chrono::{DateTime, FixedOffset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The six labelled values of an event message, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEventFields {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub location: String,
}

/// A fully dated event, ready to be sent to the calendar and workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedEvent {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "startDateTime"))]
    pub start: DateTime<FixedOffset>,
    #[cfg_attr(feature = "serde", serde(rename = "endDateTime"))]
    pub end: Option<DateTime<FixedOffset>>,
    pub description: String,
    pub location: String,
}

/// An event as reported back by the calendar service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<FixedOffset>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub end: Option<DateTime<FixedOffset>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub html_link: Option<String>,
}
