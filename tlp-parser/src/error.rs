use std::fmt;

use thiserror::Error;

use crate::Label;

/// The message did not follow the `Event Name: ... Location: ...` layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("missing `{0}` label")]
    MissingLabel(Label),
    #[error("`{0}` has no value")]
    EmptyField(Label),
    #[error("`{label}` value `{value}` is not a time like 5pm or 5:30 pm")]
    MalformedTime { label: Label, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("`{0}` is not a valid MM/DD/YYYY or YYYY-MM-DD date and time")]
    Unrecognized(String),
    #[error("`{input}` does not exist in {timezone}")]
    NonexistentLocalTime { input: String, timezone: String },
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
}

/// Which time of the event failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStage {
    Start,
    End,
}

impl fmt::Display for TimeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("unparseable event text: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("invalid {stage} date/time: {source}")]
    DateTime {
        stage: TimeStage,
        #[source]
        source: DateTimeError,
    },
}

impl EventError {
    /// `None` when the text itself could not be split into fields.
    #[must_use]
    pub fn stage(&self) -> Option<TimeStage> {
        match self {
            Self::Extraction(_) => None,
            Self::DateTime { stage, .. } => Some(*stage),
        }
    }
}
