use chrono_tz::Tz;

use crate::{normalize, DateTimeError};

/// Civil timezone event messages are written in unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Vancouver;

/// Settings threaded through every parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventConfig {
    pub timezone: Tz,
}

impl EventConfig {
    #[must_use]
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Builds a config from an IANA zone name such as `America/Toronto`.
    pub fn from_timezone_name(name: &str) -> Result<Self, DateTimeError> {
        normalize::timezone(name).map(Self::new)
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}
