mod config;
mod error;
mod event;
mod normalize;
mod parser;
mod structs;

pub mod display;

#[cfg(feature = "ics")]
mod ics;

pub use chrono_tz::Tz;
pub use config::{EventConfig, DEFAULT_TIMEZONE};
pub use error::{DateTimeError, EventError, ExtractionError, TimeStage};
pub use event::parse_event_text;
pub use normalize::{canonical_time, normalize_date_time, timezone};
pub use parser::{parse_fields, Label};
pub use structs::{CalendarEvent, NormalizedEvent, ParsedEventFields};
