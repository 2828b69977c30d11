use tracing::debug;

use crate::{
    normalize_date_time, parse_fields, EventConfig, EventError, NormalizedEvent, TimeStage,
};

/// Parses an event message into a fully dated event.
///
/// Fails with [`EventError::Extraction`] when the labels cannot be split out,
/// or with [`EventError::DateTime`] naming the time that did not resolve.
/// Nothing partially dated is ever returned.
pub fn parse_event_text<S: AsRef<str>>(
    text: S,
    config: &EventConfig,
) -> Result<NormalizedEvent, EventError> {
    let fields = parse_fields(text)?;

    let resolve = |stage: TimeStage, time: &str| {
        normalize_date_time(&fields.date, time, config.timezone).map_err(|source| {
            debug!(%stage, %source, "event time did not resolve");
            EventError::DateTime { stage, source }
        })
    };

    let start = resolve(TimeStage::Start, &fields.start_time)?;
    let end = resolve(TimeStage::End, &fields.end_time)?;

    Ok(NormalizedEvent {
        title: fields.title,
        start,
        end: Some(end),
        description: fields.description,
        location: fields.location,
    })
}
