use std::fmt;
use std::ops::Range;

use tracing::debug;

use crate::{canonical_time, ExtractionError, ParsedEventFields};

/// Field labels of an event message, in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    EventName,
    Date,
    StartTime,
    EndTime,
    Description,
    Location,
}

impl Label {
    pub const ORDER: [Label; 6] = [
        Label::EventName,
        Label::Date,
        Label::StartTime,
        Label::EndTime,
        Label::Description,
        Label::Location,
    ];

    /// The label as written in a message, colon included.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::EventName => "Event Name:",
            Self::Date => "Date:",
            Self::StartTime => "Start Time:",
            Self::EndTime => "End Time:",
            Self::Description => "Description:",
            Self::Location => "Location:",
        }
    }

    /// The label whose token ends this label's value.
    #[must_use]
    pub const fn next(self) -> Option<Label> {
        match self {
            Self::EventName => Some(Self::Date),
            Self::Date => Some(Self::StartTime),
            Self::StartTime => Some(Self::EndTime),
            Self::EndTime => Some(Self::Description),
            Self::Description => Some(Self::Location),
            Self::Location => None,
        }
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Description)
    }

    const fn needle(self) -> &'static str {
        match self {
            Self::EventName => "event name:",
            Self::Date => "date:",
            Self::StartTime => "start time:",
            Self::EndTime => "end time:",
            Self::Description => "description:",
            Self::Location => "location:",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().trim_end_matches(':'))
    }
}

/// Splits an event message into its six labelled values.
///
/// Labels match case-insensitively and only at the start of a word. Each value
/// runs from its label to the next label in [`Label::ORDER`]; the location runs
/// to the end of the text. Either every field is returned or none is.
pub fn parse_fields<S: AsRef<str>>(text: S) -> Result<ParsedEventFields, ExtractionError> {
    let result = extract(text.as_ref());

    if let Err(err) = &result {
        debug!(%err, "event text did not match the label layout");
    }

    result
}

fn extract(text: &str) -> Result<ParsedEventFields, ExtractionError> {
    let mut sections = Sections::new(text)?;

    let title = sections.take(Label::EventName)?;
    let date = sections.take(Label::Date)?;
    let start_time = time_value(Label::StartTime, sections.take(Label::StartTime)?)?;
    let end_time = time_value(Label::EndTime, sections.take(Label::EndTime)?)?;
    let description = sections.take(Label::Description)?;
    let location = sections.take(Label::Location)?;

    Ok(ParsedEventFields {
        title: title.to_owned(),
        date: date.to_owned(),
        start_time: start_time.to_owned(),
        end_time: end_time.to_owned(),
        description: description.to_owned(),
        location: location.to_owned(),
    })
}

fn time_value(label: Label, value: &str) -> Result<&str, ExtractionError> {
    match canonical_time(value) {
        Some(_) => Ok(value),
        None => Err(ExtractionError::MalformedTime {
            label,
            value: value.to_owned(),
        }),
    }
}

/// Walks the text label by label.
struct Sections<'a> {
    text: &'a str,
    // ASCII-lowercased copy of `text`; byte offsets are shared.
    haystack: String,
    cursor: usize,
}

impl<'a> Sections<'a> {
    fn new(text: &'a str) -> Result<Self, ExtractionError> {
        let haystack = text.to_ascii_lowercase();
        let first = find_label(&haystack, Label::EventName, 0)
            .ok_or(ExtractionError::MissingLabel(Label::EventName))?;

        Ok(Self {
            text,
            haystack,
            cursor: first.end,
        })
    }

    /// Returns the trimmed value of `label`, whose token ends at the cursor.
    fn take(&mut self, label: Label) -> Result<&'a str, ExtractionError> {
        let start = self.cursor;

        let end = match label.next() {
            Some(next) => {
                let span = find_label(&self.haystack, next, start)
                    .ok_or(ExtractionError::MissingLabel(next))?;
                self.cursor = span.end;
                span.start
            }
            None => {
                self.cursor = self.text.len();
                self.text.len()
            }
        };

        let value = self.text[start..end].trim();

        if value.is_empty() && label.is_required() {
            return Err(ExtractionError::EmptyField(label));
        }

        Ok(value)
    }
}

fn find_label(haystack: &str, label: Label, from: usize) -> Option<Range<usize>> {
    let needle = label.needle();
    let mut offset = from;

    while let Some(found) = haystack[offset..].find(needle) {
        let start = offset + found;
        let at_word_start = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());

        if at_word_start {
            return Some(start..start + needle.len());
        }

        // needles start with an ASCII letter, so this stays on a char boundary
        offset = start + 1;
    }

    None
}
