use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tracing::debug;

use crate::DateTimeError;

/// Accepted `"{date} {time}"` layouts, in priority order.
const COMPOSITE_FORMATS: [&str; 4] = [
    "%m/%d/%Y %I:%M%p",
    "%m/%d/%Y %I%p",
    "%Y-%m-%d %I:%M%p",
    "%Y-%m-%d %I%p",
];

/// Rewrites a time such as `5 P` or `5:30PM` as `5pm` / `5:30pm`.
///
/// Returns `None` unless the input is a 1-2 digit hour, optional `:MM`
/// minutes, optional whitespace and an `am`/`pm`/`a`/`p` marker. The hour is
/// not range checked here.
#[must_use]
pub fn canonical_time(time: &str) -> Option<String> {
    let time = time.trim();

    let hour_len = time
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(time.len());
    if !(1..=2).contains(&hour_len) {
        return None;
    }
    let (hour, mut rest) = time.split_at(hour_len);

    let mut minutes = None;
    if let Some(after_colon) = rest.strip_prefix(':') {
        let digits = after_colon.get(..2)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        minutes = Some(digits);
        rest = &after_colon[2..];
    }

    let marker = match rest.trim_start().to_ascii_lowercase().as_str() {
        "a" | "am" => "am",
        "p" | "pm" => "pm",
        _ => return None,
    };

    Some(match minutes {
        Some(minutes) => format!("{hour}:{minutes}{marker}"),
        None => format!("{hour}{marker}"),
    })
}

/// Resolves a civil date and time in `timezone` to an absolute instant.
///
/// Ambiguous wall-clock times (when clocks fall back) resolve to the earlier
/// instant. Times skipped when clocks spring forward are rejected.
pub fn normalize_date_time(
    date: &str,
    time: &str,
    timezone: Tz,
) -> Result<DateTime<FixedOffset>, DateTimeError> {
    let date = date.trim();
    let input = format!("{date} {}", time.trim());

    let Some(civil) = canonical_time(time).and_then(|time| parse_civil(date, &time)) else {
        debug!(%input, "no accepted date/time format matched");
        return Err(DateTimeError::Unrecognized(input));
    };

    match timezone.from_local_datetime(&civil) {
        LocalResult::Single(instant) => Ok(instant.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.fixed_offset()),
        LocalResult::None => {
            debug!(%input, timezone = timezone.name(), "wall-clock time does not exist");
            Err(DateTimeError::NonexistentLocalTime {
                input,
                timezone: timezone.name().to_owned(),
            })
        }
    }
}

fn parse_civil(date: &str, canonical_time: &str) -> Option<NaiveDateTime> {
    // `%Y` alone would read `24` as the year 24
    if !has_four_digit_year(date) {
        return None;
    }

    let composite = format!("{date} {canonical_time}");

    COMPOSITE_FORMATS
        .iter()
        .find_map(|format| parse_composite(&composite, format))
}

fn has_four_digit_year(date: &str) -> bool {
    let year = match (date.rsplit_once('/'), date.split_once('-')) {
        (Some((_, year)), _) => year,
        (None, Some((year, _))) => year,
        (None, None) => return false,
    };

    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

/// Hour-only layouts carry no minutes, which chrono needs to build a time.
fn parse_composite(composite: &str, format: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, composite, StrftimeItems::new(format)).ok()?;

    if !format.contains("%M") {
        parsed.set_minute(0).ok()?;
    }

    parsed.to_naive_datetime_with_offset(0).ok()
}

/// Looks up an IANA timezone such as `America/Vancouver`.
pub fn timezone(name: &str) -> Result<Tz, DateTimeError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DateTimeError::UnknownTimezone(name.to_owned()))
}
