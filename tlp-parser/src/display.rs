//! Re-projects instants into a civil timezone for people to read.
//!
//! `civil_date` and `civil_time` produce layouts the normalizer accepts, so
//! their output can be fed back through [`crate::normalize_date_time`].

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

/// `11/04/2024`
#[must_use]
pub fn civil_date<O: TimeZone>(instant: &DateTime<O>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%m/%d/%Y").to_string()
}

/// `5:00pm`
#[must_use]
pub fn civil_time<O: TimeZone>(instant: &DateTime<O>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%-I:%M%P").to_string()
}

/// `November 4, 2024`
#[must_use]
pub fn long_date<O: TimeZone>(instant: &DateTime<O>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%B %-d, %Y").to_string()
}

/// `5:00 PM`
#[must_use]
pub fn clock_time<O: TimeZone>(instant: &DateTime<O>, timezone: Tz) -> String {
    instant.with_timezone(&timezone).format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono_tz::America::Vancouver;

    use super::*;

    #[test]
    fn formats_in_the_civil_timezone() {
        let instant = DateTime::parse_from_rfc3339("2024-11-05T01:05:00Z").unwrap();

        assert_eq!(civil_date(&instant, Vancouver), "11/04/2024");
        assert_eq!(civil_time(&instant, Vancouver), "5:05pm");
        assert_eq!(long_date(&instant, Vancouver), "November 4, 2024");
        assert_eq!(clock_time(&instant, Vancouver), "5:05 PM");
    }
}
