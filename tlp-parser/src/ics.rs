use chrono::{DateTime, FixedOffset, Utc};
use ics::properties::{Description, DtEnd, DtStart, Location, Summary};

use crate::NormalizedEvent;

const PRODUCT_ID: &str = "-//TLP//Events Bot//EN";

fn utc_stamp(instant: &DateTime<FixedOffset>) -> String {
    instant
        .with_timezone(&Utc)
        .format("%Y%m%dT%H%M%SZ")
        .to_string()
}

impl NormalizedEvent {
    /// A one-event calendar people can import into their own calendar app.
    #[must_use]
    pub fn to_ics(&self) -> ics::ICalendar<'_> {
        let mut icalendar = ics::ICalendar::new("2.0", PRODUCT_ID);
        icalendar.add_event(self.to_ics_event());
        icalendar
    }

    fn to_ics_event(&self) -> ics::Event<'_> {
        let start = utc_stamp(&self.start);
        let id = format!("{}_{}", start, self.title.replace(' ', "-"));

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        if let Some(end) = &self.end {
            ics_event.push(DtEnd::new(utc_stamp(end)));
        }
        ics_event.push(Summary::new(&self.title));
        ics_event.push(Location::new(&self.location));

        if !self.description.is_empty() {
            ics_event.push(Description::new(&self.description));
        }

        ics_event
    }
}
