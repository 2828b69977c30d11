//! Turns events into Discord embeds.

use chrono::{DateTime, FixedOffset};
use serenity::all::{Colour, CreateEmbed, Timestamp};
use tlp_parser::display::{clock_time, long_date};
use tlp_parser::{CalendarEvent, NormalizedEvent, Tz};

pub const CALENDAR_BLUE: u32 = 0x4285F4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Field {
    fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Embed contents kept apart from serenity's builder so they can be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub fields: Vec<Field>,
    pub timestamped: bool,
}

impl Embed {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: None,
            fields: Vec::new(),
            timestamped: false,
        }
    }
}

impl From<Embed> for CreateEmbed {
    fn from(embed: Embed) -> Self {
        let mut builder = CreateEmbed::new()
            .title(embed.title)
            .colour(Colour::new(CALENDAR_BLUE));

        if let Some(description) = embed.description {
            builder = builder.description(description);
        }
        if let Some(url) = embed.url {
            builder = builder.url(url);
        }
        if embed.timestamped {
            builder = builder.timestamp(Timestamp::now());
        }

        builder.fields(
            embed
                .fields
                .into_iter()
                .map(|field| (field.name, field.value, field.inline)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Weekly,
    Monthly,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    pub fn announcement(self) -> &'static str {
        match self {
            Self::Weekly => "📅 Weekly planning time! Here are this week's events.",
            Self::Monthly => "📅 Monthly planning time! Here are this month's events.",
        }
    }
}

fn when(start: &DateTime<FixedOffset>, end: Option<&DateTime<FixedOffset>>, timezone: Tz) -> String {
    let date = long_date(start, timezone);
    match end {
        Some(end) => format!(
            "📅 {date}\n{} - {}",
            clock_time(start, timezone),
            clock_time(end, timezone)
        ),
        None => format!("📅 {date}\n{}", clock_time(start, timezone)),
    }
}

fn calendar_link(link: &str) -> String {
    format!("[View in Google Calendar]({link})")
}

/// The embed posted by the weekly and monthly reminders and `/week`, `/month`.
pub fn reminders(events: &[CalendarEvent], period: Period, timezone: Tz) -> Embed {
    let mut embed = Embed::new(format!("📅 {} Event Reminder", period.label()));
    embed.timestamped = true;

    if events.is_empty() {
        embed.description = Some("No events scheduled.".into());
        return embed;
    }

    for (index, event) in events.iter().enumerate() {
        embed.fields.push(Field::new(
            format!("{}. {}", index + 1, event.title),
            when(&event.start, event.end.as_ref(), timezone),
            false,
        ));

        if let Some(link) = &event.html_link {
            embed
                .fields
                .push(Field::new("🔗 Event Link", calendar_link(link), false));
        }
    }

    embed
}

/// Details of the events matching a `/find` lookup.
pub fn event_details(name: &str, events: &[CalendarEvent], timezone: Tz) -> Embed {
    let mut embed = Embed::new(format!("🔎 Events matching \"{name}\""));

    if events.is_empty() {
        embed.description = Some("No matching events found.".into());
        return embed;
    }

    for event in events {
        let mut value = when(&event.start, event.end.as_ref(), timezone);

        if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
            value.push_str(&format!("\n📍 {location}"));
        }
        if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
            value.push_str(&format!("\n{description}"));
        }
        if let Some(link) = &event.html_link {
            value.push_str(&format!("\n{}", calendar_link(link)));
        }

        embed.fields.push(Field::new(event.title.clone(), value, false));
    }

    embed
}

/// Confirmation shown after `/event` creates an event.
pub fn created_event(event: &NormalizedEvent, link: &str, timezone: Tz) -> Embed {
    let mut embed = Embed::new(format!("✅ {}", event.title));
    embed.url = Some(link.to_owned());

    if !event.description.is_empty() {
        embed.description = Some(event.description.clone());
    }

    embed.fields.push(Field::new(
        "When",
        when(&event.start, event.end.as_ref(), timezone),
        true,
    ));
    embed
        .fields
        .push(Field::new("Where", format!("📍 {}", event.location), true));
    embed
        .fields
        .push(Field::new("🔗 Event Link", calendar_link(link), false));

    embed
}

/// Posted to the review channel when someone submits an event request form.
pub fn event_request(link: &str) -> Embed {
    let mut embed = Embed::new("New Event Request Pending Review");
    embed.fields.push(Field::new(
        "🔗 Details",
        format!("[View in Google Docs]({link})"),
        true,
    ));
    embed
}
