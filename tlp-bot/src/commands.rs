use std::sync::Arc;

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};
use tlp_parser::{parse_event_text, EventConfig, EventError};
use tracing::{info, warn};

use crate::calendar::CalendarClient;
use crate::error::{BotError, Result};
use crate::render::{self, Embed, Period};
use crate::workspace::WorkspaceClient;

pub const HELLO: &str = "hello";
pub const EVENT: &str = "event";
pub const FIND: &str = "find";
pub const WEEK: &str = "week";
pub const MONTH: &str = "month";

const EVENT_TEMPLATE: &str = "Event Name: … Date: MM/DD/YYYY Start Time: 5pm End Time: 7pm Description: … Location: …";

pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(HELLO).description("Say hello to our TLP Bot!"),
        CreateCommand::new(EVENT)
            .description("Create a new event")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "details", "Event details")
                    .required(true),
            ),
        CreateCommand::new(FIND)
            .description("Look up an event by name")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "name", "Event name")
                    .required(true),
            ),
        CreateCommand::new(WEEK).description("Show this week's events"),
        CreateCommand::new(MONTH).description("Show this month's events"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub attachment: Option<Attachment>,
    pub ephemeral: bool,
}

impl Reply {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
            attachment: None,
            ephemeral: false,
        }
    }

    fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
            attachment: None,
            ephemeral: false,
        }
    }
}

/// Whether the command's response, including any failure, is shown only to
/// the caller. The interaction is deferred with the same visibility, so it
/// cannot change once the command runs.
pub fn is_private(name: &str) -> bool {
    !matches!(name, HELLO | FIND | WEEK | MONTH)
}

/// What a person sees when a command fails.
fn describe(err: &BotError) -> String {
    match err {
        BotError::Event(EventError::Extraction(reason)) => format!(
            "❌ I couldn't read that event ({reason}). Please use:\n`{EVENT_TEMPLATE}`"
        ),
        BotError::Event(EventError::DateTime { stage, source }) => {
            format!("❌ The {stage} time is invalid: {source}.")
        }
        BotError::Upstream { service, reason } => {
            format!("❌ The {service} service is unavailable right now ({reason}).")
        }
        _ => "❌ Something went wrong, please try again later.".into(),
    }
}

pub struct Commands {
    calendar: Arc<CalendarClient>,
    workspace: Option<WorkspaceClient>,
    events: EventConfig,
}

impl Commands {
    pub fn new(
        calendar: Arc<CalendarClient>,
        workspace: Option<WorkspaceClient>,
        events: EventConfig,
    ) -> Self {
        Self {
            calendar,
            workspace,
            events,
        }
    }

    /// Runs a slash command given its name and first string option.
    pub async fn run(&self, name: &str, argument: Option<&str>) -> Reply {
        let result = match (name, argument) {
            (HELLO, _) => Ok(Reply::text("👋 Hello!")),
            (EVENT, Some(details)) => self.create_event(details).await,
            (FIND, Some(name)) => self.find(name).await,
            (WEEK, _) => self.upcoming(Period::Weekly).await,
            (MONTH, _) => self.upcoming(Period::Monthly).await,
            (EVENT | FIND, None) => Ok(Reply::text("❌ This command needs a value.")),
            _ => Ok(Reply::text("Unknown command")),
        };

        let reply = result.unwrap_or_else(|err| {
            warn!(command = name, %err, "command failed");
            Reply::text(describe(&err))
        });

        Reply {
            ephemeral: is_private(name),
            ..reply
        }
    }

    async fn create_event(&self, details: &str) -> Result<Reply> {
        let event = parse_event_text(details, &self.events)?;
        let link = self.calendar.create_event(&event).await?;

        let mut content = String::from("✅ Event created successfully");

        if let Some(workspace) = &self.workspace {
            // the calendar entry stands even if the mirror fails
            if let Err(err) = workspace.sync_event(&event, &link).await {
                warn!(%err, title = %event.title, "Notion sync failed");
                content.push_str(&format!("\n⚠️ {}", describe(&err).trim_start_matches("❌ ")));
            }
        }

        info!(title = %event.title, "event created from command");

        Ok(Reply {
            content: Some(content),
            embed: Some(render::created_event(&event, &link, self.events.timezone)),
            attachment: Some(Attachment {
                filename: "event.ics".into(),
                data: event.to_ics().to_string().into_bytes(),
            }),
            ephemeral: false,
        })
    }

    async fn find(&self, name: &str) -> Result<Reply> {
        let events = self.calendar.find_by_name(name).await?;
        Ok(Reply::embed(render::event_details(
            name.trim(),
            &events,
            self.events.timezone,
        )))
    }

    async fn upcoming(&self, period: Period) -> Result<Reply> {
        let events = match period {
            Period::Weekly => self.calendar.this_week().await?,
            Period::Monthly => self.calendar.this_month().await?,
        };

        Ok(Reply::embed(render::reminders(
            &events,
            period,
            self.events.timezone,
        )))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cache::{Cache, Config};
    use crate::config::NotionSettings;

    const CONCERT: &str = "Event Name: Fall Concert Date: 11/04/2024 Start Time: 5pm End Time: 7pm Description: Annual concert Location: Main Hall";

    fn commands(calendar: &MockServer, notion: Option<&MockServer>) -> Commands {
        let calendar = CalendarClient::new(
            reqwest::Client::new(),
            format!("{}/exec", calendar.uri()),
            Cache::new(Config {
                enabled: false,
                ttl: Duration::from_secs(60),
            }),
        );

        let workspace = notion.map(|server| {
            WorkspaceClient::with_api(
                reqwest::Client::new(),
                server.uri(),
                NotionSettings {
                    token: "secret".into(),
                    database_id: "db".into(),
                    project_id: "project".into(),
                },
            )
        });

        Commands::new(Arc::new(calendar), workspace, EventConfig::default())
    }

    async fn calendar_accepting_events() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/exec"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "link": "https://calendar.example/e/1" })),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn hello_and_unknown() {
        let server = MockServer::start().await;
        let commands = commands(&server, None);

        assert_eq!(commands.run(HELLO, None).await, Reply::text("👋 Hello!"));

        let unknown = commands.run("dance", None).await;
        assert_eq!(unknown.content.as_deref(), Some("Unknown command"));
        assert!(unknown.ephemeral);
    }

    #[tokio::test]
    async fn visibility_is_fixed_per_command() {
        let calendar = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&calendar)
            .await;

        let commands = commands(&calendar, None);

        // public commands stay public when they fail
        for (name, argument) in [(FIND, Some("Potluck")), (WEEK, None), (MONTH, None)] {
            let reply = commands.run(name, argument).await;
            assert!(!reply.ephemeral, "{name}");
            assert!(reply
                .content
                .unwrap()
                .starts_with("❌ The calendar service is unavailable"));
        }

        let reply = commands.run(EVENT, Some("no labels here")).await;
        assert!(reply.ephemeral);
        assert!(is_private(EVENT) && is_private("dance"));
        assert!(!is_private(HELLO));
    }

    #[tokio::test]
    async fn event_creates_syncs_and_attaches_ics() {
        let calendar = calendar_accepting_events().await;
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-1" })))
            .expect(1)
            .mount(&notion)
            .await;

        let reply = commands(&calendar, Some(&notion))
            .run(EVENT, Some(CONCERT))
            .await;

        assert!(reply.ephemeral);
        assert_eq!(reply.content.as_deref(), Some("✅ Event created successfully"));
        assert_eq!(reply.embed.unwrap().title, "✅ Fall Concert");

        let attachment = reply.attachment.unwrap();
        assert_eq!(attachment.filename, "event.ics");
        assert!(String::from_utf8(attachment.data)
            .unwrap()
            .contains("DTSTART:20241105T010000Z"));
    }

    #[tokio::test]
    async fn workspace_failure_is_reported_but_event_stands() {
        let calendar = calendar_accepting_events().await;
        let notion = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&notion)
            .await;

        let reply = commands(&calendar, Some(&notion))
            .run(EVENT, Some(CONCERT))
            .await;

        let content = reply.content.unwrap();
        assert!(content.starts_with("✅ Event created successfully\n⚠️ The workspace service"));
        assert!(reply.embed.is_some());
    }

    #[tokio::test]
    async fn unparseable_text_never_reaches_the_calendar() {
        let calendar = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&calendar)
            .await;

        let commands = commands(&calendar, None);

        let reply = commands.run(EVENT, Some("Fall Concert tomorrow at 5")).await;
        assert!(reply.ephemeral);
        assert!(reply
            .content
            .unwrap()
            .starts_with("❌ I couldn't read that event (missing `Event Name` label)"));

        let reply = commands
            .run(EVENT, Some(&CONCERT.replace("7pm", "13pm")))
            .await;
        assert!(reply
            .content
            .unwrap()
            .starts_with("❌ The end time is invalid"));
    }

    #[tokio::test]
    async fn calendar_outage_is_an_upstream_failure() {
        let calendar = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&calendar)
            .await;

        let reply = commands(&calendar, None).run(EVENT, Some(CONCERT)).await;

        assert!(reply
            .content
            .unwrap()
            .starts_with("❌ The calendar service is unavailable right now"));
        assert!(reply.embed.is_none());
    }

    #[tokio::test]
    async fn find_and_week_render_embeds() {
        let calendar = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("name", "Potluck"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "title": "Potluck",
                "start": "2024-11-05T01:00:00Z",
            }])))
            .mount(&calendar)
            .await;
        Mock::given(method("GET"))
            .and(query_param("range", "week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&calendar)
            .await;

        let commands = commands(&calendar, None);

        let found = commands.run(FIND, Some("Potluck")).await.embed.unwrap();
        assert_eq!(found.fields[0].name, "Potluck");
        assert_eq!(found.fields[0].value, "📅 November 4, 2024\n5:00 PM");

        let week = commands.run(WEEK, None).await.embed.unwrap();
        assert_eq!(week.description.as_deref(), Some("No events scheduled."));
    }
}
