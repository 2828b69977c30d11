//! Client for the Apps Script web app that owns the shared Google Calendar.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tlp_parser::{CalendarEvent, NormalizedEvent};
use tracing::{debug, error, info};

use crate::cache::Cache;
use crate::error::{BotError, Result};

const SERVICE: &str = "calendar";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalendarQuery {
    Name(String),
    ThisWeek,
    ThisMonth,
}

impl CalendarQuery {
    fn params(&self) -> [(&'static str, &str); 1] {
        match self {
            Self::Name(name) => [("name", name.as_str())],
            Self::ThisWeek => [("range", "week")],
            Self::ThisMonth => [("range", "month")],
        }
    }
}

#[derive(Serialize)]
struct CreateEventRequest<'a> {
    event: &'a NormalizedEvent,
}

#[derive(Deserialize)]
struct CreateEventResponse {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<CalendarEvent>),
    One(CalendarEvent),
}

impl From<OneOrMany> for Vec<CalendarEvent> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(events) => events,
            OneOrMany::One(event) => vec![event],
        }
    }
}

pub struct CalendarClient {
    http: reqwest::Client,
    url: String,
    cache: Arc<Cache<CalendarQuery, Vec<CalendarEvent>>>,
}

impl CalendarClient {
    pub fn new(
        http: reqwest::Client,
        url: String,
        cache: Arc<Cache<CalendarQuery, Vec<CalendarEvent>>>,
    ) -> Self {
        Self { http, url, cache }
    }

    /// Creates the event and returns its calendar link.
    pub async fn create_event(&self, event: &NormalizedEvent) -> Result<String> {
        let response = self
            .http
            .post(&self.url)
            .json(&CreateEventRequest { event })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                error!(%err, title = %event.title, "creating calendar event failed");
                BotError::upstream(SERVICE, err)
            })?;

        let body: CreateEventResponse = response
            .json()
            .await
            .map_err(|err| BotError::upstream(SERVICE, err))?;

        if let Some(reason) = body.error {
            error!(%reason, title = %event.title, "calendar rejected event");
            return Err(BotError::upstream(SERVICE, reason));
        }

        let link = body
            .link
            .ok_or_else(|| BotError::upstream(SERVICE, "response carried no event link"))?;

        // new event invalidates every cached listing
        self.cache.clear();
        info!(title = %event.title, %link, "calendar event created");

        Ok(link)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Arc<Vec<CalendarEvent>>> {
        self.query(CalendarQuery::Name(name.trim().to_owned())).await
    }

    pub async fn this_week(&self) -> Result<Arc<Vec<CalendarEvent>>> {
        self.query(CalendarQuery::ThisWeek).await
    }

    pub async fn this_month(&self) -> Result<Arc<Vec<CalendarEvent>>> {
        self.query(CalendarQuery::ThisMonth).await
    }

    async fn query(&self, query: CalendarQuery) -> Result<Arc<Vec<CalendarEvent>>> {
        if let Some(events) = self.cache.get(&query) {
            debug!(?query, "calendar query served from cache");
            return Ok(events);
        }

        let events: OneOrMany = self
            .http
            .get(&self.url)
            .query(&query.params())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                error!(%err, ?query, "calendar query failed");
                BotError::upstream(SERVICE, err)
            })?
            .json()
            .await
            .map_err(|err| BotError::upstream(SERVICE, err))?;

        let events = Vec::from(events);
        debug!(?query, count = events.len(), "calendar query answered");

        Ok(self.cache.insert(query, events))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tlp_parser::{parse_event_text, EventConfig};
    use tokio::time::Duration;
    use wiremock::matchers::{body_partial_json, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cache::Config;

    fn client(server: &MockServer, enable_cache: bool) -> CalendarClient {
        CalendarClient::new(
            reqwest::Client::new(),
            server.uri(),
            Cache::new(Config {
                enabled: enable_cache,
                ttl: Duration::from_secs(3600),
            }),
        )
    }

    fn concert() -> NormalizedEvent {
        parse_event_text(
            "Event Name: Fall Concert\nDate: 11/04/2024\nStart Time: 5pm\nEnd Time: 7pm\nDescription: Annual concert\nLocation: Main Hall",
            &EventConfig::default(),
        )
        .unwrap()
    }

    fn event_json(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "start": "2024-11-05T01:00:00.000Z",
            "end": "2024-11-05T03:00:00.000Z",
            "location": "Main Hall",
            "description": "Annual concert",
            "htmlLink": "https://calendar.example/event?eid=1",
        })
    }

    #[tokio::test]
    async fn create_event_posts_the_normalized_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "event": {
                    "title": "Fall Concert",
                    "startDateTime": "2024-11-04T17:00:00-08:00",
                    "endDateTime": "2024-11-04T19:00:00-08:00",
                    "location": "Main Hall",
                }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "link": "https://calendar.example/e/1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let link = client(&server, false).create_event(&concert()).await.unwrap();

        assert_eq!(link, "https://calendar.example/e/1");
    }

    #[tokio::test]
    async fn create_event_surfaces_script_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "calendar is read-only" })),
            )
            .mount(&server)
            .await;

        let err = client(&server, false)
            .create_event(&concert())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BotError::Upstream { service: "calendar", ref reason } if reason == "calendar is read-only"
        ));
    }

    #[tokio::test]
    async fn http_failures_are_upstream_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client(&server, false).this_week().await.unwrap_err();

        assert!(matches!(err, BotError::Upstream { service: "calendar", .. }));
    }

    #[tokio::test]
    async fn queries_accept_one_or_many_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("name", "Fall Concert"))
            .respond_with(ResponseTemplate::new(200).set_body_json(event_json("Fall Concert")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("range", "month"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                event_json("Fall Concert"),
                event_json("Potluck"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("range", "week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client(&server, false);

        let found = client.find_by_name(" Fall Concert ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].html_link.as_deref(),
            Some("https://calendar.example/event?eid=1")
        );

        assert_eq!(client.this_month().await.unwrap().len(), 2);
        assert!(client.this_week().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cached_queries_skip_the_network_until_an_event_is_created() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("range", "week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("Potluck")])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "link": "https://calendar.example/e/2" })),
            )
            .mount(&server)
            .await;

        let client = client(&server, true);

        client.this_week().await.unwrap();
        client.this_week().await.unwrap();
        client.create_event(&concert()).await.unwrap();
        client.this_week().await.unwrap();
    }
}
