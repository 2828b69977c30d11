//! Mirrors created events into the Notion events database.

use serde::Deserialize;
use serde_json::{json, Value};
use tlp_parser::NormalizedEvent;
use tracing::{error, info};

use crate::config::NotionSettings;
use crate::error::{BotError, Result};

const SERVICE: &str = "workspace";
const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_ICON: &str = "⛪";

#[derive(Deserialize)]
struct CreatedPage {
    id: String,
}

pub struct WorkspaceClient {
    http: reqwest::Client,
    api: String,
    settings: NotionSettings,
}

impl WorkspaceClient {
    pub fn new(http: reqwest::Client, settings: NotionSettings) -> Self {
        Self::with_api(http, NOTION_API.to_owned(), settings)
    }

    pub fn with_api(http: reqwest::Client, api: String, settings: NotionSettings) -> Self {
        Self {
            http,
            api,
            settings,
        }
    }

    /// Creates a page linked to the calendar entry and returns its id.
    pub async fn sync_event(&self, event: &NormalizedEvent, calendar_link: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/pages", self.api.trim_end_matches('/')))
            .bearer_auth(&self.settings.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page(event, calendar_link))
            .send()
            .await
            .map_err(|err| BotError::upstream(SERVICE, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, title = %event.title, "creating Notion page failed");
            return Err(BotError::upstream(SERVICE, format!("{status}: {body}")));
        }

        let page: CreatedPage = response
            .json()
            .await
            .map_err(|err| BotError::upstream(SERVICE, err))?;

        info!(page = %page.id, title = %event.title, "event synced to Notion");
        Ok(page.id)
    }

    fn page(&self, event: &NormalizedEvent, calendar_link: &str) -> Value {
        json!({
            "parent": { "database_id": self.settings.database_id },
            "icon": { "type": "emoji", "emoji": PAGE_ICON },
            "properties": {
                "Name": { "title": [{ "text": { "content": event.title } }] },
                "Dates": {
                    "date": {
                        "start": event.start.to_rfc3339(),
                        "end": event.end.map(|end| end.to_rfc3339()),
                    }
                },
                "TLP Projects": { "relation": [{ "id": self.settings.project_id }] },
            },
            "children": [{
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [
                        {
                            "type": "text",
                            "text": { "content": calendar_link, "link": { "url": calendar_link } },
                        },
                        {
                            "type": "text",
                            "text": {
                                "content": format!(
                                    "\nLocation: {}\nDescription: {}\n",
                                    event.location, event.description
                                ),
                            },
                        },
                    ]
                }
            }],
        })
    }
}
