use std::env;

use serenity::all::ChannelId;
use thiserror::Error;

pub const DISCORD_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const GOOGLE_APP_SCRIPT_URL: &str = "GOOGLE_APP_SCRIPT_URL";
pub const NOTION_INTEGRATION_TOKEN: &str = "NOTION_INTEGRATION_TOKEN";
pub const NOTION_DATABASE_ID: &str = "NOTION_DATABASE_ID";
pub const NOTION_EVENT_PROJECT_ID: &str = "NOTION_EVENT_PROJECT_ID";
pub const DISCORD_ANNOUNCEMENTS_CHANNEL_ID: &str = "DISCORD_ANNOUNCEMENTS_CHANNEL_ID";
pub const DISCORD_EVENT_REQUEST_CHANNEL_ID: &str = "DISCORD_EVENT_REQUEST_CHANNEL_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` environment variable is not set")]
    Missing(&'static str),
    #[error("`{0}` environment variable is not a valid channel id")]
    InvalidChannel(&'static str),
    #[error("Notion sync needs all of `NOTION_INTEGRATION_TOKEN`, `NOTION_DATABASE_ID` and `NOTION_EVENT_PROJECT_ID`")]
    IncompleteNotion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionSettings {
    pub token: String,
    pub database_id: String,
    pub project_id: String,
}

/// Secrets and endpoints read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub discord_token: String,
    pub calendar_url: String,
    pub notion: Option<NotionSettings>,
    pub announcements_channel: Option<ChannelId>,
    pub event_request_channel: Option<ChannelId>,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is normal in deployments
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| value(key).ok_or(ConfigError::Missing(key));
        let channel = |key: &'static str| {
            value(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .ok()
                        .filter(|id| *id != 0)
                        .map(ChannelId::new)
                        .ok_or(ConfigError::InvalidChannel(key))
                })
                .transpose()
        };

        let notion = match (
            value(NOTION_INTEGRATION_TOKEN),
            value(NOTION_DATABASE_ID),
            value(NOTION_EVENT_PROJECT_ID),
        ) {
            (Some(token), Some(database_id), Some(project_id)) => Some(NotionSettings {
                token,
                database_id,
                project_id,
            }),
            (None, None, None) => None,
            _ => return Err(ConfigError::IncompleteNotion),
        };

        Ok(Self {
            discord_token: required(DISCORD_BOT_TOKEN)?,
            calendar_url: required(GOOGLE_APP_SCRIPT_URL)?,
            notion,
            announcements_channel: channel(DISCORD_ANNOUNCEMENTS_CHANNEL_ID)?,
            event_request_channel: channel(DISCORD_EVENT_REQUEST_CHANNEL_ID)?,
        })
    }
}
