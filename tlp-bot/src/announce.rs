use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{ChannelId, CreateEmbed, CreateMessage, Http};
use tracing::info;

use crate::error::Result;
use crate::render::Embed;

/// Posts a message to a channel outside of any interaction.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, channel: ChannelId, content: Option<&str>, embed: Embed) -> Result<()>;
}

pub struct DiscordAnnouncer {
    http: Arc<Http>,
}

impl DiscordAnnouncer {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Announcer for DiscordAnnouncer {
    async fn announce(&self, channel: ChannelId, content: Option<&str>, embed: Embed) -> Result<()> {
        let title = embed.title.clone();
        let mut message = CreateMessage::new().embed(CreateEmbed::from(embed));
        if let Some(content) = content {
            message = message.content(content);
        }

        channel.send_message(&self.http, message).await?;
        info!(%channel, %title, "announcement posted");
        Ok(())
    }
}
