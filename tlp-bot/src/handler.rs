use serenity::all::{
    Command, CommandInteraction, Context, CreateAttachment, CreateEmbed,
    CreateInteractionResponseFollowup, EventHandler, Interaction, Ready,
};
use serenity::async_trait;
use tracing::{error, info};

use crate::commands::{self, Commands, Reply};

pub struct Handler {
    commands: Commands,
}

impl Handler {
    pub fn new(commands: Commands) -> Self {
        Self { commands }
    }

    async fn respond(&self, ctx: &Context, command: &CommandInteraction) -> serenity::Result<()> {
        // every command may outlive the three second window, and the deferral
        // fixes whether the followup is visible to everyone
        if commands::is_private(&command.data.name) {
            command.defer_ephemeral(&ctx.http).await?;
        } else {
            command.defer(&ctx.http).await?;
        }

        let argument = command
            .data
            .options
            .first()
            .and_then(|option| option.value.as_str());

        let reply = self.commands.run(&command.data.name, argument).await;
        command.create_followup(&ctx.http, followup(reply)).await?;
        Ok(())
    }
}

fn followup(reply: Reply) -> CreateInteractionResponseFollowup {
    let mut followup = CreateInteractionResponseFollowup::new().ephemeral(reply.ephemeral);

    if let Some(content) = reply.content {
        followup = followup.content(content);
    }
    if let Some(embed) = reply.embed {
        followup = followup.embed(CreateEmbed::from(embed));
    }
    if let Some(attachment) = reply.attachment {
        followup = followup.add_file(CreateAttachment::bytes(attachment.data, attachment.filename));
    }

    followup
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.tag(), "connected to Discord");

        match Command::set_global_commands(&ctx.http, commands::definitions()).await {
            Ok(registered) => info!(count = registered.len(), "slash commands registered"),
            Err(err) => error!(%err, "registering slash commands failed"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        info!(command = %command.data.name, user = %command.user.name, "command received");

        if let Err(err) = self.respond(&ctx, &command).await {
            error!(%err, command = %command.data.name, "responding to command failed");
        }
    }
}
