use std::{env, process, sync::Arc};

use serenity::all::GatewayIntents;
use serenity::Client;
use tlp_parser::EventConfig;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::announce::{Announcer, DiscordAnnouncer};
use crate::cache::Cache;
use crate::calendar::CalendarClient;
use crate::commands::Commands;
use crate::config::Settings;
use crate::error::Result;
use crate::handler::Handler;
use crate::reminders::Reminders;
use crate::server::ServerState;
use crate::workspace::WorkspaceClient;

mod announce;
mod cache;
mod calendar;
mod cli;
mod commands;
mod config;
mod error;
mod handler;
mod reminders;
mod render;
mod server;
mod workspace;

const LOG: &str = "LOG";
const DEFAULT_LOG: &str = "tlp_bot=info,tlp_parser=info";

fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    if let Err(err) = run(args).await {
        error!(%err, "bot stopped");
        process::exit(1);
    }
}

async fn run(args: cli::Args) -> Result<()> {
    let settings = Settings::from_env()?;
    let http = reqwest::Client::new();
    let events = EventConfig::new(args.timezone);

    let calendar = Arc::new(CalendarClient::new(
        http.clone(),
        settings.calendar_url,
        Cache::new(cache::Config {
            enabled: args.enable_cache,
            ttl: args.cache_ttl,
        }),
    ));

    let workspace = match settings.notion {
        Some(notion) => Some(WorkspaceClient::new(http, notion)),
        None => {
            warn!("Notion is not configured, events will not be mirrored");
            None
        }
    };

    let handler = Handler::new(Commands::new(Arc::clone(&calendar), workspace, events));

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&settings.discord_token, intents)
        .event_handler(handler)
        .await?;

    let announcer: Arc<dyn Announcer> =
        Arc::new(DiscordAnnouncer::new(Arc::clone(&client.http)));

    let _scheduler = match settings.announcements_channel {
        Some(channel) => Some(
            Reminders::new(calendar, Arc::clone(&announcer), channel, args.timezone)
                .start()
                .await?,
        ),
        None => {
            warn!("no announcements channel configured, reminders are disabled");
            None
        }
    };

    let state = Arc::new(ServerState {
        announcer,
        event_request_channel: settings.event_request_channel,
    });
    let listener = TcpListener::bind(args.address).await?;
    info!("Listening at http://{}", args.address);
    tokio::spawn(serve(listener, state));

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await?;
    Ok(())
}

async fn serve(listener: TcpListener, state: Arc<ServerState>) {
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    if let Err(err) = axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!(%err, "HTTP endpoint failed");
    }
}
