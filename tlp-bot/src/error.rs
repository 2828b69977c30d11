use thiserror::Error;
use tlp_parser::EventError;
use tokio_cron_scheduler::JobSchedulerError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum BotError {
    /// The event text or its date/time did not parse.
    #[error(transparent)]
    Event(#[from] EventError),
    /// A calendar, workspace or Discord call failed.
    #[error("{service} request failed: {reason}")]
    Upstream {
        service: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Discord(#[from] serenity::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn upstream(service: &'static str, reason: impl ToString) -> Self {
        Self::Upstream {
            service,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = BotError> = std::result::Result<T, E>;
