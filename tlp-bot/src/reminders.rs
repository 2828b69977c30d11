use std::sync::Arc;

use serenity::all::ChannelId;
use tlp_parser::Tz;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::announce::Announcer;
use crate::calendar::CalendarClient;
use crate::error::Result;
use crate::render::{self, Period};

/// Mondays at 17:00.
pub const WEEKLY: &str = "0 0 17 * * Mon";
/// The first of every month at 17:00.
pub const MONTHLY: &str = "0 0 17 1 * *";

pub struct Reminders {
    calendar: Arc<CalendarClient>,
    announcer: Arc<dyn Announcer>,
    channel: ChannelId,
    timezone: Tz,
}

impl Reminders {
    pub fn new(
        calendar: Arc<CalendarClient>,
        announcer: Arc<dyn Announcer>,
        channel: ChannelId,
        timezone: Tz,
    ) -> Arc<Self> {
        Arc::new(Self {
            calendar,
            announcer,
            channel,
            timezone,
        })
    }

    pub async fn post(&self, period: Period) -> Result<()> {
        let events = match period {
            Period::Weekly => self.calendar.this_week().await?,
            Period::Monthly => self.calendar.this_month().await?,
        };

        let embed = render::reminders(&events, period, self.timezone);
        self.announcer
            .announce(self.channel, Some(period.announcement()), embed)
            .await
    }

    fn job(self: &Arc<Self>, schedule: &str, period: Period) -> Result<Job> {
        let reminders = Arc::clone(self);

        let job = Job::new_async_tz(schedule, self.timezone, move |_id, _scheduler| {
            let reminders = Arc::clone(&reminders);
            Box::pin(async move {
                info!(?period, "posting scheduled reminder");
                if let Err(err) = reminders.post(period).await {
                    error!(%err, ?period, "scheduled reminder failed");
                }
            })
        })?;

        Ok(job)
    }

    /// Registers the weekly and monthly jobs and starts the scheduler.
    pub async fn start(self: Arc<Self>) -> Result<JobScheduler> {
        let scheduler = JobScheduler::new().await?;

        scheduler.add(self.job(WEEKLY, Period::Weekly)?).await?;
        scheduler.add(self.job(MONTHLY, Period::Monthly)?).await?;
        scheduler.start().await?;

        info!(timezone = self.timezone.name(), channel = %self.channel, "reminders scheduled");
        Ok(scheduler)
    }
}
