//! Daily summary scheduler.
//!
//! A coarse poll loop compares the wall clock against the configured
//! summary time (exact HH:MM equality). The last-fired date is recorded
//! before the synthetic command is submitted, so the trigger fires at most
//! once per calendar day no matter how many poll ticks land in the matching
//! minute. A summary dropped because the pipeline was busy stays dropped
//! for that day.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::SharedSettings;
use crate::pipeline::CommandPipeline;

/// The synthetic command injected at summary time, phrased like a spoken
/// request so the interpreter handles it identically to user input.
pub const DAILY_SUMMARY_COMMAND: &str = "Summarize my events for today";

pub struct SummaryScheduler {
    pipeline: Arc<CommandPipeline>,
    settings: SharedSettings,
    tick_interval: Duration,
    last_fired: Mutex<Option<NaiveDate>>,
}

impl SummaryScheduler {
    pub fn new(
        pipeline: Arc<CommandPipeline>,
        settings: SharedSettings,
        tick_secs: u64,
    ) -> Self {
        Self {
            pipeline,
            settings,
            tick_interval: Duration::from_secs(tick_secs),
            last_fired: Mutex::new(None),
        }
    }

    /// Spawn the poll loop as a background task. The returned handle aborts
    /// the loop on shutdown; an aborted scheduler produces no further
    /// effects.
    pub fn spawn(self: Arc<Self>) -> SchedulerHandle {
        let scheduler = self;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(scheduler.tick_interval);
            loop {
                ticker.tick().await;
                scheduler.tick(Local::now().naive_local()).await;
            }
        });

        info!("Summary scheduler spawned");
        SchedulerHandle { handle }
    }

    /// One poll: fire the daily summary if `now` matches the configured
    /// time and nothing has fired today.
    pub async fn tick(&self, now: NaiveDateTime) {
        let summary_time = self.settings.get().await.summary_time;
        if now.format("%H:%M").to_string() != summary_time {
            return;
        }

        let today = now.date();
        let mut last_fired = self.last_fired.lock().await;
        if *last_fired == Some(today) {
            return;
        }
        // Recorded before the submit: a busy pipeline drops the summary for
        // the rest of the day rather than retrying on the next tick.
        *last_fired = Some(today);
        drop(last_fired);

        info!(date = %today, "Firing daily summary");
        if !self.pipeline.submit(DAILY_SUMMARY_COMMAND).await {
            warn!("Pipeline busy at summary time; daily summary dropped");
        }
    }
}

pub struct SchedulerHandle {
    handle: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Abort the poll loop and wait for it to finish. Once this returns the
    /// scheduler can produce no further effects.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}
