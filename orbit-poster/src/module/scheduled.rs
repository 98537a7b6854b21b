//! Resident daily schedule
//!
//! Runs the posting pipeline once a day at a fixed UTC hour. Runs are
//! sequential, so two runs never share the staging slot. A failed run is
//! logged and the loop waits for the next day's slot.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::pipeline::{Orchestrator, RunReport};
use crate::clock::Clock;
use crate::error::PipelineError;
use crate::logging;

pub struct DailyScheduler {
    orchestrator: Orchestrator,
    clock: Arc<dyn Clock>,
    post_hour_utc: u32,
    log_dir: PathBuf,
    log_prefix: String,
}

impl DailyScheduler {
    pub fn new(
        orchestrator: Orchestrator,
        clock: Arc<dyn Clock>,
        post_hour_utc: u32,
        log_dir: PathBuf,
        log_prefix: &str,
    ) -> Self {
        Self {
            orchestrator,
            clock,
            post_hour_utc,
            log_dir,
            log_prefix: log_prefix.to_string(),
        }
    }

    /// Loop until ctrl-c
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("Daily schedule started (posting at {:02}:00 UTC)", self.post_hour_utc);

        tokio::select! {
            _ = self.post_loop() => Ok(()),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Shutdown signal received, stopping schedule");
                Ok(())
            }
        }
    }

    async fn post_loop(&self) {
        loop {
            let _ = self.tick().await;
        }
    }

    /// Time left until the next posting slot
    pub fn next_sleep(&self) -> Duration {
        let now = self.clock.now();
        let next_trigger = calculate_next_post_time(now, self.post_hour_utc);
        let sleep_duration = (next_trigger - now)
            .to_std()
            .unwrap_or(Duration::from_secs(60));

        tracing::info!(
            "Next post at: {} (in {:.1} hours)",
            next_trigger.format("%Y-%m-%d %H:%M:%S UTC"),
            sleep_duration.as_secs_f64() / 3600.0
        );
        sleep_duration
    }

    /// Wait for the next slot, post once, sweep old logs
    pub async fn tick(&self) -> Result<RunReport, PipelineError> {
        tokio::time::sleep(self.next_sleep()).await;

        let result = self.orchestrator.run().await;
        match &result {
            Ok(report) => tracing::info!(
                "Scheduled post completed: {} (imagery of {})",
                report.receipt.id,
                report.reference_date
            ),
            Err(e) => tracing::error!("Scheduled post failed at {} stage: {}", e.stage(), e),
        }

        if let Err(e) = logging::cleanup_old_logs(&self.log_dir, &self.log_prefix, logging::MAX_LOG_AGE) {
            tracing::warn!("Failed to delete old log file: {}", e);
        }

        result
    }
}

/// Today's `hour:00:00` UTC if still ahead of `now`, otherwise tomorrow's.
pub fn calculate_next_post_time(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let today = now
        .date_naive()
        .and_hms_opt(hour.min(23), 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(now);

    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}
