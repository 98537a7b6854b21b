use orbit_poster::clock::{Clock, SystemClock};
use orbit_poster::config::{self, PosterConfig, ScheduleMode};
use orbit_poster::logging;
use orbit_poster::module::imagery::{ImageryFetcher, ImageryLocator};
use orbit_poster::module::pipeline::Orchestrator;
use orbit_poster::module::publisher::Publisher;
use orbit_poster::module::scheduled::DailyScheduler;
use orbit_poster::module::telemetry::TelemetryClient;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

const LOG_PREFIX: &str = "orbit-poster";

fn build_orchestrator(config: &PosterConfig, clock: Arc<dyn Clock>) -> Result<Orchestrator> {
    let insecure = config.allow_insecure_tls;

    let telemetry = TelemetryClient::new(&config.telemetry, insecure)?;
    let locator = ImageryLocator::new(&config.imagery);
    let imagery = ImageryFetcher::new(&config.imagery, config.staging_path.clone(), insecure)?;
    let publisher = Publisher::new(&config.publisher, insecure)?;

    Ok(Orchestrator::new(
        Box::new(telemetry),
        locator,
        Box::new(imagery),
        Box::new(publisher),
        clock,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match config::read_config() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; use the defaults so the failure lands in the log file
            let defaults = PosterConfig::default();
            let _logging_guard = logging::init_logging(&defaults.log_dir, LOG_PREFIX, &defaults.log_level)?;
            logging::log_startup_error(&e);
            return Err(e);
        }
    };

    // Initialize logging
    let _logging_guard = logging::init_logging(&config.log_dir, LOG_PREFIX, &config.log_level)?;

    tracing::info!("Orbit poster starting...");
    tracing::info!("Configuration loaded from {:?}", config::config_path());
    if config.allow_insecure_tls {
        tracing::warn!("TLS certificate validation is disabled for all outbound requests");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let orchestrator = build_orchestrator(config, clock.clone())?;

    match config.schedule.mode {
        ScheduleMode::Once => {
            let report = orchestrator.run().await.inspect_err(|e| {
                tracing::error!("Posting run failed at {} stage: {}", e.stage(), e);
            })?;
            tracing::info!(
                "Posted imagery of {} as {}",
                report.reference_date,
                report.receipt.post_id.as_deref().unwrap_or(&report.receipt.id)
            );
        }
        ScheduleMode::Daily => {
            DailyScheduler::new(
                orchestrator,
                clock,
                config.schedule.post_hour_utc,
                PathBuf::from(&config.log_dir),
                LOG_PREFIX,
            )
            .run()
            .await?;
        }
    }

    Ok(())
}
