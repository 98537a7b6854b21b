//! Posting run orchestration
//!
//! telemetry → imagery request → imagery download → message → publish,
//! strictly in order. The first failing stage ends the run; nothing is
//! retried and the only cleanup is releasing the staged image. Failures are
//! returned, not logged: the caller reports them once.

use chrono::NaiveDate;
use std::sync::Arc;

use super::imagery::{ImageryLocator, ImagerySource};
use super::message::{MessageComposer, PostMessage};
use super::publisher::{PostSink, PublishReceipt};
use super::telemetry::TelemetrySource;
use crate::clock::Clock;
use crate::error::PipelineError;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub reference_date: NaiveDate,
    pub receipt: PublishReceipt,
    pub message: PostMessage,
}

pub struct Orchestrator {
    telemetry: Box<dyn TelemetrySource>,
    locator: ImageryLocator,
    imagery: Box<dyn ImagerySource>,
    composer: MessageComposer,
    publisher: Box<dyn PostSink>,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(
        telemetry: Box<dyn TelemetrySource>,
        locator: ImageryLocator,
        imagery: Box<dyn ImagerySource>,
        publisher: Box<dyn PostSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            telemetry,
            locator,
            imagery,
            composer: MessageComposer::new(),
            publisher,
            clock,
        }
    }

    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        tracing::info!("Posting run started");

        let telemetry = self.telemetry.fetch().await?;

        let request = self.locator.resolve(self.clock.now());

        let image = self.imagery.fetch(&request).await?;

        let message = self.composer.compose(&telemetry, &request, self.clock.now());
        tracing::debug!("Composed message:\n{}", message);

        let published = self.publisher.publish(&image, &message).await;
        image.release().await;

        let receipt = published?;

        tracing::info!(
            "Posting run completed: imagery of {}, post {}",
            request.reference_date_string(),
            receipt.id
        );

        Ok(RunReport {
            reference_date: request.reference_date(),
            receipt,
            message,
        })
    }
}
