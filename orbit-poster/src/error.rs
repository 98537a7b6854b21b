//! Terminal failures of a posting run.
//!
//! Every stage failure is fatal for the run: nothing is retried and the
//! remaining stages are skipped. The cause is kept as a flattened string so
//! callers that need finer detail (timeout vs. status vs. body) inspect it.

use std::fmt;
use thiserror::Error;

/// Pipeline stage that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Telemetry,
    Imagery,
    Publish,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Telemetry => "telemetry",
            Stage::Imagery => "imagery",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("TelemetryFetchError ({0})")]
    TelemetryFetch(String),

    #[error("ImageryFetchError ({0})")]
    ImageryFetch(String),

    #[error("PublishError ({0})")]
    Publish(String),
}

impl PipelineError {
    /// Wrap an `anyhow` chain as a telemetry failure, keeping every context layer.
    pub fn telemetry(err: anyhow::Error) -> Self {
        PipelineError::TelemetryFetch(format!("{:#}", err))
    }

    pub fn imagery(err: anyhow::Error) -> Self {
        PipelineError::ImageryFetch(format!("{:#}", err))
    }

    pub fn publish(err: anyhow::Error) -> Self {
        PipelineError::Publish(format!("{:#}", err))
    }

    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::TelemetryFetch(_) => Stage::Telemetry,
            PipelineError::ImageryFetch(_) => Stage::Imagery,
            PipelineError::Publish(_) => Stage::Publish,
        }
    }

    pub fn cause(&self) -> &str {
        match self {
            PipelineError::TelemetryFetch(cause)
            | PipelineError::ImageryFetch(cause)
            | PipelineError::Publish(cause) => cause,
        }
    }
}
