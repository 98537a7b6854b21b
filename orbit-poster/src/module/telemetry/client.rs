//! Telemetry endpoint client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::types::TelemetrySnapshot;
use crate::config::TelemetryConfig;
use crate::error::PipelineError;
use crate::module::build_http_client;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> Result<TelemetrySnapshot, PipelineError>;
}

pub struct TelemetryClient {
    client: Client,
    url: String,
}

impl TelemetryClient {
    pub fn new(config: &TelemetryConfig, allow_insecure_tls: bool) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout(), allow_insecure_tls)?,
            url: config.url.clone(),
        })
    }

    async fn fetch_snapshot(&self) -> Result<TelemetrySnapshot> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to send telemetry request")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("HTTP error {} from telemetry endpoint", response.status()));
        }

        let snapshot: TelemetrySnapshot = response
            .json()
            .await
            .context("Failed to parse telemetry JSON")?;

        Ok(snapshot)
    }
}

#[async_trait]
impl TelemetrySource for TelemetryClient {
    async fn fetch(&self) -> Result<TelemetrySnapshot, PipelineError> {
        tracing::info!("Fetching telemetry from {}", self.url);

        let snapshot = self.fetch_snapshot().await.map_err(PipelineError::telemetry)?;

        tracing::debug!(
            "Telemetry: lat {:.4}, lon {:.4}, alt {:.1} km, {:.1} km/h, {:?}",
            snapshot.latitude,
            snapshot.longitude,
            snapshot.altitude,
            snapshot.velocity,
            snapshot.visibility
        );
        Ok(snapshot)
    }
}
