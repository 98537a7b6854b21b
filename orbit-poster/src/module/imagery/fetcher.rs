//! Imagery download into the staging slot

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;

use super::types::{ImageArtifact, ImageryRequest};
use crate::config::ImageryConfig;
use crate::error::PipelineError;
use crate::module::build_http_client;

#[async_trait]
pub trait ImagerySource: Send + Sync {
    async fn fetch(&self, request: &ImageryRequest) -> Result<ImageArtifact, PipelineError>;
}

pub struct ImageryFetcher {
    client: Client,
    staging_path: PathBuf,
}

impl ImageryFetcher {
    pub fn new(config: &ImageryConfig, staging_path: PathBuf, allow_insecure_tls: bool) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout(), allow_insecure_tls)?,
            staging_path,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send imagery request")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("HTTP error {} from imagery endpoint", response.status()));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read imagery response body")?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImagerySource for ImageryFetcher {
    async fn fetch(&self, request: &ImageryRequest) -> Result<ImageArtifact, PipelineError> {
        tracing::info!(
            "Downloading imagery for {} from {}",
            request.reference_date_string(),
            request.url()
        );

        let bytes = self.download(request.url()).await.map_err(PipelineError::imagery)?;
        let artifact = ImageArtifact::stage(&self.staging_path, bytes)
            .await
            .map_err(PipelineError::imagery)?;

        tracing::info!(
            "Imagery staged: {} bytes at {:?}",
            artifact.bytes().len(),
            artifact.path()
        );
        Ok(artifact)
    }
}
