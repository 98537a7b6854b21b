//! Multipart photo upload to the page

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use super::types::{GraphResponse, PublishReceipt};
use crate::config::PublisherConfig;
use crate::error::PipelineError;
use crate::module::build_http_client;
use crate::module::imagery::ImageArtifact;
use crate::module::message::PostMessage;

#[async_trait]
pub trait PostSink: Send + Sync {
    async fn publish(&self, image: &ImageArtifact, message: &PostMessage) -> Result<PublishReceipt, PipelineError>;
}

pub struct Publisher {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl Publisher {
    pub fn new(config: &PublisherConfig, allow_insecure_tls: bool) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout(), allow_insecure_tls)?,
            endpoint: config.photos_url(),
            access_token: config.access_token.clone(),
        })
    }

    fn build_form(&self, image: &ImageArtifact, message: &PostMessage) -> Result<Form> {
        let source = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name())
            .mime_str("image/jpeg")
            .context("Failed to build image part")?;

        Ok(Form::new()
            .text("access_token", self.access_token.clone())
            .text("message", message.as_str().to_string())
            .part("source", source))
    }

    async fn upload(&self, image: &ImageArtifact, message: &PostMessage) -> Result<PublishReceipt> {
        let form = self.build_form(image, message)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("Failed to send publish request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read publish response body")?;

        let parsed: Result<GraphResponse, _> = serde_json::from_str(&body);
        if !status.is_success() {
            // Prefer the provider's own error message when the body has one
            let provider_error = parsed.ok().and_then(|ack| ack.into_receipt().err());
            return Err(match provider_error {
                Some(e) => e.context(format!("HTTP error {} from publish endpoint", status)),
                None => anyhow::anyhow!("HTTP error {} from publish endpoint", status),
            });
        }

        parsed
            .context("Failed to parse publish acknowledgement")?
            .into_receipt()
    }
}

#[async_trait]
impl PostSink for Publisher {
    async fn publish(&self, image: &ImageArtifact, message: &PostMessage) -> Result<PublishReceipt, PipelineError> {
        tracing::info!(
            "Publishing {} byte image with {} character message to {}",
            image.bytes().len(),
            message.as_str().chars().count(),
            self.endpoint
        );

        let receipt = self.upload(image, message).await.map_err(PipelineError::publish)?;

        tracing::info!(
            "Post created: id {}, post id {}",
            receipt.id,
            receipt.post_id.as_deref().unwrap_or("-")
        );
        Ok(receipt)
    }
}
