//! Graph API acknowledgement types

use anyhow::{bail, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Raw acknowledgement; success and error share one shape
#[derive(Debug, Clone, Deserialize)]
pub struct GraphResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub error: Option<GraphErrorBody>,
}

/// Identifiers of the created post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Photo object id
    pub id: String,
    /// Feed post id, when the provider returns one
    pub post_id: Option<String>,
}

impl GraphResponse {
    /// Turn the acknowledgement into a receipt. An `error` member or a
    /// missing id is a failure, whatever the HTTP status was.
    pub fn into_receipt(self) -> Result<PublishReceipt> {
        if let Some(error) = self.error {
            bail!(
                "Publish rejected: {} (type: {}, code: {})",
                error.message,
                error.kind.as_deref().unwrap_or("unknown"),
                error.code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
            );
        }

        match self.id {
            Some(id) if !id.is_empty() => Ok(PublishReceipt { id, post_id: self.post_id }),
            _ => bail!("Publish acknowledgement did not contain a post id"),
        }
    }
}
