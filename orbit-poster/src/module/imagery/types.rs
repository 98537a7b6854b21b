//! Imagery request and staged artifact types

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A fully formed imagery URL and the date it was built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageryRequest {
    url: String,
    reference_date: NaiveDate,
}

impl ImageryRequest {
    pub fn new(url: String, reference_date: NaiveDate) -> Self {
        Self { url, reference_date }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Reference date as `YYYY-MM-DD`
    pub fn reference_date_string(&self) -> String {
        self.reference_date.format("%Y-%m-%d").to_string()
    }
}

/// Downloaded image bytes plus the file they were staged to
#[derive(Debug)]
pub struct ImageArtifact {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl ImageArtifact {
    /// Write `bytes` to `path`, replacing whatever an earlier run left there.
    pub async fn stage(path: impl AsRef<Path>, bytes: Vec<u8>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create staging directory {:?}", parent))?;
        }

        fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write staged image {:?}", path))?;

        tracing::debug!("Staged {} bytes at {:?}", bytes.len(), path);
        Ok(Self { path, bytes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File name used for the upload part
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("snapshot.jpg")
            .to_string()
    }

    /// Delete the staged file. Failure only logs; the run outcome is already decided.
    pub async fn release(self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!("Released staged image {:?}", self.path),
            Err(e) => tracing::warn!("Failed to delete staged image {:?}: {}", self.path, e),
        }
    }
}
