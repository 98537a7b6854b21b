pub mod telemetry;
pub mod imagery;
pub mod message;
pub mod publisher;
pub mod pipeline;
pub mod scheduled;

use anyhow::{Context, Result};
use std::time::Duration;

const USER_AGENT: &str = "orbit-poster/0.1";

/// HTTP client with a whole-request timeout. `allow_insecure_tls` disables
/// certificate validation for networks behind intercepting proxies.
pub(crate) fn build_http_client(timeout: Duration, allow_insecure_tls: bool) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(allow_insecure_tls)
        .build()
        .context("Failed to build HTTP client")
}
