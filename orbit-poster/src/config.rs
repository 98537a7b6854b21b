use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "ORBIT_POSTER_CONFIG";

const PAGE_ID_ENV: &str = "PAGE_ID";
const ACCESS_TOKEN_ENV: &str = "PAGE_ACCESS_TOKEN";
const INSECURE_TLS_ENV: &str = "ALLOW_INSECURE_TLS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_url")]
    pub url: String,

    #[serde(default = "default_telemetry_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageryConfig {
    /// WMS service endpoint (without query string)
    #[serde(default = "default_imagery_base_url")]
    pub base_url: String,

    #[serde(default = "default_imagery_layer")]
    pub layer: String,

    #[serde(default = "default_imagery_width")]
    pub width: u32,

    #[serde(default = "default_imagery_height")]
    pub height: u32,

    #[serde(default = "default_imagery_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Graph API root including version, e.g. "https://graph.facebook.com/v19.0"
    #[serde(default = "default_graph_url")]
    pub graph_url: String,

    #[serde(default)]
    pub page_id: String,

    #[serde(default, skip_serializing)]
    pub access_token: String,

    #[serde(default = "default_publisher_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Run the pipeline once and exit
    Once,
    /// Stay resident and post once per day
    Daily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_mode")]
    pub mode: ScheduleMode,

    #[serde(default = "default_post_hour_utc")]
    pub post_hour_utc: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Fixed slot the downloaded image is written to before upload
    #[serde(default = "default_staging_path")]
    pub staging_path: PathBuf,

    /// Accept invalid TLS certificates on every outbound call
    #[serde(default)]
    pub allow_insecure_tls: bool,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub imagery: ImageryConfig,

    #[serde(default)]
    pub publisher: PublisherConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_staging_path() -> PathBuf {
    PathBuf::from("data/staging/earth_snapshot.jpg")
}

fn default_telemetry_url() -> String {
    "https://api.wheretheiss.at/v1/satellites/25544".to_string()
}

fn default_telemetry_timeout_ms() -> u64 {
    5_000
}

fn default_imagery_base_url() -> String {
    "https://gibs.earthdata.nasa.gov/wms/epsg4326/best/wms.cgi".to_string()
}

fn default_imagery_layer() -> String {
    "MODIS_Terra_CorrectedReflectance_TrueColor".to_string()
}

fn default_imagery_width() -> u32 {
    4096
}

fn default_imagery_height() -> u32 {
    2048
}

fn default_imagery_timeout_ms() -> u64 {
    20_000
}

fn default_graph_url() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

fn default_publisher_timeout_ms() -> u64 {
    30_000
}

fn default_schedule_mode() -> ScheduleMode {
    ScheduleMode::Once
}

fn default_post_hour_utc() -> u32 {
    12
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: default_telemetry_url(),
            timeout_ms: default_telemetry_timeout_ms(),
        }
    }
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            base_url: default_imagery_base_url(),
            layer: default_imagery_layer(),
            width: default_imagery_width(),
            height: default_imagery_height(),
            timeout_ms: default_imagery_timeout_ms(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            graph_url: default_graph_url(),
            page_id: String::new(),
            access_token: String::new(),
            timeout_ms: default_publisher_timeout_ms(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            mode: default_schedule_mode(),
            post_hour_utc: default_post_hour_utc(),
        }
    }
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            staging_path: default_staging_path(),
            allow_insecure_tls: false,
            telemetry: TelemetryConfig::default(),
            imagery: ImageryConfig::default(),
            publisher: PublisherConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl TelemetryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ImageryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl PublisherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Page-scoped photo upload endpoint
    pub fn photos_url(&self) -> String {
        format!("{}/{}/photos", self.graph_url.trim_end_matches('/'), self.page_id)
    }
}

impl PosterConfig {
    /// Load from a TOML file. A missing file yields the built-in defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: PosterConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply secrets and flags from the environment on top of the file values.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(page_id) = lookup(PAGE_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.publisher.page_id = page_id.trim().to_string();
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.publisher.access_token = token.trim().to_string();
        }
        if let Some(flag) = lookup(INSECURE_TLS_ENV) {
            self.allow_insecure_tls = is_truthy(&flag);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.publisher.page_id.is_empty() {
            bail!("Missing page id (set {} or publisher.page_id)", PAGE_ID_ENV);
        }
        if self.publisher.access_token.is_empty() {
            bail!("Missing page access token (set {} or publisher.access_token)", ACCESS_TOKEN_ENV);
        }
        if self.telemetry.timeout_ms == 0 || self.imagery.timeout_ms == 0 || self.publisher.timeout_ms == 0 {
            bail!("Request timeouts must be greater than zero");
        }
        if self.schedule.post_hour_utc > 23 {
            bail!("schedule.post_hour_utc must be within 0..=23, got {}", self.schedule.post_hour_utc);
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub static CONFIG: OnceLock<PosterConfig> = OnceLock::new();

/// `ORBIT_POSTER_CONFIG` if set, otherwise `config.toml`
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Resolve the config path, load the file, apply the environment and validate.
pub fn read_config() -> anyhow::Result<&'static PosterConfig> {
    // A missing .env is fine; the variables may come from the host
    let _ = dotenvy::dotenv();

    let mut config = PosterConfig::from_file(config_path())?;
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;

    Ok(CONFIG.get_or_init(|| config))
}
