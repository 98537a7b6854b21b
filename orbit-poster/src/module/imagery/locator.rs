//! Builds the imagery request for the day before the run.
//!
//! The provider publishes one global composite per day and today's is
//! usually incomplete, so the request always targets yesterday (UTC).

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::types::ImageryRequest;
use crate::config::ImageryConfig;

const WMS_VERSION: &str = "1.3.0";
const WMS_CRS: &str = "EPSG:4326";
const WMS_FORMAT: &str = "image/jpeg";
const WHOLE_GLOBE_BBOX: &str = "-180,-90,180,90";

#[derive(Debug, Clone)]
pub struct ImageryLocator {
    base_url: String,
    layer: String,
    width: u32,
    height: u32,
}

impl ImageryLocator {
    pub fn new(config: &ImageryConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            layer: config.layer.clone(),
            width: config.width,
            height: config.height,
        }
    }

    /// Calendar date one day before `now`, in UTC
    pub fn reference_date(now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(1)).date_naive()
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> ImageryRequest {
        let reference_date = Self::reference_date(now);
        let url = format!(
            "{}?SERVICE=WMS&REQUEST=GetMap&VERSION={}&LAYERS={}&CRS={}&FORMAT={}&TIME={}&BBOX={}&WIDTH={}&HEIGHT={}",
            self.base_url,
            WMS_VERSION,
            self.layer,
            WMS_CRS,
            WMS_FORMAT,
            reference_date.format("%Y-%m-%d"),
            WHOLE_GLOBE_BBOX,
            self.width,
            self.height
        );

        tracing::debug!("Resolved imagery request for {}: {}", reference_date, url);
        ImageryRequest::new(url, reference_date)
    }
}
