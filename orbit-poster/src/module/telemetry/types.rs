//! Satellite telemetry data types

use serde::Deserialize;

/// Illumination state reported by the telemetry endpoint.
///
/// Only the literal `daylight` marker counts as sunlit; every other value
/// (including ones the provider may add later) is treated as eclipsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Visibility {
    Daylight,
    Eclipsed,
}

impl From<String> for Visibility {
    fn from(value: String) -> Self {
        Visibility::from(value.as_str())
    }
}

impl From<&str> for Visibility {
    fn from(value: &str) -> Self {
        match value {
            "daylight" => Visibility::Daylight,
            _ => Visibility::Eclipsed,
        }
    }
}

/// One position fix of the satellite
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelemetrySnapshot {
    /// Degrees, positive north
    pub latitude: f64,
    /// Degrees, positive east
    pub longitude: f64,
    /// Kilometers above the surface
    pub altitude: f64,
    /// km/h
    pub velocity: f64,
    pub visibility: Visibility,
}
