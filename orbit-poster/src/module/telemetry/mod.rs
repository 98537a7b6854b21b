//! Satellite telemetry
//!
//! Reads the satellite's current position, speed and illumination from a
//! JSON endpoint. One bounded request per run, never retried.

mod types;
pub use types::{TelemetrySnapshot, Visibility};

mod client;
pub use client::{TelemetryClient, TelemetrySource};
