//! Builds the post text from telemetry, the imagery date and the clock.

use chrono::{DateTime, Utc};
use std::fmt;

use super::templates::DayFlourish;
use crate::module::imagery::ImageryRequest;
use crate::module::telemetry::{TelemetrySnapshot, Visibility};

/// Caption limit documented by the publish target. Longer text is sent
/// untruncated; the composer only warns.
pub const MAX_MESSAGE_CHARS: usize = 63_206;

const SUNLIGHT_PHRASE: &str = "☀️ It is flying through sunlight right now.";
const SHADOW_PHRASE: &str = "🌑 It is gliding through Earth's shadow right now.";
const IMAGERY_CITATION: &str = "NASA GIBS, MODIS Terra corrected reflectance (true color)";
const HASHTAGS: &str = "#ISS #SpaceStation #EarthFromSpace #NASA";

/// Finished post text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessage(String);

impl PostMessage {
    /// Wrap finished text. Text over [`MAX_MESSAGE_CHARS`] is kept whole; only a warning is logged.
    pub fn new(text: String) -> Self {
        let message = Self(text);
        if message.exceeds_limit() {
            tracing::warn!(
                "Composed message is {} characters, above the {} character limit; sending as is",
                message.char_count(),
                MAX_MESSAGE_CHARS
            );
        }
        message
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn exceeds_limit(&self) -> bool {
        self.char_count() > MAX_MESSAGE_CHARS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PostMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageComposer;

impl MessageComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(
        &self,
        telemetry: &TelemetrySnapshot,
        request: &ImageryRequest,
        now: DateTime<Utc>,
    ) -> PostMessage {
        let day_name = now.format("%A").to_string();
        self.compose_for_day(telemetry, request, now, &day_name)
    }

    /// Same as [`compose`](Self::compose) with an explicit weekday name.
    /// Unrecognized names produce the generic template.
    pub fn compose_for_day(
        &self,
        telemetry: &TelemetrySnapshot,
        request: &ImageryRequest,
        now: DateTime<Utc>,
        day_name: &str,
    ) -> PostMessage {
        let header = format!("🛰️ ISS status · {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
        let position = format!(
            "The International Space Station is over {}, cruising at {:.0} km altitude and {:.0} km/h. {}",
            format_coordinates(telemetry.latitude, telemetry.longitude),
            telemetry.altitude,
            telemetry.velocity,
            light_phrase(telemetry.visibility)
        );
        let citation = format!(
            "🌍 Today's Earth: {} composite of {}.",
            IMAGERY_CITATION,
            request.reference_date_string()
        );

        let text = match DayFlourish::from_day_name(day_name) {
            Some(flourish) => format!(
                "{}\n\n{}\n\n{}\n\n{}\n\n{}",
                header,
                position,
                flourish.text(),
                citation,
                HASHTAGS
            ),
            None => {
                tracing::warn!("Unrecognized weekday '{}', using generic template", day_name);
                format!("{}\n\n{}\n\n{}\n\n{}", header, position, citation, HASHTAGS)
            }
        };

        PostMessage::new(text)
    }
}

/// Signed degrees to two decimals, e.g. `45.12°N, -122.46°E`
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{:.2}°N, {:.2}°E", latitude, longitude)
}

pub fn light_phrase(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Daylight => SUNLIGHT_PHRASE,
        Visibility::Eclipsed => SHADOW_PHRASE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture_logs;
    use chrono::{Datelike, NaiveDate, TimeZone};

    fn telemetry(visibility: &str) -> TelemetrySnapshot {
        TelemetrySnapshot {
            latitude: 45.123,
            longitude: -122.456,
            altitude: 408.7,
            velocity: 27600.3,
            visibility: Visibility::from(visibility),
        }
    }

    fn request(date: NaiveDate) -> ImageryRequest {
        ImageryRequest::new(format!("https://example.com/wms?TIME={}", date), date)
    }

    #[test]
    fn test_saturday_scenario() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let request = request(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());

        let message = MessageComposer::new().compose(&telemetry("daylight"), &request, now);
        let text = message.as_str();

        assert!(text.contains("2024-06-15 12:00:00 UTC"));
        assert!(text.contains("45.12°N, -122.46°E"));
        assert!(text.contains("409 km"));
        assert!(text.contains("27600 km/h"));
        assert!(text.contains(SUNLIGHT_PHRASE));
        assert!(text.contains(DayFlourish::Saturday.text()));
        assert!(text.contains("2024-06-14"));
        assert!(text.ends_with(HASHTAGS));
    }

    #[test]
    fn test_every_weekday_selects_its_template() {
        // 2024-06-09 is a Sunday
        let composer = MessageComposer::new();
        let request = request(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());

        for (offset, expected) in DayFlourish::ALL.iter().enumerate() {
            let now = Utc.with_ymd_and_hms(2024, 6, 9 + offset as u32, 7, 30, 5).unwrap();
            assert_eq!(now.weekday(), expected.weekday());

            for visibility in ["daylight", "eclipsed"] {
                let text = composer.compose(&telemetry(visibility), &request, now).into_string();

                assert!(text.contains(expected.text()), "{} missing flourish", expected.day_name());
                for other in DayFlourish::ALL.iter().filter(|f| *f != expected) {
                    assert!(!text.contains(other.text()));
                }
                assert!(text.contains(&now.format("%Y-%m-%d %H:%M:%S UTC").to_string()));
                assert!(text.contains("45.12°N, -122.46°E"));
                assert!(text.contains("409 km"));
                assert!(text.contains("27600 km/h"));
                assert!(text.contains("2024-06-08"));

                let expected_phrase = if visibility == "daylight" { SUNLIGHT_PHRASE } else { SHADOW_PHRASE };
                assert!(text.contains(expected_phrase));
            }
        }
    }

    #[test]
    fn test_light_phrases() {
        assert!(light_phrase(Visibility::from("daylight")).contains("sunlight"));
        assert!(light_phrase(Visibility::from("eclipsed")).contains("shadow"));
        assert!(light_phrase(Visibility::from("twilight")).contains("shadow"));
        assert!(!light_phrase(Visibility::Daylight).contains("shadow"));
    }

    #[test]
    fn test_unknown_day_uses_generic_template() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let request = request(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());

        let text = MessageComposer::new()
            .compose_for_day(&telemetry("eclipsed"), &request, now, "Caturday")
            .into_string();

        for flourish in DayFlourish::ALL {
            assert!(!text.contains(flourish.text()));
        }
        assert!(text.contains("2024-06-15 12:00:00 UTC"));
        assert!(text.contains("45.12°N, -122.46°E"));
        assert!(text.contains(SHADOW_PHRASE));
        assert!(text.contains("2024-06-14"));
        assert!(text.ends_with(HASHTAGS));
    }

    #[test]
    fn test_rounding() {
        let snapshot = TelemetrySnapshot {
            latitude: -51.6449,
            longitude: 179.999,
            altitude: 420.49,
            velocity: 27579.51,
            visibility: Visibility::Eclipsed,
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let request = request(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        let text = MessageComposer::new().compose(&snapshot, &request, now).into_string();
        assert!(text.contains("-51.64°N, 180.00°E"));
        assert!(text.contains("420 km"));
        assert!(text.contains("27580 km/h"));
    }

    #[test]
    fn test_typical_message_is_within_limit() {
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap();
        let request = request(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());

        let message = MessageComposer::new().compose(&telemetry("daylight"), &request, now);
        assert!(!message.exceeds_limit());
        assert!(message.as_str().ends_with(HASHTAGS));
    }

    #[test]
    fn test_over_limit_message_is_flagged_not_truncated() {
        let (logs, _guard) = capture_logs();
        // Multi-byte characters: the limit counts characters, not bytes
        let text = "🛰".repeat(MAX_MESSAGE_CHARS + 10);

        let message = PostMessage::new(text.clone());

        assert!(message.exceeds_limit());
        assert_eq!(message.char_count(), MAX_MESSAGE_CHARS + 10);
        assert_eq!(message.as_str(), text);
        assert_eq!(logs.lines_at("WARN"), 1);
        assert!(logs.contents().contains("sending as is"));
    }

    #[test]
    fn test_message_at_limit_is_not_flagged() {
        let (logs, _guard) = capture_logs();

        let message = PostMessage::new("a".repeat(MAX_MESSAGE_CHARS));

        assert!(!message.exceeds_limit());
        assert_eq!(logs.lines_at("WARN"), 0);
    }
}
