use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};

use crate::provider::ProviderId;

/// A single forecast reading picked from one provider's timeseries.
///
/// `timestamp` is the time of the selected timeseries entry, not the target
/// time the provider was asked about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub timestamp: DateTime<FixedOffset>,
    pub origin: ProviderId,
}

/// Always a numeric offset (`+00:00`), never `Z`.
fn serialize_rfc3339<S: Serializer>(ts: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339())
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.1}°C, {:.0}% humidity at {}",
            self.origin,
            self.temperature,
            self.humidity,
            self.timestamp.to_rfc3339(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_label_and_offset() {
        let reading = Reading {
            temperature: 21.5,
            humidity: 60.0,
            timestamp: DateTime::parse_from_rfc3339("2024-06-02T12:00:00+02:00").unwrap(),
            origin: ProviderId::MetNorway,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["origin"], "Met Norway");
        assert_eq!(json["timestamp"], "2024-06-02T12:00:00+02:00");
        assert_eq!(json["temperature"], 21.5);
    }

    #[test]
    fn zero_offset_serializes_as_plus_zero() {
        let reading = Reading {
            temperature: 3.0,
            humidity: 90.0,
            timestamp: DateTime::parse_from_rfc3339("2024-06-02T12:00:00Z").unwrap(),
            origin: ProviderId::OpenMeteo,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["timestamp"], "2024-06-02T12:00:00+00:00");

        let back: Reading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn display_is_human_readable() {
        let reading = Reading {
            temperature: 7.3,
            humidity: 81.0,
            timestamp: DateTime::parse_from_rfc3339("2024-06-02T12:00:00Z").unwrap(),
            origin: ProviderId::Smhi,
        };

        assert_eq!(
            reading.to_string(),
            "Smhi: 7.3°C, 81% humidity at 2024-06-02T12:00:00+00:00"
        );
    }
}
