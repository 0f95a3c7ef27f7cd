use serde::{Deserialize, Serialize};

/// What to look up: a position or a free-text city name
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { latitude: f64, longitude: f64 },
    City(String),
}

impl LocationQuery {
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates {
            latitude,
            longitude,
        }
    }

    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }
}

/// Current weather conditions for one place.
///
/// Only `city` and `temperature` are guaranteed. The other fields are `None`
/// when the reply left them out and are omitted from the wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    /// Temperature in Celsius
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Relative humidity, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<u8>,
    /// Wind speed in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Single emoji describing the conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A page the AI backend cited for its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

impl Source {
    /// Title if present, otherwise the URI
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.uri
        } else {
            &self.title
        }
    }
}

/// Successful weather lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub weather_data: WeatherRecord,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Host geolocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation not supported")]
    Unsupported,
    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location permission denied. You can manually search for a city below."
            }
            Self::PositionUnavailable => {
                "Location information is unavailable. Please check your connection or try again."
            }
            Self::Timeout => "The request to get user location timed out. Please try again.",
            Self::Unsupported => "Geolocation is not supported by your browser.",
            Self::Other(_) => "An unknown error occurred while fetching your location.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_keys() {
        let record = WeatherRecord {
            city: "Paris".into(),
            temperature: 18.0,
            condition: Some("Clear".into()),
            humidity: Some(60),
            wind_speed: Some(10.0),
            icon: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["windSpeed"], 10.0);
        assert!(json.get("wind_speed").is_none());
        assert!(json.get("icon").is_none());
    }

    #[test]
    fn test_report_wire_shape() {
        let json = serde_json::json!({
            "weatherData": {
                "city": "Paris", "temperature": 18, "condition": "Clear",
                "humidity": 60, "windSpeed": 10, "icon": "☀️"
            },
            "sources": [{"uri": "https://example.com/paris"}]
        });
        let report: WeatherReport = serde_json::from_value(json).unwrap();
        assert_eq!(report.weather_data.city, "Paris");
        assert_eq!(report.sources[0].title, "");
    }

    #[test]
    fn test_source_display_name() {
        let untitled = Source { uri: "https://a.example".into(), title: String::new() };
        assert_eq!(untitled.display_name(), "https://a.example");
        let titled = Source { uri: "https://a.example".into(), title: "Forecast".into() };
        assert_eq!(titled.display_name(), "Forecast");
    }

    #[test]
    fn test_location_error_messages() {
        assert!(LocationError::PermissionDenied.user_message().contains("search for a city"));
        assert!(LocationError::Timeout.user_message().contains("timed out"));
        assert!(LocationError::Other("x".into()).user_message().contains("unknown"));
    }
}
