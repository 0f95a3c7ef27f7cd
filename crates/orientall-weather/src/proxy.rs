//! Client for the `/api/weather` HTTP surface served by `orientall-server`.

use std::sync::Arc;
use std::time::Duration;

use orientall_core::{ErrorKind, NetworkError, ReqwestErrorExt, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::classify::classify_network_failure;
use crate::decode::error_message;
use crate::types::{Source, WeatherRecord, WeatherReport};

/// Used by [`WeatherApiClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: Arc<Client>,
    base_url: String,
}

/// Body of a non-success response.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    kind: Option<ErrorKind>,
}

/// Body of a 200 response; `weatherData` may hold an `error` instead of a record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    weather_data: serde_json::Value,
    #[serde(default)]
    sources: Vec<Source>,
}

impl WeatherApiClient {
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, WeatherError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        self.get(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.get(&[("city", city)]).await
    }

    async fn get(&self, query: &[(&str, &str)]) -> Result<WeatherReport, WeatherError> {
        let response = self
            .client
            .get(format!("{}/api/weather", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(|e| classify_network_failure(e.into_network_error()))?;

        self.handle_response(response).await
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<WeatherReport, WeatherError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify_network_failure(e.into_network_error()))?;

        if !status.is_success() {
            let body: Option<ErrorBody> = serde_json::from_str(&text).ok();
            let (message, kind) = match body {
                Some(ErrorBody { error, kind }) => (error, kind),
                None => (None, None),
            };
            let message =
                message.unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            let kind = kind.unwrap_or(if status.as_u16() == 503 {
                ErrorKind::ServiceUnavailable
            } else {
                ErrorKind::Unknown
            });
            return Err(WeatherError::from_kind(kind, message));
        }

        let body: SuccessBody = serde_json::from_str(&text)
            .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

        if let Some(message) = body.weather_data.get("error").and_then(error_message) {
            return Err(WeatherError::LocationNotFound(message));
        }

        let weather_data: WeatherRecord = serde_json::from_value(body.weather_data)
            .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

        Ok(WeatherReport {
            weather_data,
            sources: body.sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn paris() -> serde_json::Value {
        serde_json::json!({
            "weatherData": {
                "city": "Paris", "temperature": 18, "condition": "Clear",
                "humidity": 60, "windSpeed": 10, "icon": "☀️"
            },
            "sources": [{"uri": "https://weather.example/paris", "title": "Paris"}]
        })
    }

    #[tokio::test]
    async fn test_fetch_by_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("city", "São Paulo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let report = client.fetch_by_city("São Paulo").await.unwrap();

        assert_eq!(report.weather_data.city, "Paris");
        assert_eq!(report.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("lat", "12.9"))
            .and(query_param("lon", "77.6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        assert!(client.fetch_by_coordinates(12.9, 77.6).await.is_ok());
    }

    #[tokio::test]
    async fn test_nested_error_is_location_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weatherData": {"error": "Location not found"},
                "sources": []
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_by_city("Atlantis").await.unwrap_err();

        assert_eq!(err, WeatherError::LocationNotFound("Location not found".into()));
    }

    #[tokio::test]
    async fn test_falsy_nested_error_is_ignored() {
        let mock_server = MockServer::start().await;

        let mut body = paris();
        body["weatherData"]["error"] = serde_json::json!("");
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let report = client.fetch_by_city("Paris").await.unwrap();

        assert_eq!(report.weather_data.city, "Paris");
    }

    #[tokio::test]
    async fn test_hung_server_times_out_as_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(paris())
                    .set_delay(Duration::from_secs(60)),
            )
            .mount(&mock_server)
            .await;

        let client =
            WeatherApiClient::with_timeout(&mock_server.uri(), Duration::from_secs(1)).unwrap();
        let result =
            tokio::time::timeout(Duration::from_secs(15), client.fetch_by_city("Paris")).await;

        let err = result.expect("client should give up before the outer deadline").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_error_body_carries_kind() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "The configured API key is not valid.",
                "kind": "InvalidCredential"
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_by_city("Paris").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidCredential);
    }

    #[tokio::test]
    async fn test_error_without_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_by_city("Paris").await.unwrap_err();

        assert_eq!(err, WeatherError::Unknown("HTTP error! status: 502".into()));
    }

    #[tokio::test]
    async fn test_missing_parameters_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "Missing location parameters"
            })))
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_by_city("").await.unwrap_err();

        assert_eq!(err, WeatherError::Unknown("Missing location parameters".into()));
    }

    #[tokio::test]
    async fn test_service_unavailable_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = WeatherApiClient::new(&mock_server.uri()).unwrap();
        let err = client.fetch_by_city("Paris").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let client = WeatherApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.fetch_by_city("Paris").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }
}
