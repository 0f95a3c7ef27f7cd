use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use orientall_core::WeatherError;
use orientall_orientation::{classify, OrientationMode, OrientationReading, Tool};
use orientall_weather::{LocationQuery, WeatherService};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone)]
pub struct AppState {
    pub weather: WeatherService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/orientation", get(get_orientation))
        .route("/health", get(get_health))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub city: Option<String>,
}

impl WeatherParams {
    /// Coordinates win when both parse; otherwise a non-blank city.
    pub fn location(&self) -> Option<LocationQuery> {
        let coordinates = self
            .lat
            .as_deref()
            .zip(self.lon.as_deref())
            .and_then(|(lat, lon)| {
                Some(LocationQuery::coordinates(
                    parse_degrees(lat, 90.0)?,
                    parse_degrees(lon, 180.0)?,
                ))
            });

        coordinates.or_else(|| {
            self.city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(LocationQuery::city)
        })
    }
}

/// A finite angle within `-limit..=limit`.
fn parse_degrees(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (-limit..=limit).contains(v))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Response {
    let Some(query) = params.location() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing location parameters" })),
        )
            .into_response();
    };

    match state.weather.fetch_weather(&query).await {
        Ok(report) => Json(report).into_response(),
        Err(WeatherError::LocationNotFound(message)) => Json(json!({
            "weatherData": { "error": message },
            "sources": [],
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(kind = %err.kind(), error = %err, "Weather request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.user_message(), "kind": err.kind() })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrientationParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub angle: Option<String>,
}

impl OrientationParams {
    pub fn reading(&self) -> OrientationReading {
        let angle = self.angle.as_deref().and_then(|a| a.trim().parse().ok());
        match (&self.kind, angle) {
            (Some(kind), _) => OrientationReading::Screen {
                kind: Some(kind.clone()),
                angle,
            },
            (None, Some(_)) => OrientationReading::Legacy { angle },
            (None, None) => OrientationReading::Unavailable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrientationResponse {
    pub mode: OrientationMode,
    pub tool: Tool,
    pub label: &'static str,
}

async fn get_orientation(Query(params): Query<OrientationParams>) -> Json<OrientationResponse> {
    let mode = classify(&params.reading());
    let tool = Tool::for_mode(mode);
    Json(OrientationResponse {
        mode,
        tool,
        label: tool.label(),
    })
}

async fn get_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "weatherConfigured": state.weather.is_configured(),
    }))
}
