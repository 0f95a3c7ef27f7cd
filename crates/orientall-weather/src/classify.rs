//! Maps backend and transport failures onto [`WeatherError`] kinds.

use orientall_core::{NetworkError, WeatherError};

use crate::backend::BackendError;

const CREDENTIAL_STATUSES: [&str; 2] = ["PERMISSION_DENIED", "UNAUTHENTICATED"];
const CREDENTIAL_REASONS: [&str; 1] = ["API_KEY_INVALID"];

pub fn classify_backend_failure(err: BackendError) -> WeatherError {
    match err {
        BackendError::Rejected {
            status,
            provider_status,
            reason,
            message,
        } => {
            let provider_status = provider_status.as_deref().unwrap_or_default();
            let reason = reason.as_deref().unwrap_or_default();

            if matches!(status, 401 | 403)
                || CREDENTIAL_STATUSES.contains(&provider_status)
                || CREDENTIAL_REASONS.contains(&reason)
            {
                WeatherError::InvalidCredential(message)
            } else if status >= 500 || provider_status == "UNAVAILABLE" {
                WeatherError::ServiceUnavailable(message)
            } else {
                WeatherError::Unknown(message)
            }
        }
        BackendError::Network(err) => classify_network_failure(err),
    }
}

pub fn classify_network_failure(err: NetworkError) -> WeatherError {
    if err.is_transport_failure() {
        WeatherError::ServiceUnavailable(err.to_string())
    } else {
        WeatherError::Unknown(err.to_string())
    }
}
