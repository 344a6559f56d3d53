use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use junction_dns_domain::DomainError;
use serde_json::json;

/// All configuration-API failures surface as a JSON envelope
/// `{"error": true, "message": …}` with a 503-class status; nothing
/// here ever touches the DNS-serving path.
pub struct ApiError(pub String);

impl ApiError {
    pub fn bad_payload() -> Self {
        Self("Could not parse entry".to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": true, "message": self.0 })),
        )
            .into_response()
    }
}
