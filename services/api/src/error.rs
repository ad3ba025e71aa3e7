//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reporting::validation::FieldErrors;
use thiserror::Error;

use crate::models::ApiResponse;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Field-level validation failures
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid session
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed to touch the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error, carrying the message shown to the client
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => ApiResponse::<()>::invalid(errors),
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => ApiResponse::failure(msg),
            ApiError::Unauthorized => ApiResponse::failure("Unauthorized"),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_render_field_map() {
        let mut errors = FieldErrors::new();
        errors.insert("site_name".into(), "Site name is required".into());

        let (status, body) = body_of(ApiError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["site_name"], "Site name is required");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn ownership_and_lookup_failures_map_to_status_codes() {
        let (status, body) = body_of(ApiError::Forbidden("nope".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "nope");

        let (status, _) = body_of(ApiError::NotFound("gone".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = body_of(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn internal_errors_show_only_their_public_message() {
        let error = ApiError::Internal("Failed to fetch energy records".into());
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch energy records");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn malformed_query_renders_bad_request_envelope() {
        use axum::{extract::Query, http::Uri};

        let uri: Uri = "/energy?limit=lots".parse().unwrap();
        let rejection = Query::<crate::models::EnergyListQuery>::try_from_uri(&uri).unwrap_err();
        let (status, body) = body_of(ApiError::from(rejection)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Failed to deserialize query string"));
    }
}
