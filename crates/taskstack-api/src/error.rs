//! API error handling
//!
//! Every failure leaves the API as the same JSON envelope:
//! `{timestamp, status, error, message, path}`. Internal detail is
//! logged and never serialized into a response.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed.")]
    Unauthenticated,

    #[error("You do not have permission to access this resource.")]
    Forbidden,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("{field} already exists")]
    Duplicate { field: &'static str },

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message serialized to clients; internal detail is stripped
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// The uniform error envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// RFC 3339 timestamp of the failure
    pub timestamp: String,
    /// HTTP status code
    pub status: u16,
    /// Status reason phrase
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Request path the failure occurred on
    pub path: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: String, path: String) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
            path,
        }
    }
}

/// Marker stashed in response extensions so the envelope middleware can
/// rebuild the body with the request path filled in
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.client_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        // The path is not known here; the envelope middleware fills it.
        let body = ErrorResponse::new(status, message.clone(), String::new());
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorContext { status, message });
        response
    }
}

/// Rewrites error responses with the request path in the envelope.
///
/// Composed outside the auth and policy layers so that their rejections
/// pass through it too.
pub async fn error_envelope_middleware(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    match response.extensions().get::<ErrorContext>().cloned() {
        Some(ctx) => {
            let body = ErrorResponse::new(ctx.status, ctx.message, path);
            (ctx.status, Json(body)).into_response()
        }
        None => response,
    }
}

impl From<taskstack_auth::AuthError> for ApiError {
    fn from(err: taskstack_auth::AuthError) -> Self {
        use taskstack_auth::AuthError;
        match err {
            AuthError::DuplicateIdentity { field } => Self::Duplicate { field },
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Unauthenticated | AuthError::MalformedToken => Self::Unauthenticated,
            AuthError::Forbidden => Self::Forbidden,
            AuthError::InvalidConfig(detail) | AuthError::Internal(detail) => {
                Self::Internal(detail)
            }
        }
    }
}

impl From<taskstack_store::StoreError> for ApiError {
    fn from(err: taskstack_store::StoreError) -> Self {
        use taskstack_store::StoreError;
        match err {
            StoreError::Duplicate { field } => Self::Duplicate { field },
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::InvalidInput(msg) => Self::BadRequest(msg),
            StoreError::Internal(detail) => Self::Internal(detail),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(format_validation_errors(&err))
    }
}

/// Format validation errors into a readable field-level summary
pub fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                match &e.message {
                    Some(m) => format!("{}: {}", field, m),
                    None => format!("{}: invalid", field),
                }
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Duplicate { field: "email" }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::NotFound("Todo not found with id: 7".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = ApiError::Internal("pool exhausted at postgres:5432".to_string());
        let msg = err.client_message();
        assert_eq!(msg, "An unexpected error occurred. Please try again later.");
    }

    #[test]
    fn envelope_carries_reason_phrase() {
        let body = ErrorResponse::new(
            StatusCode::UNAUTHORIZED,
            "Authentication failed.".to_string(),
            "/todos".to_string(),
        );
        assert_eq!(body.status, 401);
        assert_eq!(body.error, "Unauthorized");
        assert_eq!(body.path, "/todos");
    }

    #[test]
    fn auth_errors_map_through() {
        use taskstack_auth::AuthError;
        assert!(matches!(
            ApiError::from(AuthError::MalformedToken),
            ApiError::Unauthenticated
        ));
        assert!(matches!(
            ApiError::from(AuthError::DuplicateIdentity { field: "username" }),
            ApiError::Duplicate { field: "username" }
        ));
    }
}
