//! Taskstack REST API
//!
//! HTTP surface over the store and authentication crates.
//!
//! # API Structure
//!
//! ```text
//! /
//! ├── /auth          - Registration and login (public)
//! ├── /users         - User management (bearer token)
//! ├── /todos         - Todo management, paginated (bearer token)
//! ├── /health        - Liveness (public)
//! └── /swagger-ui    - Interactive API docs (public)
//! ```
//!
//! # Middleware
//!
//! Identity resolution and authorization are separate layers. The auth
//! layer attaches an identity when a valid bearer token is present and
//! never rejects; the policy middleware then returns 401 for protected
//! routes without an identity. The error envelope middleware sits
//! outside both so that their rejections carry the request path too.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod policy;
pub mod routes;
pub mod state;

use axum::http::HeaderName;
use axum::Router;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Enable response compression
    pub enable_compression: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_compression: true,
            enable_tracing: true,
        }
    }
}

/// Router with identity, authorization, and error envelope layers only.
///
/// This is the core the integration tests exercise; `create_router`
/// wraps it with the observability stack.
fn secured_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::swagger_routes())
        .layer(axum::middleware::from_fn(policy::authorize_middleware))
        .layer(state.auth.layer())
        .layer(axum::middleware::from_fn(error::error_envelope_middleware))
        .with_state(state)
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let mut router = secured_router(state);

    let x_request_id = HeaderName::from_static("x-request-id");
    router = router
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(x_request_id));

    if config.enable_tracing {
        router = router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        );
    }

    if config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    if config.enable_cors {
        let cors = if config.cors_origins.contains(&"*".to_string()) {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(
                    config
                        .cors_origins
                        .iter()
                        .filter_map(|o| o.parse().ok())
                        .collect::<Vec<_>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers(Any)
        };
        router = router.layer(cors);
    }

    router
}

/// Router for tests: security layers only, no observability stack
pub fn create_test_router(state: Arc<AppState>) -> Router {
    secured_router(state)
}
