//! Authorization policy
//!
//! "Authenticated unless allow-listed": the auth layer only attaches an
//! identity, and this middleware decides whether the absence of one is
//! fatal for the route. Public routes stay reachable with a missing or
//! malformed token.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use taskstack_auth::AuthenticatedIdentity;

use crate::error::ApiError;

/// Route prefixes reachable without an identity
const PUBLIC_PREFIXES: &[&str] = &["/auth/", "/v3/api-docs", "/swagger-ui/"];

/// Exact public routes
const PUBLIC_PATHS: &[&str] = &["/auth", "/health", "/swagger-ui", "/swagger-ui.html"];

/// Whether a path is on the public allow-list
pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Enforce the allow-list; composed after the identity-resolving layer
pub async fn authorize_middleware(req: Request, next: Next) -> Response {
    if is_public(req.uri().path()) {
        return next.run(req).await;
    }

    if req.extensions().get::<AuthenticatedIdentity>().is_none() {
        return ApiError::Unauthenticated.into_response();
    }

    next.run(req).await
}
