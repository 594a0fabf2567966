//! Custom Axum Extractors
//!
//! Request extractors for identity, validation, and pagination.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use taskstack_auth::AuthenticatedIdentity;

use crate::error::{format_validation_errors, ApiError};

// =============================================================================
// Identity Extractors
// =============================================================================

/// The identity attached by the auth layer; rejects with 401 when absent
pub struct Identity(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Identity)
            .ok_or_else(|| ApiError::Unauthenticated.into_response())
    }
}

/// Role scaffolding: rejects with 403 unless the identity is an admin.
/// No mounted route currently requires it.
pub struct RequireAdmin(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated.into_response())?;

        if identity.is_admin() {
            Ok(RequireAdmin(identity))
        } else {
            Err(ApiError::Forbidden.into_response())
        }
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON extractor with validation
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + validator::Validate,
{
    type Rejection = Response;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()).into_response())?;

        value
            .validate()
            .map_err(|e| ApiError::Validation(format_validation_errors(&e)).into_response())?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Pagination Extractor
// =============================================================================

const MAX_PER_PAGE: u64 = 100;

/// Pagination query parameters
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

impl PaginationParams {
    /// Offset into the full result set.
    ///
    /// Derived from the clamped limit so the fetch window and the page
    /// metadata stay consistent; saturating so an absurd `page` value
    /// cannot overflow.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit())
    }

    /// Per-page count clamped to the service maximum
    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_PER_PAGE)
    }
}

/// Pagination extractor with bounds checks
pub struct Pagination(pub PaginationParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()).into_response())?;

        if params.page == 0 {
            return Err(ApiError::BadRequest("page must be >= 1".to_string()).into_response());
        }
        if params.per_page == 0 {
            return Err(ApiError::BadRequest("per_page must be >= 1".to_string()).into_response());
        }

        // Clamp once here so every consumer sees the same per-page value
        params.per_page = params.per_page.min(MAX_PER_PAGE);

        Ok(Pagination(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_offset() {
        let params = PaginationParams { page: 1, per_page: 10 };
        assert_eq!(params.offset(), 0);

        let params = PaginationParams { page: 2, per_page: 10 };
        assert_eq!(params.offset(), 10);

        let params = PaginationParams { page: 5, per_page: 20 };
        assert_eq!(params.offset(), 80);
    }

    #[test]
    fn pagination_limit_clamped() {
        let params = PaginationParams { page: 1, per_page: 500 };
        assert_eq!(params.limit(), 100);

        let params = PaginationParams { page: 1, per_page: 25 };
        assert_eq!(params.limit(), 25);
    }

    #[test]
    fn offset_uses_clamped_per_page() {
        // An oversized per_page must not shift the fetch window past
        // the ordinals the metadata reports.
        let params = PaginationParams { page: 2, per_page: 500 };
        assert_eq!(params.offset(), 100);
        assert_eq!(params.offset(), params.limit() * (params.page - 1));
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let params = PaginationParams { page: u64::MAX, per_page: 100 };
        assert_eq!(params.offset(), u64::MAX);
    }
}
