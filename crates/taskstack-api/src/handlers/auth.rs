//! Authentication Handlers
//!
//! Registration and login. Both delegate to the authentication gateway;
//! the uniform `InvalidCredentials` for unknown users and wrong
//! passwords is enforced there, not here.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::dto::{AuthenticateRequest, AuthenticationResponse, RegisterRequest};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthenticationResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthenticationResponse>)> {
    let (_, token) = state
        .auth
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthenticationResponse { access_token: token }),
    ))
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/auth/authenticate",
    tag = "Authentication",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Authentication successful", body = AuthenticationResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AuthenticateRequest>,
) -> ApiResult<Json<AuthenticationResponse>> {
    let (_, token) = state
        .auth
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(AuthenticationResponse { access_token: token }))
}
