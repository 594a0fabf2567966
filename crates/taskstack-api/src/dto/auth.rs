//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    #[schema(example = "alice")]
    pub username: String,

    /// Email address
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthenticateRequest {
    #[validate(length(min = 1, message = "must not be blank"))]
    #[schema(example = "alice")]
    pub username: String,

    #[validate(length(min = 1, message = "must not be blank"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Token response for both registration and login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticationResponse {
    /// Signed bearer token
    pub access_token: String,
}
