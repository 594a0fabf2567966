//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use taskstack_store::{Principal, Role};

/// User creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    #[schema(example = "bob")]
    pub username: String,

    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "bob@example.com")]
    pub email: String,

    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// Partial user update; absent fields are left untouched.
///
/// Password changes deliberately have no path through this DTO.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
}

/// User representation; the password hash never leaves the store layer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "USER")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Principal> for UserResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            username: principal.username,
            email: principal.email,
            role: principal.role,
            created_at: principal.created_at,
            updated_at: principal.updated_at,
        }
    }
}
