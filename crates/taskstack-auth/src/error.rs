//! Authentication error types

use thiserror::Error;

/// Authentication and authorization errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration collided with an existing username or email
    #[error("{field} already exists")]
    DuplicateIdentity { field: &'static str },

    /// Unknown user or wrong password; deliberately one variant so the
    /// two cases cannot diverge in the external response
    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// A protected route was reached without an attached identity
    #[error("Authentication failed.")]
    Unauthenticated,

    /// Identity present but role insufficient
    #[error("You do not have permission to access this resource.")]
    Forbidden,

    /// Token failed structural or signature checks
    #[error("Malformed or invalid token")]
    MalformedToken,

    /// Signing secret or hashing parameters unusable
    #[error("Invalid auth configuration: {0}")]
    InvalidConfig(String),

    /// Anything unexpected; detail stays internal
    #[error("Internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::DuplicateIdentity { .. } => 409,
            AuthError::InvalidCredentials => 401,
            AuthError::Unauthenticated => 401,
            AuthError::Forbidden => 403,
            AuthError::MalformedToken => 401,
            AuthError::InvalidConfig(_) => 500,
            AuthError::Internal(_) => 500,
        }
    }

    /// Message safe to show to clients; internal detail is stripped
    pub fn client_message(&self) -> String {
        match self {
            AuthError::InvalidConfig(_) | AuthError::Internal(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
            // Token problems are reported as a plain authentication failure
            AuthError::MalformedToken => "Authentication failed.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<taskstack_store::StoreError> for AuthError {
    fn from(e: taskstack_store::StoreError) -> Self {
        match e {
            taskstack_store::StoreError::Duplicate { field } => {
                AuthError::DuplicateIdentity { field }
            }
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        // Expired, tampered, and structurally broken tokens all collapse
        // to the same variant; validation fails closed.
        AuthError::MalformedToken
    }
}

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;
