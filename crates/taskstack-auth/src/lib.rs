//! Taskstack Authentication Core
//!
//! Stateless JWT authentication for the Taskstack API:
//!
//! - **Password Security**: Argon2id hashing (OWASP recommended)
//! - **JWT Tokens**: HS256 access tokens, subject = username, base64
//!   signing secret supplied at process start
//! - **Request Identity**: tower middleware resolving bearer tokens to
//!   a request-scoped identity in the request extensions
//!
//! # Flow
//!
//! ```text
//! Request → AuthLayer → (identity attached?) → policy layer → handler
//!                │
//!                ▼
//!     extract_subject → CredentialStore → validate → identity
//! ```
//!
//! The middleware never rejects a request; the policy layer in the API
//! crate enforces "authenticated unless allow-listed".

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod types;

pub use config::{AuthConfig, JwtConfig, PasswordConfig, DEV_JWT_SECRET};
pub use error::{AuthError, AuthResult};
pub use jwt::JwtService;
pub use middleware::{AuthLayer, AuthMiddleware};
pub use password::PasswordService;
pub use types::{AuthenticatedIdentity, TokenClaims};

use std::collections::HashMap;
use std::sync::Arc;

use taskstack_store::{CredentialStore, NewPrincipal, Principal, Role};

/// Role claim merged into every issued token
fn role_claim(principal: &Principal) -> HashMap<String, serde_json::Value> {
    let mut claims = HashMap::new();
    claims.insert(
        "role".to_string(),
        serde_json::Value::String(principal.role.as_str().to_string()),
    );
    claims
}

/// Authentication gateway: registration and login over a credential
/// store, plus the services the rest of the stack composes with.
pub struct AuthService {
    pub jwt: JwtService,
    pub password: PasswordService,
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: AuthConfig) -> AuthResult<Self> {
        let jwt = JwtService::new(config.jwt)?;
        let password = PasswordService::new(config.password);

        Ok(Self {
            jwt,
            password,
            store,
        })
    }

    /// Create the identity-resolving layer for the router
    pub fn layer(&self) -> AuthLayer {
        AuthLayer::new(Arc::new(self.jwt.clone()), self.store.clone())
    }

    /// Register a new principal and issue its first token.
    ///
    /// Rejects before hashing if the username or email is taken; the
    /// store's own uniqueness enforcement backstops the check.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<(Principal, String)> {
        if self.store.exists_by_username(username).await? {
            return Err(AuthError::DuplicateIdentity { field: "username" });
        }
        if self.store.exists_by_email(email).await? {
            return Err(AuthError::DuplicateIdentity { field: "email" });
        }

        let password_hash = self.password.hash(password)?;

        let principal = self
            .store
            .save(NewPrincipal {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role: Role::User,
            })
            .await?;

        let token = self.jwt.issue(&principal, role_claim(&principal))?;

        tracing::info!(user_id = %principal.id, username = %principal.username, "User registered");
        Ok((principal, token))
    }

    /// Verify credentials and issue a token.
    ///
    /// An unknown username and a wrong password take the same exit: one
    /// opaque `InvalidCredentials`, so responses cannot be used to
    /// enumerate accounts.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<(Principal, String)> {
        let principal = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.password.verify(password, &principal.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.issue(&principal, role_claim(&principal))?;

        tracing::info!(user_id = %principal.id, username = %principal.username, "User authenticated");
        Ok((principal, token))
    }
}
