//! Authentication configuration
//!
//! Secure defaults following OWASP recommendations; the signing secret
//! has no usable default and must come from configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Built-in development signing secret (base64). The server refuses to
/// start with this value outside dev mode.
pub const DEV_JWT_SECRET: &str = "dGFza3N0YWNrLWRldi1zZWNyZXQtMDEyMzQ1Njc4OWFiY2RlZg==";

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Password hashing configuration
    #[serde(default)]
    pub password: PasswordConfig,
}

impl AuthConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt.secret = secret;
        }
        if let Ok(ttl) = std::env::var("JWT_ACCESS_TOKEN_LIFETIME_SECS") {
            if let Ok(secs) = ttl.parse::<u64>() {
                config.jwt.access_token_lifetime = Duration::from_secs(secs);
            }
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.jwt.issuer = issuer;
        }

        config
    }

    /// Validate the configuration, returning all problems found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        use base64::Engine;
        match base64::engine::general_purpose::STANDARD.decode(&self.jwt.secret) {
            Ok(bytes) if bytes.len() < 32 => {
                errors.push("JWT secret must decode to at least 32 bytes".to_string());
            }
            Ok(_) => {}
            Err(_) => errors.push("JWT secret is not valid base64".to_string()),
        }

        if self.jwt.access_token_lifetime.as_secs() == 0 {
            errors.push("JWT access token lifetime must be non-zero".to_string());
        }
        if self.password.memory_cost < 4096 {
            errors.push("Argon2 memory cost below 4096 KiB".to_string());
        }
        if self.password.time_cost == 0 {
            errors.push("Argon2 time cost must be at least 1".to_string());
        }
        if self.password.parallelism == 0 {
            errors.push("Argon2 parallelism must be at least 1".to_string());
        }

        errors
    }
}

/// JWT token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret, base64-encoded; decoded before use
    pub secret: String,
    /// Access token lifetime
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,
    /// Token issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.to_string(),
            access_token_lifetime: Duration::from_secs(24 * 60 * 60), // 24 hours
            issuer: "taskstack".to_string(),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB (OWASP recommends 19456 KiB = 19 MiB minimum)
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            // OWASP recommended values for Argon2id
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
        }
    }
}

impl PasswordConfig {
    /// Cheap parameters for tests
    pub fn fast() -> Self {
        Self {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
        }
    }
}
