//! JWT Token Service
//!
//! HS256 access tokens carrying the principal's username as subject.
//! The signing secret arrives base64-encoded from configuration and is
//! decoded once at construction. Validation fails closed: any signature,
//! structure, or expiry problem yields "invalid", never a panic or a
//! leaked parser error.

use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use taskstack_store::Principal;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::TokenClaims;

const MIN_SECRET_BYTES: usize = 32;

/// JWT service for token issuance and validation
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service; fails if the configured secret does not
    /// decode or is too short to sign with
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        let secret = base64::engine::general_purpose::STANDARD
            .decode(&config.secret)
            .map_err(|_| AuthError::InvalidConfig("JWT secret is not valid base64".to_string()))?;

        if secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::InvalidConfig(format!(
                "JWT secret must decode to at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        let encoding_key = EncodingKey::from_secret(&secret);
        let decoding_key = DecodingKey::from_secret(&secret);

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    /// Issue an access token for a principal, merging any extra claims
    pub fn issue(
        &self,
        principal: &Principal,
        extra: HashMap<String, Value>,
    ) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now
            + Duration::from_std(self.config.access_token_lifetime)
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        let claims = TokenClaims {
            sub: principal.username.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            extra,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))
    }

    /// Check a token against a resolved principal.
    ///
    /// True only when the signature verifies, the token is unexpired,
    /// and the subject equals the principal's username exactly. Every
    /// failure mode returns false rather than an error.
    pub fn validate(&self, token: &str, principal: &Principal) -> bool {
        match self.decode_token(token) {
            Ok(claims) => claims.sub == principal.username,
            Err(_) => false,
        }
    }

    /// Decode a token and return its subject.
    ///
    /// Used before the principal is known, so it verifies the signature
    /// and expiry but cannot compare the subject against anything.
    pub fn extract_subject(&self, token: &str) -> AuthResult<String> {
        let claims = self.decode_token(token)?;
        Ok(claims.sub)
    }

    fn decode_token(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_exp = true;
        // Zero leeway: expiry comparisons are exact wall-clock
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}
