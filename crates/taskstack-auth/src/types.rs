//! Request identity and token claim types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use taskstack_store::{Principal, Role};

/// The resolved principal attached to one request's processing context.
///
/// Lives in the request extensions, never in any process-wide holder;
/// it is inserted at most once per request and never replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedIdentity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&Principal> for AuthenticatedIdentity {
    fn from(principal: &Principal) -> Self {
        Self {
            user_id: principal.id,
            username: principal.username.clone(),
            email: principal.email.clone(),
            role: principal.role,
        }
    }
}

/// JWT claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the principal's username
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Token id; makes every issued token unique even within one
    /// second of issued-at granularity
    pub jti: String,
    /// Caller-supplied extra claims, merged flat into the payload
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn extra_claims_flatten_into_payload() {
        let mut extra = HashMap::new();
        extra.insert("role".to_string(), Value::String("USER".to_string()));
        let claims = TokenClaims {
            sub: "alice".to_string(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 60,
            iss: "taskstack".to_string(),
            jti: Uuid::new_v4().to_string(),
            extra,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "alice");
        assert_eq!(json["role"], "USER");
        assert!(json.get("extra").is_none());
    }
}
