//! Request Authentication Interceptor
//!
//! Tower middleware that turns a bearer token into a request-scoped
//! identity. It never answers a request itself: a missing, malformed,
//! expired, or unresolvable token simply leaves the request without an
//! identity, and the policy layer downstream decides whether that is
//! acceptable for the route. This keeps public routes reachable even
//! with garbage in the Authorization header.

use axum::{extract::Request, http::HeaderMap, response::Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use taskstack_store::CredentialStore;

use crate::jwt::JwtService;
use crate::types::AuthenticatedIdentity;

/// Authentication middleware layer
#[derive(Clone)]
pub struct AuthLayer {
    jwt: Arc<JwtService>,
    store: Arc<dyn CredentialStore>,
}

impl AuthLayer {
    pub fn new(jwt: Arc<JwtService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { jwt, store }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt: self.jwt.clone(),
            store: self.store.clone(),
        }
    }
}

/// Authentication middleware service
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt: Arc<JwtService>,
    store: Arc<dyn CredentialStore>,
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let jwt = self.jwt.clone();
        let store = self.store.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Idempotent: an identity attached earlier in the pipeline
            // is never replaced
            if req.extensions().get::<AuthenticatedIdentity>().is_none() {
                if let Some(identity) =
                    resolve_identity(req.headers(), &jwt, store.as_ref()).await
                {
                    req.extensions_mut().insert(identity);
                }
            }

            inner.call(req).await
        })
    }
}

/// Resolve a bearer token to an identity; every failure path is `None`
async fn resolve_identity(
    headers: &HeaderMap,
    jwt: &JwtService,
    store: &dyn CredentialStore,
) -> Option<AuthenticatedIdentity> {
    let token = extract_bearer_token(headers)?;

    let subject = match jwt.extract_subject(token) {
        Ok(subject) => subject,
        Err(_) => {
            tracing::debug!("Bearer token failed decode, continuing unauthenticated");
            return None;
        }
    };

    let principal = match store.find_by_username(&subject).await {
        Ok(Some(principal)) => principal,
        Ok(None) => {
            tracing::debug!(subject = %subject, "Token subject unknown, continuing unauthenticated");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Credential lookup failed, continuing unauthenticated");
            return None;
        }
    };

    if jwt.validate(token, &principal) {
        Some(AuthenticatedIdentity::from(&principal))
    } else {
        tracing::debug!(subject = %subject, "Token failed validation against principal");
        None
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
