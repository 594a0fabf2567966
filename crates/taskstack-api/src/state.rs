//! Application state shared across handlers

use std::sync::Arc;

use taskstack_auth::{AuthConfig, AuthResult, AuthService, PasswordConfig};
use taskstack_store::{MemoryStore, TodoStore, UserStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Principal records
    pub users: Arc<dyn UserStore>,
    /// Todo records
    pub todos: Arc<dyn TodoStore>,
    /// Authentication gateway and services
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self { users, todos, auth }
    }

    /// State over a fresh in-memory store
    pub fn in_memory(config: AuthConfig) -> AuthResult<Self> {
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(AuthService::new(store.clone(), config)?);
        Ok(Self {
            users: store.clone(),
            todos: store,
            auth,
        })
    }

    /// State for tests: in-memory store, cheap hashing parameters
    pub fn for_tests() -> Self {
        let mut config = AuthConfig::default();
        config.password = PasswordConfig::fast();
        Self::in_memory(config).expect("test auth config is valid")
    }
}
