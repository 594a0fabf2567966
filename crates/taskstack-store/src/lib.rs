//! Taskstack Persistence Layer
//!
//! Capability traits for principal and todo storage, plus the in-memory
//! implementation backing the server and the test suite.
//!
//! The authentication core consumes only [`CredentialStore`]; the wider
//! CRUD surface consumes [`UserStore`] and [`TodoStore`]. Keeping these
//! as traits means the callers never know (or care) what engine sits
//! behind them.

pub mod error;
pub mod memory;
pub mod models;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::*;

use async_trait::async_trait;
use uuid::Uuid;

/// Persisted principal records keyed by username/email.
///
/// `save` enforces username and email uniqueness itself and reports a
/// collision as [`StoreError::Duplicate`]; callers pre-check with the
/// existence methods for friendlier errors but must not rely on the
/// check-then-save window being race free.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> StoreResult<bool>;

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Principal>>;

    async fn save(&self, principal: NewPrincipal) -> StoreResult<Principal>;
}

/// Full CRUD over principals, for the user management endpoints.
#[async_trait]
pub trait UserStore: CredentialStore {
    async fn list_users(&self) -> StoreResult<Vec<Principal>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>>;

    /// Partial update; absent fields keep their previous values.
    async fn update_user(&self, id: Uuid, update: PrincipalUpdate) -> StoreResult<Principal>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;
}

/// CRUD plus offset pagination over todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Returns one page of todos plus the total count.
    async fn list_todos(&self, offset: usize, limit: usize)
        -> StoreResult<(Vec<TodoRecord>, usize)>;

    async fn find_todo_by_id(&self, id: Uuid) -> StoreResult<Option<TodoRecord>>;

    /// Creates a todo; fails with `NotFound` if the owning user does not exist.
    async fn create_todo(&self, todo: NewTodo) -> StoreResult<TodoRecord>;

    /// Partial update; absent fields keep their previous values.
    async fn update_todo(&self, id: Uuid, update: TodoUpdate) -> StoreResult<TodoRecord>;

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()>;
}
