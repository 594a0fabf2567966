//! In-memory store
//!
//! The single concrete backing store. Records live in `RwLock`-guarded
//! maps; locks are never held across await points.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    NewPrincipal, NewTodo, Principal, PrincipalUpdate, TodoRecord, TodoUpdate,
};
use crate::{CredentialStore, TodoStore, UserStore};

/// Map-backed implementation of all store capabilities
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, Principal>>,
    todos: RwLock<HashMap<Uuid, TodoRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn exists_by_username(&self, username: &str) -> StoreResult<bool> {
        let users = self.users.read();
        Ok(users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let users = self.users.read();
        Ok(users.values().any(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Principal>> {
        let users = self.users.read();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn save(&self, principal: NewPrincipal) -> StoreResult<Principal> {
        let mut users = self.users.write();

        // Uniqueness is enforced here, under the write lock, so the
        // existence pre-checks in callers cannot race past it.
        if users.values().any(|u| u.username == principal.username) {
            return Err(StoreError::Duplicate { field: "username" });
        }
        if users.values().any(|u| u.email == principal.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }

        let now = Utc::now();
        let record = Principal {
            id: Uuid::new_v4(),
            username: principal.username,
            email: principal.email,
            password_hash: principal.password_hash,
            role: principal.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<Principal>> {
        let users = self.users.read();
        let mut all: Vec<Principal> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>> {
        let users = self.users.read();
        Ok(users.get(&id).cloned())
    }

    async fn update_user(&self, id: Uuid, update: PrincipalUpdate) -> StoreResult<Principal> {
        let mut users = self.users.write();

        if let Some(username) = &update.username {
            if users.values().any(|u| u.id != id && &u.username == username) {
                return Err(StoreError::Duplicate { field: "username" });
            }
        }
        if let Some(email) = &update.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Duplicate { field: "email" });
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("User", id))?;

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write();
        users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("User", id))
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_todos(
        &self,
        offset: usize,
        limit: usize,
    ) -> StoreResult<(Vec<TodoRecord>, usize)> {
        let todos = self.todos.read();
        let mut all: Vec<TodoRecord> = todos.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let total = all.len();
        let page = all.into_iter().skip(offset).take(limit).collect();
        Ok((page, total))
    }

    async fn find_todo_by_id(&self, id: Uuid) -> StoreResult<Option<TodoRecord>> {
        let todos = self.todos.read();
        Ok(todos.get(&id).cloned())
    }

    async fn create_todo(&self, todo: NewTodo) -> StoreResult<TodoRecord> {
        {
            let users = self.users.read();
            if !users.contains_key(&todo.user_id) {
                return Err(StoreError::not_found("User", todo.user_id));
            }
        }

        let now = Utc::now();
        let record = TodoRecord {
            id: Uuid::new_v4(),
            title: todo.title,
            description: todo.description,
            completed: false,
            user_id: todo.user_id,
            created_at: now,
            updated_at: now,
        };
        let mut todos = self.todos.write();
        todos.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_todo(&self, id: Uuid, update: TodoUpdate) -> StoreResult<TodoRecord> {
        let mut todos = self.todos.write();
        let todo = todos
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Todo", id))?;

        if let Some(title) = update.title {
            todo.title = title;
        }
        if let Some(description) = update.description {
            todo.description = Some(description);
        }
        if let Some(completed) = update.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        let mut todos = self.todos.write();
        todos
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Todo", id))
    }
}
