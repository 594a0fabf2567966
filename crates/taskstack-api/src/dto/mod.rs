//! Request and response DTOs

pub mod auth;
pub mod common;
pub mod todo;
pub mod user;

pub use auth::*;
pub use common::*;
pub use todo::*;
pub use user::*;
