//! OpenAPI Documentation
//!
//! Auto-generated OpenAPI 3.0 specification for the Taskstack API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::dto;
use crate::error::ErrorResponse;
use crate::handlers;

/// Taskstack API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskstack API",
        description = "REST API for user and todo management with JWT authentication.",
        version = "0.1.0",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    paths(
        // Health
        handlers::health::health_check,
        // Auth
        handlers::auth::register,
        handlers::auth::authenticate,
        // Users
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        // Todos
        handlers::todos::list_todos,
        handlers::todos::get_todo,
        handlers::todos::create_todo,
        handlers::todos::update_todo,
        handlers::todos::delete_todo,
    ),
    components(
        schemas(
            // Common
            ErrorResponse,
            handlers::health::HealthResponse,
            dto::PaginatedTodoResponse,
            dto::PageMetadata,
            // Auth
            dto::RegisterRequest,
            dto::AuthenticateRequest,
            dto::AuthenticationResponse,
            // Users
            dto::CreateUserRequest,
            dto::UpdateUserRequest,
            dto::UserResponse,
            // Todos
            dto::CreateTodoRequest,
            dto::UpdateTodoRequest,
            dto::TodoResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "User management"),
        (name = "Todos", description = "Todo management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
