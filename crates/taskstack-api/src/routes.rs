//! API Routes
//!
//! Route definitions for all API endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// All application routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/todos", todo_routes())
}

/// Authentication routes
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/authenticate", post(handlers::auth::authenticate))
}

/// User management routes
fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
}

/// Todo routes
fn todo_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/:id",
            get(handlers::todos::get_todo)
                .put(handlers::todos::update_todo)
                .delete(handlers::todos::delete_todo),
        )
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<Arc<AppState>> {
    use crate::openapi::ApiDoc;
    use axum::response::Redirect;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/v3/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/swagger-ui.html",
            get(|| async { Redirect::permanent("/swagger-ui") }),
        )
}
