//! Black-box HTTP tests
//!
//! Spawns the real router on an ephemeral port and drives it with a
//! plain HTTP client, the same way a frontend would.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use taskstack_api::{create_test_router, AppState};
use taskstack_auth::{AuthConfig, PasswordConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with_state(Arc::new(AppState::for_tests())).await
    }

    async fn spawn_with_state(state: Arc<AppState>) -> Self {
        let app = create_test_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(client: &reqwest::Client, base_url: &str, username: &str) -> String {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_then_authenticate() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let registration_token = register(&client, &srv.base_url, "alice").await;
    assert!(!registration_token.is_empty());

    let res = client
        .post(format!("{}/auth/authenticate", srv.base_url))
        .json(&json!({ "username": "alice", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let login_token = body["access_token"].as_str().unwrap();
    assert!(!login_token.is_empty());

    // Both tokens grant access to protected routes.
    for token in [registration_token.as_str(), login_token] {
        let res = client
            .get(format!("{}/todos", srv.base_url))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "alice").await;

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "password123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 409);
    assert_eq!(body["error"], "Conflict");
    assert_eq!(body["message"], "username already exists");
    assert_eq!(body["path"], "/auth/register");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "alice").await;

    let mut envelopes = Vec::new();
    for (username, password) in [("alice", "wrong-password"), ("nobody", "password123")] {
        let res = client
            .post(format!("{}/auth/authenticate", srv.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let mut body: Value = res.json().await.unwrap();
        body.as_object_mut().unwrap().remove("timestamp");
        envelopes.push(body);
    }

    // Unknown user and wrong password produce the same response.
    assert_eq!(envelopes[0], envelopes[1]);
    assert_eq!(envelopes[0]["message"], "Invalid username or password.");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/users", "/todos"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], 401);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["message"], "Authentication failed.");
        assert_eq!(body["path"], path);
    }
}

#[tokio::test]
async fn garbage_tokens_do_not_break_public_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // A malformed token never fails the request outright; public routes
    // stay reachable, protected routes reject.
    let res = client
        .get(format!("{}/health", srv.base_url))
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/todos", srv.base_url))
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let res = client
        .get(format!("{}/todos", srv.base_url))
        .bearer_auth(&tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let mut config = AuthConfig::default();
    config.password = PasswordConfig::fast();
    config.jwt.access_token_lifetime = Duration::from_secs(1);
    let state = Arc::new(AppState::in_memory(config).unwrap());

    let srv = TestServer::spawn_with_state(state).await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let res = client
        .get(format!("{}/todos", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_is_validated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "username": "al",
            "email": "not-an-email",
            "password": "short",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("username"));
    assert!(message.contains("email"));
    assert!(message.contains("password"));
}

#[tokio::test]
async fn user_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;

    // Create
    let res = client
        .post(format!("{}/users", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "password123",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["username"], "bob");
    assert_eq!(created["role"], "USER");
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    // Read
    let res = client
        .get(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Update
    let res = client
        .put(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "email": "robert@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["username"], "bob");
    assert_eq!(updated["email"], "robert@example.com");

    // Delete
    let res = client
        .delete(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Gone
    let res = client
        .get(format!("{}/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        format!("User not found with id: {}", id)
    );
}

#[tokio::test]
async fn todo_crud_and_pagination() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;

    let res = client
        .get(format!("{}/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let users: Value = res.json().await.unwrap();
    let user_id = users[0]["id"].as_str().unwrap().to_string();

    // Create 15 todos
    let mut first_id = String::new();
    for i in 0..15 {
        let res = client
            .post(format!("{}/todos", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({
                "title": format!("todo {}", i),
                "user_id": user_id,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        if i == 0 {
            let created: Value = res.json().await.unwrap();
            first_id = created["id"].as_str().unwrap().to_string();
        }
    }

    // Second page of 10
    let res = client
        .get(format!("{}/todos?page=2&per_page=10", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["content"].as_array().unwrap().len(), 5);

    let meta = &page["metadata"];
    assert_eq!(meta["total"], 15);
    assert_eq!(meta["current_page"], 2);
    assert_eq!(meta["last_page"], 2);
    assert_eq!(meta["from"], 11);
    assert_eq!(meta["to"], 15);
    assert_eq!(meta["path"], "/todos");
    assert_eq!(meta["prev_page_url"], "/todos?page=1&per_page=10");
    assert!(meta["next_page_url"].is_null());

    // Partial update
    let res = client
        .put(format!("{}/todos/{}", srv.base_url, first_id))
        .bearer_auth(&token)
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["title"], "todo 0");
    assert_eq!(updated["completed"], true);

    // Delete
    let res = client
        .delete(format!("{}/todos/{}", srv.base_url, first_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/todos/{}", srv.base_url, first_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn todo_for_missing_user_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;
    let missing = uuid::Uuid::new_v4();

    let res = client
        .post(format!("{}/todos", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "orphan", "user_id": missing }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        format!("User not found with id: {}", missing)
    );
}

#[tokio::test]
async fn oversized_per_page_is_clamped() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;

    let res = client
        .get(format!("{}/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let users: Value = res.json().await.unwrap();
    let user_id = users[0]["id"].as_str().unwrap().to_string();

    for i in 0..3 {
        let res = client
            .post(format!("{}/todos", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({ "title": format!("todo {}", i), "user_id": user_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/todos?page=1&per_page=500", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let page: Value = res.json().await.unwrap();
    assert_eq!(page["content"].as_array().unwrap().len(), 3);

    // The clamp applies to the window, the metadata, and the URLs alike.
    let meta = &page["metadata"];
    assert_eq!(meta["per_page"], 100);
    assert_eq!(meta["from"], 1);
    assert_eq!(meta["to"], 3);
    assert_eq!(meta["first_page_url"], "/todos?page=1&per_page=100");

    // Past the end of a clamped window, ordinals are empty rather than
    // shifted by the raw per_page value.
    let res = client
        .get(format!("{}/todos?page=2&per_page=500", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["content"].as_array().unwrap().len(), 0);
    assert!(page["metadata"]["from"].is_null());
    assert!(page["metadata"]["to"].is_null());
}

#[tokio::test]
async fn invalid_pagination_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = register(&client, &srv.base_url, "alice").await;

    let res = client
        .get(format!("{}/todos?page=0", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/v3/api-docs/openapi.json", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let spec: Value = res.json().await.unwrap();
    assert_eq!(spec["info"]["title"], "Taskstack API");
}
