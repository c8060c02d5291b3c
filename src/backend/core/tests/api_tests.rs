//! End-to-end tests for the HTTP surface.
//!
//! Tests cover:
//! - Health and metrics endpoints
//! - Signup, login, refresh and current user
//! - Password forgot / reset / change flows
//! - Event CRUD with per-method permissions
//! - RBAC administration routes
//! - Error envelopes for malformed requests

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use eventify_core::api::{build_router, AppState};
use eventify_core::config::AuthConfig;
use eventify_core::events::MemoryEventRepository;
use eventify_core::rbac::{roles::seed_defaults, MemoryStore, PredefinedRole, RbacStore};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    state: AppState,
    store: Arc<MemoryStore>,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_defaults(store.as_ref()).await.unwrap();
        let state = AppState::new(
            &AuthConfig::with_secret("api-test-secret"),
            store.clone(),
            store.clone(),
            Arc::new(MemoryEventRepository::new()),
        )
        .unwrap();
        Self { state, store }
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn send_raw(&self, method: Method, uri: &str, authorization: Option<&str>, raw: &str) -> StatusCode {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.router()
            .oneshot(builder.body(Body::from(raw.to_string())).unwrap())
            .await
            .unwrap()
            .status()
    }

    /// Sign up a fresh user and return (email, user id).
    async fn signup(&self, password: &str) -> (String, Uuid) {
        let email: String = SafeEmail().fake();
        let email = format!("{}.{}", Uuid::new_v4().simple(), email);
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "email": email,
                    "password": password,
                    "first_name": first,
                    "last_name": last,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let user_id = body["data"]["user_id"].as_str().unwrap().parse().unwrap();
        (email, user_id)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        format!("Bearer {}", body["data"]["token"].as_str().unwrap())
    }

    async fn grant(&self, user_id: Uuid, role: PredefinedRole) {
        let role = self.store.get_role_by_name(role.name()).await.unwrap();
        self.store.assign_role_to_user(user_id, role.id).await.unwrap();
    }

    /// A logged-in user holding `role`.
    async fn user_with_role(&self, role: PredefinedRole) -> (Uuid, String) {
        let (email, user_id) = self.signup("password123").await;
        self.grant(user_id, role).await;
        (user_id, self.login(&email, "password123").await)
    }

    async fn create_event(&self, bearer: &str, name: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/events",
                Some(bearer),
                Some(json!({
                    "name": name,
                    "date": "2030-05-01T18:00:00Z",
                    "location": "Main Hall",
                    "tags": ["music"],
                    "capacity": 200,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }
}

// ============================================================================
// Operational Endpoints
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_metrics_disabled_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app.send(Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Credential Flows
// ============================================================================

#[tokio::test]
async fn test_signup_then_login_then_me() {
    let app = TestApp::new().await;
    let (email, user_id) = app.signup("password123").await;
    let bearer = app.login(&email.to_uppercase(), "password123").await;

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", Some(bearer.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.to_string());
    assert_eq!(body["data"]["email"], email.to_lowercase());
    assert!(body["data"].get("password_hash").is_none());
    assert_eq!(body["data"]["permissions"], json!([]));
}

#[tokio::test]
async fn test_duplicate_signup_is_409() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": email, "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "DUPLICATE_RECORD");
}

#[tokio::test]
async fn test_short_password_is_422() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "short@example.com", "password": "12345" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = TestApp::new().await;
    let status = app
        .send_raw(Method::POST, "/api/v1/auth/login", None, "{\"email\": ")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;

    let (wrong_status, wrong_body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "not-the-password" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "password123" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"]["code"], unknown_body["error"]["code"]);
    assert_eq!(wrong_body["error"]["message"], unknown_body["error"]["message"]);
}

#[tokio::test]
async fn test_refresh_picks_up_new_roles() {
    let app = TestApp::new().await;
    let (email, user_id) = app.signup("password123").await;
    let bearer = app.login(&email, "password123").await;

    let (status, _) = app.send(Method::GET, "/api/v1/events", Some(bearer.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.grant(user_id, PredefinedRole::Viewer).await;

    // The old token is a snapshot and still lacks the grant.
    let (status, _) = app.send(Method::GET, "/api/v1/events", Some(bearer.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send(Method::POST, "/api/v1/auth/refresh", Some(bearer.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    let refreshed = format!("Bearer {}", body["data"]["token"].as_str().unwrap());

    let (status, _) = app.send(Method::GET, "/api/v1/events", Some(refreshed.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bad_authorization_headers_are_401() {
    let app = TestApp::new().await;

    for header in [None, Some("Token abc"), Some("Bearer"), Some("Bearer not.a.jwt")] {
        let (status, body) = app.send(Method::GET, "/api/v1/auth/me", header, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{header:?}");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_forgot_password_response_is_generic() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;

    let (known_status, known) = app
        .send(Method::POST, "/api/v1/password/forgot", None, Some(json!({ "email": email })))
        .await;
    let (unknown_status, unknown) = app
        .send(
            Method::POST,
            "/api/v1/password/forgot",
            None,
            Some(json!({ "email": "ghost@example.com" })),
        )
        .await;

    assert_eq!(known_status, StatusCode::OK);
    assert_eq!(unknown_status, StatusCode::OK);
    assert_eq!(known, unknown);
}

#[tokio::test]
async fn test_reset_password_flow() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;

    let issued = app.state.auth.forgot_password(&email).await.unwrap().unwrap();

    // A reset token is not an access token.
    let reset_bearer = format!("Bearer {}", issued.token);
    let (status, _) = app.send(Method::GET, "/api/v1/auth/me", Some(reset_bearer.as_str()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/password/reset",
            None,
            Some(json!({ "token": issued.token, "new_password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    app.login(&email, "brand-new-pass").await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_rejects_access_token() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;
    let bearer = app.login(&email, "password123").await;
    let access_token = bearer.trim_start_matches("Bearer ");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/password/reset",
            None,
            Some(json!({ "token": access_token, "new_password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;
    let bearer = app.login(&email, "password123").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/password/change",
            Some(bearer.as_str()),
            Some(json!({ "current_password": "wrong-one", "new_password": "another-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/password/change",
            Some(bearer.as_str()),
            Some(json!({ "current_password": "password123", "new_password": "another-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.login(&email, "another-pass").await;
}

#[tokio::test]
async fn test_change_password_requires_token() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/password/change",
            None,
            Some(json!({ "current_password": "a", "new_password": "b" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_editor_can_update_but_not_delete() {
    let app = TestApp::new().await;
    let (_, editor) = app.user_with_role(PredefinedRole::Editor).await;
    let id = app.create_event(&editor, "Launch Party").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/events/{id}"),
            Some(editor.as_str()),
            Some(json!({ "capacity": 250 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["capacity"], 250);
    assert_eq!(body["data"]["name"], "Launch Party");

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/v1/events/{id}"), Some(editor.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = app
        .send(Method::GET, &format!("/api/v1/events/{id}"), Some(editor.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_viewer_reads_only() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_role(PredefinedRole::Admin).await;
    let (_, viewer) = app.user_with_role(PredefinedRole::Viewer).await;
    let id = app.create_event(&admin, "Book Club").await;

    let (status, body) = app.send(Method::GET, "/api/v1/events", Some(viewer.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["events"][0]["id"], id.to_string());

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/events",
            Some(viewer.as_str()),
            Some(json!({ "name": "Nope", "date": "2030-01-01T00:00:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_deletes_event() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_role(PredefinedRole::Admin).await;
    let id = app.create_event(&admin, "Short Lived").await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/v1/events/{id}"), Some(admin.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted");

    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/events/{id}"), Some(admin.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_list_pagination_clamps_limit() {
    let app = TestApp::new().await;
    let (_, editor) = app.user_with_role(PredefinedRole::Editor).await;
    for i in 0..3 {
        app.create_event(&editor, &format!("Event {i}")).await;
    }

    let (status, body) = app
        .send(Method::GET, "/api/v1/events?page=2&limit=2", Some(editor.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .send(Method::GET, "/api/v1/events?limit=1000", Some(editor.as_str()), None)
        .await;
    assert_eq!(body["data"]["limit"], 100);
}

#[tokio::test]
async fn test_invalid_event_input() {
    let app = TestApp::new().await;
    let (_, editor) = app.user_with_role(PredefinedRole::Editor).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/events",
            Some(editor.as_str()),
            Some(json!({ "name": "  ", "date": "2030-01-01T00:00:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let status = app
        .send_raw(Method::POST, "/api/v1/events", Some(editor.as_str()), "not json")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_events_require_authentication() {
    let app = TestApp::new().await;
    let (status, _) = app.send(Method::GET, "/api/v1/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/api/v1/events", Some("Token abc"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Administration
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_permission() {
    let app = TestApp::new().await;
    let (_, editor) = app.user_with_role(PredefinedRole::Editor).await;

    let (status, _) = app.send(Method::GET, "/api/v1/admin/roles", Some(editor.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::GET, "/api/v1/admin/roles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_builds_a_role_and_assigns_it() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_role(PredefinedRole::Admin).await;
    let (email, user_id) = app.signup("password123").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/admin/roles",
            Some(admin.as_str()),
            Some(json!({ "name": "Janitor", "description": "Cleans up events" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let role_id = body["data"]["id"].as_str().unwrap().to_string();

    let delete = app.store.get_permission_by_name("events.delete").await.unwrap();
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/admin/assign-permission",
            Some(admin.as_str()),
            Some(json!({ "role_id": role_id, "permission_id": delete.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/admin/assign-permission",
            Some(admin.as_str()),
            Some(json!({ "role_id": role_id, "permission_id": delete.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/admin/assign-role",
            Some(admin.as_str()),
            Some(json!({ "user_id": user_id, "role_id": role_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/admin/users/{user_id}/permissions"),
            Some(admin.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["events.delete"]));

    let janitor = app.login(&email, "password123").await;
    let id = app.create_event(&admin, "Messy Party").await;
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/events/{id}"), Some(janitor.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_removals_and_unknown_ids() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_role(PredefinedRole::Admin).await;
    let (_, user_id) = app.signup("password123").await;
    let viewer = app.store.get_role_by_name("Viewer").await.unwrap();

    let (status, _) = app
        .send(
            Method::DELETE,
            "/api/v1/admin/remove-role",
            Some(admin.as_str()),
            Some(json!({ "user_id": user_id, "role_id": viewer.id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/admin/assign-role",
            Some(admin.as_str()),
            Some(json!({ "user_id": Uuid::new_v4(), "role_id": viewer.id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/v1/admin/roles/{}/permissions", Uuid::new_v4()),
            Some(admin.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/admin/roles/{}/permissions", viewer.id),
            Some(admin.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "events.read");
}

#[tokio::test]
async fn test_admin_rejects_blank_names() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_role(PredefinedRole::Admin).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/admin/permissions",
            Some(admin.as_str()),
            Some(json!({ "name": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_cannot_create_reserved_permission() {
    let app = TestApp::new().await;
    let (_, admin) = app.user_with_role(PredefinedRole::Admin).await;

    for name in ["password.reset", " Password.Reset "] {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/admin/permissions",
                Some(admin.as_str()),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{name:?}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
    assert!(app.store.get_permission_by_name("password.reset").await.is_err());
}

// ============================================================================
// Error Envelope
// ============================================================================

#[tokio::test]
async fn test_middleware_and_handler_rejections_share_envelope() {
    let app = TestApp::new().await;
    let (email, _) = app.signup("password123").await;

    let (status, from_middleware) = app.send(Method::GET, "/api/v1/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, from_handler) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let keys = |body: &Value| -> Vec<String> {
        let mut keys: Vec<String> = body["error"].as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&from_middleware), keys(&from_handler));
    assert_eq!(from_middleware["success"], false);
    assert_eq!(from_middleware["error"]["code"], "MISSING_CREDENTIALS");
    assert!(from_middleware["error"]["numeric_code"].is_number());
}

// ============================================================================
// GraphQL
// ============================================================================

#[tokio::test]
async fn test_graphql_uses_the_same_gate() {
    let app = TestApp::new().await;
    let (_, viewer) = app.user_with_role(PredefinedRole::Viewer).await;

    let query = json!({ "query": "{ events(limit: 5) { total limit } }" });
    let (status, body) = app
        .send(Method::POST, "/graphql", Some(viewer.as_str()), Some(query.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["events"]["limit"], 5);

    let (_, body) = app.send(Method::POST, "/graphql", None, Some(query)).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "MISSING_CREDENTIALS");
}
