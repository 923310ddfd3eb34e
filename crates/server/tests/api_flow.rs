use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::AppConfig;
use server::routes::auth::{require_admin, ServerState};
use service::auth::token::{TokenConfig, TokenService};
use service::storage::{Collection, DocumentStore, Fields, MemoryDocumentStore};

const SECRET: &str = "api-flow-secret";

struct TestApp {
    app: Router,
    store: Arc<MemoryDocumentStore>,
}

impl TestApp {
    fn new() -> Self {
        let mut cfg = AppConfig::default();
        cfg.auth.token_secret = SECRET.into();
        let store = Arc::new(MemoryDocumentStore::new());
        let app = server::build_app(store.clone(), &cfg);
        Self { app, store }
    }

    async fn seed_user(&self, email: &str, admin: bool) -> String {
        let mut body = json!({ "email": email, "name": "Seeded" });
        if admin {
            body["role"] = json!("admin");
        }
        let fields: Fields = body.as_object().cloned().unwrap_or_default();
        let res = self.store.insert_one(Collection::Users, fields).await.unwrap();
        res.inserted_id.to_string()
    }

    async fn token_for(&self, email: &str) -> String {
        let (status, body) = self.send(Method::GET, &format!("/jwt?email={email}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        body["accessToken"].as_str().unwrap().to_string()
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}

fn unauthorized() -> Value {
    json!({ "error": true, "message": "unauthorized access" })
}

fn forbidden() -> Value {
    json!({ "error": true, "message": "forbidden access" })
}

#[tokio::test]
async fn liveness_and_health() {
    let t = TestApp::new();
    let (status, body) = t.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Creative Agency Server Running"));

    let (status, body) = t.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn jwt_is_issued_only_for_registered_users() {
    let t = TestApp::new();
    t.seed_user("a@x.com", false).await;

    let (status, body) = t.send(Method::GET, "/jwt?email=ghost@x.com", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "accessToken": "" }));

    let (status, body) = t.send(Method::GET, "/jwt", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "accessToken": "" }));

    let token = t.token_for("a@x.com").await;
    let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.required_spec_claims.clear();
    let data = jsonwebtoken::decode::<Value>(&token, &jsonwebtoken::DecodingKey::from_secret(SECRET.as_bytes()), &validation).unwrap();
    assert_eq!(data.claims["email"], "a@x.com");
    assert!(data.claims["exp"].as_i64().unwrap() > chrono::Utc::now().timestamp());
}

#[tokio::test]
async fn admin_routes_run_both_guards() {
    let t = TestApp::new();
    t.seed_user("admin@x.com", true).await;
    t.seed_user("user@x.com", false).await;
    let admin = t.token_for("admin@x.com").await;
    let user = t.token_for("user@x.com").await;
    let service = json!({ "name": "Logo design", "price": 120 });

    let (status, body) = t.send(Method::POST, "/services", None, Some(service.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());

    let (status, body) = t.send(Method::POST, "/services", Some("not.a.jwt"), Some(service.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());

    let (status, body) = t.send(Method::POST, "/services", Some(&user), Some(service.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, forbidden());
    assert!(t.store.is_empty(Collection::Services).await);

    let (status, body) = t.send(Method::POST, "/services", Some(&admin), Some(service)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);
    assert!(body["insertedId"].is_string());

    let (status, body) = t.send(Method::GET, "/services", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Logo design");
    assert!(body[0]["_id"].is_string());
}

#[tokio::test]
async fn token_for_deleted_user_is_forbidden_on_admin_routes() {
    let t = TestApp::new();
    let id = t.seed_user("admin@x.com", true).await;
    let admin = t.token_for("admin@x.com").await;

    let (status, body) = t.send(Method::DELETE, &format!("/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "acknowledged": true, "deletedCount": 1 }));

    let (status, body) = t.send(Method::GET, "/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, forbidden());
}

#[tokio::test]
async fn put_service_upserts_then_overwrites() {
    let t = TestApp::new();
    t.seed_user("admin@x.com", true).await;
    let admin = t.token_for("admin@x.com").await;
    let id = uuid::Uuid::new_v4();

    let (status, body) = t
        .send(Method::PUT, &format!("/services/{id}"), Some(&admin), Some(json!({ "name": "Web", "price": "250" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["upsertedCount"], 1);
    assert_eq!(body["upsertedId"], json!(id));

    let (status, body) = t
        .send(Method::PUT, &format!("/services/{id}"), Some(&admin), Some(json!({ "name": "Web Pro", "price": 300, "image": "w.png" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 1);
    assert_eq!(body["modifiedCount"], 1);
    assert_eq!(body["upsertedId"], Value::Null);

    let (_, services) = t.send(Method::GET, "/services", None, None).await;
    assert_eq!(services.as_array().unwrap().len(), 1);
    assert_eq!(services[0]["_id"], json!(id));
    assert_eq!(services[0]["price"], 300);
    assert_eq!(services[0]["image"], "w.png");
    assert_eq!(services[0]["description"], Value::Null);

    let (status, body) = t.send(Method::DELETE, &format!("/services/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);

    let (status, _) = t.send(Method::DELETE, "/services/not-a-uuid", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registering_twice_keeps_one_user() {
    let t = TestApp::new();
    let user = json!({ "email": "new@x.com", "name": "New" });

    let (status, body) = t.send(Method::POST, "/users", None, Some(user.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["insertedId"].is_string());

    let (status, body) = t.send(Method::POST, "/users", None, Some(user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "user already exists" }));
    assert_eq!(t.store.len(Collection::Users).await, 1);

    let (status, _) = t.send(Method::POST, "/users", None, Some(json!({ "name": "no email" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn promotion_grants_admin_access() {
    let t = TestApp::new();
    t.seed_user("admin@x.com", true).await;
    let user_id = t.seed_user("user@x.com", false).await;
    let admin = t.token_for("admin@x.com").await;
    let user = t.token_for("user@x.com").await;

    let (_, body) = t.send(Method::GET, "/users/admin/user@x.com", Some(&user), None).await;
    assert_eq!(body, json!({ "admin": false }));
    let (_, body) = t.send(Method::GET, "/users/admin/admin@x.com", Some(&user), None).await;
    assert_eq!(body, json!({ "admin": false }));
    let (_, body) = t.send(Method::GET, "/users/admin/admin@x.com", Some(&admin), None).await;
    assert_eq!(body, json!({ "admin": true }));
    let (status, _) = t.send(Method::GET, "/users/admin/admin@x.com", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.send(Method::PATCH, &format!("/users/admin/{user_id}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t.send(Method::PATCH, &format!("/users/admin/{user_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 1);
    assert_eq!(body["modifiedCount"], 1);

    let (_, body) = t.send(Method::GET, "/users/admin/user@x.com", Some(&user), None).await;
    assert_eq!(body, json!({ "admin": true }));
    let (status, body) = t.send(Method::GET, "/users", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn orders_are_scoped_to_the_caller() {
    let t = TestApp::new();
    t.seed_user("b@x.com", false).await;
    t.seed_user("c@x.com", false).await;
    let c = t.token_for("c@x.com").await;

    for (email, service) in [("b@x.com", "Logo"), ("c@x.com", "Web"), ("c@x.com", "Banner")] {
        let (status, _) = t.send(Method::POST, "/orders", None, Some(json!({ "email": email, "service": service }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    // no email: empty before any token check
    let (status, body) = t.send(Method::GET, "/orders", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = t.send(Method::GET, "/orders?email=c@x.com", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());

    let (status, body) = t.send(Method::GET, "/orders?email=b@x.com", Some(&c), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, forbidden());

    let (status, body) = t.send(Method::GET, "/orders?email=c@x.com", Some(&c), None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["email"] == "c@x.com"));
}

#[tokio::test]
async fn reviews_are_public() {
    let t = TestApp::new();
    let (status, body) = t
        .send(Method::POST, "/reviews", None, Some(json!({ "_id": "client-chosen", "name": "Ann", "quote": "Great" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["insertedId"].clone();

    let (status, body) = t.send(Method::GET, "/reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["_id"], id);
    assert_eq!(body[0]["quote"], "Great");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let t = TestApp::new();
    let (status, body) = t.send(Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/orders"].is_object());
}

#[tokio::test]
async fn admin_guard_without_identity_stage_fails_closed() {
    let store = Arc::new(MemoryDocumentStore::new());
    let admin: Fields = json!({ "email": "admin@x.com", "role": "admin" }).as_object().cloned().unwrap_or_default();
    store.insert_one(Collection::Users, admin).await.unwrap();
    let state = ServerState::new(store, TokenService::new(TokenConfig { secret: SECRET.into(), ttl: None }));
    let token = state.auth.issue_token("admin@x.com").await.unwrap();

    let reached = Arc::new(AtomicBool::new(false));
    let flag = reached.clone();
    let app: Router = Router::new()
        .route(
            "/guarded",
            get(move || {
                let flag = flag.clone();
                async move {
                    flag.store(true, Ordering::SeqCst);
                    "handled"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state);

    // a valid admin token is not enough when no identity was attached
    let req = Request::builder()
        .uri("/guarded")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, unauthorized());
    assert!(!reached.load(Ordering::SeqCst));
}
