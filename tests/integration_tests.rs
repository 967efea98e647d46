use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use fixerhub::config::AppConfig;
use fixerhub::db;
use fixerhub::handlers;
use fixerhub::models::{Role, User};
use fixerhub::services::auth;
use fixerhub::services::email::EmailSender;
use fixerhub::services::storage::DocumentStore;
use fixerhub::state::AppState;

const PLUMBING: &str = "c1a5f9e2-8d3b-4f6a-9c01-2e7b4d8a1f30";
const ELECTRICAL: &str = "5d2e8c41-97ab-4e0f-b623-84c1d5f7a9b2";

// ── Mock Providers ──

struct MockEmail {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockEmail {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl EmailSender for MockEmail {
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), code.to_string()));
        Ok(())
    }
}

struct MockDocumentStore {
    uploaded: Arc<Mutex<Vec<String>>>,
}

impl MockDocumentStore {
    fn new() -> Self {
        Self {
            uploaded: Arc::new(Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn upload(&self, path: &str, _bytes: Vec<u8>) -> anyhow::Result<String> {
        self.uploaded.lock().unwrap().push(path.to_string());
        Ok(format!("http://test.local/uploads/{path}"))
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        token_secret: "test-secret".to_string(),
        token_ttl_hours: 24,
        resend_api_key: "".to_string(),
        email_from: "FixerHub <noreply@fixerhub.example>".to_string(),
        upload_dir: "uploads".to_string(),
        public_base_url: "http://localhost:3000".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        email: Box::new(MockEmail::new()),
        documents: Box::new(MockDocumentStore::new()),
    })
}

fn test_state_with_sent() -> (Arc<AppState>, Arc<Mutex<Vec<(String, String)>>>) {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let sent = Arc::new(Mutex::new(vec![]));
    let email = MockEmail {
        sent: Arc::clone(&sent),
    };
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        email: Box::new(email),
        documents: Box::new(MockDocumentStore::new()),
    });
    (state, sent)
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::classify_intent))
        .route("/api/categories", get(handlers::categories::list_categories))
        .route("/api/search", get(handlers::search::search_offerings))
        .route(
            "/api/auth/signup/client",
            post(handlers::auth::signup_client),
        )
        .route(
            "/api/auth/signup/professional",
            post(handlers::auth::signup_professional),
        )
        .route("/api/auth/verify", post(handlers::auth::verify_email))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/jobs", post(handlers::jobs::create_job))
        .route("/api/jobs", get(handlers::jobs::list_my_jobs))
        .route("/api/jobs/:job_id", get(handlers::jobs::get_job_details))
        .route("/api/jobs/:job_id", put(handlers::jobs::update_job))
        .route("/api/jobs/:job_id", delete(handlers::jobs::delete_job))
        .route(
            "/api/jobs/:job_id/active",
            post(handlers::jobs::set_job_active),
        )
        .route(
            "/api/professional/documents",
            post(handlers::professional::upload_documents),
        )
        .route(
            "/api/professional/documents/status",
            get(handlers::professional::document_status),
        )
        .route("/api/messages", post(handlers::messages::send_message))
        .route("/api/messages", get(handlers::messages::get_messages))
        .route("/api/reviews", post(handlers::reviews::create_review))
        .route(
            "/api/reviews/:professional_id",
            get(handlers::reviews::get_reviews),
        )
        .with_state(state)
}

/// Insert a verified user directly and mint a token for them.
fn seed_user(state: &AppState, role: Role, email: &str) -> (String, String) {
    let user = User {
        user_id: Uuid::new_v4().to_string(),
        username: format!("user-{}", &email[..email.find('@').unwrap()]),
        email: email.to_string(),
        phone_number: "5551234567".to_string(),
        password_hash: auth::hash_password("password123").unwrap(),
        role,
        is_verified: true,
        verification_otp: None,
    };

    {
        let db = state.db.lock().unwrap();
        db::queries::create_user(&db, &user).unwrap();
    }

    let token = auth::sign_token(
        &state.config.token_secret,
        &user.user_id,
        role,
        state.config.token_ttl_hours,
    );
    (user.user_id, token)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(res: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_job(
    state: &Arc<AppState>,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = test_app(state.clone())
        .oneshot(json_request("POST", "/api/jobs", Some(token), body))
        .await
        .unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

// ── Health & Chat ──

#[tokio::test]
async fn test_health() {
    let res = test_app(test_state())
        .oneshot(get_request("/health", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_plumbing_intent() {
    let res = test_app(test_state())
        .oneshot(json_request(
            "POST",
            "/api/chat",
            None,
            serde_json::json!({ "message": "My sink has a leak" }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let reply = json["reply"].as_str().unwrap();
    assert!(reply.contains("plumbing"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn test_chat_is_case_insensitive() {
    let state = test_state();

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/chat",
            None,
            serde_json::json!({ "message": "NEED AN ELECTRICIAN" }),
        ))
        .await
        .unwrap();
    let upper = body_json(res).await;

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/chat",
            None,
            serde_json::json!({ "message": "need an electrician" }),
        ))
        .await
        .unwrap();
    let lower = body_json(res).await;

    assert_eq!(upper["reply"], lower["reply"]);
}

#[tokio::test]
async fn test_chat_fallback() {
    let res = test_app(test_state())
        .oneshot(json_request(
            "POST",
            "/api/chat",
            None,
            serde_json::json!({ "message": "xyzzy" }),
        ))
        .await
        .unwrap();

    let json = body_json(res).await;
    let reply = json["reply"].as_str().unwrap();
    assert!(
        reply.contains("find a match"),
        "unexpected fallback: {reply}"
    );
}

// ── Categories ──

#[tokio::test]
async fn test_categories_seeded() {
    let res = test_app(test_state())
        .oneshot(get_request("/api/categories", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 10);
    assert!(categories
        .iter()
        .any(|c| c["category_name"] == "Plumbing" && c["category_id"] == PLUMBING));
}

// ── Auth ──

#[tokio::test]
async fn test_signup_verify_login_flow() {
    let (state, sent) = test_state_with_sent();

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/auth/signup/client",
            None,
            serde_json::json!({
                "username": "alice",
                "email": "alice@example.com",
                "phone_number": "5551234567",
                "password": "password123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let otp = {
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
        sent[0].1.clone()
    };
    assert_eq!(otp.len(), 6);

    // Login is rejected until the email is verified.
    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": "alice@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Wrong OTP is rejected.
    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/auth/verify",
            None,
            serde_json::json!({ "otp": "000000" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/auth/verify",
            None,
            serde_json::json!({ "otp": otp }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert!(json["token"].as_str().unwrap().contains('.'));

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": "alice@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert!(json["token"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let state = test_state();
    seed_user(&state, Role::Client, "bob@example.com");

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/auth/signup/client",
            None,
            serde_json::json!({
                "username": "bob2",
                "email": "bob@example.com",
                "phone_number": "5551234567",
                "password": "password123",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let res = test_app(test_state())
        .oneshot(json_request(
            "POST",
            "/api/auth/signup/client",
            None,
            serde_json::json!({
                "username": "carol",
                "email": "carol@example.com",
                "phone_number": "5551234567",
                "password": "short",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let state = test_state();
    seed_user(&state, Role::Client, "dave@example.com");

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": "dave@example.com", "password": "wrongpass" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

// ── Jobs ──

#[tokio::test]
async fn test_jobs_require_auth() {
    let res = test_app(test_state())
        .oneshot(json_request(
            "POST",
            "/api/jobs",
            None,
            serde_json::json!({ "category_id": PLUMBING, "category_price": 50.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_jobs_require_professional_role() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Client, "client@example.com");

    let (status, _) = create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 50.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_job_aggregates_sub_category_prices() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (status, json) = create_job(
        &state,
        &token,
        serde_json::json!({
            "category_id": PLUMBING,
            "sub_categories": [
                { "sub_category_name": "Sink Repair", "price": 20.0 },
                { "sub_category_name": "Pipe Fix", "price": 15.0 },
            ],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let job_id = json["job_id"].as_str().unwrap().to_string();

    let res = test_app(state)
        .oneshot(get_request("/api/jobs", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let jobs = body_json(res).await;
    let jobs = jobs.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["job_id"], job_id.as_str());
    assert_eq!(jobs[0]["category_name"], "Plumbing");
    assert_eq!(jobs[0]["category_price"], 35.0);
    assert_eq!(jobs[0]["sub_categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_job_unknown_category() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (status, _) = create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": "nonexistent", "category_price": 50.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_job_requires_a_price() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (status, _) = create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_job_replaces_pricing() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (_, json) = create_job(
        &state,
        &token,
        serde_json::json!({
            "category_id": PLUMBING,
            "sub_categories": [
                { "sub_category_name": "Sink Repair", "price": 20.0 },
                { "sub_category_name": "Pipe Fix", "price": 15.0 },
            ],
        }),
    )
    .await;
    let job_id = json["job_id"].as_str().unwrap().to_string();

    let res = test_app(state.clone())
        .oneshot(json_request(
            "PUT",
            &format!("/api/jobs/{job_id}"),
            Some(&token),
            serde_json::json!({
                "category_id": PLUMBING,
                "sub_categories": [
                    { "sub_category_name": "Drain Unblocking", "price": 40.0 },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state)
        .oneshot(get_request("/api/jobs", Some(&token)))
        .await
        .unwrap();
    let jobs = body_json(res).await;
    let subs = jobs[0]["sub_categories"].as_array().unwrap().clone();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0]["sub_category_name"], "Drain Unblocking");
    assert_eq!(jobs[0]["category_price"], 40.0);
}

#[tokio::test]
async fn test_update_job_of_another_user() {
    let state = test_state();
    let (_, owner_token) = seed_user(&state, Role::Professional, "owner@example.com");
    let (_, other_token) = seed_user(&state, Role::Professional, "other@example.com");

    let (_, json) = create_job(
        &state,
        &owner_token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 50.0 }),
    )
    .await;
    let job_id = json["job_id"].as_str().unwrap().to_string();

    let res = test_app(state)
        .oneshot(json_request(
            "PUT",
            &format!("/api/jobs/{job_id}"),
            Some(&other_token),
            serde_json::json!({ "category_id": PLUMBING, "category_price": 1.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_job() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (_, json) = create_job(
        &state,
        &token,
        serde_json::json!({
            "category_id": PLUMBING,
            "sub_categories": [{ "sub_category_name": "Sink Repair", "price": 20.0 }],
        }),
    )
    .await;
    let job_id = json["job_id"].as_str().unwrap().to_string();

    let res = test_app(state.clone())
        .oneshot({
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/jobs/{job_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap()
        })
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state.clone())
        .oneshot(get_request(&format!("/api/jobs/{job_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // No pricing rows may survive the job they belong to.
    let remaining: i64 = {
        let db = state.db.lock().unwrap();
        db.query_row(
            "SELECT COUNT(*) FROM job_sub_category_pricing WHERE job_id = ?1",
            [job_id.as_str()],
            |row| row.get(0),
        )
        .unwrap()
    };
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_set_job_active_is_idempotent() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (_, json) = create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 50.0 }),
    )
    .await;
    let job_id = json["job_id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let res = test_app(state.clone())
            .oneshot(json_request(
                "POST",
                &format!("/api/jobs/{job_id}/active"),
                Some(&token),
                serde_json::json!({ "active": false }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = test_app(state)
        .oneshot(get_request(&format!("/api/jobs/{job_id}"), Some(&token)))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json["is_active"], false);
}

// ── Search ──

#[tokio::test]
async fn test_search_orders_by_price() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    for price in [30.0, 10.0, 20.0] {
        let (status, _) = create_job(
            &state,
            &token,
            serde_json::json!({ "category_id": PLUMBING, "category_price": price }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let res = test_app(state)
        .oneshot(get_request(
            &format!("/api/search?category_id={PLUMBING}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let prices: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["category_price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![10.0, 20.0, 30.0]);
}

#[tokio::test]
async fn test_search_excludes_inactive() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (_, json) = create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 50.0 }),
    )
    .await;
    let job_id = json["job_id"].as_str().unwrap().to_string();

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            &format!("/api/jobs/{job_id}/active"),
            Some(&token),
            serde_json::json!({ "active": false }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = test_app(state)
        .oneshot(get_request(
            &format!("/api/search?category_id={PLUMBING}"),
            None,
        ))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_by_category_name_text() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 50.0 }),
    )
    .await;
    create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": ELECTRICAL, "category_price": 60.0 }),
    )
    .await;

    let res = test_app(state)
        .oneshot(get_request("/api/search?q=Plumb", None))
        .await
        .unwrap();
    let json = body_json(res).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["category_name"], "Plumbing");
}

#[tokio::test]
async fn test_search_by_sub_category() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let (_, json) = create_job(
        &state,
        &token,
        serde_json::json!({
            "category_id": PLUMBING,
            "sub_categories": [{ "sub_category_name": "Sink Repair", "price": 20.0 }],
        }),
    )
    .await;
    let priced_job_id = json["job_id"].as_str().unwrap().to_string();

    // Same category, no pricing row for the sub-category.
    create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 5.0 }),
    )
    .await;

    let res = test_app(state.clone())
        .oneshot(get_request("/api/jobs", Some(&token)))
        .await
        .unwrap();
    let jobs = body_json(res).await;
    let sub_category_id = jobs
        .as_array()
        .unwrap()
        .iter()
        .find(|j| j["job_id"] == priced_job_id.as_str())
        .unwrap()["sub_categories"][0]["sub_category_id"]
        .as_str()
        .unwrap()
        .to_string();

    let res = test_app(state)
        .oneshot(get_request(
            &format!("/api/search?sub_category_id={sub_category_id}"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["job_id"], priced_job_id.as_str());
}

#[tokio::test]
async fn test_search_filters_by_distance() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    // Near central London.
    create_job(
        &state,
        &token,
        serde_json::json!({
            "category_id": PLUMBING,
            "category_price": 50.0,
            "location": { "latitude": 51.50, "longitude": -0.12 },
        }),
    )
    .await;
    // Paris, roughly 344 km away.
    create_job(
        &state,
        &token,
        serde_json::json!({
            "category_id": PLUMBING,
            "category_price": 10.0,
            "location": { "latitude": 48.8566, "longitude": 2.3522 },
        }),
    )
    .await;
    // No stored location, excluded from location-based queries.
    create_job(
        &state,
        &token,
        serde_json::json!({ "category_id": PLUMBING, "category_price": 5.0 }),
    )
    .await;

    let res = test_app(state)
        .oneshot(get_request(
            "/api/search?latitude=51.5074&longitude=-0.1278",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["category_price"], 50.0);
    assert!(results[0]["distance_km"].as_f64().unwrap() < 50.0);
}

#[tokio::test]
async fn test_search_rejects_half_a_point() {
    let res = test_app(test_state())
        .oneshot(get_request("/api/search?latitude=51.5", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

// ── Professional documents ──

fn multipart_request(token: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "----fixerhubtestboundary";
    let mut body = String::new();
    for (name, file_name) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\nfile-bytes\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/professional/documents")
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_document_upload_and_status() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state.clone())
        .oneshot(multipart_request(
            &token,
            &[
                ("national_id_document", "id.png"),
                ("work_clearance_document", "clearance.pdf"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let json = body_json(res).await;
    assert_eq!(json["status"], "pending");

    let res = test_app(state)
        .oneshot(get_request("/api/professional/documents/status", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn test_document_upload_missing_field() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state)
        .oneshot(multipart_request(
            &token,
            &[("national_id_document", "id.png")],
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_status_before_upload() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state)
        .oneshot(get_request("/api/professional/documents/status", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Messages ──

#[tokio::test]
async fn test_send_and_fetch_conversation() {
    let state = test_state();
    let (client_id, client_token) = seed_user(&state, Role::Client, "client@example.com");
    let (pro_id, pro_token) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/messages",
            Some(&client_token),
            serde_json::json!({ "receiver_id": pro_id, "message_text": "Hi, are you free Monday?" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/messages",
            Some(&pro_token),
            serde_json::json!({ "receiver_id": client_id, "message_text": "Yes, morning works." }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test_app(state)
        .oneshot(get_request(
            &format!("/api/messages?peer_id={pro_id}"),
            Some(&client_token),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let messages = json.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["message_text"], "Hi, are you free Monday?");
    assert_eq!(messages[1]["message_text"], "Yes, morning works.");
}

#[tokio::test]
async fn test_send_message_unknown_receiver() {
    let state = test_state();
    let (_, token) = seed_user(&state, Role::Client, "client@example.com");

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/messages",
            Some(&token),
            serde_json::json!({ "receiver_id": "nonexistent", "message_text": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Reviews ──

#[tokio::test]
async fn test_create_and_list_reviews() {
    let state = test_state();
    let (_, client_token) = seed_user(&state, Role::Client, "client@example.com");
    let (pro_id, _) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/reviews",
            Some(&client_token),
            serde_json::json!({
                "professional_id": pro_id,
                "rating": 5,
                "review_text": "Fixed the leak in an hour.",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test_app(state)
        .oneshot(get_request(&format!("/api/reviews/{pro_id}"), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    let reviews = json.as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
    assert_eq!(reviews[0]["client_username"], "user-client");
}

#[tokio::test]
async fn test_review_rating_out_of_range() {
    let state = test_state();
    let (_, client_token) = seed_user(&state, Role::Client, "client@example.com");
    let (pro_id, _) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/reviews",
            Some(&client_token),
            serde_json::json!({ "professional_id": pro_id, "rating": 6 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reviews_require_client_role() {
    let state = test_state();
    let (pro_id, pro_token) = seed_user(&state, Role::Professional, "pro@example.com");

    let res = test_app(state)
        .oneshot(json_request(
            "POST",
            "/api/reviews",
            Some(&pro_token),
            serde_json::json!({ "professional_id": pro_id, "rating": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
