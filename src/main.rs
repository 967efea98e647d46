use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fixerhub::config::AppConfig;
use fixerhub::db;
use fixerhub::handlers;
use fixerhub::services::email::resend::ResendEmailSender;
use fixerhub::services::email::{EmailSender, LogEmailSender};
use fixerhub::services::storage::local::LocalDocumentStore;
use fixerhub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let email: Box<dyn EmailSender> = if config.resend_api_key.is_empty() {
        tracing::info!("RESEND_API_KEY not set, verification codes are logged only");
        Box::new(LogEmailSender)
    } else {
        Box::new(ResendEmailSender::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
        ))
    };

    let documents = LocalDocumentStore::new(config.upload_dir.clone(), config.public_base_url.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        email,
        documents: Box::new(documents),
    });

    let app = Router::new()
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
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
