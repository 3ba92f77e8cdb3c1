use std::sync::{Arc, Mutex};

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hotel_booking::config::AppConfig;
use hotel_booking::db;
use hotel_booking::handlers;
use hotel_booking::services::auth::StaticCredentials;
use hotel_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    tracing::info!(
        database = %config.database_url,
        tz_offset = %config.tz_offset,
        "database ready"
    );

    let credentials = StaticCredentials::new(
        config.admin_username.clone(),
        config.admin_password.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        credentials: Box::new(credentials),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api",
            get(handlers::api::read_action).post(handlers::api::write_action),
        )
        .route("/api/admin/login", post(handlers::admin::login))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
