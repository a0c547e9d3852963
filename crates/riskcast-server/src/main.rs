//! HTTP predictor service entry point and Axum router setup.
//!
//! Loads the model artifact exactly once at startup, opens the prediction
//! history database, and serves the prediction API. The loaded model is
//! immutable and shared read-only across all request handlers.

mod db;
mod dto;
mod error;
mod handlers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use riskcast_model::RiskModel;

/// Shared server state accessible from all handlers.
///
/// The model never changes after load, so handlers read it without
/// coordination; only the history connection needs a lock.
pub struct ServerState {
    pub model: RiskModel,
    pub db: Mutex<rusqlite::Connection>,
}

impl ServerState {
    /// Acquires the database lock, converting poison errors to AppError.
    pub fn db_lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>, error::AppError> {
        self.db.lock().map_err(|e| {
            tracing::error!("DB lock poisoned: {}", e);
            error::AppError::Internal("database lock error".into())
        })
    }
}

/// Builds the service router with CORS and request tracing.
fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/history", get(handlers::history::list))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    let model_path = std::env::var("RISKCAST_MODEL_PATH").unwrap_or_else(|_| "model.bin".into());
    let model = RiskModel::load(&model_path).with_context(|| {
        format!("failed to load model artifact from '{model_path}' (run riskcast-trainer first)")
    })?;
    info!("Loaded model artifact from {}", model_path);

    let db_path = std::env::var("RISKCAST_DB").unwrap_or_else(|_| "data/history.db".into());
    let conn = db::init_db(&db_path).context("failed to initialize history database")?;

    let state = Arc::new(ServerState {
        model,
        db: Mutex::new(conn),
    });

    let addr = std::env::var("RISKCAST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
