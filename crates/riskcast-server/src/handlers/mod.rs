//! HTTP route handlers for the predictor service.

pub mod history;
pub mod predict;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
