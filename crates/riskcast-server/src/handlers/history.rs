//! Prediction history handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::error;

use crate::db;
use crate::dto::HistoryEntry;
use crate::error::AppError;
use crate::ServerState;

/// Lists recorded predictions, most recent first.
pub async fn list(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let conn = state.db_lock()?;
    let entries = db::list_history(&conn).map_err(|e| {
        error!("Failed to load prediction history: {}", e);
        AppError::Internal("failed to load prediction history".into())
    })?;
    Ok(Json(entries))
}
