//! Risk prediction handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{error, info};

use riskcast_core::{PatientFeatures, RiskAssessment};

use crate::db;
use crate::error::AppError;
use crate::ServerState;

/// Runs one prediction and records it in the history log.
///
/// Payloads that fail schema decoding (missing keys, wrong types) are
/// rejected with a typed 400 rather than surfacing as a generic server
/// error.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<PatientFeatures>, JsonRejection>,
) -> Result<Json<RiskAssessment>, AppError> {
    let Json(features) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let assessment = state.model.assess(&features).map_err(|e| {
        error!("Prediction failed: {}", e);
        AppError::Internal("prediction failed".into())
    })?;

    {
        let conn = state.db_lock()?;
        db::record_prediction(&conn, &features, &assessment).map_err(|e| {
            error!("Failed to record prediction: {}", e);
            AppError::Internal("failed to record prediction".into())
        })?;
    }

    info!(
        "Assessed risk: {} (score {:.3})",
        assessment.risk_level, assessment.risk_score
    );
    Ok(Json(assessment))
}
