//! Data transfer objects for HTTP message serialization.
//!
//! The predict request and response reuse the shared domain types from
//! `riskcast-core`; only the history listing needs a server-side shape.

use serde::Serialize;

/// One recorded prediction, as returned by `GET /history`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub age: f32,
    pub bmi: f32,
    pub heart_rate: f32,
    pub smoker: bool,
    pub family_history: bool,
    pub risk_score: f32,
    pub risk_level: String,
    pub predicted_at: String,
}
