//! SQLite persistence layer for prediction history.
//!
//! Every successful prediction is recorded with its inputs, outputs, and a
//! server-side timestamp.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use tracing::info;

use riskcast_core::{PatientFeatures, RiskAssessment};

use crate::dto::HistoryEntry;

/// Opens the history database, creating the file and schema if needed.
pub fn init_db(path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create db directory")?;
        }
    }
    let conn = Connection::open(path).context("failed to open database")?;
    init_schema(&conn)?;
    info!("History database initialized at {}", path);
    Ok(conn)
}

/// Creates the history table if it does not exist.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS prediction_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            age REAL NOT NULL,
            bmi REAL NOT NULL,
            heart_rate REAL NOT NULL,
            smoker INTEGER NOT NULL,
            family_history INTEGER NOT NULL,
            risk_score REAL NOT NULL,
            risk_level TEXT NOT NULL,
            predicted_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create prediction_history table")?;
    Ok(())
}

/// Records one completed prediction.
pub fn record_prediction(
    conn: &Connection,
    features: &PatientFeatures,
    assessment: &RiskAssessment,
) -> Result<()> {
    conn.execute(
        "INSERT INTO prediction_history
            (age, bmi, heart_rate, smoker, family_history, risk_score, risk_level)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            features.age as f64,
            features.bmi as f64,
            features.heart_rate as f64,
            features.smoker,
            features.family_history,
            assessment.risk_score as f64,
            assessment.risk_level.to_string(),
        ],
    )
    .context("failed to record prediction")?;
    Ok(())
}

/// Lists recorded predictions, most recent first.
pub fn list_history(conn: &Connection) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, age, bmi, heart_rate, smoker, family_history,
                    risk_score, risk_level, predicted_at
             FROM prediction_history
             ORDER BY id DESC",
        )
        .context("failed to prepare history query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                age: row.get::<_, f64>(1)? as f32,
                bmi: row.get::<_, f64>(2)? as f32,
                heart_rate: row.get::<_, f64>(3)? as f32,
                smoker: row.get(4)?,
                family_history: row.get(5)?,
                risk_score: row.get::<_, f64>(6)? as f32,
                risk_level: row.get(7)?,
                predicted_at: row.get(8)?,
            })
        })
        .context("failed to query prediction history")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read history row")
}
