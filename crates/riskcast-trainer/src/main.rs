//! Offline trainer: fits the risk classifier on the embedded dataset and
//! writes the model artifact the predictor service loads at startup.
//!
//! Run-to-completion, no flags. The artifact path defaults to `model.bin`
//! and can be overridden with `RISKCAST_MODEL_PATH`.

use anyhow::{Context, Result};
use tracing::info;

use riskcast_core::PatientFeatures;
use riskcast_model::{RiskModel, TrainingSet};

/// Bootstrap seed so repeated runs produce the same artifact.
const TRAINING_SEED: u64 = 42;

/// Embedded dataset: (age, bmi, heartRate, smoker, familyHistory) → high risk.
const DATASET: [(f32, f32, f32, bool, bool, bool); 5] = [
    (30.0, 22.0, 70.0, false, false, false),
    (50.0, 31.0, 95.0, true, true, true),
    (60.0, 34.0, 100.0, true, true, true),
    (45.0, 28.0, 85.0, false, false, false),
    (35.0, 36.0, 110.0, true, true, true),
];

/// Builds the training set from the embedded dataset.
fn training_set() -> TrainingSet {
    let mut set = TrainingSet::new();
    for &(age, bmi, heart_rate, smoker, family_history, high_risk) in &DATASET {
        set.push(
            PatientFeatures {
                age,
                bmi,
                heart_rate,
                smoker,
                family_history,
            },
            high_risk,
        );
    }
    set
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    let path = std::env::var("RISKCAST_MODEL_PATH").unwrap_or_else(|_| "model.bin".into());

    let set = training_set();
    info!("Training risk model on {} examples", set.len());

    let model = RiskModel::train(&set, TRAINING_SEED).context("failed to train risk model")?;
    model
        .save(&path)
        .with_context(|| format!("failed to write model artifact to '{}'", path))?;
    info!("Wrote model artifact to {}", path);

    println!("Model trained and saved successfully");
    Ok(())
}
