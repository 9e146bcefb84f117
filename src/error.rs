//! Error types for the risk pipeline.
//!
//! Every failure mode the pipeline can raise is a variant of [`RiskError`]:
//! - `SchemaValidation`: required loan-table columns missing at ingestion
//! - `FeatureSchemaMismatch`: scoring-time columns differ from training-time
//! - `InsufficientData`: degenerate target distribution at fit time
//! - `UnknownScenario`: stress scenario name not in the scenario table
//!
//! Numeric clipping (PD, LGD, CCF) is a saturation policy, not an error path;
//! out-of-range intermediates are bounded into the valid domain silently.

use thiserror::Error;

/// Errors raised by the credit risk pipeline.
///
/// Each variant carries enough context (column names, scenario name, shapes)
/// to diagnose the failure without re-running the pipeline.
#[derive(Error, Debug)]
pub enum RiskError {
    /// Required loan-table columns are missing. Raised at the ingestion
    /// boundary before any stage runs.
    #[error("loan table is missing required columns: {}", missing.join(", "))]
    SchemaValidation {
        /// Names of every required column absent from the input header
        missing: Vec<String>,
    },

    /// Scoring-time feature columns do not match the fitted model's training
    /// columns in identity, order, or count. Indicates a mismatched model
    /// artifact and data; never silently reconciled.
    #[error("feature schema mismatch: {detail} (expected {expected} columns, found {found})")]
    FeatureSchemaMismatch {
        /// Human-readable description of the first difference found
        detail: String,
        /// Column count the artifact was trained with
        expected: usize,
        /// Column count presented at scoring time
        found: usize,
    },

    /// Fitting data cannot support a stratified train/test split: single
    /// target class, or a class too small to land rows in both splits.
    #[error("insufficient data to fit PD model: {reason}")]
    InsufficientData {
        /// What was degenerate about the target distribution
        reason: String,
    },

    /// Requested stress scenario is not in the fixed scenario table.
    #[error("unknown stress scenario: {name:?}")]
    UnknownScenario {
        /// The name that failed to resolve
        name: String,
    },

    /// A loan record failed field-level conversion during ingestion.
    #[error("invalid loan record at row {row}: {detail}")]
    InvalidRecord {
        /// 1-based data row index in the source file
        row: usize,
        /// Which field failed and why
        detail: String,
    },

    /// Underlying CSV read/parse failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RiskError {
    /// Build a `FeatureSchemaMismatch` from the two column lists, describing
    /// the first point of divergence.
    pub fn schema_mismatch(expected: &[String], found: &[String]) -> Self {
        let detail = if expected.len() != found.len() {
            "column counts differ".to_string()
        } else {
            match expected.iter().zip(found).position(|(e, f)| e != f) {
                Some(i) => format!(
                    "column {} is {:?}, expected {:?}",
                    i, found[i], expected[i]
                ),
                None => "column sets identical".to_string(),
            }
        };
        RiskError::FeatureSchemaMismatch {
            detail,
            expected: expected.len(),
            found: found.len(),
        }
    }
}
