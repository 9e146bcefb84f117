//! Credit Risk System - expected loss pipeline for loan portfolios
//!
//! This library provides:
//! - Loan table ingestion with up-front schema validation
//! - Feature engineering with a fitted, replayable schema
//! - Logistic PD model with discrimination and calibration diagnostics
//! - Rule-based LGD and EAD estimators
//! - Macro stress scenarios applied in log-odds space
//! - Portfolio and segment expected-loss aggregation

pub mod ead;
pub mod error;
pub mod features;
pub mod lgd;
pub mod loan;
pub mod loss;
pub mod pd;
pub mod pipeline;
pub mod stats;
pub mod stress;

// Re-export commonly used types
pub use error::RiskError;
pub use loan::{LoanRecord, ProductKind};
pub use pd::{PdDiagnostics, PdModel, TrainConfig};
pub use pipeline::{PipelineOutcome, RiskPipeline};
pub use stress::{ScenarioTable, StressEngine};
