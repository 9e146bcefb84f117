//! Probability-of-default model: stratified split, logistic fit, scoring,
//! and held-out diagnostics

mod metrics;
mod model;
mod split;

pub use metrics::{calibration_curve, roc_auc, CalibrationCurve};
pub use model::{fit, FittedPd, PdDiagnostics, PdModel, TrainConfig};
pub use split::{stratified_split, SplitIndices};
