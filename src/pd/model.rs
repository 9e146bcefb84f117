//! Logistic PD model: fit, fitted artifact, scoring
//!
//! The model is a linear binary classifier on standardized features, fit by
//! batch gradient descent with a bounded iteration budget. The fitted
//! artifact carries the training column order and the standardization
//! parameters; scoring replays both exactly and rejects any column drift.

use super::metrics::{calibration_curve, roc_auc, CalibrationCurve};
use super::split::stratified_split;
use crate::error::RiskError;
use crate::features::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Scores are clamped away from exact 0/1 so downstream logit transforms
/// stay finite even when the linear predictor saturates the logistic in f64.
/// Matches the stress engine's clip bound, so the zero-shock scenario
/// reproduces scored PDs exactly.
const PD_FLOOR: f64 = 1e-9;

/// Training configuration for the PD model
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Seed for the stratified split shuffle
    pub seed: u64,

    /// Fraction of each class held out for diagnostics
    pub test_fraction: f64,

    /// Iteration budget for gradient descent
    pub max_iterations: usize,

    /// Gradient-descent step size (features are standardized, so a fixed
    /// step works across portfolios)
    pub learning_rate: f64,

    /// L2 penalty on the weights
    pub l2_penalty: f64,

    /// Stop early once the gradient max-norm falls below this
    pub tolerance: f64,

    /// Number of quantile bins in the calibration curve
    pub calibration_bins: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.25,
            max_iterations: 2000,
            learning_rate: 0.1,
            l2_penalty: 1e-4,
            tolerance: 1e-7,
            calibration_bins: 10,
        }
    }
}

/// Fitted PD model artifact
///
/// Opaque to consumers: the only supported operations are scoring and
/// serialization. Column order, standardization parameters, and weights are
/// one inseparable unit; mixing them with a matrix built under a different
/// schema is rejected at scoring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdModel {
    columns: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
    weights: Vec<f64>,
    bias: f64,
}

/// Held-out diagnostics from fitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdDiagnostics {
    /// Test-set area under the ROC curve
    pub auc: f64,

    /// Test-set quantile calibration curve
    pub calibration: CalibrationCurve,
}

/// Result of fitting: the artifact plus its diagnostics
#[derive(Debug, Clone)]
pub struct FittedPd {
    pub model: PdModel,
    pub diagnostics: PdDiagnostics,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Fit the PD model on a feature matrix and binary default target.
///
/// Deterministic given (features, target, config). Fails with
/// `InsufficientData` when the target cannot support a stratified split.
pub fn fit(
    features: &FeatureMatrix,
    target: &[bool],
    config: &TrainConfig,
) -> Result<FittedPd, RiskError> {
    assert_eq!(
        features.n_rows(),
        target.len(),
        "feature rows and target length must align"
    );

    let split = stratified_split(target, config.test_fraction, config.seed)?;

    let train_x = features.select_rows(&split.train);
    let train_y: Vec<bool> = split.train.iter().map(|&i| target[i]).collect();
    let test_x = features.select_rows(&split.test);
    let test_y: Vec<bool> = split.test.iter().map(|&i| target[i]).collect();

    // Standardization parameters from the training rows only
    let k = features.n_cols();
    let n_train = train_x.n_rows() as f64;
    let mut means = vec![0.0f64; k];
    let mut stds = vec![0.0f64; k];
    for j in 0..k {
        let m: f64 = train_x.column(j).sum::<f64>() / n_train;
        let ss: f64 = train_x.column(j).map(|v| (v - m) * (v - m)).sum();
        means[j] = m;
        let sd = (ss / n_train).sqrt();
        // Constant columns (e.g. a single product kind in the book) pass
        // through unscaled instead of dividing by zero
        stds[j] = if sd > 1e-12 { sd } else { 1.0 };
    }

    // Standardized training matrix, row-major
    let mut z = vec![0.0f64; train_x.n_rows() * k];
    for (i, row) in train_x.rows().enumerate() {
        for j in 0..k {
            z[i * k + j] = (row[j] - means[j]) / stds[j];
        }
    }

    // Batch gradient descent on the regularized log-loss
    let mut weights = vec![0.0f64; k];
    let mut bias = 0.0f64;
    let mut grad_w = vec![0.0f64; k];
    let mut iterations = 0;
    for _ in 0..config.max_iterations {
        iterations += 1;
        grad_w.iter_mut().for_each(|g| *g = 0.0);
        let mut grad_b = 0.0f64;

        for (i, &y) in train_y.iter().enumerate() {
            let row = &z[i * k..(i + 1) * k];
            let lin: f64 = bias + weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>();
            let err = sigmoid(lin) - if y { 1.0 } else { 0.0 };
            grad_b += err;
            for j in 0..k {
                grad_w[j] += err * row[j];
            }
        }

        let mut max_grad = (grad_b / n_train).abs();
        for j in 0..k {
            grad_w[j] = grad_w[j] / n_train + config.l2_penalty * weights[j];
            max_grad = max_grad.max(grad_w[j].abs());
        }
        grad_b /= n_train;

        for j in 0..k {
            weights[j] -= config.learning_rate * grad_w[j];
        }
        bias -= config.learning_rate * grad_b;

        if max_grad < config.tolerance {
            break;
        }
    }
    log::debug!(
        "pd fit: {} train rows, {} features, {} iterations",
        train_x.n_rows(),
        k,
        iterations
    );

    let model = PdModel {
        columns: features.columns().to_vec(),
        means,
        stds,
        weights,
        bias,
    };

    let test_scores = model.score(&test_x)?;
    let diagnostics = PdDiagnostics {
        auc: roc_auc(&test_y, &test_scores),
        calibration: calibration_curve(&test_y, &test_scores, config.calibration_bins),
    };

    Ok(FittedPd { model, diagnostics })
}

impl PdModel {
    /// Training-time feature column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Score a feature matrix, returning per-row PD in (0, 1).
    ///
    /// The matrix columns must match the training columns in identity,
    /// order, and count; anything else is a `FeatureSchemaMismatch`.
    pub fn score(&self, features: &FeatureMatrix) -> Result<Vec<f64>, RiskError> {
        if features.columns() != self.columns.as_slice() {
            return Err(RiskError::schema_mismatch(&self.columns, features.columns()));
        }

        let k = self.columns.len();
        let mut scores = Vec::with_capacity(features.n_rows());
        for row in features.rows() {
            let mut lin = self.bias;
            for j in 0..k {
                lin += self.weights[j] * (row[j] - self.means[j]) / self.stds[j];
            }
            scores.push(sigmoid(lin).clamp(PD_FLOOR, 1.0 - PD_FLOOR));
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-feature matrix where x1 separates the classes cleanly
    fn separable() -> (FeatureMatrix, Vec<bool>) {
        let mut m = FeatureMatrix::new(vec!["x1".to_string(), "x2".to_string()]);
        let mut target = Vec::new();
        for i in 0..40 {
            let wiggle = (i % 7) as f64 * 0.01;
            m.push_row(&[-1.0 - wiggle, (i % 5) as f64]);
            target.push(false);
            m.push_row(&[1.0 + wiggle, (i % 3) as f64]);
            target.push(true);
        }
        (m, target)
    }

    #[test]
    fn test_fit_separable_discriminates() {
        let (x, y) = separable();
        let fitted = fit(&x, &y, &TrainConfig::default()).unwrap();
        assert!(fitted.diagnostics.auc > 0.99);

        let scores = fitted.model.score(&x).unwrap();
        for (s, &label) in scores.iter().zip(&y) {
            assert!(*s > 0.0 && *s < 1.0);
            if label {
                assert!(*s > 0.5, "positive row scored {}", s);
            } else {
                assert!(*s < 0.5, "negative row scored {}", s);
            }
        }
    }

    #[test]
    fn test_fit_deterministic() {
        let (x, y) = separable();
        let a = fit(&x, &y, &TrainConfig::default()).unwrap();
        let b = fit(&x, &y, &TrainConfig::default()).unwrap();
        assert_eq!(a.model.weights, b.model.weights);
        assert_eq!(a.model.bias, b.model.bias);
        assert_eq!(a.diagnostics.auc, b.diagnostics.auc);
    }

    #[test]
    fn test_single_class_rejected() {
        let mut m = FeatureMatrix::new(vec!["x1".to_string()]);
        for i in 0..10 {
            m.push_row(&[i as f64]);
        }
        let err = fit(&m, &vec![false; 10], &TrainConfig::default()).unwrap_err();
        assert!(matches!(err, RiskError::InsufficientData { .. }));
    }

    #[test]
    fn test_score_rejects_reordered_columns() {
        let (x, y) = separable();
        let fitted = fit(&x, &y, &TrainConfig::default()).unwrap();

        let mut reordered = FeatureMatrix::new(vec!["x2".to_string(), "x1".to_string()]);
        reordered.push_row(&[0.0, 1.0]);
        let err = fitted.model.score(&reordered).unwrap_err();
        assert!(matches!(err, RiskError::FeatureSchemaMismatch { .. }));
    }

    #[test]
    fn test_score_rejects_missing_column() {
        let (x, y) = separable();
        let fitted = fit(&x, &y, &TrainConfig::default()).unwrap();

        let mut narrow = FeatureMatrix::new(vec!["x1".to_string()]);
        narrow.push_row(&[1.0]);
        let err = fitted.model.score(&narrow).unwrap_err();
        match err {
            RiskError::FeatureSchemaMismatch { expected, found, .. } => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected FeatureSchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_calibration_has_requested_bins() {
        let (x, y) = separable();
        let fitted = fit(&x, &y, &TrainConfig::default()).unwrap();
        let curve = &fitted.diagnostics.calibration;
        assert_eq!(curve.mean_predicted.len(), curve.observed_fraction.len());
        assert!(curve.mean_predicted.len() <= 10);
        assert!(!curve.mean_predicted.is_empty());
    }
}
