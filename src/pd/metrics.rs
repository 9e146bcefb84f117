//! Discrimination and calibration diagnostics for the PD model
//!
//! These are reported to callers and logged, never consumed downstream in
//! the loss computation.

use serde::{Deserialize, Serialize};

/// Calibration curve over quantile bins of predicted probability.
///
/// `mean_predicted[i]` is the average predicted PD in bin `i`,
/// `observed_fraction[i]` the realized default fraction of the same bin.
/// Bins hold near-equal observation counts; both vectors share one length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationCurve {
    pub mean_predicted: Vec<f64>,
    pub observed_fraction: Vec<f64>,
}

/// Area under the ROC curve via tie-averaged ranks (Mann-Whitney U).
///
/// Returns 0.5 when either class is absent; with a stratified test split
/// both classes are always present.
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> f64 {
    assert_eq!(labels.len(), scores.len(), "labels and scores must align");

    let n_pos = labels.iter().filter(|&&y| y).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).expect("scores must not be NaN"));

    // Average ranks across tied scores, then sum ranks of positives
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j + 2) as f64 / 2.0; // ranks are 1-based
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y)
        .map(|(_, &r)| r)
        .sum();

    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    u / (n_pos as f64 * n_neg as f64)
}

/// Quantile-binned calibration curve.
///
/// Observations are sorted by predicted score and divided into `bins` groups
/// of near-equal size (the first `n % bins` groups get one extra row). With
/// fewer observations than bins, each observation becomes its own bin.
pub fn calibration_curve(labels: &[bool], scores: &[f64], bins: usize) -> CalibrationCurve {
    assert_eq!(labels.len(), scores.len(), "labels and scores must align");

    let n = scores.len();
    if n == 0 || bins == 0 {
        return CalibrationCurve {
            mean_predicted: Vec::new(),
            observed_fraction: Vec::new(),
        };
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).expect("scores must not be NaN"));

    let n_bins = bins.min(n);
    let base = n / n_bins;
    let extra = n % n_bins;

    let mut mean_predicted = Vec::with_capacity(n_bins);
    let mut observed_fraction = Vec::with_capacity(n_bins);

    let mut start = 0;
    for b in 0..n_bins {
        let size = base + if b < extra { 1 } else { 0 };
        let chunk = &order[start..start + size];
        start += size;

        let mean_pred: f64 = chunk.iter().map(|&i| scores[i]).sum::<f64>() / size as f64;
        let frac_pos: f64 =
            chunk.iter().filter(|&&i| labels[i]).count() as f64 / size as f64;
        mean_predicted.push(mean_pred);
        observed_fraction.push(frac_pos);
    }

    CalibrationCurve {
        mean_predicted,
        observed_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auc_perfect_separation() {
        let labels = [false, false, false, true, true];
        let scores = [0.1, 0.2, 0.3, 0.8, 0.9];
        assert_eq!(roc_auc(&labels, &scores), 1.0);
    }

    #[test]
    fn test_auc_inverted_separation() {
        let labels = [true, true, false, false];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert_eq!(roc_auc(&labels, &scores), 0.0);
    }

    #[test]
    fn test_auc_constant_scores_is_half() {
        let labels = [true, false, true, false, false];
        let scores = [0.5; 5];
        assert!((roc_auc(&labels, &scores) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_auc_known_value() {
        // One discordant pair out of four: AUC = 0.75
        let labels = [false, true, false, true];
        let scores = [0.1, 0.2, 0.3, 0.4];
        assert!((roc_auc(&labels, &scores) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_bin_sizes_and_values() {
        // 10 observations, 2 bins of 5
        let scores: Vec<f64> = (1..=10).map(|i| i as f64 / 10.0).collect();
        let labels: Vec<bool> = (1..=10).map(|i| i > 7).collect();
        let curve = calibration_curve(&labels, &scores, 2);

        assert_eq!(curve.mean_predicted.len(), 2);
        assert!((curve.mean_predicted[0] - 0.3).abs() < 1e-12);
        assert!((curve.mean_predicted[1] - 0.8).abs() < 1e-12);
        assert_eq!(curve.observed_fraction[0], 0.0);
        assert!((curve.observed_fraction[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_fewer_rows_than_bins() {
        let scores = [0.2, 0.6, 0.9];
        let labels = [false, true, true];
        let curve = calibration_curve(&labels, &scores, 10);
        assert_eq!(curve.mean_predicted.len(), 3);
        assert_eq!(curve.observed_fraction, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_calibration_values_in_unit_interval() {
        let scores = [0.05, 0.1, 0.2, 0.4, 0.6, 0.8, 0.85, 0.99];
        let labels = [false, false, true, false, true, true, false, true];
        let curve = calibration_curve(&labels, &scores, 4);
        for (m, o) in curve.mean_predicted.iter().zip(&curve.observed_fraction) {
            assert!((0.0..=1.0).contains(m));
            assert!((0.0..=1.0).contains(o));
        }
    }
}
