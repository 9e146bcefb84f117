//! Per-loan expected loss and portfolio-level summary statistics

use crate::stats;
use serde::{Deserialize, Serialize};

/// Elementwise expected loss: `el[i] = pd[i] * lgd[i] * ead[i]`.
///
/// All three vectors must share length and row order; a mismatch is a
/// programming error upstream, not a data condition.
pub fn expected_loss(pd: &[f64], lgd: &[f64], ead: &[f64]) -> Vec<f64> {
    assert_eq!(pd.len(), lgd.len(), "pd and lgd must align");
    assert_eq!(pd.len(), ead.len(), "pd and ead must align");

    pd.iter()
        .zip(lgd)
        .zip(ead)
        .map(|((p, l), e)| p * l * e)
        .collect()
}

/// Portfolio summary of an expected-loss vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Sum of per-loan EL
    pub el_total: f64,

    /// Mean per-loan EL
    pub el_mean: f64,

    /// 95th empirical percentile (linear interpolation)
    pub el_p95: f64,

    /// Sample standard deviation (n-1 denominator; 0 when n <= 1)
    pub el_std: f64,
}

impl PortfolioSummary {
    pub fn from_losses(el: &[f64]) -> Self {
        Self {
            el_total: el.iter().sum(),
            el_mean: stats::mean(el),
            el_p95: stats::quantile(el, 0.95).unwrap_or(0.0),
            el_std: stats::sample_std(el),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_concrete_two_loan_book() {
        // TERM 1000 and REVOLVING 500+0.55*1000: the reference worked example
        let pd = [0.05, 0.10];
        let lgd = [0.35, 0.40];
        let ead = [1000.0, 1050.0];

        let el = expected_loss(&pd, &lgd, &ead);
        assert_relative_eq!(el[0], 17.5, epsilon = 1e-9);
        assert_relative_eq!(el[1], 42.0, epsilon = 1e-9);

        let summary = PortfolioSummary::from_losses(&el);
        assert_relative_eq!(summary.el_total, 59.5, epsilon = 1e-9);
        assert_relative_eq!(summary.el_mean, 29.75, epsilon = 1e-9);
    }

    #[test]
    fn test_el_non_negative_for_valid_inputs() {
        let el = expected_loss(&[0.0, 0.5, 1.0], &[0.05, 0.5, 0.95], &[0.0, 100.0, 1e6]);
        for v in el {
            assert!(v >= 0.0);
        }
    }

    #[test]
    fn test_std_conventions() {
        assert_eq!(PortfolioSummary::from_losses(&[]).el_std, 0.0);
        assert_eq!(PortfolioSummary::from_losses(&[10.0]).el_std, 0.0);

        let summary = PortfolioSummary::from_losses(&[1.0, 3.0]);
        assert_relative_eq!(summary.el_std, 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_p95_interpolates_between_order_statistics() {
        let el: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let summary = PortfolioSummary::from_losses(&el);
        // pos = 0.95 * 99 = 94.05 -> 95 + 0.05
        assert_relative_eq!(summary.el_p95, 95.05, epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "pd and ead must align")]
    fn test_shape_mismatch_is_a_bug() {
        expected_loss(&[0.1], &[0.5], &[]);
    }
}
