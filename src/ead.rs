//! Rule-based exposure-at-default estimator
//!
//! Term loans expose exactly their drawn balance. Revolving facilities add a
//! credit-conversion-factor share of the undrawn limit, with the CCF rising
//! in recent delinquency and clipped into [0.2, 0.9].

use crate::loan::LoanRecord;

/// CCF output bounds
pub const CCF_MIN: f64 = 0.2;
pub const CCF_MAX: f64 = 0.9;

/// Credit conversion factor for a loan: `clip(0.35 + 0.10*delinq_12m, 0.2, 0.9)`
pub fn credit_conversion_factor(loan: &LoanRecord) -> f64 {
    (0.35 + 0.10 * loan.delinq_12m as f64).clamp(CCF_MIN, CCF_MAX)
}

/// Estimate per-loan EAD, aligned to the input row order.
///
/// `ead = balance + is_revolving * ccf * undrawn_limit`; for TERM loans the
/// result equals the balance exactly. Stateless and deterministic.
pub fn estimate_ead(loans: &[LoanRecord]) -> Vec<f64> {
    loans
        .iter()
        .map(|loan| {
            if loan.product_kind.is_revolving() {
                loan.balance + credit_conversion_factor(loan) * loan.undrawn_limit
            } else {
                loan.balance
            }
        })
        .collect()
}
