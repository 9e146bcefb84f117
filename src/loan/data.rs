//! Loan record structures matching the portfolio input format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product kind of the loan exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductKind {
    /// Amortizing term loan; exposure is the drawn balance
    Term,
    /// Revolving credit facility; undrawn limit can convert to exposure
    Revolving,
}

impl ProductKind {
    pub fn is_revolving(&self) -> bool {
        matches!(self, ProductKind::Revolving)
    }

    /// String representation matching the loan-table format
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Term => "TERM",
            ProductKind::Revolving => "REVOLVING",
        }
    }

    /// Parse from the loan-table string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TERM" => Some(ProductKind::Term),
            "REVOLVING" => Some(ProductKind::Revolving),
            _ => None,
        }
    }
}

/// A single loan exposure from the portfolio table
///
/// Immutable input to the pipeline; no stage mutates loan records in place.
/// `loan_id` is normally unique but upstream duplication is tolerated (the
/// pipeline treats each row as its own exposure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Loan identifier
    pub loan_id: String,

    /// ISO-style country code of the borrower
    pub country: String,

    /// Product kind (TERM or REVOLVING)
    pub product_kind: ProductKind,

    /// Whether the loan is secured by collateral
    pub secured: bool,

    /// Origination date
    pub origination_date: NaiveDate,

    /// Contractual maturity date
    pub maturity_date: NaiveDate,

    /// Outstanding drawn balance (>= 0 expected, not enforced upstream)
    pub balance: f64,

    /// Total credit limit (0 for term loans)
    pub limit_amount: f64,

    /// Undrawn portion of the credit limit (0 for term loans)
    pub undrawn_limit: f64,

    /// Contractual interest rate (annual, decimal)
    pub interest_rate: f64,

    /// Borrower income; missing for a small share of records
    pub income: Option<f64>,

    /// Borrower age in years
    pub age: u8,

    /// Loan-to-value ratio; missing for a small share of records
    pub ltv: Option<f64>,

    /// Debt-to-income ratio
    pub dti: f64,

    /// Delinquency events in the trailing 12 months
    pub delinq_12m: u32,

    /// Observed default outcome over the observation horizon
    pub default_flag: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_kind_roundtrip() {
        assert_eq!(ProductKind::parse("TERM"), Some(ProductKind::Term));
        assert_eq!(ProductKind::parse("REVOLVING"), Some(ProductKind::Revolving));
        assert_eq!(ProductKind::parse("revolving"), None);
        assert_eq!(ProductKind::Term.as_str(), "TERM");
        assert_eq!(ProductKind::Revolving.as_str(), "REVOLVING");
    }

    #[test]
    fn test_is_revolving() {
        assert!(ProductKind::Revolving.is_revolving());
        assert!(!ProductKind::Term.is_revolving());
    }
}
