//! Feature schema fitted once and replayed at every build
//!
//! The schema freezes everything that would otherwise drift between calls:
//! imputation medians for the two nullable columns, the country vocabulary
//! with its dropped reference level, and the output column order. Two feature
//! matrices built with the same schema are always comparable with the same
//! fitted model; a country outside the vocabulary is a schema mismatch, not a
//! new column.

use crate::error::RiskError;
use crate::loan::LoanRecord;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Numeric columns every feature matrix starts with, in order
pub const BASE_COLUMNS: [&str; 9] = [
    "age",
    "income",
    "ltv",
    "dti",
    "delinq_12m",
    "interest_rate",
    "is_revolving",
    "is_secured",
    "balance",
];

/// Prefix for country indicator columns
pub const COUNTRY_PREFIX: &str = "cty_";

/// Imputation values for the nullable loan columns, computed once at fit time
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImputationParams {
    /// Median of observed incomes in the fitting table
    pub income_median: f64,
    /// Median of observed LTVs in the fitting table
    pub ltv_median: f64,
}

/// Fitted feature schema: imputation parameters, country vocabulary, and the
/// fixed output column order consumed by the PD model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Frozen imputation medians
    pub imputation: ImputationParams,

    /// Sorted distinct countries seen at fit time
    pub countries: Vec<String>,

    /// Dropped reference level (alphabetically first country)
    pub reference_country: String,

    /// Full output column order: base columns, then one indicator per
    /// non-reference country
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// Fit the schema on a loan table: medians over this table's observed
    /// income/LTV values, vocabulary from its distinct countries.
    pub fn fit(loans: &[LoanRecord]) -> Result<Self, RiskError> {
        if loans.is_empty() {
            return Err(RiskError::InsufficientData {
                reason: "cannot fit a feature schema on an empty loan table".to_string(),
            });
        }

        let incomes: Vec<f64> = loans.iter().filter_map(|l| l.income).collect();
        let income_median = stats::median(&incomes).ok_or_else(|| RiskError::InsufficientData {
            reason: "income column has no observed values to impute from".to_string(),
        })?;

        let ltvs: Vec<f64> = loans.iter().filter_map(|l| l.ltv).collect();
        let ltv_median = stats::median(&ltvs).ok_or_else(|| RiskError::InsufficientData {
            reason: "ltv column has no observed values to impute from".to_string(),
        })?;

        let mut countries: Vec<String> = loans.iter().map(|l| l.country.clone()).collect();
        countries.sort_unstable();
        countries.dedup();
        let reference_country = countries[0].clone();

        let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for country in countries.iter().skip(1) {
            columns.push(format!("{}{}", COUNTRY_PREFIX, country));
        }

        Ok(Self {
            imputation: ImputationParams {
                income_median,
                ltv_median,
            },
            countries,
            reference_country,
            columns,
        })
    }

    /// Number of output feature columns
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Whether `country` is in the fitted vocabulary
    pub fn knows_country(&self, country: &str) -> bool {
        self.countries.binary_search_by(|c| c.as_str().cmp(country)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::ProductKind;
    use chrono::NaiveDate;

    fn loan(country: &str, income: Option<f64>, ltv: Option<f64>) -> LoanRecord {
        LoanRecord {
            loan_id: "L1".to_string(),
            country: country.to_string(),
            product_kind: ProductKind::Term,
            secured: true,
            origination_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            maturity_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            balance: 10_000.0,
            limit_amount: 0.0,
            undrawn_limit: 0.0,
            interest_rate: 0.05,
            income,
            age: 40,
            ltv,
            dti: 0.3,
            delinq_12m: 0,
            default_flag: false,
        }
    }

    #[test]
    fn test_fit_medians_ignore_missing() {
        let loans = vec![
            loan("DK", Some(100.0), Some(0.5)),
            loan("DK", None, Some(0.7)),
            loan("DK", Some(300.0), None),
        ];
        let schema = FeatureSchema::fit(&loans).unwrap();
        assert_eq!(schema.imputation.income_median, 200.0);
        assert_eq!(schema.imputation.ltv_median, 0.6);
    }

    #[test]
    fn test_vocabulary_sorted_reference_first() {
        let loans = vec![
            loan("SE", Some(1.0), Some(0.5)),
            loan("DK", Some(1.0), Some(0.5)),
            loan("PL", Some(1.0), Some(0.5)),
            loan("SE", Some(1.0), Some(0.5)),
        ];
        let schema = FeatureSchema::fit(&loans).unwrap();
        assert_eq!(schema.countries, vec!["DK", "PL", "SE"]);
        assert_eq!(schema.reference_country, "DK");
        // Base columns, then indicators for everything except the reference
        assert_eq!(schema.n_features(), BASE_COLUMNS.len() + 2);
        assert_eq!(schema.columns[BASE_COLUMNS.len()], "cty_PL");
        assert_eq!(schema.columns[BASE_COLUMNS.len() + 1], "cty_SE");
        assert!(schema.knows_country("PL"));
        assert!(!schema.knows_country("NO"));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = FeatureSchema::fit(&[]).unwrap_err();
        assert!(matches!(err, RiskError::InsufficientData { .. }));
    }

    #[test]
    fn test_all_income_missing_rejected() {
        let loans = vec![loan("DK", None, Some(0.5))];
        let err = FeatureSchema::fit(&loans).unwrap_err();
        match err {
            RiskError::InsufficientData { reason } => assert!(reason.contains("income")),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }
}
