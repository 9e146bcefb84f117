//! Build the numeric feature matrix and target vector from a loan table

use super::matrix::FeatureMatrix;
use super::schema::{FeatureSchema, BASE_COLUMNS};
use crate::error::RiskError;
use crate::loan::LoanRecord;

/// Convert a loan table into (feature matrix, default target) under a fitted
/// schema.
///
/// Pure transform: row order and count equal the input table, imputation uses
/// the schema's frozen medians, and the column order is exactly
/// `schema.columns`. A loan whose country is outside the schema vocabulary
/// fails with `FeatureSchemaMismatch` instead of growing a new column.
pub fn build_features(
    loans: &[LoanRecord],
    schema: &FeatureSchema,
) -> Result<(FeatureMatrix, Vec<bool>), RiskError> {
    let mut matrix = FeatureMatrix::new(schema.columns.clone());
    let mut target = Vec::with_capacity(loans.len());
    let mut row = vec![0.0f64; schema.n_features()];

    for loan in loans {
        if !schema.knows_country(&loan.country) {
            return Err(RiskError::FeatureSchemaMismatch {
                detail: format!(
                    "country {:?} was not present in the fitting vocabulary {:?}",
                    loan.country, schema.countries
                ),
                expected: schema.n_features(),
                found: schema.n_features(),
            });
        }

        row[0] = loan.age as f64;
        row[1] = loan.income.unwrap_or(schema.imputation.income_median);
        row[2] = loan.ltv.unwrap_or(schema.imputation.ltv_median);
        row[3] = loan.dti;
        row[4] = loan.delinq_12m as f64;
        row[5] = loan.interest_rate;
        row[6] = if loan.product_kind.is_revolving() { 1.0 } else { 0.0 };
        row[7] = if loan.secured { 1.0 } else { 0.0 };
        row[8] = loan.balance;

        // One indicator per non-reference vocabulary country
        for (slot, country) in schema.countries.iter().skip(1).enumerate() {
            row[BASE_COLUMNS.len() + slot] = if &loan.country == country { 1.0 } else { 0.0 };
        }

        matrix.push_row(&row);
        target.push(loan.default_flag);
    }

    Ok((matrix, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::ProductKind;
    use chrono::NaiveDate;

    fn loan(country: &str, product: ProductKind, default_flag: bool) -> LoanRecord {
        LoanRecord {
            loan_id: "L1".to_string(),
            country: country.to_string(),
            product_kind: product,
            secured: false,
            origination_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            maturity_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            balance: 10_000.0,
            limit_amount: 0.0,
            undrawn_limit: 0.0,
            interest_rate: 0.05,
            income: Some(50_000.0),
            age: 40,
            ltv: Some(0.6),
            dti: 0.3,
            delinq_12m: 1,
            default_flag,
        }
    }

    #[test]
    fn test_row_count_and_order_match_input() {
        let loans = vec![
            loan("DK", ProductKind::Term, false),
            loan("SE", ProductKind::Revolving, true),
            loan("DK", ProductKind::Term, false),
        ];
        let schema = FeatureSchema::fit(&loans).unwrap();
        let (matrix, target) = build_features(&loans, &schema).unwrap();

        assert_eq!(matrix.n_rows(), loans.len());
        assert_eq!(target, vec![false, true, false]);

        // Second loan: revolving SE
        let r = matrix.row(1);
        assert_eq!(r[6], 1.0); // is_revolving
        assert_eq!(r[9], 1.0); // cty_SE (only non-reference country)
        // First loan: reference country => all indicators zero
        assert_eq!(matrix.row(0)[9], 0.0);
    }

    #[test]
    fn test_imputation_uses_schema_medians() {
        let fit_loans = vec![
            loan("DK", ProductKind::Term, false),
            {
                let mut l = loan("DK", ProductKind::Term, false);
                l.income = Some(90_000.0);
                l.ltv = Some(0.8);
                l
            },
        ];
        let schema = FeatureSchema::fit(&fit_loans).unwrap();

        // Build against a *different* table with missing values: the frozen
        // medians from the fitting table must be replayed, not recomputed.
        let mut scoring = loan("DK", ProductKind::Term, false);
        scoring.income = None;
        scoring.ltv = None;
        let (matrix, _) = build_features(&[scoring], &schema).unwrap();
        assert_eq!(matrix.row(0)[1], 70_000.0);
        assert!((matrix.row(0)[2] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_country_rejected() {
        let fit_loans = vec![loan("DK", ProductKind::Term, false)];
        let schema = FeatureSchema::fit(&fit_loans).unwrap();

        let err = build_features(&[loan("NO", ProductKind::Term, false)], &schema).unwrap_err();
        match err {
            RiskError::FeatureSchemaMismatch { detail, .. } => assert!(detail.contains("NO")),
            other => panic!("expected FeatureSchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_column_order_is_schema_order() {
        let loans = vec![
            loan("DK", ProductKind::Term, false),
            loan("FI", ProductKind::Term, false),
            loan("SE", ProductKind::Term, true),
        ];
        let schema = FeatureSchema::fit(&loans).unwrap();
        let (matrix, _) = build_features(&loans, &schema).unwrap();
        assert_eq!(matrix.columns(), schema.columns.as_slice());
        assert_eq!(
            &schema.columns[BASE_COLUMNS.len()..],
            &["cty_FI".to_string(), "cty_SE".to_string()]
        );
    }
}
