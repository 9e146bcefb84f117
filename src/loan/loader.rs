//! Load loan portfolios from CSV
//!
//! The header is validated against the full required column set before any
//! row is parsed, so a malformed extract fails up front with the complete
//! list of missing columns instead of a mid-file parse error.

use super::{LoanRecord, ProductKind};
use crate::error::RiskError;
use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

/// Columns the loan table must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 16] = [
    "loan_id",
    "country",
    "product_type",
    "secured",
    "origination_date",
    "maturity_date",
    "balance",
    "limit_amount",
    "undrawn_limit",
    "interest_rate",
    "income",
    "age",
    "ltv",
    "dti",
    "delinq_12m",
    "default_flag",
];

/// Raw CSV row matching the loan-table columns
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CsvRow {
    loan_id: String,
    country: String,
    product_type: String,
    secured: u8,
    origination_date: NaiveDate,
    maturity_date: NaiveDate,
    balance: f64,
    limit_amount: f64,
    undrawn_limit: f64,
    interest_rate: f64,
    income: Option<f64>,
    age: u8,
    ltv: Option<f64>,
    dti: f64,
    delinq_12m: u32,
    default_flag: u8,
}

impl CsvRow {
    fn from_loan(loan: &LoanRecord) -> Self {
        Self {
            loan_id: loan.loan_id.clone(),
            country: loan.country.clone(),
            product_type: loan.product_kind.as_str().to_string(),
            secured: loan.secured as u8,
            origination_date: loan.origination_date,
            maturity_date: loan.maturity_date,
            balance: loan.balance,
            limit_amount: loan.limit_amount,
            undrawn_limit: loan.undrawn_limit,
            interest_rate: loan.interest_rate,
            income: loan.income,
            age: loan.age,
            ltv: loan.ltv,
            dti: loan.dti,
            delinq_12m: loan.delinq_12m,
            default_flag: loan.default_flag as u8,
        }
    }

    fn to_loan(self, row: usize) -> Result<LoanRecord, RiskError> {
        let product_kind = ProductKind::parse(&self.product_type).ok_or_else(|| {
            RiskError::InvalidRecord {
                row,
                detail: format!("unknown product_type: {:?}", self.product_type),
            }
        })?;

        let secured = match self.secured {
            0 => false,
            1 => true,
            other => {
                return Err(RiskError::InvalidRecord {
                    row,
                    detail: format!("secured flag must be 0 or 1, got {}", other),
                })
            }
        };

        let default_flag = match self.default_flag {
            0 => false,
            1 => true,
            other => {
                return Err(RiskError::InvalidRecord {
                    row,
                    detail: format!("default_flag must be 0 or 1, got {}", other),
                })
            }
        };

        Ok(LoanRecord {
            loan_id: self.loan_id,
            country: self.country,
            product_kind,
            secured,
            origination_date: self.origination_date,
            maturity_date: self.maturity_date,
            balance: self.balance,
            limit_amount: self.limit_amount,
            undrawn_limit: self.undrawn_limit,
            interest_rate: self.interest_rate,
            income: self.income,
            age: self.age,
            ltv: self.ltv,
            dti: self.dti,
            delinq_12m: self.delinq_12m,
            default_flag,
        })
    }
}

/// Validate that the header row carries every required column.
fn validate_header(headers: &csv::StringRecord) -> Result<(), RiskError> {
    let present: Vec<&str> = headers.iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(*col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RiskError::SchemaValidation { missing })
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRecord>, RiskError> {
    let mut reader = Reader::from_path(path)?;
    read_loans(&mut reader)
}

/// Load loans from any reader (e.g., string buffer, network stream)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanRecord>, RiskError> {
    let mut csv_reader = Reader::from_reader(reader);
    read_loans(&mut csv_reader)
}

/// Write a loan table to a CSV file in the required-column format
pub fn write_loans<P: AsRef<Path>>(path: P, loans: &[LoanRecord]) -> Result<(), RiskError> {
    let file = std::fs::File::create(path)?;
    write_loans_to_writer(file, loans)
}

/// Write a loan table to any writer
pub fn write_loans_to_writer<W: std::io::Write>(
    writer: W,
    loans: &[LoanRecord],
) -> Result<(), RiskError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for loan in loans {
        csv_writer.serialize(CsvRow::from_loan(loan))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn read_loans<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<LoanRecord>, RiskError> {
    validate_header(reader.headers()?)?;

    let mut loans = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        loans.push(row.to_loan(idx + 1)?);
    }

    Ok(loans)
}
