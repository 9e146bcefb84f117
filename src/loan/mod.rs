//! Loan portfolio data structures, CSV ingestion, and synthetic generation

mod data;
pub mod generator;
pub mod loader;

pub use data::{LoanRecord, ProductKind};
pub use generator::generate_portfolio;
pub use loader::{load_loans, load_loans_from_reader, write_loans, REQUIRED_COLUMNS};
