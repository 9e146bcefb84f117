//! Loss aggregation: per-loan expected loss, portfolio summaries, and
//! segment breakdowns

mod portfolio;
mod segment;

pub use portfolio::{expected_loss, PortfolioSummary};
pub use segment::{segment_breakdown, PdBand, SegmentRow};
