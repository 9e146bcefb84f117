//! Generate a synthetic loan portfolio CSV
//!
//! Produces the loan table consumed by `run_portfolio`, with a seeded
//! generator so fixtures are reproducible across machines.

use anyhow::Context;
use clap::Parser;
use credit_risk_system::loan::{generate_portfolio, write_loans};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic loan portfolio CSV")]
struct Args {
    /// Number of loans to generate (a small duplicate tail is appended for
    /// books of 1000+ loans)
    #[arg(long, default_value_t = 30_000)]
    loans: usize,

    /// Generator seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output CSV path
    #[arg(long, default_value = "loans_synthetic.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let loans = generate_portfolio(args.loans, args.seed);
    let defaults = loans.iter().filter(|l| l.default_flag).count();

    write_loans(&args.out, &loans)
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!(
        "Wrote {} loans ({} defaults, {:.2}% rate) to {}",
        loans.len(),
        defaults,
        100.0 * defaults as f64 / loans.len() as f64,
        args.out.display()
    );
    Ok(())
}
