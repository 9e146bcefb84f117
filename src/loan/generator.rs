//! Synthetic loan portfolio generator
//!
//! Produces a realistic loan table for demos and end-to-end tests: country
//! and product mix, log-normal balances and incomes, a small missingness rate
//! on income/LTV, a duplicate-id tail to exercise upstream-duplication
//! handling, and a default flag drawn from a transparent "true" PD.
//!
//! The generator is an external collaborator to the pipeline: nothing in the
//! risk computation depends on it. All draws come from a single seeded
//! generator passed through explicitly, so identical (n_loans, seed) inputs
//! reproduce the identical portfolio.

use super::{LoanRecord, ProductKind};
use chrono::{Days, NaiveDate};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::{LogNormal, Normal, Poisson, Uniform};

/// Countries in the synthetic book, with sampling weights
const COUNTRIES: [&str; 5] = ["DK", "SE", "NO", "FI", "PL"];
const COUNTRY_WEIGHTS: [f64; 5] = [0.35, 0.2, 0.15, 0.15, 0.15];

/// Additive country effect on the true-PD score
fn country_effect(country: &str) -> f64 {
    match country {
        "DK" => -0.15,
        "SE" => -0.10,
        "NO" => -0.12,
        "FI" => -0.05,
        "PL" => 0.10,
        _ => 0.0,
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn clip(x: f64, lo: f64, hi: f64) -> f64 {
    x.clamp(lo, hi)
}

/// Generate a synthetic loan portfolio.
///
/// For `n_loans >= 1000` a handful of rows are duplicated verbatim at the
/// tail (`max(3, n_loans / 5000)` rows), matching what upstream systems with
/// imperfect key generation produce.
pub fn generate_portfolio(n_loans: usize, seed: u64) -> Vec<LoanRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    let country_dist =
        WeightedIndex::new(COUNTRY_WEIGHTS).expect("country weights are fixed and positive");
    let product_dist =
        WeightedIndex::new([0.7, 0.3]).expect("product weights are fixed and positive");
    let term_years = [1u64, 2, 3, 5, 7, 10];
    let term_dist = WeightedIndex::new([0.1, 0.15, 0.2, 0.25, 0.15, 0.15])
        .expect("term weights are fixed and positive");

    let income_dist = LogNormal::new(10.5, 0.45).expect("valid log-normal parameters");
    let ltv_dist = Normal::new(0.65, 0.18).expect("valid normal parameters");
    let dti_dist = Normal::new(0.35, 0.18).expect("valid normal parameters");
    let rate_dist = Normal::new(0.045, 0.015).expect("valid normal parameters");
    let balance_dist = LogNormal::new(10.2, 0.7).expect("valid log-normal parameters");
    let delinq_dist = Poisson::new(0.25).expect("valid poisson parameter");
    let limit_mult_dist = Uniform::new(1.0, 2.5);

    let base_date = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid base date");

    let mut loans: Vec<LoanRecord> = Vec::with_capacity(n_loans);
    for i in 0..n_loans {
        let country = COUNTRIES[country_dist.sample(&mut rng)].to_string();
        let product_kind = if product_dist.sample(&mut rng) == 0 {
            ProductKind::Term
        } else {
            ProductKind::Revolving
        };
        let secured = rng.gen::<f64>() < 0.6;

        let origination_date = base_date + Days::new(rng.gen_range(0..365 * 3));
        let years = term_years[term_dist.sample(&mut rng)];
        let maturity_date = origination_date + Days::new(years * 365);

        let age = rng.gen_range(20..75u8);

        let income = if rng.gen::<f64>() < 0.015 {
            None
        } else {
            Some(income_dist.sample(&mut rng))
        };
        let ltv = if rng.gen::<f64>() < 0.01 {
            None
        } else {
            Some(clip(ltv_dist.sample(&mut rng), 0.05, 1.25))
        };
        let dti = clip(dti_dist.sample(&mut rng), 0.02, 1.5);
        let delinq_12m = delinq_dist.sample(&mut rng) as u32;
        let interest_rate = clip(rate_dist.sample(&mut rng), 0.005, 0.15);

        let balance = clip(balance_dist.sample(&mut rng), 500.0, 800_000.0);
        let (limit_amount, undrawn_limit) = if product_kind.is_revolving() {
            let limit = clip(balance * limit_mult_dist.sample(&mut rng), 1000.0, 1_000_000.0);
            (limit, (limit - balance).max(0.0))
        } else {
            (0.0, 0.0)
        };

        loans.push(LoanRecord {
            loan_id: format!("L{}", 1_000_000 + i),
            country,
            product_kind,
            secured,
            origination_date,
            maturity_date,
            balance,
            limit_amount,
            undrawn_limit,
            interest_rate,
            income,
            age,
            ltv,
            dti,
            delinq_12m,
            // Filled below once the income median is known
            default_flag: false,
        });
    }

    // Median income over generated (non-missing) values; used both for the
    // income term of the true-PD score and as the fallback for missing rows.
    let mut incomes: Vec<f64> = loans.iter().filter_map(|l| l.income).collect();
    incomes.sort_by(|a, b| a.partial_cmp(b).expect("incomes are finite"));
    let income_median = if incomes.is_empty() {
        0.0
    } else if incomes.len() % 2 == 1 {
        incomes[incomes.len() / 2]
    } else {
        0.5 * (incomes[incomes.len() / 2 - 1] + incomes[incomes.len() / 2])
    };

    for loan in &mut loans {
        let ltv_f = loan.ltv.unwrap_or(0.7);
        let income_f = loan.income.unwrap_or(income_median);
        let score = -4.0
            + 1.8 * (ltv_f - 0.6)
            + 1.2 * (loan.dti - 0.35)
            + 0.35 * loan.delinq_12m as f64
            + 0.8 * if loan.secured { 0.0 } else { 1.0 }
            + 0.6 * if loan.product_kind.is_revolving() { 1.0 } else { 0.0 }
            - 0.000002 * (income_f - income_median)
            + country_effect(&loan.country);
        let pd_true = sigmoid(score);
        loan.default_flag = rng.gen::<f64>() < pd_true;
    }

    // Small duplicate tail to exercise uniqueness handling downstream
    if n_loans >= 1000 {
        let n_dups = (n_loans / 5000).max(3);
        let picks = rand::seq::index::sample(&mut rng, n_loans, n_dups);
        let mut dups: Vec<LoanRecord> = picks.iter().map(|i| loans[i].clone()).collect();
        loans.append(&mut dups);
    }

    loans
}
