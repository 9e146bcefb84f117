//! Credit Risk System CLI
//!
//! Demo entry point: generates a synthetic portfolio, runs the full risk
//! pipeline, prints scenario and segment tables, and dumps per-loan results

use credit_risk_system::loan::generate_portfolio;
use credit_risk_system::RiskPipeline;
use std::fs::File;
use std::io::Write;

fn main() {
    env_logger::init();

    println!("Credit Risk System v0.1.0");
    println!("=========================\n");

    // Synthetic demo book: 5,000 loans, fixed seed
    let loans = generate_portfolio(5000, 42);
    let defaults = loans.iter().filter(|l| l.default_flag).count();
    println!("Portfolio: {} loans ({} observed defaults, {:.2}% rate)", loans.len(), defaults, 100.0 * defaults as f64 / loans.len() as f64);
    println!();

    let pipeline = RiskPipeline::with_seed(42);
    let outcome = pipeline.run(&loans).expect("pipeline run failed");

    println!("PD model diagnostics:");
    println!("  Test AUC: {:.4}", outcome.diagnostics.auc);
    let curve = &outcome.diagnostics.calibration;
    println!("  Calibration bins: {}", curve.mean_predicted.len());
    println!();

    // Per-loan preview
    println!("Per-loan results (first 10):");
    println!("{:>10} {:>4} {:>10} {:>8} {:>8} {:>14} {:>12}",
        "LoanID", "Cty", "Product", "PD", "LGD", "EAD", "EL");
    println!("{}", "-".repeat(72));
    for (i, loan) in loans.iter().take(10).enumerate() {
        println!("{:>10} {:>4} {:>10} {:>8.4} {:>8.4} {:>14.2} {:>12.2}",
            loan.loan_id,
            loan.country,
            loan.product_kind.as_str(),
            outcome.baseline.pd[i],
            outcome.baseline.lgd[i],
            outcome.baseline.ead[i],
            outcome.baseline.el[i],
        );
    }
    println!();

    // Scenario table
    println!("Expected loss by scenario:");
    println!("{:>18} {:>16} {:>12} {:>12} {:>12}",
        "Scenario", "EL Total", "EL Mean", "EL P95", "EL Std");
    println!("{}", "-".repeat(74));
    for row in &outcome.scenarios {
        println!("{:>18} {:>16.2} {:>12.2} {:>12.2} {:>12.2}",
            row.scenario,
            row.summary.el_total,
            row.summary.el_mean,
            row.summary.el_p95,
            row.summary.el_std,
        );
    }
    println!();

    // Top segments by expected loss
    let mut segments = outcome.segments.clone();
    segments.sort_by(|a, b| b.el_total.partial_cmp(&a.el_total).unwrap());
    println!("Top segments by expected loss:");
    println!("{:>4} {:>10} {:>7} {:>7} {:>16} {:>14} {:>8} {:>8}",
        "Cty", "Product", "Band", "Loans", "EAD Total", "EL Total", "PD Mean", "LGD Mean");
    println!("{}", "-".repeat(82));
    for seg in segments.iter().take(10) {
        println!("{:>4} {:>10} {:>7} {:>7} {:>16.2} {:>14.2} {:>8.4} {:>8.4}",
            seg.country,
            seg.product_kind.as_str(),
            seg.pd_band.as_str(),
            seg.loans,
            seg.ead_total,
            seg.el_total,
            seg.pd_mean,
            seg.lgd_mean,
        );
    }
    println!();

    // Write full per-loan results to CSV
    let csv_path = "loan_losses.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(file, "loan_id,country,product_type,pd,lgd,ead,el").unwrap();
    for (i, loan) in loans.iter().enumerate() {
        writeln!(file, "{},{},{},{:.8},{:.8},{:.2},{:.4}",
            loan.loan_id,
            loan.country,
            loan.product_kind.as_str(),
            outcome.baseline.pd[i],
            outcome.baseline.lgd[i],
            outcome.baseline.ead[i],
            outcome.baseline.el[i],
        ).unwrap();
    }
    println!("Full per-loan results written to: {}", csv_path);
}
