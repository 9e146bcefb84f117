//! Pipeline orchestrator: one loan table in, the full risk artifact set out
//!
//! Sequences the stages in their only valid order: feature schema fit →
//! feature build → PD fit → baseline scoring → LGD/EAD → per-scenario
//! stress/EL/summary → baseline segment breakdown. Baseline features, LGD,
//! and EAD are computed once and reused unchanged across scenarios; only the
//! PD vector is scenario-dependent.
//!
//! Each run is independent: the pipeline holds only immutable configuration,
//! so separate runs (different portfolios, different seeds) may execute in
//! parallel in a hosting application without synchronization.

use crate::ead::estimate_ead;
use crate::error::RiskError;
use crate::features::{build_features, FeatureSchema};
use crate::lgd::estimate_lgd;
use crate::loan::LoanRecord;
use crate::loss::{expected_loss, segment_breakdown, PortfolioSummary, SegmentRow};
use crate::pd::{self, PdDiagnostics, TrainConfig};
use crate::stress::StressEngine;
use serde::{Deserialize, Serialize};

/// Per-loan risk vectors, aligned by row order to the input loan table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanLossVectors {
    pub pd: Vec<f64>,
    pub lgd: Vec<f64>,
    pub ead: Vec<f64>,
    pub el: Vec<f64>,
}

/// Portfolio summary for one named scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    #[serde(flatten)]
    pub summary: PortfolioSummary,
}

/// Everything a reporting collaborator consumes from one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// PD model diagnostics (logged and reported, never gated on)
    pub diagnostics: PdDiagnostics,

    /// Baseline per-loan PD/LGD/EAD/EL
    pub baseline: LoanLossVectors,

    /// One portfolio summary per scenario, in scenario-table order
    pub scenarios: Vec<ScenarioSummary>,

    /// Baseline segment aggregate (country x product x PD band)
    pub segments: Vec<SegmentRow>,
}

impl PipelineOutcome {
    /// Summary for a named scenario, if it was run
    pub fn scenario_summary(&self, name: &str) -> Option<&PortfolioSummary> {
        self.scenarios
            .iter()
            .find(|s| s.scenario == name)
            .map(|s| &s.summary)
    }
}

/// Pre-configured risk pipeline
///
/// # Example
/// ```ignore
/// let pipeline = RiskPipeline::with_seed(42);
/// let outcome = pipeline.run(&loans)?;
/// println!("baseline EL: {:.2}", outcome.scenarios[0].summary.el_total);
/// ```
#[derive(Debug, Clone)]
pub struct RiskPipeline {
    train: TrainConfig,
    stress: StressEngine,
}

impl RiskPipeline {
    /// Pipeline with default training configuration and the shipped
    /// scenario table
    pub fn new() -> Self {
        Self {
            train: TrainConfig::default(),
            stress: StressEngine::builtin(),
        }
    }

    /// Pipeline with an explicit split/fit seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            train: TrainConfig {
                seed,
                ..TrainConfig::default()
            },
            stress: StressEngine::builtin(),
        }
    }

    /// Pipeline with full training configuration
    pub fn with_config(train: TrainConfig) -> Self {
        Self {
            train,
            stress: StressEngine::builtin(),
        }
    }

    /// Override the stress engine (custom scenario table or coefficients)
    pub fn with_stress_engine(mut self, stress: StressEngine) -> Self {
        self.stress = stress;
        self
    }

    /// The stress engine this pipeline runs scenarios through
    pub fn stress(&self) -> &StressEngine {
        &self.stress
    }

    /// Run the full pipeline over one loan table.
    ///
    /// Fails fast: any stage error propagates unchanged; no stage output is
    /// produced from a failed predecessor.
    pub fn run(&self, loans: &[LoanRecord]) -> Result<PipelineOutcome, RiskError> {
        let schema = FeatureSchema::fit(loans)?;
        let (features, target) = build_features(loans, &schema)?;
        log::info!(
            "features built: {} loans, {} columns, reference country {}",
            features.n_rows(),
            features.n_cols(),
            schema.reference_country
        );

        let fitted = pd::fit(&features, &target, &self.train)?;
        log::info!("pd model fit: test auc {:.4}", fitted.diagnostics.auc);

        let pd_base = fitted.model.score(&features)?;
        let lgd = estimate_lgd(loans);
        let ead = estimate_ead(loans);
        let el_base = expected_loss(&pd_base, &lgd, &ead);

        let mut scenarios = Vec::with_capacity(self.stress.table().len());
        for name in self.stress.table().names() {
            let pd_scenario = self.stress.shock(&pd_base, name)?;
            let el_scenario = expected_loss(&pd_scenario, &lgd, &ead);
            let summary = PortfolioSummary::from_losses(&el_scenario);
            log::info!("scenario {}: EL total {:.2}", name, summary.el_total);
            scenarios.push(ScenarioSummary {
                scenario: name.to_string(),
                summary,
            });
        }

        let segments = segment_breakdown(loans, &pd_base, &lgd, &ead, &el_base);

        Ok(PipelineOutcome {
            diagnostics: fitted.diagnostics,
            baseline: LoanLossVectors {
                pd: pd_base,
                lgd,
                ead,
                el: el_base,
            },
            scenarios,
            segments,
        })
    }
}

impl Default for RiskPipeline {
    fn default() -> Self {
        Self::new()
    }
}
