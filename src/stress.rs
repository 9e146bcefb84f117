//! Macro stress engine for baseline PD vectors
//!
//! Shocks are applied in log-odds space: each baseline PD is clipped away
//! from 0/1, converted to its logit, shifted by a fixed linear combination of
//! the scenario's macro shocks, and mapped back through the logistic. The
//! scenario table is immutable configuration built once; changing it is a
//! code change, not a runtime parameter. Not a regulatory model: the shocks
//! are transparent sensitivity multipliers.

use crate::error::RiskError;
use serde::{Deserialize, Serialize};

/// Clip bound keeping logits finite
pub const PD_EPSILON: f64 = 1e-9;

/// Macro shock triple for one scenario, all in percentage points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroShocks {
    /// GDP growth shock (negative in a contraction)
    pub gdp: f64,
    /// Unemployment rate shock
    pub unemployment: f64,
    /// Policy rate shock
    pub rates: f64,
}

impl MacroShocks {
    pub fn is_zero(&self) -> bool {
        self.gdp == 0.0 && self.unemployment == 0.0 && self.rates == 0.0
    }
}

/// Fixed, ordered scenario table (severity order, baseline first)
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    entries: Vec<(String, MacroShocks)>,
}

impl ScenarioTable {
    /// The shipped scenario set
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (
                    "baseline".to_string(),
                    MacroShocks { gdp: 0.0, unemployment: 0.0, rates: 0.0 },
                ),
                (
                    "mild_recession".to_string(),
                    MacroShocks { gdp: -1.5, unemployment: 2.0, rates: 0.5 },
                ),
                (
                    "severe_recession".to_string(),
                    MacroShocks { gdp: -3.0, unemployment: 4.0, rates: 1.5 },
                ),
            ],
        }
    }

    /// Shocks for a named scenario
    pub fn get(&self, name: &str) -> Option<&MacroShocks> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Scenario names in table (severity) order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// (name, shocks) pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MacroShocks)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sensitivity of the PD logit to each macro shock
///
/// The GDP coefficient is negative: a contraction (negative GDP shock)
/// raises the logit and with it the stressed PD.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StressCoefficients {
    pub unemployment: f64,
    pub rates: f64,
    pub gdp: f64,
}

impl Default for StressCoefficients {
    fn default() -> Self {
        Self {
            unemployment: 0.18,
            rates: 0.10,
            gdp: -0.08,
        }
    }
}

/// Applies scenario shocks to baseline PD vectors
#[derive(Debug, Clone)]
pub struct StressEngine {
    table: ScenarioTable,
    coefficients: StressCoefficients,
}

impl StressEngine {
    pub fn new(table: ScenarioTable, coefficients: StressCoefficients) -> Self {
        Self { table, coefficients }
    }

    /// Engine with the shipped scenario table and default coefficients
    pub fn builtin() -> Self {
        Self::new(ScenarioTable::builtin(), StressCoefficients::default())
    }

    pub fn table(&self) -> &ScenarioTable {
        &self.table
    }

    /// Transform a baseline PD vector under the named scenario.
    ///
    /// Output has the same length and order as the input. Fails with
    /// `UnknownScenario` when the name is not in the table.
    pub fn shock(&self, baseline_pd: &[f64], scenario: &str) -> Result<Vec<f64>, RiskError> {
        let shocks = self
            .table
            .get(scenario)
            .ok_or_else(|| RiskError::UnknownScenario {
                name: scenario.to_string(),
            })?;

        let shift = self.coefficients.unemployment * shocks.unemployment
            + self.coefficients.rates * shocks.rates
            + self.coefficients.gdp * shocks.gdp;

        // Zero shift leaves the logit unchanged; skip the round-trip so the
        // baseline scenario reproduces the input bit-for-bit
        if shocks.is_zero() {
            return Ok(baseline_pd
                .iter()
                .map(|p| p.clamp(PD_EPSILON, 1.0 - PD_EPSILON))
                .collect());
        }

        Ok(baseline_pd
            .iter()
            .map(|p| {
                let p = p.clamp(PD_EPSILON, 1.0 - PD_EPSILON);
                let logit = (p / (1.0 - p)).ln() + shift;
                let shocked = 1.0 / (1.0 + (-logit).exp());
                shocked.clamp(PD_EPSILON, 1.0 - PD_EPSILON)
            })
            .collect())
    }
}
