//! Segment aggregation by country, product kind, and PD band

use crate::loan::{LoanRecord, ProductKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// PD band for segmentation, half-open on fixed edges
/// [0, 0.01, 0.03, 0.06, 0.10, 1.0]; the lowest edge includes 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PdBand {
    /// [0, 0.01)
    #[serde(rename = "<1%")]
    Below1,
    /// [0.01, 0.03)
    #[serde(rename = "1-3%")]
    From1To3,
    /// [0.03, 0.06)
    #[serde(rename = "3-6%")]
    From3To6,
    /// [0.06, 0.10)
    #[serde(rename = "6-10%")]
    From6To10,
    /// [0.10, 1.0]
    #[serde(rename = ">10%")]
    Above10,
}

impl PdBand {
    /// Determine band from a baseline PD
    pub fn from_pd(pd: f64) -> Self {
        if pd < 0.01 {
            PdBand::Below1
        } else if pd < 0.03 {
            PdBand::From1To3
        } else if pd < 0.06 {
            PdBand::From3To6
        } else if pd < 0.10 {
            PdBand::From6To10
        } else {
            PdBand::Above10
        }
    }

    /// Label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            PdBand::Below1 => "<1%",
            PdBand::From1To3 => "1-3%",
            PdBand::From3To6 => "3-6%",
            PdBand::From6To10 => "6-10%",
            PdBand::Above10 => ">10%",
        }
    }
}

/// One aggregated segment: (country, product kind, PD band)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRow {
    pub country: String,
    pub product_kind: ProductKind,
    pub pd_band: PdBand,

    /// Loan count in the segment
    pub loans: usize,

    /// Total exposure at default
    pub ead_total: f64,

    /// Total expected loss
    pub el_total: f64,

    /// Mean probability of default
    pub pd_mean: f64,

    /// Mean loss given default
    pub lgd_mean: f64,
}

#[derive(Default)]
struct SegmentAccum {
    loans: usize,
    ead_sum: f64,
    el_sum: f64,
    pd_sum: f64,
    lgd_sum: f64,
}

/// Roll the per-loan vectors up by (country, product kind, band of the
/// *baseline* PD).
///
/// Rows come back in deterministic key order. Only observed segments are
/// emitted; empty groups do not appear with null aggregates.
pub fn segment_breakdown(
    loans: &[LoanRecord],
    pd: &[f64],
    lgd: &[f64],
    ead: &[f64],
    el: &[f64],
) -> Vec<SegmentRow> {
    assert_eq!(loans.len(), pd.len(), "loans and pd must align");
    assert_eq!(loans.len(), lgd.len(), "loans and lgd must align");
    assert_eq!(loans.len(), ead.len(), "loans and ead must align");
    assert_eq!(loans.len(), el.len(), "loans and el must align");

    let mut groups: BTreeMap<(String, ProductKind, PdBand), SegmentAccum> = BTreeMap::new();
    for (i, loan) in loans.iter().enumerate() {
        let key = (
            loan.country.clone(),
            loan.product_kind,
            PdBand::from_pd(pd[i]),
        );
        let acc = groups.entry(key).or_default();
        acc.loans += 1;
        acc.ead_sum += ead[i];
        acc.el_sum += el[i];
        acc.pd_sum += pd[i];
        acc.lgd_sum += lgd[i];
    }

    groups
        .into_iter()
        .map(|((country, product_kind, pd_band), acc)| SegmentRow {
            country,
            product_kind,
            pd_band,
            loans: acc.loans,
            ead_total: acc.ead_sum,
            el_total: acc.el_sum,
            pd_mean: acc.pd_sum / acc.loans as f64,
            lgd_mean: acc.lgd_sum / acc.loans as f64,
        })
        .collect()
}
