//! Seeded stratified train/test split
//!
//! Splits row indices so both partitions preserve the overall default rate.
//! All shuffling comes from a single `StdRng` seeded by the caller; two calls
//! with identical (target, fraction, seed) return identical partitions.

use crate::error::RiskError;
use rand::prelude::*;

/// Row indices of a train/test partition, each sorted ascending
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified split on a binary target.
///
/// Each class is shuffled independently and `test_fraction` of it (rounded,
/// at least one row, never the whole class) goes to the test partition.
/// Fails with `InsufficientData` when the target has a single class or a
/// class has fewer than 2 rows.
pub fn stratified_split(
    target: &[bool],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, RiskError> {
    let mut negatives: Vec<usize> = Vec::new();
    let mut positives: Vec<usize> = Vec::new();
    for (i, &y) in target.iter().enumerate() {
        if y {
            positives.push(i);
        } else {
            negatives.push(i);
        }
    }

    if positives.is_empty() || negatives.is_empty() {
        return Err(RiskError::InsufficientData {
            reason: format!(
                "target has a single class ({} positives, {} negatives)",
                positives.len(),
                negatives.len()
            ),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (label, class) in [(false, &mut negatives), (true, &mut positives)] {
        if class.len() < 2 {
            return Err(RiskError::InsufficientData {
                reason: format!(
                    "class {} has {} row(s); at least 2 are needed to split",
                    label as u8,
                    class.len()
                ),
            });
        }
        class.shuffle(&mut rng);

        let n_test = ((class.len() as f64 * test_fraction).round() as usize)
            .clamp(1, class.len() - 1);
        test.extend_from_slice(&class[..n_test]);
        train.extend_from_slice(&class[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}
