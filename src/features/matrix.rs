//! Numeric feature matrix with named columns

use serde::{Deserialize, Serialize};

/// Row-major numeric matrix with a fixed, named column order.
///
/// Row order and row count always equal the loan table the matrix was built
/// from; the column list is part of the value and travels with it so scoring
/// can verify alignment against a fitted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    data: Vec<f64>,
    n_rows: usize,
}

impl FeatureMatrix {
    /// Create an empty matrix with the given column order.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            data: Vec::new(),
            n_rows: 0,
        }
    }

    /// Append one row. The row length must equal the column count.
    pub fn push_row(&mut self, row: &[f64]) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row length must equal column count"
        );
        self.data.extend_from_slice(row);
        self.n_rows += 1;
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in matrix order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Borrow row `i`
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.columns.len();
        &self.data[i * w..(i + 1) * w]
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact on an empty matrix with zero columns would panic
        let w = self.columns.len().max(1);
        self.data.chunks_exact(w)
    }

    /// Iterate values of column `j`
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        let w = self.columns.len();
        (0..self.n_rows).map(move |i| self.data[i * w + j])
    }

    /// Materialize a sub-matrix from the given row indices, preserving order.
    pub fn select_rows(&self, indices: &[usize]) -> FeatureMatrix {
        let mut out = FeatureMatrix::new(self.columns.clone());
        for &i in indices {
            out.push_row(self.row(i));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureMatrix {
        let mut m = FeatureMatrix::new(vec!["a".to_string(), "b".to_string()]);
        m.push_row(&[1.0, 2.0]);
        m.push_row(&[3.0, 4.0]);
        m.push_row(&[5.0, 6.0]);
        m
    }

    #[test]
    fn test_shape_and_access() {
        let m = sample();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        let col_b: Vec<f64> = m.column(1).collect();
        assert_eq!(col_b, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_select_rows_preserves_order() {
        let m = sample();
        let sub = m.select_rows(&[2, 0]);
        assert_eq!(sub.n_rows(), 2);
        assert_eq!(sub.row(0), &[5.0, 6.0]);
        assert_eq!(sub.row(1), &[1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "row length")]
    fn test_row_length_checked() {
        let mut m = FeatureMatrix::new(vec!["a".to_string()]);
        m.push_row(&[1.0, 2.0]);
    }
}
