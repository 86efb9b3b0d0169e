//! Principal component analysis over table columns.
//!
//! The decomposition runs on the (optionally normalized) mean-centered
//! selection via singular value decomposition; eigenvalue order follows
//! the singular values, largest first.

use crate::error::{AnalizarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::stats;
use crate::table::{ColumnKind, Table};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// The outcome of a principal component analysis, immutable once
/// returned.
///
/// Eigenvectors are orthonormal rows in descending eigenvalue order;
/// the projected matrix has one row per source row and one column per
/// retained component (all components are retained).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaResult {
    projected: Matrix<f32>,
    eigenvectors: Matrix<f32>,
    eigenvalues: Vector<f32>,
    means: Vector<f32>,
    source_headers: Vec<String>,
}

impl PcaResult {
    /// The data projected onto the principal components.
    #[must_use]
    pub fn projected(&self) -> &Matrix<f32> {
        &self.projected
    }

    /// Eigenvectors as rows, descending eigenvalue order.
    #[must_use]
    pub fn eigenvectors(&self) -> &Matrix<f32> {
        &self.eigenvectors
    }

    /// Eigenvalues (squared singular values over N−1), descending.
    #[must_use]
    pub fn eigenvalues(&self) -> &Vector<f32> {
        &self.eigenvalues
    }

    /// Per-column means subtracted before decomposition.
    #[must_use]
    pub fn means(&self) -> &Vector<f32> {
        &self.means
    }

    /// Names of the source columns the analysis consumed.
    #[must_use]
    pub fn source_headers(&self) -> &[String] {
        &self.source_headers
    }

    /// Number of retained components.
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.eigenvectors.n_rows()
    }

    /// Reconstructs the (normalized) input from the projection:
    /// `X ≈ projected · eigenvectors + means`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored matrices have been tampered into
    /// inconsistent shapes; a freshly computed result cannot fail.
    pub fn reconstruct(&self) -> Result<Matrix<f32>> {
        let mut restored = self
            .projected
            .matmul(&self.eigenvectors)
            .map_err(AnalizarError::from)?;
        for i in 0..restored.n_rows() {
            for j in 0..restored.n_cols() {
                restored.set(i, j, restored.get(i, j) + self.means[j]);
            }
        }
        Ok(restored)
    }

    /// Converts the projection into a [`Table`] whose columns are the
    /// synthetic component axes `pc1`, `pc2`, … — never the source
    /// column names.
    ///
    /// # Errors
    ///
    /// Returns an error only if the projected matrix is empty.
    pub fn to_table(&self) -> Result<Table> {
        let (n_rows, n_cols) = self.projected.shape();
        let headers: Vec<String> = (1..=n_cols).map(|i| format!("pc{i}")).collect();
        let kinds = vec![ColumnKind::Numeric; n_cols];
        let rows: Vec<Vec<String>> = (0..n_rows)
            .map(|i| {
                (0..n_cols)
                    .map(|j| self.projected.get(i, j).to_string())
                    .collect()
            })
            .collect();
        Table::from_rows(headers, kinds, rows)
    }
}

/// Runs PCA on the named columns of a table.
///
/// With `normalize` set, each column is first mapped to [0, 1]
/// independently (a constant column is an error, per
/// [`stats::normalize_separately`]).
///
/// # Errors
///
/// Returns [`AnalizarError::InvalidSelection`] for fewer than two
/// columns, fewer than two rows, an unknown column, or a constant
/// column when normalizing.
///
/// # Examples
///
/// ```
/// use analizar::decomposition::pca;
/// use analizar::table::{ColumnKind, Table};
///
/// let table = Table::from_rows(
///     vec!["x".to_string(), "y".to_string()],
///     vec![ColumnKind::Numeric, ColumnKind::Numeric],
///     vec![
///         vec!["1.0".to_string(), "2.0".to_string()],
///         vec!["2.0".to_string(), "4.1".to_string()],
///         vec!["3.0".to_string(), "5.9".to_string()],
///         vec!["4.0".to_string(), "8.0".to_string()],
///     ],
/// ).expect("valid table");
///
/// let result = pca(&table, &["x", "y"], false).expect("valid selection");
/// assert_eq!(result.projected().shape(), (4, 2));
/// // Nearly collinear data: the first component dominates.
/// assert!(result.eigenvalues()[0] > result.eigenvalues()[1] * 100.0);
/// ```
pub fn pca(table: &Table, headers: &[&str], normalize: bool) -> Result<PcaResult> {
    if headers.len() < 2 {
        return Err(AnalizarError::invalid_selection(
            "pca needs at least two columns for a meaningful projection",
        ));
    }

    let a = if normalize {
        stats::normalize_separately(table, headers)?
    } else {
        table.numeric_data(headers, None)?
    };

    let (n_rows, n_cols) = a.shape();
    if n_rows < 2 {
        return Err(AnalizarError::invalid_selection(
            "pca needs at least two rows",
        ));
    }

    // Center by column means.
    let means: Vec<f32> = (0..n_cols).map(|j| a.column(j).mean()).collect();
    let mut centered = Matrix::zeros(n_rows, n_cols);
    for i in 0..n_rows {
        for j in 0..n_cols {
            centered.set(i, j, a.get(i, j) - means[j]);
        }
    }

    let d = DMatrix::from_row_slice(n_rows, n_cols, centered.as_slice());
    let svd = d.svd(true, true);
    let singular = &svd.singular_values;
    let v_t = svd
        .v_t
        .as_ref()
        .expect("svd computed with right singular vectors");

    let n_components = singular.len();

    // Explicit descending sort; component order is part of the contract.
    let mut order: Vec<usize> = (0..n_components).collect();
    order.sort_by(|&a, &b| {
        singular[b]
            .partial_cmp(&singular[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut evec_data = Vec::with_capacity(n_components * n_cols);
    let mut eigenvalues = Vec::with_capacity(n_components);
    for &idx in &order {
        eigenvalues.push(singular[idx] * singular[idx] / (n_rows - 1) as f32);
        for j in 0..n_cols {
            evec_data.push(v_t[(idx, j)]);
        }
    }

    let eigenvectors = Matrix::from_vec(n_components, n_cols, evec_data)
        .expect("eigenvector matrix dimensions match data length");

    let projected = centered
        .matmul(&eigenvectors.transpose())
        .map_err(AnalizarError::from)?;

    Ok(PcaResult {
        projected,
        eigenvectors,
        eigenvalues: Vector::from_vec(eigenvalues),
        means: Vector::from_vec(means),
        source_headers: headers.iter().map(|s| (*s).to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_table(columns: &[(&str, &[f32])]) -> Table {
        let headers: Vec<String> = columns.iter().map(|(n, _)| (*n).to_string()).collect();
        let kinds = vec![ColumnKind::Numeric; columns.len()];
        let n_rows = columns[0].1.len();
        let rows: Vec<Vec<String>> = (0..n_rows)
            .map(|i| columns.iter().map(|(_, vals)| vals[i].to_string()).collect())
            .collect();
        Table::from_rows(headers, kinds, rows).unwrap()
    }

    fn sample_table() -> Table {
        numeric_table(&[
            ("a", &[2.5, 0.5, 2.2, 1.9, 3.1, 2.3, 2.0, 1.0, 1.5, 1.1]),
            ("b", &[2.4, 0.7, 2.9, 2.2, 3.0, 2.7, 1.6, 1.1, 1.6, 0.9]),
        ])
    }

    #[test]
    fn test_shapes_and_ordering() {
        let table = sample_table();
        let result = pca(&table, &["a", "b"], false).unwrap();

        assert_eq!(result.projected().shape(), (10, 2));
        assert_eq!(result.eigenvectors().shape(), (2, 2));
        assert_eq!(result.eigenvalues().len(), 2);
        assert_eq!(result.means().len(), 2);
        assert_eq!(result.source_headers(), &["a", "b"]);

        // Descending eigenvalue order.
        assert!(result.eigenvalues()[0] >= result.eigenvalues()[1]);
    }

    #[test]
    fn test_eigenvectors_orthonormal() {
        let table = sample_table();
        let result = pca(&table, &["a", "b"], false).unwrap();
        let e = result.eigenvectors();

        for i in 0..2 {
            let row_i = e.row(i);
            assert!((row_i.norm() - 1.0).abs() < 1e-4);
            for j in (i + 1)..2 {
                let row_j = e.row(j);
                assert!(row_i.dot(&row_j).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_round_trip_reconstruction() {
        let table = sample_table();
        let result = pca(&table, &["a", "b"], false).unwrap();
        let restored = result.reconstruct().unwrap();

        let original = table.numeric_data(&["a", "b"], None).unwrap();
        for i in 0..original.n_rows() {
            for j in 0..original.n_cols() {
                assert!(
                    (restored.get(i, j) - original.get(i, j)).abs() < 1e-3,
                    "mismatch at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn test_round_trip_with_normalization() {
        let table = sample_table();
        let result = pca(&table, &["a", "b"], true).unwrap();
        let restored = result.reconstruct().unwrap();

        let normalized = crate::stats::normalize_separately(&table, &["a", "b"]).unwrap();
        for i in 0..normalized.n_rows() {
            for j in 0..normalized.n_cols() {
                assert!((restored.get(i, j) - normalized.get(i, j)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_eigenvalues_match_variance() {
        // Total variance is preserved: sum of eigenvalues equals the sum
        // of per-column sample variances (N-1 denominator).
        let table = sample_table();
        let result = pca(&table, &["a", "b"], false).unwrap();

        let data = table.numeric_data(&["a", "b"], None).unwrap();
        let n = data.n_rows() as f32;
        let total_var: f32 = (0..2)
            .map(|j| data.column(j).variance() * n / (n - 1.0))
            .sum();
        let eig_sum: f32 = result.eigenvalues()[0] + result.eigenvalues()[1];
        assert!((total_var - eig_sum).abs() < 1e-3);
    }

    #[test]
    fn test_projection_is_centered() {
        let table = sample_table();
        let result = pca(&table, &["a", "b"], false).unwrap();
        for j in 0..2 {
            assert!(result.projected().column(j).mean().abs() < 1e-4);
        }
    }

    #[test]
    fn test_to_table_uses_synthetic_names() {
        let table = sample_table();
        let result = pca(&table, &["a", "b"], false).unwrap();
        let projected_table = result.to_table().unwrap();

        assert_eq!(projected_table.headers(), vec!["pc1", "pc2"]);
        assert_eq!(projected_table.n_rows(), 10);

        // Usable downstream like any table.
        let m = projected_table.numeric_data(&["pc1"], None).unwrap();
        assert_eq!(m.shape(), (10, 1));
    }

    #[test]
    fn test_single_column_is_invalid() {
        let table = sample_table();
        let result = pca(&table, &["a"], false);
        assert!(matches!(
            result,
            Err(AnalizarError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_constant_column_with_normalize_is_error() {
        let table = numeric_table(&[("a", &[1.0, 2.0, 3.0]), ("b", &[5.0, 5.0, 5.0])]);
        let result = pca(&table, &["a", "b"], true);
        assert!(matches!(
            result,
            Err(AnalizarError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn test_unknown_column() {
        let table = sample_table();
        assert!(pca(&table, &["a", "zzz"], false).is_err());
    }
}
