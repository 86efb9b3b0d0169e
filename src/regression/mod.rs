//! Multiple linear regression solvers.
//!
//! Four solvers share one input contract (a table, the independent
//! column names, one dependent column name) and one post-processing
//! step that derives error and significance statistics from the fitted
//! coefficients:
//!
//! - [`least_squares`]: SVD-based minimum-norm solve, the numerically
//!   stable reference.
//! - [`normal_equation`]: direct `(AᵗA)⁻¹Aᵗy`, included for comparison.
//! - [`gradient::GradientDescent`]: iterative L2-regularized solver.
//! - [`gradient::Perceptron`]: two-layer tanh network whose reported
//!   coefficients are an approximate diagnostic summary.
//!
//! All four report **two-tailed** p-values from the t-distribution.

pub mod gradient;

pub use gradient::{GradientDescent, Perceptron};

use crate::error::{AnalizarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::stats::student;
use crate::table::Table;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Singular values below this fraction of the largest one are treated
/// as zero.
const RANK_EPS: f32 = 1e-5;

/// The outcome of a regression fit, immutable once returned.
///
/// `coefficients` holds one entry per independent column followed by
/// the intercept, matching the design matrix layout `[ind | 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionFit {
    /// Fitted coefficients (independents in selection order, intercept last).
    pub coefficients: Vector<f32>,
    /// Sum-of-squared-error divided by the error degrees of freedom.
    pub sse: f32,
    /// Coefficient of determination.
    pub r_squared: f32,
    /// Per-coefficient t-statistics.
    pub t_stats: Vector<f32>,
    /// Per-coefficient two-tailed p-values.
    pub p_values: Vector<f32>,
}

/// Builds the design matrix `A = [ind | 1]` and the dependent vector.
fn design_matrix(table: &Table, ind: &[&str], dep: &str) -> Result<(Matrix<f32>, Vector<f32>)> {
    if ind.is_empty() {
        return Err(AnalizarError::invalid_selection(
            "regression needs at least one independent column",
        ));
    }

    let y = table.column(dep)?;
    let x = table.numeric_data(ind, None)?;
    let (n_rows, n_cols) = x.shape();

    let mut data = Vec::with_capacity(n_rows * (n_cols + 1));
    for i in 0..n_rows {
        for j in 0..n_cols {
            data.push(x.get(i, j));
        }
        data.push(1.0);
    }

    let a = Matrix::from_vec(n_rows, n_cols + 1, data)
        .expect("design matrix dimensions match data length");
    Ok((a, y))
}

/// Derives the shared error/significance statistics for a coefficient
/// vector fitted against `A` and `y`.
///
/// Degrees of freedom: `N - C` for the error. Standard errors come from
/// the diagonal of `sse * (AᵗA)⁻¹`, t-statistics are coefficient over
/// standard error, and p-values are two-tailed.
fn fit_statistics(a: &Matrix<f32>, y: &Vector<f32>, b: Vector<f32>) -> Result<RegressionFit> {
    let n = y.len();
    let c = b.len();

    if n <= c {
        return Err(AnalizarError::invalid_selection(format!(
            "regression needs more rows ({n}) than coefficients ({c})"
        )));
    }

    let at = a.transpose();
    let ata = at.matmul(a).map_err(AnalizarError::from)?;
    let aainv = ata.inverse()?;

    let predicted = a.matvec(&b).map_err(AnalizarError::from)?;
    let residual = y - &predicted;

    let df_error = (n - c) as f32;
    let sse = residual.norm_squared() / df_error;

    let mut t_stats = Vec::with_capacity(c);
    let mut p_values = Vec::with_capacity(c);
    for j in 0..c {
        let stderr = (sse * aainv.get(j, j)).sqrt();
        let t = b[j] / stderr;
        t_stats.push(t);
        p_values.push(student::two_tailed_pvalue(t, df_error));
    }

    let y_var = y.variance();
    let r_squared = if y_var == 0.0 {
        0.0
    } else {
        1.0 - residual.variance() / y_var
    };

    Ok(RegressionFit {
        coefficients: b,
        sse,
        r_squared,
        t_stats: Vector::from_vec(t_stats),
        p_values: Vector::from_vec(p_values),
    })
}

/// Least-squares regression via singular value decomposition.
///
/// Solves for `b` minimizing `||Ab − y||²` with `A = [ind | 1]`.
///
/// # Errors
///
/// Returns [`AnalizarError::SingularSystem`] for a rank-deficient design
/// matrix and [`AnalizarError::InvalidSelection`] for an unknown column,
/// an empty independent set, or too few rows.
///
/// # Examples
///
/// ```
/// use analizar::regression::least_squares;
/// use analizar::table::{ColumnKind, Table};
///
/// let table = Table::from_rows(
///     vec!["x".to_string(), "y".to_string()],
///     vec![ColumnKind::Numeric, ColumnKind::Numeric],
///     vec![
///         vec!["1".to_string(), "3".to_string()],
///         vec!["2".to_string(), "5".to_string()],
///         vec!["3".to_string(), "7".to_string()],
///         vec!["4".to_string(), "9".to_string()],
///     ],
/// ).expect("valid table");
///
/// // y = 2x + 1
/// let fit = least_squares(&table, &["x"], "y").expect("well-conditioned system");
/// assert!((fit.coefficients[0] - 2.0).abs() < 1e-3);
/// assert!((fit.coefficients[1] - 1.0).abs() < 1e-3);
/// ```
pub fn least_squares(table: &Table, ind: &[&str], dep: &str) -> Result<RegressionFit> {
    let (a, y) = design_matrix(table, ind, dep)?;
    let (n, c) = a.shape();

    let a_na = DMatrix::from_row_slice(n, c, a.as_slice());
    let svd = a_na.svd(true, true);

    let largest = svd
        .singular_values
        .iter()
        .copied()
        .fold(0.0f32, f32::max);
    let eps = (largest * RANK_EPS).max(1e-12);

    let rank = svd.rank(eps);
    if rank < c {
        let smallest = svd
            .singular_values
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        return Err(AnalizarError::SingularSystem { det: smallest });
    }

    let y_na = DMatrix::from_column_slice(n, 1, y.as_slice());
    let solution = svd
        .solve(&y_na, eps)
        .map_err(|e| AnalizarError::Other(e.to_string()))?;

    let b = Vector::from_vec(solution.iter().copied().collect());
    fit_statistics(&a, &y, b)
}

/// Regression through the normal equation `b = (AᵗA)⁻¹Aᵗy`.
///
/// Less stable than [`least_squares`] on ill-conditioned data; included
/// for comparison against the SVD route.
///
/// # Errors
///
/// Returns [`AnalizarError::SingularSystem`] when `AᵗA` cannot be
/// inverted, and the same selection errors as [`least_squares`].
pub fn normal_equation(table: &Table, ind: &[&str], dep: &str) -> Result<RegressionFit> {
    let (a, y) = design_matrix(table, ind, dep)?;

    let at = a.transpose();
    let ata = at.matmul(&a).map_err(AnalizarError::from)?;
    let aainv = ata.inverse()?;

    let aty = at.matvec(&y).map_err(AnalizarError::from)?;
    let b = aainv.matvec(&aty).map_err(AnalizarError::from)?;

    fit_statistics(&a, &y, b)
}
