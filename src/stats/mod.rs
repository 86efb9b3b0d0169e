//! Descriptive statistics and normalization over table columns.
//!
//! Every operation here is a pure function over `(&Table, &[&str])`:
//! it selects the numeric sub-matrix for the named columns and reduces
//! it per column, leaving the table untouched.

pub mod student;

use crate::error::{AnalizarError, Result};
use crate::primitives::Matrix;
use crate::table::Table;

/// Per-column (min, max) pairs.
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
///
/// # Examples
///
/// ```
/// use analizar::stats;
/// use analizar::table::{ColumnKind, Table};
///
/// let table = Table::from_rows(
///     vec!["x".to_string()],
///     vec![ColumnKind::Numeric],
///     vec![
///         vec!["3.0".to_string()],
///         vec!["1.0".to_string()],
///         vec!["2.0".to_string()],
///     ],
/// ).expect("valid table");
///
/// let ranges = stats::range(&table, &["x"]).expect("x exists");
/// assert_eq!(ranges, vec![(1.0, 3.0)]);
/// ```
pub fn range(table: &Table, names: &[&str]) -> Result<Vec<(f32, f32)>> {
    let data = table.numeric_data(names, None)?;
    Ok((0..data.n_cols())
        .map(|j| {
            let col = data.column(j);
            (col.min(), col.max())
        })
        .collect())
}

/// Per-column max − min.
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
pub fn range_diff(table: &Table, names: &[&str]) -> Result<Vec<f32>> {
    Ok(range(table, names)?
        .into_iter()
        .map(|(lo, hi)| hi - lo)
        .collect())
}

/// Per-column arithmetic means.
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
pub fn mean(table: &Table, names: &[&str]) -> Result<Vec<f32>> {
    let data = table.numeric_data(names, None)?;
    Ok((0..data.n_cols()).map(|j| data.column(j).mean()).collect())
}

/// Per-column population standard deviations.
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
pub fn stdev(table: &Table, names: &[&str]) -> Result<Vec<f32>> {
    let data = table.numeric_data(names, None)?;
    Ok((0..data.n_cols()).map(|j| data.column(j).std()).collect())
}

/// Per-column population variances.
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
pub fn variance(table: &Table, names: &[&str]) -> Result<Vec<f32>> {
    let data = table.numeric_data(names, None)?;
    Ok((0..data.n_cols())
        .map(|j| data.column(j).variance())
        .collect())
}

/// Per-column medians (midpoint average for even counts).
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
pub fn median(table: &Table, names: &[&str]) -> Result<Vec<f32>> {
    let data = table.numeric_data(names, None)?;
    Ok((0..data.n_cols())
        .map(|j| {
            let mut sorted = data.column(j).as_slice().to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = sorted.len();
            if n == 0 {
                0.0
            } else if n % 2 == 0 {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            } else {
                sorted[n / 2]
            }
        })
        .collect())
}

/// Per-column (mode value, frequency). Ties go to the smallest value.
///
/// # Errors
///
/// Returns an error for an unknown or empty column selection.
pub fn mode(table: &Table, names: &[&str]) -> Result<Vec<(f32, usize)>> {
    let data = table.numeric_data(names, None)?;
    Ok((0..data.n_cols())
        .map(|j| {
            let mut sorted = data.column(j).as_slice().to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let mut best_value = sorted.first().copied().unwrap_or(0.0);
            let mut best_count = 0usize;
            let mut i = 0;
            while i < sorted.len() {
                let mut run = 1;
                while i + run < sorted.len() && sorted[i + run] == sorted[i] {
                    run += 1;
                }
                // Strict > keeps the first (smallest) value on ties.
                if run > best_count {
                    best_count = run;
                    best_value = sorted[i];
                }
                i += run;
            }
            (best_value, best_count)
        })
        .collect())
}

/// Normalizes each selected column independently to [0, 1] using that
/// column's own min/max.
///
/// # Errors
///
/// Returns [`AnalizarError::InvalidSelection`] for an unknown column or
/// for a constant column (max == min), which has no well-defined affine
/// map; callers wanting a different constant-column policy must handle
/// the column before selecting it.
pub fn normalize_separately(table: &Table, names: &[&str]) -> Result<Matrix<f32>> {
    let data = table.numeric_data(names, None)?;
    let (n_rows, n_cols) = data.shape();

    let mut result = Matrix::zeros(n_rows, n_cols);
    for (j, &name) in names.iter().enumerate() {
        let col = data.column(j);
        let lo = col.min();
        let hi = col.max();
        if hi == lo {
            return Err(AnalizarError::invalid_selection(format!(
                "column '{name}' is constant (min == max == {lo}), cannot normalize"
            )));
        }
        let span = hi - lo;
        for i in 0..n_rows {
            result.set(i, j, (data.get(i, j) - lo) / span);
        }
    }
    Ok(result)
}

/// Normalizes all selected columns with a single affine map to [0, 1]
/// using the global min/max across the whole selection.
///
/// # Errors
///
/// Returns [`AnalizarError::InvalidSelection`] for an unknown column or
/// when every selected value is identical.
pub fn normalize_together(table: &Table, names: &[&str]) -> Result<Matrix<f32>> {
    let data = table.numeric_data(names, None)?;
    let (n_rows, n_cols) = data.shape();

    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &v in data.as_slice() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if hi == lo {
        return Err(AnalizarError::invalid_selection(format!(
            "selection is constant (min == max == {lo}), cannot normalize"
        )));
    }

    let span = hi - lo;
    let mut result = Matrix::zeros(n_rows, n_cols);
    for i in 0..n_rows {
        for j in 0..n_cols {
            result.set(i, j, (data.get(i, j) - lo) / span);
        }
    }
    Ok(result)
}
