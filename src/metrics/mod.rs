//! Evaluation metrics: confusion matrix, accuracy, and R².

use crate::primitives::{Matrix, Vector};

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// # Examples
///
/// ```
/// use analizar::metrics::r_squared;
/// use analizar::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!(r2 > 0.9);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn r_squared(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let y_mean = y_true.mean();

    let ss_res: f32 = y_true
        .as_slice()
        .iter()
        .zip(y_pred.as_slice().iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    let ss_tot: f32 = y_true.as_slice().iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return 0.0;
    }

    1.0 - (ss_res / ss_tot)
}

/// Computes classification accuracy.
///
/// # Examples
///
/// ```
/// use analizar::metrics::accuracy;
///
/// let y_true = vec![0, 1, 2, 0];
/// let y_pred = vec![0, 1, 1, 0];
/// assert!((accuracy(&y_pred, &y_true) - 0.75).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

/// Computes the confusion matrix for parallel code sequences.
///
/// Element `[i, j]` counts rows with true class `i` predicted as class
/// `j`. The matrix is C×C where C is the number of distinct classes
/// observed in the true-label sequence.
///
/// # Examples
///
/// ```
/// use analizar::metrics::confusion_matrix;
///
/// let y_true = vec![0, 0, 1, 1];
/// let y_pred = vec![0, 1, 1, 1];
/// let cm = confusion_matrix(&y_pred, &y_true);
/// assert_eq!(cm.get(0, 0), 1);
/// assert_eq!(cm.get(0, 1), 1);
/// assert_eq!(cm.get(1, 0), 0);
/// assert_eq!(cm.get(1, 1), 2);
/// ```
///
/// # Panics
///
/// Panics if the sequences have different lengths, are empty, or a
/// predicted code falls outside the classes observed in `y_true`.
#[must_use]
pub fn confusion_matrix(y_pred: &[usize], y_true: &[usize]) -> Matrix<usize> {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let mut distinct: Vec<usize> = y_true.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let n_classes = distinct.len();

    let mut data = vec![0usize; n_classes * n_classes];
    for (&true_code, &pred_code) in y_true.iter().zip(y_pred.iter()) {
        assert!(
            true_code < n_classes && pred_code < n_classes,
            "category codes must be zero-based and dense"
        );
        data[true_code * n_classes + pred_code] += 1;
    }

    Matrix::from_vec(n_classes, n_classes, data)
        .expect("confusion matrix dimensions match data length")
}

/// Renders a confusion matrix row-major, one row per line, for logging.
/// The rendering is cosmetic and not part of the evaluation contract.
///
/// # Examples
///
/// ```
/// use analizar::metrics::{confusion_matrix, format_confusion_matrix};
///
/// let cm = confusion_matrix(&[0, 1, 1, 1], &[0, 0, 1, 1]);
/// let text = format_confusion_matrix(&cm);
/// assert_eq!(text, "1 1\n0 2\n");
/// ```
#[must_use]
pub fn format_confusion_matrix(matrix: &Matrix<usize>) -> String {
    let (n_rows, n_cols) = matrix.shape();
    let mut out = String::new();
    for i in 0..n_rows {
        let row: Vec<String> = (0..n_cols).map(|j| matrix.get(i, j).to_string()).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}
