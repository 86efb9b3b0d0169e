//! Error types for analizar operations.
//!
//! Every failure surfaces as a typed variant; no component retries
//! internally and no operation returns a partially built result.

use std::fmt;

/// Main error type for analizar operations.
///
/// # Examples
///
/// ```
/// use analizar::error::AnalizarError;
///
/// let err = AnalizarError::DimensionMismatch {
///     expected: "4 features".to_string(),
///     actual: "3 features".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum AnalizarError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A required matrix inverse does not exist (rank-deficient design
    /// matrix, degenerate per-class data during codebook compression).
    SingularSystem {
        /// Pivot/determinant magnitude that triggered the failure
        det: f32,
    },

    /// A Naive Bayes class/feature pair has zero variance, so the
    /// Gaussian likelihood is undefined.
    DegenerateModel {
        /// Class index with the degenerate feature
        class: usize,
        /// Feature index with zero variance
        feature: usize,
    },

    /// An unknown column was requested, or fewer columns than the
    /// operation requires were supplied.
    InvalidSelection {
        /// What was wrong with the selection
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AnalizarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalizarError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            AnalizarError::SingularSystem { det } => {
                write!(f, "singular system: pivot magnitude {det}, cannot invert")
            }
            AnalizarError::DegenerateModel { class, feature } => {
                write!(
                    f,
                    "degenerate model: class {class} has zero variance in feature {feature}"
                )
            }
            AnalizarError::InvalidSelection { message } => {
                write!(f, "invalid selection: {message}")
            }
            AnalizarError::Io(e) => write!(f, "I/O error: {e}"),
            AnalizarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalizarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalizarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalizarError {
    fn from(err: std::io::Error) -> Self {
        AnalizarError::Io(err)
    }
}

impl From<&str> for AnalizarError {
    fn from(msg: &str) -> Self {
        AnalizarError::Other(msg.to_string())
    }
}

impl From<String> for AnalizarError {
    fn from(msg: String) -> Self {
        AnalizarError::Other(msg)
    }
}

impl AnalizarError {
    /// Create an invalid-selection error for an unknown column name.
    #[must_use]
    pub fn unknown_column(name: &str) -> Self {
        Self::InvalidSelection {
            message: format!("unknown column '{name}'"),
        }
    }

    /// Create an invalid-selection error with descriptive context.
    #[must_use]
    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::InvalidSelection {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AnalizarError>;
