//! Convenience re-exports for common usage.

pub use crate::classifier::{Classification, Classifier, Knn, NaiveBayes};
pub use crate::cluster::{kmeans, KMeans, KMeansResult};
pub use crate::decomposition::{pca, PcaResult};
pub use crate::error::{AnalizarError, Result};
pub use crate::metrics::{accuracy, confusion_matrix, format_confusion_matrix, r_squared};
pub use crate::primitives::{Matrix, Vector};
pub use crate::regression::{
    least_squares, normal_equation, GradientDescent, Perceptron, RegressionFit,
};
pub use crate::table::{ColumnKind, Table};
