//! Analizar: statistical analysis and machine learning over tabular
//! numeric data in pure Rust.
//!
//! The engine consumes a [`table::Table`] (named columns with raw and
//! numeric views) and returns plain numeric results — vectors, matrices,
//! labeled codes — with no rendering or formatting logic attached.
//!
//! # Quick Start
//!
//! ```
//! use analizar::prelude::*;
//!
//! let table = Table::from_rows(
//!     vec!["x".to_string(), "y".to_string()],
//!     vec![ColumnKind::Numeric, ColumnKind::Numeric],
//!     vec![
//!         vec!["1".to_string(), "3".to_string()],
//!         vec!["2".to_string(), "5".to_string()],
//!         vec!["3".to_string(), "7".to_string()],
//!         vec!["4".to_string(), "9".to_string()],
//!     ],
//! ).expect("rows match the header layout");
//!
//! // y = 2x + 1
//! let fit = least_squares(&table, &["x"], "y").expect("well-conditioned system");
//! assert!((fit.coefficients[0] - 2.0).abs() < 1e-3);
//! assert!((fit.r_squared - 1.0).abs() < 1e-4);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`table`]: Tabular data source with raw + numeric views
//! - [`stats`]: Descriptive statistics and normalization
//! - [`regression`]: Four linear-regression solvers with shared
//!   significance statistics
//! - [`decomposition`]: Principal component analysis
//! - [`cluster`]: K-means clustering
//! - [`classifier`]: Gaussian Naive Bayes and KNN classifiers
//! - [`metrics`]: Confusion matrix, accuracy, R²

pub mod classifier;
pub mod cluster;
pub mod decomposition;
pub mod error;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod regression;
pub mod stats;
pub mod table;

pub use error::{AnalizarError, Result};
pub use primitives::{Matrix, Vector};
