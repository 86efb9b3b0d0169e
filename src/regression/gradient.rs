//! Iterative regression solvers: gradient descent and a two-layer
//! perceptron.
//!
//! Both run a fixed number of epochs with no convergence check; the
//! per-epoch regularized cost is recorded and exposed through
//! `cost_history()` so callers can inspect training progress. A caller
//! wanting bounded latency controls the epoch count.

use super::{design_matrix, fit_statistics, RegressionFit};
use crate::error::Result;
use crate::primitives::Vector;
use crate::table::Table;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// L2-regularized linear regression trained by batch gradient descent.
///
/// Weights are initialized uniformly in `[-epsilon, epsilon]`; the bias
/// term is excluded from regularization. Defaults: learning rate 0.005,
/// regularization 0.1, epsilon 0.13, 5000 epochs.
///
/// # Examples
///
/// ```
/// use analizar::regression::GradientDescent;
/// use analizar::table::{ColumnKind, Table};
///
/// let table = Table::from_rows(
///     vec!["x".to_string(), "y".to_string()],
///     vec![ColumnKind::Numeric, ColumnKind::Numeric],
///     vec![
///         vec!["-2".to_string(), "-3".to_string()],
///         vec!["-1".to_string(), "-1".to_string()],
///         vec!["0".to_string(), "1".to_string()],
///         vec!["1".to_string(), "3".to_string()],
///         vec!["2".to_string(), "5".to_string()],
///     ],
/// ).expect("valid table");
///
/// let mut solver = GradientDescent::new().with_random_state(42);
/// let fit = solver.fit(&table, &["x"], "y").expect("valid selection");
/// assert!((fit.coefficients[0] - 2.0).abs() < 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct GradientDescent {
    /// Learning rate (alpha).
    learning_rate: f32,
    /// L2 regularization coefficient (lambda).
    regularization: f32,
    /// Half-width of the uniform weight-initialization interval.
    epsilon: f32,
    /// Fixed number of training epochs.
    epochs: usize,
    /// Random seed for weight initialization.
    random_state: Option<u64>,
    /// Regularized cost after each epoch of the last fit.
    cost_history: Vec<f32>,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientDescent {
    /// Creates a solver with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            learning_rate: 0.005,
            regularization: 0.1,
            epsilon: 0.13,
            epochs: 5000,
            random_state: None,
            cost_history: Vec::new(),
        }
    }

    /// Sets the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the L2 regularization coefficient.
    #[must_use]
    pub fn with_regularization(mut self, regularization: f32) -> Self {
        self.regularization = regularization;
        self
    }

    /// Sets the weight-initialization half-width.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the fixed epoch count.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the random seed for reproducible initialization.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Per-epoch regularized cost from the most recent fit.
    #[must_use]
    pub fn cost_history(&self) -> &[f32] {
        &self.cost_history
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Fits the model and derives the shared regression statistics.
    ///
    /// # Errors
    ///
    /// Returns the same selection and singular-system errors as the
    /// closed-form solvers (the statistics step still inverts `AᵗA`).
    pub fn fit(&mut self, table: &Table, ind: &[&str], dep: &str) -> Result<RegressionFit> {
        let (a, y) = design_matrix(table, ind, dep)?;
        let (m, c) = a.shape();

        let mut rng = self.rng();
        let mut theta: Vec<f32> = (0..c)
            .map(|_| rng.gen_range(-self.epsilon..self.epsilon))
            .collect();

        self.cost_history = Vec::with_capacity(self.epochs);
        let m_f = m as f32;

        for _ in 0..self.epochs {
            let mut delta = vec![0.0; c];
            let mut sq_error_sum = 0.0;

            for i in 0..m {
                let mut prediction = 0.0;
                for j in 0..c {
                    prediction += a.get(i, j) * theta[j];
                }
                let error = prediction - y[i];
                sq_error_sum += error * error;
                for (j, d) in delta.iter_mut().enumerate() {
                    *d += error * a.get(i, j);
                }
            }

            // Bias lives in the last slot and is not regularized.
            for (j, t) in theta.iter_mut().enumerate() {
                let penalty = if j + 1 == c {
                    0.0
                } else {
                    (self.regularization / m_f) * *t
                };
                *t -= self.learning_rate * (delta[j] / m_f + penalty);
            }

            let theta_sq: f32 = theta.iter().map(|t| t * t).sum();
            let cost = 0.5 * (sq_error_sum + self.regularization * theta_sq);
            self.cost_history.push(cost);
        }

        fit_statistics(&a, &y, Vector::from_vec(theta))
    }
}

/// Regression through a two-layer perceptron trained by backpropagation.
///
/// The hidden layer has two more nodes than the bias-augmented input
/// layer and uses hyperbolic-tangent activations; the output layer is a
/// single linear node. Both weight matrices carry an unregularized bias
/// column. Defaults: learning rate 0.01, regularization 0.001, epsilon
/// 0.13, 10000 epochs.
///
/// The reported coefficient vector averages each input's weights across
/// the hidden layer. That is a lossy diagnostic summary of the network,
/// not a true per-feature slope: do not treat it as interchangeable with
/// the closed-form solvers' coefficients.
#[derive(Debug, Clone)]
pub struct Perceptron {
    learning_rate: f32,
    regularization: f32,
    epsilon: f32,
    epochs: usize,
    random_state: Option<u64>,
    cost_history: Vec<f32>,
}

impl Default for Perceptron {
    fn default() -> Self {
        Self::new()
    }
}

impl Perceptron {
    /// Creates a solver with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            learning_rate: 0.01,
            regularization: 0.001,
            epsilon: 0.13,
            epochs: 10000,
            random_state: None,
            cost_history: Vec::new(),
        }
    }

    /// Sets the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the L2 regularization coefficient.
    #[must_use]
    pub fn with_regularization(mut self, regularization: f32) -> Self {
        self.regularization = regularization;
        self
    }

    /// Sets the weight-initialization half-width.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the fixed epoch count.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the random seed for reproducible initialization.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Per-epoch regularized cost from the most recent fit.
    #[must_use]
    pub fn cost_history(&self) -> &[f32] {
        &self.cost_history
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Trains the network and derives the shared regression statistics
    /// from the averaged (approximate) coefficients.
    ///
    /// # Errors
    ///
    /// Returns the same selection and singular-system errors as the
    /// closed-form solvers.
    pub fn fit(&mut self, table: &Table, ind: &[&str], dep: &str) -> Result<RegressionFit> {
        let (a, y) = design_matrix(table, ind, dep)?;
        let (m, j1) = a.shape();
        // Hidden layer: two nodes more than the bias-augmented inputs,
        // one of which is the hidden bias appended after activation.
        let j2 = j1 + 2;
        let hidden = j2 - 1;

        let mut rng = self.rng();
        let mut theta1: Vec<Vec<f32>> = (0..hidden)
            .map(|_| {
                (0..j1)
                    .map(|_| rng.gen_range(-self.epsilon..self.epsilon))
                    .collect()
            })
            .collect();
        let mut theta2: Vec<f32> = (0..j2)
            .map(|_| rng.gen_range(-self.epsilon..self.epsilon))
            .collect();

        self.cost_history = Vec::with_capacity(self.epochs);
        let m_f = m as f32;

        for _ in 0..self.epochs {
            let mut delta1 = vec![vec![0.0; j1]; hidden];
            let mut delta2 = vec![0.0; j2];
            let mut sq_error_sum = 0.0;

            for i in 0..m {
                // Forward pass. The input bias is already the last design
                // column; the hidden bias is appended after activation.
                let a1: Vec<f32> = (0..j1).map(|j| a.get(i, j)).collect();
                let z2: Vec<f32> = theta1
                    .iter()
                    .map(|row| row.iter().zip(a1.iter()).map(|(w, x)| w * x).sum())
                    .collect();
                let mut a2: Vec<f32> = z2.iter().map(|z| z.tanh()).collect();
                a2.push(1.0);
                let z3: f32 = theta2.iter().zip(a2.iter()).map(|(w, x)| w * x).sum();

                // Backward pass.
                let error3 = z3 - y[i];
                sq_error_sum += error3 * error3;
                for (k, d) in delta2.iter_mut().enumerate() {
                    *d += error3 * a2[k];
                }
                for h in 0..hidden {
                    let tanh_z = z2[h].tanh();
                    let error2 = theta2[h] * error3 * (1.0 - tanh_z * tanh_z);
                    for (j, d) in delta1[h].iter_mut().enumerate() {
                        *d += error2 * a1[j];
                    }
                }
            }

            // Bias columns (last slot of each row) are not regularized.
            for (h, row) in theta1.iter_mut().enumerate() {
                for (j, w) in row.iter_mut().enumerate() {
                    let penalty = if j + 1 == j1 {
                        0.0
                    } else {
                        (self.regularization / m_f) * *w
                    };
                    *w -= self.learning_rate * (delta1[h][j] / m_f + penalty);
                }
            }
            for (k, w) in theta2.iter_mut().enumerate() {
                let penalty = if k + 1 == j2 {
                    0.0
                } else {
                    (self.regularization / m_f) * *w
                };
                *w -= self.learning_rate * (delta2[k] / m_f + penalty);
            }

            let theta1_sq: f32 = theta1.iter().flatten().map(|w| w * w).sum();
            let theta2_sq: f32 = theta2.iter().map(|w| w * w).sum();
            let cost = 0.5 * (sq_error_sum + self.regularization * (theta1_sq + theta2_sq));
            self.cost_history.push(cost);
        }

        // Lossy summary: average each input's weights across the hidden
        // layer to produce one scalar per design column.
        let b: Vec<f32> = (0..j1)
            .map(|j| theta1.iter().map(|row| row[j]).sum::<f32>() / hidden as f32)
            .collect();

        fit_statistics(&a, &y, Vector::from_vec(b))
    }
}
