//! K-means clustering with Lloyd's algorithm.
//!
//! Supports optional whitening, random or category-seeded
//! initialization, and reseeding of clusters that lose every assigned
//! row. Iteration stops when the summed squared mean shift drops below
//! the tolerance or the iteration cap is reached; either way the final
//! means are used for one last classification pass.

use crate::error::{AnalizarError, Result};
use crate::primitives::Matrix;
use crate::table::Table;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Rescales each feature by the inverse of its population standard
/// deviation so Euclidean distance is not dominated by high-variance
/// features. Zero-variance features are left unscaled.
#[must_use]
pub fn whiten(x: &Matrix<f32>) -> Matrix<f32> {
    let (n_rows, n_cols) = x.shape();
    let mut result = Matrix::zeros(n_rows, n_cols);
    for j in 0..n_cols {
        let std = x.column(j).std();
        let scale = if std > 1e-10 { 1.0 / std } else { 1.0 };
        for i in 0..n_rows {
            result.set(i, j, x.get(i, j) * scale);
        }
    }
    result
}

/// The outcome of a k-means run, immutable once returned.
///
/// Every code indexes a codebook row and every row carries its distance
/// to the assigned mean; no row is left unassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansResult {
    /// K × F matrix of cluster means.
    pub codebook: Matrix<f32>,
    /// Per-row cluster code in `[0, K)`.
    pub codes: Vec<usize>,
    /// Per-row Euclidean distance to the assigned mean.
    pub errors: Vec<f32>,
    /// Number of classify/update iterations run.
    pub n_iter: usize,
}

/// K-means configuration builder.
///
/// # Examples
///
/// ```
/// use analizar::cluster::KMeans;
/// use analizar::primitives::Matrix;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.1, 0.1, 0.2, 0.0,
///     10.0, 10.0, 10.1, 10.1, 10.0, 10.2,
/// ]).expect("6x2 matrix with 12 values");
///
/// let result = KMeans::new(2).with_random_state(42).fit(&data).expect("valid input");
/// assert_eq!(result.codes.len(), 6);
/// assert_eq!(result.codebook.shape(), (2, 2));
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters.
    k: usize,
    /// Whether to whiten features before clustering.
    whiten: bool,
    /// Maximum classify/update iterations.
    max_iter: usize,
    /// Convergence threshold on the summed squared mean shift.
    tol: f32,
    /// Random seed for initialization and reseeding.
    random_state: Option<u64>,
    /// Per-row category codes for seeded initialization.
    categories: Option<Vec<usize>>,
}

impl KMeans {
    /// Creates a configuration for `k` clusters with whitening enabled.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            whiten: true,
            max_iter: 100,
            tol: 1e-7,
            random_state: None,
            categories: None,
        }
    }

    /// Enables or disables whitening.
    #[must_use]
    pub fn with_whiten(mut self, whiten: bool) -> Self {
        self.whiten = whiten;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Seeds initialization from per-row category codes: each initial
    /// mean is the per-feature mean of one category. `k` must equal the
    /// number of distinct categories.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<usize>) -> Self {
        self.categories = Some(categories);
        self
    }

    fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Runs Lloyd's algorithm and returns the final means, codes, and
    /// per-row errors — whether or not the tolerance was reached before
    /// the iteration cap.
    ///
    /// # Errors
    ///
    /// Returns [`AnalizarError::InvalidSelection`] for empty data, more
    /// clusters than rows, or seeded initialization whose category count
    /// does not match `k`.
    pub fn fit(&self, x: &Matrix<f32>) -> Result<KMeansResult> {
        let n = x.n_rows();
        if n == 0 {
            return Err(AnalizarError::invalid_selection(
                "cannot cluster zero rows",
            ));
        }
        if self.k == 0 {
            return Err(AnalizarError::invalid_selection("k must be at least 1"));
        }
        if n < self.k {
            return Err(AnalizarError::invalid_selection(format!(
                "need at least k={} rows, got {n}",
                self.k
            )));
        }

        let data = if self.whiten { whiten(x) } else { x.clone() };
        let mut rng = self.rng();

        let mut means = match &self.categories {
            Some(categories) => self.seeded_means(&data, categories)?,
            None => self.random_means(&data, &mut rng),
        };

        let mut n_iter = 0;
        for _ in 0..self.max_iter {
            n_iter += 1;
            let (codes, _) = classify(&data, &means);
            let new_means = self.update_means(&data, &codes, &mut rng);

            let mut shift = 0.0;
            for i in 0..self.k {
                for j in 0..data.n_cols() {
                    let diff = means.get(i, j) - new_means.get(i, j);
                    shift += diff * diff;
                }
            }
            means = new_means;
            if shift < self.tol {
                break;
            }
        }

        let (codes, errors) = classify(&data, &means);
        Ok(KMeansResult {
            codebook: means,
            codes,
            errors,
            n_iter,
        })
    }

    /// Picks `k` distinct random rows as initial means.
    fn random_means(&self, data: &Matrix<f32>, rng: &mut StdRng) -> Matrix<f32> {
        let n = data.n_rows();
        let chosen = rand::seq::index::sample(rng, n, self.k);

        let mut mean_data = Vec::with_capacity(self.k * data.n_cols());
        for idx in chosen.iter() {
            for j in 0..data.n_cols() {
                mean_data.push(data.get(idx, j));
            }
        }
        Matrix::from_vec(self.k, data.n_cols(), mean_data)
            .expect("mean matrix dimensions match data length")
    }

    /// Computes each category's per-feature mean as its initial mean.
    fn seeded_means(&self, data: &Matrix<f32>, categories: &[usize]) -> Result<Matrix<f32>> {
        let n = data.n_rows();
        if categories.len() != n {
            return Err(AnalizarError::dimension_mismatch(
                "categories",
                n,
                categories.len(),
            ));
        }

        let mut distinct: Vec<usize> = categories.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != self.k {
            return Err(AnalizarError::invalid_selection(format!(
                "k={} must equal the number of distinct categories ({})",
                self.k,
                distinct.len()
            )));
        }
        if let Some(&max) = distinct.last() {
            if max >= self.k {
                return Err(AnalizarError::invalid_selection(format!(
                    "category code {max} out of range for k={}",
                    self.k
                )));
            }
        }

        let f = data.n_cols();
        let mut sums = vec![0.0; self.k * f];
        let mut counts = vec![0usize; self.k];
        for (i, &cat) in categories.iter().enumerate() {
            counts[cat] += 1;
            for j in 0..f {
                sums[cat * f + j] += data.get(i, j);
            }
        }
        for cat in 0..self.k {
            for j in 0..f {
                sums[cat * f + j] /= counts[cat] as f32;
            }
        }

        Matrix::from_vec(self.k, f, sums).map_err(Into::into)
    }

    /// Recomputes each cluster's mean; a cluster with no assigned rows is
    /// reseeded to a uniformly random data row rather than left undefined.
    fn update_means(&self, data: &Matrix<f32>, codes: &[usize], rng: &mut StdRng) -> Matrix<f32> {
        let f = data.n_cols();
        let mut sums = vec![0.0; self.k * f];
        let mut counts = vec![0usize; self.k];

        for (i, &code) in codes.iter().enumerate() {
            counts[code] += 1;
            for j in 0..f {
                sums[code * f + j] += data.get(i, j);
            }
        }

        for cluster in 0..self.k {
            if counts[cluster] > 0 {
                for j in 0..f {
                    sums[cluster * f + j] /= counts[cluster] as f32;
                }
            } else {
                let row = rng.gen_range(0..data.n_rows());
                for j in 0..f {
                    sums[cluster * f + j] = data.get(row, j);
                }
            }
        }

        Matrix::from_vec(self.k, f, sums).expect("mean matrix dimensions match data length")
    }
}

/// Assigns each row to its nearest mean (strict `<`, so ties go to the
/// lowest cluster index) and records the winning distance as the row's
/// error.
fn classify(data: &Matrix<f32>, means: &Matrix<f32>) -> (Vec<usize>, Vec<f32>) {
    let n = data.n_rows();
    let k = means.n_rows();
    let f = data.n_cols();

    let mut codes = vec![0; n];
    let mut errors = vec![0.0; n];

    for i in 0..n {
        let mut winner = f32::INFINITY;
        let mut code = 0;
        for cluster in 0..k {
            let mut dist_sq = 0.0;
            for j in 0..f {
                let diff = data.get(i, j) - means.get(cluster, j);
                dist_sq += diff * diff;
            }
            let dist = dist_sq.sqrt();
            if dist < winner {
                winner = dist;
                code = cluster;
            }
        }
        codes[i] = code;
        errors[i] = winner;
    }

    (codes, errors)
}

/// Clusters the named table columns with default options (whitening on).
///
/// # Errors
///
/// Returns an error for an unknown column or invalid clustering inputs.
pub fn kmeans(table: &Table, headers: &[&str], k: usize) -> Result<KMeansResult> {
    let data = table.numeric_data(headers, None)?;
    KMeans::new(k).fit(&data)
}
