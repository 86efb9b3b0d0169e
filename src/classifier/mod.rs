//! Supervised classifiers: Gaussian Naive Bayes and K-Nearest-Neighbors.
//!
//! Both expose the same capability surface through the [`Classifier`]
//! trait: build once from labeled training data, then classify any
//! number of query matrices against the immutable model. Original label
//! values are preserved through an index→label map so callers get both
//! zero-based codes and their own labels back.

use crate::cluster::KMeans;
use crate::error::{AnalizarError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Codes and original labels produced by a classify call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Zero-based class index per query row, in `[0, C)`.
    pub codes: Vec<usize>,
    /// Original label value per query row.
    pub labels: Vec<f32>,
}

/// Capability interface shared by the classifiers.
pub trait Classifier {
    /// Builds the model from a training matrix and one label per row.
    ///
    /// # Errors
    ///
    /// Returns an error on inconsistent inputs or a degenerate model;
    /// a failed build never leaves a half-built model behind.
    fn build(&mut self, x: &Matrix<f32>, categories: &[f32]) -> Result<()>;

    /// Classifies each query row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unbuilt or the query feature
    /// count does not match the trained feature count.
    fn classify(&self, x: &Matrix<f32>) -> Result<Classification>;
}

/// Sorted distinct labels with a zero-based index for each.
fn distinct_labels(categories: &[f32]) -> Vec<f32> {
    let mut labels = categories.to_vec();
    labels.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    labels.dedup();
    labels
}

/// Maps each row's label to its class index.
fn label_codes(categories: &[f32], labels: &[f32]) -> Vec<usize> {
    categories
        .iter()
        .map(|c| {
            labels
                .iter()
                .position(|l| l == c)
                .expect("label taken from the same sequence")
        })
        .collect()
}

/// Gaussian Naive Bayes classifier.
///
/// Stores per-class mean, population variance, and the Gaussian
/// normalization scale `1/√(2π·variance)` for every feature. A
/// zero-variance class/feature pair makes the likelihood undefined and
/// fails the build with [`AnalizarError::DegenerateModel`].
///
/// # Examples
///
/// ```
/// use analizar::classifier::{Classifier, NaiveBayes};
/// use analizar::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 0.2, 10.0, 10.2]).expect("4x1 matrix");
/// let categories = vec![1.0, 1.0, 2.0, 2.0];
///
/// let mut model = NaiveBayes::new();
/// model.build(&x, &categories).expect("non-degenerate training data");
///
/// let result = model.classify(&x).expect("model is built");
/// assert_eq!(result.labels, categories);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaiveBayes {
    /// C × F feature means per class.
    class_means: Option<Matrix<f32>>,
    /// C × F population variances per class.
    class_vars: Option<Matrix<f32>>,
    /// C × F Gaussian normalization scales per class.
    class_scales: Option<Matrix<f32>>,
    /// Class index → original label value.
    class_labels: Option<Vec<f32>>,
}

impl NaiveBayes {
    /// Creates an unbuilt classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the model has been built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.class_means.is_some()
    }

    /// The index→label map, available after build.
    #[must_use]
    pub fn class_labels(&self) -> Option<&[f32]> {
        self.class_labels.as_deref()
    }

    /// Classifies each row and also returns the full N×C likelihood
    /// matrix.
    ///
    /// # Errors
    ///
    /// Same contract as [`Classifier::classify`].
    pub fn classify_with_likelihoods(
        &self,
        x: &Matrix<f32>,
    ) -> Result<(Classification, Matrix<f32>)> {
        let means = self
            .class_means
            .as_ref()
            .ok_or_else(|| AnalizarError::from("model not built"))?;
        let vars = self.class_vars.as_ref().expect("built with means");
        let scales = self.class_scales.as_ref().expect("built with means");
        let labels = self.class_labels.as_ref().expect("built with means");

        let (n_samples, n_features) = x.shape();
        let (n_classes, model_features) = means.shape();
        if n_features != model_features {
            return Err(AnalizarError::dimension_mismatch(
                "features",
                model_features,
                n_features,
            ));
        }

        let mut likelihoods = Matrix::zeros(n_samples, n_classes);
        let mut codes = Vec::with_capacity(n_samples);

        for i in 0..n_samples {
            let mut best = f32::NEG_INFINITY;
            let mut best_class = 0;
            for c in 0..n_classes {
                let mut p = 1.0;
                for j in 0..n_features {
                    let diff = x.get(i, j) - means.get(c, j);
                    p *= scales.get(c, j) * (-(diff * diff) / (2.0 * vars.get(c, j))).exp();
                }
                likelihoods.set(i, c, p);
                // Strict > keeps the lowest class index on ties.
                if p > best {
                    best = p;
                    best_class = c;
                }
            }
            codes.push(best_class);
        }

        let out_labels = codes.iter().map(|&c| labels[c]).collect();
        Ok((
            Classification {
                codes,
                labels: out_labels,
            },
            likelihoods,
        ))
    }
}

impl Classifier for NaiveBayes {
    fn build(&mut self, x: &Matrix<f32>, categories: &[f32]) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(AnalizarError::invalid_selection(
                "cannot build from zero rows",
            ));
        }
        if categories.len() != n_samples {
            return Err(AnalizarError::dimension_mismatch(
                "categories",
                n_samples,
                categories.len(),
            ));
        }

        let labels = distinct_labels(categories);
        if labels.len() < 2 {
            return Err(AnalizarError::invalid_selection(
                "need at least 2 classes",
            ));
        }
        let codes = label_codes(categories, &labels);
        let n_classes = labels.len();

        let mut means = Matrix::zeros(n_classes, n_features);
        let mut vars = Matrix::zeros(n_classes, n_features);
        let mut scales = Matrix::zeros(n_classes, n_features);

        for c in 0..n_classes {
            let members: Vec<usize> = codes
                .iter()
                .enumerate()
                .filter_map(|(i, &code)| if code == c { Some(i) } else { None })
                .collect();
            let count = members.len() as f32;

            for j in 0..n_features {
                let sum: f32 = members.iter().map(|&i| x.get(i, j)).sum();
                let mean = sum / count;
                let sum_sq: f32 = members
                    .iter()
                    .map(|&i| {
                        let diff = x.get(i, j) - mean;
                        diff * diff
                    })
                    .sum();
                let variance = sum_sq / count;

                if variance == 0.0 {
                    return Err(AnalizarError::DegenerateModel {
                        class: c,
                        feature: j,
                    });
                }

                means.set(c, j, mean);
                vars.set(c, j, variance);
                scales.set(c, j, 1.0 / (2.0 * PI * variance).sqrt());
            }
        }

        self.class_means = Some(means);
        self.class_vars = Some(vars);
        self.class_scales = Some(scales);
        self.class_labels = Some(labels);
        Ok(())
    }

    fn classify(&self, x: &Matrix<f32>) -> Result<Classification> {
        let (classification, _) = self.classify_with_likelihoods(x)?;
        Ok(classification)
    }
}

/// K-Nearest-Neighbors classifier over per-class exemplar sets.
///
/// By default every training row of a class is kept as an exemplar;
/// [`Knn::with_codebook_size`] compresses each class to a fixed-size
/// k-means codebook instead, trading exemplar fidelity for classify-time
/// cost. The query-time `k` (default 3) is independent of the build-time
/// codebook size.
///
/// # Examples
///
/// ```
/// use analizar::classifier::{Classifier, Knn};
/// use analizar::primitives::Matrix;
///
/// let x = Matrix::from_vec(6, 2, vec![
///     0.0, 0.0, 0.2, 0.1, 0.1, 0.3,
///     9.8, 10.0, 10.0, 10.2, 10.1, 9.9,
/// ]).expect("6x2 matrix");
/// let categories = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
///
/// let mut model = Knn::new();
/// model.build(&x, &categories).expect("valid training data");
///
/// let query = Matrix::from_vec(1, 2, vec![9.5, 9.5]).expect("1x2 matrix");
/// let result = model.classify(&query).expect("model is built");
/// assert_eq!(result.labels, vec![1.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Knn {
    /// Optional per-class codebook size for k-means compression.
    codebook_size: Option<usize>,
    /// Seed for the compression clustering.
    random_state: Option<u64>,
    /// Exemplar matrix per class index.
    exemplars: Option<Vec<Matrix<f32>>>,
    /// Class index → original label value.
    class_labels: Option<Vec<f32>>,
}

impl Knn {
    /// Creates an unbuilt classifier that keeps raw rows as exemplars.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compresses each class to an `n`-row k-means codebook at build
    /// time.
    #[must_use]
    pub fn with_codebook_size(mut self, n: usize) -> Self {
        self.codebook_size = Some(n);
        self
    }

    /// Sets the random seed used by codebook compression.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns true once the model has been built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.exemplars.is_some()
    }

    /// The index→label map, available after build.
    #[must_use]
    pub fn class_labels(&self) -> Option<&[f32]> {
        self.class_labels.as_deref()
    }

    /// Classifies each row using the `k` nearest exemplars per class.
    ///
    /// Each class's score is the sum of its `k` smallest exemplar
    /// distances; the class with the minimum aggregate score wins, ties
    /// going to the lowest class index.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unbuilt or the feature counts
    /// differ.
    pub fn classify_with_k(&self, x: &Matrix<f32>, k: usize) -> Result<Classification> {
        let (classification, _) = self.classify_with_distances(x, k)?;
        Ok(classification)
    }

    /// Like [`Knn::classify_with_k`], also returning the N×C
    /// aggregate-distance matrix.
    ///
    /// # Errors
    ///
    /// Same contract as [`Knn::classify_with_k`].
    pub fn classify_with_distances(
        &self,
        x: &Matrix<f32>,
        k: usize,
    ) -> Result<(Classification, Matrix<f32>)> {
        let exemplars = self
            .exemplars
            .as_ref()
            .ok_or_else(|| AnalizarError::from("model not built"))?;
        let labels = self.class_labels.as_ref().expect("built with exemplars");

        let (n_samples, n_features) = x.shape();
        let model_features = exemplars[0].n_cols();
        if n_features != model_features {
            return Err(AnalizarError::dimension_mismatch(
                "features",
                model_features,
                n_features,
            ));
        }
        if k == 0 {
            return Err(AnalizarError::invalid_selection("k must be at least 1"));
        }

        let n_classes = exemplars.len();
        let mut scores = Matrix::zeros(n_samples, n_classes);
        let mut codes = Vec::with_capacity(n_samples);

        for i in 0..n_samples {
            let mut best = f32::INFINITY;
            let mut best_class = 0;

            for (c, class_exemplars) in exemplars.iter().enumerate() {
                let mut distances: Vec<f32> = (0..class_exemplars.n_rows())
                    .map(|e| {
                        let mut dist_sq = 0.0;
                        for j in 0..n_features {
                            let diff = x.get(i, j) - class_exemplars.get(e, j);
                            dist_sq += diff * diff;
                        }
                        dist_sq.sqrt()
                    })
                    .collect();
                distances
                    .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                let take = k.min(distances.len());
                let score: f32 = distances[..take].iter().sum();
                scores.set(i, c, score);

                // Strict < keeps the lowest class index on ties.
                if score < best {
                    best = score;
                    best_class = c;
                }
            }
            codes.push(best_class);
        }

        let out_labels = codes.iter().map(|&c| labels[c]).collect();
        Ok((
            Classification {
                codes,
                labels: out_labels,
            },
            scores,
        ))
    }
}

impl Classifier for Knn {
    fn build(&mut self, x: &Matrix<f32>, categories: &[f32]) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(AnalizarError::invalid_selection(
                "cannot build from zero rows",
            ));
        }
        if categories.len() != n_samples {
            return Err(AnalizarError::dimension_mismatch(
                "categories",
                n_samples,
                categories.len(),
            ));
        }

        let labels = distinct_labels(categories);
        if labels.len() < 2 {
            return Err(AnalizarError::invalid_selection(
                "need at least 2 classes",
            ));
        }
        let codes = label_codes(categories, &labels);

        let mut exemplars = Vec::with_capacity(labels.len());
        for c in 0..labels.len() {
            let members: Vec<usize> = codes
                .iter()
                .enumerate()
                .filter_map(|(i, &code)| if code == c { Some(i) } else { None })
                .collect();

            let mut data = Vec::with_capacity(members.len() * n_features);
            for &i in &members {
                for j in 0..n_features {
                    data.push(x.get(i, j));
                }
            }
            let class_rows = Matrix::from_vec(members.len(), n_features, data)
                .expect("class matrix dimensions match data length");

            match self.codebook_size {
                None => exemplars.push(class_rows),
                Some(size) => {
                    // A class too small for its codebook is the
                    // degenerate-compression condition.
                    if members.len() < size {
                        return Err(AnalizarError::SingularSystem { det: 0.0 });
                    }
                    let mut clustering = KMeans::new(size).with_whiten(false);
                    if let Some(seed) = self.random_state {
                        clustering = clustering.with_random_state(seed);
                    }
                    let result = clustering.fit(&class_rows)?;
                    exemplars.push(result.codebook);
                }
            }
        }

        self.exemplars = Some(exemplars);
        self.class_labels = Some(labels);
        Ok(())
    }

    fn classify(&self, x: &Matrix<f32>) -> Result<Classification> {
        self.classify_with_k(x, 3)
    }
}
