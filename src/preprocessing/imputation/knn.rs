//! K-nearest-neighbor imputer.
//!
//! Completes missing values (NaN) using the k most similar rows of the
//! fit-time data. Similarity is NaN-tolerant Euclidean distance: missing
//! coordinates are excluded from the computation and the remaining squared
//! differences are rescaled by `n_total / n_present`, so distances stay
//! comparable between rows with different missingness patterns.
//!
//! Fitting retains the training matrix as the donor set; it never looks at
//! data passed to `transform`. The same imputer fit on the same training
//! set imputes the same way for any future input.
//!
//! # Example
//! ```ignore
//! use netsec_pipeline::preprocessing::{KnnImputer, Transformer, FittedTransformer};
//!
//! let imputer = KnnImputer::new(3);
//! let fitted = imputer.fit(&train_features)?;
//! let imputed = fitted.transform(&test_features)?;
//! ```

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// How neighbor values are combined into an imputed value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightScheme {
    /// All k neighbors contribute equally.
    #[default]
    Uniform,
    /// Neighbors contribute with weight 1/distance. Zero-distance
    /// neighbors, when present, take all the weight.
    Distance,
}

/// Serializable parameters for a fitted [`KnnImputer`].
#[derive(Clone, Serialize, Deserialize)]
pub struct KnnImputerParams {
    /// Neighbor count.
    pub n_neighbors: usize,
    /// Weighting scheme.
    pub weights: WeightScheme,
    /// Donor matrix retained from fit, row-major.
    pub fit_data: Vec<f64>,
    /// Number of donor rows.
    pub n_rows: usize,
    /// Number of features seen during fit.
    pub n_features: usize,
    /// Per-column means of the observed fit values (fallback when a
    /// column has no usable donors).
    pub col_means: Vec<f64>,
}

/// KNN imputer (unfitted).
#[derive(Clone, Debug)]
pub struct KnnImputer {
    n_neighbors: usize,
    weights: WeightScheme,
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl KnnImputer {
    /// Create a new imputer using the `n_neighbors` nearest rows.
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            weights: WeightScheme::default(),
        }
    }

    /// Set the neighbor weighting scheme.
    pub fn with_weights(mut self, weights: WeightScheme) -> Self {
        self.weights = weights;
        self
    }
}

/// NaN-tolerant Euclidean distance between two rows.
///
/// Coordinates missing in either row are excluded; the accumulated squared
/// difference is rescaled by `n_total / n_present`. Returns NaN when the
/// rows share no observed coordinate.
fn nan_euclidean(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n_total = x.len();
    let mut n_present = 0usize;
    let mut acc = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        if a.is_nan() || b.is_nan() {
            continue;
        }
        let d = a - b;
        acc += d * d;
        n_present += 1;
    }
    if n_present == 0 {
        f64::NAN
    } else {
        (acc * n_total as f64 / n_present as f64).sqrt()
    }
}

/// Per-column mean of the observed (non-NaN) values; 0.0 for all-missing columns.
fn column_means(data: &Array2<f64>) -> Vec<f64> {
    let (_, cols) = data.dim();
    let mut means = vec![0.0; cols];
    for (col, mean) in means.iter_mut().enumerate().take(cols) {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &v in data.column(col) {
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
        if count > 0 {
            *mean = sum / count as f64;
        }
    }
    means
}

/// Combine the selected donors' values into one imputed value.
fn combine(donors: &[(f64, f64)], weights: WeightScheme) -> f64 {
    match weights {
        WeightScheme::Uniform => {
            donors.iter().map(|&(_, v)| v).sum::<f64>() / donors.len() as f64
        }
        WeightScheme::Distance => {
            let zero_dist: Vec<f64> = donors
                .iter()
                .filter(|&&(d, _)| d == 0.0)
                .map(|&(_, v)| v)
                .collect();
            if !zero_dist.is_empty() {
                return zero_dist.iter().sum::<f64>() / zero_dist.len() as f64;
            }
            let total_weight: f64 = donors.iter().map(|&(d, _)| 1.0 / d).sum();
            donors.iter().map(|&(d, v)| v / d).sum::<f64>() / total_weight
        }
    }
}

impl Transformer for KnnImputer {
    type Params = KnnImputerParams;
    type Fitted = FittedKnnImputer;

    fn fit(&self, data: &Array2<f64>) -> Result<Self::Fitted, PreprocessingError> {
        if self.n_neighbors == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "n_neighbors must be >= 1".to_string(),
            ));
        }

        let (rows, _) = data.dim();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit KnnImputer on empty data".to_string(),
            ));
        }

        let col_means = column_means(data);

        Ok(FittedKnnImputer {
            n_neighbors: self.n_neighbors,
            weights: self.weights,
            fit_data: data.clone(),
            col_means,
        })
    }
}

/// Fitted KNN imputer ready for inference.
#[derive(Clone)]
pub struct FittedKnnImputer {
    n_neighbors: usize,
    weights: WeightScheme,
    fit_data: Array2<f64>,
    col_means: Vec<f64>,
}

impl FittedKnnImputer {
    /// The donor matrix retained from fit.
    pub fn fit_data(&self) -> &Array2<f64> {
        &self.fit_data
    }

    /// Per-column means of the observed fit values.
    pub fn col_means(&self) -> &[f64] {
        &self.col_means
    }

    /// Impute one missing cell given the receiver's distances to every donor row.
    ///
    /// Donors must observe the target column and share at least one
    /// coordinate with the receiver. Ties on distance break by donor index,
    /// which keeps imputation deterministic for a fixed fit set.
    fn impute_cell(&self, distances: &[f64], col: usize) -> f64 {
        let mut candidates: Vec<(f64, usize)> = distances
            .iter()
            .enumerate()
            .filter(|&(j, &d)| !d.is_nan() && !self.fit_data[[j, col]].is_nan())
            .map(|(j, &d)| (d, j))
            .collect();

        if candidates.is_empty() {
            return self.col_means[col];
        }

        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        candidates.truncate(self.n_neighbors);

        let donors: Vec<(f64, f64)> = candidates
            .iter()
            .map(|&(d, j)| (d, self.fit_data[[j, col]]))
            .collect();
        combine(&donors, self.weights)
    }
}

impl FittedTransformer for FittedKnnImputer {
    type Params = KnnImputerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        let (rows, cols) = data.dim();
        let n_features = self.n_features_in();

        if cols != n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: n_features,
                got_features: cols,
            });
        }

        let mut result = data.clone();

        for i in 0..rows {
            let row = data.row(i);
            let missing: Vec<usize> = (0..cols).filter(|&c| row[c].is_nan()).collect();
            if missing.is_empty() {
                continue;
            }

            // One distance pass per receiver row, reused for every missing column.
            let distances: Vec<f64> = self
                .fit_data
                .rows()
                .into_iter()
                .map(|donor| nan_euclidean(row, donor))
                .collect();

            for &c in &missing {
                result[[i, c]] = self.impute_cell(&distances, c);
            }
        }

        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        let (n_rows, n_features) = self.fit_data.dim();
        KnnImputerParams {
            n_neighbors: self.n_neighbors,
            weights: self.weights,
            fit_data: self.fit_data.iter().copied().collect(),
            n_rows,
            n_features,
            col_means: self.col_means.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let fit_data =
            Array2::from_shape_vec((params.n_rows, params.n_features), params.fit_data).map_err(
                |e| PreprocessingError::SerializationError(format!("bad donor matrix shape: {}", e)),
            )?;

        Ok(Self {
            n_neighbors: params.n_neighbors,
            weights: params.weights,
            fit_data,
            col_means: params.col_means,
        })
    }

    fn n_features_in(&self) -> usize {
        self.fit_data.dim().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data_with_missing() -> Array2<f64> {
        // Row 1 is missing its second feature.
        array![
            [1.0, 2.0],
            [1.0, f64::NAN],
            [3.0, 4.0],
            [5.0, 6.0],
            [1.1, 2.1],
        ]
    }

    #[test]
    fn test_knn_imputer_fills_from_nearest_rows() {
        let data = create_test_data_with_missing();
        let imputer = KnnImputer::new(2);
        let fitted = imputer.fit(&data).unwrap();
        let imputed = fitted.transform(&data).unwrap();

        // Nearest donors to [1, NaN] by the first coordinate are
        // [1, 2] (d=0) and [1.1, 2.1] (d~0.14): uniform mean = 2.05.
        assert!((imputed[[1, 1]] - 2.05).abs() < 1e-9);

        // Observed values pass through untouched.
        assert_eq!(imputed[[0, 0]], 1.0);
        assert_eq!(imputed[[2, 1]], 4.0);
    }

    #[test]
    fn test_knn_imputer_no_missing_is_identity() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let fitted = KnnImputer::new(1).fit(&data).unwrap();
        let imputed = fitted.transform(&data).unwrap();
        assert_eq!(imputed, data);
    }

    #[test]
    fn test_knn_imputer_eliminates_all_missing() {
        let data = create_test_data_with_missing();
        let fitted = KnnImputer::new(3).fit(&data).unwrap();
        let imputed = fitted.transform(&data).unwrap();
        assert!(imputed.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_knn_imputer_distance_weights() {
        let data = array![[0.0, 10.0], [2.0, 20.0], [1.0, f64::NAN]];
        let fitted = KnnImputer::new(2)
            .with_weights(WeightScheme::Distance)
            .fit(&data)
            .unwrap();
        let imputed = fitted.transform(&data).unwrap();

        // Both donors are equidistant from [1, NaN], so inverse-distance
        // weighting degenerates to the plain mean.
        assert!((imputed[[2, 1]] - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_knn_imputer_zero_distance_donor_takes_all_weight() {
        let data = array![[1.0, 10.0], [5.0, 20.0], [1.0, f64::NAN]];
        let fitted = KnnImputer::new(2)
            .with_weights(WeightScheme::Distance)
            .fit(&data)
            .unwrap();
        let imputed = fitted.transform(&data).unwrap();

        // [1, 10] matches the receiver exactly on the observed coordinate.
        assert!((imputed[[2, 1]] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_knn_imputer_column_mean_fallback() {
        // No donor observes both coordinates, so nothing can be ranked for
        // the second column of row 1; fall back to the fit-time column mean.
        let data = array![[1.0, f64::NAN], [f64::NAN, 4.0], [f64::NAN, 6.0]];
        let fitted = KnnImputer::new(2).fit(&data).unwrap();
        let imputed = fitted.transform(&data).unwrap();

        assert!((imputed[[0, 1]] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_knn_imputer_fewer_donors_than_k() {
        let data = array![[1.0, 2.0], [1.5, f64::NAN]];
        let fitted = KnnImputer::new(10).fit(&data).unwrap();
        let imputed = fitted.transform(&data).unwrap();

        // Only one usable donor; uses it alone rather than failing.
        assert!((imputed[[1, 1]] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_knn_imputer_rejects_zero_neighbors() {
        let data = create_test_data_with_missing();
        let result = KnnImputer::new(0).fit(&data);
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_knn_imputer_rejects_empty_data() {
        let data = Array2::<f64>::zeros((0, 2));
        let result = KnnImputer::new(3).fit(&data);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_knn_imputer_feature_mismatch() {
        let data = create_test_data_with_missing(); // 2 features
        let fitted = KnnImputer::new(2).fit(&data).unwrap();

        let wrong_data = array![[1.0, 2.0, 3.0]]; // 3 features
        let result = fitted.transform(&wrong_data);

        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_knn_imputer_fit_unaffected_by_transform() {
        let train = create_test_data_with_missing();
        let fitted = KnnImputer::new(2).fit(&train).unwrap();
        let params_before = fitted.extract_params();

        let test = array![[100.0, f64::NAN], [f64::NAN, -50.0]];
        fitted.transform(&test).unwrap();

        let params_after = fitted.extract_params();
        assert_eq!(params_before.fit_data, params_after.fit_data);
        assert_eq!(params_before.col_means, params_after.col_means);
    }

    #[test]
    fn test_knn_imputer_deterministic() {
        let data = create_test_data_with_missing();
        let fitted = KnnImputer::new(2).fit(&data).unwrap();

        let a = fitted.transform(&data).unwrap();
        let b = fitted.transform(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_knn_imputer_params_round_trip() {
        let data = create_test_data_with_missing();
        let fitted = KnnImputer::new(2).fit(&data).unwrap();

        let params = fitted.extract_params();
        let restored = FittedKnnImputer::from_params(params).unwrap();

        let a = fitted.transform(&data).unwrap();
        let b = restored.transform(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_knn_imputer_save_load_file() {
        let data = create_test_data_with_missing();
        let fitted = KnnImputer::new(2).fit(&data).unwrap();

        let temp_file = std::env::temp_dir().join("test_knn_imputer.bin");
        fitted.save_to_file(&temp_file).unwrap();

        let loaded = FittedKnnImputer::load_from_file(&temp_file).unwrap();
        assert_eq!(loaded.n_features_in(), fitted.n_features_in());

        let a = fitted.transform(&data).unwrap();
        let b = loaded.transform(&data).unwrap();
        assert_eq!(a, b);

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_nan_euclidean_rescales_for_missing_coords() {
        let x = array![1.0, f64::NAN, 3.0];
        let y = array![2.0, 5.0, 3.0];
        // One of three coordinates is excluded: sqrt(3/2 * 1) .
        let d = nan_euclidean(x.view(), y.view());
        assert!((d - (1.5f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_nan_euclidean_disjoint_support_is_nan() {
        let x = array![1.0, f64::NAN];
        let y = array![f64::NAN, 2.0];
        assert!(nan_euclidean(x.view(), y.view()).is_nan());
    }
}
