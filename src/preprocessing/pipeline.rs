//! Preprocessor pipeline for chaining transformers.
//!
//! The transformation stage always goes through a [`Preprocessor`] rather
//! than calling the imputer directly, so additional preprocessing steps can
//! be inserted later without changing the stage's contract. Today the only
//! step kind is the KNN imputer.
//!
//! # Example
//! ```ignore
//! use netsec_pipeline::preprocessing::{KnnImputer, Preprocessor, Transformer};
//!
//! let preprocessor = Preprocessor::new().add_knn_imputer(KnnImputer::new(3));
//! let fitted = preprocessor.fit(&train_features)?;
//! let transformed = fitted.transform(&test_features)?;
//! ```

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{FittedKnnImputer, KnnImputer, KnnImputerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};

/// A step in the unfitted preprocessor.
#[derive(Clone)]
pub enum UnfittedStep {
    /// KNN imputation step.
    KnnImputer(KnnImputer),
}

impl UnfittedStep {
    fn fit(&self, data: &Array2<f64>) -> Result<FittedStep, PreprocessingError> {
        match self {
            UnfittedStep::KnnImputer(t) => t.fit(data).map(FittedStep::KnnImputer),
        }
    }
}

/// A fitted step in the preprocessor.
#[derive(Clone)]
pub enum FittedStep {
    /// Fitted KNN imputation step.
    KnnImputer(FittedKnnImputer),
}

impl FittedStep {
    fn transform_step(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        match self {
            FittedStep::KnnImputer(t) => t.transform(data),
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            FittedStep::KnnImputer(_) => "KnnImputer",
        }
    }
}

/// Serializable summary of a fitted preprocessor.
#[derive(Clone, Serialize, Deserialize)]
pub struct PreprocessorParams {
    /// Number of steps.
    pub n_steps: usize,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// Preprocessor pipeline (unfitted).
#[derive(Clone, Default)]
pub struct Preprocessor {
    steps: Vec<UnfittedStep>,
}

impl Preprocessor {
    /// Create a new empty preprocessor.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a KNN imputer step.
    pub fn add_knn_imputer(mut self, imputer: KnnImputer) -> Self {
        self.steps.push(UnfittedStep::KnnImputer(imputer));
        self
    }

    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the preprocessor has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transformer for Preprocessor {
    type Params = PreprocessorParams;
    type Fitted = FittedPreprocessor;

    fn fit(&self, data: &Array2<f64>) -> Result<Self::Fitted, PreprocessingError> {
        if self.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit an empty preprocessor".to_string(),
            ));
        }

        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit preprocessor on empty data".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut current = data.clone();

        for step in &self.steps {
            let fitted = step.fit(&current)?;
            current = fitted.transform_step(&current)?;
            fitted_steps.push(fitted);
        }

        Ok(FittedPreprocessor {
            steps: fitted_steps,
            n_features: cols,
        })
    }
}

/// Fitted preprocessor ready for inference.
#[derive(Clone)]
pub struct FittedPreprocessor {
    steps: Vec<FittedStep>,
    n_features: usize,
}

impl FittedPreprocessor {
    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the preprocessor has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the names of all steps.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}

impl FittedTransformer for FittedPreprocessor {
    type Params = PreprocessorParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        let (_, cols) = data.dim();

        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }

        let mut result = data.clone();
        for step in &self.steps {
            result = step.transform_step(&result)?;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        PreprocessorParams {
            n_steps: self.steps.len(),
            n_features: self.n_features,
        }
    }

    fn from_params(_params: Self::Params) -> Result<Self, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "Preprocessor does not support from_params - use save_to_file/load_from_file instead"
                .to_string(),
        ))
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        // Name-tagged step params, so new step kinds stay loadable.
        let mut step_params = Vec::new();
        for step in &self.steps {
            let (name, bytes) = match step {
                FittedStep::KnnImputer(t) => (
                    "KnnImputer",
                    bincode::serialize(&t.extract_params()).map_err(std::io::Error::other)?,
                ),
            };
            step_params.push((name.to_string(), bytes));
        }

        let serialized =
            bincode::serialize(&(self.n_features, step_params)).map_err(std::io::Error::other)?;
        std::fs::write(path, serialized)
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let (n_features, step_params): (usize, Vec<(String, Vec<u8>)>) =
            bincode::deserialize(&bytes)
                .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;

        let mut steps = Vec::new();
        for (name, step_bytes) in step_params {
            let step = match name.as_str() {
                "KnnImputer" => {
                    let params: KnnImputerParams = bincode::deserialize(&step_bytes)
                        .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
                    FittedStep::KnnImputer(FittedKnnImputer::from_params(params)?)
                }
                _ => {
                    return Err(PreprocessingError::SerializationError(format!(
                        "Unknown step type: {}",
                        name
                    )))
                }
            };
            steps.push(step);
        }

        Ok(Self { steps, n_features })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[1.0, 2.0], [1.0, f64::NAN], [3.0, 4.0], [1.2, 2.2]]
    }

    #[test]
    fn test_preprocessor_single_step() {
        let data = create_test_data();
        let preprocessor = Preprocessor::new().add_knn_imputer(KnnImputer::new(2));

        let fitted = preprocessor.fit(&data).unwrap();
        let transformed = fitted.transform(&data).unwrap();

        assert_eq!(transformed.dim(), data.dim());
        assert!(transformed.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_preprocessor_empty_rejected() {
        let preprocessor = Preprocessor::new();
        let data = create_test_data();

        let result = preprocessor.fit(&data);
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_preprocessor_empty_data_rejected() {
        let preprocessor = Preprocessor::new().add_knn_imputer(KnnImputer::new(2));
        let data = Array2::<f64>::zeros((0, 2));

        let result = preprocessor.fit(&data);
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_preprocessor_feature_mismatch() {
        let data = create_test_data(); // 2 features
        let preprocessor = Preprocessor::new().add_knn_imputer(KnnImputer::new(2));
        let fitted = preprocessor.fit(&data).unwrap();

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
    fn test_preprocessor_step_names() {
        let data = create_test_data();
        let preprocessor = Preprocessor::new().add_knn_imputer(KnnImputer::new(2));
        let fitted = preprocessor.fit(&data).unwrap();

        assert_eq!(fitted.step_names(), vec!["KnnImputer"]);
    }

    #[test]
    fn test_preprocessor_serialization() {
        let data = create_test_data();
        let preprocessor = Preprocessor::new().add_knn_imputer(KnnImputer::new(2));
        let fitted = preprocessor.fit(&data).unwrap();

        let temp_file = std::env::temp_dir().join("test_preprocessor.bin");
        fitted.save_to_file(&temp_file).unwrap();

        let loaded = FittedPreprocessor::load_from_file(&temp_file).unwrap();
        assert_eq!(loaded.n_features_in(), 2);
        assert_eq!(loaded.step_names(), vec!["KnnImputer"]);

        let a = fitted.transform(&data).unwrap();
        let b = loaded.transform(&data).unwrap();
        assert_eq!(a, b);

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_preprocessor_from_params_unsupported() {
        let params = PreprocessorParams {
            n_steps: 1,
            n_features: 2,
        };
        let result = FittedPreprocessor::from_params(params);
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }
}
