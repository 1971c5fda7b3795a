//! The data transformation stage.
//!
//! Takes the validated train/test datasets, separates features from the
//! binary target label, canonicalizes the label encoding, imputes missing
//! feature values with a KNN imputer fit on the training features only,
//! and persists the combined numeric arrays plus the fitted preprocessor.
//!
//! The stage is synchronous and fail-fast: any error aborts the run with
//! no artifact; files already written before the failure are left in
//! place.

use ndarray::{s, Array1, Array2};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{FINAL_PREPROCESSOR_PATH, IMPUTER_N_NEIGHBORS, IMPUTER_WEIGHTS, TARGET_COLUMN};
use crate::data::{DataError, Table};
use crate::preprocessing::{FittedPreprocessor, FittedTransformer, KnnImputer, Preprocessor, Transformer};
use crate::serialization::{ensure_parent_dir, save_array};
use crate::stage::artifact::{DataTransformationArtifact, DataValidationArtifact};
use crate::stage::config::DataTransformationConfig;
use crate::stage::error::TransformationError;

/// Rewrite the `-1` sentinel ("negative/anomalous") to `0`, producing the
/// canonical `{0, 1}` encoding model training expects. All other values
/// pass through unchanged.
fn normalize_labels(labels: &mut Array1<f64>) {
    for v in labels.iter_mut() {
        if *v == -1.0 {
            *v = 0.0;
        }
    }
}

/// Append the label as the final column of the feature matrix.
fn append_label_column(features: &Array2<f64>, labels: &Array1<f64>) -> Array2<f64> {
    let (rows, cols) = features.dim();
    let mut combined = Array2::zeros((rows, cols + 1));
    combined.slice_mut(s![.., ..cols]).assign(features);
    combined.column_mut(cols).assign(labels);
    combined
}

/// Orchestrates the transformation stage end-to-end.
pub struct DataTransformation {
    validation_artifact: DataValidationArtifact,
    config: DataTransformationConfig,
    final_object_file_path: PathBuf,
}

impl DataTransformation {
    /// Create a stage runner for the given inputs and output locations.
    ///
    /// The fitted preprocessor is additionally written to the fixed
    /// [`FINAL_PREPROCESSOR_PATH`] slot.
    pub fn new(
        validation_artifact: DataValidationArtifact,
        config: DataTransformationConfig,
    ) -> Self {
        Self {
            validation_artifact,
            config,
            final_object_file_path: PathBuf::from(FINAL_PREPROCESSOR_PATH),
        }
    }

    /// Override the fixed final-preprocessor slot location.
    pub fn with_final_object_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.final_object_file_path = path.into();
        self
    }

    /// Build the preprocessor from the process-wide imputer parameters.
    ///
    /// Pure construction, no side effects; fitting happens in [`run`].
    ///
    /// [`run`]: DataTransformation::run
    pub fn build_preprocessor() -> Preprocessor {
        Preprocessor::new()
            .add_knn_imputer(KnnImputer::new(IMPUTER_N_NEIGHBORS).with_weights(IMPUTER_WEIGHTS))
    }

    fn read_table(path: &Path) -> Result<Table, TransformationError> {
        Table::read_csv(path).map_err(|source| TransformationError::DataLoad {
            path: path.to_path_buf(),
            source,
        })
    }

    fn split_features(
        table: &Table,
        path: &Path,
    ) -> Result<(Array2<f64>, Array1<f64>), TransformationError> {
        table.split_target(TARGET_COLUMN).map_err(|err| match err {
            DataError::ColumnNotFound(column) => TransformationError::Schema {
                column,
                path: path.to_path_buf(),
            },
            other => TransformationError::DataLoad {
                path: path.to_path_buf(),
                source: other,
            },
        })
    }

    fn save_object(
        &self,
        fitted: &FittedPreprocessor,
        path: &Path,
    ) -> Result<(), TransformationError> {
        ensure_parent_dir(path)
            .and_then(|_| fitted.save_to_file(path))
            .map_err(|source| TransformationError::Persistence {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Run the transformation stage.
    ///
    /// Loads both tables, splits off the target column, normalizes labels,
    /// fits the preprocessor on the training features only, transforms both
    /// feature matrices, appends labels, and persists the arrays and the
    /// fitted preprocessor (per-run path plus the fixed slot).
    ///
    /// # Errors
    /// Returns [`TransformationError`] on the first failure; already-written
    /// files are not rolled back.
    pub fn run(&self) -> Result<DataTransformationArtifact, TransformationError> {
        info!("Starting data transformation stage");

        let train_path = &self.validation_artifact.valid_train_file_path;
        let test_path = &self.validation_artifact.valid_test_file_path;

        let train_table = Self::read_table(train_path)?;
        let test_table = Self::read_table(test_path)?;
        debug!(
            train_rows = train_table.shape().0,
            test_rows = test_table.shape().0,
            "loaded validated tables"
        );

        let (train_features, mut train_labels) = Self::split_features(&train_table, train_path)?;
        let (test_features, mut test_labels) = Self::split_features(&test_table, test_path)?;

        normalize_labels(&mut train_labels);
        normalize_labels(&mut test_labels);

        // Fit on the training features only; the test features are
        // transformed with training-derived statistics.
        let preprocessor = Self::build_preprocessor();
        let fitted = preprocessor.fit(&train_features)?;
        info!(steps = ?fitted.step_names(), "fitted preprocessor on training features");

        let transformed_train = fitted.transform(&train_features)?;
        let transformed_test = fitted.transform(&test_features)?;

        let train_array = append_label_column(&transformed_train, &train_labels);
        let test_array = append_label_column(&transformed_test, &test_labels);

        save_array(&self.config.transformed_train_file_path, &train_array).map_err(|source| {
            TransformationError::Persistence {
                path: self.config.transformed_train_file_path.clone(),
                source,
            }
        })?;
        save_array(&self.config.transformed_test_file_path, &test_array).map_err(|source| {
            TransformationError::Persistence {
                path: self.config.transformed_test_file_path.clone(),
                source,
            }
        })?;

        self.save_object(&fitted, &self.config.transformed_object_file_path)?;
        self.save_object(&fitted, &self.final_object_file_path)?;

        info!(
            train_shape = ?train_array.dim(),
            test_shape = ?test_array.dim(),
            "data transformation stage complete"
        );

        Ok(DataTransformationArtifact {
            transformed_object_file_path: self.config.transformed_object_file_path.clone(),
            transformed_train_file_path: self.config.transformed_train_file_path.clone(),
            transformed_test_file_path: self.config.transformed_test_file_path.clone(),
        })
    }
}
