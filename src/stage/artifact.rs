//! Artifact records passed between pipeline stages.
//!
//! An artifact is a pointer set, not a data payload: it records where a
//! stage wrote its outputs so the next stage can find them.

use std::path::PathBuf;

/// Output of the data validation stage, input to transformation.
///
/// Both paths reference readable tabular data with a consistent column
/// schema including the target column; the validation stage guarantees
/// this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataValidationArtifact {
    /// Path to the validated training dataset.
    pub valid_train_file_path: PathBuf,
    /// Path to the validated test dataset.
    pub valid_test_file_path: PathBuf,
}

/// Output of the data transformation stage.
///
/// Created exactly once per successful run; references the per-run output
/// paths (not the fixed final-preprocessor slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTransformationArtifact {
    /// Path to the serialized fitted preprocessor.
    pub transformed_object_file_path: PathBuf,
    /// Path to the transformed training array.
    pub transformed_train_file_path: PathBuf,
    /// Path to the transformed test array.
    pub transformed_test_file_path: PathBuf,
}
