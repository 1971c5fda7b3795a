//! Per-run configuration for the transformation stage.

use std::path::PathBuf;

/// Output locations for one transformation run.
///
/// The three paths must be distinct; parent directories are created on
/// write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTransformationConfig {
    /// Where to write the serialized fitted preprocessor.
    pub transformed_object_file_path: PathBuf,
    /// Where to write the transformed training array.
    pub transformed_train_file_path: PathBuf,
    /// Where to write the transformed test array.
    pub transformed_test_file_path: PathBuf,
}

impl DataTransformationConfig {
    /// Standard layout under an artifact directory:
    /// `<dir>/transformed_object/preprocessor.bin`,
    /// `<dir>/transformed/train.bin`, `<dir>/transformed/test.bin`.
    pub fn under_artifact_dir<P: Into<PathBuf>>(artifact_dir: P) -> Self {
        let dir = artifact_dir.into();
        Self {
            transformed_object_file_path: dir.join("transformed_object").join("preprocessor.bin"),
            transformed_train_file_path: dir.join("transformed").join("train.bin"),
            transformed_test_file_path: dir.join("transformed").join("test.bin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_artifact_dir_layout() {
        let config = DataTransformationConfig::under_artifact_dir("artifacts/run_1");

        assert!(config
            .transformed_object_file_path
            .ends_with("transformed_object/preprocessor.bin"));
        assert!(config
            .transformed_train_file_path
            .ends_with("transformed/train.bin"));
        assert!(config
            .transformed_test_file_path
            .ends_with("transformed/test.bin"));

        // The three outputs never collide.
        assert_ne!(
            config.transformed_train_file_path,
            config.transformed_test_file_path
        );
        assert_ne!(
            config.transformed_train_file_path,
            config.transformed_object_file_path
        );
    }
}
