//! Error taxonomy for the transformation stage.
//!
//! Every failure inside the stage is translated into a
//! [`TransformationError`] at the stage boundary, carrying the originating
//! path or operation and the underlying cause. The stage is fail-fast: no
//! local recovery, no retry, nothing swallowed.

use std::fmt;
use std::path::PathBuf;

use crate::data::DataError;
use crate::preprocessing::PreprocessingError;

/// Error type for the data transformation stage.
#[derive(Debug)]
pub enum TransformationError {
    /// Input path unreadable or not parseable as tabular data.
    DataLoad { path: PathBuf, source: DataError },
    /// Expected target column missing from a loaded table.
    Schema { column: String, path: PathBuf },
    /// Malformed imputer hyperparameters or an unfittable configuration.
    Configuration(PreprocessingError),
    /// Failure writing an output array or object.
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for TransformationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformationError::DataLoad { path, source } => {
                write!(f, "Failed to load table from {}: {}", path.display(), source)
            }
            TransformationError::Schema { column, path } => {
                write!(
                    f,
                    "Target column '{}' missing from {}",
                    column,
                    path.display()
                )
            }
            TransformationError::Configuration(source) => {
                write!(f, "Preprocessor configuration error: {}", source)
            }
            TransformationError::Persistence { path, source } => {
                write!(f, "Failed to persist {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TransformationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformationError::DataLoad { source, .. } => Some(source),
            TransformationError::Schema { .. } => None,
            TransformationError::Configuration(source) => Some(source),
            TransformationError::Persistence { source, .. } => Some(source),
        }
    }
}

impl From<PreprocessingError> for TransformationError {
    fn from(err: PreprocessingError) -> Self {
        TransformationError::Configuration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_data_load() {
        let err = TransformationError::DataLoad {
            path: PathBuf::from("/data/train.csv"),
            source: DataError::ColumnNotFound("x".to_string()),
        };
        assert!(err.to_string().contains("/data/train.csv"));
    }

    #[test]
    fn test_display_schema_names_column_and_file() {
        let err = TransformationError::Schema {
            column: "Result".to_string(),
            path: PathBuf::from("/data/test.csv"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Result"));
        assert!(msg.contains("/data/test.csv"));
    }

    #[test]
    fn test_source_preserved() {
        let err = TransformationError::Persistence {
            path: PathBuf::from("/out/train.bin"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_preprocessing_error() {
        let err: TransformationError =
            PreprocessingError::InvalidParameter("n_neighbors must be >= 1".to_string()).into();
        assert!(matches!(err, TransformationError::Configuration(_)));
    }
}
