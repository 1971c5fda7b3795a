//! Pipeline stage orchestration: configuration, artifacts, and the
//! transformation runner.

pub mod artifact;
pub mod config;
pub mod error;
pub mod transformation;

pub use artifact::{DataTransformationArtifact, DataValidationArtifact};
pub use config::DataTransformationConfig;
pub use error::TransformationError;
pub use transformation::DataTransformation;
