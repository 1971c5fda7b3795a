//! # netsec-pipeline
//!
//! Data transformation stage of an automated training pipeline for a
//! network-security URL classifier, with strict separation between fitting
//! and inference phases.
//!
//! ## Core Design Principles
//!
//! - **Fit/Transform Separation**: Preprocessors learn from training data
//!   only; test data is transformed with training-derived statistics, never
//!   used to influence fitting.
//! - **Artifacts as Pointers**: Stages exchange immutable path records, not
//!   data payloads; the filesystem carries the arrays and fitted objects.
//! - **Fail Fast**: Any error inside the stage aborts the run, wrapped with
//!   the originating path and cause; retry policy belongs to the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use netsec_pipeline::stage::{
//!     DataTransformation, DataTransformationConfig, DataValidationArtifact,
//! };
//!
//! let stage = DataTransformation::new(
//!     DataValidationArtifact {
//!         valid_train_file_path: "artifacts/validated/train.csv".into(),
//!         valid_test_file_path: "artifacts/validated/test.csv".into(),
//!     },
//!     DataTransformationConfig::under_artifact_dir("artifacts/run_1"),
//! );
//! let artifact = stage.run()?;
//! println!("train array at {:?}", artifact.transformed_train_file_path);
//! # Ok::<(), netsec_pipeline::stage::TransformationError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `constants` — process-wide configuration (target column, imputer
//!   hyperparameters, final preprocessor slot)
//! - `data` — CSV table loading and feature/label splitting
//! - `preprocessing` — fit/transform transformers (KNN imputer, pipeline)
//! - `serialization` — array and parameter persistence
//! - `stage` — the transformation stage runner, its config and artifacts

pub mod constants;

/// Tabular data loading utilities.
pub mod data;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Persistence of arrays and fitted-transformer parameters.
pub mod serialization;

/// Pipeline stage orchestration.
pub mod stage;

/// Re-export of the main stage types for convenient usage.
pub use stage::{
    DataTransformation, DataTransformationArtifact, DataTransformationConfig,
    DataValidationArtifact, TransformationError,
};
