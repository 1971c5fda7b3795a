//! Data preprocessing transformers for the training pipeline.
//!
//! Transformers follow a two-phase contract: an unfitted transformer holds
//! hyperparameters and learns from training data ([`Transformer::fit`]); the
//! resulting fitted transformer is ready for inference and serialization.
//! Fitting never looks at data passed to `transform`, which is what keeps
//! test data out of training-derived statistics.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`KnnImputer`]: Fill missing values from the k nearest rows of the
//!   fit-time data
//! - [`Preprocessor`]: Chain transformers into a pipeline

pub mod error;
pub mod imputation;
pub mod pipeline;
pub mod traits;

pub use error::PreprocessingError;
pub use imputation::{FittedKnnImputer, KnnImputer, KnnImputerParams, WeightScheme};
pub use pipeline::{FittedPreprocessor, Preprocessor, PreprocessorParams};
pub use traits::{FittedTransformer, Transformer};
