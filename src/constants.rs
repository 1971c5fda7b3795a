//! Process-wide configuration constants for the training pipeline.
//!
//! These are read-only after process start. Stages read them directly
//! rather than threading them through every call site.

use crate::preprocessing::WeightScheme;

/// Name of the label column in the validated datasets.
///
/// The phishing dataset encodes the outcome in a `Result` column with
/// values in `{-1, 1}`; the transformation stage rewrites `-1` to `0`.
pub const TARGET_COLUMN: &str = "Result";

/// Neighbor count for the KNN imputer.
pub const IMPUTER_N_NEIGHBORS: usize = 3;

/// Weighting scheme for the KNN imputer.
pub const IMPUTER_WEIGHTS: WeightScheme = WeightScheme::Uniform;

/// Fixed location of the most recently trained preprocessor.
///
/// Written on every successful transformation run in addition to the
/// per-run artifact path, so the serving component can always load the
/// latest preprocessor without knowing run identifiers. Concurrent runs
/// race on this file with no locking; last writer wins.
pub const FINAL_PREPROCESSOR_PATH: &str = "final_model/preprocessor.bin";
