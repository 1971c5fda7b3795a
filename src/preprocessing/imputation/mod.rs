//! Imputation transformers for completing missing values.

pub mod knn;

pub use knn::{FittedKnnImputer, KnnImputer, KnnImputerParams, WeightScheme};
