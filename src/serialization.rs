//! Persistence of numeric arrays and fitted-transformer parameters.
//!
//! This module provides a format-agnostic byte contract
//! ([`SerializableParams`]) plus filesystem helpers for the arrays the
//! transformation stage produces. Writing an array and reading it back
//! yields an element-wise identical array.

use ndarray::Array2;
use std::error::Error;
use std::path::Path;

use crate::preprocessing::PreprocessingError;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data (e.g., `Vec<f64>`,
/// scalars), not views or handles into live transformers.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save a numeric array to a file, creating parent directories as needed.
pub fn save_array<P: AsRef<Path>>(path: P, array: &Array2<f64>) -> std::io::Result<()> {
    ensure_parent_dir(&path)?;
    let bytes = bincode::serialize(array).map_err(std::io::Error::other)?;
    std::fs::write(path, bytes)
}

/// Load a numeric array previously written by [`save_array`].
pub fn load_array<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, PreprocessingError> {
    let bytes = std::fs::read(path)?;
    let array: Array2<f64> = bincode::deserialize(&bytes)?;
    Ok(array)
}
