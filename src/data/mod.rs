//! Tabular data loading for the pipeline stages.
//!
//! A [`Table`] is a header-named, all-numeric matrix read from delimited
//! text. Upstream validation guarantees a consistent schema; this module
//! only turns the file into numbers and splits the label column off.
//! Empty cells and the usual NA spellings become `f64::NAN`, the missing
//! marker the imputer operates on.

use csv::ReaderBuilder;
use ndarray::{Array1, Array2};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Error type for table loading and column access.
#[derive(Debug)]
pub enum DataError {
    /// File could not be opened or read.
    Io(std::io::Error),
    /// File is not parseable as delimited tabular data.
    Csv(csv::Error),
    /// A cell held a token that is neither numeric nor a missing marker.
    InvalidCell {
        row: usize,
        column: String,
        token: String,
    },
    /// A named column is absent from the header.
    ColumnNotFound(String),
    /// Column names and data columns disagree in count.
    ShapeMismatch { names: usize, columns: usize },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(err) => write!(f, "I/O error: {}", err),
            DataError::Csv(err) => write!(f, "CSV error: {}", err),
            DataError::InvalidCell { row, column, token } => {
                write!(
                    f,
                    "Invalid cell at row {}, column '{}': '{}' is not numeric",
                    row, column, token
                )
            }
            DataError::ColumnNotFound(name) => {
                write!(f, "Column '{}' not found in table", name)
            }
            DataError::ShapeMismatch { names, columns } => {
                write!(f, "{} column names for {} data columns", names, columns)
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(err) => Some(err),
            DataError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err)
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv(err)
    }
}

/// Tokens that denote a missing value in the source files.
fn is_missing_token(token: &str) -> bool {
    token.is_empty() || matches!(token, "NA" | "N/A" | "NaN" | "nan" | "null")
}

/// A named-column numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    data: Array2<f64>,
}

impl Table {
    /// Build a table from column names and a matching matrix.
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> Result<Self, DataError> {
        if columns.len() != data.dim().1 {
            return Err(DataError::ShapeMismatch {
                names: columns.len(),
                columns: data.dim().1,
            });
        }
        Ok(Self { columns, data })
    }

    /// Read a table from a delimited text file with a header row.
    ///
    /// # Errors
    /// Returns [`DataError`] if the file is unreadable, structurally
    /// malformed, or contains a non-numeric cell that is not a missing
    /// marker.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut rdr = ReaderBuilder::new().from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let n_cols = columns.len();

        let mut values: Vec<f64> = Vec::new();
        let mut n_rows = 0usize;
        for (row_idx, result) in rdr.records().enumerate() {
            let record = result?;
            for (col_idx, field) in record.iter().enumerate() {
                let token = field.trim();
                if is_missing_token(token) {
                    values.push(f64::NAN);
                } else {
                    let parsed: f64 = token.parse().map_err(|_| DataError::InvalidCell {
                        row: row_idx,
                        column: columns
                            .get(col_idx)
                            .cloned()
                            .unwrap_or_else(|| col_idx.to_string()),
                        token: token.to_string(),
                    })?;
                    values.push(parsed);
                }
            }
            n_rows += 1;
        }

        // Ragged records are rejected by the csv reader above, so this
        // shape is always consistent.
        let data = Array2::from_shape_vec((n_rows, n_cols), values)
            .expect("row-major values match (n_rows, n_cols)");

        Ok(Self { columns, data })
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `(rows, columns)` of the table.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// The underlying numeric matrix.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Split the table into a feature matrix (all columns except `target`)
    /// and the target column.
    ///
    /// # Errors
    /// Returns [`DataError::ColumnNotFound`] if `target` is absent.
    pub fn split_target(&self, target: &str) -> Result<(Array2<f64>, Array1<f64>), DataError> {
        let target_idx = self
            .columns
            .iter()
            .position(|c| c == target)
            .ok_or_else(|| DataError::ColumnNotFound(target.to_string()))?;

        let (rows, cols) = self.data.dim();
        let labels = self.data.column(target_idx).to_owned();

        let mut features = Array2::zeros((rows, cols - 1));
        let mut out_col = 0usize;
        for col in 0..cols {
            if col == target_idx {
                continue;
            }
            features.column_mut(out_col).assign(&self.data.column(col));
            out_col += 1;
        }

        Ok((features, labels))
    }
}
