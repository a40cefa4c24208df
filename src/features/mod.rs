//! Feature matrices, SNP catalogues and class labels.
//!
//! This module is the loading side of the crate: it reads a work directory,
//! checks the dimensional invariants between the matrix, the SNP blocks and
//! the per-sample labels, and hands a validated [`Features`] to the
//! association drivers.

mod encoding;
mod io;
mod subset;
mod types;

pub use encoding::FeatureEncoding;
pub use io::{
    read_feature_file, read_features, read_project_summary, write_workdir, FeatureFile,
    ProjectSummary, SnpFeatureRecord, FEATURES_FILE, PROJECT_SUMMARY_FILE,
};
pub use subset::SubsetFilter;
pub use types::{Features, SnpEntry, SnpFeatureMap, SnpLabel, MAX_ALLELE_COPIES};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating feature data.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A file could not be opened, read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A read from an already-open stream failed.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    /// A JSON document could not be decoded.
    #[error("malformed JSON in {path}: {source}")]
    Json {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The project summary names an encoding this crate does not know.
    #[error("Unsupported feature encoding '{0}'")]
    UnsupportedEncoding(String),

    /// Matrix rows do not all have the same width.
    #[error("feature matrix row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        /// 0-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// The flattened matrix could not be shaped.
    #[error("invalid feature matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Number of class labels differs from the number of samples.
    #[error("{labels} class labels for {rows} samples")]
    LabelCountMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of matrix rows.
        rows: usize,
    },

    /// A SNP references a column beyond the matrix width.
    #[error("SNP {snp} references column {column} but the matrix has {n_columns} columns")]
    ColumnOutOfRange {
        /// Offending SNP.
        snp: SnpLabel,
        /// Column index that was out of range.
        column: usize,
        /// Matrix width.
        n_columns: usize,
    },

    /// An allele count is not finite or exceeds [`MAX_ALLELE_COPIES`].
    #[error("SNP {snp} has allele count {value} in sample {row}, column {column}")]
    InvalidCount {
        /// SNP whose block holds the count.
        snp: SnpLabel,
        /// 0-based sample row.
        row: usize,
        /// Matrix column of the count.
        column: usize,
        /// Offending value.
        value: f64,
    },

    /// A SNP has no feature columns.
    #[error("SNP {0} has no feature columns")]
    EmptySnpBlock(SnpLabel),

    /// The same SNP appears twice in the catalogue.
    #[error("duplicate SNP {0}")]
    DuplicateSnp(SnpLabel),

    /// A subset filter line could not be parsed.
    #[error("malformed subset line {line}: {reason}")]
    MalformedSubset {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}
