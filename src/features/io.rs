//! Work-directory loading.
//!
//! A work directory holds `project_summary.json` (which names the feature
//! encoding) and `features.json` (matrix, SNP catalogue and class labels).

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FeatureEncoding, FeatureError, Features, SnpFeatureMap, SnpLabel};

/// File name of the project summary inside a work directory.
pub const PROJECT_SUMMARY_FILE: &str = "project_summary.json";
/// File name of the feature data inside a work directory.
pub const FEATURES_FILE: &str = "features.json";

/// Project-level metadata. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Encoding tag, `categories` or `counts`.
    pub feature_encoding: String,
}

impl ProjectSummary {
    /// Summary for a known encoding.
    pub fn new(encoding: FeatureEncoding) -> Self {
        Self {
            feature_encoding: encoding.as_str().to_string(),
        }
    }

    /// Parse the encoding tag.
    pub fn encoding(&self) -> Result<FeatureEncoding, FeatureError> {
        self.feature_encoding.parse()
    }
}

/// One SNP entry of `features.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnpFeatureRecord {
    /// Chromosome name.
    pub chrom: String,
    /// Position.
    pub pos: u64,
    /// Matrix columns of this SNP's block.
    pub columns: Vec<usize>,
}

/// On-disk layout of `features.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFile {
    /// Row-major matrix, one row per sample.
    pub feature_matrix: Vec<Vec<f64>>,
    /// SNP catalogue.
    pub snp_features: Vec<SnpFeatureRecord>,
    /// Per-sample class labels.
    pub class_labels: Vec<String>,
}

impl FeatureFile {
    /// Validate and convert into [`Features`].
    pub fn into_features(self, encoding: FeatureEncoding) -> Result<Features, FeatureError> {
        let n_rows = self.feature_matrix.len();
        let n_columns = self.feature_matrix.first().map_or(0, Vec::len);

        let mut flat = Vec::with_capacity(n_rows * n_columns);
        for (row, values) in self.feature_matrix.into_iter().enumerate() {
            if values.len() != n_columns {
                return Err(FeatureError::RaggedMatrix {
                    row,
                    expected: n_columns,
                    found: values.len(),
                });
            }
            flat.extend(values);
        }
        let matrix = Array2::from_shape_vec((n_rows, n_columns), flat)?;

        let mut snps = SnpFeatureMap::new();
        for record in self.snp_features {
            snps.insert(SnpLabel::new(record.chrom, record.pos), record.columns)?;
        }

        Features::new(matrix, snps, self.class_labels, encoding)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FeatureError> {
    let file = File::open(path).map_err(|source| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| FeatureError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FeatureError> {
    let io_err = |source: std::io::Error| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| FeatureError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)
}

/// Read `project_summary.json` from a work directory.
pub fn read_project_summary(workdir: impl AsRef<Path>) -> Result<ProjectSummary, FeatureError> {
    read_json(&workdir.as_ref().join(PROJECT_SUMMARY_FILE))
}

/// Read `features.json` from a work directory without validating it.
pub fn read_feature_file(workdir: impl AsRef<Path>) -> Result<FeatureFile, FeatureError> {
    read_json(&workdir.as_ref().join(FEATURES_FILE))
}

/// Load and validate all feature data of a work directory.
///
/// The encoding tag is checked before the feature matrix is read.
pub fn read_features(workdir: impl AsRef<Path>) -> Result<Features, FeatureError> {
    let workdir = workdir.as_ref();
    let encoding = read_project_summary(workdir)?.encoding()?;
    let features = read_feature_file(workdir)?.into_features(encoding)?;
    debug!(
        samples = features.n_samples(),
        snps = features.snps().len(),
        %encoding,
        "loaded features from {}",
        workdir.display()
    );
    Ok(features)
}

/// Write a project summary and feature file into `workdir`.
pub fn write_workdir(
    workdir: impl AsRef<Path>,
    summary: &ProjectSummary,
    features: &FeatureFile,
) -> Result<(), FeatureError> {
    let workdir = workdir.as_ref();
    write_json(&workdir.join(PROJECT_SUMMARY_FILE), summary)?;
    write_json(&workdir.join(FEATURES_FILE), features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_file() -> FeatureFile {
        FeatureFile {
            feature_matrix: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
            snp_features: vec![SnpFeatureRecord {
                chrom: "X".into(),
                pos: 7,
                columns: vec![0, 1, 2],
            }],
            class_labels: vec!["north".into(), "south".into()],
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut file = feature_file();
        file.feature_matrix[1].pop();
        let err = file.into_features(FeatureEncoding::Categories).unwrap_err();
        assert!(matches!(err, FeatureError::RaggedMatrix { row: 1, expected: 3, found: 2 }));
    }

    #[test]
    fn workdir_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        write_workdir(dir.path(), &ProjectSummary::new(FeatureEncoding::Counts), &feature_file())
            .unwrap();

        let features = read_features(dir.path()).unwrap();
        assert_eq!(features.encoding(), FeatureEncoding::Counts);
        assert_eq!(features.n_samples(), 2);
        assert!(features.snps().contains(&SnpLabel::new("X", 7)));
    }

    #[test]
    fn unsupported_encoding_stops_before_features_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let summary = ProjectSummary {
            feature_encoding: "haplotypes".into(),
        };
        write_json(&dir.path().join(PROJECT_SUMMARY_FILE), &summary).unwrap();

        let err = read_features(dir.path()).unwrap_err();
        assert!(matches!(err, FeatureError::UnsupportedEncoding(tag) if tag == "haplotypes"));
    }

    #[test]
    fn summary_ignores_extra_fields() {
        let summary: ProjectSummary =
            serde_json::from_str(r#"{"feature_encoding": "categories", "n_samples": 12}"#).unwrap();
        assert_eq!(summary.encoding().unwrap(), FeatureEncoding::Categories);
    }
}
