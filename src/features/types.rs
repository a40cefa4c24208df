use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use ndarray::Array2;

use super::{FeatureEncoding, FeatureError};

/// Largest allele count accepted under [`FeatureEncoding::Counts`].
pub const MAX_ALLELE_COPIES: f64 = 255.0;

/// Genomic coordinate identifying a SNP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnpLabel {
    /// Chromosome or scaffold name.
    pub chrom: String,
    /// Position on the chromosome.
    pub pos: u64,
}

impl SnpLabel {
    /// Construct a label from a chromosome name and position.
    pub fn new(chrom: impl Into<String>, pos: u64) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
        }
    }
}

impl fmt::Display for SnpLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chrom, self.pos)
    }
}

/// Borrowed view of one catalogue entry: a SNP and its feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnpEntry<'a> {
    /// SNP coordinate.
    pub label: &'a SnpLabel,
    /// Matrix columns holding this SNP's block, in allele/category order.
    pub columns: &'a [usize],
}

/// Mapping from SNP label to its block of feature-matrix columns.
///
/// Ordered by `(chrom, pos)` so iteration order is stable across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnpFeatureMap {
    entries: BTreeMap<SnpLabel, Vec<usize>>,
}

impl SnpFeatureMap {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add a SNP. Labels must be unique.
    pub fn insert(&mut self, label: SnpLabel, columns: Vec<usize>) -> Result<(), FeatureError> {
        match self.entries.entry(label) {
            btree_map::Entry::Occupied(slot) => Err(FeatureError::DuplicateSnp(slot.key().clone())),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(columns);
                Ok(())
            }
        }
    }

    /// Look up a SNP.
    pub fn get(&self, label: &SnpLabel) -> Option<SnpEntry<'_>> {
        self.entries
            .get_key_value(label)
            .map(|(label, columns)| SnpEntry { label, columns })
    }

    /// Whether the catalogue contains `label`.
    pub fn contains(&self, label: &SnpLabel) -> bool {
        self.entries.contains_key(label)
    }

    /// Number of SNPs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in catalogue order.
    pub fn entries(&self) -> impl Iterator<Item = SnpEntry<'_>> + '_ {
        self.entries
            .iter()
            .map(|(label, columns)| SnpEntry { label, columns })
    }
}

/// Validated feature data for one association run.
#[derive(Debug, Clone)]
pub struct Features {
    matrix: Array2<f64>,
    snps: SnpFeatureMap,
    class_labels: Vec<String>,
    encoding: FeatureEncoding,
}

impl Features {
    /// Bundle a matrix with its SNP catalogue and labels.
    ///
    /// Fails if a SNP block is empty or references a column outside the
    /// matrix, or if the label count differs from the number of rows. With
    /// [`FeatureEncoding::Counts`] every count in a SNP block must also be
    /// finite and at most [`MAX_ALLELE_COPIES`].
    pub fn new(
        matrix: Array2<f64>,
        snps: SnpFeatureMap,
        class_labels: Vec<String>,
        encoding: FeatureEncoding,
    ) -> Result<Self, FeatureError> {
        let (n_rows, n_columns) = matrix.dim();
        if class_labels.len() != n_rows {
            return Err(FeatureError::LabelCountMismatch {
                labels: class_labels.len(),
                rows: n_rows,
            });
        }

        for entry in snps.entries() {
            if entry.columns.is_empty() {
                return Err(FeatureError::EmptySnpBlock(entry.label.clone()));
            }
            if let Some(&column) = entry.columns.iter().find(|&&c| c >= n_columns) {
                return Err(FeatureError::ColumnOutOfRange {
                    snp: entry.label.clone(),
                    column,
                    n_columns,
                });
            }
            if encoding == FeatureEncoding::Counts {
                check_counts(&matrix, entry)?;
            }
        }

        Ok(Self {
            matrix,
            snps,
            class_labels,
            encoding,
        })
    }

    /// Sample-by-feature matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// SNP catalogue.
    pub fn snps(&self) -> &SnpFeatureMap {
        &self.snps
    }

    /// Per-sample class/population labels, aligned with matrix rows.
    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Genotype encoding of the matrix.
    pub fn encoding(&self) -> FeatureEncoding {
        self.encoding
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.matrix.nrows()
    }
}

/// Counts are expanded into that many observations, so they must be bounded.
fn check_counts(matrix: &Array2<f64>, entry: SnpEntry<'_>) -> Result<(), FeatureError> {
    for (row, values) in matrix.outer_iter().enumerate() {
        for &column in entry.columns {
            let value = values[column];
            if !value.is_finite() || value > MAX_ALLELE_COPIES {
                return Err(FeatureError::InvalidCount {
                    snp: entry.label.clone(),
                    row,
                    column,
                    value,
                });
            }
        }
    }
    Ok(())
}
