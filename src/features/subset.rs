use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{FeatureError, SnpLabel};

/// Set of SNP coordinates used to restrict a pairwise run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubsetFilter {
    keys: HashSet<SnpLabel>,
}

impl SubsetFilter {
    /// Parse `chromosome position` lines. Blank lines are skipped and
    /// columns past the second are ignored.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, FeatureError> {
        let mut keys = HashSet::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let mut cols = line.split_whitespace();
            let Some(chrom) = cols.next() else {
                continue;
            };
            let pos = cols.next().ok_or_else(|| FeatureError::MalformedSubset {
                line: idx + 1,
                reason: "expected chromosome and position".to_string(),
            })?;
            let pos: u64 = pos.parse().map_err(|_| FeatureError::MalformedSubset {
                line: idx + 1,
                reason: format!("invalid position '{pos}'"),
            })?;
            keys.insert(SnpLabel::new(chrom, pos));
        }
        Ok(Self { keys })
    }

    /// Read a filter from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FeatureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file))
    }

    /// Whether `label` is retained by the filter.
    pub fn contains(&self, label: &SnpLabel) -> bool {
        self.keys.contains(label)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the filter holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over keys in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &SnpLabel> + '_ {
        self.keys.iter()
    }
}

impl FromIterator<SnpLabel> for SubsetFilter {
    fn from_iter<I: IntoIterator<Item = SnpLabel>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_skips_blank_lines() {
        let input = "2L 100\n\n  3R\t2500 extra\n";
        let filter = SubsetFilter::parse(input.as_bytes()).unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.contains(&SnpLabel::new("2L", 100)));
        assert!(filter.contains(&SnpLabel::new("3R", 2500)));
    }

    #[test]
    fn single_column_line_is_an_error() {
        let err = SubsetFilter::parse("2L 100\nX\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FeatureError::MalformedSubset { line: 2, .. }));
    }

    #[test]
    fn non_numeric_position_is_an_error() {
        let err = SubsetFilter::parse("2L abc\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "malformed subset line 1: invalid position 'abc'");
    }
}
