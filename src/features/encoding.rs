use std::fmt;
use std::str::FromStr;

use super::FeatureError;

/// How genotypes are represented inside each SNP's block of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureEncoding {
    /// One-hot genotype: exactly one active column per sample.
    Categories,
    /// Allele counts: each column holds the number of copies of one allele.
    Counts,
}

impl FeatureEncoding {
    /// Tag used in project summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureEncoding::Categories => "categories",
            FeatureEncoding::Counts => "counts",
        }
    }
}

impl fmt::Display for FeatureEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureEncoding {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categories" => Ok(FeatureEncoding::Categories),
            "counts" => Ok(FeatureEncoding::Counts),
            other => Err(FeatureError::UnsupportedEncoding(other.to_string())),
        }
    }
}
