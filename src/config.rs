//! Run configuration: work directory layout and output file names.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::features::SnpLabel;

/// Directory under the work directory that receives all outputs.
pub const STATS_DIR: &str = "statistics";
/// Default pairwise output file name.
pub const PAIRWISE_OUTPUT: &str = "snp_pairwise_associations.txt";
/// Population output file name.
pub const POPULATION_OUTPUT: &str = "snp_population_associations.txt";

/// Errors in the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The work directory does not exist.
    #[error("Work directory '{0}' does not exist.")]
    MissingWorkdir(PathBuf),

    /// The statistics directory could not be created.
    #[error("failed to create statistics directory {path}: {source}")]
    CreateStatsDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Paths for one association run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    workdir: PathBuf,
    stats_dir: PathBuf,
}

impl RunConfig {
    /// Configuration rooted at an existing work directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let workdir = workdir.into();
        if !workdir.is_dir() {
            return Err(ConfigError::MissingWorkdir(workdir));
        }
        let stats_dir = workdir.join(STATS_DIR);
        Ok(Self { workdir, stats_dir })
    }

    /// Work directory holding the feature data.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Output directory.
    pub fn stats_dir(&self) -> &Path {
        &self.stats_dir
    }

    /// Create the output directory if needed.
    pub fn ensure_stats_dir(&self) -> Result<&Path, ConfigError> {
        fs::create_dir_all(&self.stats_dir).map_err(|source| ConfigError::CreateStatsDir {
            path: self.stats_dir.clone(),
            source,
        })?;
        Ok(&self.stats_dir)
    }

    /// Pairwise output, optionally under a caller-chosen name.
    pub fn pairwise_output(&self, name: Option<&str>) -> PathBuf {
        self.stats_dir.join(name.unwrap_or(PAIRWISE_OUTPUT))
    }

    /// Output of a single-SNP run.
    pub fn single_output(&self, query: &SnpLabel) -> PathBuf {
        self.stats_dir
            .join(format!("snp_associations_snp_{}_{}.txt", query.chrom, query.pos))
    }

    /// Population output.
    pub fn population_output(&self) -> PathBuf {
        self.stats_dir.join(POPULATION_OUTPUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_workdir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::new(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingWorkdir(_)));
    }

    #[test]
    fn outputs_live_under_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path()).unwrap();
        assert!(config.ensure_stats_dir().unwrap().is_dir());

        let stats = dir.path().join(STATS_DIR);
        assert_eq!(config.pairwise_output(None), stats.join(PAIRWISE_OUTPUT));
        assert_eq!(config.pairwise_output(Some("subset.txt")), stats.join("subset.txt"));
        assert_eq!(
            config.single_output(&SnpLabel::new("2L", 42)),
            stats.join("snp_associations_snp_2L_42.txt")
        );
        assert_eq!(config.population_output(), stats.join(POPULATION_OUTPUT));
    }
}
