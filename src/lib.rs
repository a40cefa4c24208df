//! # Cramér's V associations between SNPs
//!
//! Scores the strength of association between genetic markers, and between
//! markers and population labels, using Cramér's V over contingency tables
//! of genotype categories.
//!
//! ## Association modes
//!
//! 1. **Pairwise**: every SNP of one set against every SNP of another, or a
//!    random sample of distinct pairs
//! 2. **Pairwise-single**: one query SNP against the rest of the catalogue
//! 3. **Populations**: each SNP against the per-sample class labels, from
//!    one-hot genotypes or from expanded allele counts
//!
//! ## Usage Example
//!
//! ```no_run
//! use cramers_assoc::association::{
//!     exhaustive_pairs, select_snps, AssociationDriver, AssociationWriter,
//! };
//! use cramers_assoc::features::read_features;
//!
//! # fn main() -> anyhow::Result<()> {
//! let features = read_features("workdir")?;
//! let snps = select_snps(features.snps(), None);
//! let mut out = AssociationWriter::new(std::io::stdout().lock());
//! AssociationDriver::new(&features).pairwise(exhaustive_pairs(&snps, &snps), &mut out)?;
//! out.finish()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod association; // Statistic engine, pair selection and drivers
pub mod config;      // Work directory layout
pub mod features;    // Feature loading and validation

// Re-exports for convenience
pub use association::{
    cramers_v, AssociationDriver, AssociationError, AssociationWriter, ContingencyTable,
};
pub use config::{ConfigError, RunConfig};
pub use features::{
    FeatureEncoding, FeatureError, Features, SnpFeatureMap, SnpLabel, SubsetFilter,
};
