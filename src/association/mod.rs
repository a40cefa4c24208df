//! Cramér's V association scoring.
//!
//! [`cramers_v`] is the statistic engine. The pair-selection policies in
//! this module decide which SNP blocks are compared, and
//! [`AssociationDriver`] scores them and streams records to an
//! [`AssociationWriter`].

mod contingency;
mod driver;
mod encoding;
mod output;
mod pairs;

pub use contingency::{cramers_v, ContingencyTable};
pub use driver::{AssociationDriver, Progress};
pub use encoding::{count_observations, decode_categories};
pub use output::{format_score, AssociationWriter};
pub use pairs::{
    distinct_pair_count, exhaustive_pairs, sample_pairs, select_snps, SampledPairs, SingleVsAll,
    SnpPair,
};

use crate::features::{FeatureEncoding, SnpLabel};
use thiserror::Error;

/// Errors raised while selecting or scoring associations.
#[derive(Debug, Error)]
pub enum AssociationError {
    /// The mode needs one-hot genotypes but the features use another encoding.
    #[error(
        "{mode}: pairwise Cramér's V only works with the 'categories' feature encoding, \
         found '{encoding}'"
    )]
    EncodingMismatch {
        /// Association mode that was requested.
        mode: &'static str,
        /// Encoding of the loaded features.
        encoding: FeatureEncoding,
    },

    /// The query SNP is not in the catalogue.
    #[error("unknown SNP key {0}")]
    UnknownSnp(SnpLabel),

    /// Fewer distinct pairs exist than were requested.
    #[error("requested {requested} sampled pairs but only {available} distinct pairs exist")]
    SampleSpaceTooSmall {
        /// Number of pairs requested.
        requested: usize,
        /// Number of distinct non-self pairs available.
        available: usize,
    },

    /// Writing to the output sink failed.
    #[error("failed to write association record: {0}")]
    Io(#[from] std::io::Error),
}
