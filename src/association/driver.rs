use std::io::Write;

use tracing::info;

use super::{
    count_observations, cramers_v, decode_categories, AssociationError, AssociationWriter,
    ContingencyTable, SingleVsAll, SnpPair,
};
use crate::features::{FeatureEncoding, Features, SnpEntry};

/// Decides when to emit a progress event: at item indices 1, 2, 4, 8, ...
#[derive(Debug, Clone)]
pub struct Progress {
    next: usize,
}

impl Progress {
    /// Start a fresh schedule.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Whether item `idx` should be reported. Advances the schedule.
    pub fn due(&mut self, idx: usize) -> bool {
        if idx == self.next {
            self.next = self.next.saturating_mul(2);
            true
        } else {
            false
        }
    }
}

/// Scores SNP pairs or SNP-vs-population associations and streams the
/// results to an [`AssociationWriter`].
#[derive(Debug, Clone, Copy)]
pub struct AssociationDriver<'a> {
    features: &'a Features,
}

impl<'a> AssociationDriver<'a> {
    /// Create a driver over validated features.
    pub fn new(features: &'a Features) -> Self {
        Self { features }
    }

    /// Features being scored.
    pub fn features(&self) -> &'a Features {
        self.features
    }

    /// Fail unless the features are one-hot genotypes.
    pub fn require_categories(&self, mode: &'static str) -> Result<(), AssociationError> {
        match self.features.encoding() {
            FeatureEncoding::Categories => Ok(()),
            encoding => Err(AssociationError::EncodingMismatch { mode, encoding }),
        }
    }

    fn decode(&self, snp: SnpEntry<'_>) -> Vec<u32> {
        decode_categories(self.features.matrix(), snp.columns)
    }

    /// Cramér's V between the decoded genotypes of two SNPs.
    pub fn score_pair(&self, first: SnpEntry<'_>, second: SnpEntry<'_>) -> f64 {
        cramers_v(&self.decode(first), &self.decode(second))
    }

    /// Cramér's V between one SNP and the class labels.
    pub fn population_score(&self, snp: SnpEntry<'_>) -> f64 {
        let labels = self.features.class_labels();
        match self.features.encoding() {
            FeatureEncoding::Categories => cramers_v(labels, &self.decode(snp)),
            FeatureEncoding::Counts => ContingencyTable::from_observations(count_observations(
                self.features.matrix(),
                snp.columns,
                labels,
            ))
            .cramers_v(),
        }
    }

    /// Score every pair produced by `pairs`, in order.
    pub fn pairwise<'p, I, W>(
        &self,
        pairs: I,
        out: &mut AssociationWriter<W>,
    ) -> Result<usize, AssociationError>
    where
        I: IntoIterator<Item = SnpPair<'p>>,
        W: Write,
    {
        self.require_categories("pairwise")?;
        let mut progress = Progress::new();
        let mut written = 0;
        for (idx, (first, second)) in pairs.into_iter().enumerate() {
            let v = self.score_pair(first, second);
            if progress.due(idx) {
                info!(
                    "Pair {idx} ({}, {}) has an association of {v}",
                    first.label, second.label
                );
            }
            out.write_pair(first.label, second.label, v)?;
            written += 1;
        }
        Ok(written)
    }

    /// Score the query SNP against every other SNP of the catalogue.
    pub fn pairwise_single<W: Write>(
        &self,
        selection: &SingleVsAll<'_>,
        out: &mut AssociationWriter<W>,
    ) -> Result<usize, AssociationError> {
        self.require_categories("pairwise-single")?;
        let query = self.decode(selection.query());
        let mut progress = Progress::new();
        let mut written = 0;
        for (idx, candidate) in selection.candidates().enumerate() {
            let v = cramers_v(&query, &self.decode(candidate));
            if progress.due(idx) {
                info!("{idx} SNP {} has an association of {v}", candidate.label);
            }
            out.write_single(candidate.label, v)?;
            written += 1;
        }
        Ok(written)
    }

    /// Score every SNP against the class labels.
    pub fn populations<W: Write>(
        &self,
        out: &mut AssociationWriter<W>,
    ) -> Result<usize, AssociationError> {
        let mut progress = Progress::new();
        let mut written = 0;
        for (idx, snp) in self.features.snps().entries().enumerate() {
            let v = self.population_score(snp);
            if progress.due(idx) {
                info!("{idx} SNP {} has an association of {v}", snp.label);
            }
            out.write_single(snp.label, v)?;
            written += 1;
        }
        Ok(written)
    }
}
