//! Pair-selection policies.
//!
//! Every policy is a finite lazy iterator; calling the constructor again
//! restarts the sequence.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use super::AssociationError;
use crate::features::{SnpEntry, SnpFeatureMap, SnpLabel, SubsetFilter};

/// Two SNPs to be scored against each other.
pub type SnpPair<'a> = (SnpEntry<'a>, SnpEntry<'a>);

/// Catalogue entries retained by `filter`, in catalogue order.
///
/// Without a filter the whole catalogue is returned. Filter keys missing
/// from the catalogue are dropped.
pub fn select_snps<'a>(map: &'a SnpFeatureMap, filter: Option<&SubsetFilter>) -> Vec<SnpEntry<'a>> {
    let Some(filter) = filter else {
        return map.entries().collect();
    };
    let unknown = filter.iter().filter(|key| !map.contains(key)).count();
    if unknown > 0 {
        debug!(unknown, "subset keys not present in the catalogue were dropped");
    }
    map.entries().filter(|entry| filter.contains(entry.label)).collect()
}

/// Cartesian product `one × two`. Self-pairs are kept.
pub fn exhaustive_pairs<'s, 'a: 's>(
    one: &'s [SnpEntry<'a>],
    two: &'s [SnpEntry<'a>],
) -> impl Iterator<Item = SnpPair<'a>> + 's {
    one.iter()
        .flat_map(move |&first| two.iter().map(move |&second| (first, second)))
}

/// Number of distinct unordered pairs `{a, b}` with `a` from `one`, `b`
/// from `two` and `a != b`.
pub fn distinct_pair_count(one: &[SnpEntry<'_>], two: &[SnpEntry<'_>]) -> usize {
    let two_keys: HashSet<&SnpLabel> = two.iter().map(|entry| entry.label).collect();
    let overlap = one.iter().filter(|entry| two_keys.contains(entry.label)).count();
    // Ordered pairs, minus self-pairs, minus the second orientation of
    // pairs drawn entirely from the overlap.
    one.len() * two.len() - overlap - overlap * overlap.saturating_sub(1) / 2
}

fn unordered<'a>(a: &'a SnpLabel, b: &'a SnpLabel) -> (&'a SnpLabel, &'a SnpLabel) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Randomly sampled distinct pairs, see [`sample_pairs`].
#[derive(Debug)]
pub struct SampledPairs<'s, 'a, R> {
    one: &'s [SnpEntry<'a>],
    two: &'s [SnpEntry<'a>],
    seen: HashSet<(&'a SnpLabel, &'a SnpLabel)>,
    remaining: usize,
    rng: R,
}

impl<'s, 'a, R: Rng> Iterator for SampledPairs<'s, 'a, R> {
    type Item = SnpPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let first = self.one[self.rng.gen_range(0..self.one.len())];
            let second = self.two[self.rng.gen_range(0..self.two.len())];
            if first.label == second.label {
                continue;
            }
            if !self.seen.insert(unordered(first.label, second.label)) {
                continue;
            }
            self.remaining -= 1;
            return Some((first, second));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'s, 'a, R: Rng> ExactSizeIterator for SampledPairs<'s, 'a, R> {}

/// Draw `n` distinct unordered pairs, one SNP from each set.
///
/// Draws with both sides on the same SNP, or repeating an earlier pair in
/// either orientation, are rejected. Fails when fewer than `n` such pairs
/// exist.
pub fn sample_pairs<'s, 'a, R: Rng>(
    n: usize,
    one: &'s [SnpEntry<'a>],
    two: &'s [SnpEntry<'a>],
    rng: R,
) -> Result<SampledPairs<'s, 'a, R>, AssociationError> {
    let available = distinct_pair_count(one, two);
    if n > available {
        return Err(AssociationError::SampleSpaceTooSmall {
            requested: n,
            available,
        });
    }
    Ok(SampledPairs {
        one,
        two,
        seen: HashSet::with_capacity(n),
        remaining: n,
        rng,
    })
}

/// One query SNP paired with every other SNP of the catalogue.
#[derive(Debug, Clone, Copy)]
pub struct SingleVsAll<'a> {
    query: SnpEntry<'a>,
    catalog: &'a SnpFeatureMap,
}

impl<'a> SingleVsAll<'a> {
    /// Resolve `query` against the catalogue.
    pub fn new(catalog: &'a SnpFeatureMap, query: &SnpLabel) -> Result<Self, AssociationError> {
        let query = catalog
            .get(query)
            .ok_or_else(|| AssociationError::UnknownSnp(query.clone()))?;
        Ok(Self { query, catalog })
    }

    /// The query SNP.
    pub fn query(&self) -> SnpEntry<'a> {
        self.query
    }

    /// Every catalogue SNP other than the query, in catalogue order.
    pub fn candidates(&self) -> impl Iterator<Item = SnpEntry<'a>> + 'a {
        let (catalog, query) = (self.catalog, self.query.label);
        catalog.entries().filter(move |entry| entry.label != query)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.catalog.len() - 1
    }

    /// Whether the query is the only SNP in the catalogue.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalogue(n: u64) -> SnpFeatureMap {
        let mut map = SnpFeatureMap::new();
        for pos in 0..n {
            let base = pos as usize * 3;
            map.insert(SnpLabel::new("1", pos), vec![base, base + 1, base + 2])
                .unwrap();
        }
        map
    }

    #[test]
    fn subset_keeps_known_keys_only() {
        let map = catalogue(4);
        let filter: SubsetFilter = [SnpLabel::new("1", 2), SnpLabel::new("9", 2)]
            .into_iter()
            .collect();
        let selected = select_snps(&map, Some(&filter));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, &SnpLabel::new("1", 2));
        assert_eq!(select_snps(&map, None).len(), 4);
    }

    #[test]
    fn exhaustive_is_full_product() {
        let map = catalogue(3);
        let all = select_snps(&map, None);
        let pairs: Vec<_> = exhaustive_pairs(&all, &all[..2]).collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0].0.label, pairs[0].1.label);
        assert_eq!(pairs[1].0.label.pos, 0);
        assert_eq!(pairs[1].1.label.pos, 1);
    }

    #[test]
    fn pair_count_accounts_for_overlap() {
        let map = catalogue(5);
        let all = select_snps(&map, None);
        assert_eq!(distinct_pair_count(&all, &all), 10);
        assert_eq!(distinct_pair_count(&all[..2], &all[2..]), 6);
        assert_eq!(distinct_pair_count(&all[..3], &all[1..]), 9);
        assert_eq!(distinct_pair_count(&all[..1], &all[..1]), 0);
    }

    #[test]
    fn sampling_exhausts_small_space_without_repeats() {
        let map = catalogue(4);
        let all = select_snps(&map, None);
        let rng = StdRng::seed_from_u64(7);
        let pairs: Vec<_> = sample_pairs(6, &all, &all, rng).unwrap().collect();
        assert_eq!(pairs.len(), 6);
        let distinct: HashSet<_> = pairs
            .iter()
            .map(|(a, b)| unordered(a.label, b.label))
            .collect();
        assert_eq!(distinct.len(), 6);
        assert!(pairs.iter().all(|(a, b)| a.label != b.label));
    }

    #[test]
    fn oversized_sample_is_rejected() {
        let map = catalogue(3);
        let all = select_snps(&map, None);
        let err = sample_pairs(4, &all, &all, StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            AssociationError::SampleSpaceTooSmall { requested: 4, available: 3 }
        ));
    }

    #[test]
    fn single_vs_all_skips_query() {
        let map = catalogue(4);
        let selection = SingleVsAll::new(&map, &SnpLabel::new("1", 1)).unwrap();
        let positions: Vec<_> = selection.candidates().map(|e| e.label.pos).collect();
        assert_eq!(positions, vec![0, 2, 3]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn unknown_query_fails_fast() {
        let map = catalogue(2);
        let err = SingleVsAll::new(&map, &SnpLabel::new("2", 0)).unwrap_err();
        assert!(matches!(err, AssociationError::UnknownSnp(label) if label.chrom == "2"));
    }
}
