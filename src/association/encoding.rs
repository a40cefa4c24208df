//! Conversions from a SNP's feature block to categorical observations.

use ndarray::Array2;

/// Collapse a one-hot block to one integer category per sample.
///
/// Column `j` of the block carries weight `j + 1`, so a 3-column block
/// yields categories 1, 2 or 3. Rows must have exactly one active column;
/// an all-zero row decodes to 0.
pub fn decode_categories(matrix: &Array2<f64>, columns: &[usize]) -> Vec<u32> {
    matrix
        .outer_iter()
        .map(|row| {
            let weighted: f64 = columns
                .iter()
                .enumerate()
                .map(|(j, &col)| row[col] * (j + 1) as f64)
                .sum();
            debug_assert!(
                columns.iter().filter(|&&col| row[col] != 0.0).count() <= 1,
                "one-hot block has more than one active column"
            );
            weighted.round() as u32
        })
        .collect()
}

/// Expand an allele-count block into `(label, allele)` observations.
///
/// A sample carrying two copies of allele `j` contributes two `(label, j)`
/// observations. Counts are truncated; negative values contribute none.
/// [`Features`](crate::features::Features) bounds counts by
/// [`MAX_ALLELE_COPIES`](crate::features::MAX_ALLELE_COPIES).
pub fn count_observations<'a>(
    matrix: &'a Array2<f64>,
    columns: &'a [usize],
    labels: &'a [String],
) -> impl Iterator<Item = (&'a str, usize)> + 'a {
    matrix
        .outer_iter()
        .zip(labels)
        .flat_map(move |(row, label)| {
            columns.iter().enumerate().flat_map(move |(allele, &col)| {
                let copies = row[col] as usize;
                std::iter::repeat((label.as_str(), allele)).take(copies)
            })
        })
}
