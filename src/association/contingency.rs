use std::collections::HashMap;
use std::hash::Hash;

/// Cross-tabulation of two categorical variables.
///
/// Rows are categories of the first variable and columns categories of the
/// second, both indexed in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    counts: Vec<u64>,
    n_rows: usize,
    n_cols: usize,
    total: u64,
}

impl ContingencyTable {
    /// Count co-occurrences over a stream of `(a, b)` observations.
    pub fn from_observations<A, B, I>(observations: I) -> Self
    where
        A: Eq + Hash,
        B: Eq + Hash,
        I: IntoIterator<Item = (A, B)>,
    {
        let mut rows: HashMap<A, usize> = HashMap::new();
        let mut cols: HashMap<B, usize> = HashMap::new();
        let mut joint: HashMap<(usize, usize), u64> = HashMap::new();

        for (a, b) in observations {
            let next_row = rows.len();
            let row = *rows.entry(a).or_insert(next_row);
            let next_col = cols.len();
            let col = *cols.entry(b).or_insert(next_col);
            *joint.entry((row, col)).or_default() += 1;
        }

        let (n_rows, n_cols) = (rows.len(), cols.len());
        let mut counts = vec![0u64; n_rows * n_cols];
        let mut total = 0;
        for ((row, col), count) in joint {
            counts[row * n_cols + col] = count;
            total += count;
        }

        Self {
            counts,
            n_rows,
            n_cols,
            total,
        }
    }

    /// Number of distinct categories of the first variable.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of distinct categories of the second variable.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of observations.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Observed count at `(row, col)`.
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.n_cols + col]
    }

    /// Marginal totals of the first variable.
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts
            .chunks(self.n_cols.max(1))
            .take(self.n_rows)
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Marginal totals of the second variable.
    pub fn col_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.n_cols];
        for row in self.counts.chunks(self.n_cols.max(1)) {
            for (total, &count) in totals.iter_mut().zip(row) {
                *total += count;
            }
        }
        totals
    }

    /// Mean square contingency `chi² / n`, computed as
    /// `sum(O_ij² / (R_i * C_j)) - 1`.
    ///
    /// A cell whose count equals both of its marginals contributes exactly
    /// `1.0`, so tables of perfectly associated variables are exact.
    pub fn phi_squared(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let row_totals = self.row_totals();
        let col_totals = self.col_totals();

        let mut terms = Vec::with_capacity(self.counts.len());
        for (i, &row_total) in row_totals.iter().enumerate() {
            for (j, &col_total) in col_totals.iter().enumerate() {
                let observed = self.count(i, j);
                if observed == 0 {
                    continue;
                }
                let observed = observed as f64;
                // Marginals of observed cells are never zero.
                terms.push((observed * observed) / (row_total as f64 * col_total as f64));
            }
        }

        // Summed in sorted order so the result does not depend on which
        // variable indexes the rows.
        terms.sort_by(f64::total_cmp);
        (terms.iter().sum::<f64>() - 1.0).max(0.0)
    }

    /// Pearson's chi-squared statistic without continuity correction.
    pub fn chi_squared(&self) -> f64 {
        self.phi_squared() * self.total as f64
    }

    /// Cramér's V of the table, in `[0, 1]`.
    ///
    /// Returns `0.0` when either variable has a single category or the
    /// table is empty.
    pub fn cramers_v(&self) -> f64 {
        let min_dim = self.n_rows.min(self.n_cols);
        if self.total == 0 || min_dim < 2 {
            return 0.0;
        }
        (self.phi_squared() / (min_dim - 1) as f64).sqrt().min(1.0)
    }
}

/// Cramér's V between two aligned categorical sequences.
///
/// # Panics
///
/// Panics if the sequences differ in length.
pub fn cramers_v<A, B>(first: &[A], second: &[B]) -> f64
where
    A: Eq + Hash,
    B: Eq + Hash,
{
    assert_eq!(
        first.len(),
        second.len(),
        "cramers_v requires sequences of equal length"
    );
    ContingencyTable::from_observations(first.iter().zip(second)).cramers_v()
}
