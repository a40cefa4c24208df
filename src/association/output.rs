use std::io::{self, Write};

use crate::features::SnpLabel;

/// Format a score as the shortest round-trip decimal, always with a
/// decimal point or exponent (`1.0`, `0.25`, `1e-7`).
pub fn format_score(score: f64) -> String {
    format!("{score:?}")
}

/// Tab-separated sink for association records. No header is written.
#[derive(Debug)]
pub struct AssociationWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> AssociationWriter<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    /// Write `chrom1 pos1 chrom2 pos2 score`.
    pub fn write_pair(
        &mut self,
        first: &SnpLabel,
        second: &SnpLabel,
        score: f64,
    ) -> io::Result<()> {
        writeln!(
            self.inner,
            "{}\t{}\t{}\t{}\t{}",
            first.chrom,
            first.pos,
            second.chrom,
            second.pos,
            format_score(score)
        )?;
        self.records += 1;
        Ok(())
    }

    /// Write `chrom pos score`.
    pub fn write_single(&mut self, snp: &SnpLabel, score: f64) -> io::Result<()> {
        writeln!(self.inner, "{}\t{}\t{}", snp.chrom, snp.pos, format_score(score))?;
        self.records += 1;
        Ok(())
    }

    /// Records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
