use crate::error::RadSiteError;
use crate::fragment::{SizeWindow, format_gc};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntervalCount {
    /// All fragments falling into this length interval, retained or not.
    pub fragments: u64,
    /// How many of them contain at least one N base.
    pub with_n: u64,
}

/// One row of the length histogram, with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalRow {
    pub lower: usize,
    pub upper: usize,
    pub count: IntervalCount,
}

/// Per-run aggregation: the length-interval histogram over every candidate
/// fragment and the GC-rate distribution over the written ones. Finalized
/// only once the genome stream is exhausted.
#[derive(Clone, Debug)]
pub struct FragmentStats {
    interval_width: usize,
    intervals: BTreeMap<usize, IntervalCount>,
    // GC rate in hundredths of a percent, parsed back from the two-decimal
    // header formatting so bucket identity always matches the headers
    gc_distribution: BTreeMap<u64, u64>,
    total_fragments: u64,
    written_fragments: u64,
}

/// An `ii.ff` two-decimal GC rate back into hundredths of a percent.
fn gc_key(formatted: &str) -> u64 {
    match formatted.split_once('.') {
        Some((whole, cents)) => {
            whole.parse::<u64>().unwrap_or(0) * 100 + cents.parse::<u64>().unwrap_or(0)
        }
        None => formatted.parse::<u64>().unwrap_or(0) * 100,
    }
}

impl FragmentStats {
    pub fn new(interval_width: usize) -> Self {
        Self {
            interval_width: interval_width.max(1),
            intervals: BTreeMap::new(),
            gc_distribution: BTreeMap::new(),
            total_fragments: 0,
            written_fragments: 0,
        }
    }

    fn bucket_index(&self, length: usize) -> usize {
        length.saturating_sub(1) / self.interval_width
    }

    /// Every candidate fragment is recorded here, inside the size window or
    /// not.
    pub fn record_fragment(&mut self, length: usize, n_count: usize) {
        self.total_fragments += 1;
        let entry = self.intervals.entry(self.bucket_index(length)).or_default();
        entry.fragments += 1;
        if n_count > 0 {
            entry.with_n += 1;
        }
    }

    /// Only fragments inside the size window are recorded here. The
    /// distribution is keyed by the formatted rate, not the raw one, so a
    /// tie like 3.125 lands in the bucket its header prints (3.12, ties to
    /// even), never one rounded the other way.
    pub fn record_written(&mut self, gc_rate: f64) {
        self.written_fragments += 1;
        let key = gc_key(&format_gc(gc_rate));
        *self.gc_distribution.entry(key).or_insert(0) += 1;
    }

    #[inline(always)]
    pub fn total_fragments(&self) -> u64 {
        self.total_fragments
    }

    #[inline(always)]
    pub fn written_fragments(&self) -> u64 {
        self.written_fragments
    }

    /// Histogram rows from length 1 through at least the window maximum,
    /// empty intervals included.
    pub fn interval_rows(&self, window: &SizeWindow) -> Vec<IntervalRow> {
        let last = self
            .intervals
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .max(self.bucket_index(window.max));
        (0..=last)
            .map(|index| IntervalRow {
                lower: index * self.interval_width + 1,
                upper: (index + 1) * self.interval_width,
                count: self.intervals.get(&index).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// The textual histogram report.
    pub fn write_report(
        &self,
        path: &Path,
        title: &str,
        window: &SizeWindow,
    ) -> Result<(), RadSiteError> {
        let file = File::create(path).map_err(|source| RadSiteError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(title.len()))?;
        writeln!(out)?;
        writeln!(out, "{:>15}  {:>10}  {:>10}", "interval (bp)", "fragments", "with N")?;
        for row in self.interval_rows(window) {
            writeln!(
                out,
                "{:>15}  {:>10}  {:>10}",
                format!("{}-{}", row.lower, row.upper),
                row.count.fragments,
                row.count.with_n
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Total fragments: {}", self.total_fragments)?;
        writeln!(out, "Written fragments: {}", self.written_fragments)?;
        writeln!(out, "Minimum fragment size: {}", window.min)?;
        writeln!(out, "Maximum fragment size: {}", window.max)?;
        writeln!(out, "Interval width: {}", self.interval_width)?;
        out.flush()?;
        Ok(())
    }

    /// GC distribution of the written fragments, ascending by rate.
    pub fn write_gc_distribution(&self, path: &Path) -> Result<(), RadSiteError> {
        let mut writer =
            csv::Writer::from_path(path).map_err(|e| RadSiteError::OutputOpen {
                path: path.to_path_buf(),
                source: io::Error::other(e),
            })?;
        writer
            .write_record(["gc_rate", "fragments"])
            .map_err(io::Error::other)?;
        for (&key, &count) in &self.gc_distribution {
            writer
                .write_record([
                    format!("{}.{:02}", key / 100, key % 100),
                    count.to_string(),
                ])
                .map_err(io::Error::other)?;
        }
        writer.flush()?;
        Ok(())
    }
}
