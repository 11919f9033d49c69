use crate::digest::FragmentSpan;
use crate::error::RadSiteError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strand {
    Watson,
    Crick,
}

impl Strand {
    #[inline(always)]
    pub fn symbol(&self) -> char {
        match self {
            Strand::Watson => '+',
            Strand::Crick => '-',
        }
    }
}

/// GC rate (percent of G/C among the non-N bases) and N count of a fragment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GcProfile {
    pub gc_rate: f64,
    pub n_count: usize,
}

pub fn gc_profile(sequence: &str) -> GcProfile {
    let mut gc = 0;
    let mut n_count = 0;
    for base in sequence.bytes() {
        match base {
            b'G' | b'C' => gc += 1,
            b'N' => n_count += 1,
            _ => {}
        }
    }
    let informative = sequence.len() - n_count;
    let gc_rate = if informative == 0 {
        0.0
    } else {
        100.0 * gc as f64 / informative as f64
    };
    GcProfile { gc_rate, n_count }
}

/// Two-decimal GC rate as it appears in fragment headers and the GC
/// distribution.
pub fn format_gc(gc_rate: f64) -> String {
    format!("{gc_rate:.2}")
}

/// The retention window; fragments outside it are counted but not written.
#[derive(Clone, Copy, Debug)]
pub struct SizeWindow {
    pub min: usize,
    pub max: usize,
}

impl SizeWindow {
    #[inline(always)]
    pub fn retains(&self, length: usize) -> bool {
        self.min <= length && length <= self.max
    }
}

/// Writes retained fragments as FASTA-like records, one header and one
/// sequence line each.
pub struct FragmentWriter<W: Write> {
    out: W,
}

impl FragmentWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, RadSiteError> {
        let file = File::create(path).map_err(|source| RadSiteError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }
}

impl<W: Write> FragmentWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Header coordinates are 1-based. On the Crick strand they are mapped
    /// back through the strand length, so both strands report positions in
    /// their own reading orientation.
    #[allow(clippy::too_many_arguments)]
    pub fn write_fragment(
        &mut self,
        number: u64,
        sequence: &str,
        gc_formatted: &str,
        strand: Strand,
        span: &FragmentSpan,
        strand_len: usize,
        locus_id: &str,
    ) -> io::Result<()> {
        let (start, end) = match strand {
            Strand::Watson => (span.start as i64 + 1, span.end as i64),
            Strand::Crick => (
                strand_len as i64 - span.start as i64,
                strand_len as i64 - span.end as i64 + 1,
            ),
        };
        writeln!(
            self.out,
            ">fragment: {number} | length: {length} | GC: {gc_formatted} | strand: {symbol} | start: {start} | end: {end} | locus: {locus_id}",
            length = sequence.len(),
            symbol = strand.symbol(),
        )?;
        writeln!(self.out, "{sequence}")
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}
