use crate::error::RadSiteError;
use crate::iupac_code;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One FASTA record: the free text after `>` and the concatenated,
/// uppercased Watson-strand sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locus {
    pub id: String,
    pub sequence: String,
}

impl Locus {
    /// The Crick strand, derived on demand and never kept around.
    pub fn crick_sequence(&self) -> String {
        iupac_code::reverse_complement(&self.sequence)
    }
}

enum ReaderState {
    AwaitingHeader,
    AccumulatingSequence,
}

/// Streaming FASTA reader yielding one locus at a time; memory stays
/// O(longest locus), not O(genome).
pub struct LocusReader<R> {
    reader: R,
    path: PathBuf,
    // header line of the next record, consumed while finishing the previous one
    pending: Option<String>,
}

/// Opens a FASTA genome, transparently decompressing `.gz` files.
pub fn open_locus_reader(path: &Path) -> Result<LocusReader<Box<dyn BufRead>>, RadSiteError> {
    let file = File::open(path).map_err(|source| RadSiteError::InputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(LocusReader::new(reader, path))
}

impl<R: BufRead> LocusReader<R> {
    pub fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            pending: None,
        }
    }

    fn take_line(&mut self) -> Result<Option<String>, RadSiteError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            // read_line insists on UTF-8; a Latin-1 byte in a header gets
            // the file's path attached instead of a bare decode error
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(RadSiteError::Format {
                    path: self.path.clone(),
                    detail: "line is not valid UTF-8".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

impl<R: BufRead> Iterator for LocusReader<R> {
    type Item = Result<Locus, RadSiteError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut state = ReaderState::AwaitingHeader;
        let mut id = String::new();
        let mut sequence = String::new();
        loop {
            let line = match self.take_line() {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            match state {
                ReaderState::AwaitingHeader => match line {
                    None => return None,
                    Some(line) if line.starts_with('>') => {
                        id = line[1..].to_string();
                        state = ReaderState::AccumulatingSequence;
                    }
                    Some(line) => {
                        return Some(Err(RadSiteError::Format {
                            path: self.path.clone(),
                            detail: format!("expected FASTA header, found '{line}'"),
                        }));
                    }
                },
                ReaderState::AccumulatingSequence => match line {
                    None => return Some(Ok(Locus { id, sequence })),
                    Some(line) if line.starts_with('>') => {
                        self.pending = Some(line);
                        return Some(Ok(Locus { id, sequence }));
                    }
                    Some(line) => sequence.push_str(&line.trim().to_ascii_uppercase()),
                },
            }
        }
    }
}
