use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Fatal run errors. A digestion is a single deterministic pass, so any of
/// these aborts the whole run.
#[derive(Debug)]
pub enum RadSiteError {
    InputOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    OutputOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    Format {
        path: PathBuf,
        detail: String,
    },
    UnknownEnzyme {
        name: String,
    },
    Io(std::io::Error),
}

impl Error for RadSiteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RadSiteError::InputOpen { source, .. } => Some(source),
            RadSiteError::OutputOpen { source, .. } => Some(source),
            RadSiteError::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for RadSiteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RadSiteError::InputOpen { path, source } => {
                write!(f, "Could not open input file '{}': {source}", path.display())
            }
            RadSiteError::OutputOpen { path, source } => {
                write!(
                    f,
                    "Could not create output file '{}': {source}",
                    path.display()
                )
            }
            RadSiteError::Format { path, detail } => {
                write!(f, "Format error in '{}': {detail}", path.display())
            }
            RadSiteError::UnknownEnzyme { name } => {
                write!(f, "Enzyme '{name}' is not in the catalog")
            }
            RadSiteError::Io(source) => write!(f, "I/O error: {source}"),
        }
    }
}

impl From<std::io::Error> for RadSiteError {
    fn from(err: std::io::Error) -> Self {
        RadSiteError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RadSiteError::UnknownEnzyme {
            name: "EcoXX".to_string(),
        };
        assert_eq!(err.to_string(), "Enzyme 'EcoXX' is not in the catalog");

        let err = RadSiteError::Format {
            path: PathBuf::from("genome.fasta"),
            detail: "expected FASTA header".to_string(),
        };
        assert!(err.to_string().contains("genome.fasta"));
        assert!(err.to_string().contains("expected FASTA header"));
    }
}
