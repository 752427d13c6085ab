use std::fmt::{self, Debug, Display};

pub enum Error {
    InvalidNucleotide(char),
    InvalidAnnotation(char),
    UnknownCodon(String, &'static str),
    TruncatedCodon(usize),
    LengthMismatch(usize, usize),
    SequenceTooShort(usize, usize),
    EmptySequence,
    DegenerateColumn(usize),
    BundleShape(String),
    EmptyFasta(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidNucleotide(symbol) => {
                write!(f, "Invalid Nucleotide Symbol: {:?}", symbol)
            }
            Error::InvalidAnnotation(symbol) => {
                write!(f, "Invalid Annotation Symbol: {:?}", symbol)
            }
            Error::UnknownCodon(codon, role) => {
                write!(f, "Unknown Codon: {} is not a {} codon", codon, role)
            }
            Error::TruncatedCodon(position) => {
                write!(f, "Truncated Codon: run at position {} overruns the sequence", position)
            }
            Error::LengthMismatch(found, expected) => {
                write!(f, "Mismatched Lengths: Found {}, expected {}", found, expected)
            }
            Error::SequenceTooShort(found, minimum) => {
                write!(f, "Sequence Too Short: Found {}, need at least {}", found, minimum)
            }
            Error::EmptySequence => write!(f, "Empty Sequence"),
            Error::DegenerateColumn(position) => write!(
                f,
                "Degenerate Probabilities: no reachable state at position {}",
                position
            ),
            Error::BundleShape(msg) => write!(f, "Bad Parameter Bundle: {}", msg),
            Error::EmptyFasta(path) => write!(f, "No Sequences Found: {}", path),
            Error::Io(err) => Display::fmt(err, f),
            Error::Json(err) => Display::fmt(err, f),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl From<std::io::Error> for Error {
    fn from(io_error: std::io::Error) -> Self {
        Self::Io(io_error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Self {
        Self::Json(json_error)
    }
}
