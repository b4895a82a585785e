//! Lookup of reference sequence.

use crate::allele::Position;
use crate::reference::Window;

/// An error related to looking up reference sequence.
#[derive(Debug)]
pub enum Error {
    /// No sequence has the requested name.
    NotFound(String),

    /// The requested start lies outside of the sequence.
    OutOfRange(String, Position, usize),

    /// The sequence could not be read.
    Io(std::io::Error),
}

impl Error {
    /// Whether the error concerns only the variant being processed, so that
    /// processing may continue with the next one.
    pub fn is_variant_scoped(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::OutOfRange(..))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound(name) => write!(f, "sequence not found: {name}"),
            Error::OutOfRange(name, start, length) => write!(
                f,
                "position {start} is out of range for sequence {name} of length {length}"
            ),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A store of named reference sequences.
pub trait SequenceStore {
    /// Gets `length` bases of a sequence beginning at a 0-based `start`.
    ///
    /// Requests running past the end of the sequence are truncated to it.
    fn subsequence(&self, name: &str, start: Position, length: usize) -> Result<Window, Error>;
}
