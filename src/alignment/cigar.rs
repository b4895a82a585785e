//! Edit operations describing how an alignment's bases line up against the
//! reference.

use std::num::ParseIntError;
use std::str::FromStr;

/// The kind of an edit operation.
///
/// Only the operations that the allele decoder understands get their own
/// variant. Every other operation code is carried as [`Kind::Unknown`] so that
/// the decoder can report and skip it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// An alignment match or mismatch (`M`, `=`, or `X`).
    Match,
    /// An insertion to the reference (`I`).
    Insertion,
    /// A deletion from the reference (`D`).
    Deletion,
    /// A soft clip (`S`).
    SoftClip,
    /// Any other operation code (e.g., `H`, `N`, or `P`).
    Unknown(char),
}

impl Kind {
    /// Whether the operation consumes read bases.
    pub fn consumes_read(&self) -> bool {
        matches!(self, Kind::Match | Kind::Insertion | Kind::SoftClip)
    }

    /// Whether the operation consumes reference bases.
    pub fn consumes_reference(&self) -> bool {
        matches!(self, Kind::Match | Kind::Deletion)
    }
}

impl From<char> for Kind {
    fn from(c: char) -> Self {
        match c {
            'M' | '=' | 'X' => Kind::Match,
            'I' => Kind::Insertion,
            'D' => Kind::Deletion,
            'S' => Kind::SoftClip,
            c => Kind::Unknown(c),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Match => write!(f, "M"),
            Kind::Insertion => write!(f, "I"),
            Kind::Deletion => write!(f, "D"),
            Kind::SoftClip => write!(f, "S"),
            Kind::Unknown(c) => write!(f, "{c}"),
        }
    }
}

/// A run of a single kind of edit operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Operation {
    /// The kind.
    kind: Kind,

    /// The run length.
    len: usize,
}

impl Operation {
    /// Creates a new [`Operation`].
    pub fn new(kind: Kind, len: usize) -> Self {
        Self { kind, len }
    }

    /// Gets the kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Gets the run length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the run is zero-length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An error related to the parsing of a CIGAR string.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An operation code was not preceded by a run length.
    MissingLength(usize),

    /// A run length could not be parsed.
    InvalidLength(ParseIntError),

    /// The string ended with a run length but no operation code.
    TrailingLength(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingLength(offset) => {
                write!(f, "missing run length for operation at offset {offset}")
            }
            ParseError::InvalidLength(err) => write!(f, "invalid run length: {err}"),
            ParseError::TrailingLength(value) => {
                write!(f, "run length {value} is not followed by an operation")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The ordered edit operations of an alignment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Cigar(Vec<Operation>);

impl Cigar {
    /// Gets the operations.
    pub fn operations(&self) -> &[Operation] {
        &self.0
    }

    /// Gets the number of reference bases spanned by the operations.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Cigar;
    ///
    /// let cigar = "2S5M1I2D3M".parse::<Cigar>()?;
    /// assert_eq!(cigar.reference_span(), 10);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn reference_span(&self) -> usize {
        self.0
            .iter()
            .filter(|op| op.kind().consumes_reference())
            .map(Operation::len)
            .sum()
    }

    /// Gets the number of read bases consumed by the operations.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Cigar;
    ///
    /// let cigar = "2S5M1I2D3M".parse::<Cigar>()?;
    /// assert_eq!(cigar.read_length(), 11);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_length(&self) -> usize {
        self.0
            .iter()
            .filter(|op| op.kind().consumes_read())
            .map(Operation::len)
            .sum()
    }

    /// Gets the number of soft-clipped bases.
    pub fn soft_clipped(&self) -> usize {
        self.0
            .iter()
            .filter(|op| op.kind() == Kind::SoftClip)
            .map(Operation::len)
            .sum()
    }

    /// Gets the length of the soft clip that leads the alignment, skipping
    /// any operations that consume nothing (e.g., a hard clip).
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Cigar;
    ///
    /// assert_eq!("5H3S10M".parse::<Cigar>()?.leading_soft_clip(), 3);
    /// assert_eq!("10M3S".parse::<Cigar>()?.leading_soft_clip(), 0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn leading_soft_clip(&self) -> usize {
        self.0
            .iter()
            .skip_while(|op| matches!(op.kind(), Kind::Unknown(_)))
            .take_while(|op| op.kind() == Kind::SoftClip)
            .map(Operation::len)
            .sum()
    }
}

impl From<Vec<Operation>> for Cigar {
    fn from(operations: Vec<Operation>) -> Self {
        Self(operations)
    }
}

impl FromIterator<Operation> for Cigar {
    fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Cigar {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Self::default());
        }

        let mut operations = Vec::new();
        let mut start = 0;

        for (i, c) in s.char_indices() {
            if c.is_ascii_digit() {
                continue;
            }

            if start == i {
                return Err(ParseError::MissingLength(i));
            }

            let len = s[start..i].parse().map_err(ParseError::InvalidLength)?;
            operations.push(Operation::new(Kind::from(c), len));
            start = i + c.len_utf8();
        }

        if start != s.len() {
            return Err(ParseError::TrailingLength(s[start..].to_string()));
        }

        Ok(Self(operations))
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "*");
        }

        for op in &self.0 {
            write!(f, "{}{}", op.len(), op.kind())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cigar() -> Result<(), Box<dyn std::error::Error>> {
        let cigar = "3S10M2I1D4M1H".parse::<Cigar>()?;

        assert_eq!(
            cigar.operations(),
            &[
                Operation::new(Kind::SoftClip, 3),
                Operation::new(Kind::Match, 10),
                Operation::new(Kind::Insertion, 2),
                Operation::new(Kind::Deletion, 1),
                Operation::new(Kind::Match, 4),
                Operation::new(Kind::Unknown('H'), 1),
            ]
        );
        assert_eq!(cigar.to_string(), "3S10M2I1D4M1H");
        assert_eq!(cigar.soft_clipped(), 3);

        Ok(())
    }

    #[test]
    fn test_sequence_match_and_mismatch_are_matches() -> Result<(), Box<dyn std::error::Error>> {
        let cigar = "4=1X".parse::<Cigar>()?;
        assert_eq!(cigar.operations()[0].kind(), Kind::Match);
        assert_eq!(cigar.operations()[1].kind(), Kind::Match);
        assert_eq!(cigar.reference_span(), 5);
        Ok(())
    }

    #[test]
    fn test_empty_cigar() -> Result<(), Box<dyn std::error::Error>> {
        let cigar = "*".parse::<Cigar>()?;
        assert!(cigar.operations().is_empty());
        assert_eq!(cigar.to_string(), "*");
        Ok(())
    }

    #[test]
    fn test_invalid_cigars() {
        let err = "M10".parse::<Cigar>().unwrap_err();
        assert_eq!(err.to_string(), "missing run length for operation at offset 0");

        let err = "10M5".parse::<Cigar>().unwrap_err();
        assert_eq!(err.to_string(), "run length 5 is not followed by an operation");

        let err = "99999999999999999999999M".parse::<Cigar>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidLength(_)));
    }
}
