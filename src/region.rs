//! Genomic regions.
//!
//! Regions are written as `contig[:start[-end]]`, with `..` accepted in place
//! of `-`. Coordinates are 0-based and the end is exclusive.
//!
//! | Region string        | Selects                          |
//! |----------------------|----------------------------------|
//! | `chr1`               | all of `chr1`                    |
//! | `chr1:100`           | `[100, 101)`                     |
//! | `chr1:100-200`       | `[100, 200)`                     |
//! | `chr1:100..200`      | `[100, 200)`                     |
//! | `chr1:100-`          | `[100, end of chr1)`             |

use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::LazyLock;

use omics::coordinate::Contig;
use regex::Regex;

use crate::allele::Position;

/// The pattern a region string must match.
static REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<contig>[^:]+)(?::(?P<start>[0-9]+)(?:(?P<sep>-|\.\.)(?P<end>[0-9]*))?)?$")
        .unwrap()
});

/// An error related to parsing a [`Region`].
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The string does not have the form of a region.
    InvalidFormat(String),

    /// A coordinate could not be parsed.
    InvalidPosition(ParseIntError),

    /// The end of the range comes before its start.
    InvalidRange(Position, Position),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidFormat(s) => write!(f, "invalid region: {s}"),
            ParseError::InvalidPosition(err) => write!(f, "invalid position: {err}"),
            ParseError::InvalidRange(start, end) => {
                write!(f, "region end {end} is before its start {start}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A half-open range on a named reference sequence.
///
/// Positions are signed so that a region can be compared directly against
/// anchors and alignment spans, and the end may be left open.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Region {
    /// The reference sequence.
    contig: Contig,

    /// The 0-based start.
    start: Position,

    /// The exclusive end, or `None` for the end of the sequence.
    end: Option<Position>,
}

impl Region {
    /// Creates a new [`Region`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::region::Region;
    ///
    /// let region = Region::new("chr1", 10, Some(20));
    /// assert_eq!(region.contig(), "chr1");
    /// assert_eq!(region.start(), 10);
    /// assert_eq!(region.end(), Some(20));
    /// assert!(region.contains(19));
    /// assert!(!region.contains(20));
    /// ```
    pub fn new(contig: impl Into<String>, start: Position, end: Option<Position>) -> Self {
        let contig: String = contig.into();

        Self {
            contig: Contig::from(contig),
            start,
            end,
        }
    }

    /// Gets the name of the reference sequence.
    pub fn contig(&self) -> &str {
        self.contig.as_str()
    }

    /// Gets the 0-based start.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the exclusive end, if the region does not run to the end of the
    /// sequence.
    pub fn end(&self) -> Option<Position> {
        self.end
    }

    /// Whether a 0-based position lies inside the region.
    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && self.end.map_or(true, |end| position < end)
    }
}

impl FromStr for Region {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = REGEX
            .captures(s)
            .ok_or_else(|| ParseError::InvalidFormat(s.to_string()))?;

        // SAFETY: the `contig` group is not optional in the pattern.
        let contig = captures.name("contig").unwrap().as_str();

        let start = match captures.name("start") {
            Some(start) => start
                .as_str()
                .parse::<Position>()
                .map_err(ParseError::InvalidPosition)?,
            None => return Ok(Region::new(contig, 0, None)),
        };

        let end = match (captures.name("sep"), captures.name("end")) {
            (None, _) => Some(start + 1),
            (Some(_), Some(end)) if !end.as_str().is_empty() => Some(
                end.as_str()
                    .parse::<Position>()
                    .map_err(ParseError::InvalidPosition)?,
            ),
            (Some(_), _) => None,
        };

        if let Some(end) = end {
            if end < start {
                return Err(ParseError::InvalidRange(start, end));
            }
        }

        Ok(Region::new(contig, start, end))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let contig = self.contig.as_str();

        match self.end {
            Some(end) => write!(f, "{contig}:{}-{end}", self.start),
            None if self.start == 0 => write!(f, "{contig}"),
            None => write!(f, "{contig}:{}-", self.start),
        }
    }
}
