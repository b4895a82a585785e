//! Alleles, the atomic unit of a feature matrix.
//!
//! An [`Allele`] pairs the reference bases at an event with the bases that
//! were observed (or called) there. Its position lives in one of two
//! coordinate spaces, and the two are never mixed within one collection:
//!
//! - Before projection, the position is a 0-based genomic coordinate. Several
//!   alleles in a sequence may share one (e.g., a substitution and the
//!   insertion anchored on the same base).
//! - After projection, the position is a dense column index in the
//!   [projected frame](crate::projection::Map), unique within the sequence.

use std::cmp::Ordering;

use crate::quality::Probability;

/// A genomic coordinate or a dense column index.
///
/// Genomic coordinates are signed because an insertion at the very start of a
/// contig is anchored one base before it.
pub type Position = i64;

/// The alternate bases of a sentinel filling a column that lies between two
/// observations of a row (an indel column the row has no event for).
pub const GAP: &str = "U";

/// The alternate bases of a sentinel filling a column that the row does not
/// cover at all.
pub const MISSING: &str = "M";

/// An ordered list of alleles making up one row candidate.
pub type AlleleSequence = Vec<Allele>;

/// A reference/observed event at a genomic position or dense column.
#[derive(Clone, Debug, PartialEq)]
pub struct Allele {
    /// The reference bases.
    reference: String,

    /// The alternate bases.
    alternate: String,

    /// The genomic position or the dense column.
    position: Position,

    /// The confidence in the allele.
    probability: Probability,

    /// The `position:ref/alt` key used to order alleles.
    key: String,
}

impl Allele {
    /// Creates a new [`Allele`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::allele::Allele;
    ///
    /// let allele = Allele::new("A", "T", 100, 0.99);
    /// assert_eq!(allele.reference(), "A");
    /// assert_eq!(allele.alternate(), "T");
    /// assert_eq!(allele.position(), 100);
    /// assert_eq!(allele.probability(), 0.99);
    /// assert_eq!(allele.key(), "100:A/T");
    /// ```
    pub fn new(
        reference: impl Into<String>,
        alternate: impl Into<String>,
        position: Position,
        probability: Probability,
    ) -> Self {
        let reference = reference.into();
        let alternate = alternate.into();
        let key = format!("{}:{}/{}", position, reference, alternate);

        Self {
            reference,
            alternate,
            position,
            probability,
            key,
        }
    }

    /// Creates a gap sentinel at a dense column.
    pub fn gap(column: Position) -> Self {
        Self::new("", GAP, column, 1.0)
    }

    /// Creates a missing sentinel at a dense column.
    pub fn missing(column: Position) -> Self {
        Self::new("", MISSING, column, 1.0)
    }

    /// Gets the reference bases.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Gets the alternate bases.
    pub fn alternate(&self) -> &str {
        &self.alternate
    }

    /// Gets the position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Gets the confidence.
    pub fn probability(&self) -> Probability {
        self.probability
    }

    /// Gets the `position:ref/alt` key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this allele is a gap sentinel.
    pub fn is_gap(&self) -> bool {
        self.reference.is_empty() && self.alternate == GAP
    }

    /// Whether this allele is a missing sentinel.
    pub fn is_missing(&self) -> bool {
        self.reference.is_empty() && self.alternate == MISSING
    }

    /// Whether this allele is either kind of sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.is_gap() || self.is_missing()
    }

    /// Creates a copy of this allele moved to another position.
    ///
    /// Alleles are immutable values, so the key is derived anew.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::allele::Allele;
    ///
    /// let allele = Allele::new("", "G", 41, 0.5).with_position(7);
    /// assert_eq!(allele.position(), 7);
    /// assert_eq!(allele.key(), "7:/G");
    /// ```
    pub fn with_position(&self, position: Position) -> Self {
        Self::new(
            self.reference.clone(),
            self.alternate.clone(),
            position,
            self.probability,
        )
    }

    /// Totally orders two alleles by position and then by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use hhga::allele::Allele;
    ///
    /// let a = Allele::new("A", "C", 99, 1.0);
    /// let b = Allele::new("A", "C", 100, 1.0);
    /// assert_eq!(a.total_cmp(&b), Ordering::Less);
    /// ```
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.position
            .cmp(&other.position)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl std::fmt::Display for Allele {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Counts the bases across the reference and alternate sides of a sequence.
///
/// Sentinels contribute nothing to either count.
///
/// # Examples
///
/// ```
/// use hhga::allele;
/// use hhga::allele::Allele;
///
/// let sequence = vec![
///     Allele::new("A", "A", 10, 1.0),
///     Allele::new("", "T", 10, 1.0),
///     Allele::new("C", "", 11, 1.0),
/// ];
/// assert_eq!(allele::base_counts(&sequence), (2, 2));
/// ```
pub fn base_counts(sequence: &[Allele]) -> (usize, usize) {
    sequence
        .iter()
        .filter(|allele| !allele.is_sentinel())
        .fold((0, 0), |(reference, alternate), allele| {
            (
                reference + allele.reference().len(),
                alternate + allele.alternate().len(),
            )
        })
}
