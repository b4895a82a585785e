//! Projection of allele sequences onto a shared, dense column frame.
//!
//! Rows of a feature matrix disagree about how many columns a genomic
//! position needs: a row with a two-base insertion after position `p` needs
//! three columns there, while the reference needs one. The projection
//! [`Map`] gives every genomic position as many columns as the deepest row
//! needs and numbers all columns densely from zero, so that each `(position,
//! rank)` pair of every row lands in a column of its own.
//!
//! The rank of an allele is its index among the alleles of its row sharing
//! its genomic position. Rank `0` is the substitution/deletion slot, so an
//! insertion never takes rank `0`: a row that inserts bases after a position
//! without observing the position itself starts its insertion at rank `1`.
//!
//! ```text
//!  position      99    100   100   100   101
//!  rank           0     0     1     2     0
//!  column         0     1     2     3     4
//!  -----------------------------------------
//!  reference      A     C                 G
//!  alignment      A     C     T     T     G
//!  haplotype                  TT
//! ```

use std::collections::BTreeMap;

use crate::allele::Allele;
use crate::allele::AlleleSequence;
use crate::allele::Position;

pub mod builder;

pub use builder::Builder;

/// An error related to projecting a sequence.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An allele's genomic position precedes that of the allele before it.
    OutOfOrder(Position, Position),

    /// A `(position, rank)` pair has no column in the map.
    Unmapped(Position, usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfOrder(previous, position) => write!(
                f,
                "alleles out of order: position {position} follows position {previous}"
            ),
            Error::Unmapped(position, rank) => {
                write!(f, "no column for position {position} at rank {rank}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Computes the `(position, rank)` pair of every allele in a sequence.
///
/// # Examples
///
/// ```
/// use hhga::allele::Allele;
/// use hhga::projection;
///
/// let sequence = vec![
///     Allele::new("C", "C", 100, 1.0),
///     Allele::new("", "T", 100, 1.0),
///     Allele::new("", "T", 100, 1.0),
///     Allele::new("", "A", 101, 1.0),
/// ];
///
/// assert_eq!(
///     projection::ranks(&sequence)?,
///     vec![(100, 0), (100, 1), (100, 2), (101, 1)]
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn ranks(sequence: &[Allele]) -> Result<Vec<(Position, usize)>> {
    let mut result = Vec::with_capacity(sequence.len());
    let mut previous: Option<Position> = None;
    let mut rank = 0;

    for allele in sequence {
        let position = allele.position();

        match previous {
            Some(p) if position < p => return Err(Error::OutOfOrder(p, position)),
            Some(p) if position == p => {}
            _ => rank = 0,
        }

        if rank == 0 && allele.reference().is_empty() {
            rank = 1;
        }

        result.push((position, rank));
        previous = Some(position);
        rank += 1;
    }

    Ok(result)
}

/// A mapping from `(genomic position, rank)` to a dense column index.
///
/// Columns are assigned in ascending `(position, rank)` order and form a
/// bijection onto `0..width`. A map is built fresh for each variant with a
/// [`Builder`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Map {
    /// The columns keyed by `(position, rank)`.
    columns: BTreeMap<(Position, usize), usize>,
}

impl Map {
    /// Gets a [`Builder`] for a [`Map`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the column of a `(position, rank)` pair.
    pub fn get(&self, position: Position, rank: usize) -> Option<usize> {
        self.columns.get(&(position, rank)).copied()
    }

    /// Gets the total number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Whether the map has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets the number of columns allocated to a genomic position.
    pub fn depth(&self, position: Position) -> usize {
        self.columns
            .range((position, 0)..=(position, usize::MAX))
            .count()
    }

    /// Iterates over `((position, rank), column)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = ((Position, usize), usize)> + '_ {
        self.columns.iter().map(|(key, column)| (*key, *column))
    }

    /// Rewrites the positions of a sequence from genomic coordinates to
    /// columns.
    ///
    /// The returned sequence has strictly increasing positions.
    pub fn project(&self, sequence: &[Allele]) -> Result<AlleleSequence> {
        sequence
            .iter()
            .zip(ranks(sequence)?)
            .map(|(allele, (position, rank))| {
                let column = self
                    .get(position, rank)
                    .ok_or(Error::Unmapped(position, rank))?;
                Ok(allele.with_position(column as Position))
            })
            .collect()
    }
}

/// Builds the projection map of a collection of sequences and rewrites every
/// sequence into it.
///
/// # Examples
///
/// ```
/// use hhga::allele::Allele;
/// use hhga::projection;
///
/// let reference = vec![
///     Allele::new("C", "C", 100, 1.0),
///     Allele::new("G", "G", 101, 1.0),
/// ];
/// let alignment = vec![
///     Allele::new("C", "C", 100, 0.9),
///     Allele::new("", "T", 100, 0.8),
///     Allele::new("G", "G", 101, 0.9),
/// ];
///
/// let (map, projected) = projection::project(&[reference, alignment])?;
///
/// assert_eq!(map.width(), 3);
/// assert_eq!(map.get(100, 1), Some(1));
///
/// let columns = projected[0].iter().map(|a| a.position()).collect::<Vec<_>>();
/// assert_eq!(columns, vec![0, 2]);
///
/// let columns = projected[1].iter().map(|a| a.position()).collect::<Vec<_>>();
/// assert_eq!(columns, vec![0, 1, 2]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn project(sequences: &[AlleleSequence]) -> Result<(Map, Vec<AlleleSequence>)> {
    let mut builder = Map::builder();

    for sequence in sequences {
        builder.push(sequence)?;
    }

    let map = builder.build();
    let projected = sequences
        .iter()
        .map(|sequence| map.project(sequence))
        .collect::<Result<Vec<_>>>()?;

    Ok((map, projected))
}
