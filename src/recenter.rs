//! Clipping projected sequences to a fixed-width frame around a variant.
//!
//! After [projection](crate::projection), rows cover different stretches of
//! the dense column space and may skip columns (an indel column that a row
//! has no event for). Recentering cuts every row down to the same
//! `window_width` columns and fills every column the row does not observe
//! with a sentinel:
//!
//! - a [gap](crate::allele::GAP) between two observed columns, and
//! - a [missing](crate::allele::MISSING) before the first or after the last.

use nonempty::NonEmpty;

use crate::allele::Allele;
use crate::allele::Position;
use crate::projection::Map;

/// A fixed-width row of alleles, one per column of a [`Frame`].
pub type Row = NonEmpty<Allele>;

/// An error related to recentering.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The variant's anchor position has no column in the projection map.
    MissingAnchor(Position),

    /// A sequence has no allele inside the frame.
    EmptyRow,

    /// A frame was requested with a width of zero.
    ZeroWidth,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingAnchor(position) => {
                write!(f, "no column for anchor position {position}")
            }
            Error::EmptyRow => write!(f, "sequence has no alleles within the frame"),
            Error::ZeroWidth => write!(f, "window width must be greater than zero"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A half-open range of dense columns, `[low, high)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame {
    /// The first column.
    low: Position,

    /// The column after the last.
    high: Position,
}

impl Frame {
    /// Creates a frame of `width` columns centered on the rank `0` column of
    /// a genomic position.
    ///
    /// The frame never starts before column `0`, so a variant near the start
    /// of the projected space is off-center.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::allele::Allele;
    /// use hhga::projection::Map;
    /// use hhga::recenter::Frame;
    ///
    /// let mut builder = Map::builder();
    /// builder.push(
    ///     &(95..106)
    ///         .map(|p| Allele::new("A", "A", p, 1.0))
    ///         .collect::<Vec<_>>(),
    /// )?;
    /// let map = builder.build();
    ///
    /// let frame = Frame::new(&map, 5, 100)?;
    /// assert_eq!(frame.low(), 3);
    /// assert_eq!(frame.high(), 8);
    ///
    /// let frame = Frame::new(&map, 5, 96)?;
    /// assert_eq!(frame.low(), 0);
    /// assert_eq!(frame.high(), 5);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(map: &Map, width: usize, anchor: Position) -> Result<Self> {
        if width == 0 {
            return Err(Error::ZeroWidth);
        }

        let center = map.get(anchor, 0).ok_or(Error::MissingAnchor(anchor))? as Position;
        let width = width as Position;
        let low = (center - width / 2).max(0);

        Ok(Self {
            low,
            high: low + width,
        })
    }

    /// Gets the first column.
    pub fn low(&self) -> Position {
        self.low
    }

    /// Gets the column after the last.
    pub fn high(&self) -> Position {
        self.high
    }

    /// Gets the number of columns.
    pub fn width(&self) -> usize {
        (self.high - self.low) as usize
    }

    /// Whether a column lies inside the frame.
    pub fn contains(&self, column: Position) -> bool {
        column >= self.low && column < self.high
    }
}

/// Clips a projected sequence to a frame and pads it to the frame's width.
///
/// The sequence's positions must be dense columns in strictly increasing
/// order, as produced by [`Map::project()`].
///
/// # Examples
///
/// ```
/// use hhga::allele::Allele;
/// use hhga::projection::Map;
/// use hhga::recenter;
/// use hhga::recenter::Frame;
///
/// let reference = (0..10)
///     .map(|p| Allele::new("A", "A", p, 1.0))
///     .collect::<Vec<_>>();
///
/// let mut builder = Map::builder();
/// builder.push(&reference)?;
/// let map = builder.build();
///
/// // A sequence covering only columns 4 and 6.
/// let sequence = vec![Allele::new("A", "C", 4, 0.9), Allele::new("A", "A", 6, 0.9)];
///
/// let row = recenter::recenter(&sequence, &Frame::new(&map, 6, 5)?)?;
/// let alternates = row.iter().map(|a| a.alternate()).collect::<Vec<_>>();
/// assert_eq!(alternates, vec!["M", "M", "C", "U", "A", "M"]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn recenter(sequence: &[Allele], frame: &Frame) -> Result<Row> {
    let kept = sequence
        .iter()
        .filter(|allele| frame.contains(allele.position()))
        .collect::<Vec<_>>();

    let (first, last) = match (kept.first(), kept.last()) {
        (Some(first), Some(last)) => (first.position(), last.position()),
        _ => return Err(Error::EmptyRow),
    };

    let mut row = Vec::with_capacity(frame.width());
    row.extend((frame.low..first).map(Allele::missing));

    let mut next = first;

    for allele in kept {
        row.extend((next..allele.position()).map(Allele::gap));
        row.push(allele.clone());
        next = allele.position() + 1;
    }

    row.extend((last + 1..frame.high).map(Allele::missing));

    NonEmpty::from_vec(row).ok_or(Error::EmptyRow)
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;
    use crate::alignment::Alignment;
    use crate::alignment::decode;
    use crate::projection;
    use crate::reference::Window;

    fn alternates(row: &Row) -> Vec<&str> {
        row.iter().map(Allele::alternate).collect()
    }

    fn columns(row: &Row) -> Vec<Position> {
        row.iter().map(Allele::position).collect()
    }

    #[test]
    fn test_rows_have_fixed_width() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let mut sequences = Vec::new();

            for _ in 0..rng.gen_range(1..6) {
                let start = rng.gen_range(90..100);
                let end = rng.gen_range(101..110);
                let mut sequence = Vec::new();

                for position in start..end {
                    sequence.push(Allele::new("A", "A", position, 1.0));

                    if rng.gen_bool(0.1) {
                        sequence.push(Allele::new("", "T", position, 1.0));
                    }
                }

                sequences.push(sequence);
            }

            let (map, projected) = projection::project(&sequences)?;
            let width = rng.gen_range(1..40);
            let frame = Frame::new(&map, width, 100)?;

            for sequence in projected {
                let row = recenter(&sequence, &frame)?;
                assert_eq!(row.len(), width);
                assert_eq!(
                    columns(&row),
                    (frame.low()..frame.high()).collect::<Vec<_>>()
                );
            }
        }

        Ok(())
    }

    #[test]
    fn test_matches_only() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let reference = Window::new("chr1", 96, "GGACGTACC");
        let alignment = Alignment::builder()
            .name("read")
            .contig("chr1")
            .position(98)
            .bases("ACGTACC")
            .qualities("IIIIIII")
            .cigar("7M".parse()?)
            .try_build()?;

        let sequences = vec![
            reference.alleles(98, 103),
            decode(&alignment, &reference)?,
        ];

        let (map, projected) = projection::project(&sequences)?;
        let frame = Frame::new(&map, 5, 100)?;

        let reference_row = recenter(&projected[0], &frame)?;
        let alignment_row = recenter(&projected[1], &frame)?;

        assert_eq!(alternates(&reference_row), vec!["A", "C", "G", "T", "A"]);
        assert_eq!(alternates(&alignment_row), vec!["A", "C", "G", "T", "A"]);
        assert!(alignment_row.iter().all(|allele| !allele.is_sentinel()));

        Ok(())
    }

    #[test]
    fn test_insertion_gaps() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let reference = Window::new("chr1", 96, "GGACGTACC");
        let alignment = Alignment::builder()
            .name("read")
            .contig("chr1")
            .position(98)
            .bases("ACGTTTACC")
            .qualities("IIIIIIIII")
            .cigar("3M2I4M".parse()?)
            .try_build()?;

        let sequences = vec![
            reference.alleles(98, 103),
            decode(&alignment, &reference)?,
        ];

        let (map, projected) = projection::project(&sequences)?;
        assert_eq!(map.depth(100), 3);

        let frame = Frame::new(&map, 7, 100)?;

        let reference_row = recenter(&projected[0], &frame)?;
        assert_eq!(
            alternates(&reference_row),
            vec!["A", "C", "G", "U", "U", "T", "A"]
        );

        let alignment_row = recenter(&projected[1], &frame)?;
        assert_eq!(
            alternates(&alignment_row),
            vec!["A", "C", "G", "T", "T", "T", "A"]
        );

        Ok(())
    }

    #[test]
    fn test_partial_coverage_is_missing() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let reference = Window::new("chr1", 90, "ACGTACGTACGTACGTACGT");
        let alignment = Alignment::builder()
            .name("read")
            .contig("chr1")
            .position(101)
            .bases("TACG")
            .qualities("IIII")
            .cigar("4M".parse()?)
            .try_build()?;

        let sequences = vec![
            reference.alleles(90, 110),
            decode(&alignment, &reference)?,
        ];

        let (map, projected) = projection::project(&sequences)?;
        let frame = Frame::new(&map, 11, 100)?;
        let row = recenter(&projected[1], &frame)?;

        let missing = row.iter().filter(|allele| allele.is_missing()).count();
        let observed = row.iter().filter(|allele| !allele.is_missing()).count();

        assert_eq!(row.len(), 11);
        assert_eq!(observed, 4);
        assert_eq!(missing, 11 - observed);
        assert!(row.first().is_missing());
        assert!(row.last().is_missing());

        Ok(())
    }

    #[test]
    fn test_errors() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let (map, _) = projection::project(&[vec![Allele::new("A", "A", 10, 1.0)]])?;

        assert_eq!(Frame::new(&map, 0, 10), Err(Error::ZeroWidth));
        assert_eq!(
            Frame::new(&map, 3, 11).unwrap_err().to_string(),
            "no column for anchor position 11"
        );

        let frame = Frame::new(&map, 3, 10)?;
        let err = recenter(&[Allele::new("A", "A", 50, 1.0)], &frame).unwrap_err();
        assert_eq!(err, Error::EmptyRow);
        assert!(recenter(&[], &frame).is_err());

        Ok(())
    }
}
