//! A builder for an [`Alignment`].

use omics::coordinate::Strand;

use crate::alignment::Alignment;
use crate::alignment::Cigar;
use crate::allele::Position;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum MissingError {
    /// No read name was provided to the [`Builder`].
    Name,

    /// No contig was provided to the [`Builder`].
    Contig,

    /// No position was provided to the [`Builder`].
    Position,

    /// No edit operations were provided to the [`Builder`].
    Cigar,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Name => write!(f, "name"),
            MissingError::Contig => write!(f, "contig"),
            MissingError::Position => write!(f, "position"),
            MissingError::Cigar => write!(f, "cigar"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error related to a [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// The number of qualities does not match the number of bases.
    QualityLength {
        /// The number of bases.
        bases: usize,
        /// The number of qualities.
        qualities: usize,
    },

    /// The edit operations consume a different number of read bases than
    /// there are bases.
    ReadLength {
        /// The number of bases.
        bases: usize,
        /// The number of read bases consumed by the edit operations.
        cigar: usize,
    },

    /// The position was negative.
    NegativePosition(Position),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::QualityLength { bases, qualities } => write!(
                f,
                "quality length mismatch: {bases} bases but {qualities} qualities"
            ),
            Error::ReadLength { bases, cigar } => write!(
                f,
                "read length mismatch: {bases} bases but the cigar consumes {cigar}"
            ),
            Error::NegativePosition(position) => {
                write!(f, "position cannot be negative: {position}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Alignment`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The read name.
    name: Option<String>,

    /// The reference sequence name.
    contig: Option<String>,

    /// The 0-based position of the first aligned base.
    position: Option<Position>,

    /// The read bases.
    bases: Vec<u8>,

    /// The encoded base qualities.
    qualities: Vec<u8>,

    /// The edit operations.
    cigar: Option<Cigar>,

    /// The mapping quality.
    mapping_quality: u8,

    /// The strand, if set.
    strand: Option<Strand>,

    /// Whether the read is one of a pair.
    paired: bool,
}

impl Builder {
    /// Sets the read name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the reference sequence name.
    pub fn contig(mut self, contig: impl Into<String>) -> Self {
        self.contig = Some(contig.into());
        self
    }

    /// Sets the 0-based position of the first aligned base.
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the read bases.
    pub fn bases(mut self, bases: impl Into<Vec<u8>>) -> Self {
        self.bases = bases.into();
        self
    }

    /// Sets the encoded (Phred + 33) base qualities.
    pub fn qualities(mut self, qualities: impl Into<Vec<u8>>) -> Self {
        self.qualities = qualities.into();
        self
    }

    /// Sets the edit operations.
    pub fn cigar(mut self, cigar: Cigar) -> Self {
        self.cigar = Some(cigar);
        self
    }

    /// Sets the mapping quality.
    pub fn mapping_quality(mut self, mapping_quality: u8) -> Self {
        self.mapping_quality = mapping_quality;
        self
    }

    /// Sets the strand. Reads are on the positive strand unless set.
    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    /// Sets whether the read is one of a pair.
    pub fn paired(mut self, paired: bool) -> Self {
        self.paired = paired;
        self
    }

    /// Consumes `self` to attempt to build an [`Alignment`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Alignment;
    /// use hhga::alignment::builder::Error;
    /// use hhga::alignment::builder::MissingError;
    ///
    /// let err = Alignment::builder().name("read0").try_build().unwrap_err();
    /// assert_eq!(err, Error::Missing(MissingError::Contig));
    /// ```
    pub fn try_build(self) -> Result<Alignment> {
        let name = self.name.ok_or(Error::Missing(MissingError::Name))?;
        let contig = self.contig.ok_or(Error::Missing(MissingError::Contig))?;
        let position = self
            .position
            .ok_or(Error::Missing(MissingError::Position))?;
        let cigar = self.cigar.ok_or(Error::Missing(MissingError::Cigar))?;

        if position < 0 {
            return Err(Error::NegativePosition(position));
        }

        if self.bases.len() != self.qualities.len() {
            return Err(Error::QualityLength {
                bases: self.bases.len(),
                qualities: self.qualities.len(),
            });
        }

        if self.bases.len() != cigar.read_length() {
            return Err(Error::ReadLength {
                bases: self.bases.len(),
                cigar: cigar.read_length(),
            });
        }

        Ok(Alignment {
            name,
            contig,
            position,
            bases: self.bases,
            qualities: self.qualities,
            cigar,
            mapping_quality: self.mapping_quality,
            strand: self.strand.unwrap_or(Strand::Positive),
            paired: self.paired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> std::result::Result<Builder, Box<dyn std::error::Error>> {
        Ok(Builder::default()
            .name("read0")
            .contig("chr1")
            .position(10)
            .cigar("4M".parse()?))
    }

    #[test]
    fn test_build() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let alignment = builder()?
            .bases("ACGT")
            .qualities("IIII")
            .mapping_quality(60)
            .strand(Strand::Negative)
            .paired(true)
            .try_build()?;

        assert_eq!(alignment.name(), "read0");
        assert_eq!(alignment.contig(), "chr1");
        assert_eq!(alignment.position(), 10);
        assert_eq!(alignment.end(), 14);
        assert_eq!(alignment.mapping_quality(), 60);
        assert_eq!(alignment.strand(), &Strand::Negative);
        assert!(alignment.is_paired());

        Ok(())
    }

    #[test]
    fn test_quality_length_mismatch() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?
            .bases("ACGT")
            .qualities("III")
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "quality length mismatch: 4 bases but 3 qualities"
        );

        Ok(())
    }

    #[test]
    fn test_read_length_mismatch() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?
            .bases("ACG")
            .qualities("III")
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "read length mismatch: 3 bases but the cigar consumes 4"
        );

        Ok(())
    }

    #[test]
    fn test_negative_position() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = builder()?
            .position(-1)
            .bases("ACGT")
            .qualities("IIII")
            .try_build()
            .unwrap_err();

        assert_eq!(err, Error::NegativePosition(-1));

        Ok(())
    }

    #[test]
    fn test_missing_fields() {
        let err = Builder::default().try_build().unwrap_err();
        assert_eq!(err.to_string(), "missing required field: name");
    }
}
