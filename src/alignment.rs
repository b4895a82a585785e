//! Mapped sequencing alignments.

pub use omics::coordinate::Strand;

use crate::allele::Position;
use crate::quality;
use crate::quality::Probability;

pub mod builder;
pub mod cigar;
pub mod decode;

pub use builder::Builder;
pub use cigar::Cigar;
pub use decode::decode;

/// A stable identifier assigned to an alignment when it is ingested for a
/// variant.
///
/// Allele sequences are associated with their alignment through this
/// identifier rather than through the alignment itself.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(usize);

impl Id {
    /// Creates a new [`Id`].
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    /// Gets the inner value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mapped read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alignment {
    /// The read name.
    name: String,

    /// The name of the reference sequence the read is mapped to.
    contig: String,

    /// The 0-based position of the first aligned (non-clipped) base.
    position: Position,

    /// The read bases.
    bases: Vec<u8>,

    /// The encoded base qualities (Phred + 33).
    qualities: Vec<u8>,

    /// The edit operations.
    cigar: Cigar,

    /// The mapping quality.
    mapping_quality: u8,

    /// The strand.
    strand: Strand,

    /// Whether the read is one of a pair.
    paired: bool,
}

impl Alignment {
    /// Gets a [`Builder`] for an [`Alignment`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the read name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the reference sequence name.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the 0-based position of the first aligned base.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Gets the read bases.
    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    /// Gets the encoded base qualities.
    pub fn qualities(&self) -> &[u8] {
        &self.qualities
    }

    /// Gets the edit operations.
    pub fn cigar(&self) -> &Cigar {
        &self.cigar
    }

    /// Gets the mapping quality.
    pub fn mapping_quality(&self) -> u8 {
        self.mapping_quality
    }

    /// Gets the strand the read is mapped to.
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Whether the read is one of a pair.
    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Gets the position that the first read base (including any leading
    /// soft clip) would occupy on the reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Alignment;
    ///
    /// let alignment = Alignment::builder()
    ///     .name("read0")
    ///     .contig("chr1")
    ///     .position(100)
    ///     .bases("AAACCCC")
    ///     .qualities("IIIIIII")
    ///     .cigar("3S4M".parse()?)
    ///     .try_build()?;
    ///
    /// assert_eq!(alignment.unclipped_start(), 97);
    /// assert_eq!(alignment.end(), 104);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn unclipped_start(&self) -> Position {
        self.position - self.cigar.leading_soft_clip() as Position
    }

    /// Gets the exclusive end of the aligned bases on the reference.
    pub fn end(&self) -> Position {
        self.position + self.cigar.reference_span() as Position
    }

    /// Gets the per-base confidences derived from the base qualities.
    pub fn probabilities(&self) -> Vec<Probability> {
        quality::confidences(&self.qualities)
    }

    /// Gets the confidence that the read is correctly mapped.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Alignment;
    ///
    /// let alignment = Alignment::builder()
    ///     .name("read0")
    ///     .contig("chr1")
    ///     .position(0)
    ///     .bases("A")
    ///     .qualities("I")
    ///     .cigar("1M".parse()?)
    ///     .mapping_quality(20)
    ///     .try_build()?;
    ///
    /// assert!((alignment.mapping_probability() - 0.99).abs() < 1e-12);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn mapping_probability(&self) -> Probability {
        1.0 - quality::phred_to_probability(f64::from(self.mapping_quality))
    }
}
