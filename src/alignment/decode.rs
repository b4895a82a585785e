//! Decoding of an alignment into alleles.
//!
//! The decoder walks the edit operations of an alignment left to right with
//! two cursors, one into the read (`sp`) and one into the reference (`rp`),
//! both starting at zero. Genomic positions are `anchor + rp`, where the
//! anchor is the alignment's unclipped start.
//!
//! | Operation | Emits                                            | Advances   |
//! |-----------|--------------------------------------------------|------------|
//! | Match     | one allele per base                              | `sp`, `rp` |
//! | Insertion | one allele per inserted base, at the prior base  | `sp`       |
//! | Deletion  | one allele per deleted base, with an empty `alt` | `rp`       |
//! | SoftClip  | nothing                                          | `sp`, `rp` |
//! | Unknown   | nothing (with a warning)                         | neither    |
//!
//! Skipping unknown operations without moving either cursor desynchronizes
//! the cursors for any operation that consumes bases (e.g., `N`). This is
//! what the matrix model has always done and is kept as is.

use tracing::warn;

use crate::alignment::Alignment;
use crate::alignment::cigar::Kind;
use crate::allele::Allele;
use crate::allele::AlleleSequence;
use crate::allele::Position;
use crate::indel;
use crate::reference::Window;

/// An error related to decoding an alignment.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The alignment and the reference window are on different contigs.
    ContigMismatch(String, String),

    /// The alignment needed a reference base that the window does not cover.
    ReferenceOutOfBounds(Position),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ContigMismatch(alignment, reference) => write!(
                f,
                "alignment is on {alignment} but the reference window is on {reference}"
            ),
            Error::ReferenceOutOfBounds(position) => write!(
                f,
                "reference window does not cover position {position}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Decodes an alignment into an ordered sequence of alleles in genomic
/// coordinates.
///
/// # Examples
///
/// ```
/// use hhga::alignment;
/// use hhga::alignment::Alignment;
/// use hhga::reference::Window;
///
/// let alignment = Alignment::builder()
///     .name("read0")
///     .contig("chr1")
///     .position(2)
///     .bases("ACTTG")
///     .qualities("IIIII")
///     .cigar("2M2I1M".parse()?)
///     .try_build()?;
/// let reference = Window::new("chr1", 0, "GGACGG");
///
/// let alleles = alignment::decode(&alignment, &reference)?;
/// let keys = alleles.iter().map(|allele| allele.key()).collect::<Vec<_>>();
/// assert_eq!(keys, vec!["2:A/A", "3:C/C", "3:/T", "3:/T", "4:G/G"]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(alignment: &Alignment, reference: &Window) -> Result<AlleleSequence> {
    if alignment.contig() != reference.contig() {
        return Err(Error::ContigMismatch(
            alignment.contig().to_string(),
            reference.contig().to_string(),
        ));
    }

    let probabilities = alignment.probabilities();
    let bases = alignment.bases();
    let anchor = alignment.unclipped_start();

    let reference_base = |position: Position| {
        reference
            .base(position)
            .map(|base| char::from(base).to_string())
            .ok_or(Error::ReferenceOutOfBounds(position))
    };

    let mut alleles = AlleleSequence::new();
    let mut sp = 0usize;
    let mut rp = 0usize;

    // NOTE: the builder guarantees that the bases, the qualities, and the read
    // length of the edit operations all agree, so indexing by `sp` is in
    // bounds for every operation that consumes the read.
    for op in alignment.cigar().operations() {
        let len = op.len();

        match op.kind() {
            Kind::Match => {
                for i in 0..len {
                    let position = anchor + (rp + i) as Position;
                    alleles.push(Allele::new(
                        reference_base(position)?,
                        char::from(bases[sp + i]).to_string(),
                        position,
                        probabilities[sp + i],
                    ));
                }

                sp += len;
                rp += len;
            }
            Kind::Insertion => {
                let probability =
                    indel::representative(indel::insertion_probabilities(&probabilities, sp, len));
                let position = anchor + rp as Position - 1;

                for i in 0..len {
                    alleles.push(Allele::new(
                        "",
                        char::from(bases[sp + i]).to_string(),
                        position,
                        probability,
                    ));
                }

                sp += len;
            }
            Kind::Deletion => {
                let probability =
                    indel::representative(indel::deletion_probabilities(&probabilities, sp, len));

                for i in 0..len {
                    let position = anchor + (rp + i) as Position;
                    alleles.push(Allele::new(
                        reference_base(position)?,
                        "",
                        position,
                        probability,
                    ));
                }

                rp += len;
            }
            Kind::SoftClip => {
                sp += len;
                rp += len;
            }
            Kind::Unknown(code) => {
                warn!(
                    read = alignment.name(),
                    "skipping unrecognized edit operation {len}{code}"
                );
            }
        }
    }

    Ok(alleles)
}
