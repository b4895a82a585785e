//! Collaborators that feed the matrix pipeline.
//!
//! The core never reads files itself. Alignments, reference sequence, and
//! variants come from implementations of the traits here, which may wrap
//! indexed files or (as in [`memory`]) plain in-memory collections.

use crate::alignment::Alignment;
use crate::region::Region;
use crate::variant::Variant;

pub mod memory;
pub mod sequence;

pub use sequence::SequenceStore;

/// A source of alignments that can be queried by region.
pub trait AlignmentSource {
    /// The error returned when alignments cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Gets every alignment overlapping a region.
    ///
    /// An alignment overlaps the region if any reference position from its
    /// unclipped start to its end lies inside it.
    fn alignments_in_region(&mut self, region: &Region) -> Result<Vec<Alignment>, Self::Error>;
}

/// A stream of candidate variants.
pub trait VariantSource {
    /// The error returned when a variant cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Gets the next variant, or `None` at the end of the stream.
    fn next_variant(&mut self) -> Result<Option<Variant>, Self::Error>;
}
