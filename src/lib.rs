//! `hhga` is a crate for turning sequencing alignments around candidate
//! variants into fixed-width, column-aligned feature matrices for training
//! variant classifiers.
//!
//! For each variant, the crate builds one row for the reference, one row for
//! each haplotype called in the variant's samples, and one row for each
//! alignment overlapping the variant. Every row is a sequence of
//! [alleles](crate::allele::Allele): a pair of reference and observed bases
//! at a position, with a confidence.
//!
//! ## From alignments to alleles
//!
//! An [`Alignment`](crate::alignment::Alignment) is
//! [decoded](crate::alignment::decode()) by walking its CIGAR against a
//! [reference window](crate::reference::Window). Matches emit one allele per
//! base with a confidence taken from the base quality (see [`quality`]).
//! Insertions and deletions emit one allele per base with a single confidence
//! borrowed from the base qualities around the event (see [`indel`]).
//!
//! Haplotype rows come from the variant alone: the
//! [haplotype reconstructor](crate::haplotype) turns each called allele of a
//! sample's genotype into a sequence of alleles.
//!
//! ## Projection and recentering
//!
//! Rows disagree on how many columns a genomic position needs, because an
//! insertion in one row has no counterpart in the others. The
//! [projection map](crate::projection::Map) gives every position as many
//! columns as the deepest row needs, and every row is rewritten into those
//! shared columns. Each row is then [recentered](crate::recenter) onto a
//! fixed number of columns around the variant, with sentinel alleles filling
//! the columns a row does not observe.
//!
//! ## Assembling matrices
//!
//! Most users will want [`matrix::build()`], which runs all of the above for
//! one variant, or the [`Pipeline`](crate::pipeline::Pipeline), which does so
//! for a stream of variants read from [sources](crate::source).
//!
//! ```
//! use hhga::alignment::Alignment;
//! use hhga::matrix;
//! use hhga::matrix::Config;
//! use hhga::matrix::Format;
//! use hhga::reference::Window;
//! use hhga::variant::Variant;
//!
//! let reference = Window::new("chr1", 0, "ACGTACGTAC");
//! let variant = Variant::new("chr1", 5, "A", ["AT"]).with_sample("s0", "0/1");
//!
//! let alignment = Alignment::builder()
//!     .name("read0")
//!     .contig("chr1")
//!     .position(2)
//!     .bases("GTATCGT")
//!     .qualities("IIIIIII")
//!     .cigar("3M1I3M".parse()?)
//!     .try_build()?;
//!
//! let config = Config::default().with_window_width(6).with_label("1");
//! let matrix = matrix::build(&[alignment], &variant, &reference, &config)?;
//!
//! let mut buffer = Vec::new();
//! matrix::render::write(&mut buffer, &matrix, Format::Text)?;
//!
//! assert_eq!(
//!     String::from_utf8(buffer)?,
//!     "chr1:5 1\n\
//!      reference CGTAUC\n\
//!      haplotype MMMAMM\n\
//!      haplotype MMMMTM\n\
//!      alignment MGTATC\n"
//! );
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod allele;
pub mod haplotype;
pub mod indel;
pub mod matrix;
pub mod pipeline;
pub mod projection;
pub mod quality;
pub mod recenter;
pub mod reference;
pub mod region;
pub mod source;
pub mod variant;

pub use alignment::Alignment;
pub use allele::Allele;
pub use matrix::Matrix;
pub use pipeline::Pipeline;
pub use variant::Variant;
