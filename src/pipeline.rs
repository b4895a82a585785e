//! The per-variant driver.
//!
//! A [`Pipeline`] pulls variants from a [`VariantSource`], gathers the
//! alignments and reference sequence around each one, assembles its
//! [`Matrix`], and hands the matrix to a caller-supplied sink.
//!
//! Each variant is processed independently of every other. A variant whose
//! reference sequence is missing (or out of range) is skipped with a warning;
//! every other error ends the run.

use tracing::debug;
use tracing::warn;

use crate::allele::Position;
use crate::matrix;
use crate::matrix::Config;
use crate::matrix::Matrix;
use crate::region::Region;
use crate::source::AlignmentSource;
use crate::source::SequenceStore;
use crate::source::VariantSource;
use crate::source::sequence;
use crate::variant::Variant;

/// An error related to running the pipeline.
#[derive(Debug)]
pub enum Error {
    /// The alignments could not be read.
    Alignments(Box<dyn std::error::Error + Send + Sync>),

    /// The variants could not be read.
    Variants(Box<dyn std::error::Error + Send + Sync>),

    /// The reference sequence could not be read.
    Sequence(sequence::Error),

    /// A matrix could not be assembled.
    Matrix(matrix::Error),

    /// The sink failed to accept a matrix.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Alignments(err) => write!(f, "alignment error: {err}"),
            Error::Variants(err) => write!(f, "variant error: {err}"),
            Error::Sequence(err) => write!(f, "sequence error: {err}"),
            Error::Matrix(err) => write!(f, "matrix error: {err}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A driver that turns a stream of variants into matrices.
#[derive(Debug)]
pub struct Pipeline<A, S, V> {
    /// The alignments.
    alignments: A,

    /// The reference sequence.
    sequences: S,

    /// The variants.
    variants: V,

    /// The matrix settings.
    config: Config,

    /// The region variants must fall in, if any.
    region: Option<Region>,
}

impl<A, S, V> Pipeline<A, S, V>
where
    A: AlignmentSource,
    S: SequenceStore,
    V: VariantSource,
{
    /// Creates a new [`Pipeline`].
    pub fn new(alignments: A, sequences: S, variants: V, config: Config) -> Self {
        Self {
            alignments,
            sequences,
            variants,
            config,
            region: None,
        }
    }

    /// Restricts the run to variants whose anchor falls in a region.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Gets the matrix settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a variant falls in the region, if there is one.
    fn selects(&self, variant: &Variant) -> bool {
        self.region.as_ref().map_or(true, |region| {
            region.contig() == variant.contig() && region.contains(variant.anchor())
        })
    }

    /// Assembles the matrix of one variant.
    ///
    /// The alignments are those overlapping the half window either side of
    /// the variant, and the reference window spans all of them.
    pub fn process(&mut self, variant: &Variant) -> Result<Matrix> {
        let anchor = variant.anchor();
        let width = self.config.window_width() as Position;
        let half = width / 2;

        let region = Region::new(
            variant.contig(),
            (anchor - half).max(0),
            Some(anchor + half + 1),
        );

        let alignments = self
            .alignments
            .alignments_in_region(&region)
            .map_err(|err| Error::Alignments(Box::new(err)))?;

        let start = alignments
            .iter()
            .map(|alignment| alignment.unclipped_start())
            .fold(anchor - width, Position::min)
            .max(0);
        let end = alignments
            .iter()
            .map(|alignment| alignment.end())
            .fold(anchor + width, Position::max);

        let reference = self
            .sequences
            .subsequence(variant.contig(), start, (end - start) as usize)
            .map_err(Error::Sequence)?;

        // A truncated window can end before the anchor.
        if reference.base(anchor).is_none() {
            return Err(Error::Sequence(sequence::Error::OutOfRange(
                variant.contig().to_string(),
                anchor,
                reference.end() as usize,
            )));
        }

        debug!(
            "assembling {variant} from {} alignments over {region}",
            alignments.len()
        );

        matrix::build(&alignments, variant, &reference, &self.config).map_err(Error::Matrix)
    }

    /// Processes every variant, passing each matrix to `sink`.
    ///
    /// Returns the number of matrices produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::matrix::Config;
    /// use hhga::pipeline::Pipeline;
    /// use hhga::source::memory::Alignments;
    /// use hhga::source::memory::Sequences;
    /// use hhga::source::memory::Variants;
    /// use hhga::variant::Variant;
    ///
    /// let sequences = [("chr1", "ACGTACGTACGT")].into_iter().collect::<Sequences>();
    /// let variants = [
    ///     Variant::new("chr1", 5, "A", ["G"]),
    ///     Variant::new("chr9", 5, "A", ["G"]),
    ///     Variant::new("chr1", 8, "T", ["C"]),
    /// ]
    /// .into_iter()
    /// .collect::<Variants>();
    ///
    /// let config = Config::default().with_window_width(5);
    /// let mut pipeline = Pipeline::new(Alignments::from_iter([]), sequences, variants, config);
    ///
    /// let mut anchors = Vec::new();
    /// let count = pipeline.run(|matrix| {
    ///     anchors.push(matrix.anchor());
    ///     Ok(())
    /// })?;
    ///
    /// // The variant on a contig the reference lacks is skipped.
    /// assert_eq!(count, 2);
    /// assert_eq!(anchors, vec![4, 7]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn run<F>(&mut self, mut sink: F) -> Result<usize>
    where
        F: FnMut(&Matrix) -> std::io::Result<()>,
    {
        let mut count = 0;

        while let Some(variant) = self
            .variants
            .next_variant()
            .map_err(|err| Error::Variants(Box::new(err)))?
        {
            if !self.selects(&variant) {
                continue;
            }

            match self.process(&variant) {
                Ok(matrix) => {
                    sink(&matrix).map_err(Error::Io)?;
                    count += 1;
                }
                Err(Error::Sequence(err)) if err.is_variant_scoped() => {
                    warn!("skipping {variant}: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Alignment;
    use crate::source::memory::Alignments;
    use crate::source::memory::Sequences;
    use crate::source::memory::Variants;

    fn read(name: &str, position: Position, bases: &str, cigar: &str) -> Alignment {
        Alignment::builder()
            .name(name)
            .contig("chr1")
            .position(position)
            .bases(bases)
            .qualities("I".repeat(bases.len()))
            .cigar(cigar.parse().unwrap())
            .try_build()
            .unwrap()
    }

    fn reference() -> String {
        "ACGT".repeat(25)
    }

    #[test]
    fn test_run() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // 0-based 50 is an `G`, so 1-based 51.
        let alignments = [
            read("near", 45, "GTACGTACGT", "10M"),
            read("clipped", 52, "TTTACGT", "3S4M"),
            read("far", 90, "GTACGT", "6M"),
        ]
        .into_iter()
        .collect::<Alignments>();

        let sequences = [("chr1", reference())].into_iter().collect::<Sequences>();
        let variants = [Variant::new("chr1", 51, "G", ["T"]).with_sample("s0", "0/1")]
            .into_iter()
            .collect::<Variants>();

        let config = Config::default().with_window_width(11);
        let mut pipeline = Pipeline::new(alignments, sequences, variants, config);

        let mut matrices = Vec::new();
        let count = pipeline.run(|matrix| {
            matrices.push(matrix.clone());
            Ok(())
        })?;

        assert_eq!(count, 1);

        let matrix = &matrices[0];
        assert_eq!(matrix.anchor(), 50);
        assert_eq!(matrix.haplotypes().len(), 2);

        let names = matrix
            .alignments()
            .iter()
            .map(|row| row.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["near", "clipped"]);

        for row in matrix.alignments() {
            assert_eq!(row.row().len(), 11);
        }

        Ok(())
    }

    #[test]
    fn test_region_selects_variants() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sequences = [("chr1", reference())].into_iter().collect::<Sequences>();
        let variants = [
            Variant::new("chr1", 10, "C", ["T"]),
            Variant::new("chr1", 20, "T", ["A"]),
            Variant::new("chr1", 30, "C", ["G"]),
        ]
        .into_iter()
        .collect::<Variants>();

        let mut pipeline = Pipeline::new(
            Alignments::from_iter([]),
            sequences,
            variants,
            Config::default(),
        )
        .with_region("chr1:15-25".parse()?);

        let mut positions = Vec::new();
        pipeline.run(|matrix| {
            positions.push(matrix.anchor() + 1);
            Ok(())
        })?;

        assert_eq!(positions, vec![20]);

        Ok(())
    }

    #[test]
    fn test_variants_past_the_contig_end_are_skipped(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sequences = [("chr1", reference())].into_iter().collect::<Sequences>();
        let variants = [
            Variant::new("chr1", 105, "A", ["G"]),
            Variant::new("chr1", 105, "A", ["G"]).with_sample("s0", "0/1"),
            Variant::new("chr1", 20, "T", ["A"]),
        ]
        .into_iter()
        .collect::<Variants>();

        let config = Config::default().with_window_width(5);
        let mut pipeline = Pipeline::new(Alignments::from_iter([]), sequences, variants, config);

        let mut anchors = Vec::new();
        let count = pipeline.run(|matrix| {
            anchors.push(matrix.anchor());
            Ok(())
        })?;

        assert_eq!(count, 1);
        assert_eq!(anchors, vec![19]);

        Ok(())
    }

    #[test]
    fn test_anchor_past_the_contig_end_is_out_of_range() {
        let sequences = [("chr1", reference())].into_iter().collect::<Sequences>();
        let variant = Variant::new("chr1", 105, "A", ["G"]);

        let mut pipeline = Pipeline::new(
            Alignments::from_iter([]),
            sequences,
            Variants::default(),
            Config::default(),
        );

        let err = pipeline.process(&variant).unwrap_err();
        assert!(matches!(&err, Error::Sequence(err) if err.is_variant_scoped()));
        assert_eq!(
            err.to_string(),
            "sequence error: position 104 is out of range for sequence chr1 of length 100"
        );
    }

    #[test]
    fn test_sink_errors_abort() {
        let sequences = [("chr1", reference())].into_iter().collect::<Sequences>();
        let variants = [
            Variant::new("chr1", 10, "C", ["T"]),
            Variant::new("chr1", 20, "T", ["A"]),
        ]
        .into_iter()
        .collect::<Variants>();

        let mut pipeline = Pipeline::new(
            Alignments::from_iter([]),
            sequences,
            variants,
            Config::default(),
        );

        let mut calls = 0;
        let err = pipeline
            .run(|_| {
                calls += 1;
                Err(std::io::Error::other("closed"))
            })
            .unwrap_err();

        assert_eq!(calls, 1);
        assert_eq!(err.to_string(), "i/o error: closed");
    }
}
