//! Assembly of the feature matrix for one variant.
//!
//! A [`Matrix`] stacks the reference row, one row per called haplotype, and
//! one row per alignment overlapping the variant. Every row holds exactly
//! [`Config::window_width()`] alleles over the same dense columns.

use std::collections::BTreeMap;

use omics::coordinate::Strand;
use tracing::debug;

use crate::alignment;
use crate::alignment::Alignment;
use crate::alignment::decode;
use crate::allele::Allele;
use crate::allele::AlleleSequence;
use crate::allele::Position;
use crate::haplotype;
use crate::projection;
use crate::projection::Map;
use crate::quality::Probability;
use crate::recenter;
use crate::recenter::Frame;
use crate::recenter::Row;
use crate::reference::Window;
use crate::variant::Variant;

pub mod render;

pub use render::Format;

/// The default number of columns in a matrix.
pub const DEFAULT_WINDOW_WIDTH: usize = 50;

/// An error related to assembling a matrix.
#[derive(Debug)]
pub enum Error {
    /// The variant and the reference window are on different contigs.
    ContigMismatch(String, String),

    /// A decode error.
    Decode(decode::Error),

    /// A haplotype error.
    Haplotype(haplotype::Error),

    /// A projection error.
    Projection(projection::Error),

    /// A recentering error.
    Recenter(recenter::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ContigMismatch(variant, reference) => write!(
                f,
                "variant is on {variant} but the reference window is on {reference}"
            ),
            Error::Decode(err) => write!(f, "decode error: {err}"),
            Error::Haplotype(err) => write!(f, "haplotype error: {err}"),
            Error::Projection(err) => write!(f, "projection error: {err}"),
            Error::Recenter(err) => write!(f, "recenter error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Settings for assembling a matrix.
#[derive(Clone, Debug)]
pub struct Config {
    /// The number of columns in every row.
    window_width: usize,

    /// The class label the matrix is trained against.
    label: String,

    /// The only sample whose haplotypes are included, if any.
    sample: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            label: String::new(),
            sample: None,
        }
    }
}

impl Config {
    /// Sets the number of columns in every row.
    pub fn with_window_width(mut self, window_width: usize) -> Self {
        self.window_width = window_width;
        self
    }

    /// Sets the class label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Restricts the haplotype rows to one sample.
    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into());
        self
    }

    /// Gets the number of columns in every row.
    pub fn window_width(&self) -> usize {
        self.window_width
    }

    /// Gets the class label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the sample the haplotype rows are restricted to, if any.
    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }
}

/// A matrix row observed by one alignment.
#[derive(Clone, Debug)]
pub struct AlignmentRow {
    /// The alignment's index in the input.
    id: alignment::Id,

    /// The alignment's name.
    name: String,

    /// The strand the alignment is on.
    strand: Strand,

    /// Whether the alignment is one of a pair.
    paired: bool,

    /// The confidence in the alignment's placement.
    mapping_probability: Probability,

    /// The alleles.
    row: Row,
}

impl AlignmentRow {
    /// Gets the alignment's index in the input.
    pub fn id(&self) -> alignment::Id {
        self.id
    }

    /// Gets the alignment's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the strand the alignment is on.
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Whether the alignment is one of a pair.
    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Gets the confidence in the alignment's placement.
    pub fn mapping_probability(&self) -> Probability {
        self.mapping_probability
    }

    /// Gets the alleles.
    pub fn row(&self) -> &Row {
        &self.row
    }
}

/// The feature matrix of one variant.
#[derive(Clone, Debug)]
pub struct Matrix {
    /// The name of the reference sequence.
    contig: String,

    /// The 0-based position the matrix is centered on.
    anchor: Position,

    /// The class label.
    label: String,

    /// The dense columns the rows cover.
    frame: Frame,

    /// The reference row.
    reference: Row,

    /// The haplotype rows.
    haplotypes: Vec<Row>,

    /// The alignment rows, in input order.
    alignments: Vec<AlignmentRow>,
}

impl Matrix {
    /// Gets the name of the reference sequence.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the 0-based position the matrix is centered on.
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Gets the class label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the dense columns the rows cover.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Gets the number of columns in every row.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Gets the reference row.
    pub fn reference(&self) -> &Row {
        &self.reference
    }

    /// Gets the haplotype rows.
    pub fn haplotypes(&self) -> &[Row] {
        &self.haplotypes
    }

    /// Gets the alignment rows.
    pub fn alignments(&self) -> &[AlignmentRow] {
        &self.alignments
    }
}

/// Reconstructs the haplotypes selected by a config.
///
/// Without a sample restriction, every sample contributes its haplotypes in
/// sample name order.
fn haplotypes(variant: &Variant, config: &Config) -> Result<Vec<AlleleSequence>> {
    match config.sample() {
        Some(sample) => {
            haplotype::reconstruct_sample(variant, sample).map_err(Error::Haplotype)
        }
        None => {
            let mut result = Vec::new();

            for sample in variant.samples().keys() {
                result.extend(
                    haplotype::reconstruct_sample(variant, sample).map_err(Error::Haplotype)?,
                );
            }

            Ok(result)
        }
    }
}

/// Projects a sequence and pads it to the frame.
fn row(map: &Map, frame: &Frame, sequence: &[Allele]) -> Result<Row> {
    let projected = map.project(sequence).map_err(Error::Projection)?;
    recenter::recenter(&projected, frame).map_err(Error::Recenter)
}

/// Assembles the matrix of a variant from the alignments overlapping it and
/// a reference window covering every one of them.
///
/// Alignments with no allele inside the frame are left out of the matrix.
///
/// # Examples
///
/// ```
/// use hhga::alignment::Alignment;
/// use hhga::matrix;
/// use hhga::matrix::Config;
/// use hhga::reference::Window;
/// use hhga::variant::Variant;
///
/// let reference = Window::new("chr1", 95, "ACGTACGTACGT");
/// let variant = Variant::new("chr1", 101, "A", ["G"]).with_sample("s0", "0/1");
///
/// let alignment = Alignment::builder()
///     .name("read0")
///     .contig("chr1")
///     .position(97)
///     .bases("GTAGGT")
///     .qualities("IIIIII")
///     .cigar("6M".parse()?)
///     .try_build()?;
///
/// let config = Config::default().with_window_width(5).with_label("1");
/// let matrix = matrix::build(&[alignment], &variant, &reference, &config)?;
///
/// assert_eq!(matrix.width(), 5);
/// assert_eq!(matrix.haplotypes().len(), 2);
/// assert_eq!(matrix.alignments().len(), 1);
/// assert_eq!(matrix.alignments()[0].row().len(), 5);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build(
    alignments: &[Alignment],
    variant: &Variant,
    reference: &Window,
    config: &Config,
) -> Result<Matrix> {
    if variant.contig() != reference.contig() {
        return Err(Error::ContigMismatch(
            variant.contig().to_string(),
            reference.contig().to_string(),
        ));
    }

    let anchor = variant.anchor();
    let width = config.window_width() as Position;

    // No frame of `width` columns reaches further than `width` positions from
    // its anchor.
    let reference_sequence = reference.alleles(anchor - width, anchor + width);
    let haplotype_sequences = haplotypes(variant, config)?;

    let mut decoded = BTreeMap::new();

    for (i, alignment) in alignments.iter().enumerate() {
        let sequence = decode(alignment, reference).map_err(Error::Decode)?;
        decoded.insert(alignment::Id::new(i), sequence);
    }

    let mut builder = Map::builder();

    for sequence in std::iter::once(&reference_sequence)
        .chain(&haplotype_sequences)
        .chain(decoded.values())
    {
        builder.push(sequence).map_err(Error::Projection)?;
    }

    let map = builder.build();
    let frame = Frame::new(&map, config.window_width(), anchor).map_err(Error::Recenter)?;

    let reference_row = row(&map, &frame, &reference_sequence)?;
    let haplotype_rows = haplotype_sequences
        .iter()
        .map(|sequence| row(&map, &frame, sequence))
        .collect::<Result<Vec<_>>>()?;

    let mut alignment_rows = Vec::with_capacity(decoded.len());

    for (id, sequence) in decoded {
        let alignment = &alignments[id.get()];
        let projected = map.project(&sequence).map_err(Error::Projection)?;

        if !projected
            .iter()
            .any(|allele| frame.contains(allele.position()))
        {
            debug!(
                "alignment {} does not overlap the frame at {}:{}",
                alignment.name(),
                variant.contig(),
                variant.position()
            );
            continue;
        }

        alignment_rows.push(AlignmentRow {
            id,
            name: alignment.name().to_string(),
            strand: alignment.strand().clone(),
            paired: alignment.is_paired(),
            mapping_probability: alignment.mapping_probability(),
            row: recenter::recenter(&projected, &frame).map_err(Error::Recenter)?,
        });
    }

    Ok(Matrix {
        contig: variant.contig().to_string(),
        anchor,
        label: config.label().to_string(),
        frame,
        reference: reference_row,
        haplotypes: haplotype_rows,
        alignments: alignment_rows,
    })
}
