//! Rendering of a [`Matrix`] to text.

use std::io;
use std::io::Write;
use std::str::FromStr;

use omics::coordinate::Strand;

use crate::allele::Allele;
use crate::matrix::Matrix;

/// The width of the row label column in the human-readable format.
const LABEL_WIDTH: usize = 10;

/// An error related to parsing a [`Format`].
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An unknown format name.
    InvalidFormat(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidFormat(format) => write!(f, "invalid output format: {format}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// An output format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    /// One line of one character per column for each row.
    Text,

    /// One line of sparse features per matrix, for Vowpal Wabbit.
    #[default]
    Vw,
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-viz" => Ok(Format::Text),
            "vw" => Ok(Format::Vw),
            _ => Err(ParseError::InvalidFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Text => write!(f, "text-viz"),
            Format::Vw => write!(f, "vw"),
        }
    }
}

/// Gets the single character shown for an allele in the human-readable
/// format.
fn symbol(allele: &Allele) -> char {
    let mut chars = allele.alternate().chars();

    match (chars.next(), chars.next()) {
        (None, _) => '-',
        (Some(c), None) => c,
        (Some(_), Some(_)) => '*',
    }
}

/// Gets the alternate bases as they appear in a feature name.
fn token(allele: &Allele) -> &str {
    match allele.alternate() {
        "" => "-",
        alternate => alternate,
    }
}

/// Writes one row of the human-readable format.
fn write_text_row<'a, W>(
    writer: &mut W,
    label: &str,
    row: impl Iterator<Item = &'a Allele>,
) -> io::Result<()>
where
    W: Write,
{
    let symbols = row.map(symbol).collect::<String>();
    writeln!(writer, "{label:<LABEL_WIDTH$}{symbols}")
}

/// Writes one `<column><alt>:<probability>` feature per allele.
fn write_features<'a, W>(writer: &mut W, row: impl Iterator<Item = &'a Allele>) -> io::Result<()>
where
    W: Write,
{
    for (column, allele) in row.enumerate() {
        write!(
            writer,
            " {column}{}:{}",
            token(allele),
            allele.probability()
        )?;
    }

    Ok(())
}

/// Writes a matrix in the human-readable format.
///
/// The first line names the variant and its label, followed by the
/// reference row, the haplotype rows, and the alignment rows.
pub fn write_text<W>(writer: &mut W, matrix: &Matrix) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        writer,
        "{}:{} {}",
        matrix.contig(),
        matrix.anchor() + 1,
        matrix.label()
    )?;

    write_text_row(writer, "reference", matrix.reference().iter())?;

    for haplotype in matrix.haplotypes() {
        write_text_row(writer, "haplotype", haplotype.iter())?;
    }

    for alignment in matrix.alignments() {
        write_text_row(writer, "alignment", alignment.row().iter())?;
    }

    Ok(())
}

/// Writes a matrix as one line of Vowpal Wabbit features.
///
/// Every row is a namespace (`ref`, `hap<i>`, `aln<i>`) holding one
/// `<column><alt>:<probability>` feature per column. Alignment namespaces
/// lead with the mapping confidence as `mq:<probability>`, then a `reverse`
/// flag for reads on the negative strand and a `paired` flag for paired
/// reads.
pub fn write_vw<W>(writer: &mut W, matrix: &Matrix) -> io::Result<()>
where
    W: Write,
{
    write!(writer, "{} |ref", matrix.label())?;
    write_features(writer, matrix.reference().iter())?;

    for (i, haplotype) in matrix.haplotypes().iter().enumerate() {
        write!(writer, " |hap{i}")?;
        write_features(writer, haplotype.iter())?;
    }

    for (i, alignment) in matrix.alignments().iter().enumerate() {
        write!(writer, " |aln{i} mq:{}", alignment.mapping_probability())?;

        if alignment.strand() == &Strand::Negative {
            write!(writer, " reverse")?;
        }

        if alignment.is_paired() {
            write!(writer, " paired")?;
        }

        write_features(writer, alignment.row().iter())?;
    }

    writeln!(writer)
}

/// Writes a matrix in a format.
///
/// # Examples
///
/// ```
/// use hhga::matrix;
/// use hhga::matrix::Config;
/// use hhga::matrix::Format;
/// use hhga::reference::Window;
/// use hhga::variant::Variant;
///
/// let reference = Window::new("chr1", 0, "ACGTA");
/// let variant = Variant::new("chr1", 3, "G", ["T"]).with_sample("s0", "1");
/// let config = Config::default().with_window_width(3).with_label("1");
///
/// let matrix = matrix::build(&[], &variant, &reference, &config)?;
///
/// let mut buffer = Vec::new();
/// matrix::render::write(&mut buffer, &matrix, Format::Text)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "chr1:3 1\nreference CGT\nhaplotype MTM\n"
/// );
///
/// let mut buffer = Vec::new();
/// matrix::render::write(&mut buffer, &matrix, Format::Vw)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "1 |ref 0C:1 1G:1 2T:1 |hap0 0M:1 1T:1 2M:1\n"
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write<W>(writer: &mut W, matrix: &Matrix, format: Format) -> io::Result<()>
where
    W: Write,
{
    match format {
        Format::Text => write_text(writer, matrix),
        Format::Vw => write_vw(writer, matrix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Alignment;
    use crate::matrix;
    use crate::matrix::Config;
    use crate::reference::Window;
    use crate::variant::Variant;

    #[test]
    fn test_format() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("text-viz".parse::<Format>()?, Format::Text);
        assert_eq!("vw".parse::<Format>()?, Format::Vw);
        assert_eq!(Format::default(), Format::Vw);
        assert_eq!(Format::Text.to_string(), "text-viz");

        let err = "csv".parse::<Format>().unwrap_err();
        assert_eq!(err.to_string(), "invalid output format: csv");

        Ok(())
    }

    #[test]
    fn test_symbols() {
        assert_eq!(symbol(&Allele::new("A", "C", 0, 1.0)), 'C');
        assert_eq!(symbol(&Allele::new("A", "", 0, 1.0)), '-');
        assert_eq!(symbol(&Allele::new("", "TT", 0, 1.0)), '*');
        assert_eq!(symbol(&Allele::gap(0)), 'U');
        assert_eq!(symbol(&Allele::missing(0)), 'M');
        assert_eq!(token(&Allele::new("AC", "", 0, 1.0)), "-");
        assert_eq!(token(&Allele::new("", "TT", 0, 1.0)), "TT");
    }

    #[test]
    fn test_alignment_rows() -> Result<(), Box<dyn std::error::Error>> {
        let reference = Window::new("chr1", 0, "ACGTA");
        let variant = Variant::new("chr1", 3, "G", ["T"]);

        let alignment = Alignment::builder()
            .name("read0")
            .contig("chr1")
            .position(1)
            .bases("CTT")
            .qualities("+++")
            .cigar("3M".parse()?)
            .mapping_quality(20)
            .try_build()?;

        let config = Config::default().with_window_width(3).with_label("0");
        let matrix = matrix::build(&[alignment], &variant, &reference, &config)?;

        let mut buffer = Vec::new();
        write(&mut buffer, &matrix, Format::Text)?;
        assert_eq!(
            String::from_utf8(buffer)?,
            "chr1:3 0\nreference CGT\nalignment CTT\n"
        );

        let mut buffer = Vec::new();
        write(&mut buffer, &matrix, Format::Vw)?;
        let line = String::from_utf8(buffer)?;
        assert!(line.starts_with("0 |ref 0C:1 1G:1 2T:1 |aln0 mq:"));
        assert!(line.ends_with('\n'));

        let features = line.split_whitespace().skip(6).collect::<Vec<_>>();
        assert_eq!(features.len(), 4);

        let value = |feature: &str, name: &str| -> f64 {
            feature
                .strip_prefix(name)
                .and_then(|v| v.parse().ok())
                .unwrap_or(f64::NAN)
        };

        assert!((value(features[0], "mq:") - 0.99).abs() < 1e-9);
        assert!((value(features[1], "0C:") - 0.9).abs() < 1e-9);
        assert!((value(features[2], "1T:") - 0.9).abs() < 1e-9);
        assert!((value(features[3], "2T:") - 0.9).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_strand_and_pairing_flags() -> Result<(), Box<dyn std::error::Error>> {
        let reference = Window::new("chr1", 0, "ACGTA");
        let variant = Variant::new("chr1", 3, "G", ["T"]);

        let read = |name: &str, strand: Strand, paired: bool| {
            Alignment::builder()
                .name(name)
                .contig("chr1")
                .position(1)
                .bases("CGT")
                .qualities("III")
                .cigar("3M".parse().unwrap())
                .mapping_quality(60)
                .strand(strand)
                .paired(paired)
                .try_build()
        };

        let alignments = [
            read("forward", Strand::Positive, false)?,
            read("reverse", Strand::Negative, false)?,
            read("mate", Strand::Negative, true)?,
        ];

        let config = Config::default().with_window_width(3).with_label("0");
        let matrix = matrix::build(&alignments, &variant, &reference, &config)?;

        let mut buffer = Vec::new();
        write(&mut buffer, &matrix, Format::Vw)?;
        let line = String::from_utf8(buffer)?;

        let flags = line
            .split(" |")
            .filter(|namespace| namespace.starts_with("aln"))
            .map(|namespace| {
                namespace
                    .split_whitespace()
                    .skip(2)
                    .take_while(|token| !token.contains(':'))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        assert_eq!(flags.len(), 3);
        assert!(flags[0].is_empty());
        assert_eq!(flags[1], vec!["reverse"]);
        assert_eq!(flags[2], vec!["reverse", "paired"]);

        Ok(())
    }
}
