//! A binary that writes one allele feature matrix for every candidate variant
//! in a region.
//!
//! ```shell
//! cargo run --release --bin=hhga --features=binaries -- \
//!     --fasta-reference ref.fa \
//!     --bam reads.sam \
//!     --vcf calls.vcf.gz \
//!     --region chr20:1000000-1010000
//! ```
//!
//! Alignments are read from SAM files and the candidate variants from a VCF.
//! Any input ending in `.gz` is decompressed on the fly. Matrices are written
//! to stdout in the Vowpal Wabbit format (`--format vw`), or in a
//! human-readable layout with `--format text-viz` or its shorthand
//! `--text-viz`.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use flate2::read::MultiGzDecoder;
use hhga::Alignment;
use hhga::Pipeline;
use hhga::Variant;
use hhga::alignment::Cigar;
use hhga::alignment::Strand;
use hhga::alignment::cigar;
use hhga::allele::Position;
use hhga::matrix;
use hhga::matrix::Config;
use hhga::matrix::Format;
use hhga::quality;
use hhga::region::Region;
use hhga::source::memory::Alignments;
use hhga::source::memory::Sequences;
use hhga::source::memory::Variants;
use noodles::fasta;
use noodles::sam;
use noodles::sam::alignment::record::Cigar as _;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind as OpKind;
use noodles::vcf;
use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
use noodles::vcf::variant::record_buf::samples::sample::Value;
use noodles::vcf::variant::record_buf::samples::sample::value::Genotype;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Inputs
////////////////////////////////////////////////////////////////////////////////////////

/// Opens a file for buffered reading, decompressing it if it ends in `.gz`.
fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Ok(Box::new(BufReader::new(MultiGzDecoder::new(file)))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// Reads every sequence of a FASTA file into memory.
fn read_sequences(path: &Path) -> Result<Sequences> {
    let mut reader = fasta::io::Reader::new(open(path)?);
    let mut sequences = Sequences::default();

    for result in reader.records() {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        let name = std::str::from_utf8(record.name())
            .with_context(|| format!("reading sequence name in {}", path.display()))?;

        let bases: &[u8] = record.sequence().as_ref();
        sequences.insert(name, bases);
    }

    Ok(sequences)
}

/// Converts a CIGAR operation.
fn operation(op: Op) -> cigar::Operation {
    let code = match op.kind() {
        OpKind::Match => 'M',
        OpKind::Insertion => 'I',
        OpKind::Deletion => 'D',
        OpKind::Skip => 'N',
        OpKind::SoftClip => 'S',
        OpKind::HardClip => 'H',
        OpKind::Pad => 'P',
        OpKind::SequenceMatch => '=',
        OpKind::SequenceMismatch => 'X',
    };

    cigar::Operation::new(cigar::Kind::from(code), op.len())
}

/// Reads every mapped alignment of a SAM file.
///
/// Missing base qualities are read as zero.
fn read_alignments(path: &Path) -> Result<Vec<Alignment>> {
    let mut reader = sam::io::Reader::new(open(path)?);
    let header = reader
        .read_header()
        .with_context(|| format!("reading header of {}", path.display()))?;

    let mut alignments = Vec::new();

    for result in reader.record_bufs(&header) {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        let flags = record.flags();

        if flags.is_unmapped() {
            continue;
        }

        let (Some(id), Some(start)) = (record.reference_sequence_id(), record.alignment_start())
        else {
            continue;
        };

        let Some((contig, _)) = header.reference_sequences().get_index(id) else {
            bail!("reference sequence {id} is not in the header of {}", path.display());
        };

        let bases: &[u8] = record.sequence().as_ref();

        if bases.is_empty() {
            continue;
        }

        let scores: &[u8] = record.quality_scores().as_ref();
        let qualities = match scores.is_empty() {
            true => vec![quality::encode_char(0); bases.len()],
            false => scores.iter().copied().map(quality::encode_char).collect(),
        };

        let cigar = record
            .cigar()
            .iter()
            .map(|result| result.map(operation))
            .collect::<std::io::Result<Cigar>>()
            .with_context(|| format!("reading CIGAR in {}", path.display()))?;

        let name = record
            .name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| String::from("*"));

        let alignment = Alignment::builder()
            .name(name.clone())
            .contig(contig.to_string())
            .position(usize::from(start) as Position - 1)
            .bases(bases)
            .qualities(qualities)
            .cigar(cigar)
            .mapping_quality(record.mapping_quality().map(u8::from).unwrap_or(0))
            .strand(match flags.is_reverse_complemented() {
                true => Strand::Negative,
                false => Strand::Positive,
            })
            .paired(flags.is_segmented())
            .try_build()
            .with_context(|| format!("alignment {name} in {}", path.display()))?;

        alignments.push(alignment);
    }

    Ok(alignments)
}

/// Writes a genotype as a `0/1`-style string.
fn genotype_string(genotype: &Genotype) -> String {
    let mut result = String::new();

    for (i, allele) in genotype.as_ref().iter().enumerate() {
        if i > 0 {
            result.push(match allele.phasing() {
                Phasing::Phased => '|',
                Phasing::Unphased => '/',
            });
        }

        match allele.position() {
            Some(position) => result.push_str(&position.to_string()),
            None => result.push('.'),
        }
    }

    result
}

/// Reads the variants of a VCF whose first reference base lies in a region.
///
/// Symbolic and breakend alleles cannot be laid out base by base, so records
/// carrying them are skipped.
fn read_variants(path: &Path, region: &Region) -> Result<Vec<Variant>> {
    let mut reader = vcf::io::Reader::new(open(path)?);
    let header = reader
        .read_header()
        .with_context(|| format!("reading header of {}", path.display()))?;

    let mut variants = Vec::new();

    for result in reader.record_bufs(&header) {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        let contig = record.reference_sequence_name();

        let Some(start) = record.variant_start() else {
            continue;
        };

        let position = usize::from(start) as Position;

        if contig != region.contig() || !region.contains(position - 1) {
            continue;
        }

        let alternates = record.alternate_bases().as_ref();

        if alternates.iter().any(|alternate| {
            alternate == "*" || alternate.starts_with('<') || alternate.contains(['[', ']'])
        }) {
            warn!("skipping {contig}:{position}: symbolic alternate allele");
            continue;
        }

        let mut variant = Variant::new(contig, position, record.reference_bases(), alternates);

        for (i, sample) in header.sample_names().iter().enumerate() {
            let value = record
                .samples()
                .get_index(i)
                .and_then(|values| values.get("GT"));

            if let Some(Some(Value::Genotype(genotype))) = value {
                variant = variant.with_sample(sample, genotype_string(genotype));
            }
        }

        variants.push(variant);
    }

    Ok(variants)
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Writes allele feature matrices for the candidate variants in a region.
#[derive(Parser)]
struct Args {
    /// The reference sequences in FASTA format.
    #[arg(short = 'f', long)]
    fasta_reference: PathBuf,

    /// An alignment file in SAM format. Can be given more than once.
    #[arg(short = 'b', long = "bam", required = true)]
    bams: Vec<PathBuf>,

    /// The candidate variants in VCF format.
    #[arg(short = 'V', long)]
    vcf: PathBuf,

    /// The region to write matrices for (e.g., `chr1:1000-2000`).
    #[arg(short, long)]
    region: Region,

    /// The number of columns in each matrix.
    #[arg(short, long, default_value_t = matrix::DEFAULT_WINDOW_WIDTH)]
    window_size: usize,

    /// The class label of every matrix.
    #[arg(short, long, default_value = "")]
    class_label: String,

    /// Only build haplotype rows for this sample.
    #[arg(short, long)]
    sample: Option<String>,

    /// The output format (`vw` or `text-viz`).
    #[arg(long, default_value_t = Format::Vw)]
    format: Format,

    /// Write a human-readable layout instead of Vowpal Wabbit features.
    /// Overrides `--format`.
    #[arg(short, long, default_value_t = false)]
    text_viz: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

/// Reads the inputs and writes a matrix for every variant in the region.
fn write(args: &Args) -> Result<()> {
    let sequences = read_sequences(&args.fasta_reference)?;
    info!("read reference from {}", args.fasta_reference.display());

    let mut alignments = Vec::new();

    for path in &args.bams {
        let read = read_alignments(path)?;
        debug!("read {} alignments from {}", read.len(), path.display());
        alignments.extend(read);
    }

    let alignments = alignments.into_iter().collect::<Alignments>();
    info!("read {} alignments", alignments.len());

    let variants = read_variants(&args.vcf, &args.region)?;
    info!("read {} variants in {}", variants.len(), args.region);

    let mut config = Config::default()
        .with_window_width(args.window_size)
        .with_label(args.class_label.clone());

    if let Some(sample) = &args.sample {
        config = config.with_sample(sample.clone());
    }

    let format = match args.text_viz {
        true => Format::Text,
        false => args.format,
    };

    let mut pipeline = Pipeline::new(
        alignments,
        sequences,
        variants.into_iter().collect::<Variants>(),
        config,
    );

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let count = pipeline
        .run(|matrix| {
            matrix::render::write(&mut writer, matrix, format)?;

            if format == Format::Text {
                writeln!(writer)?;
            }

            Ok(())
        })
        .context("writing matrices")?;

    writer.flush()?;
    info!("wrote {count} matrices");

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.window_size == 0 {
        bail!("`--window-size` must be greater than zero");
    }

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(std::io::stderr)
            .init(),
    };

    write(&args)
}
