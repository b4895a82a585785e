//! Reconstruction of called haplotypes from a variant's genotypes.
//!
//! Haplotype rows are built from the variant alone, independent of any
//! alignment, and every allele in them carries full confidence.
//!
//! Coordinates follow the same convention as the alignment decoder: alleles
//! sit at 0-based positions and insertions are anchored at the reference base
//! that precedes the inserted bases. Events report 1-based positions, and a
//! pure insertion reports the base *following* the inserted bases, so:
//!
//! | Event                   | 0-based anchor               |
//! |-------------------------|------------------------------|
//! | pure insertion          | `position - 2`               |
//! | multi-base substitution | `position - 1 + i` per base  |
//! | anything else           | `position - 1`               |

use crate::allele::Allele;
use crate::allele::AlleleSequence;
use crate::allele::Position;
use crate::variant::Event;
use crate::variant::Genotype;
use crate::variant::Variant;
use crate::variant::genotype;

/// An error related to reconstructing haplotypes.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A sample's genotype string could not be parsed.
    InvalidGenotype(String, genotype::ParseError),

    /// A genotype called an allele index the variant does not have.
    AlleleIndexOutOfRange(usize, usize),

    /// An alternate allele has no decomposition.
    MissingEvents(String),

    /// The requested sample is not present at the variant.
    UnknownSample(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidGenotype(sample, err) => {
                write!(f, "invalid genotype for sample {sample}: {err}")
            }
            Error::AlleleIndexOutOfRange(index, count) => write!(
                f,
                "allele index {index} is out of range for a variant with {count} alleles"
            ),
            Error::MissingEvents(alternate) => {
                write!(f, "no decomposition for alternate allele {alternate}")
            }
            Error::UnknownSample(sample) => write!(f, "unknown sample: {sample}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Builds the allele sequence of an alternate allele from its primitive
/// events. Bases are uppercased to match the reference window.
///
/// # Examples
///
/// ```
/// use hhga::haplotype;
/// use hhga::variant::Event;
///
/// let events = vec![Event::new("AC", "GT", 100), Event::new("", "TT", 103)];
/// let sequence = haplotype::alternate_sequence(&events);
///
/// let keys = sequence.iter().map(|allele| allele.key()).collect::<Vec<_>>();
/// assert_eq!(keys, vec!["99:A/G", "100:C/T", "101:/TT"]);
/// ```
pub fn alternate_sequence(events: &[Event]) -> AlleleSequence {
    let mut sequence = AlleleSequence::new();

    for event in events {
        let reference = event.reference().to_ascii_uppercase();
        let alternate = event.alternate().to_ascii_uppercase();

        if event.is_multi_base_substitution() {
            let bases = reference.chars().zip(alternate.chars());

            for (i, (reference, alternate)) in bases.enumerate() {
                sequence.push(Allele::new(
                    reference.to_string(),
                    alternate.to_string(),
                    event.position() - 1 + i as Position,
                    1.0,
                ));
            }
        } else if event.is_insertion() {
            sequence.push(Allele::new("", alternate, event.position() - 2, 1.0));
        } else {
            sequence.push(Allele::new(
                reference,
                alternate,
                event.position() - 1,
                1.0,
            ));
        }
    }

    // Insertions sort after the substitution at their anchor.
    sequence.sort_by_key(|allele| (allele.position(), allele.reference().is_empty()));
    sequence
}

/// Builds the allele sequence of the reference allele, one uppercase allele
/// per base.
///
/// # Examples
///
/// ```
/// use hhga::haplotype;
/// use hhga::variant::Variant;
///
/// let variant = Variant::new("chr1", 100, "AC", ["A"]);
/// let sequence = haplotype::reference_sequence(&variant);
///
/// let keys = sequence.iter().map(|allele| allele.key()).collect::<Vec<_>>();
/// assert_eq!(keys, vec!["99:A/A", "100:C/C"]);
/// ```
pub fn reference_sequence(variant: &Variant) -> AlleleSequence {
    variant
        .reference()
        .to_ascii_uppercase()
        .chars()
        .enumerate()
        .map(|(i, base)| {
            let base = base.to_string();
            Allele::new(base.clone(), base, variant.anchor() + i as Position, 1.0)
        })
        .collect()
}

/// Builds the allele sequence of every allele of a variant, indexed by allele
/// index (the reference first, then each alternate).
pub fn allele_sequences(variant: &Variant) -> Result<Vec<AlleleSequence>> {
    let mut sequences = vec![reference_sequence(variant)];

    for alternate in variant.alternates() {
        let events = variant
            .events(alternate)
            .ok_or_else(|| Error::MissingEvents(alternate.clone()))?;
        sequences.push(alternate_sequence(events));
    }

    Ok(sequences)
}

/// Reconstructs one allele sequence per called haplotype of a genotype.
///
/// Homozygous calls produce identical rows, and no-calls produce no row.
///
/// # Examples
///
/// ```
/// use hhga::haplotype;
/// use hhga::variant::Variant;
///
/// let variant = Variant::new("chr1", 100, "A", ["G"]);
/// let haplotypes = haplotype::reconstruct(&variant, &"1/1".parse()?)?;
///
/// assert_eq!(haplotypes.len(), 2);
/// assert_eq!(haplotypes[0], haplotypes[1]);
/// assert_eq!(haplotypes[0][0].key(), "99:A/G");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn reconstruct(variant: &Variant, genotype: &Genotype) -> Result<Vec<AlleleSequence>> {
    let sequences = allele_sequences(variant)?;

    genotype
        .calls()
        .iter()
        .flatten()
        .map(|&index| {
            sequences
                .get(index)
                .cloned()
                .ok_or(Error::AlleleIndexOutOfRange(index, sequences.len()))
        })
        .collect()
}

/// Reconstructs the haplotypes of one sample at a variant.
pub fn reconstruct_sample(variant: &Variant, sample: &str) -> Result<Vec<AlleleSequence>> {
    let genotype = variant
        .samples()
        .get(sample)
        .ok_or_else(|| Error::UnknownSample(sample.to_string()))?
        .parse::<Genotype>()
        .map_err(|e| Error::InvalidGenotype(sample.to_string(), e))?;

    reconstruct(variant, &genotype)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(sequence: &[Allele]) -> Vec<&str> {
        sequence.iter().map(Allele::key).collect()
    }

    #[test]
    fn test_heterozygous() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variant = Variant::new("chr1", 101, "C", ["CTT"]).with_sample("s0", "0/1");
        let haplotypes = reconstruct_sample(&variant, "s0")?;

        assert_eq!(haplotypes.len(), 2);
        assert_eq!(keys(&haplotypes[0]), vec!["100:C/C"]);

        // Anchored on the same base the alignment decoder would use.
        assert_eq!(keys(&haplotypes[1]), vec!["100:/TT"]);

        Ok(())
    }

    #[test]
    fn test_soft_masked_bases_are_uppercased(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variant = Variant::new("chr1", 101, "c", ["cTt"]);
        let haplotypes = reconstruct(&variant, &"0/1".parse()?)?;

        assert_eq!(keys(&haplotypes[0]), vec!["100:C/C"]);
        assert_eq!(keys(&haplotypes[1]), vec!["100:/TT"]);

        let variant = Variant::new("chr1", 10, "ac", ["gT"]);
        let haplotypes = reconstruct(&variant, &"1".parse()?)?;

        assert_eq!(keys(&haplotypes[0]), vec!["9:A/G", "10:C/T"]);

        Ok(())
    }

    #[test]
    fn test_deletion_is_one_allele() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variant = Variant::new("chr1", 50, "ACGT", ["A"]);
        let haplotypes = reconstruct(&variant, &"1".parse()?)?;

        assert_eq!(keys(&haplotypes[0]), vec!["50:CGT/"]);

        Ok(())
    }

    #[test]
    fn test_multiallelic() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variant = Variant::new("chr1", 10, "AC", ["GT", "A"]);
        let haplotypes = reconstruct(&variant, &"1|2".parse()?)?;

        assert_eq!(keys(&haplotypes[0]), vec!["9:A/G", "10:C/T"]);
        assert_eq!(keys(&haplotypes[1]), vec!["10:C/"]);

        Ok(())
    }

    #[test]
    fn test_no_calls_are_dropped() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variant = Variant::new("chr1", 10, "A", ["G"]);
        assert_eq!(reconstruct(&variant, &"./1".parse()?)?.len(), 1);
        assert!(reconstruct(&variant, &"./.".parse()?)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_errors() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variant = Variant::new("chr1", 10, "A", ["G"]).with_sample("s0", "0/x");

        let err = reconstruct(&variant, &"0/2".parse()?).unwrap_err();
        assert_eq!(
            err.to_string(),
            "allele index 2 is out of range for a variant with 2 alleles"
        );

        let err = reconstruct_sample(&variant, "s0").unwrap_err();
        assert!(matches!(err, Error::InvalidGenotype(_, _)));

        let err = reconstruct_sample(&variant, "s1").unwrap_err();
        assert_eq!(err.to_string(), "unknown sample: s1");

        Ok(())
    }
}
