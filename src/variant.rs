//! Candidate variant sites.

use std::collections::BTreeMap;

use crate::allele::Position;

pub mod event;
pub mod genotype;

pub use event::Event;
pub use event::decompose;
pub use genotype::Genotype;

/// A candidate variant site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variant {
    /// The name of the reference sequence.
    contig: String,

    /// The 1-based position of the reference allele.
    position: Position,

    /// The reference allele.
    reference: String,

    /// The alternate alleles, in allele-index order (index `i` here is allele
    /// index `i + 1`).
    alternates: Vec<String>,

    /// The primitive events of each alternate allele.
    decomposed: BTreeMap<String, Vec<Event>>,

    /// The genotype string of each sample.
    samples: BTreeMap<String, String>,
}

impl Variant {
    /// Creates a new [`Variant`], decomposing each alternate allele with
    /// [`decompose()`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::variant::Event;
    /// use hhga::variant::Variant;
    ///
    /// let variant = Variant::new("chr1", 100, "A", ["AT", "G"]);
    ///
    /// assert_eq!(variant.contig(), "chr1");
    /// assert_eq!(variant.anchor(), 99);
    /// assert_eq!(variant.alternates(), &["AT", "G"]);
    /// assert_eq!(
    ///     variant.events("AT"),
    ///     Some(&[Event::new("", "T", 101)][..])
    /// );
    /// ```
    pub fn new<I, S>(
        contig: impl Into<String>,
        position: Position,
        reference: impl Into<String>,
        alternates: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reference = reference.into();
        let alternates = alternates.into_iter().map(Into::into).collect::<Vec<_>>();

        let decomposed = alternates
            .iter()
            .map(|alternate| {
                (
                    alternate.clone(),
                    decompose(position, &reference, alternate),
                )
            })
            .collect();

        Self {
            contig: contig.into(),
            position,
            reference,
            alternates,
            decomposed,
            samples: BTreeMap::new(),
        }
    }

    /// Replaces the decomposition of an alternate allele with one supplied
    /// by the variant source.
    pub fn with_events(mut self, alternate: impl Into<String>, events: Vec<Event>) -> Self {
        self.decomposed.insert(alternate.into(), events);
        self
    }

    /// Adds (or replaces) the genotype string of a sample.
    pub fn with_sample(mut self, name: impl Into<String>, genotype: impl Into<String>) -> Self {
        self.samples.insert(name.into(), genotype.into());
        self
    }

    /// Gets the name of the reference sequence.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the 1-based position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Gets the 0-based position of the first reference base, the column the
    /// matrix is centered on.
    pub fn anchor(&self) -> Position {
        self.position - 1
    }

    /// Gets the reference allele.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Gets the alternate alleles.
    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    /// Gets the primitive events of every alternate allele.
    pub fn alternates_decomposed(&self) -> &BTreeMap<String, Vec<Event>> {
        &self.decomposed
    }

    /// Gets the primitive events of one alternate allele.
    pub fn events(&self, alternate: &str) -> Option<&[Event]> {
        self.decomposed.get(alternate).map(Vec::as_slice)
    }

    /// Gets the genotype strings keyed by sample name.
    pub fn samples(&self) -> &BTreeMap<String, String> {
        &self.samples
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} {}/{}",
            self.contig,
            self.position,
            self.reference,
            self.alternates.join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples() {
        let variant = Variant::new("chr1", 10, "A", ["C"])
            .with_sample("b", "0/1")
            .with_sample("a", "1/1");

        let names = variant.samples().keys().cloned().collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(variant.to_string(), "chr1:10 A/C");
    }

    #[test]
    fn test_supplied_events_replace_decomposition() {
        let variant = Variant::new("chr1", 10, "AC", ["GT"])
            .with_events("GT", vec![Event::new("A", "G", 10), Event::new("C", "T", 11)]);

        assert_eq!(variant.events("GT").map(<[Event]>::len), Some(2));
        assert_eq!(variant.events("TT"), None);
    }
}
