//! In-memory collaborators.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::convert::Infallible;

use omics::coordinate::Contig;
use rust_lapper as lapper;

use crate::alignment::Alignment;
use crate::allele::Position;
use crate::reference::Window;
use crate::region::Region;
use crate::source::AlignmentSource;
use crate::source::SequenceStore;
use crate::source::VariantSource;
use crate::source::sequence;
use crate::variant::Variant;

/// Converts a position to an interval bound, clamping negative positions to
/// zero.
fn bound(position: Position) -> usize {
    usize::try_from(position).unwrap_or(0)
}

/// Alignments indexed by the reference span they cover.
#[derive(Debug)]
pub struct Alignments {
    /// The alignments, in the order they were added.
    alignments: Vec<Alignment>,

    /// The indices of the alignments on each contig, keyed by span.
    index: HashMap<Contig, lapper::Lapper<usize, usize>>,
}

impl Alignments {
    /// Gets the number of alignments.
    pub fn len(&self) -> usize {
        self.alignments.len()
    }

    /// Whether there are no alignments.
    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }
}

impl FromIterator<Alignment> for Alignments {
    fn from_iter<T: IntoIterator<Item = Alignment>>(iter: T) -> Self {
        let alignments = iter.into_iter().collect::<Vec<_>>();
        let mut intervals = HashMap::<Contig, Vec<lapper::Interval<usize, usize>>>::new();

        for (i, alignment) in alignments.iter().enumerate() {
            let start = bound(alignment.unclipped_start());
            let stop = bound(alignment.end()).max(start + 1);

            intervals
                .entry(Contig::from(alignment.contig().to_string()))
                .or_default()
                .push(lapper::Interval { start, stop, val: i });
        }

        let index = intervals
            .into_iter()
            .map(|(contig, intervals)| (contig, lapper::Lapper::new(intervals)))
            .collect();

        Self { alignments, index }
    }
}

impl AlignmentSource for Alignments {
    type Error = Infallible;

    /// Gets every alignment overlapping a region, in the order the alignments
    /// were added.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::alignment::Alignment;
    /// use hhga::source::memory::Alignments;
    /// use hhga::source::AlignmentSource as _;
    ///
    /// let read = |name: &str, position| {
    ///     Alignment::builder()
    ///         .name(name)
    ///         .contig("chr1")
    ///         .position(position)
    ///         .bases("ACGT")
    ///         .qualities("IIII")
    ///         .cigar("4M".parse().unwrap())
    ///         .try_build()
    ///         .unwrap()
    /// };
    ///
    /// let mut alignments = [read("a", 10), read("b", 20), read("c", 12)]
    ///     .into_iter()
    ///     .collect::<Alignments>();
    ///
    /// let found = alignments.alignments_in_region(&"chr1:13-21".parse()?)?;
    /// let names = found.iter().map(|a| a.name()).collect::<Vec<_>>();
    /// assert_eq!(names, vec!["a", "b", "c"]);
    ///
    /// let found = alignments.alignments_in_region(&"chr1:14-20".parse()?)?;
    /// let names = found.iter().map(|a| a.name()).collect::<Vec<_>>();
    /// assert_eq!(names, vec!["c"]);
    ///
    /// assert!(alignments.alignments_in_region(&"chr2".parse()?)?.is_empty());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn alignments_in_region(&mut self, region: &Region) -> Result<Vec<Alignment>, Self::Error> {
        let Some(index) = self.index.get(&Contig::from(region.contig().to_string())) else {
            return Ok(Vec::new());
        };

        let start = bound(region.start());
        let stop = region.end().map(bound).unwrap_or(usize::MAX);

        let mut found = index
            .find(start, stop)
            .map(|interval| interval.val)
            .collect::<Vec<_>>();
        found.sort_unstable();

        Ok(found
            .into_iter()
            .map(|i| self.alignments[i].clone())
            .collect())
    }
}

/// Named reference sequences.
#[derive(Debug, Default)]
pub struct Sequences {
    /// The bases of each sequence.
    inner: HashMap<String, Vec<u8>>,
}

impl Sequences {
    /// Adds (or replaces) a sequence.
    pub fn insert(&mut self, name: impl Into<String>, bases: impl Into<Vec<u8>>) {
        self.inner.insert(name.into(), bases.into());
    }

    /// Gets the length of a sequence.
    pub fn length(&self, name: &str) -> Option<usize> {
        self.inner.get(name).map(Vec::len)
    }
}

impl<N, B> FromIterator<(N, B)> for Sequences
where
    N: Into<String>,
    B: Into<Vec<u8>>,
{
    fn from_iter<T: IntoIterator<Item = (N, B)>>(iter: T) -> Self {
        let mut sequences = Self::default();

        for (name, bases) in iter {
            sequences.insert(name, bases);
        }

        sequences
    }
}

impl SequenceStore for Sequences {
    /// # Examples
    ///
    /// ```
    /// use hhga::source::memory::Sequences;
    /// use hhga::source::SequenceStore as _;
    ///
    /// let sequences = [("chr1", "ACGTACGT")].into_iter().collect::<Sequences>();
    ///
    /// let window = sequences.subsequence("chr1", 2, 3)?;
    /// assert_eq!(window.bases(), b"GTA");
    ///
    /// let window = sequences.subsequence("chr1", 6, 10)?;
    /// assert_eq!(window.bases(), b"GT");
    ///
    /// assert!(sequences.subsequence("chr2", 0, 1).is_err());
    /// assert!(sequences.subsequence("chr1", 8, 1).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn subsequence(
        &self,
        name: &str,
        start: Position,
        length: usize,
    ) -> Result<Window, sequence::Error> {
        let bases = self
            .inner
            .get(name)
            .ok_or_else(|| sequence::Error::NotFound(name.to_string()))?;

        let offset = usize::try_from(start)
            .ok()
            .filter(|offset| *offset < bases.len())
            .ok_or_else(|| sequence::Error::OutOfRange(name.to_string(), start, bases.len()))?;

        let end = offset.saturating_add(length).min(bases.len());
        Ok(Window::new(name, start, &bases[offset..end]))
    }
}

/// A queue of variants.
#[derive(Debug, Default)]
pub struct Variants {
    /// The variants not yet handed out.
    inner: VecDeque<Variant>,
}

impl FromIterator<Variant> for Variants {
    fn from_iter<T: IntoIterator<Item = Variant>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl VariantSource for Variants {
    type Error = Infallible;

    fn next_variant(&mut self) -> Result<Option<Variant>, Self::Error> {
        Ok(self.inner.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_clips_extend_the_indexed_span() -> Result<(), Box<dyn std::error::Error>> {
        let alignment = Alignment::builder()
            .name("clipped")
            .contig("chr1")
            .position(10)
            .bases("AAACGT")
            .qualities("IIIIII")
            .cigar("3S3M".parse()?)
            .try_build()?;

        let mut alignments = [alignment].into_iter().collect::<Alignments>();
        assert_eq!(alignments.len(), 1);

        assert_eq!(alignments.alignments_in_region(&"chr1:7".parse()?)?.len(), 1);
        assert_eq!(alignments.alignments_in_region(&"chr1:6".parse()?)?.len(), 0);
        assert_eq!(alignments.alignments_in_region(&"chr1:13".parse()?)?.len(), 0);

        Ok(())
    }

    #[test]
    fn test_sequence_errors() {
        let sequences = [("chr1", "ACGT")].into_iter().collect::<Sequences>();
        assert_eq!(sequences.length("chr1"), Some(4));

        let err = sequences.subsequence("chr2", 0, 1).unwrap_err();
        assert_eq!(err.to_string(), "sequence not found: chr2");
        assert!(err.is_variant_scoped());

        let err = sequences.subsequence("chr1", -1, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "position -1 is out of range for sequence chr1 of length 4"
        );
        assert!(err.is_variant_scoped());
    }

    #[test]
    fn test_variants_drain_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut variants = [
            Variant::new("chr1", 1, "A", ["C"]),
            Variant::new("chr1", 2, "C", ["G"]),
        ]
        .into_iter()
        .collect::<Variants>();

        assert_eq!(variants.next_variant()?.map(|v| v.position()), Some(1));
        assert_eq!(variants.next_variant()?.map(|v| v.position()), Some(2));
        assert_eq!(variants.next_variant()?, None);

        Ok(())
    }
}
