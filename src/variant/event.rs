//! Primitive events that an alternate allele decomposes into.

use crate::allele::Position;

/// A primitive event: a substitution, insertion, deletion, or complex
/// replacement at a 1-based position.
///
/// For a pure insertion, the position is that of the reference base
/// immediately following the inserted bases.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    /// The reference bases.
    reference: String,

    /// The alternate bases.
    alternate: String,

    /// The 1-based position.
    position: Position,
}

impl Event {
    /// Creates a new [`Event`].
    pub fn new(
        reference: impl Into<String>,
        alternate: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            reference: reference.into(),
            alternate: alternate.into(),
            position,
        }
    }

    /// Gets the reference bases.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Gets the alternate bases.
    pub fn alternate(&self) -> &str {
        &self.alternate
    }

    /// Gets the 1-based position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the event only inserts bases.
    pub fn is_insertion(&self) -> bool {
        self.reference.is_empty() && !self.alternate.is_empty()
    }

    /// Whether the event substitutes more than one base without changing the
    /// length.
    pub fn is_multi_base_substitution(&self) -> bool {
        self.reference.len() == self.alternate.len() && self.reference.len() > 1
    }
}

/// Decomposes an alternate allele into primitive events by trimming the
/// bases it shares with the reference allele.
///
/// The shared prefix is trimmed first, then the shared suffix of what
/// remains. An alternate identical to the reference decomposes into nothing.
///
/// # Examples
///
/// ```
/// use hhga::variant::decompose;
/// use hhga::variant::Event;
///
/// // A SNP.
/// assert_eq!(decompose(100, "A", "G"), vec![Event::new("A", "G", 100)]);
///
/// // An insertion after the anchor base at 100 (reported at the following base).
/// assert_eq!(decompose(100, "A", "ATT"), vec![Event::new("", "TT", 101)]);
///
/// // A deletion of the two bases after the anchor base.
/// assert_eq!(decompose(100, "ACG", "A"), vec![Event::new("CG", "", 101)]);
///
/// // An MNP with shared flanks.
/// assert_eq!(decompose(100, "AGTC", "ACAC"), vec![Event::new("GT", "CA", 101)]);
/// ```
pub fn decompose(position: Position, reference: &str, alternate: &str) -> Vec<Event> {
    let prefix = reference
        .bytes()
        .zip(alternate.bytes())
        .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
        .count();

    let (reference, alternate) = (&reference[prefix..], &alternate[prefix..]);

    let suffix = reference
        .bytes()
        .rev()
        .zip(alternate.bytes().rev())
        .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
        .count();

    let reference = &reference[..reference.len() - suffix];
    let alternate = &alternate[..alternate.len() - suffix];

    if reference.is_empty() && alternate.is_empty() {
        return Vec::new();
    }

    vec![Event::new(
        reference,
        alternate,
        position + prefix as Position,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_alleles() {
        assert!(decompose(10, "ACGT", "ACGT").is_empty());
    }

    #[test]
    fn test_complex_replacement() {
        let events = decompose(10, "ACGT", "ATTTGT");
        assert_eq!(events, vec![Event::new("C", "TTT", 11)]);
        assert!(!events[0].is_insertion());
        assert!(!events[0].is_multi_base_substitution());
    }

    #[test]
    fn test_event_kinds() {
        assert!(Event::new("", "T", 5).is_insertion());
        assert!(!Event::new("T", "", 5).is_insertion());
        assert!(Event::new("AC", "GT", 5).is_multi_base_substitution());
        assert!(!Event::new("A", "G", 5).is_multi_base_substitution());
    }

    #[test]
    fn test_repeat_deletion_trims_prefix_first() {
        // In a homopolymer the deleted bases are placed after the shared prefix.
        assert_eq!(decompose(1, "AAAA", "AA"), vec![Event::new("AA", "", 3)]);
    }
}
