//! Representative confidences for insertion and deletion events.
//!
//! Indels have no one-to-one correspondence with base qualities, so the
//! confidence of an indel is borrowed from a bounded window of the per-base
//! confidences surrounding it. Every window has length
//! `min(length + 2, quals.len())` and always lies within `quals`.

use std::ops::Range;

use crate::quality::Probability;

/// The kind of indel event a window is taken for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Bases present in the read but not the reference.
    Insertion,

    /// Bases present in the reference but not the read.
    Deletion,
}

/// Computes the range of `quals` used for an indel of `length` bases at read
/// offset `start`.
///
/// - Insertions begin one base before `start` (the flanking base) when
///   possible.
/// - Deletions are centered on `start`.
///
/// In both cases the window is shifted left if it would run past the end of
/// `quals`.
///
/// # Examples
///
/// ```
/// use hhga::indel;
/// use hhga::indel::Kind;
///
/// assert_eq!(indel::window(Kind::Insertion, 10, 4, 2), 3..7);
/// assert_eq!(indel::window(Kind::Deletion, 10, 4, 2), 2..6);
///
/// // Windows never run past the end of the read.
/// assert_eq!(indel::window(Kind::Insertion, 10, 9, 3), 5..10);
///
/// // Windows narrow to the whole read when the read is short.
/// assert_eq!(indel::window(Kind::Deletion, 3, 1, 5), 0..3);
/// ```
pub fn window(kind: Kind, len: usize, start: usize, length: usize) -> Range<usize> {
    let width = length.saturating_add(2).min(len);

    let begin = match kind {
        Kind::Insertion => start.saturating_sub(1),
        Kind::Deletion => start.saturating_sub(width / 2),
    };

    let begin = begin.min(len - width);
    begin..begin + width
}

/// Gets the confidences for an indel of `length` bases at read offset
/// `start`.
pub fn windowed_probabilities(
    kind: Kind,
    quals: &[Probability],
    start: usize,
    length: usize,
) -> &[Probability] {
    &quals[window(kind, quals.len(), start, length)]
}

/// Gets the confidences surrounding an insertion.
pub fn insertion_probabilities(
    quals: &[Probability],
    start: usize,
    length: usize,
) -> &[Probability] {
    windowed_probabilities(Kind::Insertion, quals, start, length)
}

/// Gets the confidences surrounding a deletion.
///
/// A deletion consumes no read bases, so this is a read-local proxy rather
/// than a true observation.
pub fn deletion_probabilities(
    quals: &[Probability],
    start: usize,
    length: usize,
) -> &[Probability] {
    windowed_probabilities(Kind::Deletion, quals, start, length)
}

/// Reduces a window of confidences to the single confidence reported for the
/// indel: the least confident base in the window.
///
/// An empty window yields `0.0`.
///
/// # Examples
///
/// ```
/// use hhga::indel;
///
/// assert_eq!(indel::representative(&[0.99, 0.9, 0.999]), 0.9);
/// assert_eq!(indel::representative(&[]), 0.0);
/// ```
pub fn representative(window: &[Probability]) -> Probability {
    window
        .iter()
        .copied()
        .min_by(f64::total_cmp)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_window_bounds_hold_for_arbitrary_inputs() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10_000 {
            let len = rng.gen_range(0..60);
            let start = rng.gen_range(0..=len);
            let length = rng.gen_range(0..80);

            for kind in [Kind::Insertion, Kind::Deletion] {
                let range = window(kind, len, start, length);
                let expected = (length + 2).min(len);

                assert_eq!(range.len(), expected);
                assert!(range.start <= len - expected);
                assert!(range.end <= len);
            }
        }
    }

    #[test]
    fn test_insertion_window_includes_flanks() {
        let quals = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        assert_eq!(insertion_probabilities(&quals, 2, 2), &[0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_insertion_at_read_start() {
        let quals = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        assert_eq!(insertion_probabilities(&quals, 0, 1), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_deletion_window_is_centered() {
        let quals = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        assert_eq!(deletion_probabilities(&quals, 4, 1), &[0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_deletion_window_shifted_at_read_end() {
        let quals = [0.1, 0.2, 0.3, 0.4, 0.5];
        assert_eq!(deletion_probabilities(&quals, 5, 2), &[0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_empty_quals() {
        assert!(deletion_probabilities(&[], 0, 3).is_empty());
    }
}
