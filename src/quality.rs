//! Conversions between encoded base qualities, Phred scores, and
//! probabilities.
//!
//! Three scales show up throughout the crate:
//!
//! - **Quality characters**, the printable encoding found in alignment files
//!   (Phred + [`QUALITY_OFFSET`]).
//! - **Phred scores**, `Q = -10 * log10(P)`.
//! - **Probabilities**, either linear or natural-log.
//!
//! Conversions into the Phred scale are clamped to [`PHRED_MAX`].

use std::f64::consts::LN_10;
use std::f64::consts::LOG10_E;

/// The largest Phred score that will be produced by a conversion.
pub const PHRED_MAX: f64 = 1000.0;

/// The offset subtracted from a quality character to obtain its Phred score.
pub const QUALITY_OFFSET: u8 = 33;

/// A linear-scale probability in `[0, 1]`.
pub type Probability = f64;

/// Decodes a quality character into an integer Phred score.
///
/// # Examples
///
/// ```
/// use hhga::quality;
///
/// assert_eq!(quality::decode_char(b'!'), 0);
/// assert_eq!(quality::decode_char(b'I'), 40);
/// ```
pub fn decode_char(c: u8) -> i16 {
    i16::from(c) - i16::from(QUALITY_OFFSET)
}

/// Decodes a quality character into a floating point Phred score.
pub fn decode_char_f64(c: u8) -> f64 {
    f64::from(decode_char(c))
}

/// Decodes a quality character and returns the natural log of its Phred
/// score.
pub fn decode_char_ln(c: u8) -> f64 {
    decode_char_f64(c).ln()
}

/// Encodes an integer Phred score as a quality character.
///
/// Scores that would fall outside of the printable range saturate.
///
/// # Examples
///
/// ```
/// use hhga::quality;
///
/// assert_eq!(quality::encode_char(40), b'I');
/// assert_eq!(quality::decode_char(quality::encode_char(17)), 17);
/// ```
pub fn encode_char(q: u8) -> u8 {
    q.saturating_add(QUALITY_OFFSET).min(b'~')
}

/// Converts a natural-log value into a log10 value.
pub fn ln_to_log10(ln: f64) -> f64 {
    LOG10_E * ln
}

/// Converts a log10 value into a natural-log value.
pub fn log10_to_ln(log10: f64) -> f64 {
    LN_10 * log10
}

/// Converts a Phred score into the natural log of its error probability.
///
/// # Examples
///
/// ```
/// use hhga::quality;
///
/// let ln = quality::phred_to_ln(20.0);
/// assert!((ln - 0.01_f64.ln()).abs() < 1e-12);
/// ```
pub fn phred_to_ln(q: f64) -> f64 {
    LN_10 * q * -0.1
}

/// Converts the natural log of an error probability into a Phred score.
pub fn ln_to_phred(ln: f64) -> f64 {
    -10.0 * LOG10_E * ln
}

/// Converts a Phred score into a linear error probability.
///
/// # Examples
///
/// ```
/// use hhga::quality;
///
/// assert!((quality::phred_to_probability(10.0) - 0.1).abs() < 1e-12);
/// assert_eq!(quality::phred_to_probability(0.0), 1.0);
/// ```
pub fn phred_to_probability(q: f64) -> Probability {
    10f64.powf(q * -0.1)
}

/// Converts a linear error probability into a Phred score.
///
/// A probability of exactly `1.0` maps to [`PHRED_MAX`] (rather than `-0`),
/// as does any result outside of `[0, PHRED_MAX]`.
///
/// # Examples
///
/// ```
/// use hhga::quality;
///
/// assert!((quality::probability_to_phred(0.001) - 30.0).abs() < 1e-9);
/// assert_eq!(quality::probability_to_phred(1.0), quality::PHRED_MAX);
/// assert_eq!(quality::probability_to_phred(0.0), quality::PHRED_MAX);
/// ```
pub fn probability_to_phred(p: Probability) -> f64 {
    if p == 1.0 {
        return PHRED_MAX;
    }

    let q = -10.0 * p.log10();

    if !(0.0..=PHRED_MAX).contains(&q) {
        PHRED_MAX
    } else {
        q
    }
}

/// Converts a quality character into the confidence that the base call is
/// correct.
///
/// # Examples
///
/// ```
/// use hhga::quality;
///
/// assert!((quality::confidence(b'+') - 0.9).abs() < 1e-12);
/// ```
pub fn confidence(c: u8) -> Probability {
    1.0 - phred_to_probability(decode_char_f64(c))
}

/// Converts an encoded quality string into per-base confidences.
pub fn confidences(qualities: &[u8]) -> Vec<Probability> {
    qualities.iter().copied().map(confidence).collect()
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_phred_probability_round_trip() {
        for q in 1..1000 {
            let q = f64::from(q);
            let back = probability_to_phred(phred_to_probability(q));
            assert!((back - q).abs() < 1e-6, "{q} came back as {back}");
        }
    }

    #[test]
    fn test_phred_zero_is_clamped() {
        assert_eq!(phred_to_probability(0.0), 1.0);
        assert_eq!(probability_to_phred(phred_to_probability(0.0)), PHRED_MAX);
    }

    #[test]
    fn test_probability_to_phred_out_of_range() {
        assert_eq!(probability_to_phred(2.0), PHRED_MAX);
        assert_eq!(probability_to_phred(1e-200), PHRED_MAX);
    }

    #[test]
    fn test_ln_round_trips() {
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..1000 {
            let q = rng.gen_range(0.0..PHRED_MAX);
            assert!((ln_to_phred(phred_to_ln(q)) - q).abs() < 1e-9);

            let value = rng.gen_range(-50.0..50.0);
            assert!((log10_to_ln(ln_to_log10(value)) - value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quality_chars() {
        assert_eq!(decode_char(b'5'), 20);
        assert_eq!(decode_char_f64(b'5'), 20.0);
        assert!((decode_char_ln(b'5') - 20f64.ln()).abs() < 1e-12);
        assert_eq!(encode_char(20), b'5');
        assert_eq!(encode_char(200), b'~');
    }

    #[test]
    fn test_confidences() {
        let values = confidences(b"!5?");
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 0.99).abs() < 1e-12);
        assert!((values[2] - 0.999).abs() < 1e-12);
    }
}
