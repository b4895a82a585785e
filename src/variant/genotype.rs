//! Sample genotypes.

use std::num::ParseIntError;
use std::str::FromStr;

/// The separator between calls of an unphased genotype.
const UNPHASED_SEPARATOR: char = '/';

/// The separator between calls of a phased genotype.
const PHASED_SEPARATOR: char = '|';

/// The value of a missing call.
const NO_CALL: &str = ".";

/// An error related to the parsing of a genotype.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The genotype was empty.
    Empty,

    /// A call was not an allele index or a no-call.
    InvalidCall(ParseIntError, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty genotype"),
            ParseError::InvalidCall(err, call) => write!(f, "invalid call {call}: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// The called allele indices of one sample at a variant.
///
/// Index `0` is the reference allele and index `i > 0` is the `i`th alternate
/// allele. A missing call is [`None`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Genotype {
    /// The calls, one per haplotype.
    calls: Vec<Option<usize>>,

    /// Whether the calls are phased.
    phased: bool,
}

impl Genotype {
    /// Creates a new [`Genotype`].
    pub fn new(calls: Vec<Option<usize>>, phased: bool) -> Self {
        Self { calls, phased }
    }

    /// Gets the calls.
    pub fn calls(&self) -> &[Option<usize>] {
        &self.calls
    }

    /// Whether the calls are phased.
    pub fn is_phased(&self) -> bool {
        self.phased
    }

    /// Gets the number of haplotypes (the ploidy).
    pub fn ploidy(&self) -> usize {
        self.calls.len()
    }
}

impl FromStr for Genotype {
    type Err = ParseError;

    /// Parses a genotype such as `0/1`, `1|1`, `./1`, or `2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::variant::Genotype;
    ///
    /// let genotype = "0|2".parse::<Genotype>()?;
    /// assert_eq!(genotype.calls(), &[Some(0), Some(2)]);
    /// assert!(genotype.is_phased());
    ///
    /// let genotype = "./1".parse::<Genotype>()?;
    /// assert_eq!(genotype.calls(), &[None, Some(1)]);
    /// assert!(!genotype.is_phased());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        let phased = s.contains(PHASED_SEPARATOR);

        let calls = s
            .split([UNPHASED_SEPARATOR, PHASED_SEPARATOR])
            .map(|call| match call {
                NO_CALL => Ok(None),
                call => call
                    .parse()
                    .map(Some)
                    .map_err(|e| ParseError::InvalidCall(e, call.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { calls, phased })
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = match self.phased {
            true => PHASED_SEPARATOR,
            false => UNPHASED_SEPARATOR,
        };

        for (i, call) in self.calls.iter().enumerate() {
            if i > 0 {
                write!(f, "{separator}")?;
            }

            match call {
                Some(index) => write!(f, "{index}")?,
                None => write!(f, "{NO_CALL}")?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haploid() -> Result<(), Box<dyn std::error::Error>> {
        let genotype = "1".parse::<Genotype>()?;
        assert_eq!(genotype.calls(), &[Some(1)]);
        assert_eq!(genotype.ploidy(), 1);
        Ok(())
    }

    #[test]
    fn test_display() -> Result<(), Box<dyn std::error::Error>> {
        for value in ["0/1", "1|1", "./.", "2"] {
            assert_eq!(value.parse::<Genotype>()?.to_string(), value);
        }

        Ok(())
    }

    #[test]
    fn test_invalid_genotypes() {
        assert_eq!("".parse::<Genotype>().unwrap_err(), ParseError::Empty);

        let err = "0/x".parse::<Genotype>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid call x: invalid digit found in string"
        );
    }
}
