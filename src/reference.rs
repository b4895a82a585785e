//! Contiguous stretches of reference sequence.

use crate::allele::Allele;
use crate::allele::AlleleSequence;
use crate::allele::Position;

/// A contiguous stretch of a reference sequence beginning at a 0-based
/// position.
///
/// Bases are stored uppercased so that soft-masked reference sequence
/// compares equal to read bases.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Window {
    /// The name of the reference sequence.
    contig: String,

    /// The 0-based position of the first base.
    start: Position,

    /// The bases.
    bases: Vec<u8>,
}

impl Window {
    /// Creates a new [`Window`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::reference::Window;
    ///
    /// let window = Window::new("chr1", 98, "acgta");
    /// assert_eq!(window.start(), 98);
    /// assert_eq!(window.end(), 103);
    /// assert_eq!(window.base(100), Some(b'G'));
    /// assert_eq!(window.base(103), None);
    /// ```
    pub fn new(contig: impl Into<String>, start: Position, bases: impl AsRef<[u8]>) -> Self {
        Self {
            contig: contig.into(),
            start,
            bases: bases.as_ref().to_ascii_uppercase(),
        }
    }

    /// Gets the name of the reference sequence.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Gets the 0-based position of the first base.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the exclusive end of the window.
    pub fn end(&self) -> Position {
        self.start + self.bases.len() as Position
    }

    /// Gets the bases.
    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    /// Gets the base at a 0-based position, if the window covers it.
    pub fn base(&self, position: Position) -> Option<u8> {
        let offset = usize::try_from(position - self.start).ok()?;
        self.bases.get(offset).copied()
    }

    /// Builds the reference row over `[start, end)`, clipped to the window.
    ///
    /// Every base becomes an allele whose reference and alternate are both
    /// that base, with full confidence.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::reference::Window;
    ///
    /// let window = Window::new("chr1", 98, "ACGTA");
    /// let row = window.alleles(100, 200);
    ///
    /// let keys = row.iter().map(|allele| allele.key()).collect::<Vec<_>>();
    /// assert_eq!(keys, vec!["100:G/G", "101:T/T", "102:A/A"]);
    /// ```
    pub fn alleles(&self, start: Position, end: Position) -> AlleleSequence {
        (start.max(self.start)..end.min(self.end()))
            .filter_map(|position| {
                let base = self.base(position)?;
                let base = char::from(base).to_string();
                Some(Allele::new(base.clone(), base, position, 1.0))
            })
            .collect()
    }
}
