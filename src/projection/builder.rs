//! A builder for a [`Map`].

use std::collections::BTreeMap;

use crate::allele::Allele;
use crate::allele::Position;
use crate::projection::Map;
use crate::projection::Result;
use crate::projection::ranks;

/// A builder for a [`Map`].
///
/// Each pushed sequence contributes its per-position depth, and the map gives
/// every position the maximum depth seen across all sequences.
#[derive(Debug, Default)]
pub struct Builder {
    /// The maximum depth seen at each genomic position.
    depths: BTreeMap<Position, usize>,
}

impl Builder {
    /// Adds a sequence's depths to the builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use hhga::allele::Allele;
    /// use hhga::projection::Map;
    ///
    /// let mut builder = Map::builder();
    /// builder.push(&[Allele::new("A", "A", 5, 1.0), Allele::new("", "C", 5, 1.0)])?;
    /// builder.push(&[Allele::new("A", "A", 5, 1.0), Allele::new("T", "T", 6, 1.0)])?;
    ///
    /// let map = builder.build();
    /// assert_eq!(map.width(), 3);
    /// assert_eq!(map.depth(5), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push(&mut self, sequence: &[Allele]) -> Result<()> {
        let mut depths = BTreeMap::<Position, usize>::new();

        for (position, rank) in ranks(sequence)? {
            let depth = depths.entry(position).or_default();
            *depth = (*depth).max(rank + 1);
        }

        for (position, depth) in depths {
            let entry = self.depths.entry(position).or_default();
            *entry = (*entry).max(depth);
        }

        Ok(())
    }

    /// Consumes `self` to build a [`Map`].
    pub fn build(self) -> Map {
        let mut columns = BTreeMap::new();
        let mut column = 0;

        for (position, depth) in self.depths {
            for rank in 0..depth {
                columns.insert((position, rank), column);
                column += 1;
            }
        }

        Map { columns }
    }
}
