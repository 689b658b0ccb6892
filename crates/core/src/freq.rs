//! Byte frequency counting.
//!
//! Counting is its own stage: it consumes a reader and returns a plain
//! `FrequencyTable` value. The encode stage later takes a fresh reader over
//! the same bytes, so no source ever needs to be rewound.

use std::io::{self, Read};

use tracing::debug;

/// Occurrence counts for the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Create a table with every count at zero.
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count every byte of an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Count every byte `reader` yields until end of stream.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.update(&buf[..n]);
        }
        debug!(
            total = table.total(),
            distinct = table.distinct(),
            "counted byte frequencies"
        );
        Ok(table)
    }

    /// Add the bytes of `data` to the counts.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
    }

    /// Occurrences of `byte`.
    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// Number of byte values with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Nonzero entries in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(byte, &c)| (byte as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.count(b'a'), 5);
        assert_eq!(table.count(b'b'), 2);
        assert_eq!(table.count(b'r'), 2);
        assert_eq!(table.count(b'c'), 1);
        assert_eq!(table.count(b'd'), 1);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.distinct(), 5);
        assert_eq!(table.total(), 11);
    }

    #[test]
    fn test_empty() {
        let table = FrequencyTable::from_bytes(b"");
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn test_reader_matches_slice() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let from_reader = FrequencyTable::from_reader(data.as_slice()).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data));
    }

    #[test]
    fn test_iter_in_byte_order() {
        let table = FrequencyTable::from_bytes(&[9, 3, 3, 255, 0]);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(0, 1), (3, 2), (9, 1), (255, 1)]);
    }

    #[test]
    fn test_update_accumulates() {
        let mut table = FrequencyTable::from_bytes(b"aa");
        table.update(b"ab");
        assert_eq!(table.count(b'a'), 3);
        assert_eq!(table.count(b'b'), 1);
    }
}
