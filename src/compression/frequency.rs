use std::collections::BTreeMap;

/// Occurrence counts for every byte present in an input.
///
/// Only symbols that occur are stored, so every count is at least one and the counts sum to the
/// input length. Iteration is in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Counts the symbols of `input`.
    pub fn from_bytes(input: &[u8]) -> Self {
        let mut histogram = [0usize; 256];
        for &symbol in input {
            histogram[symbol as usize] += 1;
        }

        let counts = histogram
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
            .collect();

        Self {
            counts,
            total: input.len(),
        }
    }

    /// Occurrences of `symbol`, zero when absent.
    pub fn get(&self, symbol: u8) -> usize {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, equal to the input length.
    pub fn total(&self) -> usize {
        self.total
    }

    /// `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}
