use std::collections::HashMap;
use std::slice;

use super::{CodingError, Symbol};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolFrequency<S> {
    pub symbol: S,
    pub frequency: usize,
}

impl<S> From<(S, usize)> for SymbolFrequency<S> {
    fn from(value: (S, usize)) -> Self {
        Self {
            symbol: value.0,
            frequency: value.1,
        }
    }
}

/// Occurrence counts per distinct symbol.
///
/// Entries are kept in first-occurrence order. The tree builder uses that
/// position as tie-break key, so two tables built from the same sequence
/// always yield the same tree.
#[derive(Clone, Debug)]
pub struct FrequencyTable<S> {
    entries: Vec<SymbolFrequency<S>>,
    positions: HashMap<S, usize>,
    total: usize,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            total: 0,
        }
    }

    pub fn increment_symbol(&mut self, symbol: S) {
        match self.positions.get(&symbol) {
            Some(&position) => self.entries[position].frequency += 1,
            None => {
                self.positions.insert(symbol.clone(), self.entries.len());
                self.entries.push(SymbolFrequency {
                    symbol,
                    frequency: 1,
                });
            }
        }
        self.total += 1;
    }

    /// Rebuilds a table from stored entries, e.g. read back from a container.
    ///
    /// The order of `entries` is taken as first-occurrence order.
    pub fn from_entries(entries: Vec<SymbolFrequency<S>>) -> Result<Self, CodingError> {
        let mut positions = HashMap::with_capacity(entries.len());
        let mut total: usize = 0;
        for (position, entry) in entries.iter().enumerate() {
            if entry.frequency == 0 {
                return Err(CodingError::InvalidFrequencyTable(
                    "symbol with zero frequency",
                ));
            }
            if positions.insert(entry.symbol.clone(), position).is_some() {
                return Err(CodingError::InvalidFrequencyTable("duplicate symbol"));
            }
            total = total
                .checked_add(entry.frequency)
                .ok_or(CodingError::InvalidFrequencyTable("total frequency overflows"))?;
        }
        Ok(Self {
            entries,
            positions,
            total,
        })
    }

    pub fn frequency_of(&self, symbol: &S) -> Option<usize> {
        self.positions
            .get(symbol)
            .map(|&position| self.entries[position].frequency)
    }

    pub fn first_occurrence_of(&self, symbol: &S) -> Option<usize> {
        self.positions.get(symbol).copied()
    }
}

impl<S> FrequencyTable<S> {
    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the counted sequence
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> slice::Iter<'_, SymbolFrequency<S>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[SymbolFrequency<S>] {
        &self.entries
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PartialEq> PartialEq for FrequencyTable<S> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<S: Symbol> Extend<S> for FrequencyTable<S> {
    fn extend<T: IntoIterator<Item = S>>(&mut self, symbols: T) {
        for symbol in symbols {
            self.increment_symbol(symbol);
        }
    }
}

impl<S: Symbol> FromIterator<S> for FrequencyTable<S> {
    fn from_iter<T: IntoIterator<Item = S>>(symbols: T) -> Self {
        let mut table = Self::new();
        table.extend(symbols);
        table
    }
}

impl<'a, S> IntoIterator for &'a FrequencyTable<S> {
    type Item = &'a SymbolFrequency<S>;
    type IntoIter = slice::Iter<'a, SymbolFrequency<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::{FrequencyTable, SymbolFrequency};
    use crate::huffman::CodingError;

    #[test]
    fn test_counts_each_symbol() {
        let table: FrequencyTable<char> = "AAAAABBCD".chars().collect();
        assert_eq!(table.len(), 4);
        assert_eq!(table.total(), 9);
        assert_eq!(table.frequency_of(&'A'), Some(5));
        assert_eq!(table.frequency_of(&'B'), Some(2));
        assert_eq!(table.frequency_of(&'C'), Some(1));
        assert_eq!(table.frequency_of(&'D'), Some(1));
        assert_eq!(table.frequency_of(&'E'), None);
    }

    #[test]
    fn test_keeps_first_occurrence_order() {
        let table: FrequencyTable<u8> = [7, 3, 7, 1, 3, 9, 1].into_iter().collect();
        let symbols: Vec<u8> = table.iter().map(|entry| entry.symbol).collect();
        assert_eq!(symbols, vec![7, 3, 1, 9]);
        assert_eq!(table.first_occurrence_of(&9), Some(3));
    }

    #[test]
    fn test_sum_of_frequencies_equals_sequence_length() {
        let sequence: Vec<u16> = (0..1000).map(|i| (i * i % 17) as u16).collect();
        let table: FrequencyTable<u16> = sequence.iter().copied().collect();
        let sum: usize = table.iter().map(|entry| entry.frequency).sum();
        assert_eq!(sum, sequence.len());
        assert_eq!(table.total(), sequence.len());
    }

    #[test]
    fn test_empty_sequence_gives_empty_table() {
        let table: FrequencyTable<u8> = std::iter::empty().collect();
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_from_entries_round_trip() {
        let table: FrequencyTable<char> = "ABRACADABRA".chars().collect();
        let rebuilt = FrequencyTable::from_entries(table.entries().to_vec()).unwrap();
        assert_eq!(rebuilt, table);
        assert_eq!(rebuilt.total(), 11);
        assert_eq!(rebuilt.first_occurrence_of(&'R'), Some(2));
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let entries = [('a', 1), ('b', 2), ('a', 3)].map(SymbolFrequency::from);
        let result = FrequencyTable::from_entries(entries.to_vec());
        assert!(matches!(result, Err(CodingError::InvalidFrequencyTable(_))));
    }

    #[test]
    fn test_from_entries_rejects_zero_frequency() {
        let entries = [('a', 1), ('b', 0)].map(SymbolFrequency::from);
        let result = FrequencyTable::from_entries(entries.to_vec());
        assert!(matches!(result, Err(CodingError::InvalidFrequencyTable(_))));
    }

    #[test]
    fn test_from_entries_rejects_overflowing_total() {
        let entries = [(1u8, usize::MAX), (2u8, 1)].map(SymbolFrequency::from);
        let result = FrequencyTable::from_entries(entries.to_vec());
        assert!(matches!(result, Err(CodingError::InvalidFrequencyTable(_))));
    }
}
