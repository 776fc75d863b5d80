//! Frequency analysis over the byte alphabet plus the end-of-stream sentinel.

use crate::symbol::{Symbol, ALPHABET_SIZE};

/// Occurrence count of one symbol together with its derived probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolFrequency {
    pub symbol: Symbol,
    pub count: u64,
    pub probability: f64,
}

impl SymbolFrequency {
    /// -log2(probability), in bits. A certain symbol carries exactly 0.0.
    pub fn self_information(&self) -> f64 {
        self.probability.recip().log2()
    }
}

#[derive(Debug, Clone)]
pub struct SymbolStatistics {
    counts: [u64; ALPHABET_SIZE],
    total: u64,
}

impl SymbolStatistics {
    /// Count every byte of `bytes`, then add the sentinel once.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        counts[Symbol::EndOfStream.index()] = 1;

        SymbolStatistics {
            counts,
            total: bytes.len() as u64 + 1,
        }
    }

    /// Statistics with nothing counted, not even the sentinel.
    pub fn empty() -> Self {
        SymbolStatistics {
            counts: [0u64; ALPHABET_SIZE],
            total: 0,
        }
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    /// Total number of symbol occurrences, the sentinel included.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Present symbols in canonical order: count ascending, then symbol ascending.
    pub fn frequencies(&self) -> Vec<SymbolFrequency> {
        let total = self.total as f64;
        let mut frequencies: Vec<SymbolFrequency> = self
            .counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .filter_map(|(index, &count)| {
                Symbol::from_index(index).map(|symbol| SymbolFrequency {
                    symbol,
                    count,
                    probability: count as f64 / total,
                })
            })
            .collect();

        frequencies.sort_by(|a, b| a.count.cmp(&b.count).then(a.symbol.cmp(&b.symbol)));
        frequencies
    }

    /// Shannon entropy of the distribution, in bits per symbol.
    pub fn entropy(&self) -> f64 {
        self.frequencies()
            .iter()
            .map(|f| f.probability * f.self_information())
            .sum()
    }
}
