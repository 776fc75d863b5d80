use std::cmp::Ordering;

use crate::min_heap::MinHeap;
use crate::statistics::SymbolStatistics;
use crate::symbol::{Codeword, Symbol, ALPHABET_SIZE};

/// Codeword for every symbol of the alphabet, indexed by [`Symbol::index`].
pub type CodeTable = Vec<Option<Codeword>>;

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        HuffmanTree::from_statistics(&SymbolStatistics::from_bytes(bytes))
    }

    /// Merge the two lightest nodes until one is left.
    ///
    /// Leaves enter the working set in canonical order (count, then symbol)
    /// and each merged node after everything already there. Equal weights go
    /// to the earlier entry; the first node taken becomes the left child.
    pub fn from_statistics(stats: &SymbolStatistics) -> Self {
        let leaves: Vec<HeapEntry> = stats
            .frequencies()
            .into_iter()
            .enumerate()
            .map(|(order, f)| HeapEntry {
                order,
                node: HuffNode::new(f.symbol, f.count),
            })
            .collect();
        let mut next_order = leaves.len();
        let mut heap = MinHeap::build(leaves);

        while let Some(x) = heap.extract_min() {
            let Some(y) = heap.extract_min() else {
                return HuffmanTree { root: x.node };
            };

            heap.insert(HeapEntry {
                order: next_order,
                node: HuffNode::merge(x.node, y.node),
            });
            next_order += 1;
        }

        // no symbols at all: the stream still carries its sentinel
        HuffmanTree {
            root: HuffNode::new(Symbol::EndOfStream, 1),
        }
    }

    /// Assign each leaf its root-to-leaf path, left = 0 and right = 1.
    ///
    /// A tree that is a single leaf has no edges; that leaf gets "0" so every
    /// symbol still occupies at least one bit on the stream.
    pub fn generate_table(&self) -> CodeTable {
        let mut table = vec![None; ALPHABET_SIZE];
        match &self.root {
            HuffNode::Leaf { symbol, .. } => {
                table[symbol.index()] = Some(Codeword::new().child(false));
            }
            internal => internal.generate_table(&mut table, Codeword::new()),
        }
        table
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

#[derive(Debug, Clone)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: Symbol,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    fn generate_table(&self, table: &mut CodeTable, code: Codeword) {
        match self {
            HuffNode::Leaf { symbol, .. } => {
                table[symbol.index()] = Some(code);
            }
            HuffNode::Internal { left, right, .. } => {
                left.generate_table(table, code.child(false));
                right.generate_table(table, code.child(true));
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Working-set slot; ordered by weight, then by insertion order.
#[derive(Debug)]
struct HeapEntry {
    order: usize,
    node: HuffNode,
}

impl HeapEntry {
    fn key(&self) -> (u64, usize) {
        (self.node.weight(), self.order)
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
