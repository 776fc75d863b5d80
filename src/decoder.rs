//! Tree reconstruction from codebook entries and the bit-by-bit tree walk.
//!
//! The decode tree is rebuilt only from symbol/codeword pairs, so it may be
//! incomplete: a codebook that does not cover every path leaves dead ends.
//! Hitting one is an invalid codeword. By default the walk records it,
//! returns to the root and carries on with the next bit. This can silently
//! desynchronize and misdecode the rest of a corrupted stream; it does not
//! detect every kind of corruption. [`DecodeOptions::strict`] turns the first
//! dead end into an error instead.

use crate::bit_io::BitReader;
use crate::codebook::CodebookEntry;
use crate::error::{HuffmanError, HuffmanResult};
use crate::symbol::Symbol;

const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct DecodeNode {
    symbol: Option<Symbol>,
    /// Left ('0') and right ('1') children.
    children: [Option<usize>; 2],
}

impl DecodeNode {
    fn is_internal(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }
}

/// Prefix tree over codewords, stored as an arena with the root at index 0.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
    leaves: usize,
}

impl DecodeTree {
    pub fn new() -> Self {
        DecodeTree {
            nodes: vec![DecodeNode::default()],
            leaves: 0,
        }
    }

    /// Insert every entry's codeword, creating internal nodes along the way.
    pub fn from_entries(entries: &[CodebookEntry]) -> HuffmanResult<Self> {
        let mut tree = DecodeTree::new();
        for entry in entries {
            tree.insert(entry)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, entry: &CodebookEntry) -> HuffmanResult<()> {
        let conflict = || HuffmanError::ConflictingCodeword {
            symbol: entry.symbol,
            codeword: entry.codeword.clone(),
        };
        if entry.codeword.is_empty() {
            return Err(conflict());
        }

        let mut current = ROOT;
        for &bit in entry.codeword.bits() {
            if self.nodes[current].symbol.is_some() {
                return Err(conflict());
            }
            current = match self.nodes[current].children[bit as usize] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(DecodeNode::default());
                    self.nodes[current].children[bit as usize] = Some(child);
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if node.is_internal() {
            return Err(conflict());
        }
        match node.symbol {
            Some(existing) if existing == entry.symbol => Ok(()),
            Some(_) => Err(conflict()),
            None => {
                node.symbol = Some(entry.symbol);
                self.leaves += 1;
                Ok(())
            }
        }
    }

    /// Number of symbols reachable in the tree.
    pub fn leaves(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    pub fn contains_end_of_stream(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| n.symbol == Some(Symbol::EndOfStream))
    }
}

impl Default for DecodeTree {
    fn default() -> Self {
        Self::new()
    }
}

/// What one bit did to the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to an internal node.
    Continue,
    Emit(u8),
    EndOfStream,
    /// No child on that side; the walk is back at the root.
    DeadEnd,
}

/// Walk state: the node the decoder currently stands on.
#[derive(Debug)]
pub struct Decoder<'t> {
    tree: &'t DecodeTree,
    position: usize,
}

impl<'t> Decoder<'t> {
    pub fn new(tree: &'t DecodeTree) -> Self {
        Decoder {
            tree,
            position: ROOT,
        }
    }

    pub fn at_root(&self) -> bool {
        self.position == ROOT
    }

    pub fn step(&mut self, bit: bool) -> Step {
        let Some(next) = self.tree.nodes[self.position].children[bit as usize] else {
            self.position = ROOT;
            return Step::DeadEnd;
        };

        match self.tree.nodes[next].symbol {
            Some(Symbol::EndOfStream) => {
                self.position = ROOT;
                Step::EndOfStream
            }
            Some(Symbol::Byte(byte)) => {
                self.position = ROOT;
                Step::Emit(byte)
            }
            None => {
                self.position = next;
                Step::Continue
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail on the first invalid codeword instead of resynchronizing.
    pub strict: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        DecodeOptions { strict: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    /// 1-based positions of the bits that ran into a dead end.
    pub invalid_codewords: Vec<u64>,
    /// Whether the end-of-stream codeword was seen before the input ran out.
    pub end_of_stream: bool,
    pub bits_read: u64,
    pub bytes_consumed: usize,
}

/// Walk `encoded` against `tree` until the end-of-stream symbol or the end of input.
pub fn decode_bitstream(
    tree: &DecodeTree,
    encoded: &[u8],
    options: DecodeOptions,
) -> HuffmanResult<Decoded> {
    if tree.is_empty() && !encoded.is_empty() {
        return Err(HuffmanError::EmptyCodebook);
    }

    let mut reader = BitReader::new(encoded);
    let mut decoder = Decoder::new(tree);
    let mut decoded = Decoded::default();

    while let Some(bit) = reader.read_bit() {
        match decoder.step(bit) {
            Step::Continue => {}
            Step::Emit(byte) => decoded.bytes.push(byte),
            Step::EndOfStream => {
                decoded.end_of_stream = true;
                break;
            }
            Step::DeadEnd => {
                let bit_position = reader.bits_read();
                if options.strict {
                    return Err(HuffmanError::InvalidCodeword { bit_position });
                }
                decoded.invalid_codewords.push(bit_position);
            }
        }
    }

    decoded.bits_read = reader.bits_read();
    decoded.bytes_consumed = reader.bytes_consumed();
    Ok(decoded)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::Codeword;

    fn entry(symbol: Symbol, code: &str) -> CodebookEntry {
        CodebookEntry {
            symbol,
            codeword: code.parse::<Codeword>().unwrap(),
        }
    }

    fn aaab_tree() -> DecodeTree {
        DecodeTree::from_entries(&[
            entry(Symbol::Byte(b'b'), "00"),
            entry(Symbol::EndOfStream, "01"),
            entry(Symbol::Byte(b'a'), "1"),
        ])
        .unwrap()
    }

    #[test]
    fn test_decode_aaab_and_stop_at_sentinel() {
        let tree = aaab_tree();
        assert_eq!(tree.leaves(), 3);
        assert!(tree.contains_end_of_stream());

        let decoded =
            decode_bitstream(&tree, &[0xE2, 0xFF, 0xFF], DecodeOptions::default()).unwrap();
        assert_eq!(decoded.bytes, b"aaab");
        assert!(decoded.end_of_stream);
        assert!(decoded.invalid_codewords.is_empty());
        assert_eq!(decoded.bits_read, 7);
        assert_eq!(decoded.bytes_consumed, 1);
    }

    #[test]
    fn test_state_machine_steps() {
        let tree = aaab_tree();
        let mut decoder = Decoder::new(&tree);
        assert_eq!(decoder.step(true), Step::Emit(b'a'));
        assert!(decoder.at_root());
        assert_eq!(decoder.step(false), Step::Continue);
        assert!(!decoder.at_root());
        assert_eq!(decoder.step(false), Step::Emit(b'b'));
        assert_eq!(decoder.step(false), Step::Continue);
        assert_eq!(decoder.step(true), Step::EndOfStream);
        assert!(decoder.at_root());
    }

    #[test]
    fn test_dead_end_resynchronizes() {
        // '1' has no child; "00" -> x, "01" -> EOF
        let tree = DecodeTree::from_entries(&[
            entry(Symbol::Byte(b'x'), "00"),
            entry(Symbol::EndOfStream, "01"),
        ])
        .unwrap();
        // bits: 1 00 1 00 01 -> dead end, x, dead end, x, EOF
        let decoded = decode_bitstream(
            &tree,
            &[0b1001_0001, 0b0000_0000],
            DecodeOptions::default(),
        )
        .unwrap();
        assert_eq!(decoded.bytes, b"xx");
        assert_eq!(decoded.invalid_codewords, vec![1, 4]);
        assert!(decoded.end_of_stream);

        let err = decode_bitstream(&tree, &[0b1001_0001], DecodeOptions::strict()).unwrap_err();
        assert!(matches!(err, HuffmanError::InvalidCodeword { bit_position: 1 }));
    }

    #[test]
    fn test_input_runs_out_before_sentinel() {
        let tree = aaab_tree();
        let decoded = decode_bitstream(&tree, &[0xFF], DecodeOptions::default()).unwrap();
        assert_eq!(decoded.bytes, b"aaaaaaaa");
        assert!(!decoded.end_of_stream);
        assert_eq!(decoded.bits_read, 8);
    }

    #[test]
    fn test_empty_tree() {
        let tree = DecodeTree::from_entries(&[]).unwrap();
        assert!(tree.is_empty());
        assert!(matches!(
            decode_bitstream(&tree, &[0x00], DecodeOptions::default()),
            Err(HuffmanError::EmptyCodebook)
        ));
        let decoded = decode_bitstream(&tree, &[], DecodeOptions::default()).unwrap();
        assert!(decoded.bytes.is_empty());
        assert!(!decoded.end_of_stream);
    }

    #[test]
    fn test_single_symbol_codebook() {
        let tree = DecodeTree::from_entries(&[entry(Symbol::EndOfStream, "0")]).unwrap();
        let decoded = decode_bitstream(&tree, &[0x00], DecodeOptions::default()).unwrap();
        assert!(decoded.bytes.is_empty());
        assert!(decoded.end_of_stream);
    }

    #[test]
    fn test_conflicting_codewords() {
        let through_leaf = DecodeTree::from_entries(&[
            entry(Symbol::Byte(b'a'), "0"),
            entry(Symbol::Byte(b'b'), "01"),
        ]);
        assert!(matches!(
            through_leaf,
            Err(HuffmanError::ConflictingCodeword { symbol: Symbol::Byte(b'b'), .. })
        ));

        let onto_internal = DecodeTree::from_entries(&[
            entry(Symbol::Byte(b'a'), "01"),
            entry(Symbol::Byte(b'b'), "0"),
        ]);
        assert!(onto_internal.is_err());

        let same_slot = DecodeTree::from_entries(&[
            entry(Symbol::Byte(b'a'), "1"),
            entry(Symbol::Byte(b'b'), "1"),
        ]);
        assert!(same_slot.is_err());

        let duplicate = DecodeTree::from_entries(&[
            entry(Symbol::Byte(b'a'), "1"),
            entry(Symbol::Byte(b'a'), "1"),
        ])
        .unwrap();
        assert_eq!(duplicate.leaves(), 1);
    }
}
