//! # huffbook
//!
//! Static Huffman coding with a human-readable codebook.
//!
//! Encoding produces two artifacts: a text codebook (one record per symbol)
//! and a headerless bitstream that ends with the end-of-stream codeword.
//! Decoding needs both.
//!
//! ## Quick Start
//!
//! ```rust
//! let encoded = huffbook::encode(b"aaab")?;
//! assert_eq!(encoded.bytes, vec![0xE2]);
//!
//! // the codebook travels as text
//! let text = encoded.codebook.render();
//! let parsed = huffbook::codebook::parse(&text)?;
//!
//! let tree = huffbook::build_decode_tree(&parsed.entries())?;
//! let decoded = huffbook::decode(&tree, &encoded.bytes)?;
//! assert_eq!(decoded.bytes, b"aaab");
//! # Ok::<(), huffbook::HuffmanError>(())
//! ```

pub mod bit_io;
pub mod codebook;
pub mod decoder;
pub mod error;
pub mod huffman_codec;
pub mod hufftree;
pub mod statistics;
pub mod symbol;

mod min_heap;

pub use codebook::{Codebook, CodebookEntry, ParsedCodebook, SymbolRecord};
pub use decoder::{DecodeOptions, DecodeTree, Decoded};
pub use error::{HuffmanError, HuffmanResult};
pub use huffman_codec::{Encoded, HuffmanCodec};
pub use hufftree::HuffmanTree;
pub use statistics::SymbolStatistics;
pub use symbol::{Codeword, Symbol};

/// Build a codebook for `input` and pack `input` with it.
pub fn encode(input: &[u8]) -> HuffmanResult<Encoded> {
    HuffmanCodec::encode_with_codebook(input)
}

/// Rebuild the prefix tree described by parsed codebook entries.
pub fn build_decode_tree(entries: &[CodebookEntry]) -> HuffmanResult<DecodeTree> {
    DecodeTree::from_entries(entries)
}

/// Decode with the default policy: invalid codewords are recorded and
/// skipped, never fatal.
pub fn decode(tree: &DecodeTree, encoded: &[u8]) -> HuffmanResult<Decoded> {
    decoder::decode_bitstream(tree, encoded, DecodeOptions::default())
}

pub fn decode_with(
    tree: &DecodeTree,
    encoded: &[u8],
    options: DecodeOptions,
) -> HuffmanResult<Decoded> {
    decoder::decode_bitstream(tree, encoded, options)
}
