use crate::bit_io::BitPacker;
use crate::codebook::{Codebook, CodebookEntry};
use crate::error::{HuffmanError, HuffmanResult};
use crate::hufftree::{CodeTable, HuffmanTree};
use crate::statistics::SymbolStatistics;
use crate::symbol::{Codeword, Symbol, ALPHABET_SIZE};

/// Output of a full encode: the codebook and the packed bitstream.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub codebook: Codebook,
    pub bytes: Vec<u8>,
}

/// Packs bytes with a fixed symbol -> codeword table.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(encode_table: CodeTable) -> Self {
        HuffmanCodec { encode_table }
    }

    /// Codec over an externally supplied codebook. When a symbol is listed
    /// twice, the first entry wins.
    pub fn from_entries(entries: &[CodebookEntry]) -> Self {
        let mut encode_table = vec![None; ALPHABET_SIZE];
        for entry in entries {
            encode_table[entry.symbol.index()].get_or_insert_with(|| entry.codeword.clone());
        }
        HuffmanCodec { encode_table }
    }

    /// Build statistics, tree and codebook for `data`, then encode it.
    pub fn encode_with_codebook(data: &[u8]) -> HuffmanResult<Encoded> {
        let stats = SymbolStatistics::from_bytes(data);
        let tree = HuffmanTree::from_statistics(&stats);
        let codec = HuffmanCodec::new(tree.generate_table());
        let codebook = Codebook::new(&stats, &codec.encode_table);
        let bytes = codec.encode(data)?;
        Ok(Encoded { codebook, bytes })
    }

    fn codeword(&self, symbol: Symbol) -> HuffmanResult<&Codeword> {
        self.encode_table[symbol.index()]
            .as_ref()
            .ok_or(HuffmanError::UnresolvedSymbol { symbol })
    }

    /// Pack every byte of `data` followed by the end-of-stream codeword,
    /// zero-padding the last byte.
    pub fn encode(&self, data: &[u8]) -> HuffmanResult<Vec<u8>> {
        let end_of_stream = self.codeword(Symbol::EndOfStream)?;

        let mut packer = BitPacker::with_capacity(data.len() / 2 + 1);
        for &byte in data {
            packer.push_codeword(self.codeword(Symbol::Byte(byte))?);
        }
        packer.push_codeword(end_of_stream);

        Ok(packer.finish())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codebook;

    #[test]
    fn test_aaab_packs_into_one_byte() {
        let encoded = HuffmanCodec::encode_with_codebook(b"aaab").unwrap();
        assert_eq!(encoded.bytes, vec![0xE2]);
        assert_eq!(encoded.codebook.len(), 3);
    }

    #[test]
    fn test_empty_input_is_just_the_sentinel() {
        let encoded = HuffmanCodec::encode_with_codebook(&[]).unwrap();
        assert_eq!(encoded.bytes, vec![0x00]);
        assert_eq!(encoded.codebook.len(), 1);
    }

    #[test]
    fn test_external_codebook_missing_a_byte() {
        let parsed = codebook::parse("\"a\",1,0.5,\"0\",1.0\n\"EOF\",1,0.5,\"1\",1.0\n").unwrap();
        let codec = HuffmanCodec::from_entries(&parsed.entries());
        assert_eq!(codec.encode(b"aa").unwrap(), vec![0b0010_0000]);
        let err = codec.encode(b"ab").unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::UnresolvedSymbol { symbol: Symbol::Byte(b'b') }
        ));
    }

    #[test]
    fn test_external_codebook_without_sentinel() {
        let parsed = codebook::parse("\"a\",1,1.0,\"0\",0.0\n").unwrap();
        let err = HuffmanCodec::from_entries(&parsed.entries()).encode(b"a").unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::UnresolvedSymbol { symbol: Symbol::EndOfStream }
        ));
    }

    #[test]
    fn test_first_duplicate_entry_wins() {
        let parsed = codebook::parse(
            "\"a\",1,0.5,\"0\",1.0\n\"a\",1,0.5,\"11\",1.0\n\"EOF\",1,0.5,\"10\",1.0\n",
        )
        .unwrap();
        let codec = HuffmanCodec::from_entries(&parsed.entries());
        assert_eq!(codec.encode(b"a").unwrap(), vec![0b0100_0000]);
    }

    #[test]
    fn test_repeat_encodes_are_identical() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let first = HuffmanCodec::encode_with_codebook(data).unwrap();
        let second = HuffmanCodec::encode_with_codebook(data).unwrap();
        assert_eq!(first.codebook.render(), second.codebook.render());
        assert_eq!(first.bytes, second.bytes);
    }
}
