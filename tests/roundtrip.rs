use proptest::prelude::*;

use huffbook::symbol::{Symbol, ALPHABET_SIZE};
use huffbook::{build_decode_tree, codebook, decode, encode, Codeword};

fn roundtrip(input: &[u8]) -> Vec<u8> {
    let encoded = encode(input).unwrap();
    let parsed = codebook::parse(&encoded.codebook.render()).unwrap();
    assert!(parsed.skipped.is_empty());
    let tree = build_decode_tree(&parsed.entries()).unwrap();
    let decoded = decode(&tree, &encoded.bytes).unwrap();
    assert!(decoded.end_of_stream);
    assert!(decoded.invalid_codewords.is_empty());
    assert_eq!(decoded.bytes_consumed, encoded.bytes.len());
    decoded.bytes
}

#[test]
fn test_empty_input_roundtrip() {
    assert_eq!(roundtrip(&[]), Vec::<u8>::new());
}

#[test]
fn test_every_byte_value_roundtrip() {
    let input: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
    assert_eq!(roundtrip(&input), input);
}

#[test]
fn test_aaab_scenario() {
    let encoded = encode(b"aaab").unwrap();
    let code = |symbol| encoded.codebook.get(symbol).unwrap().codeword.to_string();
    assert_eq!(code(Symbol::Byte(b'a')), "1");
    assert_eq!(code(Symbol::Byte(b'b')), "00");
    assert_eq!(code(Symbol::EndOfStream), "01");
    assert_eq!(encoded.bytes, vec![0xE2]);

    let tree = build_decode_tree(&encoded.codebook.entries()).unwrap();
    // trailing bytes after the sentinel are never touched
    let decoded = decode(&tree, &[0xE2, 0x12, 0x34]).unwrap();
    assert_eq!(decoded.bytes, b"aaab");
    assert_eq!(decoded.bytes_consumed, 1);
}

#[test]
fn test_escaped_symbols_render_and_parse() {
    for index in 0..ALPHABET_SIZE {
        let symbol = Symbol::from_index(index).unwrap();
        assert_eq!(Symbol::parse(&symbol.render()), Some(symbol));
    }
}

proptest! {
    #[test]
    fn prop_roundtrip(input in proptest::collection::vec(any::<u8>(), 0..2048)) {
        prop_assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn prop_skewed_roundtrip(input in proptest::collection::vec(prop_oneof![
        8 => Just(b'e'),
        4 => Just(b'\n'),
        2 => Just(0xFFu8),
        1 => any::<u8>(),
    ], 0..1024)) {
        prop_assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn prop_codewords_are_prefix_free(input in proptest::collection::vec(any::<u8>(), 0..512)) {
        let encoded = encode(&input).unwrap();
        let codes: Vec<&Codeword> =
            encoded.codebook.records().iter().map(|r| &r.codeword).collect();
        for (i, a) in codes.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_probabilities_sum_to_one(input in proptest::collection::vec(any::<u8>(), 0..512)) {
        let encoded = encode(&input).unwrap();
        let sum: f64 = encoded.codebook.records().iter().map(|r| r.probability).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        let sentinels = encoded
            .codebook
            .records()
            .iter()
            .filter(|r| r.symbol == Symbol::EndOfStream)
            .count();
        prop_assert_eq!(sentinels, 1);
    }

    #[test]
    fn prop_single_repeated_byte(byte in any::<u8>(), len in 1usize..300) {
        let encoded = encode(&vec![byte; len]).unwrap();
        prop_assert_eq!(encoded.codebook.len(), 2);
        let mut codes: Vec<String> = encoded
            .codebook
            .records()
            .iter()
            .map(|r| r.codeword.to_string())
            .collect();
        codes.sort();
        prop_assert_eq!(codes, vec!["0".to_string(), "1".to_string()]);
        prop_assert!(encoded.codebook.get(Symbol::Byte(byte)).is_some());
        prop_assert!(encoded.codebook.get(Symbol::EndOfStream).is_some());
    }

    #[test]
    fn prop_encoding_is_deterministic(input in proptest::collection::vec(any::<u8>(), 0..512)) {
        let first = encode(&input).unwrap();
        let second = encode(&input).unwrap();
        prop_assert_eq!(first.codebook.render(), second.codebook.render());
        prop_assert_eq!(first.bytes, second.bytes);
    }
}
