//! Alphabet symbols and codewords.
//!
//! The alphabet is the 256 byte values plus one end-of-stream sentinel. The
//! sentinel is its own symbol: a literal `0xFF` in the input never collides
//! with it.

use std::fmt;
use std::str::FromStr;

/// Number of symbols in the alphabet: every byte value plus the sentinel.
pub const ALPHABET_SIZE: usize = 257;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Byte(u8),
    /// Marks the logical end of an encoded stream.
    EndOfStream,
}

impl Symbol {
    /// Position of the symbol in a dense alphabet table. The sentinel sorts
    /// after every byte, as if it were value 256.
    pub fn index(self) -> usize {
        match self {
            Symbol::Byte(b) => b as usize,
            Symbol::EndOfStream => 256,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=255 => Some(Symbol::Byte(index as u8)),
            256 => Some(Symbol::EndOfStream),
            _ => None,
        }
    }

    /// Textual form used in the codebook's symbol field.
    pub fn render(self) -> String {
        match self {
            Symbol::Byte(b'\n') => "\\n".to_string(),
            Symbol::Byte(b'\r') => "\\r".to_string(),
            Symbol::EndOfStream => "EOF".to_string(),
            Symbol::Byte(b) if !(0x20..=0x7E).contains(&b) => format!("0x{:02X}", b),
            Symbol::Byte(b) => (b as char).to_string(),
        }
    }

    /// Inverse of [`Symbol::render`]. Returns `None` for text that names no symbol.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "\\n" => return Some(Symbol::Byte(b'\n')),
            "\\r" => return Some(Symbol::Byte(b'\r')),
            "EOF" => return Some(Symbol::EndOfStream),
            _ => {}
        }

        if let Some(hex) = text.strip_prefix("0x") {
            if hex.len() == 2 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return u8::from_str_radix(hex, 16).ok().map(Symbol::Byte);
            }
            return None;
        }

        match text.as_bytes() {
            [b] if b.is_ascii() => Some(Symbol::Byte(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A root-to-leaf path. `false` is a left edge ('0'), `true` a right edge ('1').
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Codeword {
    bits: Vec<bool>,
}

impl Codeword {
    pub fn new() -> Self {
        Codeword { bits: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Copy of this codeword extended by one edge.
    pub fn child(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Codeword { bits }
    }

    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<Vec<bool>> for Codeword {
    fn from(bits: Vec<bool>) -> Self {
        Codeword { bits }
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// The first character that is neither '0' nor '1'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDigit(pub char);

impl FromStr for Codeword {
    type Err = InvalidDigit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(InvalidDigit(other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Codeword::from)
    }
}
