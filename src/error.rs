use crate::symbol::{Codeword, Symbol};

pub type HuffmanResult<T> = Result<T, HuffmanError>;

#[derive(Debug, thiserror::Error)]
pub enum HuffmanError {
    /// The codebook has no codeword for a symbol that must be encoded.
    #[error("symbol {symbol} has no codeword in the codebook")]
    UnresolvedSymbol { symbol: Symbol },

    #[error("codebook has no usable records")]
    EmptyCodebook,

    #[error("codebook line {line}: codeword contains invalid digit {digit:?}")]
    InvalidCodewordDigit { line: usize, digit: char },

    /// Two codebook entries cannot both be leaves of one prefix tree.
    #[error("codeword {codeword} for symbol {symbol} conflicts with another codeword")]
    ConflictingCodeword { symbol: Symbol, codeword: Codeword },

    /// Raised only when decoding in strict mode.
    #[error("invalid codeword ending at bit {bit_position}")]
    InvalidCodeword { bit_position: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
