//! Bit-level packing and unpacking, most significant bit first.

use crate::symbol::Codeword;

/// Accumulates bits into bytes, MSB first.
#[derive(Default, Debug)]
pub struct BitPacker {
    bytes: Vec<u8>,
    accumulator: u8,
    filled: u8,
    bit_count: u64,
}

impl BitPacker {
    pub fn new() -> Self {
        BitPacker::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        BitPacker {
            bytes: Vec::with_capacity(bytes),
            ..BitPacker::default()
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.accumulator = (self.accumulator << 1) | bit as u8;
        self.filled += 1;
        self.bit_count += 1;

        // a full byte goes straight to the output
        if self.filled == 8 {
            self.bytes.push(self.accumulator);
            self.accumulator = 0;
            self.filled = 0;
        }
    }

    pub fn push_codeword(&mut self, code: &Codeword) {
        for &bit in code.bits() {
            self.push_bit(bit);
        }
    }

    /// Bits pushed so far, padding excluded.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Flush a partial byte, zero-filled on the right, and return the output.
    pub fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.accumulator << (8 - self.filled));
        }
        self.bytes
    }
}

/// Cursor that hands out one bit at a time from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    next_byte: usize,
    current: u8,
    bits_left: u8,
    bits_read: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BitReader {
            bytes,
            next_byte: 0,
            current: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Next bit, or `None` once the input is exhausted.
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.bits_left == 0 {
            self.current = *self.bytes.get(self.next_byte)?;
            self.next_byte += 1;
            self.bits_left = 8;
        }

        let bit = self.current & 0x80 != 0;
        self.current <<= 1;
        self.bits_left -= 1;
        self.bits_read += 1;
        Some(bit)
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Bytes touched so far, including a partially read one.
    pub fn bytes_consumed(&self) -> usize {
        self.next_byte
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }
}
