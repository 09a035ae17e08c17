//! Bit-level utilities for packing fields into a single word.
//!
//! PayloadWriter and PayloadReader operate LSB-first: the first field written
//! occupies the lowest bits, so field `i` sits at the cumulative width of
//! fields `0..i`. This is the same layout the emitted routines use, where
//! `payload = Σ field[i] · 2^offset_i`.
//!
//! # Example
//! ```
//! use flagcodec_core::bitio::{PayloadReader, PayloadWriter};
//!
//! let mut writer = PayloadWriter::new();
//! writer.write_bits(0b101, 3).unwrap(); // bits 0..3
//! writer.write_bits(0b11, 2).unwrap();  // bits 3..5
//! let word = writer.finish();
//! assert_eq!(word, 0b11_101);
//!
//! let mut reader = PayloadReader::new(word);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use crate::error::{BitIoError, Result};

/// Mask with the low `bits` bits set. Saturates at 64.
#[inline]
pub fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Reverse the order of the low `bits` bits of `value`.
///
/// Bits above `bits` are discarded. `reverse_bits(0b001, 3) == 0b100`.
#[inline]
pub fn reverse_bits(value: u64, bits: u32) -> u64 {
    if bits == 0 {
        return 0;
    }
    (value & low_mask(bits)).reverse_bits() >> (64 - bits)
}

/// Packs fields LSB-first into a u64.
///
/// # Invariants
/// - `bit_count <= 64`
/// - bits of `word` at or above `bit_count` are zero
#[derive(Debug, Clone, Default)]
pub struct PayloadWriter {
    word: u64,
    bit_count: u32,
}

impl PayloadWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `width` bits holding `value` above everything written so far.
    ///
    /// # Errors
    /// - `BitIoError::InsufficientBits` if the word has fewer than `width` bits left
    /// - `BitIoError::ValueTooWide` if `value` has bits set at or above `width`
    pub fn write_bits(&mut self, value: u64, width: u32) -> Result<()> {
        let available = 64 - self.bit_count;
        if width > available {
            return Err(BitIoError::InsufficientBits {
                requested: width,
                available,
            }
            .into());
        }

        if value & !low_mask(width) != 0 {
            return Err(BitIoError::ValueTooWide { value, width }.into());
        }

        if width == 0 {
            return Ok(());
        }

        self.word |= value << self.bit_count;
        self.bit_count += width;
        Ok(())
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> u32 {
        self.bit_count
    }

    /// Consume the writer and return the packed word.
    pub fn finish(self) -> u64 {
        self.word
    }
}

/// Unpacks fields LSB-first from a u64.
#[derive(Debug, Clone)]
pub struct PayloadReader {
    word: u64,
    position: u32,
}

impl PayloadReader {
    /// Create a reader positioned at bit 0 of `word`.
    pub fn new(word: u64) -> Self {
        Self { word, position: 0 }
    }

    /// Read the next `width` bits.
    ///
    /// # Errors
    /// `BitIoError::InsufficientBits` if fewer than `width` bits remain.
    pub fn read_bits(&mut self, width: u32) -> Result<u64> {
        let available = 64 - self.position;
        if width > available {
            return Err(BitIoError::InsufficientBits {
                requested: width,
                available,
            }
            .into());
        }

        if width == 0 {
            return Ok(0);
        }

        let value = (self.word >> self.position) & low_mask(width);
        self.position += width;
        Ok(value)
    }

    /// Skip `width` bits without returning them.
    pub fn skip_bits(&mut self, width: u32) -> Result<()> {
        self.read_bits(width).map(|_| ())
    }

    /// Everything above the current position, shifted down to bit 0.
    pub fn remainder(&self) -> u64 {
        if self.position >= 64 {
            0
        } else {
            self.word >> self.position
        }
    }

    /// Current bit position.
    pub fn position(&self) -> u32 {
        self.position
    }
}
