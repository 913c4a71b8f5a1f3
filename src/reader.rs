//! Positional reader over an immutable byte slice: typed reads with a byte
//! order per call, and MSB-first bit reads that may cross byte boundaries.
//!
//! A bit read leaves the reader in a well-defined partial-byte state: the
//! next byte-aligned read first advances to the following whole-byte
//! boundary, discarding the unread tail bits, and the first bit read after a
//! byte-aligned position starts at bit 7 of the next byte.

use crate::endian::ByteOrder;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};

pub type ReadResult<T> = Result<T, ReadError>;

/// Reader-level failures. The decoder wraps these with field context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("buffer underflow at position {position}: need {needed} byte(s), have {available}")]
    Underflow {
        needed: usize,
        available: usize,
        position: usize,
    },

    #[error("seek to {target} past end of buffer (size {size})")]
    SeekPastEnd { target: usize, size: usize },

    #[error("invalid bit count {bits}, expected 1..=64")]
    InvalidBitCount { bits: u32 },
}

/// Cursor with typed read operations over a borrowed byte slice.
///
/// The reader never copies or owns the input; callers copy strings and byte
/// runs out of the returned values when they need ownership.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Bits consumed from the byte at `pos` (0 = MSB still unread).
    bit_pos: u8,
    /// Set while a partially consumed byte may be pending.
    bit_active: bool,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            pos: 0,
            bit_pos: 0,
            bit_active: false,
        }
    }

    /// Current byte position. During bit reads this is the index of the
    /// partially consumed byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits consumed from the current byte (0 when byte-aligned).
    pub fn bit_position(&self) -> u8 {
        self.bit_pos
    }

    /// Whole bytes from the current position to the end of the slice.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute reposition. Clears any partial-byte bit state.
    pub fn seek(&mut self, pos: usize) -> ReadResult<()> {
        if pos > self.data.len() {
            return Err(ReadError::SeekPastEnd {
                target: pos,
                size: self.data.len(),
            });
        }
        self.pos = pos;
        self.bit_pos = 0;
        self.bit_active = false;
        Ok(())
    }

    /// Advance past `count` bytes without reading them.
    pub fn skip(&mut self, count: usize) -> ReadResult<()> {
        self.align();
        self.check(count)?;
        self.pos += count;
        Ok(())
    }

    /// Discard the unread tail bits of a partially consumed byte.
    fn align(&mut self) {
        if self.bit_active {
            if self.bit_pos > 0 {
                self.pos += 1;
                self.bit_pos = 0;
            }
            self.bit_active = false;
        }
    }

    fn check(&self, needed: usize) -> ReadResult<()> {
        if self.pos + needed > self.data.len() {
            return Err(ReadError::Underflow {
                needed,
                available: self.remaining(),
                position: self.pos,
            });
        }
        Ok(())
    }

    fn take(&mut self, count: usize) -> ReadResult<&'a [u8]> {
        self.align();
        self.check(count)?;
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> ReadResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> ReadResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self, order: ByteOrder) -> ReadResult<u16> {
        let bytes = self.take(2)?;
        Ok(match order {
            ByteOrder::Big => BigEndian::read_u16(bytes),
            ByteOrder::Little => LittleEndian::read_u16(bytes),
            ByteOrder::Native => NativeEndian::read_u16(bytes),
        })
    }

    pub fn read_i16(&mut self, order: ByteOrder) -> ReadResult<i16> {
        Ok(self.read_u16(order)? as i16)
    }

    pub fn read_u32(&mut self, order: ByteOrder) -> ReadResult<u32> {
        let bytes = self.take(4)?;
        Ok(match order {
            ByteOrder::Big => BigEndian::read_u32(bytes),
            ByteOrder::Little => LittleEndian::read_u32(bytes),
            ByteOrder::Native => NativeEndian::read_u32(bytes),
        })
    }

    pub fn read_i32(&mut self, order: ByteOrder) -> ReadResult<i32> {
        Ok(self.read_u32(order)? as i32)
    }

    pub fn read_u64(&mut self, order: ByteOrder) -> ReadResult<u64> {
        let bytes = self.take(8)?;
        Ok(match order {
            ByteOrder::Big => BigEndian::read_u64(bytes),
            ByteOrder::Little => LittleEndian::read_u64(bytes),
            ByteOrder::Native => NativeEndian::read_u64(bytes),
        })
    }

    pub fn read_i64(&mut self, order: ByteOrder) -> ReadResult<i64> {
        Ok(self.read_u64(order)? as i64)
    }

    /// Floats travel as their width-equivalent unsigned integer.
    pub fn read_f32(&mut self, order: ByteOrder) -> ReadResult<f32> {
        Ok(f32::from_bits(self.read_u32(order)?))
    }

    pub fn read_f64(&mut self, order: ByteOrder) -> ReadResult<f64> {
        Ok(f64::from_bits(self.read_u64(order)?))
    }

    /// Borrow `count` bytes from the input.
    pub fn read_bytes(&mut self, count: usize) -> ReadResult<&'a [u8]> {
        self.take(count)
    }

    /// Read a fixed-size string, all bytes verbatim. Invalid UTF-8 is
    /// replaced lossily; any NUL padding stays in the result.
    pub fn read_string(&mut self, size: usize) -> ReadResult<String> {
        let bytes = self.take(size)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read `bits` (1..=64) MSB-first into the low bits of a `u64`.
    ///
    /// Reads may span byte boundaries. Bit 7 of each byte is consumed first.
    pub fn read_bits(&mut self, bits: u32) -> ReadResult<u64> {
        if bits == 0 || bits > 64 {
            return Err(ReadError::InvalidBitCount { bits });
        }
        let available_bits = (self.data.len() - self.pos) * 8 - self.bit_pos as usize;
        if bits as usize > available_bits {
            let needed = (self.bit_pos as usize + bits as usize + 7) / 8;
            return Err(ReadError::Underflow {
                needed,
                available: self.remaining(),
                position: self.pos,
            });
        }
        self.bit_active = true;
        let mut value = 0u64;
        for _ in 0..bits {
            let bit = (self.data[self.pos] >> (7 - self.bit_pos)) & 1;
            value = (value << 1) | u64::from(bit);
            self.bit_pos += 1;
            if self.bit_pos == 8 {
                self.bit_pos = 0;
                self.pos += 1;
            }
        }
        Ok(value)
    }
}
