//! Append-only writer for building wire images: the primitive half of a
//! future encode path, and the way tests construct decoder inputs.

use crate::endian::ByteOrder;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};

/// Growable byte buffer with typed, byte-order-aware writes.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16, order: ByteOrder) {
        let mut bytes = [0u8; 2];
        match order {
            ByteOrder::Big => BigEndian::write_u16(&mut bytes, value),
            ByteOrder::Little => LittleEndian::write_u16(&mut bytes, value),
            ByteOrder::Native => NativeEndian::write_u16(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i16(&mut self, value: i16, order: ByteOrder) {
        self.write_u16(value as u16, order);
    }

    pub fn write_u32(&mut self, value: u32, order: ByteOrder) {
        let mut bytes = [0u8; 4];
        match order {
            ByteOrder::Big => BigEndian::write_u32(&mut bytes, value),
            ByteOrder::Little => LittleEndian::write_u32(&mut bytes, value),
            ByteOrder::Native => NativeEndian::write_u32(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i32(&mut self, value: i32, order: ByteOrder) {
        self.write_u32(value as u32, order);
    }

    pub fn write_u64(&mut self, value: u64, order: ByteOrder) {
        let mut bytes = [0u8; 8];
        match order {
            ByteOrder::Big => BigEndian::write_u64(&mut bytes, value),
            ByteOrder::Little => LittleEndian::write_u64(&mut bytes, value),
            ByteOrder::Native => NativeEndian::write_u64(&mut bytes, value),
        }
        self.buf.extend_from_slice(&bytes);
    }

    pub fn write_i64(&mut self, value: i64, order: ByteOrder) {
        self.write_u64(value as u64, order);
    }

    /// Floats travel as their width-equivalent unsigned integer.
    pub fn write_f32(&mut self, value: f32, order: ByteOrder) {
        self.write_u32(value.to_bits(), order);
    }

    pub fn write_f64(&mut self, value: f64, order: ByteOrder) {
        self.write_u64(value.to_bits(), order);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Write a string into a fixed-size slot: truncated if longer, padded
    /// with zeros if shorter. A `fixed_size` of 0 writes the string as-is.
    pub fn write_string(&mut self, value: &str, fixed_size: usize) {
        let bytes = value.as_bytes();
        if fixed_size == 0 {
            self.buf.extend_from_slice(bytes);
            return;
        }
        let copy = bytes.len().min(fixed_size);
        self.buf.extend_from_slice(&bytes[..copy]);
        self.buf.resize(self.buf.len() + (fixed_size - copy), 0);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
