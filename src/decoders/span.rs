//! Byte and bit cursors over immutable input, and the bounded output sink
//! every decoder writes into.

use crate::config::DecodeOptions;
use crate::error::{Error, Result};

/// Bounds-checked forward cursor over a byte slice.
///
/// All accessors return `None` past the end instead of panicking, so decoders
/// can treat truncation as ordinary control flow.
#[derive(Debug, Clone)]
pub struct ByteSpan<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteSpan<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Look `offset` bytes ahead without consuming anything.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.pos
            .checked_add(offset)
            .and_then(|i| self.data.get(i))
            .copied()
    }

    /// Consume and return the next byte.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skip up to `n` bytes; returns how many were actually skipped.
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.pos += n;
        n
    }

    /// Consume exactly `n` bytes, or nothing if fewer remain.
    pub fn take_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

/// Bit reader for MSB-first bit ordering.
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8, // 0-7, position within current byte (0 = MSB)
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Read `n` bits (1..=16) as an unsigned value.
    ///
    /// Returns `None` if fewer than `n` bits remain; the reader is left
    /// unchanged in that case.
    pub fn read_bits(&mut self, n: u8) -> Option<u16> {
        if n == 0 || n > 16 || self.bits_remaining() < n as usize {
            return None;
        }

        let mut result = 0u32;
        let mut remaining = n;

        while remaining > 0 {
            let bits_in_current_byte = 8 - self.bit_pos;
            let bits_to_read = remaining.min(bits_in_current_byte);

            let byte = self.data[self.byte_pos];
            let shift_amount = bits_in_current_byte - bits_to_read;
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (byte >> shift_amount) & mask;

            result = (result << bits_to_read) | bits as u32;

            self.bit_pos += bits_to_read;
            if self.bit_pos == 8 {
                self.byte_pos += 1;
                self.bit_pos = 0;
            }

            remaining -= bits_to_read;
        }

        Some(result as u16)
    }

    /// Number of unread bits.
    pub fn bits_remaining(&self) -> usize {
        (self.data.len() - self.byte_pos) * 8 - self.bit_pos as usize
    }
}

/// Growable output buffer that refuses to grow past a cap.
#[derive(Debug)]
pub struct OutputSink {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl OutputSink {
    /// Sink bounded by `options.max_decompressed_size`.
    pub fn new(options: &DecodeOptions) -> Self {
        Self::with_limit(options.output_limit())
    }

    /// Sink with an explicit cap (`None` for unbounded).
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    /// Pre-allocate for an expected output size, never beyond the cap.
    pub fn reserve(&mut self, additional: usize) {
        let additional = match self.limit {
            Some(limit) => additional.min(limit.saturating_sub(self.buf.len())),
            None => additional,
        };
        self.buf.reserve(additional);
    }

    fn ensure_room(&self, additional: usize) -> Result<()> {
        let attempted = self.buf.len().saturating_add(additional);
        match self.limit {
            Some(limit) if attempted > limit => Err(Error::ResourceLimitExceeded { limit, attempted }),
            _ => Ok(()),
        }
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.ensure_room(1)?;
        self.buf.push(byte);
        Ok(())
    }

    /// Append a slice.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Append `count` copies of `byte`.
    pub fn fill(&mut self, byte: u8, count: usize) -> Result<()> {
        self.ensure_room(count)?;
        self.buf.resize(self.buf.len() + count, byte);
        Ok(())
    }

    /// Grow by `count` zero bytes and return the new region for the caller
    /// to fill in place.
    pub fn grow(&mut self, count: usize) -> Result<&mut [u8]> {
        self.ensure_room(count)?;
        let start = self.buf.len();
        self.buf.resize(start + count, 0);
        Ok(&mut self.buf[start..])
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Hand the buffer to the caller.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
