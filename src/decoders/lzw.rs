//! LZWDecode implementation for PDF.
//!
//! Decompresses data using the Lempel-Ziv-Welch (LZW) algorithm as specified
//! in the PDF Reference (Section 7.4.4).
//!
//! PDF's LZW implementation:
//! - Uses MSB-first bit ordering
//! - Starts with 9-bit codes, growing to at most 12 bits
//! - Clear code is 256, EOD code is 257, first available code is 258
//! - EarlyChange=1 (the default) switches code width one code earlier than
//!   the naive threshold; EarlyChange=0 switches at the power of two

use crate::config::DecodeOptions;
use crate::decoders::params::DecodeParams;
use crate::decoders::predictor::apply_predictor;
use crate::decoders::span::{BitReader, OutputSink};
use crate::error::{Error, Result};

const CLEAR_CODE: u16 = 256;
const EOD_CODE: u16 = 257;
const FIRST_CODE: u16 = 258;
const MIN_CODE_BITS: u8 = 9;
const MAX_CODE_BITS: u8 = 12;
const MAX_ENTRIES: usize = 1 << MAX_CODE_BITS;
const NO_PREFIX: u16 = u16::MAX;

/// Decode an LZW stream and reverse any predictor named in `params`.
pub fn decode_lzw(input: &[u8], params: &DecodeParams, options: &DecodeOptions) -> Result<Vec<u8>> {
    let early_change = match params.early_change() {
        0 => 0,
        1 => 1,
        other => {
            log::debug!("LZWDecode: EarlyChange {} treated as 1", other);
            1
        },
    };
    let decoded = decode_lzw_codes(input, early_change, options)?;
    apply_predictor(decoded, params)
}

/// One dictionary entry, stored as a link to its prefix entry plus the last
/// byte. Strings are rebuilt back-to-front when emitted.
#[derive(Debug, Clone, Copy)]
struct Entry {
    prefix: u16,
    last: u8,
    first: u8,
    len: u16,
}

/// The code table. Entries 256 and 257 are placeholders for the control
/// codes and are never emitted.
struct Dictionary {
    entries: Vec<Entry>,
}

impl Dictionary {
    fn new() -> Self {
        let mut entries = Vec::with_capacity(MAX_ENTRIES);
        for b in 0..=255u8 {
            entries.push(Entry {
                prefix: NO_PREFIX,
                last: b,
                first: b,
                len: 1,
            });
        }
        // CLEAR and EOD placeholders
        for _ in CLEAR_CODE..FIRST_CODE {
            entries.push(Entry {
                prefix: NO_PREFIX,
                last: 0,
                first: 0,
                len: 0,
            });
        }
        Self { entries }
    }

    fn reset(&mut self) {
        self.entries.truncate(FIRST_CODE as usize);
    }

    fn next_code(&self) -> usize {
        self.entries.len()
    }

    fn is_full(&self) -> bool {
        self.entries.len() >= MAX_ENTRIES
    }

    fn first_byte(&self, code: u16) -> u8 {
        self.entries[code as usize].first
    }

    /// Append `prefix` + `byte`. Ignored once the table holds 4096 entries.
    fn add(&mut self, prefix: u16, byte: u8) {
        if self.is_full() {
            return;
        }
        let parent = self.entries[prefix as usize];
        self.entries.push(Entry {
            prefix,
            last: byte,
            first: parent.first,
            len: parent.len + 1,
        });
    }

    /// Write the string for `code` to the end of `output`.
    fn emit(&self, code: u16, output: &mut OutputSink) -> Result<()> {
        let len = self.entries[code as usize].len as usize;
        let region = output.grow(len)?;

        let mut cursor = code;
        for slot in region.iter_mut().rev() {
            let entry = self.entries[cursor as usize];
            *slot = entry.last;
            cursor = entry.prefix;
        }
        Ok(())
    }

    /// Code width for reading the next code.
    fn code_bits(&self, early_change: usize) -> u8 {
        let next = self.next_code() + early_change;
        if next >= 2048 {
            MAX_CODE_BITS
        } else if next >= 1024 {
            11
        } else if next >= 512 {
            10
        } else {
            MIN_CODE_BITS
        }
    }
}

/// Decode raw LZW codes without predictor handling.
///
/// Decoding stops at EOD or when the input runs out. A code that does not
/// refer to an existing or the next-to-be-defined entry fails with
/// `CorruptLzwStream`, carrying the bytes decoded up to that point.
pub fn decode_lzw_codes(input: &[u8], early_change: usize, options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut output = OutputSink::new(options);
    output.reserve(input.len().saturating_mul(2));

    let mut table = Dictionary::new();
    let mut reader = BitReader::new(input);
    let mut prev_code: Option<u16> = None;
    let mut saw_eod = false;
    let mut warned_full = false;

    loop {
        let code_bits = table.code_bits(early_change);
        let Some(code) = reader.read_bits(code_bits) else {
            break;
        };

        if code == EOD_CODE {
            saw_eod = true;
            break;
        }

        if code == CLEAR_CODE {
            table.reset();
            prev_code = None;
            continue;
        }

        let next_code = table.next_code();
        match prev_code {
            None => {
                // First code after a clear must be a literal
                if code >= CLEAR_CODE {
                    return Err(corrupt(code, next_code, output));
                }
                table.emit(code, &mut output)?;
            },
            Some(prev) => {
                if table.is_full() && !warned_full {
                    log::warn!("LZWDecode: code table full without a clear code, continuing at 12 bits");
                    warned_full = true;
                }

                if (code as usize) < next_code {
                    table.emit(code, &mut output)?;
                    table.add(prev, table.first_byte(code));
                } else if code as usize == next_code && !table.is_full() {
                    // KwKwK: the entry being defined is prev + prev[0]
                    table.add(prev, table.first_byte(prev));
                    table.emit(code, &mut output)?;
                } else {
                    return Err(corrupt(code, next_code, output));
                }
            },
        }

        prev_code = Some(code);
    }

    if !saw_eod {
        log::debug!("LZWDecode: input ended without EOD code after {} bytes", output.len());
    }

    Ok(output.into_vec())
}

fn corrupt(code: u16, table_size: usize, output: OutputSink) -> Error {
    log::warn!("Invalid LZW code: {} (table size: {})", code, table_size);
    Error::CorruptLzwStream {
        code,
        table_size,
        partial: output.into_vec(),
    }
}
