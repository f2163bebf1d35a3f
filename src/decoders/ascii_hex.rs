//! ASCIIHexDecode implementation.
//!
//! Decodes hexadecimal-encoded data (e.g., "48656C6C6F" -> "Hello").
//! Anything that is not a hex digit is skipped, `>` ends the data, and an
//! odd trailing digit is completed with an implicit '0'.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.2 - ASCIIHexDecode Filter

use crate::config::DecodeOptions;
use crate::decoders::span::{ByteSpan, OutputSink};
use crate::error::Result;

const EOD_MARKER: u8 = b'>';
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Decode ASCIIHex data.
///
/// Never fails on malformed characters; the only error is
/// `ResourceLimitExceeded` when the output cap is reached.
pub fn decode_ascii_hex(input: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut output = OutputSink::new(options);
    output.reserve(input.len() / 2);

    let mut span = ByteSpan::new(input);
    let mut high: Option<u8> = None;

    while let Some(byte) = span.next_byte() {
        if byte == EOD_MARKER {
            break;
        }
        let Some(nibble) = hex_digit_to_value(byte) else {
            continue;
        };
        match high.take() {
            Some(h) => output.push((h << 4) | nibble)?,
            None => high = Some(nibble),
        }
    }

    // Odd number of digits: the last one is the high nibble of a final byte
    if let Some(h) = high {
        output.push(h << 4)?;
    }

    Ok(output.into_vec())
}

/// Encode bytes as uppercase hex digit pairs terminated by `>`.
pub fn encode_ascii_hex(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 2 + 1);
    for &byte in input {
        output.push(HEX_DIGITS[(byte >> 4) as usize]);
        output.push(HEX_DIGITS[(byte & 0x0F) as usize]);
    }
    output.push(EOD_MARKER);
    output
}

/// Convert a hexadecimal ASCII character to its numeric value.
fn hex_digit_to_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}
