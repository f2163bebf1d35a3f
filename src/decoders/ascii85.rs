//! ASCII85Decode (Base85) implementation.
//!
//! Decodes ASCII85/Base85 encoded data. This encoding represents 4 bytes
//! as 5 ASCII characters in the range '!' to 'u'.
//! Special case: 'z' represents 4 zero bytes (00000000).
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.3 - ASCII85Decode Filter

use crate::config::DecodeOptions;
use crate::decoders::span::{ByteSpan, OutputSink};
use crate::error::{Error, Result};

const GROUP_LEN: usize = 5;
/// Value of 'u', used to pad a final partial group.
const PAD_DIGIT: u64 = 84;

/// PDF whitespace (Section 7.2.2): NUL, TAB, LF, FF, CR, SPACE.
fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

/// Decode ASCII85 data.
///
/// Whitespace is skipped and an optional leading `<~` is ignored. Characters
/// outside the alphabet, `z` inside a group, a lone trailing character, or a
/// group whose value does not fit 32 bits yield `MalformedBase85`.
pub fn decode_ascii85(input: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut output = OutputSink::new(options);
    output.reserve(input.len() / GROUP_LEN * 4);

    let mut span = ByteSpan::new(input);
    while span.peek().is_some_and(is_pdf_whitespace) {
        span.advance(1);
    }
    if span.peek() == Some(b'<') && span.peek_at(1) == Some(b'~') {
        span.advance(2);
    }

    let mut acc: u64 = 0;
    let mut count = 0;

    while let Some(byte) = span.next_byte() {
        match byte {
            b'~' => {
                expect_terminator(&mut span)?;
                break;
            },
            b'z' => {
                if count != 0 {
                    return Err(Error::MalformedBase85(format!(
                        "'z' inside a group at offset {}",
                        span.position() - 1
                    )));
                }
                output.extend_from_slice(&[0, 0, 0, 0])?;
            },
            b'!'..=b'u' => {
                acc = acc * 85 + (byte - b'!') as u64;
                count += 1;

                if count == GROUP_LEN {
                    output.extend_from_slice(&group_bytes(acc, span.position())?)?;
                    acc = 0;
                    count = 0;
                }
            },
            _ if is_pdf_whitespace(byte) => {},
            _ => {
                return Err(Error::MalformedBase85(format!(
                    "invalid character 0x{:02x} at offset {}",
                    byte,
                    span.position() - 1
                )));
            },
        }
    }

    match count {
        0 => {},
        1 => {
            return Err(Error::MalformedBase85(
                "final group has a single character (need at least 2)".to_string(),
            ));
        },
        _ => {
            for _ in count..GROUP_LEN {
                acc = acc * 85 + PAD_DIGIT;
            }
            let bytes = group_bytes(acc, span.position())?;
            output.extend_from_slice(&bytes[..count - 1])?;
        },
    }

    Ok(output.into_vec())
}

/// After '~', only whitespace and then '>' (or end of input) may follow.
fn expect_terminator(span: &mut ByteSpan<'_>) -> Result<()> {
    loop {
        match span.next_byte() {
            None | Some(b'>') => return Ok(()),
            Some(b) if is_pdf_whitespace(b) => continue,
            Some(other) => {
                return Err(Error::MalformedBase85(format!(
                    "expected '>' after '~', found 0x{:02x}",
                    other
                )));
            },
        }
    }
}

fn group_bytes(acc: u64, offset: usize) -> Result<[u8; 4]> {
    u32::try_from(acc)
        .map(u32::to_be_bytes)
        .map_err(|_| Error::MalformedBase85(format!("group ending at offset {} overflows 32 bits", offset)))
}

/// Encode bytes as ASCII85, terminated by `~>`.
pub fn encode_ascii85(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() / 4 * 5 + 7);

    for chunk in input.chunks(4) {
        if chunk == [0, 0, 0, 0] {
            output.push(b'z');
            continue;
        }

        let mut padded = [0u8; 4];
        padded[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(padded);

        let mut digits = [0u8; GROUP_LEN];
        for digit in digits.iter_mut().rev() {
            *digit = (value % 85) as u8 + b'!';
            value /= 85;
        }
        output.extend_from_slice(&digits[..chunk.len() + 1]);
    }

    output.extend_from_slice(b"~>");
    output
}
