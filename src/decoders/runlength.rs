//! RunLengthDecode implementation.
//!
//! Decodes run-length encoded data according to PDF specification:
//! - Length byte 0-127: Copy next N+1 bytes literally
//! - Length byte 128: EOD marker
//! - Length byte 129-255: Repeat next byte 257-N times
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.5 - RunLengthDecode Filter

use crate::config::DecodeOptions;
use crate::decoders::span::{ByteSpan, OutputSink};
use crate::error::{Error, Result};

const EOD_MARKER: u8 = 128;

/// Decode run-length encoded data.
///
/// A run cut short by the end of input fails with `CorruptRunLengthStream`;
/// the error carries every complete run decoded before it.
pub fn decode_run_length(input: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut output = OutputSink::new(options);
    output.reserve(input.len());

    let mut span = ByteSpan::new(input);
    let mut saw_eod = false;

    while let Some(length) = span.next_byte() {
        match length {
            0..=127 => {
                let count = length as usize + 1;
                let Some(literal) = span.take_bytes(count) else {
                    return Err(truncated(
                        format!(
                            "not enough data for literal run (need {}, have {})",
                            count,
                            span.remaining()
                        ),
                        output,
                    ));
                };
                output.extend_from_slice(literal)?;
            },
            EOD_MARKER => {
                saw_eod = true;
                break;
            },
            129..=255 => {
                let count = 257 - length as usize;
                let Some(byte) = span.next_byte() else {
                    return Err(truncated("missing byte for run".to_string(), output));
                };
                output.fill(byte, count)?;
            },
        }
    }

    if !saw_eod && !input.is_empty() {
        log::debug!("RunLengthDecode: no EOD marker, decoded {} bytes", output.len());
    }

    Ok(output.into_vec())
}

fn truncated(reason: String, output: OutputSink) -> Error {
    log::warn!("RunLengthDecode: {}", reason);
    Error::CorruptRunLengthStream {
        reason,
        partial: output.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &[u8]) -> Result<Vec<u8>> {
        decode_run_length(input, &DecodeOptions::default())
    }

    #[test]
    fn test_runlength_decode_literal() {
        assert_eq!(decode(&[0x02, b'a', b'b', b'c']).unwrap(), b"abc");
    }

    #[test]
    fn test_runlength_decode_run() {
        // Repeat 'x' 3 times (257-254=3)
        assert_eq!(decode(&[0xFE, b'x']).unwrap(), b"xxx");
    }

    #[test]
    fn test_runlength_decode_mixed() {
        let input = vec![1, b'H', b'i', 254, b'X'];
        assert_eq!(decode(&input).unwrap(), b"HiXXX");
    }

    #[test]
    fn test_runlength_decode_eod_marker() {
        assert_eq!(decode(&[0x80]).unwrap(), b"");
        // Garbage after EOD is ignored
        let input = vec![1, b'H', b'i', 128, 99, 99, 99];
        assert_eq!(decode(&input).unwrap(), b"Hi");
    }

    #[test]
    fn test_runlength_decode_max_literal() {
        let mut input = vec![127];
        input.extend_from_slice(&[b'A'; 128]);
        assert_eq!(decode(&input).unwrap(), vec![b'A'; 128]);
    }

    #[test]
    fn test_runlength_decode_max_run() {
        // 257-129=128 repeats
        assert_eq!(decode(&[129, b'B']).unwrap(), vec![b'B'; 128]);
    }

    #[test]
    fn test_runlength_decode_empty() {
        assert_eq!(decode(&[]).unwrap(), b"");
    }

    #[test]
    fn test_runlength_truncated_literal_keeps_prior_runs() {
        let input = vec![0xFE, b'z', 4, b'A', b'B', b'C'];
        match decode(&input) {
            Err(Error::CorruptRunLengthStream { partial, .. }) => assert_eq!(partial, b"zzz"),
            other => panic!("Expected CorruptRunLengthStream, got {:?}", other),
        }
    }

    #[test]
    fn test_runlength_decode_missing_run_byte() {
        let result = decode(&[252]);
        assert!(matches!(result, Err(Error::CorruptRunLengthStream { .. })));
    }

    #[test]
    fn test_runlength_output_limit() {
        let options = DecodeOptions::default().with_max_decompressed_size(100);
        let result = decode_run_length(&[129, b'B'], &options);
        assert!(matches!(result, Err(Error::ResourceLimitExceeded { limit: 100, attempted: 128 })));
    }
}
