//! FlateDecode (zlib/deflate) implementation.
//!
//! This is the most common PDF compression filter. Inflation is delegated to
//! the flate2 crate; the decoder adds the output cap, a raw-deflate fallback
//! for streams written without a zlib header, and predictor reversal.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.4 - LZWDecode and FlateDecode Filters

use crate::config::DecodeOptions;
use crate::decoders::params::DecodeParams;
use crate::decoders::predictor::apply_predictor;
use crate::error::{Error, Result};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::{self, Read};

/// Inflate a FlateDecode stream and reverse any predictor named in `params`.
pub fn decode_flate(input: &[u8], params: &DecodeParams, options: &DecodeOptions) -> Result<Vec<u8>> {
    let inflated = inflate(input, options)?;
    apply_predictor(inflated, params)
}

enum Inflated {
    Complete(Vec<u8>),
    Failed { error: io::Error, produced: usize },
}

/// Inflate zlib data, retrying as raw deflate when the zlib wrapper is
/// rejected before any output was produced.
pub fn inflate(input: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    let zlib_error = match read_capped(ZlibDecoder::new(input), options)? {
        Inflated::Complete(output) => return Ok(output),
        Inflated::Failed { error, produced } if produced > 0 => {
            log::warn!("FlateDecode: stream corrupt after {} bytes: {}", produced, error);
            return Err(Error::InflateFailed(format!(
                "zlib error after {} bytes: {}",
                produced, error
            )));
        },
        Inflated::Failed { error, .. } => error,
    };

    // Some producers omit the zlib header and write bare deflate data
    log::debug!("Zlib decode failed ({}), trying raw deflate", zlib_error);
    match read_capped(DeflateDecoder::new(input), options)? {
        Inflated::Complete(output) => {
            log::debug!("Raw deflate recovery succeeded: {} bytes", output.len());
            Ok(output)
        },
        Inflated::Failed { error, .. } => Err(Error::InflateFailed(format!(
            "zlib error: {}, deflate error: {}, compressed size: {} bytes",
            zlib_error,
            error,
            input.len()
        ))),
    }
}

/// Read a decompressor to the end, stopping one byte past the output cap.
fn read_capped<R: Read>(reader: R, options: &DecodeOptions) -> Result<Inflated> {
    let mut output = Vec::new();

    let outcome = match options.output_limit() {
        Some(limit) => reader.take((limit as u64).saturating_add(1)).read_to_end(&mut output),
        None => {
            let mut reader = reader;
            reader.read_to_end(&mut output)
        },
    };

    options.check_size(output.len())?;

    Ok(match outcome {
        Ok(_) => Inflated::Complete(output),
        Err(error) => Inflated::Failed {
            error,
            produced: output.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn decode(input: &[u8]) -> Result<Vec<u8>> {
        decode_flate(input, &DecodeParams::default(), &DecodeOptions::default())
    }

    #[test]
    fn test_flate_decode_simple() {
        let original = b"Hello, FlateDecode!";
        assert_eq!(decode(&zlib(original)).unwrap(), original);
    }

    #[test]
    fn test_flate_decode_empty_payload() {
        assert_eq!(decode(&zlib(b"")).unwrap(), b"");
    }

    #[test]
    fn test_flate_decode_large_data() {
        let original = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ".repeat(1000);
        assert_eq!(decode(&zlib(&original)).unwrap(), original);
    }

    #[test]
    fn test_flate_decode_raw_deflate() {
        let original = b"stream without a zlib header";
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(original).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_flate_decode_invalid_data() {
        let result = decode(b"This is not zlib compressed data");
        assert!(matches!(result, Err(Error::InflateFailed(_))));
    }

    #[test]
    fn test_flate_decode_with_png_predictor() {
        // Two rows of 3 bytes with the Up filter on the second row
        let filtered = vec![0, 1, 2, 3, 2, 1, 1, 1];
        let params = DecodeParams::new().with("Predictor", 12).with("Columns", 3);
        let decoded = decode_flate(&zlib(&filtered), &params, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn test_flate_decode_predictor_short_row() {
        let params = DecodeParams::new().with("Predictor", 12).with("Columns", 3);
        let result = decode_flate(&zlib(&[0, 1, 2]), &params, &DecodeOptions::default());
        assert!(matches!(result, Err(Error::CorruptPredictorData(_))));
    }

    #[test]
    fn test_flate_decompression_bomb() {
        let compressed = zlib(&vec![0u8; 1_000_000]);
        let options = DecodeOptions::default().with_max_decompressed_size(64 * 1024);
        let result = decode_flate(&compressed, &DecodeParams::default(), &options);
        assert!(matches!(result, Err(Error::ResourceLimitExceeded { limit: 65536, .. })));
    }

    #[test]
    fn test_flate_exact_limit_is_allowed() {
        let original = vec![7u8; 4096];
        let options = DecodeOptions::default().with_max_decompressed_size(4096);
        let decoded = decode_flate(&zlib(&original), &DecodeParams::default(), &options).unwrap();
        assert_eq!(decoded, original);
    }
}
