//! CCITTFaxDecode codec.
//!
//! CCITT Group 3 (1-D, `K = 0`) and Group 4 (`K < 0`) fax compression for
//! monochrome images, decompressed with the `fax` crate. Mixed 1-D/2-D
//! Group 3 (`K > 0`) is not supported. Output is packed 1 bit per pixel, rows
//! padded to a byte boundary, with 0 meaning black unless `/BlackIs1 true`.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.6 - CCITTFaxDecode Filter

use crate::config::DecodeOptions;
use crate::decoders::codec::ExternalCodec;
use crate::decoders::filter::FilterIdentifier;
use crate::decoders::params::DecodeParams;
use crate::error::{Error, Result};

/// CCITT parameters resolved from `DecodeParms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CcittParams {
    k: i64,
    columns: u16,
    rows: Option<u16>,
    black_is_1: bool,
    end_of_block: bool,
}

impl CcittParams {
    fn from_params(params: &DecodeParams) -> Result<Self> {
        let columns = params.ccitt_columns();
        let columns = u16::try_from(columns)
            .ok()
            .filter(|&c| c > 0)
            .ok_or_else(|| codec_error(format!("unsupported Columns: {}", columns)))?;

        let rows = match params.rows() {
            r if r <= 0 => None,
            r => Some(u16::try_from(r).map_err(|_| codec_error(format!("unsupported Rows: {}", r)))?),
        };

        if params.encoded_byte_align() {
            log::debug!("CCITTFaxDecode: EncodedByteAlign requested, decoding without alignment");
        }

        Ok(Self {
            k: params.k(),
            columns,
            rows,
            black_is_1: params.black_is_1(),
            end_of_block: params.end_of_block(),
        })
    }

    fn is_group_4(&self) -> bool {
        self.k < 0
    }
}

fn codec_error(reason: String) -> Error {
    Error::Codec {
        filter: FilterIdentifier::CCITTFax.pdf_name(),
        reason,
    }
}

/// CCITTFaxDecode filter implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CcittFaxCodec;

impl ExternalCodec for CcittFaxCodec {
    fn filter(&self) -> FilterIdentifier {
        FilterIdentifier::CCITTFax
    }

    fn decode(&self, input: &[u8], params: &DecodeParams, options: &DecodeOptions) -> Result<Vec<u8>> {
        let params = CcittParams::from_params(params)?;
        if params.k > 0 {
            return Err(Error::NotImplemented(format!(
                "{} with K={} (mixed 1-D/2-D Group 3)",
                self.name(),
                params.k
            )));
        }
        if params.rows.is_none() && !params.end_of_block {
            log::debug!("CCITTFaxDecode: no Rows and no EndOfBlock, decoding until the data runs out");
        }

        let width = params.columns as usize;
        let bytes_per_row = width.div_ceil(8);
        let limit = options.output_limit();

        let mut output = Vec::new();
        let mut rows = 0usize;
        let mut over_limit = false;

        let mut on_row = |transitions: &[u16]| {
            if over_limit || params.rows.is_some_and(|r| rows >= r as usize) {
                return;
            }
            if limit.is_some_and(|l| output.len() + bytes_per_row > l) {
                over_limit = true;
                return;
            }
            output.extend_from_slice(&transitions_to_bytes(transitions, width));
            rows += 1;
        };

        let bytes_iter = input.iter().copied();
        let success = if params.is_group_4() {
            log::debug!("CCITTFaxDecode: Group 4 (T.6), {} columns", width);
            fax::decoder::decode_g4(bytes_iter, params.columns, params.rows, &mut on_row)
        } else {
            log::debug!("CCITTFaxDecode: Group 3 1-D (T.4), {} columns", width);
            fax::decoder::decode_g3(bytes_iter, &mut on_row)
        };

        if over_limit {
            return Err(Error::ResourceLimitExceeded {
                limit: limit.unwrap_or(0),
                attempted: output.len() + bytes_per_row,
            });
        }

        if success.is_none() {
            if output.is_empty() {
                return Err(codec_error("fax decoder rejected the data".to_string()));
            }
            if params.end_of_block {
                // Decoders commonly hit a malformed EOFB after the last full row
                log::warn!("CCITTFaxDecode: decoder stopped early after {} rows", rows);
            } else {
                log::debug!("CCITTFaxDecode: data ended after {} rows", rows);
            }
        }

        if !params.black_is_1 {
            invert_bilevel_pixels(&mut output);
        }

        Ok(output)
    }
}

/// Convert run-length transition positions to byte-packed pixels, 1 = black.
///
/// The transitions array contains positions where the color changes,
/// starting with white. For example, [3, 5, 8] means:
/// - Pixels 0-2: white
/// - Pixels 3-4: black
/// - Pixels 5-7: white
fn transitions_to_bytes(transitions: &[u16], width: usize) -> Vec<u8> {
    let mut row_bytes = vec![0u8; width.div_ceil(8)];

    let mut is_black = false;
    let mut start = 0usize;

    let ends = transitions.iter().map(|&t| t as usize).chain(std::iter::once(width));
    for end in ends {
        let end = end.min(width);
        if is_black {
            for pixel_idx in start..end {
                row_bytes[pixel_idx / 8] |= 1 << (7 - pixel_idx % 8);
            }
        }
        is_black = !is_black;
        start = end.max(start);
    }

    row_bytes
}

/// Flip every bit: the PDF default represents black as 0.
fn invert_bilevel_pixels(data: &mut [u8]) {
    for byte in data.iter_mut() {
        *byte = !*byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_to_bytes() {
        // Pixels 3-4 black in an 8-pixel row
        assert_eq!(transitions_to_bytes(&[3, 5], 8), vec![0b0001_1000]);
        // Black run reaching the end of the row
        assert_eq!(transitions_to_bytes(&[6], 10), vec![0b0000_0011, 0b1100_0000]);
        // All white
        assert_eq!(transitions_to_bytes(&[], 8), vec![0]);
    }

    #[test]
    fn test_invert() {
        let mut data = vec![0b1010_0000, 0xFF];
        invert_bilevel_pixels(&mut data);
        assert_eq!(data, vec![0b0101_1111, 0x00]);
    }

    #[test]
    fn test_params_defaults() {
        let params = CcittParams::from_params(&DecodeParams::new()).unwrap();
        assert_eq!(params.columns, 1728);
        assert_eq!(params.rows, None);
        assert!(!params.is_group_4());
        assert!(!params.black_is_1);
        assert!(params.end_of_block);
    }

    #[test]
    fn test_params_rejects_bad_columns() {
        let params = DecodeParams::new().with("Columns", 0);
        assert!(matches!(CcittParams::from_params(&params), Err(Error::Codec { .. })));
        let params = DecodeParams::new().with("Columns", 100_000);
        assert!(CcittParams::from_params(&params).is_err());
    }

    #[test]
    fn test_group_4_selection() {
        let params = CcittParams::from_params(&DecodeParams::new().with("K", -1).with("Rows", 10)).unwrap();
        assert!(params.is_group_4());
        assert_eq!(params.rows, Some(10));
    }

    // Two all-white rows of 8 pixels: each row is a single V0 code ("1"),
    // followed by EOFB and zero padding.
    const G4_TWO_WHITE_ROWS: [u8; 4] = [0b1100_0000, 0b0000_0100, 0b0000_0000, 0b0100_0000];

    #[test]
    fn test_group_4_decode_white_rows() {
        let params = DecodeParams::new().with("K", -1).with("Columns", 8).with("Rows", 2);
        let output = CcittFaxCodec
            .decode(&G4_TWO_WHITE_ROWS, &params, &DecodeOptions::default())
            .unwrap();
        // White is 1 unless BlackIs1
        assert_eq!(output, vec![0xFF, 0xFF]);

        let params = params.with("BlackIs1", true);
        let output = CcittFaxCodec
            .decode(&G4_TWO_WHITE_ROWS, &params, &DecodeOptions::default())
            .unwrap();
        assert_eq!(output, vec![0x00, 0x00]);
    }

    #[test]
    fn test_group_4_rows_cap_output() {
        let params = DecodeParams::new().with("K", -1).with("Columns", 8).with("Rows", 1);
        let output = CcittFaxCodec
            .decode(&G4_TWO_WHITE_ROWS, &params, &DecodeOptions::default())
            .unwrap();
        assert_eq!(output, vec![0xFF]);
    }

    #[test]
    fn test_group_4_output_limit() {
        let params = DecodeParams::new().with("K", -1).with("Columns", 8).with("Rows", 2);
        let options = DecodeOptions::default().with_max_decompressed_size(1);
        let result = CcittFaxCodec.decode(&G4_TWO_WHITE_ROWS, &params, &options);
        assert!(matches!(result, Err(Error::ResourceLimitExceeded { limit: 1, attempted: 2 })));
    }

    #[test]
    fn test_mixed_group_3_not_implemented() {
        let params = DecodeParams::new().with("K", 4).with("Columns", 8);
        let result = CcittFaxCodec.decode(&G4_TWO_WHITE_ROWS, &params, &DecodeOptions::default());
        assert!(matches!(result, Err(Error::NotImplemented(ref what)) if what.contains("K=4")));
    }

    #[test]
    fn test_end_of_block_param() {
        let params = CcittParams::from_params(&DecodeParams::new().with("EndOfBlock", false)).unwrap();
        assert!(!params.end_of_block);
    }

    #[test]
    fn test_codec_name() {
        assert_eq!(CcittFaxCodec.name(), "CCITTFaxDecode");
    }
}
