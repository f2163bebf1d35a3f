//! DCTDecode (baseline JPEG) codec.
//!
//! Decodes JPEG data to interleaved 8-bit samples using the `image` crate.
//! CMYK and YCCK sources come back converted to RGB by the JPEG decoder.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.8 - DCTDecode Filter

use crate::config::DecodeOptions;
use crate::decoders::codec::ExternalCodec;
use crate::decoders::filter::FilterIdentifier;
use crate::decoders::params::DecodeParams;
use crate::error::{Error, Result};
use image::codecs::jpeg::JpegDecoder;
use image::error::ImageError;
use image::{DynamicImage, ImageDecoder};
use std::io::Cursor;

/// DCTDecode filter implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DctCodec;

impl ExternalCodec for DctCodec {
    fn filter(&self) -> FilterIdentifier {
        FilterIdentifier::DCT
    }

    fn decode(&self, input: &[u8], params: &DecodeParams, options: &DecodeOptions) -> Result<Vec<u8>> {
        if let Some(transform) = params.get("ColorTransform") {
            // The JPEG decoder picks the transform from the Adobe marker
            log::debug!("DCTDecode: ignoring ColorTransform {:?}", transform);
        }

        // Only the headers up to the frame are read here
        let decoder = JpegDecoder::new(Cursor::new(input)).map_err(codec_error)?;
        let (width, height) = decoder.dimensions();
        let expected = decoder.total_bytes();
        log::debug!("DCTDecode: {}x{} {:?}, {} bytes", width, height, decoder.color_type(), expected);

        if let Some(limit) = options.output_limit() {
            if expected > limit as u64 {
                log::warn!("DCTDecode: {}x{} image exceeds the {} byte limit", width, height, limit);
                return Err(Error::ResourceLimitExceeded {
                    limit,
                    attempted: usize::try_from(expected).unwrap_or(usize::MAX),
                });
            }
        }

        let image = DynamicImage::from_decoder(decoder).map_err(codec_error)?;
        let samples = image.into_bytes();
        options.check_size(samples.len())?;
        Ok(samples)
    }
}

fn codec_error(error: ImageError) -> Error {
    Error::Codec {
        filter: FilterIdentifier::DCT.pdf_name(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dct_rejects_garbage() {
        let result = DctCodec.decode(b"not a jpeg", &DecodeParams::new(), &DecodeOptions::default());
        match result {
            Err(Error::Codec { filter, .. }) => assert_eq!(filter, "DCTDecode"),
            other => panic!("Expected Codec error, got {:?}", other),
        }
    }

    #[test]
    fn test_dct_rejects_truncated_header() {
        // SOI + start of an APP0 segment, nothing else
        let data = b"\xFF\xD8\xFF\xE0\x00\x10JFIF";
        assert!(DctCodec
            .decode(data, &DecodeParams::new(), &DecodeOptions::default())
            .is_err());
    }

    // SOI and a baseline frame header for a 64x48 grayscale image. The
    // decoder reads no further than the frame to learn the output size.
    const GRAY_64X48_HEADER: &[u8] = &[
        0xFF, 0xD8, // SOI
        0xFF, 0xC0, 0x00, 0x0B, 0x08, // SOF0, length 11, 8-bit
        0x00, 0x30, 0x00, 0x40, // height 48, width 64
        0x01, 0x01, 0x11, 0x00, // 1 component, 1x1 sampling, table 0
    ];

    #[test]
    fn test_dct_limit_reports_decoded_size() {
        let options = DecodeOptions::default().with_max_decompressed_size(1000);
        let result = DctCodec.decode(GRAY_64X48_HEADER, &DecodeParams::new(), &options);
        assert!(matches!(
            result,
            Err(Error::ResourceLimitExceeded {
                limit: 1000,
                attempted: 3072
            })
        ));
    }

    #[test]
    fn test_dct_missing_scan_is_codec_error() {
        // Fits the limit, so decoding proceeds and finds no scan data
        let result = DctCodec.decode(GRAY_64X48_HEADER, &DecodeParams::new(), &DecodeOptions::default());
        assert!(matches!(result, Err(Error::Codec { filter: "DCTDecode", .. })));
    }

    #[test]
    fn test_dct_decoder_name() {
        assert_eq!(DctCodec.name(), "DCTDecode");
        assert_eq!(DctCodec.filter(), FilterIdentifier::DCT);
    }
}
