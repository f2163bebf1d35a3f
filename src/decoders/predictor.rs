//! Predictor reversal for FlateDecode and LZWDecode streams.
//!
//! PDF streams can use TIFF Predictor 2 or PNG predictors (10-15) to improve
//! compression of pixel-like data. These predictors encode differences
//! between adjacent samples, which are reversed here after decompression.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.4.4 - LZW and Flate Predictor Functions

use crate::decoders::params::DecodeParams;
use crate::error::{Error, Result};

/// PNG row filter types, stored as the first byte of every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngFilter {
    /// Row is stored unchanged
    None = 0,
    /// Difference from the byte one pixel to the left
    Sub = 1,
    /// Difference from the byte above
    Up = 2,
    /// Difference from the average of left and above
    Average = 3,
    /// Difference from the Paeth prediction of left, above and upper-left
    Paeth = 4,
}

impl TryFrom<u8> for PngFilter {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(PngFilter::None),
            1 => Ok(PngFilter::Sub),
            2 => Ok(PngFilter::Up),
            3 => Ok(PngFilter::Average),
            4 => Ok(PngFilter::Paeth),
            _ => Err(Error::CorruptPredictorData(format!("invalid PNG filter tag: {}", tag))),
        }
    }
}

/// Validated predictor layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    /// Predictor algorithm (1 = none, 2 = TIFF, 10-15 = PNG)
    pub predictor: i64,
    /// Samples per row
    pub columns: usize,
    /// Color components per sample
    pub colors: usize,
    /// Bits per component (1, 2, 4, 8 or 16)
    pub bits_per_component: usize,
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self {
            predictor: 1, // No prediction
            columns: 1,
            colors: 1,
            bits_per_component: 8,
        }
    }
}

impl PredictorParams {
    /// Read and validate predictor entries from a `DecodeParms` dictionary.
    ///
    /// Layout entries are only validated when a predictor is actually in use.
    pub fn from_params(params: &DecodeParams) -> Result<Self> {
        let predictor = params.predictor();
        if predictor <= 1 {
            return Ok(Self {
                predictor,
                ..Default::default()
            });
        }

        let layout = Self {
            predictor,
            columns: positive(params.columns(), "Columns")?,
            colors: positive(params.colors(), "Colors")?,
            bits_per_component: positive(params.bits_per_component(), "BitsPerComponent")?,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Check that the layout describes rows this module can decode.
    ///
    /// Fails with `CorruptPredictorData` for zero columns or colors, a
    /// BitsPerComponent outside 1, 2, 4, 8 and 16, or a row size that
    /// overflows `usize`. Layouts without a predictor are always valid.
    pub fn validate(&self) -> Result<()> {
        if self.predictor <= 1 {
            return Ok(());
        }
        if self.columns == 0 || self.colors == 0 {
            return Err(Error::CorruptPredictorData(format!(
                "empty row layout: {} columns x {} colors",
                self.columns, self.colors
            )));
        }
        if !matches!(self.bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(Error::CorruptPredictorData(format!(
                "unsupported BitsPerComponent: {}",
                self.bits_per_component
            )));
        }
        // Reject absurd layouts before any allocation depends on them
        self.row_bits()?;
        Ok(())
    }

    fn row_bits(&self) -> Result<usize> {
        self.columns
            .checked_mul(self.colors)
            .and_then(|v| v.checked_mul(self.bits_per_component))
            .and_then(|v| v.checked_add(8))
            .ok_or_else(|| Error::CorruptPredictorData("row size overflows".to_string()))
    }

    /// Number of bytes of pixel data per row (without the PNG tag byte).
    pub fn pixel_bytes_per_row(&self) -> usize {
        self.columns
            .saturating_mul(self.colors)
            .saturating_mul(self.bits_per_component)
            .div_ceil(8)
    }

    /// Number of encoded bytes per row, including the PNG tag byte.
    pub fn bytes_per_row(&self) -> usize {
        if self.predictor >= 10 {
            self.pixel_bytes_per_row() + 1
        } else {
            self.pixel_bytes_per_row()
        }
    }

    /// Bytes per complete pixel, rounded up and at least 1.
    pub fn bytes_per_pixel(&self) -> usize {
        self.colors.saturating_mul(self.bits_per_component).div_ceil(8).max(1)
    }
}

fn positive(value: i64, key: &str) -> Result<usize> {
    if value <= 0 {
        return Err(Error::CorruptPredictorData(format!("{} must be positive, got {}", key, value)));
    }
    usize::try_from(value)
        .map_err(|_| Error::CorruptPredictorData(format!("{} out of range: {}", key, value)))
}

/// Apply the predictor described by a `DecodeParms` dictionary.
///
/// Takes ownership so the common no-predictor case returns the buffer
/// without copying.
pub fn apply_predictor(data: Vec<u8>, params: &DecodeParams) -> Result<Vec<u8>> {
    let layout = PredictorParams::from_params(params)?;
    if layout.predictor <= 1 {
        return Ok(data);
    }
    decode_predictor(&data, &layout)
}

/// Reverse a predictor.
///
/// # Arguments
///
/// * `data` - The predictor-encoded data
/// * `params` - Predictor type and row layout
///
/// # Returns
///
/// The decoded data with predictors reversed, or `CorruptPredictorData` if
/// the data does not fit the declared layout. No partial output is produced.
pub fn decode_predictor(data: &[u8], params: &PredictorParams) -> Result<Vec<u8>> {
    params.validate()?;

    match params.predictor {
        p if p <= 1 => Ok(data.to_vec()),
        2 => decode_tiff_predictor(data, params),
        p if p >= 10 => decode_png_predictor(data, params),
        p => Err(Error::CorruptPredictorData(format!("unsupported predictor: {}", p))),
    }
}

/// Decode TIFF Predictor 2.
///
/// Each sample after the first pixel of a row holds the difference from the
/// same component of the previous pixel, modulo 2^BitsPerComponent.
fn decode_tiff_predictor(data: &[u8], params: &PredictorParams) -> Result<Vec<u8>> {
    let bytes_per_row = params.pixel_bytes_per_row();
    if data.len() % bytes_per_row != 0 {
        return Err(Error::CorruptPredictorData(format!(
            "data length {} is not a multiple of row size {}",
            data.len(),
            bytes_per_row
        )));
    }

    let mut output = data.to_vec();
    let colors = params.colors;

    for row in output.chunks_exact_mut(bytes_per_row) {
        match params.bits_per_component {
            8 => {
                for i in colors..row.len() {
                    row[i] = row[i].wrapping_add(row[i - colors]);
                }
            },
            16 => {
                let stride = colors * 2;
                for i in (stride..row.len()).step_by(2) {
                    let left = u16::from_be_bytes([row[i - stride], row[i - stride + 1]]);
                    let cur = u16::from_be_bytes([row[i], row[i + 1]]);
                    row[i..i + 2].copy_from_slice(&cur.wrapping_add(left).to_be_bytes());
                }
            },
            bits => decode_tiff_row_packed(row, params.columns * colors, colors, bits),
        }
    }

    Ok(output)
}

/// TIFF Predictor 2 for 1, 2 and 4-bit samples packed MSB-first.
fn decode_tiff_row_packed(row: &mut [u8], samples: usize, colors: usize, bits: usize) {
    let mask = ((1u16 << bits) - 1) as u8;
    let mut left = vec![0u8; colors];

    for s in 0..samples {
        let bit = s * bits;
        let byte = bit / 8;
        let shift = 8 - bits - bit % 8;

        let delta = (row[byte] >> shift) & mask;
        let component = s % colors;
        let value = delta.wrapping_add(left[component]) & mask;
        left[component] = value;

        row[byte] = (row[byte] & !(mask << shift)) | (value << shift);
    }
}

/// Decode PNG predictors (10-15).
///
/// Every row starts with a filter tag; the tag governs the row regardless of
/// which PNG predictor value the dictionary declared.
fn decode_png_predictor(data: &[u8], params: &PredictorParams) -> Result<Vec<u8>> {
    let bytes_per_row = params.bytes_per_row(); // Includes predictor tag byte
    let pixel_bytes = params.pixel_bytes_per_row();
    let bpp = params.bytes_per_pixel();

    if data.len() % bytes_per_row != 0 {
        return Err(Error::CorruptPredictorData(format!(
            "data length {} is not a multiple of row size {}",
            data.len(),
            bytes_per_row
        )));
    }

    let row_count = data.len() / bytes_per_row;
    let mut output = vec![0u8; row_count * pixel_bytes];
    let zero_row = vec![0u8; pixel_bytes];

    for (row_idx, row_data) in data.chunks_exact(bytes_per_row).enumerate() {
        let filter = PngFilter::try_from(row_data[0])?;
        let encoded = &row_data[1..];

        let (done, rest) = output.split_at_mut(row_idx * pixel_bytes);
        let current = &mut rest[..pixel_bytes];
        let above = if row_idx > 0 {
            &done[(row_idx - 1) * pixel_bytes..]
        } else {
            &zero_row[..]
        };

        unfilter_row(filter, encoded, above, current, bpp);
    }

    Ok(output)
}

fn unfilter_row(filter: PngFilter, encoded: &[u8], above: &[u8], current: &mut [u8], bpp: usize) {
    match filter {
        PngFilter::None => current.copy_from_slice(encoded),
        PngFilter::Sub => {
            for i in 0..encoded.len() {
                let left = if i >= bpp { current[i - bpp] } else { 0 };
                current[i] = encoded[i].wrapping_add(left);
            }
        },
        PngFilter::Up => {
            for i in 0..encoded.len() {
                current[i] = encoded[i].wrapping_add(above[i]);
            }
        },
        PngFilter::Average => {
            for i in 0..encoded.len() {
                let left = if i >= bpp { current[i - bpp] as u16 } else { 0 };
                let avg = ((left + above[i] as u16) / 2) as u8;
                current[i] = encoded[i].wrapping_add(avg);
            }
        },
        PngFilter::Paeth => {
            for i in 0..encoded.len() {
                let (left, up_left) = if i >= bpp {
                    (current[i - bpp], above[i - bpp])
                } else {
                    (0, 0)
                };
                current[i] = encoded[i].wrapping_add(paeth_predictor(left, above[i], up_left));
            }
        },
    }
}

/// Paeth predictor function from the PNG specification.
fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let (ia, ib, ic) = (a as i16, b as i16, c as i16);
    let p = ia + ib - ic;
    let pa = (p - ia).abs();
    let pb = (p - ib).abs();
    let pc = (p - ic).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(columns: usize, colors: usize, bits_per_component: usize) -> PredictorParams {
        PredictorParams {
            predictor: 15,
            columns,
            colors,
            bits_per_component,
        }
    }

    fn tiff(columns: usize, colors: usize, bits_per_component: usize) -> PredictorParams {
        PredictorParams {
            predictor: 2,
            columns,
            colors,
            bits_per_component,
        }
    }

    #[test]
    fn test_no_predictor() {
        let data = b"Hello, World!";
        let result = decode_predictor(data, &PredictorParams::default()).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_png_sub_single_row() {
        let result = decode_predictor(&[1, 0x05, 0x03], &png(2, 1, 8)).unwrap();
        assert_eq!(result, vec![0x05, 0x08]);
    }

    #[test]
    fn test_png_up_predictor() {
        // Row 0 has no row above, so Up leaves it unchanged
        let encoded = vec![
            2, 10, 20, 30, 40, 50, //
            2, 5, 5, 5, 5, 5,
        ];
        let result = decode_predictor(&encoded, &png(5, 1, 8)).unwrap();
        assert_eq!(result, vec![10, 20, 30, 40, 50, 15, 25, 35, 45, 55]);
    }

    #[test]
    fn test_png_tag_overrides_declared_predictor() {
        // Declared predictor 12 (Up) but the row says Sub
        let params = PredictorParams {
            predictor: 12,
            ..png(3, 1, 8)
        };
        let result = decode_predictor(&[1, 1, 1, 1], &params).unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_png_average() {
        let encoded = vec![
            0, 10, 20, //
            3, 5, 5,
        ];
        // Row 1: [5 + (0 + 10) / 2, 5 + (10 + 20) / 2] = [10, 20]
        let result = decode_predictor(&encoded, &png(2, 1, 8)).unwrap();
        assert_eq!(result, vec![10, 20, 10, 20]);
    }

    #[test]
    fn test_png_paeth() {
        let encoded = vec![
            0, 10, 20, //
            4, 1, 1,
        ];
        // Row 1, x=0: a=0, b=10, c=0 -> p=10, picks b=10 -> 11
        // Row 1, x=1: a=11, b=20, c=10 -> p=21, pa=10, pb=1, pc=11 -> b=20 -> 21
        let result = decode_predictor(&encoded, &png(2, 1, 8)).unwrap();
        assert_eq!(result, vec![10, 20, 11, 21]);
    }

    #[test]
    fn test_png_sub_multi_byte_pixels() {
        // RGB, 2 pixels: second pixel adds the first pixel's components
        let encoded = vec![1, 1, 2, 3, 1, 1, 1];
        let result = decode_predictor(&encoded, &png(2, 3, 8)).unwrap();
        assert_eq!(result, vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn test_png_wraps_modulo_256() {
        let result = decode_predictor(&[1, 0xFF, 0x02], &png(2, 1, 8)).unwrap();
        assert_eq!(result, vec![0xFF, 0x01]);
    }

    #[test]
    fn test_png_invalid_tag() {
        let result = decode_predictor(&[7, 1, 2], &png(2, 1, 8));
        assert!(matches!(result, Err(Error::CorruptPredictorData(_))));
    }

    #[test]
    fn test_png_short_row() {
        let result = decode_predictor(&[0, 1, 2, 0, 1], &png(2, 1, 8));
        assert!(matches!(result, Err(Error::CorruptPredictorData(_))));
    }

    #[test]
    fn test_png_empty_input() {
        let result = decode_predictor(&[], &png(4, 1, 8)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_tiff_predictor_8bit() {
        let result = decode_predictor(&[10, 1, 1, 1, 20, 2, 2, 2], &tiff(4, 1, 8)).unwrap();
        assert_eq!(result, vec![10, 11, 12, 13, 20, 22, 24, 26]);
    }

    #[test]
    fn test_tiff_predictor_rgb() {
        let data = vec![10, 20, 30, 1, 2, 3];
        let result = decode_predictor(&data, &tiff(2, 3, 8)).unwrap();
        assert_eq!(result, vec![10, 20, 30, 11, 22, 33]);
    }

    #[test]
    fn test_tiff_predictor_16bit() {
        let data = vec![0x00, 0xFF, 0x00, 0x02];
        let result = decode_predictor(&data, &tiff(2, 1, 16)).unwrap();
        assert_eq!(result, vec![0x00, 0xFF, 0x01, 0x01]);
    }

    #[test]
    fn test_tiff_predictor_4bit() {
        // Samples 3, +2, +15 -> 3, 5, 4 (mod 16); last nibble is padding
        let data = vec![0x32, 0xF0];
        let result = decode_predictor(&data, &tiff(3, 1, 4)).unwrap();
        assert_eq!(result, vec![0x35, 0x40]);
    }

    #[test]
    fn test_tiff_predictor_1bit() {
        // Deltas 1,0,1,1,0,0,0,0 -> running XOR 1,1,0,1,1,1,1,1
        let result = decode_predictor(&[0b1011_0000], &tiff(8, 1, 1)).unwrap();
        assert_eq!(result, vec![0b1101_1111]);
    }

    #[test]
    fn test_tiff_short_row() {
        let result = decode_predictor(&[1, 2, 3], &tiff(2, 1, 8));
        assert!(matches!(result, Err(Error::CorruptPredictorData(_))));
    }

    #[test]
    fn test_unsupported_predictor() {
        let params = PredictorParams {
            predictor: 5,
            ..Default::default()
        };
        assert!(matches!(decode_predictor(&[1], &params), Err(Error::CorruptPredictorData(_))));
    }

    #[test]
    fn test_bytes_per_row_calculation() {
        let params = png(5, 1, 8);
        assert_eq!(params.bytes_per_row(), 6); // 5 pixels + 1 predictor tag
        assert_eq!(params.pixel_bytes_per_row(), 5);

        let params = png(10, 1, 1);
        assert_eq!(params.pixel_bytes_per_row(), 2);
        assert_eq!(params.bytes_per_pixel(), 1);

        let params = png(2, 3, 16);
        assert_eq!(params.bytes_per_pixel(), 6);
    }

    #[test]
    fn test_from_params_validation() {
        let params = DecodeParams::new().with("Predictor", 12).with("Columns", 0);
        assert!(matches!(PredictorParams::from_params(&params), Err(Error::CorruptPredictorData(_))));

        let params = DecodeParams::new().with("Predictor", 12).with("BitsPerComponent", 3);
        assert!(PredictorParams::from_params(&params).is_err());

        let params = DecodeParams::new()
            .with("Predictor", 12)
            .with("Columns", i64::MAX)
            .with("Colors", 4);
        assert!(PredictorParams::from_params(&params).is_err());

        // Layout is ignored when no predictor is in use
        let params = DecodeParams::new().with("Columns", -3);
        assert_eq!(PredictorParams::from_params(&params).unwrap().predictor, 1);
    }

    #[test]
    fn test_decode_predictor_rejects_hand_built_layouts() {
        // Layouts built directly skip from_params, so decoding validates too
        let odd_bits = tiff(8, 1, 3);
        assert!(matches!(decode_predictor(&[0xAA; 3], &odd_bits), Err(Error::CorruptPredictorData(_))));

        let huge = PredictorParams {
            predictor: 12,
            columns: usize::MAX / 2,
            colors: 4,
            bits_per_component: 8,
        };
        assert!(matches!(decode_predictor(&[0; 16], &huge), Err(Error::CorruptPredictorData(_))));

        assert!(matches!(decode_predictor(&[0; 4], &tiff(0, 1, 8)), Err(Error::CorruptPredictorData(_))));
        assert!(matches!(decode_predictor(&[0; 4], &png(4, 0, 8)), Err(Error::CorruptPredictorData(_))));

        // Unchecked fields are irrelevant without a predictor
        let none = PredictorParams {
            predictor: 1,
            ..huge
        };
        assert_eq!(decode_predictor(&[1, 2], &none).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_layout_accessors_saturate() {
        let huge = png(usize::MAX, 4, 16);
        assert!(huge.validate().is_err());
        assert_eq!(huge.pixel_bytes_per_row(), usize::MAX.div_ceil(8));
    }

    #[test]
    fn test_apply_predictor_passthrough() {
        let data = vec![9, 8, 7];
        let result = apply_predictor(data.clone(), &DecodeParams::new()).unwrap();
        assert_eq!(result, data);
    }
}
