//! Stream decoder implementations for PDF filters.
//!
//! This module provides decoders for the standard PDF filters:
//! - FlateDecode (zlib/deflate) - most common
//! - ASCIIHexDecode - hexadecimal encoding
//! - ASCII85Decode - base85 encoding
//! - LZWDecode - LZW compression
//! - RunLengthDecode - run-length encoding
//! - CCITTFaxDecode, DCTDecode, JBIG2Decode, JPXDecode, Crypt - through the
//!   [`ExternalCodec`] port
//!
//! Decoders can be chained together in a filter pipeline.

use crate::config::DecodeOptions;
use crate::error::{Error, Result};

mod ascii85;
mod ascii_hex;
mod ccitt;
mod codec;
mod crypt;
mod dct;
mod filter;
mod flate;
mod lzw;
mod params;
mod predictor;
mod registry;
mod runlength;
mod span;
mod stub;

pub use ascii85::{decode_ascii85, encode_ascii85};
pub use ascii_hex::{decode_ascii_hex, encode_ascii_hex};
pub use ccitt::CcittFaxCodec;
pub use codec::ExternalCodec;
pub use crypt::IdentityCryptCodec;
pub use dct::DctCodec;
pub use filter::FilterIdentifier;
pub use flate::{decode_flate, inflate};
pub use lzw::{decode_lzw, decode_lzw_codes};
pub use params::{DecodeParams, ParamValue};
pub use predictor::{PngFilter, PredictorParams, apply_predictor, decode_predictor};
pub use registry::{CodecRegistry, CodecRegistryBuilder, registry};
pub use runlength::decode_run_length;
pub use span::{BitReader, ByteSpan, OutputSink};
pub use stub::UnimplementedCodec;

/// Decode `input` with one filter, using default limits and codecs.
///
/// # Examples
///
/// ```
/// use pdf_filters::decoders::{decode, DecodeParams, FilterIdentifier};
///
/// let decoded = decode(b"48656C6C6F>", FilterIdentifier::HexASCII, &DecodeParams::new()).unwrap();
/// assert_eq!(decoded, b"Hello");
/// ```
pub fn decode(input: &[u8], filter: FilterIdentifier, params: &DecodeParams) -> Result<Vec<u8>> {
    decode_with_options(input, filter, params, &DecodeOptions::default())
}

/// Decode `input` with one filter under explicit resource limits.
pub fn decode_with_options(
    input: &[u8],
    filter: FilterIdentifier,
    params: &DecodeParams,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    decode_with_registry(input, filter, params, options, registry())
}

/// Decode `input` with one filter, resolving external filters in `codecs`.
///
/// # Security
///
/// The output size cap is enforced while decoding; the ratio cap (if set in
/// `options`) is checked once the filter finishes.
pub fn decode_with_registry(
    input: &[u8],
    filter: FilterIdentifier,
    params: &DecodeParams,
    options: &DecodeOptions,
    codecs: &CodecRegistry,
) -> Result<Vec<u8>> {
    log::trace!("{}: decoding {} bytes", filter, input.len());

    let output = match filter {
        FilterIdentifier::HexASCII => decode_ascii_hex(input, options)?,
        FilterIdentifier::ASCII85 => decode_ascii85(input, options)?,
        FilterIdentifier::LZW => decode_lzw(input, params, options)?,
        FilterIdentifier::Flate => decode_flate(input, params, options)?,
        FilterIdentifier::RunLength => decode_run_length(input, options)?,
        FilterIdentifier::CCITTFax
        | FilterIdentifier::JBIG2
        | FilterIdentifier::DCT
        | FilterIdentifier::JPX
        | FilterIdentifier::Crypt => match codecs.get(filter) {
            Some(codec) => codec.decode(input, params, options)?,
            None => return Err(Error::NotImplemented(filter.pdf_name().to_string())),
        },
    };

    options.check_ratio(input.len(), output.len())?;
    log::trace!("{}: {} -> {} bytes", filter, input.len(), output.len());
    Ok(output)
}

/// Decode `input` with a filter given by its PDF name (e.g. "FlateDecode"
/// or the inline-image abbreviation "Fl").
pub fn decode_named(input: &[u8], name: &str, params: &DecodeParams) -> Result<Vec<u8>> {
    let filter: FilterIdentifier = name.parse()?;
    decode(input, filter, params)
}

/// One entry of a stream's `/Filter` array with its `/DecodeParms`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    /// Filter to apply
    pub filter: FilterIdentifier,
    /// Parameters for this filter (empty for defaults)
    pub params: DecodeParams,
}

impl FilterStage {
    /// Stage with default parameters.
    pub fn new(filter: FilterIdentifier) -> Self {
        Self::with_params(filter, DecodeParams::new())
    }

    /// Stage with explicit parameters.
    pub fn with_params(filter: FilterIdentifier, params: DecodeParams) -> Self {
        Self { filter, params }
    }

    /// Resolve a list of filter names into stages without parameters.
    pub fn parse_chain(names: &[&str]) -> Result<Vec<FilterStage>> {
        names
            .iter()
            .map(|name| name.parse().map(FilterStage::new))
            .collect()
    }
}

impl From<FilterIdentifier> for FilterStage {
    fn from(filter: FilterIdentifier) -> Self {
        Self::new(filter)
    }
}

/// Decode stream data using a filter pipeline.
///
/// PDF streams can have multiple filters applied in sequence. This function
/// applies each stage in order, each with its own parameters.
///
/// # Security
///
/// The size cap applies to every stage; the ratio cap is measured against
/// the original `input`, so a bomb split over several stages is still caught.
///
/// # Examples
///
/// ```
/// use pdf_filters::config::DecodeOptions;
/// use pdf_filters::decoders::{decode_pipeline, FilterStage};
///
/// let stages = FilterStage::parse_chain(&["ASCIIHexDecode", "RunLengthDecode"]).unwrap();
/// let decoded = decode_pipeline(b"FE41 80>", &stages, &DecodeOptions::default()).unwrap();
/// assert_eq!(decoded, b"AAA");
/// ```
pub fn decode_pipeline(input: &[u8], stages: &[FilterStage], options: &DecodeOptions) -> Result<Vec<u8>> {
    let Some((first, rest)) = stages.split_first() else {
        return Ok(input.to_vec());
    };

    let mut current = decode_with_options(input, first.filter, &first.params, options)?;
    for stage in rest {
        current = decode_with_options(&current, stage.filter, &stage.params, options)?;
        options.check_ratio(input.len(), current.len())?;
    }

    Ok(current)
}

/// Encoded bytes together with the filter that produced them.
#[derive(Debug, Clone, Copy)]
pub struct EncodedStream<'a> {
    /// Encoded bytes
    pub data: &'a [u8],
    /// Filter to reverse
    pub filter: FilterIdentifier,
    /// Parameters, `None` meaning the filter's defaults
    pub params: Option<&'a DecodeParams>,
}

impl<'a> EncodedStream<'a> {
    /// Stream without parameters.
    pub fn new(data: &'a [u8], filter: FilterIdentifier) -> Self {
        Self {
            data,
            filter,
            params: None,
        }
    }

    /// Attach `DecodeParms`.
    pub fn with_params(mut self, params: &'a DecodeParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Decode with default limits and codecs.
    pub fn decode(&self) -> Result<Vec<u8>> {
        self.decode_with_options(&DecodeOptions::default())
    }

    /// Decode under explicit resource limits.
    pub fn decode_with_options(&self, options: &DecodeOptions) -> Result<Vec<u8>> {
        match self.params {
            Some(params) => decode_with_options(self.data, self.filter, params, options),
            None => decode_with_options(self.data, self.filter, &DecodeParams::new(), options),
        }
    }
}
