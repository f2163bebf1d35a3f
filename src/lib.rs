// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
#![allow(clippy::upper_case_acronyms)]

//! # PDF Filters
//!
//! Decoders for the standard PDF stream filters (ISO 32000-1:2008, Section 7.4).
//!
//! ## Filters
//! - **Built in**: ASCIIHexDecode, ASCII85Decode, LZWDecode, FlateDecode,
//!   RunLengthDecode, with PNG and TIFF predictor reversal for LZW and Flate
//! - **External codecs**: CCITTFaxDecode (Group 3/4), DCTDecode (JPEG) and the
//!   Identity Crypt filter ship in the default registry; JBIG2Decode and
//!   JPXDecode are reported as not implemented unless the application
//!   registers its own codec
//!
//! ## Security
//! Every decoder writes into a bounded buffer. Output beyond
//! [`DecodeOptions::max_decompressed_size`] (100 MB by default) fails with
//! [`Error::ResourceLimitExceeded`]; [`DecodeOptions::hardened`] also caps
//! the decompression ratio.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_filters::{decode, decode_pipeline, DecodeOptions, DecodeParams, FilterIdentifier, FilterStage};
//!
//! # fn main() -> pdf_filters::Result<()> {
//! let hello = decode(b"<~87cURD]i,\"Ebo80~>", FilterIdentifier::ASCII85, &DecodeParams::new())?;
//! assert_eq!(hello, b"Hello World!");
//!
//! // /Filter [/ASCIIHexDecode /RunLengthDecode]
//! let stages = FilterStage::parse_chain(&["AHx", "RL"])?;
//! let decoded = decode_pipeline(b"02 61 62 63 80>", &stages, &DecodeOptions::default())?;
//! assert_eq!(decoded, b"abc");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Error types
pub mod error;

/// Resource limits for decoding
pub mod config;

/// Stream decoders and the filter dispatcher
pub mod decoders;

pub use config::DecodeOptions;
pub use decoders::{
    CodecRegistry, DecodeParams, EncodedStream, ExternalCodec, FilterIdentifier, FilterStage, ParamValue, decode,
    decode_named, decode_pipeline, decode_with_options, decode_with_registry,
};
pub use error::{Error, Result};
