//! The closed set of PDF stream filters.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// PDF stream filter types.
///
/// PDF Spec: ISO 32000-1:2008, Table 6 - Standard filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterIdentifier {
    /// ASCIIHexDecode (hexadecimal encoding)
    HexASCII,
    /// ASCII85Decode (base-85 encoding)
    ASCII85,
    /// LZWDecode (Lempel-Ziv-Welch compression)
    LZW,
    /// FlateDecode (deflate/zlib compression)
    Flate,
    /// RunLengthDecode (run-length encoding)
    RunLength,
    /// CCITTFaxDecode (CCITT Group 3/4 fax compression)
    CCITTFax,
    /// JBIG2Decode (JBIG2 bi-level compression)
    JBIG2,
    /// DCTDecode (baseline JPEG)
    DCT,
    /// JPXDecode (JPEG 2000)
    JPX,
    /// Crypt (per-stream crypt filter)
    Crypt,
}

impl FilterIdentifier {
    /// Every filter, in declaration order.
    pub const ALL: [FilterIdentifier; 10] = [
        FilterIdentifier::HexASCII,
        FilterIdentifier::ASCII85,
        FilterIdentifier::LZW,
        FilterIdentifier::Flate,
        FilterIdentifier::RunLength,
        FilterIdentifier::CCITTFax,
        FilterIdentifier::JBIG2,
        FilterIdentifier::DCT,
        FilterIdentifier::JPX,
        FilterIdentifier::Crypt,
    ];

    /// Canonical PDF filter name (e.g. "FlateDecode").
    pub fn pdf_name(self) -> &'static str {
        match self {
            FilterIdentifier::HexASCII => "ASCIIHexDecode",
            FilterIdentifier::ASCII85 => "ASCII85Decode",
            FilterIdentifier::LZW => "LZWDecode",
            FilterIdentifier::Flate => "FlateDecode",
            FilterIdentifier::RunLength => "RunLengthDecode",
            FilterIdentifier::CCITTFax => "CCITTFaxDecode",
            FilterIdentifier::JBIG2 => "JBIG2Decode",
            FilterIdentifier::DCT => "DCTDecode",
            FilterIdentifier::JPX => "JPXDecode",
            FilterIdentifier::Crypt => "Crypt",
        }
    }

    /// Resolve a filter name, accepting the full names, the inline-image
    /// abbreviations (Section 8.9.7, Table 94) and an optional leading '/'.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('/').unwrap_or(name);
        let filter = match name {
            "ASCIIHexDecode" | "AHx" => FilterIdentifier::HexASCII,
            "ASCII85Decode" | "A85" => FilterIdentifier::ASCII85,
            "LZWDecode" | "LZW" => FilterIdentifier::LZW,
            "FlateDecode" | "Fl" => FilterIdentifier::Flate,
            "RunLengthDecode" | "RL" => FilterIdentifier::RunLength,
            "CCITTFaxDecode" | "CCF" => FilterIdentifier::CCITTFax,
            "JBIG2Decode" => FilterIdentifier::JBIG2,
            "DCTDecode" | "DCT" => FilterIdentifier::DCT,
            "JPXDecode" => FilterIdentifier::JPX,
            "Crypt" => FilterIdentifier::Crypt,
            _ => return None,
        };
        Some(filter)
    }

    /// True for filters implemented in this crate; false for filters served
    /// by a registered [`ExternalCodec`](crate::decoders::ExternalCodec).
    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            FilterIdentifier::HexASCII
                | FilterIdentifier::ASCII85
                | FilterIdentifier::LZW
                | FilterIdentifier::Flate
                | FilterIdentifier::RunLength
        )
    }
}

impl FromStr for FilterIdentifier {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| Error::UnsupportedFilter(name.to_string()))
    }
}

impl fmt::Display for FilterIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pdf_name())
    }
}
