//! Placeholder codecs for filters with no decoder in this crate.
//!
//! JBIG2Decode and JPXDecode streams are normally handed to an image
//! pipeline still encoded. Registering the placeholder keeps the failure
//! explicit; applications replace it with a real codec through
//! [`CodecRegistryBuilder::replace`](crate::decoders::CodecRegistryBuilder::replace).

use crate::config::DecodeOptions;
use crate::decoders::codec::ExternalCodec;
use crate::decoders::filter::FilterIdentifier;
use crate::decoders::params::DecodeParams;
use crate::error::{Error, Result};

/// Codec that always fails with [`Error::NotImplemented`].
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedCodec {
    filter: FilterIdentifier,
}

impl UnimplementedCodec {
    /// Placeholder for `filter`.
    pub fn new(filter: FilterIdentifier) -> Self {
        Self { filter }
    }
}

impl ExternalCodec for UnimplementedCodec {
    fn filter(&self) -> FilterIdentifier {
        self.filter
    }

    fn decode(&self, input: &[u8], _params: &DecodeParams, _options: &DecodeOptions) -> Result<Vec<u8>> {
        log::debug!("{}: no decoder available for {} bytes", self.filter, input.len());
        Err(Error::NotImplemented(self.filter.pdf_name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unimplemented_codec() {
        let codec = UnimplementedCodec::new(FilterIdentifier::JBIG2);
        assert_eq!(codec.name(), "JBIG2Decode");
        let result = codec.decode(b"\x97JB2", &DecodeParams::new(), &DecodeOptions::default());
        assert!(matches!(result, Err(Error::NotImplemented(ref name)) if name == "JBIG2Decode"));
    }
}
