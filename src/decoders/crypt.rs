//! Crypt filter codec.
//!
//! Stream decryption happens with the document's security handler, before
//! any filter runs. The only crypt filter a decode chain can complete on its
//! own is `Identity`; any other named crypt filter is reported unsupported.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.4.10 - Crypt Filter

use crate::config::DecodeOptions;
use crate::decoders::codec::ExternalCodec;
use crate::decoders::filter::FilterIdentifier;
use crate::decoders::params::DecodeParams;
use crate::error::{Error, Result};

/// Crypt codec that passes `Identity` streams through.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCryptCodec;

impl ExternalCodec for IdentityCryptCodec {
    fn filter(&self) -> FilterIdentifier {
        FilterIdentifier::Crypt
    }

    fn decode(&self, input: &[u8], params: &DecodeParams, options: &DecodeOptions) -> Result<Vec<u8>> {
        match params.crypt_filter_name() {
            "Identity" => {
                options.check_size(input.len())?;
                Ok(input.to_vec())
            },
            name => Err(Error::NotImplemented(format!("Crypt filter /{}", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        let output = IdentityCryptCodec
            .decode(b"plain", &DecodeParams::new(), &DecodeOptions::default())
            .unwrap();
        assert_eq!(output, b"plain");

        let params = DecodeParams::new().with("Name", "Identity");
        let output = IdentityCryptCodec
            .decode(b"plain", &params, &DecodeOptions::default())
            .unwrap();
        assert_eq!(output, b"plain");
    }

    #[test]
    fn test_named_crypt_filter_unsupported() {
        let params = DecodeParams::new().with("Name", "StdCF");
        let result = IdentityCryptCodec.decode(b"secret", &params, &DecodeOptions::default());
        match result {
            Err(Error::NotImplemented(msg)) => assert!(msg.contains("StdCF")),
            other => panic!("Expected NotImplemented, got {:?}", other),
        }
    }
}
