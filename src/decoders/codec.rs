//! Port for specialized codecs (fax, bi-level image, JPEG, JPEG 2000, crypt).
//!
//! The dispatcher knows nothing about these formats. A codec is registered
//! once per filter in a [`CodecRegistry`](crate::decoders::CodecRegistry)
//! and is called with the encoded bytes and the filter's `DecodeParms`.

use crate::config::DecodeOptions;
use crate::decoders::filter::FilterIdentifier;
use crate::decoders::params::DecodeParams;
use crate::error::Result;

/// Trait for external stream codecs.
///
/// Implementations must be stateless across calls (or internally
/// synchronized): the default registry is shared by every thread.
pub trait ExternalCodec: Send + Sync {
    /// The filter this codec decodes.
    fn filter(&self) -> FilterIdentifier;

    /// Decode the input data.
    ///
    /// # Arguments
    ///
    /// * `input` - The encoded data
    /// * `params` - The filter's `DecodeParms` (defaults are the codec's business)
    /// * `options` - Resource limits the codec must respect
    fn decode(&self, input: &[u8], params: &DecodeParams, options: &DecodeOptions) -> Result<Vec<u8>>;

    /// Get the name of this codec (e.g., "DCTDecode").
    fn name(&self) -> &str {
        self.filter().pdf_name()
    }
}
